//! Crate root module declarations for the ban chess core.
//!
//! Layers, bottom up: the chess position and its legal move generator, the
//! ban/move turn engine with its action codec and replay, clock
//! reconstruction from timed history, and the session controller that owns a
//! game's canonical history.

pub mod engine_errors;

pub mod game_state {
    pub mod chess_move;
    pub mod chess_rules;
    pub mod chess_types;
    pub mod position;
}

pub mod moves {
    pub mod leaper_attacks;
    pub mod slider_attacks;
}

pub mod move_generation {
    pub mod legal_move_apply;
    pub mod legal_move_checks;
    pub mod legal_move_generator;
    pub mod legal_moves_pawn;
    pub mod legal_moves_pieces;
    pub mod perft;
}

pub mod ban_chess {
    pub mod action_codec;
    pub mod history;
    pub mod random_actor;
    pub mod replay;
    pub mod turn_engine;
}

pub mod clock {
    pub mod clock_reconstruction;
    pub mod elapsed_source;
    pub mod time_control;
}

pub mod session {
    pub mod remote_sync;
    pub mod save_envelope;
    pub mod session_config;
    pub mod session_controller;
    pub mod shared_session;
}

pub mod utils {
    pub mod algebraic;
    pub mod fen_generator;
    pub mod fen_parser;
    pub mod render_position;
}
