//! Plain-text board diagram used by `Display for Position` and diagnostics.

use crate::game_state::position::Position;
use crate::utils::fen_generator::piece_to_fen_char;

/// Render the board with rank 8 on top, FEN letters for pieces and `.`
/// for empty squares.
pub fn render_position(position: &Position) -> String {
    let mut out = String::with_capacity(200);
    out.push_str("  a b c d e f g h\n");

    for rank in (0..8u8).rev() {
        let rank_char = char::from(b'1' + rank);
        out.push(rank_char);

        for file in 0..8u8 {
            out.push(' ');
            out.push(
                position
                    .piece_at(rank * 8 + file)
                    .map(|(color, piece)| piece_to_fen_char(color, piece))
                    .unwrap_or('.'),
            );
        }

        out.push(' ');
        out.push(rank_char);
        out.push('\n');
    }

    out.push_str("  a b c d e f g h");
    out
}
