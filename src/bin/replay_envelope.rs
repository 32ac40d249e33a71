//! Replays a saved game and prints the position and clocks after each action.
//!
//! Usage:
//! `cargo run --bin replay_envelope -- game.json`
//! `RUST_LOG=ban_chess=debug cargo run --bin replay_envelope -- game.json`

use std::error::Error;

use ban_chess::ban_chess::history::HistoryEntry;
use ban_chess::ban_chess::replay::replay;
use ban_chess::clock::clock_reconstruction::clocks_at_ply;
use ban_chess::game_state::chess_types::Color;
use ban_chess::session::save_envelope::SaveEnvelope;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("ban_chess=info".parse()?))
        .init();

    let path = std::env::args()
        .nth(1)
        .ok_or("usage: replay_envelope <envelope.json>")?;
    let bytes = std::fs::read(&path)?;
    let envelope = SaveEnvelope::from_json_bytes(&bytes)?;
    envelope.validate()?;
    tracing::info!(%path, actions = envelope.actions.len(), "replaying envelope");

    let outcome = replay(Some(envelope.starting_fen.as_str()), &envelope.actions)?;
    let entries: Vec<HistoryEntry> = outcome
        .records
        .into_iter()
        .zip(envelope.elapsed_durations_ms.iter().copied())
        .map(|(record, elapsed_ms)| HistoryEntry::new(record, elapsed_ms))
        .collect();

    println!("start: {}", envelope.starting_fen);
    for (idx, entry) in entries.iter().enumerate() {
        let clocks = clocks_at_ply(
            &entries,
            envelope.time_control,
            envelope.increment_policy,
            Some(idx),
        );
        let prefix = &envelope.actions[..=idx];
        let fen = replay(Some(envelope.starting_fen.as_str()), prefix)?
            .engine
            .to_fen();
        println!(
            "{:>4} {:<5} {:<8} white={}ms{} black={}ms{} {}",
            idx,
            entry.acting_color(),
            entry.notation(),
            clocks.white_ms,
            if clocks.flagged(Color::White) { " (flag)" } else { "" },
            clocks.black_ms,
            if clocks.flagged(Color::Black) { " (flag)" } else { "" },
            fen
        );
    }

    match outcome.engine.outcome() {
        Some(result) => println!("result: {:?}, winner {:?}", result.reason, result.winner),
        None => println!("result: in progress, {}", outcome.engine.phase()),
    }
    Ok(())
}
