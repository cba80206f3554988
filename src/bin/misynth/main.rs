//! misynth - terminal front end for the polyphonic synth
//!
//! Run with: cargo run --release
//!
//! Environment:
//! - `MISYNTH_MIDI_PORT`: index or name substring of the MIDI input port (default: first port)
//! - `MISYNTH_LAYOUT`: controller layout, `knobule` or `mpk` (default: guessed from the port name)
//! - `RUST_LOG`: log filter, written to `misynth.log` so the terminal stays clean

mod app;
mod keys;
mod midi;
mod ui;

use std::fs::File;

use app::Player;
use color_eyre::eyre::WrapErr;

fn init_logging() -> color_eyre::Result<()> {
    let file = File::create("misynth.log").wrap_err("failed to create misynth.log")?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    init_logging()?;

    Player::new()
        .midi_port(std::env::var("MISYNTH_MIDI_PORT").ok())
        .layout(std::env::var("MISYNTH_LAYOUT").ok())
        .run()
}
