pub mod config;
pub mod dsp;
pub mod error;
pub mod io; // MIDI parsing and controller mapping
pub mod synth; // Voices, allocation and the effects chain

pub use config::SynthConfig;
pub use error::{Result, SynthError};
pub use synth::{Synth, SynthMessage};

#[cfg(feature = "rtrb")]
pub use synth::remote::{SynthController, SynthEngine};

pub const DEFAULT_SAMPLE_RATE: f32 = 44_100.0;
pub const MAX_BLOCK_SIZE: usize = 2048;
pub(crate) const MIN_TIME: f32 = 1.0 / 48_000.0;
