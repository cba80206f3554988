//! Error taxonomy for the control-context API.
//!
//! Nothing on the audio path returns these: `tick()` is infallible. Every
//! fallible operation is a setter or constructor called from the control
//! context, and a failed call leaves the engine untouched.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SynthError {
    /// Oscillator index outside `[0, oscillators_per_voice)`.
    #[error("oscillator index {index} is out of range (each voice has {count} oscillators)")]
    OscillatorIndex { index: usize, count: usize },

    /// Voice index outside `[0, voices)`.
    #[error("voice index {index} is out of range (the synth has {count} voices)")]
    VoiceIndex { index: usize, count: usize },

    /// LFO index outside `[0, lfos)`.
    #[error("LFO index {index} is out of range (the synth has {count} LFOs)")]
    LfoIndex { index: usize, count: usize },

    /// Echo base length whose longest tap would not fit in the delay lines.
    #[error("echo length of {requested} samples exceeds the capacity of {capacity} samples")]
    EchoLength { requested: usize, capacity: usize },

    /// Construction parameters that cannot produce a working engine.
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),

    /// The control ring towards the audio context has no free slot.
    #[error("control queue is full; message dropped")]
    QueueFull,
}

pub type Result<T> = std::result::Result<T, SynthError>;
