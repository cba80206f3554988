//! Low-level DSP primitives the synth is assembled from.
//!
//! These components are allocation-free once constructed and realtime-safe,
//! so they can be embedded directly inside voices and the effects chain.
//! Every primitive exposes a per-sample `tick` plus plain setters.

/// Fixed-capacity delay line.
pub mod delay;
/// Attack/decay/sustain/release envelope generator.
pub mod envelope;
/// Resonant state-variable low-pass filter.
pub mod filter;
/// Low-frequency modulator.
pub mod lfo;
/// Wet/dry crossfade helper.
pub mod mix;
/// Band-limited oscillator waveforms.
pub mod oscillator;
/// Comb/allpass building blocks and the reverb algorithms.
pub mod reverb;

pub use envelope::{Envelope, EnvelopeState};
pub use oscillator::{Oscillator, WaveShape};
pub use reverb::{Reverb, ReverbKind};
