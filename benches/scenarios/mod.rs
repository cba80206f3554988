//! Whole-voice and whole-synth benchmarks.

mod synth;
mod voices;

pub use synth::bench_synth;
pub use voices::bench_voices;
