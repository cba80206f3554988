//! Benchmarks for the DSP primitives and the full synth.
//!
//! Run with: cargo bench
//!
//! Reference deadlines at 48kHz:
//!   - 64 samples  = 1.33ms
//!   - 128 samples = 2.67ms
//!   - 256 samples = 5.33ms
//!   - 512 samples = 10.67ms
//!
//! Benchmark groups:
//!   - dsp/*        Oscillators, envelope, filter, delay, reverbs, mixing
//!   - scenarios/*  Single voices and the whole synth with effects

use criterion::{criterion_group, criterion_main};

mod dsp;
mod scenarios;

pub const BLOCK_SIZES: &[usize] = &[64, 128, 256, 512];

pub const SAMPLE_RATE: f32 = 48_000.0;

criterion_group!(
    benches,
    dsp::bench_oscillator,
    dsp::bench_envelope,
    dsp::bench_filter,
    dsp::bench_delay,
    dsp::bench_reverb,
    dsp::bench_mix,
    scenarios::bench_voices,
    scenarios::bench_synth,
);
criterion_main!(benches);
