//! Benchmarks for single voices: three oscillators under one envelope.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use misynth::{dsp::WaveShape, synth::voice::Voice, SynthConfig};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_voices(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/voices");
    let config = SynthConfig::default().with_sample_rate(SAMPLE_RATE);

    for &size in BLOCK_SIZES {
        // Default patch: three saws.
        let mut saws = Voice::new(&config);
        saws.play_note(45, 100);
        group.bench_with_input(BenchmarkId::new("three_saws", size), &size, |b, &size| {
            b.iter(|| {
                let mut sum = 0.0f32;
                for _ in 0..size {
                    sum += saws.tick();
                }
                black_box(sum)
            })
        });

        // Detuned mixed shapes, the classic supersaw-ish stack.
        let mut stack = Voice::new(&config);
        stack.set_wave_shape(1, WaveShape::Square).ok();
        stack.set_wave_shape(2, WaveShape::Sine).ok();
        stack.set_osc_tuning(1, 1.005).ok();
        stack.set_osc_tuning(2, 0.5).ok();
        stack.play_note(57, 100);
        group.bench_with_input(BenchmarkId::new("mixed_stack", size), &size, |b, &size| {
            b.iter(|| {
                let mut sum = 0.0f32;
                for _ in 0..size {
                    sum += stack.tick();
                }
                black_box(sum)
            })
        });
    }

    group.finish();
}
