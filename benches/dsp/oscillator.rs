//! Benchmarks for band-limited waveform generation.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use misynth::dsp::{Oscillator, WaveShape};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");

    for &size in BLOCK_SIZES {
        for (name, shape) in [
            ("sine", WaveShape::Sine),
            ("saw", WaveShape::Saw),
            ("square", WaveShape::Square),
        ] {
            let mut osc = Oscillator::new(SAMPLE_RATE).with_shape(shape);
            osc.set_frequency(440.0);
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, &size| {
                b.iter(|| {
                    let mut sum = 0.0f32;
                    for _ in 0..size {
                        sum += osc.tick();
                    }
                    black_box(sum)
                })
            });
        }

        // A low saw carries hundreds of harmonics; cost should not depend on it.
        let mut bass = Oscillator::new(SAMPLE_RATE).with_shape(WaveShape::Saw);
        bass.set_frequency(55.0);
        group.bench_with_input(BenchmarkId::new("saw_55hz", size), &size, |b, &size| {
            b.iter(|| {
                let mut sum = 0.0f32;
                for _ in 0..size {
                    sum += bass.tick();
                }
                black_box(sum)
            })
        });
    }

    group.finish();
}
