//! Benchmarks for the state-variable lowpass.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use misynth::dsp::filter::SVFilter;

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/filter");

    for &size in BLOCK_SIZES {
        let input: Vec<f32> = (0..size).map(|i| ((i * 7) % 13) as f32 / 6.5 - 1.0).collect();

        let mut filter = SVFilter::lowpass(SAMPLE_RATE, 1_000.0, 0.5);
        group.bench_with_input(BenchmarkId::new("static", size), &size, |b, _| {
            b.iter(|| {
                let mut sum = 0.0f32;
                for &x in &input {
                    sum += filter.tick(black_box(x));
                }
                sum
            })
        });

        // Knob sweep: coefficients recomputed every sample.
        let mut filter = SVFilter::lowpass(SAMPLE_RATE, 1_000.0, 0.5);
        group.bench_with_input(BenchmarkId::new("swept", size), &size, |b, _| {
            b.iter(|| {
                let mut sum = 0.0f32;
                for (i, &x) in input.iter().enumerate() {
                    filter.set_cutoff(200.0 + i as f32 * 10.0);
                    sum += filter.tick(black_box(x));
                }
                sum
            })
        });
    }

    group.finish();
}
