//! Benchmarks for the four reverb algorithms.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use misynth::dsp::{Reverb, ReverbKind};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_reverb(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/reverb");

    for &size in BLOCK_SIZES {
        let input: Vec<f32> = (0..size)
            .map(|i| {
                if i < 10 {
                    1.0 - (i as f32 / 10.0)
                } else {
                    (i as f32 * 0.05).sin() * 0.1
                }
            })
            .collect();

        for kind in ReverbKind::ALL {
            let mut reverb = Reverb::new(SAMPLE_RATE);
            reverb.set_kind(kind);
            group.bench_with_input(BenchmarkId::new(kind.name(), size), &size, |b, _| {
                b.iter(|| {
                    let mut sum = 0.0f32;
                    for &x in &input {
                        sum += reverb.tick(black_box(x));
                    }
                    sum
                })
            });
        }
    }

    group.finish();
}
