//! Benchmarks for dry/wet blending and pan gains.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use misynth::dsp::mix::{blend_dry_wet, pan_gains};

use crate::BLOCK_SIZES;

pub fn bench_mix(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/mix");

    for &size in BLOCK_SIZES {
        let dry: Vec<f32> = (0..size).map(|i| (i as f32 * 0.01).sin()).collect();
        let wet: Vec<f32> = (0..size).map(|i| (i as f32 * 0.013).cos()).collect();

        group.bench_with_input(BenchmarkId::new("blend", size), &size, |b, _| {
            b.iter(|| {
                let mut sum = 0.0f32;
                for (&d, &w) in dry.iter().zip(&wet) {
                    sum += blend_dry_wet(d, w, black_box(0.3));
                }
                sum
            })
        });

        let mut stereo = vec![0.0f32; size * 2];
        group.bench_with_input(BenchmarkId::new("pan_to_stereo", size), &size, |b, _| {
            b.iter(|| {
                let (left, right) = pan_gains(black_box(0.3));
                for (frame, &s) in stereo.chunks_mut(2).zip(&dry) {
                    frame[0] = s * left;
                    frame[1] = s * right;
                }
                black_box(&stereo);
            })
        });
    }

    group.finish();
}
