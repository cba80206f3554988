//! Benchmarks for the ADSR envelope.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use misynth::dsp::Envelope;

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/envelope");

    for &size in BLOCK_SIZES {
        // Retriggered every iteration so the attack and decay branches run.
        let mut env = Envelope::adsr(SAMPLE_RATE, 0.001, 0.002, 0.5, 0.1);
        group.bench_with_input(BenchmarkId::new("attack_decay", size), &size, |b, &size| {
            b.iter(|| {
                env.key_on();
                let mut sum = 0.0f32;
                for _ in 0..size {
                    sum += env.tick();
                }
                black_box(sum)
            })
        });

        let mut env = Envelope::adsr(SAMPLE_RATE, 0.0001, 0.0001, 0.7, 1.0);
        env.key_on();
        for _ in 0..64 {
            env.tick();
        }
        group.bench_with_input(BenchmarkId::new("sustain", size), &size, |b, &size| {
            b.iter(|| {
                let mut sum = 0.0f32;
                for _ in 0..size {
                    sum += env.tick();
                }
                black_box(sum)
            })
        });
    }

    group.finish();
}
