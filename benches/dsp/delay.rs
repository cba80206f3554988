//! Benchmarks for the delay line and the four-tap echo.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use misynth::{dsp::delay::DelayLine, synth::echo::Echo};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_delay(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/delay");

    for &size in BLOCK_SIZES {
        let input: Vec<f32> = (0..size).map(|i| (i as f32 * 0.1).sin()).collect();

        let mut line = DelayLine::with_capacity(SAMPLE_RATE as usize);
        let delay = (SAMPLE_RATE * 0.25) as usize;
        group.bench_with_input(BenchmarkId::new("line", size), &size, |b, _| {
            b.iter(|| {
                let mut sum = 0.0f32;
                for &x in &input {
                    sum += line.next_sample(black_box(x), delay);
                }
                sum
            })
        });

        let max = SAMPLE_RATE as usize;
        let mut echo = Echo::new(max, max / 4);
        echo.set_mix(0.5);
        echo.set_feedback(0.6);
        group.bench_with_input(BenchmarkId::new("echo_4tap", size), &size, |b, _| {
            b.iter(|| {
                let mut sum = 0.0f32;
                for &x in &input {
                    sum += echo.process(black_box(x));
                }
                sum
            })
        });
    }

    group.finish();
}
