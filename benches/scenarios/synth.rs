//! Benchmarks for the complete synth: voices, filter, echo and reverb.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use misynth::{dsp::ReverbKind, Synth, SynthConfig};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

fn chord_synth(held: &[u8], reverb: ReverbKind) -> Synth {
    let config = SynthConfig::default()
        .with_sample_rate(SAMPLE_RATE)
        .with_max_echo_seconds(1.0);
    let mut synth = Synth::new(config).expect("bench config is valid");
    synth.set_echo_mix(0.3);
    synth.set_reverb_type(reverb);
    synth.set_reverb_mix(0.3);
    for &note in held {
        synth.note_on(note, 100);
    }
    synth
}

pub fn bench_synth(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/synth");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Effects only: the fixed cost paid every block.
        let mut idle = chord_synth(&[], ReverbKind::Prc);
        group.bench_with_input(BenchmarkId::new("idle", size), &size, |b, _| {
            b.iter(|| idle.render_block(black_box(&mut buffer)))
        });

        let mut triad = chord_synth(&[60, 64, 67], ReverbKind::Jc);
        group.bench_with_input(BenchmarkId::new("triad_jc", size), &size, |b, _| {
            b.iter(|| triad.render_block(black_box(&mut buffer)))
        });

        // Every voice busy with the most expensive reverb.
        let mut full = chord_synth(&[48, 52, 55, 60, 64, 67, 72, 76], ReverbKind::Free);
        group.bench_with_input(BenchmarkId::new("full_free", size), &size, |b, _| {
            b.iter(|| full.render_block(black_box(&mut buffer)))
        });
    }

    group.finish();
}
