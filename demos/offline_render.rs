//! Render a short chord progression offline and print its levels.
//!
//! Run with: cargo run --example offline_render

use misynth::{dsp::ReverbKind, Synth, SynthConfig, MAX_BLOCK_SIZE};

const SAMPLE_RATE: f32 = 48_000.0;

fn main() -> misynth::Result<()> {
    let mut synth = Synth::new(SynthConfig::default().with_sample_rate(SAMPLE_RATE))?;
    synth.set_adsr(0.02, 0.3, 0.6, 0.8);
    synth.set_filter(2_000.0, 0.3);
    synth.set_echo_length((SAMPLE_RATE * 0.3) as usize)?;
    synth.set_echo_mix(0.25);
    synth.set_reverb_type(ReverbKind::Jc);
    synth.set_reverb_mix(0.3);
    synth.set_volume(0.3);

    let chords: [[u8; 3]; 4] = [[57, 60, 64], [53, 57, 60], [48, 52, 55], [55, 59, 62]];
    let chord_samples = SAMPLE_RATE as usize;
    let mut block = vec![0.0f32; MAX_BLOCK_SIZE];
    let mut rendered = Vec::with_capacity(chord_samples * (chords.len() + 2));

    for chord in &chords {
        for &note in chord {
            synth.note_on(note, 100);
        }
        render(&mut synth, &mut block, chord_samples / 2, &mut rendered);
        for &note in chord {
            synth.note_off(note);
        }
        render(&mut synth, &mut block, chord_samples / 2, &mut rendered);
    }
    // Let the echo and reverb ring out.
    render(&mut synth, &mut block, chord_samples * 2, &mut rendered);

    let peak = rendered.iter().fold(0.0f32, |acc, s| acc.max(s.abs()));
    let rms = (rendered.iter().map(|s| s * s).sum::<f32>() / rendered.len() as f32).sqrt();
    println!(
        "Rendered {} samples ({:.1}s) peak {:.3} rms {:.3}",
        rendered.len(),
        rendered.len() as f32 / SAMPLE_RATE,
        peak,
        rms
    );
    Ok(())
}

fn render(synth: &mut Synth, block: &mut [f32], mut frames: usize, out: &mut Vec<f32>) {
    while frames > 0 {
        let n = frames.min(block.len());
        synth.render_block(&mut block[..n]);
        out.extend_from_slice(&block[..n]);
        frames -= n;
    }
}
