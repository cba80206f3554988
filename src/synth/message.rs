#[cfg(feature = "rtrb")]
use rtrb::Consumer;

use crate::{
    config::SynthConfig,
    dsp::{oscillator::WaveShape, reverb::ReverbKind},
    error::{Result, SynthError},
};

/// Everything the control context can ask of a running synth.
///
/// Small and `Copy` so it can cross a lock-free ring without allocating.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum SynthMessage {
    NoteOn { note: u8, velocity: u8 },
    NoteOff { note: u8 },
    AllNotesOff,
    SetAdsr {
        attack: f32,
        decay: f32,
        sustain: f32,
        release: f32,
    },
    SetWaveShape { osc: usize, shape: WaveShape },
    SetOscVolume { osc: usize, volume: f32 },
    SetOscTuning { osc: usize, ratio: f32 },
    SetHarmonics(u32),
    SetFreqRange { low: f32, high: f32 },
    SetFilter { cutoff: f32, resonance: f32 },
    SetFilterMix(f32),
    SetEchoLength(usize),
    SetEchoMix(f32),
    SetEchoFeedback(f32),
    SetReverbType(ReverbKind),
    SetReverbMix(f32),
    SetReverbSize(f32),
    SetLfoFrequency { lfo: usize, hz: f32 },
    SetLfoWaveShape { lfo: usize, shape: WaveShape },
    SetLfoDepth { lfo: usize, depth: f32 },
    SetTremoloMix(f32),
    SetVolume(f32),
}

impl SynthMessage {
    /// Check indices and lengths against the fixed shape of a synth built
    /// from `config`. A message that passes cannot fail in `Synth::apply`.
    pub fn validate(&self, config: &SynthConfig) -> Result<()> {
        match *self {
            SynthMessage::SetWaveShape { osc, .. }
            | SynthMessage::SetOscVolume { osc, .. }
            | SynthMessage::SetOscTuning { osc, .. } => {
                let count = config.oscillators_per_voice;
                if osc >= count {
                    return Err(SynthError::OscillatorIndex { index: osc, count });
                }
            }
            SynthMessage::SetLfoFrequency { lfo, .. }
            | SynthMessage::SetLfoWaveShape { lfo, .. }
            | SynthMessage::SetLfoDepth { lfo, .. } => {
                let count = config.lfos;
                if lfo >= count {
                    return Err(SynthError::LfoIndex { index: lfo, count });
                }
            }
            SynthMessage::SetEchoLength(samples) => {
                let capacity = config.max_echo_samples();
                if samples > capacity {
                    return Err(SynthError::EchoLength {
                        requested: samples,
                        capacity,
                    });
                }
            }
            _ => {}
        }
        Ok(())
    }
}

/// Source of pending control messages, drained by the audio context.
pub trait MessageReceiver {
    fn pop(&mut self) -> Option<SynthMessage>;
}

#[cfg(feature = "rtrb")]
impl MessageReceiver for Consumer<SynthMessage> {
    fn pop(&mut self) -> Option<SynthMessage> {
        Consumer::pop(self).ok()
    }
}
