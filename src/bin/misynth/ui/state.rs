//! Snapshots passed from the audio callback to the UI.
//!
//! Everything here is `Copy` and fixed-size so the callback can publish a
//! snapshot through the ring without allocating.

use misynth::{
    dsp::{EnvelopeState, ReverbKind},
    Synth,
};

/// Voices beyond this are still played, just not shown.
pub const MAX_UI_VOICES: usize = 16;

#[derive(Clone, Copy, Debug)]
pub struct VoiceView {
    pub note: Option<u8>,
    pub stage: EnvelopeState,
    pub level: f32,
}

impl Default for VoiceView {
    fn default() -> Self {
        Self {
            note: None,
            stage: EnvelopeState::Idle,
            level: 0.0,
        }
    }
}

/// Per-callback view of the synth, published after every audio buffer.
#[derive(Clone, Copy, Debug)]
pub struct UiSnapshot {
    pub voices: [VoiceView; MAX_UI_VOICES],
    pub voice_count: u8,
    pub active_voices: u8,
    pub cutoff: f32,
    pub resonance: f32,
    pub reverb: ReverbKind,
    pub pan: f32,
    pub volume: f32,
}

impl UiSnapshot {
    pub fn capture(synth: &Synth) -> Self {
        let mut voices = [VoiceView::default(); MAX_UI_VOICES];
        for (view, voice) in voices.iter_mut().zip(synth.voices()) {
            *view = VoiceView {
                note: voice.note(),
                stage: voice.envelope().state(),
                level: voice.envelope().level(),
            };
        }

        let effects = synth.effects();
        Self {
            voices,
            voice_count: synth.voice_count().min(MAX_UI_VOICES) as u8,
            active_voices: synth.active_voices().min(u8::MAX as usize) as u8,
            cutoff: effects.filter().cutoff(),
            resonance: effects.filter().resonance(),
            reverb: effects.reverb().kind(),
            pan: synth.stereo_pan(),
            volume: effects.volume(),
        }
    }

    pub fn shown_voices(&self) -> &[VoiceView] {
        &self.voices[..self.voice_count as usize]
    }
}

/// Facts about the session that never change while it runs.
#[derive(Clone, Debug)]
pub struct SessionInfo {
    pub sample_rate: f32,
    pub channels: usize,
    pub midi_port: Option<String>,
    pub layout: &'static str,
}
