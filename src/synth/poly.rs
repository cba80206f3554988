use log::debug;

use crate::{
    config::SynthConfig,
    dsp::{lfo::Lfo, oscillator::WaveShape, reverb::ReverbKind},
    error::{Result, SynthError},
    synth::{
        effects::EffectsChain,
        message::{MessageReceiver, SynthMessage},
        voice::Voice,
    },
};

/*
Voice Allocation
================

The pool is fixed at construction. A cursor remembers where the last note
went, and allocation walks forward from it:

    1. advance the cursor by one (wrapping)
    2. free voice there? take it
    3. otherwise advance again and scan forward, wrapping, for a free voice
    4. nothing free after a full lap? drop the note

Under exhaustion the NEWEST note loses: a held note is never stolen. A
voice counts as free as soon as its note is stopped, even while its
release tail is still sounding, so a new note may cut that tail short.

    cursor ─┐
            ▼
    ┌────┬────┬────┬────┐
    │ 60 │ -- │ 64 │ 67 │    note_on(72): advance → slot 2 busy
    └────┴────┴────┴────┘                 scan    → 3 busy, 0 busy, 1 free ✓

`note_off` ignores the cursor and stops every voice holding that note.


Gain Staging
------------

Voices are summed without dividing by the voice count, and oscillators
inside a voice likewise. Eight full-scale voices sum to 8.0; use
`set_volume` to bring the result into range.
*/

/// Fixed pool of voices feeding a shared effects chain.
#[derive(Debug, Clone)]
pub struct Synth {
    config: SynthConfig,
    voices: Box<[Voice]>,
    cursor: usize,
    effects: EffectsChain,
}

impl Synth {
    pub fn new(config: SynthConfig) -> Result<Self> {
        config.validate()?;

        let voices = (0..config.voices).map(|_| Voice::new(&config)).collect();
        // Allocation pre-increments, so the first note lands on voice 1
        // (voice 0 for a single-voice synth).
        let cursor = 0;

        debug!(
            "synth: {} voices x {} oscillators at {} Hz, {} LFOs, echo capacity {} samples",
            config.voices,
            config.oscillators_per_voice,
            config.sample_rate,
            config.lfos,
            config.max_echo_samples()
        );

        Ok(Self {
            config,
            voices,
            cursor,
            effects: EffectsChain::new(&config),
        })
    }

    pub fn config(&self) -> &SynthConfig {
        &self.config
    }

    /// Start `note` on a free voice. Returns the voice index, or `None` when
    /// every voice is held and the note was dropped.
    pub fn note_on(&mut self, note: u8, velocity: u8) -> Option<usize> {
        let count = self.voices.len();

        self.cursor = (self.cursor + 1) % count;
        if self.voices[self.cursor].note().is_none() {
            self.voices[self.cursor].play_note(note, velocity);
            return Some(self.cursor);
        }

        for _ in 0..count {
            self.cursor = (self.cursor + 1) % count;
            if self.voices[self.cursor].note().is_none() {
                self.voices[self.cursor].play_note(note, velocity);
                return Some(self.cursor);
            }
        }

        None
    }

    /// Stop every voice holding `note`. Returns how many were stopped.
    pub fn note_off(&mut self, note: u8) -> usize {
        let mut stopped = 0;
        for voice in self.voices.iter_mut() {
            if voice.note() == Some(note) {
                voice.stop_note();
                stopped += 1;
            }
        }
        stopped
    }

    /// Stop every assigned voice.
    pub fn all_notes_off(&mut self) {
        for voice in self.voices.iter_mut() {
            if voice.note().is_some() {
                voice.stop_note();
            }
        }
    }

    /// Produce one output sample. Never allocates, blocks or fails.
    #[inline]
    pub fn tick(&mut self) -> f32 {
        let mut mix = 0.0;
        for voice in self.voices.iter_mut() {
            mix += voice.tick();
        }
        self.effects.process(mix)
    }

    pub fn render_block(&mut self, out: &mut [f32]) {
        for sample in out.iter_mut() {
            *sample = self.tick();
        }
    }

    /// Apply one control message.
    pub fn apply(&mut self, msg: SynthMessage) -> Result<()> {
        match msg {
            SynthMessage::NoteOn { note, velocity } => {
                self.note_on(note, velocity);
            }
            SynthMessage::NoteOff { note } => {
                self.note_off(note);
            }
            SynthMessage::AllNotesOff => self.all_notes_off(),
            SynthMessage::SetAdsr {
                attack,
                decay,
                sustain,
                release,
            } => self.set_adsr(attack, decay, sustain, release),
            SynthMessage::SetWaveShape { osc, shape } => self.set_wave_shape(osc, shape)?,
            SynthMessage::SetOscVolume { osc, volume } => self.set_osc_volume(osc, volume)?,
            SynthMessage::SetOscTuning { osc, ratio } => self.set_osc_tuning(osc, ratio)?,
            SynthMessage::SetHarmonics(harmonics) => self.set_harmonics(harmonics),
            SynthMessage::SetFreqRange { low, high } => self.set_freq_range(low, high),
            SynthMessage::SetFilter { cutoff, resonance } => self.set_filter(cutoff, resonance),
            SynthMessage::SetFilterMix(mix) => self.set_filter_mix(mix),
            SynthMessage::SetEchoLength(samples) => self.set_echo_length(samples)?,
            SynthMessage::SetEchoMix(mix) => self.set_echo_mix(mix),
            SynthMessage::SetEchoFeedback(feedback) => self.set_echo_feedback(feedback),
            SynthMessage::SetReverbType(kind) => self.set_reverb_type(kind),
            SynthMessage::SetReverbMix(mix) => self.set_reverb_mix(mix),
            SynthMessage::SetReverbSize(size) => self.set_reverb_size(size),
            SynthMessage::SetLfoFrequency { lfo, hz } => self.set_lfo_frequency(lfo, hz)?,
            SynthMessage::SetLfoWaveShape { lfo, shape } => self.set_lfo_wave_shape(lfo, shape)?,
            SynthMessage::SetLfoDepth { lfo, depth } => self.set_lfo_depth(lfo, depth)?,
            SynthMessage::SetTremoloMix(mix) => self.set_tremolo_mix(mix),
            SynthMessage::SetVolume(volume) => self.set_volume(volume),
        }
        Ok(())
    }

    /// Apply every message waiting in `rx`.
    ///
    /// Messages that fail are skipped; senders are expected to validate
    /// before enqueueing (see [`SynthMessage::validate`]).
    pub fn drain<R: MessageReceiver>(&mut self, rx: &mut R) {
        while let Some(msg) = rx.pop() {
            let applied = self.apply(msg);
            debug_assert!(applied.is_ok(), "unvalidated message: {msg:?}");
        }
    }

    pub fn voice(&self, index: usize) -> Result<&Voice> {
        let count = self.voices.len();
        self.voices
            .get(index)
            .ok_or(SynthError::VoiceIndex { index, count })
    }

    pub fn voices(&self) -> &[Voice] {
        &self.voices
    }

    pub fn voice_count(&self) -> usize {
        self.voices.len()
    }

    pub fn oscillator_count(&self) -> usize {
        self.config.oscillators_per_voice
    }

    /// Voices currently holding a note.
    pub fn active_voices(&self) -> usize {
        self.voices.iter().filter(|v| v.note().is_some()).count()
    }

    pub fn effects(&self) -> &EffectsChain {
        &self.effects
    }

    pub fn set_adsr(&mut self, attack: f32, decay: f32, sustain: f32, release: f32) {
        for voice in self.voices.iter_mut() {
            voice.set_adsr(attack, decay, sustain, release);
        }
    }

    pub fn set_wave_shape(&mut self, osc: usize, shape: WaveShape) -> Result<()> {
        self.check_oscillator(osc)?;
        for voice in self.voices.iter_mut() {
            voice.set_wave_shape(osc, shape)?;
        }
        Ok(())
    }

    pub fn set_osc_volume(&mut self, osc: usize, volume: f32) -> Result<()> {
        self.check_oscillator(osc)?;
        for voice in self.voices.iter_mut() {
            voice.set_osc_volume(osc, volume)?;
        }
        Ok(())
    }

    pub fn set_osc_tuning(&mut self, osc: usize, ratio: f32) -> Result<()> {
        self.check_oscillator(osc)?;
        for voice in self.voices.iter_mut() {
            voice.set_osc_tuning(osc, ratio)?;
        }
        Ok(())
    }

    pub fn set_harmonics(&mut self, harmonics: u32) {
        for voice in self.voices.iter_mut() {
            voice.set_harmonics(harmonics);
        }
    }

    pub fn set_freq_range(&mut self, low: f32, high: f32) {
        self.config.freq_range = (low, high);
        for voice in self.voices.iter_mut() {
            voice.set_freq_range(low, high);
        }
    }

    pub fn set_filter(&mut self, cutoff: f32, resonance: f32) {
        self.effects.set_filter(cutoff, resonance);
    }

    pub fn set_filter_mix(&mut self, mix: f32) {
        self.effects.set_filter_mix(mix);
    }

    /// Base echo length in samples; rejected if the longest tap would not
    /// fit, leaving the previous length in place.
    pub fn set_echo_length(&mut self, samples: usize) -> Result<()> {
        self.effects.echo_mut().set_length(samples)
    }

    pub fn set_echo_mix(&mut self, mix: f32) {
        self.effects.echo_mut().set_mix(mix);
    }

    pub fn set_echo_feedback(&mut self, feedback: f32) {
        self.effects.echo_mut().set_feedback(feedback);
    }

    /// Select a reverb algorithm. Clears every algorithm's state.
    pub fn set_reverb_type(&mut self, kind: ReverbKind) {
        self.effects.set_reverb_kind(kind);
    }

    pub fn set_reverb_mix(&mut self, mix: f32) {
        self.effects.set_reverb_mix(mix);
    }

    pub fn set_reverb_size(&mut self, size: f32) {
        self.effects.set_reverb_size(size);
    }

    pub fn set_lfo_frequency(&mut self, lfo: usize, hz: f32) -> Result<()> {
        self.lfo_mut(lfo)?.set_frequency(hz);
        Ok(())
    }

    pub fn set_lfo_wave_shape(&mut self, lfo: usize, shape: WaveShape) -> Result<()> {
        self.lfo_mut(lfo)?.set_wave_shape(shape);
        Ok(())
    }

    pub fn set_lfo_depth(&mut self, lfo: usize, depth: f32) -> Result<()> {
        self.lfo_mut(lfo)?.set_depth(depth);
        Ok(())
    }

    pub fn set_tremolo_mix(&mut self, mix: f32) {
        self.effects.set_tremolo_mix(mix);
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.effects.set_volume(volume);
    }

    /// Mono-to-stereo pan coefficient for the output sink.
    pub fn stereo_pan(&self) -> f32 {
        self.effects.pan()
    }

    fn check_oscillator(&self, index: usize) -> Result<()> {
        let count = self.config.oscillators_per_voice;
        if index < count {
            Ok(())
        } else {
            Err(SynthError::OscillatorIndex { index, count })
        }
    }

    fn lfo_mut(&mut self, index: usize) -> Result<&mut Lfo> {
        let count = self.effects.lfos().len();
        self.effects
            .lfos_mut()
            .get_mut(index)
            .ok_or(SynthError::LfoIndex { index, count })
    }
}
