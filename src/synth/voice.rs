use crate::{
    config::SynthConfig,
    dsp::{
        envelope::Envelope,
        oscillator::{Oscillator, WaveShape},
    },
    error::{Result, SynthError},
    io::converter::midi_note_to_freq,
};

/// One polyphonic note slot: a fixed bank of oscillators gated by an
/// envelope.
///
/// `note()` is `None` exactly when the voice may be handed a new note. That
/// is independent of the envelope: a stopped voice is free at once, even
/// while its release is still audible, and a new note simply takes over the
/// tail.
#[derive(Debug, Clone)]
pub struct Voice {
    note: Option<u8>,
    velocity: u8,
    oscillators: Box<[Oscillator]>,
    envelope: Envelope,
    freq_range: (f32, f32),
    velocity_sensitive: bool,
}

impl Voice {
    pub fn new(config: &SynthConfig) -> Self {
        let oscillators = (0..config.oscillators_per_voice)
            .map(|_| Oscillator::new(config.sample_rate))
            .collect();

        Self {
            note: None,
            velocity: 0,
            oscillators,
            envelope: Envelope::new(config.sample_rate),
            freq_range: config.freq_range,
            velocity_sensitive: config.velocity_sensitive,
        }
    }

    /// Tune every oscillator to `note` (equal temperament, A4 = 440 Hz) and
    /// retrigger the envelope.
    pub fn play_note(&mut self, note: u8, velocity: u8) {
        let freq = midi_note_to_freq(note);
        for osc in self.oscillators.iter_mut() {
            osc.set_frequency(freq);
        }

        self.note = Some(note);
        self.velocity = velocity;
        self.envelope.key_on();
    }

    /// Free the voice immediately and start the release.
    pub fn stop_note(&mut self) {
        self.note = None;
        self.envelope.key_off();
    }

    /// Unweighted oscillator sum times the envelope level.
    #[inline]
    pub fn tick(&mut self) -> f32 {
        let mut sum = 0.0;
        for osc in self.oscillators.iter_mut() {
            sum += osc.tick();
        }

        let mut out = sum * self.envelope.tick();
        if self.velocity_sensitive {
            out *= self.velocity as f32 / 127.0;
        }
        out
    }

    pub fn note(&self) -> Option<u8> {
        self.note
    }

    pub fn velocity(&self) -> u8 {
        self.velocity
    }

    pub fn set_adsr(&mut self, attack: f32, decay: f32, sustain: f32, release: f32) {
        self.envelope.set_adsr(attack, decay, sustain, release);
    }

    pub fn set_wave_shape(&mut self, osc: usize, shape: WaveShape) -> Result<()> {
        self.oscillator_mut(osc)?.set_wave_shape(shape);
        Ok(())
    }

    pub fn set_osc_volume(&mut self, osc: usize, volume: f32) -> Result<()> {
        self.oscillator_mut(osc)?.set_volume(volume);
        Ok(())
    }

    pub fn set_osc_tuning(&mut self, osc: usize, ratio: f32) -> Result<()> {
        self.oscillator_mut(osc)?.set_tuning(ratio);
        Ok(())
    }

    pub fn set_harmonics(&mut self, harmonics: u32) {
        for osc in self.oscillators.iter_mut() {
            osc.set_harmonics(harmonics);
        }
    }

    /// Advisory range; stored, not enforced.
    pub fn set_freq_range(&mut self, low: f32, high: f32) {
        self.freq_range = (low, high);
    }

    pub fn freq_range(&self) -> (f32, f32) {
        self.freq_range
    }

    pub fn oscillator(&self, index: usize) -> Result<&Oscillator> {
        let count = self.oscillators.len();
        self.oscillators
            .get(index)
            .ok_or(SynthError::OscillatorIndex { index, count })
    }

    pub fn oscillator_count(&self) -> usize {
        self.oscillators.len()
    }

    pub fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    /// Still producing sound, assigned or not.
    pub fn is_sounding(&self) -> bool {
        self.envelope.is_active()
    }

    fn oscillator_mut(&mut self, index: usize) -> Result<&mut Oscillator> {
        let count = self.oscillators.len();
        self.oscillators
            .get_mut(index)
            .ok_or(SynthError::OscillatorIndex { index, count })
    }
}
