//! Low Frequency Oscillator (LFO).

use crate::dsp::oscillator::{Oscillator, WaveShape};

/*
Low Frequency Oscillators
=========================

An LFO is an oscillator running below the audible range. The waveform math
is the same as for audio-rate oscillators; the output drives parameters
instead of speakers.

Vocabulary
----------

  control-rate  ~0.01 Hz to ~20 Hz. Heard as movement, not pitch.

  depth         How far the modulation reaches, 0.0 (none) to 1.0 (full).
                Applied by whoever reads the LFO, not inside it.

  bipolar       Output swings -1.0 to +1.0. This is what `tick` returns.

  unipolar      Output stays within 0.0 to 1.0.
                  unipolar = (bipolar + 1.0) / 2.0


Typical Rates
-------------

    0.1 - 0.5 Hz    slow sweeps, drifting pan
    0.5 - 2 Hz      classic tremolo, auto-pan
    2 - 7 Hz        vibrato sweet spot
    7 - 15 Hz       fast "helicopter" tremolo


In This Synth
-------------

The LFOs are free-running: note events never reset their phase. The synth
owns a fixed bank and reads two of them.

  LFO 0  tremolo     gain = 1 - mix · depth · (1 - unipolar(lfo))
  LFO 1  auto-pan    pan  = clamp(0.5 + 0.5 · depth · lfo, 0, 1)

With depth 0 both are neutral: unity gain, centred pan.
*/

/// Convert bipolar signal (-1.0 to +1.0) to unipolar (0.0 to 1.0).
#[inline]
pub fn bipolar_to_unipolar(bipolar: f32) -> f32 {
    (bipolar + 1.0) * 0.5
}

/// Free-running modulator: an [`Oscillator`] plus a depth.
#[derive(Debug, Clone)]
pub struct Lfo {
    osc: Oscillator,
    depth: f32,
    value: f32,
}

impl Lfo {
    pub fn new(sample_rate: f32) -> Self {
        let mut osc = Oscillator::new(sample_rate).with_shape(WaveShape::Sine);
        osc.set_frequency(1.0);
        Self {
            osc,
            depth: 0.0,
            value: 0.0,
        }
    }

    pub fn set_frequency(&mut self, hz: f32) {
        self.osc.set_frequency(hz);
    }

    pub fn set_wave_shape(&mut self, shape: WaveShape) {
        self.osc.set_wave_shape(shape);
    }

    /// Modulation depth, unclamped.
    pub fn set_depth(&mut self, depth: f32) {
        self.depth = depth;
    }

    /// Advance one sample and return the bipolar output.
    #[inline]
    pub fn tick(&mut self) -> f32 {
        self.value = self.osc.tick();
        self.value
    }

    /// Output of the most recent `tick`.
    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn depth(&self) -> f32 {
        self.depth
    }

    pub fn frequency(&self) -> f32 {
        self.osc.frequency()
    }

    pub fn shape(&self) -> WaveShape {
        self.osc.shape()
    }
}
