//! Band-limited oscillators: sine plus BLIT sawtooth and square.

use std::f64::consts::{PI, TAU};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
Band-Limited Oscillators
========================

A naive sawtooth (`2 * phase - 1`) or square (`phase < 0.5`) jumps between
two values in a single sample. That jump contains harmonics all the way up
to infinity, and everything above Nyquist (sample_rate / 2) folds back down
into the audible band as inharmonic aliasing. At 5 kHz the folded partials
are louder than the real ones.

Vocabulary
----------

  Nyquist     Half the sample rate. The highest frequency a sampled signal
              can represent.

  BLIT        Band-Limited Impulse Train. A periodic pulse whose spectrum is
              a flat row of harmonics that stops at a chosen harmonic M
              instead of running to infinity:

                  blit(x) = sin(M x) / (P sin(x))

              where P is the period in samples. Pick M so the last harmonic
              sits just below Nyquist and nothing can alias.

  leaky       An integrator that forgets a tiny fraction of its state every
  integrator  sample (here 0.5%) so DC errors cannot accumulate.


Building Waveforms From Impulses
--------------------------------

  sawtooth = integrate(blit - average(blit))
             One unipolar impulse per period, integrated, gives a ramp
             that drops back at every impulse: a sawtooth with exactly M
             harmonics.

  square   = integrate(bipolar blit)
             Impulses alternate +/- every half period. Integrating them
             holds high between a + and a - impulse, then low. A DC
             blocker removes the offset the integral picks up.

    impulses   |    |    |    |           |    .    |    .
               |____|____|____|____       |____|____|____|____
    saw         /|  /|  /|  /|         square  __    __
               / | / | / | / |                |  |  |  |
                 |/  |/  |/  |/               |__|  |__|


Harmonic Count
--------------

  harmonics = 0   Use every harmonic that fits below Nyquist (default).
  harmonics = n   Use n harmonics, still capped at the Nyquist limit.

The phase math runs in f64: for low notes and LFO rates M reaches the
hundreds of thousands, and `sin(M * phase)` needs the extra mantissa.
*/

/// Lowest frequency the BLIT generators are configured for.
const MIN_FREQUENCY: f64 = 0.01;
/// Leak applied to the sawtooth integrator every sample.
const SAW_LEAK: f64 = 0.995;
/// Pole of the DC blocker behind the square integrator.
const DC_BLOCK_POLE: f64 = 0.999;

/// Waveform selection for an [`Oscillator`].
///
/// `Unknown` is what unrecognized selectors map to. It is a valid setting
/// that renders silence rather than an error.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WaveShape {
    Sine,
    #[default]
    Saw,
    Square,
    Unknown,
}

impl WaveShape {
    /// Map a raw integer selector (0 = sine, 1 = saw, 2 = square).
    pub fn from_selector(selector: i32) -> Self {
        match selector {
            0 => WaveShape::Sine,
            1 => WaveShape::Saw,
            2 => WaveShape::Square,
            _ => WaveShape::Unknown,
        }
    }
}

/// Largest harmonic count that keeps `frequency * n` below Nyquist.
fn nyquist_harmonics(period: f64) -> f64 {
    (0.5 * period).floor()
}

fn cap_harmonics(requested: u32, period: f64) -> f64 {
    let limit = nyquist_harmonics(period);
    if requested == 0 {
        limit
    } else {
        (requested as f64).min(limit)
    }
}

#[derive(Debug, Clone, Copy)]
struct SineWave {
    phase: f64,
    increment: f64,
}

impl SineWave {
    fn configure(&mut self, frequency: f64, sample_rate: f64) {
        self.increment = frequency / sample_rate;
    }

    fn tick(&mut self) -> f64 {
        let out = (TAU * self.phase).sin();
        self.phase = (self.phase + self.increment).rem_euclid(1.0);
        out
    }
}

#[derive(Debug, Clone, Copy)]
struct BlitSaw {
    phase: f64,
    rate: f64,
    period: f64,
    dc: f64,
    m: f64,
    peak: f64,
    state: f64,
}

impl BlitSaw {
    fn configure(&mut self, frequency: f64, sample_rate: f64, harmonics: u32) {
        self.period = sample_rate / frequency.abs().max(MIN_FREQUENCY);
        self.dc = 1.0 / self.period;
        self.rate = PI * self.dc;
        self.m = 2.0 * cap_harmonics(harmonics, self.period) + 1.0;
        self.peak = self.m / self.period;
    }

    fn tick(&mut self) -> f64 {
        let denominator = self.phase.sin();
        let mut out = if denominator.abs() <= f64::EPSILON {
            self.peak
        } else {
            (self.m * self.phase).sin() / (self.period * denominator)
        };

        out += self.state - self.dc;
        self.state = out * SAW_LEAK;

        self.phase += self.rate;
        if self.phase >= PI {
            self.phase -= PI;
        }

        out
    }

    fn harmonics(&self) -> u32 {
        ((self.m - 1.0) / 2.0) as u32
    }
}

#[derive(Debug, Clone, Copy)]
struct BlitSquare {
    phase: f64,
    rate: f64,
    half_period: f64,
    m: f64,
    peak: f64,
    last_blit: f64,
    dc_state: f64,
    last_out: f64,
}

impl BlitSquare {
    fn configure(&mut self, frequency: f64, sample_rate: f64, harmonics: u32) {
        self.half_period = 0.5 * sample_rate / frequency.abs().max(MIN_FREQUENCY);
        self.rate = PI / self.half_period;
        let capped = cap_harmonics(harmonics, 2.0 * self.half_period);
        // Odd harmonics only; M counts both signs of the bipolar train.
        self.m = 2.0 * ((0.5 * capped).floor() + 1.0);
        self.peak = self.m / self.half_period;
    }

    fn tick(&mut self) -> f64 {
        let previous = self.last_blit;

        let denominator = self.phase.sin();
        self.last_blit = if denominator.abs() < f64::EPSILON {
            if self.phase < 0.1 || self.phase > TAU - 0.1 {
                self.peak
            } else {
                -self.peak
            }
        } else {
            (self.m * self.phase).sin() / (self.half_period * denominator)
        };
        self.last_blit += previous;

        let out = self.last_blit - self.dc_state + DC_BLOCK_POLE * self.last_out;
        self.dc_state = self.last_blit;
        self.last_out = out;

        self.phase += self.rate;
        if self.phase >= TAU {
            self.phase -= TAU;
        }

        out
    }

    fn harmonics(&self) -> u32 {
        (self.m - 1.0) as u32
    }
}

/// One waveform generator with selectable shape, volume and tuning.
///
/// The effective frequency is `base_frequency * tuning`, recomputed whenever
/// either changes. All three generators follow frequency changes so a
/// shape switch mid-note keeps its phase continuous.
#[derive(Debug, Clone)]
pub struct Oscillator {
    shape: WaveShape,
    volume: f32,
    base_frequency: f32,
    tuning: f32,
    frequency: f32,
    harmonics: u32,
    sample_rate: f32,
    sine: SineWave,
    saw: BlitSaw,
    square: BlitSquare,
}

impl Oscillator {
    pub fn new(sample_rate: f32) -> Self {
        let mut osc = Self {
            shape: WaveShape::Saw,
            volume: 1.0,
            base_frequency: 200.0,
            tuning: 1.0,
            frequency: 200.0,
            harmonics: 0,
            sample_rate,
            sine: SineWave {
                phase: 0.0,
                increment: 0.0,
            },
            saw: BlitSaw {
                phase: 0.0,
                rate: 0.0,
                period: 1.0,
                dc: 0.0,
                m: 1.0,
                peak: 0.0,
                state: 0.0,
            },
            square: BlitSquare {
                phase: 0.0,
                rate: 0.0,
                half_period: 1.0,
                m: 2.0,
                peak: 0.0,
                last_blit: 0.0,
                dc_state: 0.0,
                last_out: 0.0,
            },
        };
        osc.update_frequency();
        osc
    }

    pub fn with_shape(mut self, shape: WaveShape) -> Self {
        self.shape = shape;
        self
    }

    pub fn set_wave_shape(&mut self, shape: WaveShape) {
        self.shape = shape;
    }

    pub fn set_frequency(&mut self, hz: f32) {
        self.base_frequency = hz;
        self.update_frequency();
    }

    pub fn set_tuning(&mut self, ratio: f32) {
        self.tuning = ratio;
        self.update_frequency();
    }

    /// Linear output gain, unclamped.
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
    }

    /// Harmonic count for saw and square. `0` means "all below Nyquist".
    pub fn set_harmonics(&mut self, harmonics: u32) {
        self.harmonics = harmonics;
        self.update_frequency();
    }

    fn update_frequency(&mut self) {
        self.frequency = self.base_frequency * self.tuning;
        let frequency = self.frequency as f64;
        let sample_rate = self.sample_rate as f64;
        self.sine.configure(frequency, sample_rate);
        self.saw.configure(frequency, sample_rate, self.harmonics);
        self.square.configure(frequency, sample_rate, self.harmonics);
    }

    /// Generate one sample of the selected waveform, scaled by volume.
    #[inline]
    pub fn tick(&mut self) -> f32 {
        let raw = match self.shape {
            WaveShape::Sine => self.sine.tick(),
            WaveShape::Saw => self.saw.tick(),
            WaveShape::Square => self.square.tick(),
            WaveShape::Unknown => return 0.0,
        };
        raw as f32 * self.volume
    }

    pub fn shape(&self) -> WaveShape {
        self.shape
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn base_frequency(&self) -> f32 {
        self.base_frequency
    }

    pub fn tuning(&self) -> f32 {
        self.tuning
    }

    /// Effective frequency: `base_frequency * tuning`.
    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    /// Highest harmonic number the current shape actually generates.
    pub fn highest_harmonic(&self) -> u32 {
        match self.shape {
            WaveShape::Sine => 1,
            WaveShape::Saw => self.saw.harmonics(),
            WaveShape::Square => self.square.harmonics(),
            WaveShape::Unknown => 0,
        }
    }
}
