use crate::{
    dsp::{delay::DelayLine, mix::blend_dry_wet},
    error::{Result, SynthError},
};

/// Number of echo taps.
pub const ECHO_TAPS: usize = 4;

/// Four parallel delay lines at 1×, 2×, 3× and 4× a base length.
///
/// Tap `n` (counting from 1) is scaled by `feedback^n`. The tap sum is the
/// wet signal, crossfaded against the input by `mix`.
///
/// Every line is sized at construction for the longest base length the
/// echo accepts. Longer requests are rejected, never wrapped.
#[derive(Debug, Clone)]
pub struct Echo {
    taps: [DelayLine; ECHO_TAPS],
    base_length: usize,
    max_base_length: usize,
    feedback: f32,
    gains: [f32; ECHO_TAPS],
    mix: f32,
}

impl Echo {
    pub fn new(max_base_length: usize, base_length: usize) -> Self {
        let taps = std::array::from_fn(|i| DelayLine::with_capacity((i + 1) * max_base_length));
        let mut echo = Self {
            taps,
            base_length: base_length.min(max_base_length),
            max_base_length,
            feedback: 0.0,
            gains: [0.0; ECHO_TAPS],
            mix: 0.0,
        };
        echo.set_feedback(0.5);
        echo
    }

    /// Base delay in samples. Taps land at `d, 2d, 3d, 4d`.
    pub fn set_length(&mut self, samples: usize) -> Result<()> {
        if samples > self.max_base_length {
            return Err(SynthError::EchoLength {
                requested: samples,
                capacity: self.max_base_length,
            });
        }
        self.base_length = samples;
        Ok(())
    }

    pub fn set_feedback(&mut self, feedback: f32) {
        self.feedback = feedback;
        for (n, gain) in self.gains.iter_mut().enumerate() {
            *gain = feedback.powi(n as i32 + 1);
        }
    }

    pub fn set_mix(&mut self, mix: f32) {
        self.mix = mix;
    }

    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let mut wet = 0.0;
        for (n, (tap, gain)) in self.taps.iter_mut().zip(self.gains).enumerate() {
            wet += gain * tap.next_sample(input, (n + 1) * self.base_length);
        }
        blend_dry_wet(input, wet, self.mix)
    }

    pub fn length(&self) -> usize {
        self.base_length
    }

    pub fn max_length(&self) -> usize {
        self.max_base_length
    }

    pub fn tap_lengths(&self) -> [usize; ECHO_TAPS] {
        std::array::from_fn(|n| (n + 1) * self.base_length)
    }

    pub fn tap_gains(&self) -> [f32; ECHO_TAPS] {
        self.gains
    }

    pub fn feedback(&self) -> f32 {
        self.feedback
    }

    pub fn mix(&self) -> f32 {
        self.mix
    }
}
