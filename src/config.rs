//! Construction parameters for a [`Synth`](crate::synth::poly::Synth).
//!
//! Everything here is fixed for the lifetime of the engine: voice count,
//! oscillators per voice, LFO count and echo capacity decide how much memory
//! is reserved up front, and nothing is resized afterwards.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Result, SynthError};
use crate::synth::echo::ECHO_TAPS;
use crate::DEFAULT_SAMPLE_RATE;

/// Upper bound on `max_echo_seconds`.
pub const MAX_ECHO_SECONDS: f32 = 60.0;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SynthConfig {
    /// Output sample rate in Hz.
    pub sample_rate: f32,
    /// Size of the voice pool.
    pub voices: usize,
    /// Oscillators stacked inside every voice.
    pub oscillators_per_voice: usize,
    /// Advisory playable range in Hz. Stored on each voice, not enforced.
    pub freq_range: (f32, f32),
    /// Low-frequency oscillators in the modulation bank.
    pub lfos: usize,
    /// Longest echo base length, in seconds, the delay lines can hold.
    pub max_echo_seconds: f32,
    /// Scale voice output by note velocity.
    pub velocity_sensitive: bool,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            voices: 8,
            oscillators_per_voice: 3,
            freq_range: (20.0, 20_000.0),
            lfos: 2,
            max_echo_seconds: 10.0,
            velocity_sensitive: false,
        }
    }
}

impl SynthConfig {
    pub fn with_sample_rate(mut self, sample_rate: f32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn with_voices(mut self, voices: usize) -> Self {
        self.voices = voices;
        self
    }

    pub fn with_oscillators(mut self, oscillators_per_voice: usize) -> Self {
        self.oscillators_per_voice = oscillators_per_voice;
        self
    }

    pub fn with_freq_range(mut self, low: f32, high: f32) -> Self {
        self.freq_range = (low, high);
        self
    }

    pub fn with_lfos(mut self, lfos: usize) -> Self {
        self.lfos = lfos;
        self
    }

    pub fn with_max_echo_seconds(mut self, seconds: f32) -> Self {
        self.max_echo_seconds = seconds;
        self
    }

    pub fn with_velocity_sensitivity(mut self, enabled: bool) -> Self {
        self.velocity_sensitive = enabled;
        self
    }

    /// Echo base-length capacity in samples.
    pub fn max_echo_samples(&self) -> usize {
        (self.max_echo_seconds * self.sample_rate).round() as usize
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.sample_rate > 0.0) || !self.sample_rate.is_finite() {
            return Err(SynthError::InvalidConfig("sample rate must be positive"));
        }
        if self.voices == 0 {
            return Err(SynthError::InvalidConfig("at least one voice is required"));
        }
        if self.oscillators_per_voice == 0 {
            return Err(SynthError::InvalidConfig(
                "each voice needs at least one oscillator",
            ));
        }
        if !(self.max_echo_seconds > 0.0) || self.max_echo_samples() == 0 {
            return Err(SynthError::InvalidConfig(
                "echo capacity must hold at least one sample",
            ));
        }
        if !(self.max_echo_seconds <= MAX_ECHO_SECONDS) {
            return Err(SynthError::InvalidConfig(
                "echo capacity must be at most 60 seconds",
            ));
        }
        if self.echo_bank_samples().is_none() {
            return Err(SynthError::InvalidConfig(
                "echo capacity does not fit in memory at this sample rate",
            ));
        }
        Ok(())
    }

    /// Samples reserved across all echo taps. Tap `n` holds
    /// `(n + 1) * capacity + 1`. `None` when that is not addressable.
    fn echo_bank_samples(&self) -> Option<usize> {
        let per_tap = self.max_echo_samples();
        let mut total = 0usize;
        for n in 1..=ECHO_TAPS {
            let tap = per_tap.checked_mul(n)?.checked_add(1)?;
            total = total.checked_add(tap)?;
        }
        (total <= isize::MAX as usize / std::mem::size_of::<f32>()).then_some(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_reference_player() {
        let config = SynthConfig::default();
        assert_eq!(config.voices, 8);
        assert_eq!(config.oscillators_per_voice, 3);
        assert_eq!(config.freq_range, (20.0, 20_000.0));
        assert_eq!(config.max_echo_samples(), 441_000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_empty_pools() {
        let no_voices = SynthConfig::default().with_voices(0);
        assert!(matches!(
            no_voices.validate(),
            Err(SynthError::InvalidConfig(_))
        ));

        let no_oscillators = SynthConfig::default().with_oscillators(0);
        assert!(no_oscillators.validate().is_err());
    }

    #[test]
    fn rejects_bad_sample_rate() {
        assert!(SynthConfig::default().with_sample_rate(0.0).validate().is_err());
        assert!(SynthConfig::default()
            .with_sample_rate(f32::NAN)
            .validate()
            .is_err());
    }

    #[test]
    fn rejects_unbounded_echo_capacity() {
        let infinite = SynthConfig::default().with_max_echo_seconds(f32::INFINITY);
        assert!(matches!(infinite.validate(), Err(SynthError::InvalidConfig(_))));
        assert!(SynthConfig::default()
            .with_max_echo_seconds(f32::NAN)
            .validate()
            .is_err());
        assert!(SynthConfig::default()
            .with_max_echo_seconds(1.0e9)
            .validate()
            .is_err());
        assert!(SynthConfig::default()
            .with_max_echo_seconds(MAX_ECHO_SECONDS)
            .validate()
            .is_ok());

        // A huge but finite rate saturates the sample count.
        let fast = SynthConfig::default().with_sample_rate(f32::MAX);
        assert_eq!(fast.max_echo_samples(), usize::MAX);
        assert!(fast.validate().is_err());

        let err = crate::synth::Synth::new(infinite).err();
        assert!(matches!(err, Some(SynthError::InvalidConfig(_))));
    }

    #[test]
    fn zero_lfos_is_allowed() {
        assert!(SynthConfig::default().with_lfos(0).validate().is_ok());
    }
}
