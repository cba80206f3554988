use crate::MIN_TIME;

/*
ADSR Envelope
=============

Every voice owns one of these. It multiplies the voice's oscillator sum, so
it decides when a note is heard and how it fades.

Vocabulary
----------

  level       Current output multiplier, always within 0.0 ..= 1.0.

  stage       Where the state machine is: Idle, Attack, Decay, Sustain or
              Release.

  key on      A note starts. Always enters Attack, even if the envelope is
              already sounding (retrigger).

  key off     A note ends. Enters Release from any stage except Idle.


The Shape: Linear Ramps
-----------------------

  Level
    1.0 ┐     ╱╲
        │    ╱  ╲___________
    S   │   ╱               ╲
        │  ╱                 ╲
    0.0 └─╱───────────────────╲──→ Time
        Attack Decay  Sustain  Release
         (A)   (D)      (S)      (R)

  Attack    0 → 1 over A seconds
  Decay     1 → S over D seconds
  Sustain   hold S until key off
  Release   current level → 0 over R seconds, then Idle


Time To Increment
-----------------

    increment = change / (time_seconds * sample_rate)

Attack 0.01 s at 44.1 kHz: 441 samples, increment ≈ 0.00227.

Retriggering keeps the attack slope fixed and starts from the current
level, so a note struck again during its release climbs back to 1.0
without a jump to zero.


State Machine
-------------

    ┌──────┐ key on ┌────────┐ level=1 ┌───────┐ level=S ┌─────────┐
    │ Idle │──────→ │ Attack │───────→ │ Decay │───────→ │ Sustain │
    └──────┘        └────────┘         └───────┘         └─────────┘
        ↑               │ key off          │ key off          │ key off
        │               ↓                  ↓                  ↓
        │  level=0  ┌──────────────────────────────────────────────┐
        └───────────│                   Release                    │
                    └──────────────────────────────────────────────┘

Release snapshots the starting level and the number of samples at key off,
then interpolates linearly so it lands on exactly 0.0 after R seconds
regardless of rounding.
*/

/// The current stage of the envelope state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeState {
    Idle,    // inactive, level = 0
    Attack,  // ramping up to 1.0
    Decay,   // ramping down to sustain
    Sustain, // holding sustain until key off
    Release, // ramping down to 0
}

#[derive(Debug, Clone)]
pub struct Envelope {
    attack_time: f32,
    decay_time: f32,
    sustain_level: f32,
    release_time: f32,
    sample_rate: f32,

    stage: EnvelopeState,
    level: f32,

    release_start_level: f32,
    release_total_samples: u32,
    release_elapsed_samples: u32,
}

impl Envelope {
    /// Envelope with the player's default shape: A 10 ms, D 200 ms, S 0.5,
    /// R 500 ms.
    pub fn new(sample_rate: f32) -> Self {
        Self::adsr(sample_rate, 0.01, 0.2, 0.5, 0.5)
    }

    pub fn adsr(sample_rate: f32, attack: f32, decay: f32, sustain: f32, release: f32) -> Self {
        let mut env = Self {
            attack_time: MIN_TIME,
            decay_time: MIN_TIME,
            sustain_level: 0.0,
            release_time: MIN_TIME,
            sample_rate,

            stage: EnvelopeState::Idle,
            level: 0.0,
            release_start_level: 0.0,
            release_total_samples: 1,
            release_elapsed_samples: 0,
        };
        env.set_adsr(attack, decay, sustain, release);
        env
    }

    /// Times are in seconds (floored at one sample at 48 kHz); sustain is
    /// clamped to 0.0 ..= 1.0 so the output multiplier stays in range.
    ///
    /// A release already in progress keeps the duration it started with.
    pub fn set_adsr(&mut self, attack: f32, decay: f32, sustain: f32, release: f32) {
        self.attack_time = attack.max(MIN_TIME);
        self.decay_time = decay.max(MIN_TIME);
        self.sustain_level = sustain.clamp(0.0, 1.0);
        self.release_time = release.max(MIN_TIME);
    }

    /// Enter Attack from whatever stage the envelope is in.
    pub fn key_on(&mut self) {
        self.stage = EnvelopeState::Attack;
        self.release_elapsed_samples = 0;
    }

    /// Enter Release from the current level. No-op while Idle.
    pub fn key_off(&mut self) {
        if self.stage == EnvelopeState::Idle {
            return;
        }

        self.release_start_level = self.level;
        self.release_total_samples = (self.release_time * self.sample_rate).round().max(1.0) as u32;
        self.release_elapsed_samples = 0;
        self.stage = EnvelopeState::Release;
    }

    /// Advance one sample and return the new level.
    #[inline]
    pub fn tick(&mut self) -> f32 {
        match self.stage {
            EnvelopeState::Idle => {
                self.level = 0.0;
            }

            EnvelopeState::Attack => {
                self.level += 1.0 / (self.attack_time * self.sample_rate);

                if self.level >= 1.0 {
                    self.level = 1.0;
                    self.stage = EnvelopeState::Decay;
                }
            }

            EnvelopeState::Decay => {
                let target = self.sustain_level;
                self.level -= (1.0 - target) / (self.decay_time * self.sample_rate);

                if self.level <= target {
                    self.level = target;
                    self.stage = EnvelopeState::Sustain;
                }
            }

            EnvelopeState::Sustain => {
                // Follows set_adsr while held.
                self.level = self.sustain_level;
            }

            EnvelopeState::Release => {
                self.release_elapsed_samples = self.release_elapsed_samples.saturating_add(1);

                if self.release_elapsed_samples >= self.release_total_samples {
                    self.level = 0.0;
                    self.stage = EnvelopeState::Idle;
                } else {
                    let progress =
                        self.release_elapsed_samples as f32 / self.release_total_samples as f32;
                    self.level = (self.release_start_level * (1.0 - progress)).max(0.0);
                }
            }
        }

        debug_assert!((0.0..=1.0).contains(&self.level));
        self.level
    }

    /// True while the envelope is producing output (not Idle).
    pub fn is_active(&self) -> bool {
        self.stage != EnvelopeState::Idle
    }

    pub fn reset(&mut self) {
        self.stage = EnvelopeState::Idle;
        self.level = 0.0;
        self.release_elapsed_samples = 0;
        self.release_start_level = 0.0;
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn state(&self) -> EnvelopeState {
        self.stage
    }

    /// `(attack, decay, sustain, release)` as currently configured.
    pub fn params(&self) -> (f32, f32, f32, f32) {
        (
            self.attack_time,
            self.decay_time,
            self.sustain_level,
            self.release_time,
        )
    }
}
