use crate::{
    config::SynthConfig,
    dsp::{
        filter::SVFilter,
        lfo::{bipolar_to_unipolar, Lfo},
        mix::blend_dry_wet,
        reverb::{Reverb, ReverbKind},
    },
    synth::echo::Echo,
};

/*
Shared Effects Chain
====================

Runs once per sample on the summed voices:

    mix ─┬─→ [Filter] ─→ (filter_mix) ─┬─→ [Echo ×4] ─→ (echo_mix) ─┬─→ [Reverb] ─→ (reverb_mix) ─→ × tremolo ─→ × volume ─→ out
         └──────── dry ──────────┘    └──────── dry ─────────┘     └───────── dry ──────────┘

Each bracketed stage is crossfaded against its own input, so any stage can
be bypassed by setting its mix to 0.0. Mixes are not clamped.

The LFO bank ticks here too: LFO 0 drives the tremolo gain, LFO 1 the pan
coefficient reported by `pan()`.
*/

const DEFAULT_CUTOFF: f32 = 440.0;
const DEFAULT_RESONANCE: f32 = 0.5;
const DEFAULT_ECHO_SECONDS: f32 = 0.25;
const DEFAULT_REVERB_MIX: f32 = 0.2;
const CENTER_PAN: f32 = 0.5;

#[derive(Debug, Clone)]
pub struct EffectsChain {
    filter: SVFilter,
    filter_mix: f32,
    echo: Echo,
    reverb: Reverb,
    reverb_mix: f32,
    lfos: Box<[Lfo]>,
    tremolo_mix: f32,
    pan: f32,
    volume: f32,
}

impl EffectsChain {
    pub fn new(config: &SynthConfig) -> Self {
        let sample_rate = config.sample_rate;
        let echo_length = (DEFAULT_ECHO_SECONDS * sample_rate).round() as usize;

        Self {
            filter: SVFilter::lowpass(sample_rate, DEFAULT_CUTOFF, DEFAULT_RESONANCE),
            filter_mix: 1.0,
            echo: Echo::new(config.max_echo_samples(), echo_length),
            reverb: Reverb::new(sample_rate),
            reverb_mix: DEFAULT_REVERB_MIX,
            lfos: (0..config.lfos).map(|_| Lfo::new(sample_rate)).collect(),
            tremolo_mix: 0.0,
            pan: CENTER_PAN,
            volume: 1.0,
        }
    }

    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let filtered = blend_dry_wet(input, self.filter.tick(input), self.filter_mix);
        let echoed = self.echo.process(filtered);
        let reverberated = blend_dry_wet(echoed, self.reverb.tick(echoed), self.reverb_mix);

        for lfo in self.lfos.iter_mut() {
            lfo.tick();
        }

        let tremolo = match self.lfos.first() {
            Some(lfo) => {
                1.0 - self.tremolo_mix * lfo.depth() * (1.0 - bipolar_to_unipolar(lfo.value()))
            }
            None => 1.0,
        };

        self.pan = match self.lfos.get(1) {
            Some(lfo) => (CENTER_PAN + 0.5 * lfo.depth() * lfo.value()).clamp(0.0, 1.0),
            None => CENTER_PAN,
        };

        reverberated * tremolo * self.volume
    }

    /// Cutoff in Hz and resonance in `0.0 ..= 0.99`; coefficients are
    /// recomputed here and used from the next sample.
    pub fn set_filter(&mut self, cutoff: f32, resonance: f32) {
        self.filter.set(cutoff, resonance);
    }

    pub fn set_filter_mix(&mut self, mix: f32) {
        self.filter_mix = mix;
    }

    pub fn echo(&self) -> &Echo {
        &self.echo
    }

    pub fn echo_mut(&mut self) -> &mut Echo {
        &mut self.echo
    }

    pub fn set_reverb_kind(&mut self, kind: ReverbKind) {
        self.reverb.set_kind(kind);
    }

    pub fn set_reverb_mix(&mut self, mix: f32) {
        self.reverb_mix = mix;
    }

    pub fn set_reverb_size(&mut self, size: f32) {
        self.reverb.set_size(size);
    }

    pub fn lfos(&self) -> &[Lfo] {
        &self.lfos
    }

    pub fn lfos_mut(&mut self) -> &mut [Lfo] {
        &mut self.lfos
    }

    pub fn set_tremolo_mix(&mut self, mix: f32) {
        self.tremolo_mix = mix;
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
    }

    /// Mono-to-stereo pan coefficient: 0.0 left, 0.5 centre, 1.0 right.
    pub fn pan(&self) -> f32 {
        self.pan
    }

    pub fn filter(&self) -> &SVFilter {
        &self.filter
    }

    pub fn filter_mix(&self) -> f32 {
        self.filter_mix
    }

    pub fn reverb(&self) -> &Reverb {
        &self.reverb
    }

    pub fn reverb_mix(&self) -> f32 {
        self.reverb_mix
    }

    pub fn tremolo_mix(&self) -> f32 {
        self.tremolo_mix
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::oscillator::WaveShape;

    fn dry_chain() -> EffectsChain {
        let mut chain = EffectsChain::new(&SynthConfig::default());
        chain.set_filter_mix(0.0);
        chain.echo_mut().set_mix(0.0);
        chain.set_reverb_mix(0.0);
        chain
    }

    #[test]
    fn fully_dry_chain_is_transparent() {
        let mut chain = dry_chain();
        for n in 0..1_000 {
            let x = (n as f32 * 0.01).sin();
            assert_eq!(chain.process(x), x);
        }
    }

    #[test]
    fn volume_is_applied_last() {
        let mut chain = dry_chain();
        chain.set_volume(0.25);
        assert_eq!(chain.process(0.8), 0.2);
    }

    #[test]
    fn tremolo_dips_gain_with_lfo() {
        let mut chain = dry_chain();
        chain.set_tremolo_mix(1.0);
        let lfo = &mut chain.lfos_mut()[0];
        lfo.set_wave_shape(WaveShape::Sine);
        lfo.set_frequency(10.0);
        lfo.set_depth(1.0);

        let gains: Vec<f32> = (0..44_100 / 10).map(|_| chain.process(1.0)).collect();
        let min = gains.iter().cloned().fold(f32::INFINITY, f32::min);
        let max = gains.iter().cloned().fold(f32::NEG_INFINITY, f32::max);

        assert!(min < 0.01, "full-depth tremolo should reach silence, got {min}");
        assert!(max > 0.99, "tremolo peaks at unity, got {max}");
        assert!(gains.iter().all(|&g| (0.0..=1.0 + 1e-6).contains(&g)));
    }

    #[test]
    fn pan_follows_second_lfo() {
        let mut chain = dry_chain();
        assert_eq!(chain.pan(), 0.5);

        let lfo = &mut chain.lfos_mut()[1];
        lfo.set_frequency(5.0);
        lfo.set_depth(1.0);

        let mut seen_left = false;
        let mut seen_right = false;
        for _ in 0..44_100 / 5 {
            chain.process(0.0);
            let pan = chain.pan();
            assert!((0.0..=1.0).contains(&pan));
            seen_left |= pan < 0.1;
            seen_right |= pan > 0.9;
        }
        assert!(seen_left && seen_right);
    }

    #[test]
    fn pan_stays_centered_without_lfos() {
        let mut chain = EffectsChain::new(&SynthConfig::default().with_lfos(0));
        for _ in 0..100 {
            chain.process(0.3);
        }
        assert_eq!(chain.pan(), 0.5);
    }
}
