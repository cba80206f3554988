//! Wet/dry crossfading and mono-to-stereo panning.

/*
Signal Mixing
=============

Vocabulary
----------

  wet/dry       dry = the signal entering an effect
                wet = what the effect produced
                A "30% wet" mix means mix = 0.3.

  crossfade     Complementary weights: as one side fades out the other
                fades in.

  pan           Where a mono signal sits between two speakers.
                  pan = 0.0  →  left only
                  pan = 0.5  →  centre
                  pan = 1.0  →  right only


The Math: Linear Crossfade
--------------------------

    output = dry × (1 - mix) + wet × mix

    mix = 0.0   dry only
    mix = 1.0   wet only
    mix = 0.3   dry × 0.7 + wet × 0.3

Mix values are NOT clamped. Outside 0.0 ..= 1.0 the weights no longer sum
to one: mix = 1.5 gives dry × -0.5 + wet × 1.5, which inverts the dry
signal and boosts the wet one. That is a legal, if unusual, setting.


Clipping Risk
-------------

Inside 0.0 ..= 1.0 the weights sum to 1.0, so two full-scale signals blend
to at most full scale. Summing voices is a different story: eight voices
at full level add to 8.0. Gain staging after the mix (master volume) is the
cure, not normalisation inside it.
*/

/// Blend dry and wet samples using linear crossfade.
///
/// output = (dry × (1-mix)) + (wet × mix)
#[inline]
pub fn blend_dry_wet(dry: f32, wet: f32, mix: f32) -> f32 {
    dry * (1.0 - mix) + wet * mix
}

/// Linear pan law: `(left, right)` gains for a pan coefficient in
/// `0.0 ..= 1.0` (clamped).
#[inline]
pub fn pan_gains(pan: f32) -> (f32, f32) {
    let pan = pan.clamp(0.0, 1.0);
    (1.0 - pan, pan)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blend_dry_wet() {
        // All dry
        assert_eq!(blend_dry_wet(1.0, 0.5, 0.0), 1.0);
        // All wet
        assert_eq!(blend_dry_wet(1.0, 0.5, 1.0), 0.5);
        // 50/50 mix
        assert_eq!(blend_dry_wet(1.0, 0.0, 0.5), 0.5);
    }

    #[test]
    fn blend_is_linear_between_endpoints() {
        let (dry, wet) = (0.8, -0.4);
        for step in 0..=10 {
            let mix = step as f32 / 10.0;
            let expected = dry + (wet - dry) * mix;
            assert!((blend_dry_wet(dry, wet, mix) - expected).abs() < 1e-6);
        }
    }

    #[test]
    fn out_of_range_mix_is_not_clamped() {
        // mix = 2.0 → dry × -1 + wet × 2
        assert_eq!(blend_dry_wet(1.0, 1.0, 2.0), 1.0);
        assert_eq!(blend_dry_wet(1.0, 0.0, 2.0), -1.0);
        assert_eq!(blend_dry_wet(0.0, 1.0, -1.0), -1.0);
    }

    #[test]
    fn pan_law_endpoints() {
        assert_eq!(pan_gains(0.0), (1.0, 0.0));
        assert_eq!(pan_gains(0.5), (0.5, 0.5));
        assert_eq!(pan_gains(1.0), (0.0, 1.0));
        assert_eq!(pan_gains(7.0), (0.0, 1.0));
    }
}
