use std::f32::consts::PI;

/*
Resonant Low-Pass (State-Variable, TPT form)
============================================

Two integrators in a loop. The second integrator's output is the low-pass
response; feeding the first integrator's output back with gain `k` sets how
much the filter rings at the cutoff.

    g  = tan(π · cutoff / sample_rate)      prewarped integrator gain
    k  = 2 - 2 · resonance                  damping (2 = none, → 0 = self-oscillation)
    h  = 1 / (1 + g · (g + k))

Coefficients only depend on cutoff, resonance and sample rate, so they are
computed once in `set` and the per-sample path is a handful of multiplies.

Ranges
------

  cutoff      10 Hz .. 0.49 · sample_rate. tan() blows up at Nyquist.
  resonance   0.0 .. 0.99. At 1.0 the loop has no damping left.
*/

const MIN_CUTOFF: f32 = 10.0;
const MAX_CUTOFF_RATIO: f32 = 0.49;
const MAX_RESONANCE: f32 = 0.99;

#[derive(Debug, Clone)]
pub struct SVFilter {
    ic1eq: f32, // First integrator's memory
    ic2eq: f32, // Second integrator's memory

    cutoff_hz: f32,
    resonance: f32,
    sample_rate: f32,

    g: f32,
    k: f32,
    h: f32,
}

impl SVFilter {
    pub fn lowpass(sample_rate: f32, cutoff_hz: f32, resonance: f32) -> Self {
        let mut filter = Self {
            ic1eq: 0.0,
            ic2eq: 0.0,
            cutoff_hz,
            resonance,
            sample_rate,
            g: 0.0,
            k: 2.0,
            h: 1.0,
        };
        filter.set(cutoff_hz, resonance);
        filter
    }

    /// Store cutoff and resonance (clamped to the stable range) and
    /// recompute the coefficients. Integrator state is kept.
    pub fn set(&mut self, cutoff_hz: f32, resonance: f32) {
        let nyquist_guard = self.sample_rate * MAX_CUTOFF_RATIO;
        self.cutoff_hz = cutoff_hz.clamp(MIN_CUTOFF, nyquist_guard.max(MIN_CUTOFF));
        self.resonance = resonance.clamp(0.0, MAX_RESONANCE);

        self.g = (PI * self.cutoff_hz / self.sample_rate).tan();
        self.k = 2.0 - 2.0 * self.resonance;
        self.h = 1.0 / (1.0 + self.g * (self.g + self.k));
    }

    pub fn set_cutoff(&mut self, cutoff_hz: f32) {
        self.set(cutoff_hz, self.resonance);
    }

    pub fn set_resonance(&mut self, resonance: f32) {
        self.set(self.cutoff_hz, resonance);
    }

    #[inline]
    pub fn tick(&mut self, sample: f32) -> f32 {
        let v3 = sample - self.ic2eq;
        let v1 = self.h * (self.ic1eq + self.g * v3);
        let v2 = self.ic2eq + self.g * v1;

        self.ic1eq = 2.0 * v1 - self.ic1eq;
        self.ic2eq = 2.0 * v2 - self.ic2eq;

        v2
    }

    pub fn reset(&mut self) {
        self.ic1eq = 0.0;
        self.ic2eq = 0.0;
    }

    pub fn cutoff(&self) -> f32 {
        self.cutoff_hz
    }

    pub fn resonance(&self) -> f32 {
        self.resonance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f32 = 48_000.0;

    fn sine(freq: f32, len: usize) -> Vec<f32> {
        (0..len)
            .map(|n| (std::f32::consts::TAU * freq * n as f32 / SAMPLE_RATE).sin())
            .collect()
    }

    fn filtered_peak(filter: &mut SVFilter, input: &[f32]) -> f32 {
        let out: Vec<f32> = input.iter().map(|&x| filter.tick(x)).collect();
        let skip = out.len().min(256);
        out[skip..].iter().fold(0.0f32, |acc, &x| acc.max(x.abs()))
    }

    #[test]
    fn passes_dc() {
        let mut filter = SVFilter::lowpass(SAMPLE_RATE, 500.0, 0.0);
        let mut last = 0.0;
        for _ in 0..512 {
            last = filter.tick(1.0);
        }
        assert!(last > 0.99, "expected DC to pass, got {last}");
    }

    #[test]
    fn attenuates_above_cutoff() {
        let mut filter = SVFilter::lowpass(SAMPLE_RATE, 500.0, 0.0);
        let peak = filtered_peak(&mut filter, &sine(5_000.0, 1_024));
        assert!(peak < 0.05, "expected high freq attenuation, got peak: {peak}");
    }

    #[test]
    fn raising_cutoff_lets_more_through() {
        let input = sine(1_000.0, 1_024);

        let mut filter = SVFilter::lowpass(SAMPLE_RATE, 200.0, 0.0);
        let closed = filtered_peak(&mut filter, &input);

        filter.reset();
        filter.set_cutoff(5_000.0);
        let open = filtered_peak(&mut filter, &input);

        assert!(
            open > closed * 2.0,
            "high cutoff should pass more signal: open={open}, closed={closed}"
        );
    }

    #[test]
    fn resonance_boosts_cutoff_region() {
        let input = sine(1_000.0, 2_048);

        let mut filter = SVFilter::lowpass(SAMPLE_RATE, 1_000.0, 0.1);
        let flat = filtered_peak(&mut filter, &input);

        filter.reset();
        filter.set_resonance(0.9);
        let resonant = filtered_peak(&mut filter, &input);

        assert!(
            resonant > flat * 1.5,
            "resonance should boost the cutoff: resonant={resonant}, flat={flat}"
        );
    }

    #[test]
    fn parameters_are_clamped_to_stable_range() {
        let mut filter = SVFilter::lowpass(SAMPLE_RATE, 100_000.0, 4.0);
        assert!(filter.cutoff() < SAMPLE_RATE / 2.0);
        assert_eq!(filter.resonance(), MAX_RESONANCE);

        for x in sine(20_000.0, 4_096) {
            assert!(filter.tick(x).is_finite());
        }

        filter.set(-5.0, -1.0);
        assert_eq!(filter.cutoff(), MIN_CUTOFF);
        assert_eq!(filter.resonance(), 0.0);
    }
}
