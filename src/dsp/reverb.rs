//! Reverb - Room Simulation via Delay Networks
//!
//! Reverb simulates a space by summing many delayed, filtered reflections of
//! the input. Every algorithm here is built from the same two blocks, a
//! feedback comb and a Schroeder allpass, wired in different topologies:
//!
//! ```text
//! Prc   Input → [AP] → [AP] ──┬→ [Comb] ──┐
//!                             └→ [Comb] ──┴→ (+) → Output
//!
//! Jc    Input → [AP] → [AP] → [AP] ──┬→ [Comb ×4] → (+) → [Delay] → Output
//!
//! N     Input ──┬→ [Comb ×6] → (+) → [AP] → [AP] → [AP] → [LP] → [AP] → Output
//!
//! Free  Input ──┬→ [Damped comb ×8] → (+) → [AP] → [AP] → [AP] → [AP] → Output
//! ```
//!
//! ## Comb Filters
//!
//! ```text
//! y[n] = x[n - delay] + feedback * y[n - delay]
//! ```
//!
//! A train of equally spaced echoes that decays by `feedback` per trip.
//! Delay lengths are mutually prime so the echoes of different combs never
//! line up and pile onto one frequency.
//!
//! ## Allpass Filters
//!
//! ```text
//! v[n] = x[n] + g * v[n - delay]
//! y[n] = v[n - delay] - g * v[n]
//! ```
//!
//! Flat magnitude response, smeared phase. Adds echo density without
//! colouring the tone.
//!
//! # Size
//!
//! One `size` control in `0.0 ..= 1.0` drives every algorithm. The comb-based
//! designs turn it into a decay time (T60, the time for the tail to fall by
//! 60 dB) and derive each comb's feedback from its length:
//!
//! ```text
//! feedback = 10 ^ (-3 * length / (t60 * sample_rate))
//! ```
//!
//! `Free` feeds it straight into its room-size feedback instead.
//!
//! All buffers are allocated at construction. Switching algorithm clears
//! every algorithm's state.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dsp::delay::DelayLine;

/// Sample rate the reference delay lengths below were tuned for.
const REFERENCE_RATE: f32 = 44_100.0;

const MIN_T60: f32 = 0.25;
const MAX_T60: f32 = 4.0;
/// Size giving a one-second tail on the T60-driven algorithms.
pub const DEFAULT_REVERB_SIZE: f32 = 0.2;

const DIFFUSION_GAIN: f32 = 0.7;
const FREE_ALLPASS_GAIN: f32 = 0.5;
const FREE_DAMPING: f32 = 0.2;
const N_LOWPASS_POLE: f32 = 0.7;

const PRC_ALLPASSES: [usize; 2] = [341, 613];
const PRC_COMBS: [usize; 2] = [1557, 2137];

const JC_ALLPASSES: [usize; 3] = [225, 341, 441];
const JC_COMBS: [usize; 4] = [1116, 1356, 1422, 1617];
const JC_OUTPUT_DELAY: usize = 211;

const N_COMBS: [usize; 6] = [1433, 1601, 1867, 2053, 2251, 2399];
const N_ALLPASSES: [usize; 3] = [347, 113, 37];
const N_OUTPUT_ALLPASS: usize = 59;

const FREE_COMBS: [usize; 8] = [1557, 1617, 1491, 1422, 1277, 1356, 1188, 1116];
const FREE_ALLPASSES: [usize; 4] = [556, 441, 341, 225];

/// The closed set of reverb algorithms.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReverbKind {
    #[default]
    Prc,
    Jc,
    N,
    Free,
}

impl ReverbKind {
    pub const ALL: [ReverbKind; 4] = [
        ReverbKind::Prc,
        ReverbKind::Jc,
        ReverbKind::N,
        ReverbKind::Free,
    ];

    /// Map a raw selector (0 = Prc, 1 = Jc, 2 = N, 3 = Free). Anything else
    /// falls back to `Prc`.
    pub fn from_selector(selector: i32) -> Self {
        match selector {
            1 => ReverbKind::Jc,
            2 => ReverbKind::N,
            3 => ReverbKind::Free,
            _ => ReverbKind::Prc,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ReverbKind::Prc => "PRC",
            ReverbKind::Jc => "JC",
            ReverbKind::N => "N",
            ReverbKind::Free => "Free",
        }
    }
}

fn is_prime(n: usize) -> bool {
    if n < 2 {
        return false;
    }
    let mut divisor = 2;
    while divisor * divisor <= n {
        if n % divisor == 0 {
            return false;
        }
        divisor += 1;
    }
    true
}

/// Rescale a reference length to `sample_rate`, rounded up to a prime.
fn scaled_length(reference: usize, sample_rate: f32) -> usize {
    let mut length = ((reference as f32 * sample_rate / REFERENCE_RATE).round() as usize).max(2);
    while !is_prime(length) {
        length += 1;
    }
    length
}

fn t60_feedback(length: usize, t60: f32, sample_rate: f32) -> f32 {
    10f32.powf(-3.0 * length as f32 / (t60 * sample_rate))
}

fn size_to_t60(size: f32) -> f32 {
    MIN_T60 + size * (MAX_T60 - MIN_T60)
}

/// Feedback comb with an optional one-pole damping filter in the loop.
#[derive(Debug, Clone)]
pub struct CombFilter {
    buffer: Box<[f32]>,
    write_pos: usize,
    feedback: f32,
    damp: f32,
    filter_state: f32,
}

impl CombFilter {
    pub fn new(delay_samples: usize) -> Self {
        Self {
            buffer: vec![0.0; delay_samples.max(1)].into_boxed_slice(),
            write_pos: 0,
            feedback: 0.5,
            damp: 0.0,
            filter_state: 0.0,
        }
    }

    pub fn set_feedback(&mut self, feedback: f32) {
        self.feedback = feedback.clamp(0.0, 0.99);
    }

    pub fn set_damp(&mut self, damp: f32) {
        self.damp = damp.clamp(0.0, 1.0);
    }

    pub fn delay_samples(&self) -> usize {
        self.buffer.len()
    }

    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let output = self.buffer[self.write_pos];

        // One-pole lowpass in the loop absorbs high frequencies
        self.filter_state = output * (1.0 - self.damp) + self.filter_state * self.damp;
        self.buffer[self.write_pos] = input + self.filter_state * self.feedback;

        self.write_pos = (self.write_pos + 1) % self.buffer.len();

        output
    }

    pub fn reset(&mut self) {
        self.buffer.fill(0.0);
        self.filter_state = 0.0;
        self.write_pos = 0;
    }
}

/// Schroeder allpass used for diffusion.
#[derive(Debug, Clone)]
pub struct AllpassFilter {
    buffer: Box<[f32]>,
    write_pos: usize,
    gain: f32,
}

impl AllpassFilter {
    pub fn new(delay_samples: usize, gain: f32) -> Self {
        Self {
            buffer: vec![0.0; delay_samples.max(1)].into_boxed_slice(),
            write_pos: 0,
            gain: gain.clamp(0.0, 0.9),
        }
    }

    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let delayed = self.buffer[self.write_pos];
        let v = input + self.gain * delayed;
        self.buffer[self.write_pos] = v;

        self.write_pos = (self.write_pos + 1) % self.buffer.len();

        delayed - self.gain * v
    }

    pub fn reset(&mut self) {
        self.buffer.fill(0.0);
        self.write_pos = 0;
    }
}

fn combs<const N: usize>(lengths: [usize; N], sample_rate: f32) -> [CombFilter; N] {
    lengths.map(|length| CombFilter::new(scaled_length(length, sample_rate)))
}

fn allpasses<const N: usize>(
    lengths: [usize; N],
    gain: f32,
    sample_rate: f32,
) -> [AllpassFilter; N] {
    lengths.map(|length| AllpassFilter::new(scaled_length(length, sample_rate), gain))
}

fn set_comb_t60(combs: &mut [CombFilter], t60: f32, sample_rate: f32) {
    for comb in combs {
        let feedback = t60_feedback(comb.delay_samples(), t60, sample_rate);
        comb.set_feedback(feedback);
    }
}

#[derive(Debug, Clone)]
struct PrcReverb {
    allpasses: [AllpassFilter; 2],
    combs: [CombFilter; 2],
}

impl PrcReverb {
    fn new(sample_rate: f32) -> Self {
        Self {
            allpasses: allpasses(PRC_ALLPASSES, DIFFUSION_GAIN, sample_rate),
            combs: combs(PRC_COMBS, sample_rate),
        }
    }

    fn tick(&mut self, input: f32) -> f32 {
        let mut x = input;
        for allpass in &mut self.allpasses {
            x = allpass.process(x);
        }
        let mut out = 0.0;
        for comb in &mut self.combs {
            out += comb.process(x);
        }
        out * 0.5
    }

    fn reset(&mut self) {
        self.allpasses.iter_mut().for_each(AllpassFilter::reset);
        self.combs.iter_mut().for_each(CombFilter::reset);
    }
}

#[derive(Debug, Clone)]
struct JcReverb {
    allpasses: [AllpassFilter; 3],
    combs: [CombFilter; 4],
    output: DelayLine,
    output_delay: usize,
}

impl JcReverb {
    fn new(sample_rate: f32) -> Self {
        let output_delay = scaled_length(JC_OUTPUT_DELAY, sample_rate);
        Self {
            allpasses: allpasses(JC_ALLPASSES, DIFFUSION_GAIN, sample_rate),
            combs: combs(JC_COMBS, sample_rate),
            output: DelayLine::with_capacity(output_delay),
            output_delay,
        }
    }

    fn tick(&mut self, input: f32) -> f32 {
        let mut x = input;
        for allpass in &mut self.allpasses {
            x = allpass.process(x);
        }
        let mut sum = 0.0;
        for comb in &mut self.combs {
            sum += comb.process(x);
        }
        self.output.next_sample(sum * 0.25, self.output_delay)
    }

    fn reset(&mut self) {
        self.allpasses.iter_mut().for_each(AllpassFilter::reset);
        self.combs.iter_mut().for_each(CombFilter::reset);
        self.output.reset();
    }
}

#[derive(Debug, Clone)]
struct NReverb {
    combs: [CombFilter; 6],
    allpasses: [AllpassFilter; 3],
    lowpass_state: f32,
    output_allpass: AllpassFilter,
}

impl NReverb {
    fn new(sample_rate: f32) -> Self {
        Self {
            combs: combs(N_COMBS, sample_rate),
            allpasses: allpasses(N_ALLPASSES, DIFFUSION_GAIN, sample_rate),
            lowpass_state: 0.0,
            output_allpass: AllpassFilter::new(
                scaled_length(N_OUTPUT_ALLPASS, sample_rate),
                DIFFUSION_GAIN,
            ),
        }
    }

    fn tick(&mut self, input: f32) -> f32 {
        let mut x = 0.0;
        for comb in &mut self.combs {
            x += comb.process(input);
        }
        x /= N_COMBS.len() as f32;

        for allpass in &mut self.allpasses {
            x = allpass.process(x);
        }

        self.lowpass_state = N_LOWPASS_POLE * self.lowpass_state + (1.0 - N_LOWPASS_POLE) * x;
        self.output_allpass.process(self.lowpass_state)
    }

    fn reset(&mut self) {
        self.combs.iter_mut().for_each(CombFilter::reset);
        self.allpasses.iter_mut().for_each(AllpassFilter::reset);
        self.lowpass_state = 0.0;
        self.output_allpass.reset();
    }
}

#[derive(Debug, Clone)]
struct FreeReverb {
    combs: [CombFilter; 8],
    allpasses: [AllpassFilter; 4],
}

impl FreeReverb {
    fn new(sample_rate: f32) -> Self {
        let mut combs = combs(FREE_COMBS, sample_rate);
        for comb in &mut combs {
            comb.set_damp(FREE_DAMPING);
        }
        Self {
            combs,
            allpasses: allpasses(FREE_ALLPASSES, FREE_ALLPASS_GAIN, sample_rate),
        }
    }

    fn set_room_size(&mut self, size: f32) {
        let feedback = 0.7 + size.clamp(0.0, 1.0) * 0.28; // 0.7 to 0.98
        for comb in &mut self.combs {
            comb.set_feedback(feedback);
        }
    }

    fn tick(&mut self, input: f32) -> f32 {
        let mut out = 0.0;
        for comb in &mut self.combs {
            out += comb.process(input);
        }
        out /= FREE_COMBS.len() as f32;

        for allpass in &mut self.allpasses {
            out = allpass.process(out);
        }
        out
    }

    fn reset(&mut self) {
        self.combs.iter_mut().for_each(CombFilter::reset);
        self.allpasses.iter_mut().for_each(AllpassFilter::reset);
    }
}

/// All four algorithms, one of them selected.
///
/// `tick` returns the wet signal only; the caller blends it with the dry
/// input.
#[derive(Debug, Clone)]
pub struct Reverb {
    kind: ReverbKind,
    size: f32,
    sample_rate: f32,
    prc: PrcReverb,
    jc: JcReverb,
    n: NReverb,
    free: FreeReverb,
}

impl Reverb {
    pub fn new(sample_rate: f32) -> Self {
        let mut reverb = Self {
            kind: ReverbKind::default(),
            size: DEFAULT_REVERB_SIZE,
            sample_rate,
            prc: PrcReverb::new(sample_rate),
            jc: JcReverb::new(sample_rate),
            n: NReverb::new(sample_rate),
            free: FreeReverb::new(sample_rate),
        };
        reverb.set_size(DEFAULT_REVERB_SIZE);
        reverb
    }

    /// Select an algorithm and clear the state of all of them.
    pub fn set_kind(&mut self, kind: ReverbKind) {
        self.kind = kind;
        self.reset();
    }

    pub fn kind(&self) -> ReverbKind {
        self.kind
    }

    /// Room size in `0.0 ..= 1.0` (clamped), applied to every algorithm.
    pub fn set_size(&mut self, size: f32) {
        self.size = size.clamp(0.0, 1.0);
        let t60 = size_to_t60(self.size);

        set_comb_t60(&mut self.prc.combs, t60, self.sample_rate);
        set_comb_t60(&mut self.jc.combs, t60, self.sample_rate);
        set_comb_t60(&mut self.n.combs, t60, self.sample_rate);
        self.free.set_room_size(self.size);
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    #[inline]
    pub fn tick(&mut self, input: f32) -> f32 {
        match self.kind {
            ReverbKind::Prc => self.prc.tick(input),
            ReverbKind::Jc => self.jc.tick(input),
            ReverbKind::N => self.n.tick(input),
            ReverbKind::Free => self.free.tick(input),
        }
    }

    pub fn reset(&mut self) {
        self.prc.reset();
        self.jc.reset();
        self.n.reset();
        self.free.reset();
    }
}
