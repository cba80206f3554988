/// Fixed-capacity delay line.
///
/// The buffer is allocated once in [`DelayLine::with_capacity`] and never
/// resized. Delays longer than the capacity are clamped here; callers that
/// must not clamp (the echo) validate lengths before they reach the audio
/// path.
#[derive(Debug, Clone)]
pub struct DelayLine {
    buffer: Box<[f32]>,
    write_pos: usize,
}

impl DelayLine {
    /// A line able to delay by up to `max_delay` samples.
    pub fn with_capacity(max_delay: usize) -> Self {
        Self {
            buffer: vec![0.0; max_delay + 1].into_boxed_slice(),
            write_pos: 0,
        }
    }

    /// Longest delay, in samples, this line can produce.
    pub fn capacity(&self) -> usize {
        self.buffer.len() - 1
    }

    /// Write `sample`, then read the sample written `delay_samples` ago.
    /// A delay of zero returns `sample` itself.
    #[inline]
    pub fn next_sample(&mut self, sample: f32, delay_samples: usize) -> f32 {
        let len = self.buffer.len();
        let delay_samples = delay_samples.min(len - 1);

        self.buffer[self.write_pos] = sample;

        let read_pos = (self.write_pos + len - delay_samples) % len;
        let delayed = self.buffer[read_pos];

        self.write_pos = (self.write_pos + 1) % len;

        delayed
    }

    pub fn reset(&mut self) {
        self.buffer.fill(0.0);
        self.write_pos = 0;
    }
}
