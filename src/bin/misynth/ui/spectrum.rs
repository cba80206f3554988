//! Log-frequency spectrum of the output.
//!
//! Each display band covers a range of FFT bins between two log-spaced edges
//! and shows the loudest bin in it, so high bands (many bins) don't flicker
//! and low bands (a bin or less) still show something. Falling bands decay
//! rather than snapping down.

use std::sync::Arc;

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};
use rustfft::{num_complex::Complex, Fft, FftPlanner};

const BANDS: usize = 64;
const FLOOR_DB: f64 = -100.0;
/// Per-frame fall of a band, in dB.
const FALL_DB: f64 = 3.0;

pub struct SpectrumAnalyzer {
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    scratch: Vec<Complex<f32>>,
    /// Half-open FFT bin range of each band.
    bands: Vec<(usize, usize)>,
    /// `(log10 centre frequency, level dB)` per band.
    spectrum: Vec<(f64, f64)>,
}

impl SpectrumAnalyzer {
    pub fn new(size: usize, sample_rate: f32) -> Self {
        let fft = FftPlanner::<f32>::new().plan_fft_forward(size);

        let window = (0..size)
            .map(|i| {
                let phase = 2.0 * std::f32::consts::PI * i as f32 / size.max(2) as f32;
                0.5 - 0.5 * phase.cos()
            })
            .collect();

        let half = (size / 2).max(1);
        let bin_hz = sample_rate as f64 / size.max(1) as f64;
        let low = 20.0f64;
        let high = (sample_rate as f64 / 2.0).clamp(low + 1.0, 20_000.0);
        let edge = |i: usize| low * (high / low).powf(i as f64 / BANDS as f64);

        let mut bands = Vec::with_capacity(BANDS);
        let mut spectrum = Vec::with_capacity(BANDS);
        for i in 0..BANDS {
            let start = ((edge(i) / bin_hz) as usize).min(half - 1);
            let end = ((edge(i + 1) / bin_hz).ceil() as usize).clamp(start + 1, half);
            bands.push((start, end));
            spectrum.push(((edge(i) * edge(i + 1)).sqrt().log10(), FLOOR_DB));
        }

        Self {
            fft,
            window,
            scratch: vec![Complex::new(0.0, 0.0); size],
            bands,
            spectrum,
        }
    }

    pub fn update(&mut self, samples: &[f32]) {
        if samples.len() != self.window.len() {
            return;
        }

        for ((bin, &s), &w) in self.scratch.iter_mut().zip(samples).zip(&self.window) {
            *bin = Complex::new(s * w, 0.0);
        }
        self.fft.process(&mut self.scratch);

        let norm = 2.0 / self.window.len() as f32;
        for (&(start, end), (_, level)) in self.bands.iter().zip(self.spectrum.iter_mut()) {
            let peak = self.scratch[start..end]
                .iter()
                .map(|c| c.norm() * norm)
                .fold(0.0f32, f32::max);
            let db = (20.0 * (peak.max(1e-6) as f64).log10()).max(FLOOR_DB);
            *level = db.max(*level - FALL_DB);
        }
    }

    pub fn data(&self) -> &[(f64, f64)] {
        &self.spectrum
    }
}

pub fn render_spectrum(frame: &mut Frame, area: Rect, spectrum: &[(f64, f64)]) {
    let (lo, hi) = match (spectrum.first(), spectrum.last()) {
        (Some(&(lo, _)), Some(&(hi, _))) => (lo, hi),
        _ => (1.0, 4.3),
    };

    let dataset = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Green))
        .data(spectrum);

    let chart = Chart::new(vec![dataset])
        .block(Block::default().title(" Spectrum ").borders(Borders::ALL))
        .x_axis(
            Axis::default()
                .bounds([lo, hi])
                .labels(vec!["20", "200", "2k", "20k"])
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([FLOOR_DB, 0.0])
                .labels(vec!["-100", "-50", "0"])
                .style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(chart, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sine_peaks_in_its_band() {
        let size = 1024;
        let sample_rate = 48_000.0;
        let hz = 1_500.0;
        let sine: Vec<f32> = (0..size)
            .map(|i| (2.0 * std::f32::consts::PI * hz * i as f32 / sample_rate).sin())
            .collect();

        let mut analyzer = SpectrumAnalyzer::new(size, sample_rate);
        analyzer.update(&sine);

        let (loudest, _) = analyzer
            .data()
            .iter()
            .enumerate()
            .max_by(|a, b| a.1 .1.total_cmp(&b.1 .1))
            .unwrap();
        let centre = 10f64.powf(analyzer.data()[loudest].0);
        assert!((centre / hz as f64).log2().abs() < 0.5, "peak at {centre} Hz");
    }

    #[test]
    fn levels_fall_gradually() {
        let mut analyzer = SpectrumAnalyzer::new(256, 48_000.0);
        let loud: Vec<f32> = (0..256).map(|i| if i % 2 == 0 { 1.0 } else { -1.0 }).collect();
        analyzer.update(&loud);
        let before: Vec<f64> = analyzer.data().iter().map(|&(_, db)| db).collect();

        analyzer.update(&[0.0; 256]);
        for (&(_, after), before) in analyzer.data().iter().zip(before) {
            assert!(after >= (before - FALL_DB).max(FLOOR_DB) - 1e-9);
        }
    }
}
