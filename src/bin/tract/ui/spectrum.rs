//! Spectrum widget
//!
//! Linear frequency axis up to 5 kHz, where the voice fundamental and the
//! first formants live. Magnitudes are smoothed across frames so formant
//! bumps stay readable while the glottal jitter moves the harmonics.

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};
use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::sync::Arc;

const MAX_DISPLAY_HZ: f64 = 5_000.0;
const FLOOR_DB: f64 = -100.0;
/// Weight of the previous frame in the running average
const SMOOTHING: f64 = 0.7;

pub struct SpectrumAnalyzer {
    window: Vec<f32>,
    fft: Arc<dyn Fft<f32>>,
    scratch: Vec<Complex<f32>>,
    /// (frequency_hz, magnitude_db) for every displayed FFT bin
    spectrum: Vec<(f64, f64)>,
}

impl SpectrumAnalyzer {
    pub fn new(buffer_len: usize, sample_rate: f64) -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(buffer_len);

        let denom = buffer_len.saturating_sub(1).max(1) as f32;
        let window = (0..buffer_len)
            .map(|i| 0.5 * (1.0 - (2.0 * std::f32::consts::PI * i as f32 / denom).cos()))
            .collect();

        let bin_hz = sample_rate / buffer_len.max(1) as f64;
        let bins = ((MAX_DISPLAY_HZ / bin_hz) as usize).clamp(1, buffer_len / 2);
        let spectrum = (0..bins).map(|k| (k as f64 * bin_hz, FLOOR_DB)).collect();

        Self {
            window,
            fft,
            scratch: vec![Complex::new(0.0, 0.0); buffer_len],
            spectrum,
        }
    }

    /// Fold a new frame into the running spectrum. Frames of the wrong
    /// length are ignored.
    pub fn update(&mut self, buffer: &[f32]) {
        if buffer.len() != self.window.len() {
            return;
        }

        for ((bin, &sample), &w) in self.scratch.iter_mut().zip(buffer).zip(&self.window) {
            *bin = Complex::new(sample * w, 0.0);
        }
        self.fft.process(&mut self.scratch);

        for ((_, db), bin) in self.spectrum.iter_mut().zip(&self.scratch) {
            let power = f64::from(bin.norm_sqr()).max(1e-12);
            let fresh = (10.0 * power.log10()).max(FLOOR_DB);
            *db = SMOOTHING * *db + (1.0 - SMOOTHING) * fresh;
        }
    }

    pub fn data(&self) -> &[(f64, f64)] {
        &self.spectrum
    }

    /// Frequency of the strongest bin above `min_hz`.
    pub fn peak_frequency(&self, min_hz: f64) -> Option<f64> {
        self.spectrum
            .iter()
            .filter(|(f, _)| *f >= min_hz)
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(f, _)| *f)
    }
}

pub fn render_spectrum(frame: &mut Frame, area: Rect, spectrum: &[(f64, f64)]) {
    let block = Block::default().title(" Spectrum ").borders(Borders::ALL);

    let dataset = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Green))
        .data(spectrum);

    let top_db = spectrum.iter().map(|(_, db)| *db).fold(FLOOR_DB, f64::max);

    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([0.0, MAX_DISPLAY_HZ])
                .labels(vec!["0", "1k", "2k", "3k", "4k", "5k"])
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([FLOOR_DB, top_db.max(0.0) + 10.0])
                .labels(vec!["-100", "-50", "0"])
                .style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(chart, area);
}
