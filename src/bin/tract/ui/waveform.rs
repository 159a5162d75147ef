//! Output oscilloscope widget
//!
//! Triggered on the first rising zero crossing so successive glottal periods
//! line up frame to frame instead of scrolling.

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};

/// Vertical zoom. The voice rarely exceeds a quarter of full scale.
const Y_RANGE: f64 = 0.3;
/// Samples shown after the trigger point (about four periods at 140 Hz).
const VISIBLE_SAMPLES: usize = 1400;

fn trigger_point(samples: &[f32]) -> usize {
    let search = samples.len().saturating_sub(VISIBLE_SAMPLES);
    samples[..search.min(samples.len())]
        .windows(2)
        .position(|w| w[0] <= 0.0 && w[1] > 0.0)
        .unwrap_or(0)
}

pub fn render_waveform(frame: &mut Frame, area: Rect, audio_buffer: &[f32]) {
    let start = trigger_point(audio_buffer);
    let shown = &audio_buffer[start..audio_buffer.len().min(start + VISIBLE_SAMPLES)];

    let data: Vec<(f64, f64)> = shown
        .iter()
        .enumerate()
        .map(|(i, &s)| (i as f64, f64::from(s).clamp(-Y_RANGE, Y_RANGE)))
        .collect();

    let scope = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Cyan))
        .data(&data);

    let chart = Chart::new(vec![scope])
        .block(Block::default().title(" Output ").borders(Borders::ALL))
        .x_axis(
            Axis::default()
                .bounds([0.0, VISIBLE_SAMPLES as f64])
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([-Y_RANGE, Y_RANGE])
                .style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(chart, area);
}
