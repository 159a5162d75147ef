//! Tract profile widget
//!
//! Diameters along the tract from glottis (left) to lips (right). The nasal
//! branch hangs below the axis from the velum onward; touches are marked
//! where they sit.

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};

use tract_dsp::{articulation::Articulator, dsp::tract::TractLayout};

use super::state::AudioStatus;

const TOP: f64 = 3.5;
const BOTTOM: f64 = -2.0;

pub fn render_tract(
    frame: &mut Frame,
    area: Rect,
    status: &AudioStatus,
    targets: &[f64],
    articulator: &Articulator,
) {
    let layout: &TractLayout = articulator.layout();
    let block = Block::default()
        .title(format!(
            " Tract  tongue {:.1}/{:.2}  velum {:.2} ",
            articulator.tongue().index,
            articulator.tongue().diameter,
            status.velum
        ))
        .borders(Borders::ALL);

    let live: Vec<(f64, f64)> = status
        .diameters()
        .iter()
        .enumerate()
        .map(|(i, &d)| (i as f64, d))
        .collect();
    let target: Vec<(f64, f64)> = targets
        .iter()
        .enumerate()
        .map(|(i, &d)| (i as f64, d))
        .collect();
    let nose: Vec<(f64, f64)> = (0..layout.nose_length)
        .map(|i| {
            let d = if i == 0 { status.velum } else { layout.nose_rest_diameter(i) };
            ((layout.nose_start + i) as f64, -0.8 - 0.6 * d)
        })
        .collect();
    let touches: Vec<(f64, f64)> = articulator
        .touches()
        .alive()
        .map(|t| (t.index, t.diameter.clamp(BOTTOM, TOP)))
        .collect();

    let datasets = vec![
        Dataset::default()
            .name("target")
            .marker(symbols::Marker::Dot)
            .graph_type(GraphType::Scatter)
            .style(Style::default().fg(Color::DarkGray))
            .data(&target),
        Dataset::default()
            .name("diameter")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Yellow))
            .data(&live),
        Dataset::default()
            .name("nose")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Magenta))
            .data(&nose),
        Dataset::default()
            .name("touch")
            .marker(symbols::Marker::Block)
            .graph_type(GraphType::Scatter)
            .style(Style::default().fg(Color::Red))
            .data(&touches),
    ];

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .title("glottis → lips")
                .bounds([0.0, layout.n as f64])
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([BOTTOM, TOP])
                .labels(vec!["nose", "0", "3.5"])
                .style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(chart, area);
}
