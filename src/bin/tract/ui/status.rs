//! Status bar widget - voice state and output levels

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::state::AudioStatus;

/// Output level statistics for display
pub struct AudioStats {
    pub peak: f32,
    pub rms: f32,
}

impl AudioStats {
    pub fn from_buffer(buffer: &[f32]) -> Self {
        if buffer.is_empty() {
            return Self { peak: 0.0, rms: 0.0 };
        }
        let peak = buffer.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()));
        let rms = (buffer.iter().map(|&x| x * x).sum::<f32>() / buffer.len() as f32).sqrt();
        Self { peak, rms }
    }
}

pub struct VoiceFlags {
    pub always_voice: bool,
    pub auto_wobble: bool,
    pub pitch_held: bool,
}

fn flag(label: &str, on: bool) -> Span<'static> {
    Span::styled(
        format!("{label} "),
        Style::default().fg(if on { Color::Green } else { Color::DarkGray }),
    )
}

pub fn render_status(
    frame: &mut Frame,
    area: Rect,
    status: &AudioStatus,
    flags: &VoiceFlags,
    stats: &AudioStats,
    spectral_peak: Option<f64>,
) {
    let block = Block::default().title(" tract ").borders(Borders::ALL);

    let voicing_symbol = if status.intensity > 0.0 { "●" } else { "○" };
    let line = Line::from(vec![
        Span::styled(
            format!(" {voicing_symbol} {:6.1} Hz  ", status.frequency),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(
            format!("tense {:.2}  int {:.2}  ", status.tenseness, status.intensity),
            Style::default().fg(Color::White),
        ),
        flag("voice", flags.always_voice),
        flag("wobble", flags.auto_wobble),
        flag("held", flags.pitch_held),
        Span::styled(
            format!(" lips {:.2} nose {:.2}  ", status.lip_peak, status.nose_peak),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            match spectral_peak {
                Some(hz) => format!("peak {hz:.0} Hz  "),
                None => String::new(),
            },
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!("Peak: {:.2}  RMS: {:.3}", stats.peak, stats.rms),
            Style::default().fg(Color::Magenta),
        ),
    ]);

    frame.render_widget(Paragraph::new(line).block(block), area);
}
