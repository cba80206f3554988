//! Status bar: device, controller, synth settings and output level.

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::{SessionInfo, UiSnapshot};

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

pub fn render_status(
    frame: &mut Frame,
    area: Rect,
    session: &SessionInfo,
    snapshot: Option<&UiSnapshot>,
    octave: u8,
    stats: &AudioStats,
) {
    let block = Block::default().title(" misynth ").borders(Borders::ALL);

    let midi = match &session.midi_port {
        Some(port) => format!("{port} ({})  ", session.layout),
        None => "no MIDI  ".to_owned(),
    };

    let mut spans = vec![
        Span::styled(
            format!(" {:.1}kHz x{}  ", session.sample_rate / 1000.0, session.channels),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(midi, Style::default().fg(Color::Cyan)),
        Span::styled(format!("Oct {octave}  "), Style::default().fg(Color::White)),
    ];

    if let Some(s) = snapshot {
        spans.push(Span::styled(
            format!("Voices {}/{}  ", s.active_voices, s.voice_count),
            Style::default().fg(if s.active_voices > 0 {
                Color::Green
            } else {
                Color::White
            }),
        ));
        spans.push(Span::styled(
            format!(
                "LP {:.0}Hz q{:.2}  {}  Pan {:.2}  Vol {:.2}  ",
                s.cutoff,
                s.resonance,
                s.reverb.name(),
                s.pan,
                s.volume
            ),
            Style::default().fg(Color::Yellow),
        ));
    }

    spans.push(Span::styled(
        format!("Peak: {:.2}  RMS: {:.2}", stats.peak, stats.rms),
        Style::default().fg(if stats.peak > 1.0 {
            Color::Red
        } else {
            Color::Magenta
        }),
    ));

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}
