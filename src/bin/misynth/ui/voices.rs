//! Voice table: note, envelope stage and level per voice.

use misynth::dsp::EnvelopeState;
use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Row, Table},
    Frame,
};

use super::UiSnapshot;

const NOTE_NAMES: [&str; 12] = ["C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B"];
const METER_WIDTH: usize = 12;

/// `60` -> `C4`.
pub fn note_name(note: u8) -> String {
    let octave = note as i32 / 12 - 1;
    format!("{}{}", NOTE_NAMES[note as usize % 12], octave)
}

fn meter(level: f32) -> String {
    let filled = (level.clamp(0.0, 1.0) * METER_WIDTH as f32).round() as usize;
    format!("{}{}", "█".repeat(filled), "·".repeat(METER_WIDTH - filled))
}

fn stage_style(stage: EnvelopeState) -> Style {
    let color = match stage {
        EnvelopeState::Idle => Color::DarkGray,
        EnvelopeState::Attack => Color::Green,
        EnvelopeState::Decay => Color::Yellow,
        EnvelopeState::Sustain => Color::Cyan,
        EnvelopeState::Release => Color::Magenta,
    };
    Style::default().fg(color)
}

pub fn render_voices(frame: &mut Frame, area: Rect, snapshot: Option<&UiSnapshot>) {
    let rows: Vec<Row> = snapshot
        .map(UiSnapshot::shown_voices)
        .unwrap_or_default()
        .iter()
        .enumerate()
        .map(|(i, voice)| {
            let note = voice.note.map(note_name).unwrap_or_else(|| "-".to_owned());
            Row::new(vec![
                format!("{i:>2}"),
                note,
                format!("{:?}", voice.stage),
                meter(voice.level),
            ])
            .style(stage_style(voice.stage))
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(2),
            Constraint::Length(4),
            Constraint::Length(7),
            Constraint::Length(METER_WIDTH as u16),
        ],
    )
    .header(Row::new(vec!["#", "Note", "Stage", "Level"]).style(Style::default().fg(Color::White)))
    .block(Block::default().title(" Voices ").borders(Borders::ALL));

    frame.render_widget(table, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn note_names() {
        assert_eq!(note_name(60), "C4");
        assert_eq!(note_name(69), "A4");
        assert_eq!(note_name(0), "C-1");
        assert_eq!(note_name(127), "G9");
    }

    #[test]
    fn meter_is_fixed_width() {
        assert_eq!(meter(0.0).chars().count(), METER_WIDTH);
        assert_eq!(meter(2.0), "█".repeat(METER_WIDTH));
    }
}
