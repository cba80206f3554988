//! Terminal UI: voice table, scope, spectrum and a status bar.
//!
//! The UI thread owns the [`SynthController`]. Keyboard and MIDI input both
//! end up here and leave as validated messages on the control ring.

mod spectrum;
mod state;
mod status;
mod voices;
mod waveform;

use std::{sync::mpsc::Receiver, time::Duration};

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use log::warn;
use misynth::{
    io::{control::ControlMap, converter::midi_to_synth, midi::MidiEvent},
    SynthController, SynthMessage,
};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    DefaultTerminal, Frame,
};
use rtrb::Consumer;

pub use state::{SessionInfo, UiSnapshot};

use crate::keys::{KeyAction, Keyboard};
use spectrum::{render_spectrum, SpectrumAnalyzer};
use status::{render_status, AudioStats};
use voices::render_voices;
use waveform::render_waveform;

/// Samples kept for the scope and the FFT.
pub const VIS_BUFFER_SIZE: usize = 1024;

pub struct UiApp {
    controller: SynthController,
    controls: ControlMap,
    midi_rx: Receiver<MidiEvent>,
    scope_rx: Consumer<f32>,
    state_rx: Consumer<UiSnapshot>,
    session: SessionInfo,
    snapshot: Option<UiSnapshot>,
    keyboard: Keyboard,
    audio_buffer: Vec<f32>,
    spectrum: SpectrumAnalyzer,
    last_error: Option<String>,
    should_quit: bool,
}

impl UiApp {
    pub fn new(
        controller: SynthController,
        controls: ControlMap,
        midi_rx: Receiver<MidiEvent>,
        scope_rx: Consumer<f32>,
        state_rx: Consumer<UiSnapshot>,
        session: SessionInfo,
    ) -> Self {
        let spectrum = SpectrumAnalyzer::new(VIS_BUFFER_SIZE, session.sample_rate);
        Self {
            controller,
            controls,
            midi_rx,
            scope_rx,
            state_rx,
            session,
            snapshot: None,
            keyboard: Keyboard::new(),
            audio_buffer: vec![0.0; VIS_BUFFER_SIZE],
            spectrum,
            last_error: None,
            should_quit: false,
        }
    }

    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            self.poll_midi();
            self.poll_audio();
            self.poll_state();
            self.spectrum.update(&self.audio_buffer);

            terminal.draw(|frame| self.render(frame))?;

            // ~60fps; MIDI latency is bounded by this poll.
            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code);
                    }
                }
            }
        }

        // Don't leave notes hanging in the release tail of a closed stream.
        self.send(SynthMessage::AllNotesOff);
        Ok(())
    }

    fn send(&mut self, msg: SynthMessage) {
        if let Err(err) = self.controller.send(msg) {
            warn!("dropped {msg:?}: {err}");
            self.last_error = Some(err.to_string());
        }
    }

    fn poll_midi(&mut self) {
        while let Ok(event) = self.midi_rx.try_recv() {
            let msg = match event {
                MidiEvent::ControlChange {
                    controller, value, ..
                } => self.controls.handle(controller, value),
                _ => midi_to_synth(event, None),
            };
            if let Some(msg) = msg {
                self.send(msg);
            }
        }
    }

    fn poll_audio(&mut self) {
        while let Ok(sample) = self.scope_rx.pop() {
            self.audio_buffer.push(sample);
        }
        if self.audio_buffer.len() > VIS_BUFFER_SIZE {
            let excess = self.audio_buffer.len() - VIS_BUFFER_SIZE;
            self.audio_buffer.drain(..excess);
        }
    }

    fn poll_state(&mut self) {
        while let Ok(snapshot) = self.state_rx.pop() {
            self.snapshot = Some(snapshot);
        }
    }

    fn handle_key(&mut self, key: KeyCode) {
        let c = match key {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
                return;
            }
            KeyCode::Char(c) => c,
            _ => return,
        };

        match self.keyboard.press(c) {
            Some(KeyAction::NoteOn(note)) => self.send(SynthMessage::NoteOn {
                note,
                velocity: 100,
            }),
            Some(KeyAction::NoteOff(note)) => self.send(SynthMessage::NoteOff { note }),
            Some(KeyAction::Reverb(kind)) => self.send(SynthMessage::SetReverbType(kind)),
            Some(KeyAction::AllNotesOff) => self.send(SynthMessage::AllNotesOff),
            Some(KeyAction::Octave(_)) | None => {}
        }
    }

    fn render(&self, frame: &mut Frame) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // status
                Constraint::Min(8),    // body
                Constraint::Length(1), // help
            ])
            .split(frame.area());

        let stats = AudioStats::from_buffer(&self.audio_buffer);
        render_status(
            frame,
            rows[0],
            &self.session,
            self.snapshot.as_ref(),
            self.keyboard.octave(),
            &stats,
        );

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(34), Constraint::Min(20)])
            .split(rows[1]);
        render_voices(frame, body[0], self.snapshot.as_ref());

        let scopes = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(body[1]);
        render_waveform(frame, scopes[0], &self.audio_buffer);
        render_spectrum(frame, scopes[1], self.spectrum.data());

        let help = match &self.last_error {
            Some(err) => Paragraph::new(format!(" {err}")).style(Style::default().fg(Color::Red)),
            None => Paragraph::new(
                " [a-k] Notes  [[ ]] Octave  [1-4] Reverb  [Space] All off  [Q] Quit",
            )
            .style(Style::default().fg(Color::DarkGray)),
        };
        frame.render_widget(help, rows[2]);
    }
}
