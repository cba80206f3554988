//! Computer keyboard as a one-octave piano.
//!
//! Terminals report key presses but not releases, so a note key toggles:
//! the first press starts the note, the next press releases it.
//!
//! ```text
//!    w e   t y u
//!   a s d f g h j k
//!   C D E F G A B C
//! ```

use misynth::dsp::ReverbKind;

const PIANO_KEYS: &str = "awsedftgyhujk";
const MAX_OCTAVE: u8 = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    NoteOn(u8),
    NoteOff(u8),
    Octave(u8),
    Reverb(ReverbKind),
    AllNotesOff,
}

#[derive(Debug)]
pub struct Keyboard {
    octave: u8,
    held: [bool; 128],
}

impl Keyboard {
    pub fn new() -> Self {
        Self {
            octave: 4,
            held: [false; 128],
        }
    }

    pub fn octave(&self) -> u8 {
        self.octave
    }

    pub fn held_count(&self) -> usize {
        self.held.iter().filter(|&&held| held).count()
    }

    pub fn press(&mut self, key: char) -> Option<KeyAction> {
        if let Some(offset) = PIANO_KEYS.find(key) {
            let note = 12 * (self.octave + 1) + offset as u8;
            if note > 127 {
                return None;
            }
            let held = &mut self.held[note as usize];
            *held = !*held;
            return Some(if *held {
                KeyAction::NoteOn(note)
            } else {
                KeyAction::NoteOff(note)
            });
        }

        match key {
            '[' if self.octave > 0 => {
                self.octave -= 1;
                Some(KeyAction::Octave(self.octave))
            }
            ']' if self.octave < MAX_OCTAVE => {
                self.octave += 1;
                Some(KeyAction::Octave(self.octave))
            }
            '1'..='4' => {
                let selector = key as i32 - '1' as i32;
                Some(KeyAction::Reverb(ReverbKind::from_selector(selector)))
            }
            ' ' => {
                self.held = [false; 128];
                Some(KeyAction::AllNotesOff)
            }
            _ => None,
        }
    }
}
