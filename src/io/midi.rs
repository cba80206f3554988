/// The subset of MIDI channel messages the synth reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiEvent {
    NoteOn { channel: u8, key: u8, velocity: u8 },
    NoteOff { channel: u8, key: u8, velocity: u8 },
    ControlChange { channel: u8, controller: u8, value: u8 },
}

impl MidiEvent {
    /// Parse one raw three-byte channel message.
    ///
    /// A note-on with velocity 0 is reported as a note-off, as most
    /// keyboards send it that way. Anything else (clock, sysex, pitch bend,
    /// running status) yields `None`.
    pub fn from_raw(data: &[u8]) -> Option<Self> {
        match *data {
            [status @ 0x80..=0x8f, key, velocity] => Some(MidiEvent::NoteOff {
                channel: status & 0x0f,
                key: key & 0x7f,
                velocity: velocity & 0x7f,
            }),
            [status @ 0x90..=0x9f, key, 0] => Some(MidiEvent::NoteOff {
                channel: status & 0x0f,
                key: key & 0x7f,
                velocity: 0,
            }),
            [status @ 0x90..=0x9f, key, velocity] => Some(MidiEvent::NoteOn {
                channel: status & 0x0f,
                key: key & 0x7f,
                velocity: velocity & 0x7f,
            }),
            [status @ 0xb0..=0xbf, controller, value] => Some(MidiEvent::ControlChange {
                channel: status & 0x0f,
                controller: controller & 0x7f,
                value: value & 0x7f,
            }),
            _ => None,
        }
    }

    pub fn channel(&self) -> u8 {
        match *self {
            MidiEvent::NoteOn { channel, .. }
            | MidiEvent::NoteOff { channel, .. }
            | MidiEvent::ControlChange { channel, .. } => channel,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_notes_on_any_channel() {
        assert_eq!(
            MidiEvent::from_raw(&[0x93, 60, 100]),
            Some(MidiEvent::NoteOn {
                channel: 3,
                key: 60,
                velocity: 100
            })
        );
        assert_eq!(
            MidiEvent::from_raw(&[0x80, 60, 64]),
            Some(MidiEvent::NoteOff {
                channel: 0,
                key: 60,
                velocity: 64
            })
        );
    }

    #[test]
    fn zero_velocity_note_on_is_note_off() {
        assert!(matches!(
            MidiEvent::from_raw(&[0x90, 64, 0]),
            Some(MidiEvent::NoteOff { key: 64, .. })
        ));
    }

    #[test]
    fn parses_control_change() {
        let event = MidiEvent::from_raw(&[0xb1, 29, 127]).unwrap();
        assert_eq!(
            event,
            MidiEvent::ControlChange {
                channel: 1,
                controller: 29,
                value: 127
            }
        );
        assert_eq!(event.channel(), 1);
    }

    #[test]
    fn ignores_everything_else() {
        assert_eq!(MidiEvent::from_raw(&[0xe0, 0x00, 0x40]), None); // pitch bend
        assert_eq!(MidiEvent::from_raw(&[0xf8]), None); // clock
        assert_eq!(MidiEvent::from_raw(&[0x90, 60]), None); // truncated
        assert_eq!(MidiEvent::from_raw(&[]), None);
    }
}
