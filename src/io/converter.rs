use crate::{dsp::oscillator::WaveShape, io::midi::MidiEvent, synth::message::SynthMessage};

/// Note events on `channel_filter` (or any channel when `None`) as synth
/// messages. Control changes go through a [`ControlMap`](crate::io::control::ControlMap).
pub fn midi_to_synth(midi: MidiEvent, channel_filter: Option<u8>) -> Option<SynthMessage> {
    if channel_filter.is_some_and(|wanted| wanted != midi.channel()) {
        return None;
    }

    match midi {
        MidiEvent::NoteOn { key, velocity, .. } => Some(SynthMessage::NoteOn {
            note: key,
            velocity,
        }),
        MidiEvent::NoteOff { key, .. } => Some(SynthMessage::NoteOff { note: key }),
        MidiEvent::ControlChange { .. } => None,
    }
}

/// Equal temperament, A4 (note 69) = 440 Hz.
pub fn midi_note_to_freq(note: u8) -> f32 {
    440.0 * 2.0_f32.powf((note as f32 - 69.0) / 12.0)
}

/// Controller value → linear level in `(0, 1)`: `(v + 1) / 130`.
pub fn cc_to_level(value: u8) -> f32 {
    (value as f32 + 1.0) / 130.0
}

/// Controller value → envelope time or sustain, squared for finer control
/// at the short end.
pub fn cc_to_envelope(value: u8) -> f32 {
    let level = cc_to_level(value);
    level * level
}

/// Controller value → filter cutoff, 20 Hz to ~9.94 kHz.
pub fn cc_to_cutoff(value: u8) -> f32 {
    20.0 + value as f32 * 10_000.0 / 128.0
}

/// Controller value → wave shape, four equal zones of 32 steps.
pub fn cc_to_wave_shape(value: u8) -> WaveShape {
    WaveShape::from_selector(value as i32 / 32)
}
