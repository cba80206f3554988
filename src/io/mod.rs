// Purpose - external interfaces: MIDI parsing, value conversions, controller layouts

pub mod control;
pub mod converter;
pub mod midi;
