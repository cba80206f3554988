//! MIDI input: opens one port and forwards parsed events to the UI thread,
//! which owns the synth controller.

use std::sync::mpsc::Sender;

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use log::{debug, info};
use midir::{Ignore, MidiInput, MidiInputConnection};
use misynth::io::midi::MidiEvent;

/// An open input port. Dropping it closes the connection.
pub struct MidiLink {
    _connection: MidiInputConnection<()>,
    port_name: String,
}

impl MidiLink {
    pub fn port_name(&self) -> &str {
        &self.port_name
    }
}

/// Connect to the port `wanted` names, either by index or by a substring of
/// its name, or to the first port when `wanted` is `None`. Returns
/// `Ok(None)` when the system has no input ports.
pub fn connect(wanted: Option<&str>, tx: Sender<MidiEvent>) -> EyreResult<Option<MidiLink>> {
    let mut midi_in = MidiInput::new("misynth input").wrap_err("failed to open MIDI input")?;
    midi_in.ignore(Ignore::All);

    let mut ports = Vec::new();
    for port in midi_in.ports() {
        let name = midi_in
            .port_name(&port)
            .wrap_err("failed to read MIDI port name")?;
        debug!("midi port available: {name}");
        ports.push((port, name));
    }

    let chosen = match wanted {
        Some(wanted) => match wanted.parse::<usize>() {
            Ok(index) => ports.into_iter().nth(index),
            Err(_) => ports.into_iter().find(|(_, name)| name.contains(wanted)),
        }
        .ok_or_else(|| eyre!("no MIDI input port matching {wanted:?}"))?,
        None => match ports.into_iter().next() {
            Some(port) => port,
            None => return Ok(None),
        },
    };
    let (port, port_name) = chosen;

    let connection = midi_in
        .connect(
            &port,
            "misynth-in",
            move |_, raw: &[u8], _: &mut ()| {
                if let Some(event) = MidiEvent::from_raw(raw) {
                    tx.send(event).ok();
                }
            },
            (),
        )
        .map_err(|err| eyre!("failed to connect to {port_name}: {err}"))?;

    info!("listening on MIDI port {port_name}");
    Ok(Some(MidiLink {
        _connection: connection,
        port_name,
    }))
}
