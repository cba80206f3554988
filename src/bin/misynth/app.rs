use std::sync::mpsc;

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use log::{error, info, warn};
use misynth::{
    dsp::mix::pan_gains,
    io::control::{ControlLayout, ControlMap},
    SynthConfig, SynthEngine, MAX_BLOCK_SIZE,
};
use rtrb::RingBuffer;

use crate::{
    midi,
    ui::{SessionInfo, UiApp, UiSnapshot, VIS_BUFFER_SIZE},
};

/// Output gain applied on start-up, leaving a little headroom.
const PLAYER_VOLUME: f32 = 0.9;

pub struct Player {
    midi_port: Option<String>,
    layout: Option<String>,
    config: SynthConfig,
}

impl Player {
    pub fn new() -> Self {
        Self {
            midi_port: None,
            layout: None,
            config: SynthConfig::default(),
        }
    }

    /// Pick a MIDI port by index or by part of its name.
    pub fn midi_port(mut self, port: Option<String>) -> Self {
        self.midi_port = port;
        self
    }

    /// Force a controller layout by name instead of guessing from the port.
    pub fn layout(mut self, layout: Option<String>) -> Self {
        self.layout = layout;
        self
    }

    fn pick_layout(&self, port_name: Option<&str>) -> ControlLayout {
        if let Some(name) = self.layout.as_deref() {
            match ControlLayout::from_name(name) {
                Some(layout) => return layout,
                None => warn!("unknown controller layout {name:?}, guessing from port"),
            }
        }
        port_name
            .and_then(ControlLayout::detect)
            .unwrap_or(ControlLayout::Knobule)
    }

    /// Open audio and MIDI, then hand the terminal to the UI until it quits.
    pub fn run(self) -> EyreResult<()> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| eyre!("no default output device available"))?;
        let stream_config = device
            .default_output_config()
            .wrap_err("failed to fetch default output config")?;

        let sample_rate = stream_config.sample_rate().0 as f32;
        let channels = stream_config.channels() as usize;
        info!("output: {sample_rate} Hz, {channels} channels");

        let (mut engine, mut controller) =
            SynthEngine::new(self.config.with_sample_rate(sample_rate))
                .wrap_err("failed to build synth")?;
        controller
            .set_volume(PLAYER_VOLUME)
            .wrap_err("failed to set initial volume")?;

        let (mut scope_tx, scope_rx) = RingBuffer::<f32>::new(VIS_BUFFER_SIZE * 8);
        let (mut state_tx, state_rx) = RingBuffer::<UiSnapshot>::new(16);

        let mut render_buf = vec![0.0f32; MAX_BLOCK_SIZE];
        let stream = device.build_output_stream(
            &stream_config.into(),
            move |data: &mut [f32], _| {
                for frame_block in data.chunks_mut(MAX_BLOCK_SIZE * channels) {
                    let frames = frame_block.len() / channels;
                    let block = &mut render_buf[..frames];
                    engine.render_block(block);

                    let (left, right) = pan_gains(engine.stereo_pan());
                    for (frame, &sample) in frame_block.chunks_mut(channels).zip(block.iter()) {
                        match frame {
                            [mono] => *mono = sample,
                            [l, r, rest @ ..] => {
                                *l = sample * left;
                                *r = sample * right;
                                rest.fill(sample);
                            }
                            [] => {}
                        }
                        // The scope is best effort; a full ring just drops samples.
                        let _ = scope_tx.push(sample);
                    }
                }
                let _ = state_tx.push(UiSnapshot::capture(engine.synth()));
            },
            |err| error!("audio stream error: {err}"),
            None,
        )?;
        stream.play()?;

        let (midi_tx, midi_rx) = mpsc::channel();
        let link = match midi::connect(self.midi_port.as_deref(), midi_tx) {
            Ok(link) => link,
            Err(err) => {
                warn!("continuing without MIDI: {err:#}");
                None
            }
        };
        let port_name = link.as_ref().map(|link| link.port_name().to_owned());
        let layout = self.pick_layout(port_name.as_deref());
        info!("controller layout: {layout:?}");

        let session = SessionInfo {
            sample_rate,
            channels,
            midi_port: port_name,
            layout: layout.name(),
        };

        let mut terminal = ratatui::init();
        let result = UiApp::new(
            controller,
            ControlMap::new(layout),
            midi_rx,
            scope_rx,
            state_rx,
            session,
        )
        .run(&mut terminal);
        ratatui::restore();

        drop(link);
        result
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}
