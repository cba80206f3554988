//! Lock-free handoff between the control context and the audio context.
//!
//! The audio callback owns a [`SynthEngine`]; whoever handles MIDI, keys or
//! automation owns the matching [`SynthController`]. They share nothing but
//! a single-producer/single-consumer ring of [`SynthMessage`]s:
//!
//! ```text
//!   control thread                         audio thread
//!   ──────────────                         ────────────
//!   SynthController ──push──▶ [ rtrb ] ──pop──▶ SynthEngine ──tick──▶ sink
//!     validates here                        applies, never fails
//! ```
//!
//! The engine drains the ring before producing the next sample, so a change
//! lands on the very next `tick` with no locks, no torn reads and no
//! allocation on the audio side.

use log::{debug, trace};
use rtrb::{Consumer, Producer, RingBuffer};

use crate::{
    config::SynthConfig,
    dsp::{oscillator::WaveShape, reverb::ReverbKind},
    error::{Result, SynthError},
    synth::{message::SynthMessage, poly::Synth},
};

/// Default ring size: room for a burst of controller sweeps between two
/// audio callbacks.
pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

/// Audio-context half: owns the synth and drains pending messages.
pub struct SynthEngine {
    synth: Synth,
    rx: Consumer<SynthMessage>,
}

/// Control-context half: validates and enqueues messages.
pub struct SynthController {
    tx: Producer<SynthMessage>,
    config: SynthConfig,
}

impl SynthEngine {
    /// Build a synth from `config` and split it into its two halves.
    pub fn new(config: SynthConfig) -> Result<(SynthEngine, SynthController)> {
        Ok(Self::with_synth(Synth::new(config)?, DEFAULT_QUEUE_CAPACITY))
    }

    /// Wrap an existing synth with a ring of `capacity` messages.
    pub fn with_synth(synth: Synth, capacity: usize) -> (SynthEngine, SynthController) {
        let (tx, rx) = RingBuffer::new(capacity);
        let config = *synth.config();
        debug!("engine: control queue of {capacity} messages");
        (SynthEngine { synth, rx }, SynthController { tx, config })
    }

    /// Apply pending messages, then produce one sample.
    #[inline]
    pub fn tick(&mut self) -> f32 {
        self.synth.drain(&mut self.rx);
        self.synth.tick()
    }

    /// Apply pending messages once, then fill `out`.
    pub fn render_block(&mut self, out: &mut [f32]) {
        self.synth.drain(&mut self.rx);
        self.synth.render_block(out);
    }

    pub fn synth(&self) -> &Synth {
        &self.synth
    }

    pub fn stereo_pan(&self) -> f32 {
        self.synth.stereo_pan()
    }
}

impl SynthController {
    /// Validate `msg` and push it towards the audio context.
    pub fn send(&mut self, msg: SynthMessage) -> Result<()> {
        msg.validate(&self.config)?;
        self.tx.push(msg).map_err(|_| {
            debug!("control queue full, dropped {msg:?}");
            SynthError::QueueFull
        })?;
        trace!("queued {msg:?}");
        Ok(())
    }

    pub fn config(&self) -> &SynthConfig {
        &self.config
    }

    /// Free slots left in the ring.
    pub fn free_slots(&self) -> usize {
        self.tx.slots()
    }

    pub fn note_on(&mut self, note: u8, velocity: u8) -> Result<()> {
        self.send(SynthMessage::NoteOn { note, velocity })
    }

    pub fn note_off(&mut self, note: u8) -> Result<()> {
        self.send(SynthMessage::NoteOff { note })
    }

    pub fn all_notes_off(&mut self) -> Result<()> {
        self.send(SynthMessage::AllNotesOff)
    }

    pub fn set_adsr(&mut self, attack: f32, decay: f32, sustain: f32, release: f32) -> Result<()> {
        self.send(SynthMessage::SetAdsr {
            attack,
            decay,
            sustain,
            release,
        })
    }

    pub fn set_wave_shape(&mut self, osc: usize, shape: WaveShape) -> Result<()> {
        self.send(SynthMessage::SetWaveShape { osc, shape })
    }

    pub fn set_osc_volume(&mut self, osc: usize, volume: f32) -> Result<()> {
        self.send(SynthMessage::SetOscVolume { osc, volume })
    }

    pub fn set_osc_tuning(&mut self, osc: usize, ratio: f32) -> Result<()> {
        self.send(SynthMessage::SetOscTuning { osc, ratio })
    }

    pub fn set_filter(&mut self, cutoff: f32, resonance: f32) -> Result<()> {
        self.send(SynthMessage::SetFilter { cutoff, resonance })
    }

    pub fn set_filter_mix(&mut self, mix: f32) -> Result<()> {
        self.send(SynthMessage::SetFilterMix(mix))
    }

    pub fn set_echo_length(&mut self, samples: usize) -> Result<()> {
        self.send(SynthMessage::SetEchoLength(samples))
    }

    pub fn set_reverb_type(&mut self, kind: ReverbKind) -> Result<()> {
        self.send(SynthMessage::SetReverbType(kind))
    }

    pub fn set_volume(&mut self, volume: f32) -> Result<()> {
        self.send(SynthMessage::SetVolume(volume))
    }
}
