//! Controller-number to synth-parameter mapping.
//!
//! A [`ControlMap`] is plain data: a list of `(controller, target)` bindings
//! plus the last value of every parameter that the synth only accepts in
//! groups (`set_filter` takes cutoff and resonance together, `set_adsr`
//! all four stages). Turning one knob re-sends the whole group with the
//! other members unchanged.

use log::trace;

use crate::{
    io::converter::{cc_to_cutoff, cc_to_envelope, cc_to_level, cc_to_wave_shape},
    synth::message::SynthMessage,
};

/// What a controller knob drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlTarget {
    FilterCutoff,
    FilterResonance,
    FilterMix,
    WaveShape(usize),
    OscVolume(usize),
    Attack,
    Decay,
    Sustain,
    Release,
    Volume,
}

/// Built-in knob layouts for the two controllers the player knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlLayout {
    /// Knobule: filter, per-oscillator shape and level, ADSR, master volume.
    Knobule,
    /// AKAI MPK mini: mod wheel cutoff, shapes on 2-4, ADSR on 5-8.
    MpkMini,
}

impl ControlLayout {
    /// Pick a layout by name (`knobule`, `mpk`), case-insensitive.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "knobule" => Some(ControlLayout::Knobule),
            "mpk" | "mpkmini" | "mpk-mini" => Some(ControlLayout::MpkMini),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ControlLayout::Knobule => "Knobule",
            ControlLayout::MpkMini => "MPK mini",
        }
    }

    /// Guess a layout from a MIDI port name.
    pub fn detect(port_name: &str) -> Option<Self> {
        if port_name.contains("Knobule") {
            Some(ControlLayout::Knobule)
        } else if port_name.contains("MPK") {
            Some(ControlLayout::MpkMini)
        } else {
            None
        }
    }

    fn bindings(self) -> &'static [(u8, ControlTarget)] {
        use ControlTarget::*;
        match self {
            ControlLayout::Knobule => &[
                (24, FilterResonance),
                (29, FilterCutoff),
                (28, FilterMix),
                (1, WaveShape(0)),
                (4, WaveShape(1)),
                (7, WaveShape(2)),
                (2, OscVolume(0)),
                (5, OscVolume(1)),
                (8, OscVolume(2)),
                (21, Attack),
                (22, Decay),
                (26, Sustain),
                (23, Release),
                (27, Volume),
            ],
            ControlLayout::MpkMini => &[
                (1, FilterCutoff),
                (2, WaveShape(0)),
                (3, WaveShape(1)),
                (4, WaveShape(2)),
                (5, Attack),
                (6, Decay),
                (7, Sustain),
                (8, Release),
            ],
        }
    }
}

#[derive(Debug, Clone)]
pub struct ControlMap {
    layout: ControlLayout,
    bindings: Vec<(u8, ControlTarget)>,
    cutoff: f32,
    resonance: f32,
    adsr: [f32; 4],
}

impl ControlMap {
    pub fn new(layout: ControlLayout) -> Self {
        Self {
            layout,
            bindings: layout.bindings().to_vec(),
            cutoff: 440.0,
            resonance: 0.5,
            adsr: [0.01, 0.2, 0.5, 0.5],
        }
    }

    pub fn layout(&self) -> ControlLayout {
        self.layout
    }

    /// Bind (or rebind) `controller` to `target`.
    pub fn bind(&mut self, controller: u8, target: ControlTarget) {
        match self.bindings.iter_mut().find(|(cc, _)| *cc == controller) {
            Some(binding) => binding.1 = target,
            None => self.bindings.push((controller, target)),
        }
    }

    pub fn target(&self, controller: u8) -> Option<ControlTarget> {
        self.bindings
            .iter()
            .find(|(cc, _)| *cc == controller)
            .map(|&(_, target)| target)
    }

    /// Translate one control change into a synth message. Unbound
    /// controllers yield `None`.
    pub fn handle(&mut self, controller: u8, value: u8) -> Option<SynthMessage> {
        let target = self.target(controller)?;
        let msg = match target {
            ControlTarget::FilterCutoff => {
                self.cutoff = cc_to_cutoff(value);
                self.filter_message()
            }
            ControlTarget::FilterResonance => {
                self.resonance = cc_to_level(value);
                self.filter_message()
            }
            ControlTarget::FilterMix => SynthMessage::SetFilterMix(cc_to_level(value)),
            ControlTarget::WaveShape(osc) => SynthMessage::SetWaveShape {
                osc,
                shape: cc_to_wave_shape(value),
            },
            ControlTarget::OscVolume(osc) => SynthMessage::SetOscVolume {
                osc,
                volume: cc_to_level(value),
            },
            ControlTarget::Attack => self.adsr_message(0, value),
            ControlTarget::Decay => self.adsr_message(1, value),
            ControlTarget::Sustain => self.adsr_message(2, value),
            ControlTarget::Release => self.adsr_message(3, value),
            ControlTarget::Volume => SynthMessage::SetVolume(cc_to_level(value)),
        };
        trace!("cc {controller}={value} -> {msg:?}");
        Some(msg)
    }

    fn filter_message(&self) -> SynthMessage {
        SynthMessage::SetFilter {
            cutoff: self.cutoff,
            resonance: self.resonance,
        }
    }

    fn adsr_message(&mut self, stage: usize, value: u8) -> SynthMessage {
        self.adsr[stage] = cc_to_envelope(value);
        let [attack, decay, sustain, release] = self.adsr;
        SynthMessage::SetAdsr {
            attack,
            decay,
            sustain,
            release,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::oscillator::WaveShape;

    #[test]
    fn knobule_filter_knobs_keep_each_other() {
        let mut map = ControlMap::new(ControlLayout::Knobule);

        let Some(SynthMessage::SetFilter { resonance, .. }) = map.handle(24, 64) else {
            panic!("resonance knob should drive the filter");
        };
        assert!((resonance - 65.0 / 130.0).abs() < 1e-6);

        let Some(SynthMessage::SetFilter { cutoff, resonance: kept }) = map.handle(29, 0) else {
            panic!("cutoff knob should drive the filter");
        };
        assert_eq!(cutoff, 20.0);
        assert_eq!(kept, resonance);
    }

    #[test]
    fn adsr_knobs_resend_all_stages() {
        let mut map = ControlMap::new(ControlLayout::MpkMini);
        map.handle(5, 127);
        let Some(SynthMessage::SetAdsr {
            attack,
            decay,
            sustain,
            release,
        }) = map.handle(8, 12)
        else {
            panic!("release knob should send the envelope");
        };

        assert!((attack - (128.0f32 / 130.0).powi(2)).abs() < 1e-6);
        assert_eq!(decay, 0.2);
        assert_eq!(sustain, 0.5);
        assert!((release - 0.01).abs() < 1e-6);
    }

    #[test]
    fn layouts_differ_on_the_same_controller() {
        let mut knobule = ControlMap::new(ControlLayout::Knobule);
        let mut mpk = ControlMap::new(ControlLayout::MpkMini);

        assert_eq!(
            knobule.handle(1, 70),
            Some(SynthMessage::SetWaveShape {
                osc: 0,
                shape: WaveShape::Square
            })
        );
        assert!(matches!(
            mpk.handle(1, 70),
            Some(SynthMessage::SetFilter { .. })
        ));
        assert_eq!(mpk.handle(27, 70), None);
        assert_eq!(
            knobule.handle(27, 127),
            Some(SynthMessage::SetVolume(128.0 / 130.0))
        );
    }

    #[test]
    fn rebinding_replaces_existing_target() {
        let mut map = ControlMap::new(ControlLayout::MpkMini);
        map.bind(1, ControlTarget::FilterMix);
        map.bind(70, ControlTarget::Volume);

        assert_eq!(map.target(1), Some(ControlTarget::FilterMix));
        assert_eq!(map.target(70), Some(ControlTarget::Volume));
        assert_eq!(map.handle(70, 0), Some(SynthMessage::SetVolume(1.0 / 130.0)));
    }

    #[test]
    fn layout_names_and_port_detection() {
        assert_eq!(ControlLayout::from_name("Knobule"), Some(ControlLayout::Knobule));
        assert_eq!(ControlLayout::from_name(" mpk "), Some(ControlLayout::MpkMini));
        assert_eq!(ControlLayout::from_name("launchpad"), None);

        assert_eq!(ControlLayout::detect("MPKmini2"), Some(ControlLayout::MpkMini));
        assert_eq!(ControlLayout::detect("Knobule MIDI 1"), Some(ControlLayout::Knobule));
        assert_eq!(ControlLayout::detect("Midi Through"), None);
    }
}
