#![cfg(feature = "rtrb")]

use std::thread;

use misynth::{
    dsp::{ReverbKind, WaveShape},
    SynthConfig, SynthEngine, SynthError, SynthMessage,
};

#[test]
fn controller_on_another_thread_drives_the_engine() {
    let (mut engine, mut controller) = SynthEngine::new(SynthConfig::default()).unwrap();

    let sender = thread::spawn(move || {
        controller.set_wave_shape(1, WaveShape::Square).unwrap();
        controller.set_reverb_type(ReverbKind::Jc).unwrap();
        controller.note_on(60, 100).unwrap();
        controller.note_on(64, 100).unwrap();
        controller
    });
    let mut controller = sender.join().unwrap();

    let mut block = vec![0.0; 256];
    engine.render_block(&mut block);

    let synth = engine.synth();
    assert_eq!(synth.active_voices(), 2);
    assert_eq!(synth.effects().reverb().kind(), ReverbKind::Jc);
    assert_eq!(
        synth.voice(0).unwrap().oscillator(1).unwrap().shape(),
        WaveShape::Square
    );
    assert!(block.iter().any(|&s| s != 0.0));

    controller.all_notes_off().unwrap();
    engine.tick();
    assert_eq!(engine.synth().active_voices(), 0);
}

#[test]
fn controller_rejects_what_the_engine_cannot_hold() {
    let config = SynthConfig::default().with_lfos(1).with_max_echo_seconds(0.5);
    let (_engine, mut controller) = SynthEngine::new(config).unwrap();
    let capacity = config.max_echo_samples();

    assert_eq!(
        controller.send(SynthMessage::SetLfoDepth { lfo: 1, depth: 0.5 }),
        Err(SynthError::LfoIndex { index: 1, count: 1 })
    );
    assert_eq!(
        controller.set_echo_length(capacity + 1),
        Err(SynthError::EchoLength {
            requested: capacity + 1,
            capacity
        })
    );
    assert!(controller.set_echo_length(capacity).is_ok());
}
