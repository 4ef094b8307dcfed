//! Session replay through the full application

use pose_piano::{
    app::PianoApp,
    audio::{spawn_audio_sink, NullAudio},
    config::Config,
    constants::DEFAULT_MELODY,
    session::{synthesize_performance, RecordedFrame, Session},
};
use std::sync::{Arc, Mutex};

fn playable_notes() -> usize {
    DEFAULT_MELODY.iter().filter(|&&n| n != 0).count()
}

#[test]
fn test_full_round_of_default_melody() {
    let config = Config::default();
    let notes = playable_notes();
    let session = synthesize_performance(&config, notes).unwrap();
    let mut app = PianoApp::new(&config, Box::new(NullAudio)).unwrap();

    let summary = app.run(&session);

    assert_eq!(summary.triggers, notes);
    assert_eq!(summary.matched_notes, notes);
    assert_eq!(summary.rounds_completed, 1);
    assert_eq!(app.engine().sequencer().current_index(), 0);
}

#[test]
fn test_demo_works_for_every_orientation() {
    for (flip, rotation) in [(false, 0.0), (true, 0.0), (false, 90.0), (true, 270.0)] {
        let mut config = Config::default();
        config.display.flip = flip;
        config.display.rotation_degrees = rotation;

        let session = synthesize_performance(&config, 12).unwrap();
        let mut app = PianoApp::new(&config, Box::new(NullAudio)).unwrap();
        let summary = app.run(&session);

        assert_eq!(summary.matched_notes, 12, "flip={flip} rotation={rotation}");
    }
}

#[test]
fn test_audio_sink_hears_the_melody() {
    let config = Config::default();
    let session = synthesize_performance(&config, 7).unwrap();

    let heard = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&heard);
    let (audio, handle) = spawn_audio_sink(move |key| sink.lock().unwrap().push(key));

    let mut app = PianoApp::new(&config, Box::new(audio)).unwrap();
    app.run(&session);
    drop(app);
    handle.join().unwrap();

    // Do Do Sol Sol La La Sol
    assert_eq!(*heard.lock().unwrap(), vec![0, 0, 4, 4, 5, 5, 4]);
}

#[test]
fn test_session_file_round_trip_replays_identically() {
    let config = Config::default();
    let session = synthesize_performance(&config, 5).unwrap();
    let path = std::env::temp_dir().join(format!("pose_piano_{}_session.yaml", std::process::id()));
    session.to_file(&path).unwrap();
    let loaded = Session::from_file(&path).unwrap();
    std::fs::remove_file(&path).ok();

    let mut direct = PianoApp::new(&config, Box::new(NullAudio)).unwrap();
    let mut replayed = PianoApp::new(&config, Box::new(NullAudio)).unwrap();
    assert_eq!(direct.run(&session), replayed.run(&loaded));
}

#[test]
fn test_empty_session_summary() {
    let mut app = PianoApp::new(&Config::default(), Box::new(NullAudio)).unwrap();
    let summary = app.run(&Session::default());
    assert_eq!(summary.frames, 0);
    assert_eq!(summary.duration_ms, 0);
}

#[test]
fn test_out_of_order_session_replays_without_panicking() {
    let stamped = |timestamp_ms| RecordedFrame { timestamp_ms, fps: None, persons: Vec::new() };
    let session = Session { frames: vec![stamped(50), stamped(10)] };
    assert!(session.validate().is_err());
    assert_eq!(session.duration_ms(), 0);

    let mut app = PianoApp::new(&Config::default(), Box::new(NullAudio)).unwrap();
    let summary = app.run(&session);
    assert_eq!(summary.frames, 2);
    assert_eq!(summary.duration_ms, 0);
}
