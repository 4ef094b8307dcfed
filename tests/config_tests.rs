//! Configuration loading, saving and validation

use pose_piano::{
    config::{Config, EXAMPLE_CONFIG},
    Error,
};
use std::path::PathBuf;

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("pose_piano_{}_{}", std::process::id(), name))
}

#[test]
fn test_config_file_round_trip() {
    let path = temp_path("config.yaml");
    let mut config = Config::default();
    config.display.flip = true;
    config.display.rotation_degrees = 270.0;
    config.game.melody = vec![3, 0, 3, 2];
    config.gestures.wrist_smoothing = "average:3".to_string();

    config.to_file(&path).unwrap();
    let loaded = Config::from_file(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(loaded, config);
    assert!(loaded.validate().is_ok());
}

#[test]
fn test_example_config_is_valid() {
    let config = Config::from_yaml(EXAMPLE_CONFIG).unwrap();
    assert!(config.validate().is_ok());
    assert_eq!(config.game.melody.len(), 48);
}

#[test]
fn test_missing_file_is_io_error() {
    let result = Config::from_file(temp_path("does_not_exist.yaml"));
    assert!(matches!(result, Err(Error::Io(_))));
}

#[test]
fn test_malformed_yaml_is_config_error() {
    let result = Config::from_yaml("display: [1, 2");
    assert!(matches!(result, Err(Error::ConfigError(_))));

    let result = Config::from_yaml("timing:\n  debounce_interval_ms: soon\n");
    assert!(matches!(result, Err(Error::ConfigError(_))));
}

#[test]
fn test_validation_catches_each_section() {
    let cases: Vec<(&str, Box<dyn Fn(&mut Config)>)> = vec![
        ("detector size", Box::new(|c| c.detector.height = -1.0)),
        ("rotation", Box::new(|c| c.display.rotation_degrees = f64::NAN)),
        ("person score", Box::new(|c| c.detector.min_person_score = 1.5)),
        ("keypoint confidence", Box::new(|c| c.detector.min_keypoint_confidence = -0.1)),
        ("stroke confidence", Box::new(|c| c.gestures.stroke_confidence_threshold = 0.0)),
        ("row count", Box::new(|c| c.keys.row_count = 0)),
        ("key row", Box::new(|c| c.keys.key_row = 0)),
        ("margin", Box::new(|c| c.keys.margin_x_fraction = 0.5)),
        ("active multiplier", Box::new(|c| c.keys.active_margin_multiplier = f32::INFINITY)),
        ("debounce", Box::new(|c| c.timing.debounce_interval_ms = 0)),
        ("hint group", Box::new(|c| c.game.hint_group_size = 0)),
        ("head window", Box::new(|c| c.head_rotation.window_size = 0)),
        ("melody range", Box::new(|c| c.game.melody = vec![1, 9])),
    ];

    for (name, mutate) in cases {
        let mut config = Config::default();
        mutate(&mut config);
        assert!(config.validate().is_err(), "{name} should be rejected");
    }
}

#[test]
fn test_create_smoother_uses_wrist_smoothing() {
    let mut config = Config::default();
    assert_eq!(config.create_smoother().unwrap().name(), "none");
    config.gestures.wrist_smoothing = "moving_average:4".to_string();
    assert_eq!(config.create_smoother().unwrap().name(), "average");

    for bad in ["median:3", "average:0", "average:two", ""] {
        config.gestures.wrist_smoothing = bad.to_string();
        assert!(
            matches!(config.validate(), Err(Error::SmoothingError(_))),
            "{bad:?} should be rejected"
        );
    }
}
