//! Configuration management for the pose piano

use crate::{
    constants::{
        DEFAULT_ACTIVE_MARGIN_MULTIPLIER, DEFAULT_DEBOUNCE_INTERVAL_MS, DEFAULT_DETECT_HEIGHT, DEFAULT_DETECT_WIDTH,
        DEFAULT_DISPLAY_HEIGHT, DEFAULT_DISPLAY_WIDTH, DEFAULT_HEAD_ROTATION_WINDOW, DEFAULT_HINT_GROUP_SIZE,
        DEFAULT_KEY_ROW, DEFAULT_MARGIN_X_FRACTION, DEFAULT_MARGIN_Y_FRACTION, DEFAULT_MELODY,
        DEFAULT_MIN_PERSON_SCORE, DEFAULT_ROW_COUNT, DEFAULT_STROKE_CONFIDENCE, DEFAULT_TRAJECTORY_WINDOW,
    },
    geometry::Size,
    sequencer::validate_melody,
    Error, Result,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Display (render target) configuration
    pub display: DisplayConfig,

    /// Pose detector input configuration
    pub detector: DetectorConfig,

    /// Key layout on the display
    pub keys: KeyLayoutConfig,

    /// Debounce timing
    pub timing: TimingConfig,

    /// Wrist trajectory and stroke gesture configuration
    pub gestures: GestureConfig,

    /// Melody game configuration
    pub game: GameConfig,

    /// Head rotation estimate
    pub head_rotation: HeadRotationConfig,
}

/// Display configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Display width in pixels
    pub width: f32,

    /// Display height in pixels
    pub height: f32,

    /// Mirror coordinates horizontally (front camera preview)
    pub flip: bool,

    /// Sensor rotation relative to the display, in degrees
    pub rotation_degrees: f64,
}

/// Pose detector configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Detector input width in pixels
    pub width: f32,

    /// Detector input height in pixels
    pub height: f32,

    /// Persons at or below this score are ignored
    pub min_person_score: f32,

    /// Keypoints below this confidence count as missing
    pub min_keypoint_confidence: f32,
}

/// Key layout configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyLayoutConfig {
    /// 1-based grid row the keys sit on
    pub key_row: u32,

    /// Number of rows the display height is divided into
    pub row_count: u32,

    /// Horizontal inset as a fraction of the cell width
    pub margin_x_fraction: f32,

    /// Vertical inset as a fraction of the cell height
    pub margin_y_fraction: f32,

    /// Vertical margin multiplier while a key is active
    pub active_margin_multiplier: f32,

    /// Only count movements that come from above the key
    pub downward_strikes_only: bool,
}

/// Timing configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// How long a struck key stays active, in milliseconds
    pub debounce_interval_ms: u64,
}

/// Gesture configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Classify wrist strokes between key strikes
    pub stroke_detection: bool,

    /// Minimum stroke score magnitude that counts as a stroke
    pub stroke_confidence_threshold: f32,

    /// Number of recent points kept per wrist
    pub trajectory_window_size: usize,

    /// Smoothing applied to wrist positions ("none", "average", "average:3")
    pub wrist_smoothing: String,
}

/// Melody game configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Note sequence, 1..=7 for keys and 0 for rests
    pub melody: Vec<u8>,

    /// Number of upcoming notes shown as hints
    pub hint_group_size: usize,
}

/// Head rotation configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadRotationConfig {
    /// Estimate head rotation every frame
    pub enabled: bool,

    /// Moving average window for the estimate
    pub window_size: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_DISPLAY_WIDTH,
            height: DEFAULT_DISPLAY_HEIGHT,
            flip: false,
            rotation_degrees: 0.0,
        }
    }
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_DETECT_WIDTH,
            height: DEFAULT_DETECT_HEIGHT,
            min_person_score: DEFAULT_MIN_PERSON_SCORE,
            min_keypoint_confidence: 0.0,
        }
    }
}

impl Default for KeyLayoutConfig {
    fn default() -> Self {
        Self {
            key_row: DEFAULT_KEY_ROW,
            row_count: DEFAULT_ROW_COUNT,
            margin_x_fraction: DEFAULT_MARGIN_X_FRACTION,
            margin_y_fraction: DEFAULT_MARGIN_Y_FRACTION,
            active_margin_multiplier: DEFAULT_ACTIVE_MARGIN_MULTIPLIER,
            downward_strikes_only: false,
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            debounce_interval_ms: DEFAULT_DEBOUNCE_INTERVAL_MS,
        }
    }
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            stroke_detection: false,
            stroke_confidence_threshold: DEFAULT_STROKE_CONFIDENCE,
            trajectory_window_size: DEFAULT_TRAJECTORY_WINDOW,
            wrist_smoothing: "none".to_string(),
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            melody: DEFAULT_MELODY.to_vec(),
            hint_group_size: DEFAULT_HINT_GROUP_SIZE,
        }
    }
}

impl Default for HeadRotationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            window_size: DEFAULT_HEAD_ROTATION_WINDOW,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML text
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid configuration document.
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| Error::ConfigError(format!("Failed to parse config: {e}")))
    }

    /// Save configuration to a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content =
            serde_yaml::to_string(self).map_err(|e| Error::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content)?;

        Ok(())
    }

    #[must_use]
    pub const fn display_size(&self) -> Size {
        Size::new(self.display.width, self.display.height)
    }

    #[must_use]
    pub const fn detect_size(&self) -> Size {
        Size::new(self.detector.width, self.detector.height)
    }

    /// Create a wrist smoother from configuration
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown smoothing name or bad window.
    pub fn create_smoother(&self) -> Result<Box<dyn crate::smoothing::PointSmoother>> {
        crate::smoothing::create_smoother(&self.gestures.wrist_smoothing)
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns the first problem found as a [`Error::ConfigError`] or
    /// [`Error::InvalidMelody`].
    pub fn validate(&self) -> Result<()> {
        // Validate sizes
        if !self.display_size().is_valid() {
            return Err(Error::ConfigError(format!(
                "Display size must be positive, got {}x{}",
                self.display.width, self.display.height
            )));
        }
        if !self.detect_size().is_valid() {
            return Err(Error::ConfigError(format!(
                "Detector size must be positive, got {}x{}",
                self.detector.width, self.detector.height
            )));
        }
        if !self.display.rotation_degrees.is_finite() {
            return Err(Error::ConfigError("Rotation must be a finite number of degrees".to_string()));
        }

        // Validate thresholds
        if !(0.0..=1.0).contains(&self.detector.min_person_score) {
            return Err(Error::ConfigError(
                "Minimum person score must be between 0.0 and 1.0".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.detector.min_keypoint_confidence) {
            return Err(Error::ConfigError(
                "Minimum keypoint confidence must be between 0.0 and 1.0".to_string(),
            ));
        }
        if !(self.gestures.stroke_confidence_threshold > 0.0 && self.gestures.stroke_confidence_threshold <= 1.0) {
            return Err(Error::ConfigError(
                "Stroke confidence threshold must be in (0.0, 1.0]".to_string(),
            ));
        }

        // Validate key layout
        let keys = &self.keys;
        if keys.row_count == 0 || keys.key_row == 0 || keys.key_row > keys.row_count {
            return Err(Error::ConfigError(format!(
                "Key row {} must be within 1..={}",
                keys.key_row, keys.row_count
            )));
        }
        if !(0.0..0.5).contains(&keys.margin_x_fraction) || !(0.0..0.5).contains(&keys.margin_y_fraction) {
            return Err(Error::ConfigError("Key margins must be in [0.0, 0.5)".to_string()));
        }
        if !keys.active_margin_multiplier.is_finite() {
            return Err(Error::ConfigError("Active margin multiplier must be finite".to_string()));
        }

        // Validate windows
        if self.timing.debounce_interval_ms == 0 {
            return Err(Error::ConfigError("Debounce interval must be greater than 0".to_string()));
        }
        if self.gestures.trajectory_window_size < 2 {
            return Err(Error::ConfigError(
                "Trajectory window size must be at least 2".to_string(),
            ));
        }
        if self.game.hint_group_size == 0 {
            return Err(Error::ConfigError("Hint group size must be greater than 0".to_string()));
        }
        if self.head_rotation.window_size == 0 {
            return Err(Error::ConfigError(
                "Head rotation window size must be greater than 0".to_string(),
            ));
        }

        validate_melody(&self.game.melody)?;
        self.create_smoother()?;

        Ok(())
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# Pose Piano Configuration

# Render target
display:
  width: 1920.0
  height: 1080.0
  flip: false
  rotation_degrees: 0.0

# Pose detector input
detector:
  width: 1280.0
  height: 720.0
  min_person_score: 0.4
  min_keypoint_confidence: 0.0

# Key layout (7 keys on one grid row)
keys:
  key_row: 6
  row_count: 11
  margin_x_fraction: 0.05
  margin_y_fraction: 0.05
  active_margin_multiplier: -2.0
  downward_strikes_only: false

# Debounce
timing:
  debounce_interval_ms: 200

# Wrist gestures
gestures:
  stroke_detection: false
  stroke_confidence_threshold: 0.7
  trajectory_window_size: 5
  wrist_smoothing: "none"

# Melody game (1-7 = Do..Si, 0 = rest)
game:
  melody: [1, 1, 5, 5, 6, 6, 5, 0, 4, 4, 3, 3, 2, 2, 1, 0,
           5, 5, 4, 4, 3, 3, 2, 0, 5, 5, 4, 4, 3, 3, 2, 0,
           1, 1, 5, 5, 6, 6, 5, 0, 4, 4, 3, 3, 2, 2, 1, 0]
  hint_group_size: 4

# Head rotation estimate
head_rotation:
  enabled: false
  window_size: 5
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_example_config_matches_default() {
        let config = Config::from_yaml(EXAMPLE_CONFIG).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = Config::from_yaml("timing:\n  debounce_interval_ms: 350\n").unwrap();
        assert_eq!(config.timing.debounce_interval_ms, 350);
        assert_eq!(config.keys, KeyLayoutConfig::default());
        assert_eq!(config.game.melody, DEFAULT_MELODY.to_vec());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.game.melody.clear();
        assert!(matches!(config.validate(), Err(Error::InvalidMelody(_))));

        let mut config = Config::default();
        config.keys.key_row = 12;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.gestures.trajectory_window_size = 1;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.gestures.wrist_smoothing = "kalman".to_string();
        assert!(matches!(config.validate(), Err(Error::SmoothingError(_))));

        let mut config = Config::default();
        config.display.width = 0.0;
        assert!(config.validate().is_err());
    }
}
