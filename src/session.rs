//! Recorded pose sessions: YAML load/save and synthetic performances.
//!
//! A session is the detector side of a play session captured frame by frame,
//! so the engine can be replayed deterministically without a camera.

use crate::{
    config::Config,
    geometry::{Point, Size},
    pose::{BodyPart, Frame, KeyPoint, Person},
    remap::CoordinateRemapper,
    sequencer::NoteSequencer,
    Error, Result,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Interval between synthesised frames
pub const SYNTH_FRAME_INTERVAL_MS: u64 = 100;

/// One detector result with its capture time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedFrame {
    pub timestamp_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fps: Option<u32>,
    #[serde(default)]
    pub persons: Vec<Person>,
}

impl RecordedFrame {
    #[must_use]
    pub fn frame(&self) -> Frame {
        Frame::new(self.persons.clone())
    }
}

/// Ordered sequence of recorded frames
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default)]
    pub frames: Vec<RecordedFrame>,
}

impl Session {
    /// Load a session from a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or fails
    /// [`Session::validate`].
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse and validate a session from YAML text
    ///
    /// # Errors
    ///
    /// Returns an error for malformed YAML or out-of-order timestamps.
    pub fn from_yaml(content: &str) -> Result<Self> {
        let session: Self =
            serde_yaml::from_str(content).map_err(|e| Error::SessionError(format!("Failed to parse session: {e}")))?;
        session.validate()?;
        Ok(session)
    }

    /// Serialize the session to YAML text
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| Error::SessionError(format!("Failed to serialize session: {e}")))
    }

    /// Save the session to a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, self.to_yaml()?)?;
        Ok(())
    }

    /// Frame timestamps must never go backwards
    ///
    /// # Errors
    ///
    /// Returns [`Error::SessionError`] naming the first offending frame.
    pub fn validate(&self) -> Result<()> {
        for (i, pair) in self.frames.windows(2).enumerate() {
            if pair[1].timestamp_ms < pair[0].timestamp_ms {
                return Err(Error::SessionError(format!(
                    "Frame {} timestamp {} is earlier than the previous {}",
                    i + 1,
                    pair[1].timestamp_ms,
                    pair[0].timestamp_ms
                )));
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Capture time span covered by the session; zero when the last frame is
    /// stamped before the first
    #[must_use]
    pub fn duration_ms(&self) -> u64 {
        match (self.frames.first(), self.frames.last()) {
            (Some(first), Some(last)) => last.timestamp_ms.saturating_sub(first.timestamp_ms),
            _ => 0,
        }
    }
}

/// Build a session in which the display-space left wrist strikes the next
/// `note_count` expected keys of the configured melody, rests skipped.
///
/// Each note takes two frames: the wrist above the key, then inside it. The
/// right wrist rests near the top of the display and never strikes.
///
/// # Errors
///
/// Returns an error if the configuration is invalid.
#[allow(clippy::cast_precision_loss)]
pub fn synthesize_performance(config: &Config, note_count: usize) -> Result<Session> {
    config.validate()?;

    let display = config.display_size();
    let remapper = CoordinateRemapper::new(
        config.detect_size(),
        display,
        config.display.flip,
        config.display.rotation_degrees,
    )?;
    let mut sequencer = NoteSequencer::new(config.game.melody.clone(), config.game.hint_group_size)?;

    let keys = crate::keys::Keyboard::new(display, &config.keys, config.timing.debounce_interval_ms)?;
    let cell_height = display.height / config.keys.row_count as f32;
    let fps = u32::try_from(1000 / SYNTH_FRAME_INTERVAL_MS).ok();

    let mut frames = Vec::with_capacity(note_count * 2);
    let mut timestamp_ms = 0;
    for _ in 0..note_count {
        let key_index = sequencer.current_expected_key();
        sequencer.on_key_triggered(key_index);

        let Some(key) = keys.key(key_index) else {
            return Err(Error::InvalidInput(format!("No key {key_index}")));
        };
        let x = (key.left_bound() + key.right_bound()) / 2.0;
        let top = key.boundary_y();
        for y in [top - cell_height * 0.5, top + cell_height * 0.5] {
            frames.push(RecordedFrame {
                timestamp_ms,
                fps,
                persons: vec![performer(&remapper, display, Point::new(x, y))],
            });
            timestamp_ms += SYNTH_FRAME_INTERVAL_MS;
        }
    }

    Ok(Session { frames })
}

/// A person whose display-space left wrist is at `left_wrist`
fn performer(remapper: &CoordinateRemapper, display: Size, left_wrist: Point) -> Person {
    let idle_wrist = Point::new(display.width / 2.0, display.height * 0.05);
    // Without flip the remapper swaps left/right tags, so tag in advance
    let tag = |part: BodyPart| if remapper.flip() { part } else { part.mirror() };

    Person {
        id: 0,
        keypoints: vec![
            KeyPoint::new(tag(BodyPart::LeftWrist), remapper.unmap_point(left_wrist), 0.9),
            KeyPoint::new(tag(BodyPart::RightWrist), remapper.unmap_point(idle_wrist), 0.9),
        ],
        bounding_box: None,
        score: 0.9,
    }
}
