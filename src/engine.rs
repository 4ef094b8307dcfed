//! Per-frame orchestration: primary person selection, remapping, wrist
//! tracking, key strikes, melody matching and the render snapshot.
//!
//! The engine owns all mutable game state. Callers deliver complete frames
//! one at a time; nothing here blocks, and time comes only from the injected
//! [`Clock`], read once at the start of each frame.

use crate::{
    audio::AudioTrigger,
    clock::Clock,
    config::Config,
    geometry::{Point, Rect, Size},
    head_rotation::{HeadRotation, HeadRotationEstimator},
    keys::Keyboard,
    pose::{BodyPart, Frame, Person},
    remap::CoordinateRemapper,
    sequencer::{HintEntry, NoteSequencer},
    smoothing::PointSmoother,
    stroke::{classify, stroke_threshold, Stroke},
    trajectory::TrajectoryBuffer,
    Result,
};
use log::{debug, info};
use serde::Serialize;

/// A tracked limb that can strike keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Limb {
    LeftWrist,
    RightWrist,
}

impl Limb {
    pub const ALL: [Limb; 2] = [Limb::LeftWrist, Limb::RightWrist];

    #[must_use]
    pub const fn body_part(self) -> BodyPart {
        match self {
            Self::LeftWrist => BodyPart::LeftWrist,
            Self::RightWrist => BodyPart::RightWrist,
        }
    }

    const fn slot(self) -> usize {
        match self {
            Self::LeftWrist => 0,
            Self::RightWrist => 1,
        }
    }
}

/// Values measured outside the engine and passed through to the renderer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Telemetry {
    pub fps: Option<u32>,
}

/// Something that happened while processing a frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EngineEvent {
    /// A key was struck; `matched` tells whether it was the expected note
    KeyTriggered { limb: Limb, key_index: usize, matched: bool },
    /// A directional wrist stroke was recognised
    Stroke { limb: Limb, stroke: Stroke },
}

/// Render state of one key
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeySnapshot {
    pub index: usize,
    pub label: &'static str,
    pub active: bool,
    pub bounds: Rect,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DebugInfo {
    pub fps: Option<u32>,
    pub person_score: Option<f32>,
    pub stroke_threshold: Option<f32>,
    pub rotation_degrees: f64,
    pub flip: bool,
}

/// Everything the renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderSnapshot {
    pub keys: Vec<KeySnapshot>,
    pub hints: Vec<HintEntry>,
    pub expected_note: u8,
    pub expected_key: usize,
    pub round: u32,
    pub last_stroke: Option<Stroke>,
    pub left_trace: Vec<Point>,
    pub right_trace: Vec<Point>,
    pub head_rotation: Option<HeadRotation>,
    pub debug: DebugInfo,
}

/// Result of [`GestureEngine::process_frame`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameReport {
    pub events: Vec<EngineEvent>,
    pub snapshot: RenderSnapshot,
}

struct LimbTracker {
    buffer: TrajectoryBuffer,
    smoother: Box<dyn PointSmoother>,
}

/// Turns frames of keypoints into key strikes and melody progress
pub struct GestureEngine {
    /// Detector size before any rotation swap
    detect_size: Size,
    remapper: CoordinateRemapper,
    keyboard: Keyboard,
    sequencer: NoteSequencer,
    limbs: [LimbTracker; 2],
    head: Option<HeadRotationEstimator>,
    audio: Box<dyn AudioTrigger>,
    clock: Box<dyn Clock>,
    min_person_score: f32,
    min_keypoint_confidence: f32,
    stroke_detection: bool,
    stroke_confidence: f32,
    last_stroke: Option<Stroke>,
    head_rotation: Option<HeadRotation>,
}

impl GestureEngine {
    /// Build an engine from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration fails [`Config::validate`].
    pub fn new(config: &Config, audio: Box<dyn AudioTrigger>, clock: Box<dyn Clock>) -> Result<Self> {
        config.validate()?;

        let remapper = CoordinateRemapper::new(
            config.detect_size(),
            config.display_size(),
            config.display.flip,
            config.display.rotation_degrees,
        )?;
        let keyboard = Keyboard::new(config.display_size(), &config.keys, config.timing.debounce_interval_ms)?;
        let sequencer = NoteSequencer::new(config.game.melody.clone(), config.game.hint_group_size)?;

        let window = config.gestures.trajectory_window_size;
        let limbs = [
            LimbTracker {
                buffer: TrajectoryBuffer::new(window),
                smoother: config.create_smoother()?,
            },
            LimbTracker {
                buffer: TrajectoryBuffer::new(window),
                smoother: config.create_smoother()?,
            },
        ];

        let head = config
            .head_rotation
            .enabled
            .then(|| HeadRotationEstimator::new(config.head_rotation.window_size, config.detector.min_keypoint_confidence));

        info!(
            "Gesture engine ready: {} melody notes, debounce {} ms, strokes {}, smoothing {}",
            config.game.melody.len(),
            config.timing.debounce_interval_ms,
            if config.gestures.stroke_detection { "on" } else { "off" },
            limbs[0].smoother.name()
        );

        Ok(Self {
            detect_size: config.detect_size(),
            remapper,
            keyboard,
            sequencer,
            limbs,
            head,
            audio,
            clock,
            min_person_score: config.detector.min_person_score,
            min_keypoint_confidence: config.detector.min_keypoint_confidence,
            stroke_detection: config.gestures.stroke_detection,
            stroke_confidence: config.gestures.stroke_confidence_threshold,
            last_stroke: None,
            head_rotation: None,
        })
    }

    #[must_use]
    pub const fn keyboard(&self) -> &Keyboard {
        &self.keyboard
    }

    #[must_use]
    pub const fn sequencer(&self) -> &NoteSequencer {
        &self.sequencer
    }

    #[must_use]
    pub const fn remapper(&self) -> &CoordinateRemapper {
        &self.remapper
    }

    /// Recent display-space points of `limb`, oldest first
    #[must_use]
    pub fn trace(&self, limb: Limb) -> Vec<Point> {
        self.limbs[limb.slot()].buffer.points()
    }

    /// Change camera orientation mid-session, keeping game state.
    ///
    /// # Errors
    ///
    /// Returns an error if `rotation_degrees` is not finite.
    pub fn set_orientation(&mut self, flip: bool, rotation_degrees: f64) -> Result<()> {
        self.remapper = CoordinateRemapper::new(self.detect_size, self.remapper.display_size(), flip, rotation_degrees)?;
        self.clear_traces();
        debug!("Orientation changed: flip={}, rotation={}", flip, rotation_degrees);
        Ok(())
    }

    /// Process one frame of detector output
    pub fn process_frame(&mut self, frame: &Frame, telemetry: Telemetry) -> FrameReport {
        let now = self.clock.now_ms();
        self.keyboard.expire(now);

        let mut events = Vec::new();
        let mut person_score = None;
        let mut threshold = None;

        if let Some(primary) = frame.primary_person(self.min_person_score) {
            person_score = Some(primary.score);
            let person = self.remapper.remap(primary);

            if self.stroke_detection {
                threshold = stroke_threshold(&person, self.min_keypoint_confidence);
            }
            for limb in Limb::ALL {
                self.track_limb(limb, &person, now, threshold, &mut events);
            }
            if let Some(head) = self.head.as_mut() {
                self.head_rotation = Some(head.update(&person));
            }
        }

        FrameReport {
            events,
            snapshot: self.snapshot(telemetry, person_score, threshold),
        }
    }

    fn track_limb(
        &mut self,
        limb: Limb,
        person: &Person,
        now: u64,
        threshold: Option<f32>,
        events: &mut Vec<EngineEvent>,
    ) {
        let tracker = &mut self.limbs[limb.slot()];
        let Some(raw) = person.coordinate(limb.body_part(), self.min_keypoint_confidence) else {
            debug!("{:?} not detected, skipping", limb);
            tracker.smoother.reset();
            return;
        };

        tracker.buffer.push(tracker.smoother.smooth(raw));

        if let Some((prev, new)) = tracker.buffer.last_two() {
            if let Some(key_index) = self.keyboard.strike(prev, new, now) {
                let matched = self.sequencer.on_key_triggered(key_index);
                self.audio.trigger(key_index);
                tracker.buffer.clear();
                debug!(
                    "{:?} struck key {} ({}), {}",
                    limb,
                    key_index,
                    crate::constants::KEY_LABELS[key_index],
                    if matched { "matched" } else { "not expected" }
                );
                events.push(EngineEvent::KeyTriggered { limb, key_index, matched });
                return;
            }
        }

        if let Some(threshold) = threshold {
            if tracker.buffer.len() > 2 {
                if let Some(stroke) = classify(&tracker.buffer.points(), threshold, self.stroke_confidence) {
                    // Diagonals keep their points and can fire again next frame
                    if stroke.direction.is_axis_aligned() {
                        tracker.buffer.keep_last();
                    }
                    debug!("{:?} stroke {} ({:.2})", limb, stroke.direction.arrow(), stroke.score);
                    self.last_stroke = Some(stroke);
                    events.push(EngineEvent::Stroke { limb, stroke });
                }
            }
        }
    }

    fn snapshot(&self, telemetry: Telemetry, person_score: Option<f32>, stroke_threshold: Option<f32>) -> RenderSnapshot {
        let keys = self
            .keyboard
            .keys()
            .iter()
            .map(|k| KeySnapshot {
                index: k.index(),
                label: k.label(),
                active: k.is_active(),
                bounds: k.bounds(),
            })
            .collect();

        RenderSnapshot {
            keys,
            hints: self.sequencer.hint_window(),
            expected_note: self.sequencer.current_expected_note(),
            expected_key: self.sequencer.current_expected_key(),
            round: self.sequencer.current_round(),
            last_stroke: self.last_stroke,
            left_trace: self.trace(Limb::LeftWrist),
            right_trace: self.trace(Limb::RightWrist),
            head_rotation: self.head_rotation,
            debug: DebugInfo {
                fps: telemetry.fps,
                person_score,
                stroke_threshold,
                rotation_degrees: self.remapper.rotation_degrees(),
                flip: self.remapper.flip(),
            },
        }
    }

    fn clear_traces(&mut self) {
        for tracker in &mut self.limbs {
            tracker.buffer.clear();
            tracker.smoother.reset();
        }
    }

    /// Start the melody over and release every key
    pub fn restart(&mut self) {
        self.sequencer.restart();
        self.keyboard.reset();
        self.clear_traces();
        if let Some(head) = self.head.as_mut() {
            head.reset();
        }
        self.last_stroke = None;
        self.head_rotation = None;
        info!("Game restarted");
    }
}
