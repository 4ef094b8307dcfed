//! Coarse head rotation estimate from the face keypoints.
//!
//! Both axes are reported in `[0, 1]` with 0.5 meaning "facing the camera".
//! Raw estimates are smoothed over a short window and quantised so the
//! rendered indicator does not jitter.

use crate::{
    constants::{HEAD_ROTATION_HORIZONTAL_STEPS, HEAD_ROTATION_VERTICAL_STEPS},
    geometry::Point,
    pose::{BodyPart, Person},
    smoothing::{PointSmoother, WindowAverage},
};
use serde::Serialize;

const HORIZONTAL_ZOOM: f32 = 1.5;
const VERTICAL_ZOOM: f32 = 1.0;

/// Smoothed, quantised head rotation
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HeadRotation {
    /// 0 = turned fully one way, 1 = the other
    pub horizontal: f32,
    /// 0 = looking down, 1 = looking up
    pub vertical: f32,
}

impl Default for HeadRotation {
    fn default() -> Self {
        Self { horizontal: 0.5, vertical: 0.5 }
    }
}

fn between_zero_and_one(value: f32, zoom: f32) -> f32 {
    ((value.abs() - 0.5) * zoom + 0.5).clamp(0.0, 1.0)
}

/// Horizontal rotation from the nose position between the ears
#[must_use]
pub fn horizontal_rotation(person: &Person, min_confidence: f32) -> f32 {
    let (Some(nose), Some(left_ear), Some(right_ear)) = (
        person.coordinate(BodyPart::Nose, min_confidence),
        person.coordinate(BodyPart::LeftEar, min_confidence),
        person.coordinate(BodyPart::RightEar, min_confidence),
    ) else {
        return 0.5;
    };

    if nose.x <= right_ear.x {
        0.0
    } else if nose.x >= left_ear.x {
        1.0
    } else {
        between_zero_and_one((nose.x - right_ear.x) / (right_ear.x - left_ear.x), HORIZONTAL_ZOOM)
    }
}

/// Vertical rotation from the ear line relative to the eyes and nose
#[must_use]
pub fn vertical_rotation(person: &Person, min_confidence: f32) -> f32 {
    let part = |p| person.coordinate(p, min_confidence);
    let (Some(nose), Some(left_eye), Some(right_eye), Some(left_ear), Some(right_ear)) = (
        part(BodyPart::Nose),
        part(BodyPart::LeftEye),
        part(BodyPart::RightEye),
        part(BodyPart::LeftEar),
        part(BodyPart::RightEar),
    ) else {
        return 0.5;
    };

    let eyes_y = (left_eye.y + right_eye.y) / 2.0;
    let ears_y = (left_ear.y + right_ear.y) / 2.0;

    if ears_y <= eyes_y {
        1.0
    } else if ears_y >= nose.y {
        0.0
    } else {
        between_zero_and_one((ears_y - nose.y) / (eyes_y - nose.y), VERTICAL_ZOOM)
    }
}

/// Windowed head rotation estimator
pub struct HeadRotationEstimator {
    window: WindowAverage,
    min_confidence: f32,
}

impl HeadRotationEstimator {
    /// # Panics
    ///
    /// Panics if `window_size` is zero
    #[must_use]
    pub fn new(window_size: usize, min_confidence: f32) -> Self {
        Self {
            window: WindowAverage::new(window_size),
            min_confidence,
        }
    }

    /// Feed one person and return the smoothed, quantised estimate
    pub fn update(&mut self, person: &Person) -> HeadRotation {
        // x carries the horizontal estimate, y the vertical one
        let raw = Point::new(
            horizontal_rotation(person, self.min_confidence),
            vertical_rotation(person, self.min_confidence),
        );
        let smoothed = self.window.smooth(raw);

        HeadRotation {
            horizontal: (smoothed.x * HEAD_ROTATION_HORIZONTAL_STEPS).round() / HEAD_ROTATION_HORIZONTAL_STEPS,
            vertical: (smoothed.y * HEAD_ROTATION_VERTICAL_STEPS).round() / HEAD_ROTATION_VERTICAL_STEPS,
        }
    }

    pub fn reset(&mut self) {
        self.window.reset();
    }
}
