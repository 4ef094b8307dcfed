//! Directional stroke scoring over short wrist trajectories.
//!
//! Scores are signed values in `[-1, 1]`: the sign is the direction along the
//! tested axis and the magnitude is the confidence. Distances are judged
//! relative to a per-person threshold (average arm segment length), so a
//! subject close to the camera needs a proportionally larger movement.

use crate::{
    constants::{DIAGONAL_ANGLE_DEG, MIN_STROKE_THRESHOLD},
    geometry::{average_point, Point},
    pose::{BodyPart, Person},
};
use serde::Serialize;

/// A detected stroke direction in display space (y grows downwards)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StrokeDirection {
    Left,
    Right,
    Up,
    Down,
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
}

impl StrokeDirection {
    /// Arrow glyph for on-screen display
    #[must_use]
    pub const fn arrow(self) -> &'static str {
        match self {
            Self::Left => "⬅",
            Self::Right => "➡",
            Self::Up => "⬆",
            Self::Down => "⬇",
            Self::UpLeft => "↖",
            Self::UpRight => "↗",
            Self::DownLeft => "↙",
            Self::DownRight => "↘",
        }
    }

    /// True for the four horizontal and vertical directions
    #[must_use]
    pub const fn is_axis_aligned(self) -> bool {
        matches!(self, Self::Left | Self::Right | Self::Up | Self::Down)
    }
}

/// Result of classifying a trajectory
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Stroke {
    pub direction: StrokeDirection,
    /// Signed score along the axis that matched
    pub score: f32,
}

/// Segment pairs whose mean length sets the stroke threshold
const THRESHOLD_SEGMENTS: [(BodyPart, BodyPart); 5] = [
    (BodyPart::LeftShoulder, BodyPart::LeftElbow),
    (BodyPart::RightShoulder, BodyPart::RightElbow),
    (BodyPart::LeftElbow, BodyPart::LeftWrist),
    (BodyPart::RightElbow, BodyPart::RightWrist),
    (BodyPart::LeftShoulder, BodyPart::RightShoulder),
];

/// Average arm-segment length for `person`, floored at [`MIN_STROKE_THRESHOLD`].
///
/// `None` when any of the shoulders, elbows or wrists is missing.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn stroke_threshold(person: &Person, min_confidence: f32) -> Option<f32> {
    let mut total = 0.0_f32;
    for (a, b) in THRESHOLD_SEGMENTS {
        let pa = person.coordinate(a, min_confidence)?;
        let pb = person.coordinate(b, min_confidence)?;
        total += pa.distance(&pb);
    }
    let average = total / THRESHOLD_SEGMENTS.len() as f32;
    Some(floor_threshold(average))
}

fn floor_threshold(threshold: f32) -> f32 {
    if threshold.is_finite() {
        threshold.max(MIN_STROKE_THRESHOLD)
    } else {
        MIN_STROKE_THRESHOLD
    }
}

/// Along-axis score: 0 below `0.5T`, 0→0.5 up to `T`, 0.5→1 up to `2T`, then 1
#[must_use]
pub fn x_score(distance: f32, threshold: f32) -> f32 {
    let d = distance.abs();
    let t = threshold;
    if d < t * 0.5 {
        0.0
    } else if d < t {
        (d - t * 0.5) / t
    } else if d < t * 2.0 {
        (d - t) / (t * 2.0) + 0.5
    } else {
        1.0
    }
}

/// Cross-axis drift score: 1 up to `T/5`, 1→0.5 by `T/4`, 0.5→0 by `T/3`, then 0
#[must_use]
pub fn y_score(distance: f32, threshold: f32) -> f32 {
    let d = distance.abs();
    let fifth = threshold / 5.0;
    let quarter = threshold / 4.0;
    let third = threshold / 3.0;
    if d <= fifth {
        1.0
    } else if d <= quarter {
        1.0 - 0.5 * (d - fifth) / (quarter - fifth)
    } else if d <= third {
        0.5 * (third - d) / (third - quarter)
    } else {
        0.0
    }
}

/// Endpoint-only horizontal score between two points
#[must_use]
pub fn endpoint_score(from: Point, to: Point, threshold: f32) -> f32 {
    let dx = to.x - from.x;
    let magnitude = (x_score(dx, threshold) * y_score(to.y - from.y, threshold)).sqrt();
    if magnitude == 0.0 {
        0.0
    } else if dx > 0.0 {
        magnitude
    } else {
        -magnitude
    }
}

/// Horizontal stroke score of a trajectory.
///
/// With three or more points, each interior point's cross-axis distance to
/// the trajectory mean is scored and the geometric mean of those scores
/// scales the endpoint score.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn horizontal_score(points: &[Point], threshold: f32) -> f32 {
    let (Some(&first), Some(&last)) = (points.first(), points.last()) else {
        return 0.0;
    };
    if points.len() < 2 {
        return 0.0;
    }
    let threshold = floor_threshold(threshold);
    let base = endpoint_score(first, last, threshold);
    if points.len() == 2 || base == 0.0 {
        return base;
    }

    let average = average_point(points);
    let interior = &points[1..points.len() - 1];
    let product: f32 = interior.iter().map(|p| y_score(p.y - average.y, threshold)).product();
    let consistency = product.powf(1.0 / interior.len() as f32);

    base * consistency
}

/// Vertical stroke score: horizontal score with axes exchanged
#[must_use]
pub fn vertical_score(points: &[Point], threshold: f32) -> f32 {
    let swapped: Vec<Point> = points.iter().map(Point::swapped).collect();
    horizontal_score(&swapped, threshold)
}

/// Diagonal stroke score: horizontal score after rotating by `angle_degrees`
#[must_use]
pub fn diagonal_score(points: &[Point], threshold: f32, angle_degrees: f64) -> f32 {
    let rotated: Vec<Point> = points.iter().map(|p| p.rotated(angle_degrees)).collect();
    horizontal_score(&rotated, threshold)
}

/// Test horizontal, vertical, then both diagonals; first score whose
/// magnitude exceeds `confidence` wins.
#[must_use]
pub fn classify(points: &[Point], threshold: f32, confidence: f32) -> Option<Stroke> {
    let pick = |score: f32, positive: StrokeDirection, negative: StrokeDirection| {
        (score.abs() > confidence).then(|| Stroke {
            direction: if score > 0.0 { positive } else { negative },
            score,
        })
    };

    pick(horizontal_score(points, threshold), StrokeDirection::Right, StrokeDirection::Left)
        .or_else(|| pick(vertical_score(points, threshold), StrokeDirection::Down, StrokeDirection::Up))
        .or_else(|| {
            pick(
                diagonal_score(points, threshold, -DIAGONAL_ANGLE_DEG),
                StrokeDirection::DownRight,
                StrokeDirection::UpLeft,
            )
        })
        .or_else(|| {
            pick(
                diagonal_score(points, threshold, DIAGONAL_ANGLE_DEG),
                StrokeDirection::UpRight,
                StrokeDirection::DownLeft,
            )
        })
}
