//! Pose data delivered by the keypoint detector: body parts, keypoints,
//! persons and frames.

use crate::geometry::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Tracked anatomical landmark, in detector output order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyPart {
    Nose,
    LeftEye,
    RightEye,
    LeftEar,
    RightEar,
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftWrist,
    RightWrist,
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
}

impl BodyPart {
    /// All parts in detector output order
    pub const ALL: [BodyPart; 17] = [
        BodyPart::Nose,
        BodyPart::LeftEye,
        BodyPart::RightEye,
        BodyPart::LeftEar,
        BodyPart::RightEar,
        BodyPart::LeftShoulder,
        BodyPart::RightShoulder,
        BodyPart::LeftElbow,
        BodyPart::RightElbow,
        BodyPart::LeftWrist,
        BodyPart::RightWrist,
        BodyPart::LeftHip,
        BodyPart::RightHip,
        BodyPart::LeftKnee,
        BodyPart::RightKnee,
        BodyPart::LeftAnkle,
        BodyPart::RightAnkle,
    ];

    /// The anatomically opposite part; the nose mirrors to itself
    #[must_use]
    pub const fn mirror(self) -> Self {
        match self {
            Self::Nose => Self::Nose,
            Self::LeftEye => Self::RightEye,
            Self::RightEye => Self::LeftEye,
            Self::LeftEar => Self::RightEar,
            Self::RightEar => Self::LeftEar,
            Self::LeftShoulder => Self::RightShoulder,
            Self::RightShoulder => Self::LeftShoulder,
            Self::LeftElbow => Self::RightElbow,
            Self::RightElbow => Self::LeftElbow,
            Self::LeftWrist => Self::RightWrist,
            Self::RightWrist => Self::LeftWrist,
            Self::LeftHip => Self::RightHip,
            Self::RightHip => Self::LeftHip,
            Self::LeftKnee => Self::RightKnee,
            Self::RightKnee => Self::LeftKnee,
            Self::LeftAnkle => Self::RightAnkle,
            Self::RightAnkle => Self::LeftAnkle,
        }
    }

    /// Position of this part in detector output order
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// One detected landmark
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KeyPoint {
    pub part: BodyPart,
    #[serde(flatten)]
    pub coordinate: Point,
    pub confidence: f32,
}

impl KeyPoint {
    #[must_use]
    pub const fn new(part: BodyPart, coordinate: Point, confidence: f32) -> Self {
        Self { part, coordinate, confidence }
    }
}

/// A detected person with keypoints in detector output order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    #[serde(default)]
    pub id: i32,
    pub keypoints: Vec<KeyPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<Rect>,
    pub score: f32,
}

impl Person {
    /// Look up a keypoint by tag; remapping may reorder tags, so this searches
    #[must_use]
    pub fn keypoint(&self, part: BodyPart) -> Option<&KeyPoint> {
        self.keypoints.iter().find(|kp| kp.part == part)
    }

    /// Coordinate of `part` if present with at least `min_confidence`
    #[must_use]
    pub fn coordinate(&self, part: BodyPart, min_confidence: f32) -> Option<Point> {
        self.keypoint(part)
            .filter(|kp| kp.confidence >= min_confidence && kp.coordinate.x.is_finite() && kp.coordinate.y.is_finite())
            .map(|kp| kp.coordinate)
    }
}

/// One complete detector result
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    #[serde(default)]
    pub persons: Vec<Person>,
}

impl Frame {
    #[must_use]
    pub fn new(persons: Vec<Person>) -> Self {
        Self { persons }
    }

    /// Highest-scoring person strictly above `min_score`; the first wins ties
    #[must_use]
    pub fn primary_person(&self, min_score: f32) -> Option<&Person> {
        self.persons
            .iter()
            .filter(|p| p.score > min_score)
            .fold(None, |best: Option<&Person>, p| match best {
                Some(b) if b.score >= p.score => Some(b),
                _ => Some(p),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person(id: i32, score: f32) -> Person {
        Person { id, keypoints: Vec::new(), bounding_box: None, score }
    }

    #[test]
    fn test_mirror_is_involution() {
        for part in BodyPart::ALL {
            assert_eq!(part.mirror().mirror(), part);
        }
        assert_eq!(BodyPart::LeftWrist.mirror(), BodyPart::RightWrist);
        assert_eq!(BodyPart::Nose.mirror(), BodyPart::Nose);
    }

    #[test]
    fn test_index_matches_output_order() {
        for (i, part) in BodyPart::ALL.iter().enumerate() {
            assert_eq!(part.index(), i);
        }
    }

    #[test]
    fn test_primary_person_highest_score() {
        let frame = Frame::new(vec![person(1, 0.5), person(2, 0.9), person(3, 0.9)]);
        assert_eq!(frame.primary_person(0.4).map(|p| p.id), Some(2));
    }

    #[test]
    fn test_primary_person_below_threshold() {
        let frame = Frame::new(vec![person(1, 0.3), person(2, 0.4)]);
        assert!(frame.primary_person(0.4).is_none());
        assert!(Frame::default().primary_person(0.0).is_none());
    }

    #[test]
    fn test_coordinate_respects_confidence() {
        let p = Person {
            id: 0,
            keypoints: vec![KeyPoint::new(BodyPart::LeftWrist, Point::new(1.0, 2.0), 0.2)],
            bounding_box: None,
            score: 1.0,
        };
        assert_eq!(p.coordinate(BodyPart::LeftWrist, 0.1), Some(Point::new(1.0, 2.0)));
        assert_eq!(p.coordinate(BodyPart::LeftWrist, 0.5), None);
        assert_eq!(p.coordinate(BodyPart::RightWrist, 0.0), None);
    }
}
