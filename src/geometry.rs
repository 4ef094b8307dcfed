//! Geometry primitives shared by remapping, stroke scoring and hit-testing.

use serde::{Deserialize, Serialize};

/// A 2D point in detector or display space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    #[must_use]
    pub fn distance(&self, other: &Self) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Same point with x and y exchanged
    #[must_use]
    pub const fn swapped(&self) -> Self {
        Self { x: self.y, y: self.x }
    }

    /// Rotate about the origin by `degrees`
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn rotated(&self, degrees: f64) -> Self {
        let rad = degrees.to_radians();
        let (sin_a, cos_a) = rad.sin_cos();
        let x = f64::from(self.x);
        let y = f64::from(self.y);
        Self {
            x: (x * cos_a - y * sin_a) as f32,
            y: (x * sin_a + y * cos_a) as f32,
        }
    }

    /// Lexicographic total order, used to canonicalise segment endpoints
    fn total_cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.x.total_cmp(&other.x).then(self.y.total_cmp(&other.y))
    }
}

/// Width/height pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn aspect_ratio(&self) -> f32 {
        self.width / self.height
    }

    /// True when both sides are finite and strictly positive
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Rect {
    #[must_use]
    pub const fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self { left, top, right, bottom }
    }

    #[must_use]
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    #[must_use]
    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }
}

/// Mean of a set of points, origin for an empty slice
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
pub fn average_point(points: &[Point]) -> Point {
    if points.is_empty() {
        return Point::default();
    }
    let (sum_x, sum_y) = points
        .iter()
        .fold((0.0_f64, 0.0_f64), |(sx, sy), p| (sx + f64::from(p.x), sy + f64::from(p.y)));
    let n = points.len() as f64;
    Point::new((sum_x / n) as f32, (sum_y / n) as f32)
}

/// Parametric segment intersection test between `p1–p2` and `p3–p4`.
///
/// Parallel or coincident segments (zero denominator) never intersect.
/// Endpoints are ordered canonically first so the result does not depend on
/// the direction either segment is given in.
#[must_use]
pub fn segments_intersect(p1: Point, p2: Point, p3: Point, p4: Point) -> bool {
    let (p1, p2) = if p1.total_cmp(&p2).is_le() { (p1, p2) } else { (p2, p1) };
    let (p3, p4) = if p3.total_cmp(&p4).is_le() { (p3, p4) } else { (p4, p3) };

    let denom = (p4.y - p3.y) * (p2.x - p1.x) - (p4.x - p3.x) * (p2.y - p1.y);
    if denom == 0.0 || !denom.is_finite() {
        return false;
    }
    let ua = ((p4.x - p3.x) * (p1.y - p3.y) - (p4.y - p3.y) * (p1.x - p3.x)) / denom;
    let ub = ((p2.x - p1.x) * (p1.y - p3.y) - (p2.y - p1.y) * (p1.x - p3.x)) / denom;
    (0.0..=1.0).contains(&ua) && (0.0..=1.0).contains(&ub)
}
