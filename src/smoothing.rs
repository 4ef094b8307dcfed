//! Smoothing for keypoint positions that jitter from frame to frame.
//!
//! A smoother sees one point per frame for a single tracked landmark. The
//! engine owns one per wrist and resets it whenever the wrist drops out of
//! detection, so a re-acquired wrist is not dragged towards where it was
//! last seen. The head rotation estimator reuses [`WindowAverage`] with the
//! horizontal and vertical estimates packed into a [`Point`].

use crate::{constants::DEFAULT_SMOOTHING_WINDOW, geometry::Point, Error, Result};
use std::collections::VecDeque;

/// Per-landmark point smoother
pub trait PointSmoother: Send {
    /// Feed the newest observation and return the smoothed position
    fn smooth(&mut self, point: Point) -> Point;

    /// Forget every earlier observation
    fn reset(&mut self);

    /// Name as accepted by [`create_smoother`]
    fn name(&self) -> &'static str;
}

/// Returns each point unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct Passthrough;

impl PointSmoother for Passthrough {
    fn smooth(&mut self, point: Point) -> Point {
        point
    }

    fn reset(&mut self) {}

    fn name(&self) -> &'static str {
        "none"
    }
}

/// Mean of the most recent `window` points.
///
/// Until the window fills, the mean covers only the points seen so far, so
/// the first point after a reset comes back unchanged.
#[derive(Debug, Clone)]
pub struct WindowAverage {
    window: usize,
    points: VecDeque<Point>,
}

impl WindowAverage {
    /// # Panics
    ///
    /// Panics if `window` is zero
    #[must_use]
    pub fn new(window: usize) -> Self {
        assert!(window > 0, "Smoothing window must hold at least one point");
        Self {
            window,
            points: VecDeque::with_capacity(window),
        }
    }

    #[must_use]
    pub const fn window(&self) -> usize {
        self.window
    }

    /// Number of points currently averaged
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl PointSmoother for WindowAverage {
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    fn smooth(&mut self, point: Point) -> Point {
        if self.points.len() == self.window {
            self.points.pop_front();
        }
        self.points.push_back(point);

        let (sum_x, sum_y) = self
            .points
            .iter()
            .fold((0.0f64, 0.0f64), |(sx, sy), p| (sx + f64::from(p.x), sy + f64::from(p.y)));
        let n = self.points.len() as f64;
        Point::new((sum_x / n) as f32, (sum_y / n) as f32)
    }

    fn reset(&mut self) {
        self.points.clear();
    }

    fn name(&self) -> &'static str {
        "average"
    }
}

/// Build a smoother from its configured name.
///
/// Accepts `"none"` and `"average"` (alias `"moving_average"`), the latter
/// with an optional window such as `"average:3"`.
///
/// # Errors
///
/// Returns [`Error::SmoothingError`] for an unknown name or a window that is
/// not a positive integer.
pub fn create_smoother(name: &str) -> Result<Box<dyn PointSmoother>> {
    let lowered = name.trim().to_lowercase();
    let (kind, window) = match lowered.split_once(':') {
        Some((kind, window)) => (kind, Some(window)),
        None => (lowered.as_str(), None),
    };

    match (kind, window) {
        ("none", None) => Ok(Box::new(Passthrough)),
        ("average" | "moving_average", window) => {
            let window = match window {
                None => DEFAULT_SMOOTHING_WINDOW,
                Some(w) => w
                    .parse::<usize>()
                    .map_err(|_| Error::SmoothingError(format!("Window '{w}' in '{name}' is not a whole number")))?,
            };
            if window == 0 {
                return Err(Error::SmoothingError(format!("Window in '{name}' must hold at least one point")));
            }
            Ok(Box::new(WindowAverage::new(window)))
        }
        _ => Err(Error::SmoothingError(format!("Unknown smoothing: {name}"))),
    }
}
