//! Bounded per-limb point history.

use crate::geometry::Point;
use std::collections::VecDeque;

/// Most recent positions of one tracked limb, oldest first
#[derive(Debug, Clone, PartialEq)]
pub struct TrajectoryBuffer {
    capacity: usize,
    points: VecDeque<Point>,
}

impl TrajectoryBuffer {
    /// # Panics
    ///
    /// Panics if `capacity` is less than 2
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        assert!(capacity >= 2, "Trajectory capacity must be at least 2");
        Self {
            capacity,
            points: VecDeque::with_capacity(capacity),
        }
    }

    /// Append a point, evicting the oldest when full
    pub fn push(&mut self, point: Point) {
        if self.points.len() >= self.capacity {
            self.points.pop_front();
        }
        self.points.push_back(point);
    }

    /// The previous and the newest point, once two are buffered
    #[must_use]
    pub fn last_two(&self) -> Option<(Point, Point)> {
        let n = self.points.len();
        if n < 2 {
            return None;
        }
        Some((self.points[n - 2], self.points[n - 1]))
    }

    #[must_use]
    pub fn points(&self) -> Vec<Point> {
        self.points.iter().copied().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Drop everything but the newest point
    pub fn keep_last(&mut self) {
        while self.points.len() > 1 {
            self.points.pop_front();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evicts_oldest() {
        let mut buffer = TrajectoryBuffer::new(3);
        for i in 0..5 {
            buffer.push(Point::new(i as f32, 0.0));
        }
        let xs: Vec<f32> = buffer.points().iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_last_two() {
        let mut buffer = TrajectoryBuffer::new(4);
        assert!(buffer.last_two().is_none());
        buffer.push(Point::new(1.0, 1.0));
        assert!(buffer.last_two().is_none());
        buffer.push(Point::new(2.0, 2.0));
        assert_eq!(buffer.last_two(), Some((Point::new(1.0, 1.0), Point::new(2.0, 2.0))));
    }

    #[test]
    fn test_keep_last_and_clear() {
        let mut buffer = TrajectoryBuffer::new(4);
        buffer.push(Point::new(1.0, 1.0));
        buffer.push(Point::new(2.0, 2.0));
        buffer.push(Point::new(3.0, 3.0));
        buffer.keep_last();
        assert_eq!(buffer.points(), vec![Point::new(3.0, 3.0)]);
        buffer.clear();
        assert!(buffer.is_empty());
    }
}
