//! Virtual piano keys: geometric hit-testing with hysteresis and timed debounce.
//!
//! The display is split into [`KEY_COUNT`] columns and a configurable number
//! of rows; the keys sit on one row. A key fires when a wrist movement segment
//! crosses the top edge of its band. While a key is active its vertical margin
//! is scaled by the active multiplier (negative by default), which raises the
//! top edge and makes repeated strikes easier.

use crate::{
    config::KeyLayoutConfig,
    constants::{KEY_COUNT, KEY_LABELS},
    error::{Error, Result},
    geometry::{segments_intersect, Point, Rect, Size},
};
use log::debug;

/// One key's band and its activation state
#[derive(Debug, Clone, PartialEq)]
pub struct KeyRegion {
    index: usize,
    label: &'static str,
    /// Raw grid cell the key occupies
    cell: Rect,
    margin_x: f32,
    margin_y: f32,
    active_margin_multiplier: f32,
    active: bool,
    last_activated_at: Option<u64>,
}

impl KeyRegion {
    /// Key `index` in a grid cell, with absolute inset margins
    #[must_use]
    pub fn new(index: usize, cell: Rect, margin_x: f32, margin_y: f32, active_margin_multiplier: f32) -> Self {
        Self {
            index,
            label: KEY_LABELS[index % KEY_COUNT],
            cell,
            margin_x,
            margin_y,
            active_margin_multiplier,
            active: false,
            last_activated_at: None,
        }
    }

    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Melody note number this key plays (index + 1)
    #[allow(clippy::cast_possible_truncation)]
    #[must_use]
    pub const fn note(&self) -> u8 {
        (self.index + 1) as u8
    }

    #[must_use]
    pub const fn label(&self) -> &'static str {
        self.label
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    #[must_use]
    pub const fn last_activated_at(&self) -> Option<u64> {
        self.last_activated_at
    }

    #[must_use]
    pub fn left_bound(&self) -> f32 {
        self.cell.left + self.margin_x
    }

    #[must_use]
    pub fn right_bound(&self) -> f32 {
        self.cell.right - self.margin_x
    }

    fn current_margin_y(&self) -> f32 {
        if self.active {
            self.margin_y * self.active_margin_multiplier
        } else {
            self.margin_y
        }
    }

    /// Y of the top edge that strikes must cross
    #[must_use]
    pub fn boundary_y(&self) -> f32 {
        self.cell.top + self.current_margin_y()
    }

    /// Full key rectangle as currently hit-tested and drawn
    #[must_use]
    pub fn bounds(&self) -> Rect {
        let margin_y = self.current_margin_y();
        Rect::new(
            self.left_bound(),
            self.cell.top + margin_y,
            self.right_bound(),
            self.cell.bottom - margin_y,
        )
    }

    /// Whether the segment `prev`–`new` crosses this key's top edge.
    ///
    /// Direction-independent; horizontal movement along the edge is parallel
    /// and never counts.
    #[must_use]
    pub fn crossed(&self, prev: Point, new: Point) -> bool {
        let y = self.boundary_y();
        segments_intersect(
            prev,
            new,
            Point::new(self.left_bound(), y),
            Point::new(self.right_bound(), y),
        )
    }

    /// Like [`crossed`](Self::crossed) but only for movement that starts above
    /// the edge and comes down onto the key
    #[must_use]
    pub fn struck(&self, prev: Point, new: Point) -> bool {
        prev.y < self.boundary_y() && self.crossed(prev, new)
    }

    /// Mark active as of `now_ms`, restarting the debounce window
    pub fn activate(&mut self, now_ms: u64) {
        self.active = true;
        self.last_activated_at = Some(now_ms);
    }

    /// Deactivate once `debounce_ms` has fully elapsed; returns true if the
    /// key was released by this call
    pub fn expire(&mut self, now_ms: u64, debounce_ms: u64) -> bool {
        if !self.active {
            return false;
        }
        let elapsed = self.last_activated_at.map_or(u64::MAX, |t| now_ms.saturating_sub(t));
        if elapsed >= debounce_ms {
            self.active = false;
            return true;
        }
        false
    }

    /// Drop activation state
    pub fn reset(&mut self) {
        self.active = false;
        self.last_activated_at = None;
    }
}

/// The fixed row of seven keys spanning the display width
#[derive(Debug, Clone, PartialEq)]
pub struct Keyboard {
    keys: Vec<KeyRegion>,
    debounce_ms: u64,
    downward_only: bool,
}

impl Keyboard {
    /// Lay out the keys for a display of `display` size.
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid display size or a key row outside the
    /// grid.
    #[allow(clippy::cast_precision_loss)]
    pub fn new(display: Size, layout: &KeyLayoutConfig, debounce_ms: u64) -> Result<Self> {
        if !display.is_valid() {
            return Err(Error::InvalidInput(format!(
                "Display size must be positive, got {}x{}",
                display.width, display.height
            )));
        }
        if layout.row_count == 0 || layout.key_row == 0 || layout.key_row > layout.row_count {
            return Err(Error::ConfigError(format!(
                "Key row {} must be within 1..={}",
                layout.key_row, layout.row_count
            )));
        }

        let cell_width = display.width / KEY_COUNT as f32;
        let cell_height = display.height / layout.row_count as f32;
        let margin_x = cell_width * layout.margin_x_fraction;
        let margin_y = cell_height * layout.margin_y_fraction;
        let top = (layout.key_row - 1) as f32 * cell_height;

        let keys = (0..KEY_COUNT)
            .map(|i| {
                let cell = Rect::new(i as f32 * cell_width, top, (i + 1) as f32 * cell_width, top + cell_height);
                KeyRegion::new(i, cell, margin_x, margin_y, layout.active_margin_multiplier)
            })
            .collect();

        Ok(Self {
            keys,
            debounce_ms,
            downward_only: layout.downward_strikes_only,
        })
    }

    #[must_use]
    pub fn keys(&self) -> &[KeyRegion] {
        &self.keys
    }

    #[must_use]
    pub fn key(&self, index: usize) -> Option<&KeyRegion> {
        self.keys.get(index)
    }

    #[must_use]
    pub const fn debounce_ms(&self) -> u64 {
        self.debounce_ms
    }

    /// Release every key whose debounce window has elapsed
    pub fn expire(&mut self, now_ms: u64) {
        let debounce = self.debounce_ms;
        for key in &mut self.keys {
            if key.expire(now_ms, debounce) {
                debug!("Key {} ({}) released", key.index(), key.label());
            }
        }
    }

    /// Test a movement against the keys in index order. The first key hit is
    /// activated and its index returned; no other key fires for this movement.
    pub fn strike(&mut self, prev: Point, new: Point, now_ms: u64) -> Option<usize> {
        let downward_only = self.downward_only;
        let key = self.keys.iter_mut().find(|k| {
            if downward_only {
                k.struck(prev, new)
            } else {
                k.crossed(prev, new)
            }
        })?;
        key.activate(now_ms);
        Some(key.index())
    }

    /// Release all keys
    pub fn reset(&mut self) {
        self.keys.iter_mut().for_each(KeyRegion::reset);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> KeyLayoutConfig {
        KeyLayoutConfig::default()
    }

    fn keyboard() -> Keyboard {
        // 700x1100 gives 100x100 cells, keys on row 6 (top edge y = 500)
        Keyboard::new(Size::new(700.0, 1100.0), &layout(), 200).unwrap()
    }

    #[test]
    fn test_layout_geometry() {
        let kb = keyboard();
        assert_eq!(kb.keys().len(), KEY_COUNT);
        let k3 = kb.key(3).unwrap();
        assert!((k3.left_bound() - 305.0).abs() < 1e-4);
        assert!((k3.right_bound() - 395.0).abs() < 1e-4);
        assert!((k3.boundary_y() - 505.0).abs() < 1e-4);
        assert_eq!(k3.label(), "Fa");
        assert_eq!(k3.note(), 4);
    }

    #[test]
    fn test_crossing_and_gap() {
        let kb = keyboard();
        let k0 = kb.key(0).unwrap();
        assert!(k0.crossed(Point::new(50.0, 450.0), Point::new(50.0, 560.0)));
        // Through the gap between keys 0 and 1
        assert!(!k0.crossed(Point::new(100.0, 450.0), Point::new(100.0, 560.0)));
        assert!(!kb.key(1).unwrap().crossed(Point::new(100.0, 450.0), Point::new(100.0, 560.0)));
        // Moving along the edge is parallel
        assert!(!k0.crossed(Point::new(10.0, 505.0), Point::new(90.0, 505.0)));
    }

    #[test]
    fn test_active_key_raises_edge() {
        let mut kb = keyboard();
        kb.strike(Point::new(50.0, 450.0), Point::new(50.0, 560.0), 0);
        let k0 = kb.key(0).unwrap();
        assert!(k0.is_active());
        // margin_y = 5, multiplier -2: edge moves from 505 to 490
        assert!((k0.boundary_y() - 490.0).abs() < 1e-4);
        assert!(k0.crossed(Point::new(50.0, 480.0), Point::new(50.0, 495.0)));
    }

    #[test]
    fn test_first_key_wins() {
        let mut kb = keyboard();
        assert_eq!(kb.strike(Point::new(150.0, 450.0), Point::new(150.0, 560.0), 0), Some(1));
        // Key 1's raised edge (y = 490) and key 2's edge (y = 505) are both
        // crossed by this sweep
        let hit = kb.strike(Point::new(150.0, 480.0), Point::new(250.0, 520.0), 10);
        assert_eq!(hit, Some(1));
        assert_eq!(kb.key(1).unwrap().last_activated_at(), Some(10));
        assert!(kb.key(1).unwrap().is_active());
        assert!(!kb.key(2).unwrap().is_active());
    }

    #[test]
    fn test_debounce_expiry() {
        let mut kb = keyboard();
        kb.strike(Point::new(650.0, 450.0), Point::new(650.0, 560.0), 1_000);
        kb.expire(1_199);
        assert!(kb.key(6).unwrap().is_active());
        kb.expire(1_200);
        assert!(!kb.key(6).unwrap().is_active());
        assert_eq!(kb.key(6).unwrap().last_activated_at(), Some(1_000));
    }

    #[test]
    fn test_downward_only() {
        let cfg = KeyLayoutConfig {
            downward_strikes_only: true,
            ..layout()
        };
        let mut kb = Keyboard::new(Size::new(700.0, 1100.0), &cfg, 200).unwrap();
        assert_eq!(kb.strike(Point::new(50.0, 560.0), Point::new(50.0, 450.0), 0), None);
        assert_eq!(kb.strike(Point::new(50.0, 450.0), Point::new(50.0, 560.0), 0), Some(0));
    }

    #[test]
    fn test_invalid_layout_rejected() {
        let cfg = KeyLayoutConfig {
            key_row: 12,
            ..layout()
        };
        assert!(Keyboard::new(Size::new(700.0, 1100.0), &cfg, 200).is_err());
        assert!(Keyboard::new(Size::new(0.0, 1100.0), &layout(), 200).is_err());
    }
}
