//! Detector-space to display-space coordinate remapping.
//!
//! The detector sees a (possibly rotated) camera image; the display shows it
//! aspect-fit inside the screen. Remapping applies, in order:
//!
//! 1. width/height swap for ±90°/270° rotations
//! 2. horizontal mirroring about the detect rectangle centre (when `flip`)
//!    or left/right body-part tag mirroring (when not)
//! 3. aspect-fit scale and letterbox offset

use crate::{
    error::{Error, Result},
    geometry::{Point, Rect, Size},
    pose::{KeyPoint, Person},
};

/// Precomputed aspect-fit transform from detector to display space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateRemapper {
    detect: Size,
    display: Size,
    flip: bool,
    rotation_degrees: f64,
    scale: f32,
    x_offset: f32,
    y_offset: f32,
}

impl CoordinateRemapper {
    /// Build a remapper for the given sizes and camera orientation.
    ///
    /// # Errors
    ///
    /// Returns an error if either size is non-positive or non-finite, or the
    /// rotation is not finite.
    pub fn new(detect: Size, display: Size, flip: bool, rotation_degrees: f64) -> Result<Self> {
        if !detect.is_valid() {
            return Err(Error::InvalidInput(format!(
                "Detect size must be positive, got {}x{}",
                detect.width, detect.height
            )));
        }
        if !display.is_valid() {
            return Err(Error::InvalidInput(format!(
                "Display size must be positive, got {}x{}",
                display.width, display.height
            )));
        }
        if !rotation_degrees.is_finite() {
            return Err(Error::InvalidInput("Rotation must be finite".to_string()));
        }

        let detect = if rotation_degrees % 180.0 == 0.0 {
            detect
        } else {
            Size::new(detect.height, detect.width)
        };

        let (scale, x_offset, y_offset) = if detect.aspect_ratio() < display.aspect_ratio() {
            // Detect rectangle is taller: fit width, centre vertically
            let scale = display.width / detect.width;
            (scale, 0.0, (display.height - detect.height * scale) / 2.0)
        } else {
            let scale = display.height / detect.height;
            (scale, (display.width - detect.width * scale) / 2.0, 0.0)
        };

        Ok(Self {
            detect,
            display,
            flip,
            rotation_degrees,
            scale,
            x_offset,
            y_offset,
        })
    }

    /// Detect size after any rotation swap
    #[must_use]
    pub const fn detect_size(&self) -> Size {
        self.detect
    }

    #[must_use]
    pub const fn display_size(&self) -> Size {
        self.display
    }

    #[must_use]
    pub const fn scale(&self) -> f32 {
        self.scale
    }

    /// Letterbox offset applied after scaling
    #[must_use]
    pub const fn offset(&self) -> (f32, f32) {
        (self.x_offset, self.y_offset)
    }

    #[must_use]
    pub const fn flip(&self) -> bool {
        self.flip
    }

    #[must_use]
    pub const fn rotation_degrees(&self) -> f64 {
        self.rotation_degrees
    }

    /// Map a single detector-space point into display space
    #[must_use]
    pub fn remap_point(&self, point: Point) -> Point {
        let x = if self.flip {
            let center_x = self.detect.width / 2.0;
            center_x - (point.x - center_x)
        } else {
            point.x
        };
        Point::new(x * self.scale + self.x_offset, point.y * self.scale + self.y_offset)
    }

    /// Inverse of [`remap_point`](Self::remap_point): the detector-space point
    /// that lands on `point`
    #[must_use]
    pub fn unmap_point(&self, point: Point) -> Point {
        let x = (point.x - self.x_offset) / self.scale;
        let y = (point.y - self.y_offset) / self.scale;
        let x = if self.flip {
            let center_x = self.detect.width / 2.0;
            center_x - (x - center_x)
        } else {
            x
        };
        Point::new(x, y)
    }

    fn remap_rect(&self, rect: Rect) -> Rect {
        let a = self.remap_point(Point::new(rect.left, rect.top));
        let b = self.remap_point(Point::new(rect.right, rect.bottom));
        Rect::new(a.x.min(b.x), a.y.min(b.y), a.x.max(b.x), a.y.max(b.y))
    }

    /// Remap every keypoint of a person, preserving count and order.
    ///
    /// Without `flip`, each tag is swapped with its mirror so anatomical
    /// left/right stay consistent with the unflipped camera image.
    #[must_use]
    pub fn remap(&self, person: &Person) -> Person {
        let keypoints = person
            .keypoints
            .iter()
            .map(|kp| {
                let part = if self.flip { kp.part } else { kp.part.mirror() };
                KeyPoint::new(part, self.remap_point(kp.coordinate), kp.confidence)
            })
            .collect();

        Person {
            id: person.id,
            keypoints,
            bounding_box: person.bounding_box.map(|r| self.remap_rect(r)),
            score: person.score,
        }
    }
}

/// One-shot form of [`CoordinateRemapper::remap`].
///
/// # Errors
///
/// Returns an error for invalid sizes or rotation, see [`CoordinateRemapper::new`].
pub fn remap_person(person: &Person, detect: Size, display: Size, flip: bool, rotation_degrees: f64) -> Result<Person> {
    Ok(CoordinateRemapper::new(detect, display, flip, rotation_degrees)?.remap(person))
}
