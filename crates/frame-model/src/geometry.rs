//! Geometry primitives and the device/hand proximity test.
//!
//! Device centers come from detector boxes and are in pixel space.
//! Hand centers come from landmark models and are normalized to the frame.
//! [`is_within_reach`] is the one place the two spaces meet.

use serde::{Deserialize, Serialize};

/// A 2D point. The coordinate space depends on where it came from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: &Point2D) -> f64 {
        distance(*self, *other)
    }

    /// Scale a normalized point into pixel space for the given frame.
    pub fn to_pixels(&self, frame: FrameSize) -> Point2D {
        Point2D {
            x: self.x * frame.width as f64,
            y: self.y * frame.height as f64,
        }
    }
}

/// Frame dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameSize {
    pub width: u32,
    pub height: u32,
}

impl FrameSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// An axis-aligned bounding box in pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl BoundingBox {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Midpoint of the box.
    pub fn center(&self) -> Point2D {
        Point2D::new((self.x1 + self.x2) / 2.0, (self.y1 + self.y2) / 2.0)
    }

    pub fn width(&self) -> f64 {
        (self.x2 - self.x1).abs()
    }

    pub fn height(&self) -> f64 {
        (self.y2 - self.y1).abs()
    }

    /// Whether all corners are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.x1.is_finite() && self.y1.is_finite() && self.x2.is_finite() && self.y2.is_finite()
    }
}

/// Euclidean distance between two points.
pub fn distance(a: Point2D, b: Point2D) -> f64 {
    ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
}

/// Whether a hand is close enough to a device to be holding it.
///
/// `device_center_px` is in pixels; `hand_center_normalized` is in `[0, 1]`
/// frame units and is scaled by the frame size before comparison.
/// The boundary is inclusive.
pub fn is_within_reach(
    device_center_px: Point2D,
    hand_center_normalized: Point2D,
    frame: FrameSize,
    threshold_px: f64,
) -> bool {
    let hand_px = hand_center_normalized.to_pixels(frame);
    distance(device_center_px, hand_px) <= threshold_px
}
