//! Core data types for the passive motion detection engine.
//!
//! This module defines the device identities and the planar geometry the
//! tile scorer operates on.
//!
//! # Type Categories
//!
//! - **Device Types**: [`DeviceId`], [`Receiver`], [`Transmitter`]
//! - **Geometry Types**: [`Point`], [`Segment`], [`Rect`]

use serde::{Deserialize, Serialize};

/// Unique identifier for a receiver or transmitter device.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeviceId(String);

impl DeviceId {
    /// Creates a new device ID from a string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the device ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DeviceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for DeviceId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

/// A fixed receiver in the instrumented region.
///
/// Receivers are registered by an external world-model layer and persist for
/// the life of the process. Re-registration by the same id overwrites the
/// previous entry (last-write-wins).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Receiver {
    /// Device identifier
    pub id: DeviceId,
    /// Position in region coordinates
    pub location: Point,
    /// Identifier of the region this receiver belongs to
    pub region_id: String,
}

impl Receiver {
    /// Creates a new receiver.
    #[must_use]
    pub fn new(id: impl Into<DeviceId>, x: f32, y: f32, region_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            location: Point::new(x, y),
            region_id: region_id.into(),
        }
    }
}

impl From<String> for DeviceId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for Receiver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Receiver ({}) in \"{}\" @ ({}, {})",
            self.id, self.region_id, self.location.x, self.location.y
        )
    }
}

/// A fixed transmitter in the instrumented region.
///
/// Same registration and lifetime semantics as [`Receiver`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transmitter {
    /// Device identifier
    pub id: DeviceId,
    /// Position in region coordinates
    pub location: Point,
    /// Identifier of the region this transmitter belongs to
    pub region_id: String,
}

impl Transmitter {
    /// Creates a new transmitter.
    #[must_use]
    pub fn new(id: impl Into<DeviceId>, x: f32, y: f32, region_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            location: Point::new(x, y),
            region_id: region_id.into(),
        }
    }
}

impl std::fmt::Display for Transmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Transmitter ({}) in \"{}\" @ ({}, {})",
            self.id, self.region_id, self.location.x, self.location.y
        )
    }
}

// =============================================================================
// Geometry
// =============================================================================

/// A point in region coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate
    pub x: f32,
    /// Y coordinate
    pub y: f32,
}

impl Point {
    /// Creates a new point.
    #[must_use]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance_to(&self, other: Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// A line segment between two points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// First endpoint
    pub p1: Point,
    /// Second endpoint
    pub p2: Point,
}

impl Segment {
    /// Creates a new segment.
    #[must_use]
    pub fn new(p1: Point, p2: Point) -> Self {
        Self { p1, p2 }
    }

    /// Length of the segment.
    #[must_use]
    pub fn length(&self) -> f32 {
        self.p1.distance_to(self.p2)
    }

    /// Returns `true` if the segment shares at least one point with the
    /// rectangle. Points on the rectangle boundary count as inside.
    ///
    /// Cohen-Sutherland clipping against the rectangle's outcodes.
    #[must_use]
    pub fn intersects(&self, rect: &Rect) -> bool {
        let mut x1 = self.p1.x;
        let mut y1 = self.p1.y;
        let x2 = self.p2.x;
        let y2 = self.p2.y;

        let out2 = rect.outcode(x2, y2);
        if out2 == 0 {
            return true;
        }
        let mut out1 = rect.outcode(x1, y1);
        while out1 != 0 {
            if out1 & out2 != 0 {
                return false;
            }
            if out1 & (Rect::OUT_LEFT | Rect::OUT_RIGHT) != 0 {
                let bx = if out1 & Rect::OUT_RIGHT != 0 {
                    rect.x + rect.width
                } else {
                    rect.x
                };
                y1 += (bx - x1) * (y2 - y1) / (x2 - x1);
                x1 = bx;
            } else {
                let by = if out1 & Rect::OUT_BOTTOM != 0 {
                    rect.y + rect.height
                } else {
                    rect.y
                };
                x1 += (by - y1) * (x2 - x1) / (y2 - y1);
                y1 = by;
            }
            out1 = rect.outcode(x1, y1);
        }
        true
    }
}

/// An axis-aligned rectangle given by its origin corner and size.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Origin X (minimum X)
    pub x: f32,
    /// Origin Y (minimum Y)
    pub y: f32,
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
}

impl Rect {
    const OUT_LEFT: u8 = 0b0001;
    const OUT_TOP: u8 = 0b0010;
    const OUT_RIGHT: u8 = 0b0100;
    const OUT_BOTTOM: u8 = 0b1000;

    /// Creates a new rectangle.
    #[must_use]
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Center point of the rectangle.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Returns `true` if the point lies inside the rectangle, boundary
    /// included.
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        self.outcode(p.x, p.y) == 0
    }

    fn outcode(&self, px: f32, py: f32) -> u8 {
        let mut out = 0;
        if px < self.x {
            out |= Self::OUT_LEFT;
        } else if px > self.x + self.width {
            out |= Self::OUT_RIGHT;
        }
        if py < self.y {
            out |= Self::OUT_TOP;
        } else if py > self.y + self.height {
            out |= Self::OUT_BOTTOM;
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert!((a.distance_to(b) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_segment_length() {
        let s = Segment::new(Point::new(1.0, 1.0), Point::new(1.0, 6.0));
        assert!((s.length() - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_segment_crosses_rect() {
        let rect = Rect::new(10.0, 10.0, 20.0, 20.0);
        // Crosses straight through
        let s = Segment::new(Point::new(0.0, 20.0), Point::new(50.0, 20.0));
        assert!(s.intersects(&rect));
    }

    #[test]
    fn test_segment_endpoint_inside_rect() {
        let rect = Rect::new(10.0, 10.0, 20.0, 20.0);
        let s = Segment::new(Point::new(15.0, 15.0), Point::new(100.0, 100.0));
        assert!(s.intersects(&rect));
    }

    #[test]
    fn test_segment_misses_rect() {
        let rect = Rect::new(10.0, 10.0, 20.0, 20.0);
        let s = Segment::new(Point::new(0.0, 0.0), Point::new(50.0, 0.0));
        assert!(!s.intersects(&rect));
    }

    #[test]
    fn test_segment_misses_rect_diagonally() {
        let rect = Rect::new(10.0, 10.0, 10.0, 10.0);
        // Both endpoints outside, opposite corners, but passes wide of the box
        let s = Segment::new(Point::new(0.0, 25.0), Point::new(25.0, 50.0));
        assert!(!s.intersects(&rect));
    }

    #[test]
    fn test_segment_on_rect_edge() {
        let rect = Rect::new(0.0, 0.0, 20.0, 20.0);
        // Runs along the bottom edge; boundary counts as intersection
        let s = Segment::new(Point::new(-5.0, 0.0), Point::new(25.0, 0.0));
        assert!(s.intersects(&rect));
    }

    #[test]
    fn test_rect_center() {
        let rect = Rect::new(10.0, 20.0, 20.0, 40.0);
        let c = rect.center();
        assert!((c.x - 20.0).abs() < 1e-6);
        assert!((c.y - 40.0).abs() < 1e-6);
    }

    #[test]
    fn test_device_display() {
        let rx = Receiver::new("rx-1", 1.0, 2.0, "lab");
        assert!(rx.to_string().contains("rx-1"));
        assert!(rx.to_string().contains("lab"));
    }
}
