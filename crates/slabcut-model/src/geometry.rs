//! Geometry primitives: points, outlines, axis-aligned rectangles.
//!
//! All coordinates are double-precision millimetres. Containment checks use
//! a 1e-6 tolerance; there are no integer grids.

use serde::{Deserialize, Serialize};

/// Tolerance for "fits" comparisons.
pub const EPSILON: f64 = 1e-6;

/// A point in sheet coordinates (mm).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance(&self, other: &Point2D) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// A closed polygon given as an ordered vertex sequence.
///
/// Only used to carry importer outlines; the packer works on bounding boxes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Outline(pub Vec<Point2D>);

impl Outline {
    pub fn new(points: Vec<Point2D>) -> Self {
        Self(points)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the (min, max) corners of the axis-aligned bounding box.
    ///
    /// An empty outline yields a degenerate box at the origin.
    pub fn bounding_box(&self) -> (Point2D, Point2D) {
        let mut min = Point2D::new(f64::INFINITY, f64::INFINITY);
        let mut max = Point2D::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
        for p in &self.0 {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
        if self.0.is_empty() {
            return (Point2D::default(), Point2D::default());
        }
        (min, max)
    }

    /// Returns a copy translated by (dx, dy).
    pub fn translate(&self, dx: f64, dy: f64) -> Outline {
        Outline(
            self.0
                .iter()
                .map(|p| Point2D::new(p.x + dx, p.y + dy))
                .collect(),
        )
    }

    /// Returns a copy translated so the bounding-box min corner sits at the origin.
    pub fn normalize(&self) -> Outline {
        let (min, _) = self.bounding_box();
        self.translate(-min.x, -min.y)
    }

    /// Absolute enclosed area (shoelace formula).
    pub fn area(&self) -> f64 {
        if self.0.len() < 3 {
            return 0.0;
        }
        let mut sum = 0.0;
        for i in 0..self.0.len() {
            let a = &self.0[i];
            let b = &self.0[(i + 1) % self.0.len()];
            sum += a.x * b.y - b.x * a.y;
        }
        (sum / 2.0).abs()
    }
}

/// An axis-aligned rectangle with positive extent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        debug_assert!(w > 0.0 && h > 0.0, "Rect extent must be positive");
        Self { x, y, w, h }
    }

    pub fn area(&self) -> f64 {
        self.w * self.h
    }

    /// True when the interiors overlap. Rectangles that merely touch
    /// (separation on at least one axis) do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.x + other.w - EPSILON
            && other.x < self.x + self.w - EPSILON
            && self.y < other.y + other.h - EPSILON
            && other.y < self.y + self.h - EPSILON
    }

    /// True when `other` lies entirely inside `self` (with tolerance).
    pub fn contains(&self, other: &Rect) -> bool {
        other.x >= self.x - EPSILON
            && other.y >= self.y - EPSILON
            && other.x + other.w <= self.x + self.w + EPSILON
            && other.y + other.h <= self.y + self.h + EPSILON
    }

    /// Returns this rectangle grown by `amount` on every side.
    pub fn inflate(&self, amount: f64) -> Rect {
        Rect {
            x: self.x - amount,
            y: self.y - amount,
            w: self.w + 2.0 * amount,
            h: self.h + 2.0 * amount,
        }
    }
}
