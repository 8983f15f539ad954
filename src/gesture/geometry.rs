//! Touch-space geometry in CSS pixels.

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

/// A point in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Displacement from `self` to `other` as `(dx, dy)`.
    #[must_use]
    pub fn delta_to(self, other: Point) -> (f64, f64) {
        (other.x - self.x, other.y - self.y)
    }

    #[must_use]
    pub fn distance_to(self, other: Point) -> f64 {
        let (dx, dy) = self.delta_to(other);
        dx.hypot(dy)
    }
}

/// An axis-aligned rectangle; `x`/`y` is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Edges are inclusive.
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x <= self.x + self.width && point.y >= self.y && point.y <= self.y + self.height
    }
}

/// Something a swipe can start inside of.
pub trait Region {
    fn contains(&self, point: Point) -> bool;
}

impl Region for Rect {
    fn contains(&self, point: Point) -> bool {
        Rect::contains(self, point)
    }
}
