//! Axis-aligned rectangle geometry
//!
//! Every shape in BoxTron is an axis-aligned rectangle described by its
//! center and full size, in scene coordinates (origin at the arena center).

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Center point
    pub center: Vec2,
    /// Full width and height
    pub size: Vec2,
}

impl Rect {
    pub fn new(center: Vec2, size: Vec2) -> Self {
        Self { center, size }
    }

    /// Rectangle centered on the origin
    pub fn centered(size: Vec2) -> Self {
        Self::new(Vec2::ZERO, size)
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.size.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.size.y
    }

    /// Bottom-left corner
    #[inline]
    pub fn min(&self) -> Vec2 {
        self.center - self.size * 0.5
    }

    /// Top-right corner
    #[inline]
    pub fn max(&self) -> Vec2 {
        self.center + self.size * 0.5
    }

    /// Grow every side outward by `amount` (negative shrinks)
    pub fn inflate(&self, amount: f32) -> Self {
        Self::new(self.center, (self.size + Vec2::splat(amount * 2.0)).max(Vec2::ZERO))
    }

    /// Point containment, edges inclusive
    pub fn contains_point(&self, point: Vec2) -> bool {
        let (min, max) = (self.min(), self.max());
        point.x >= min.x && point.x <= max.x && point.y >= min.y && point.y <= max.y
    }

    /// Overlap test, touching edges count as overlap
    pub fn intersects(&self, other: &Rect) -> bool {
        let (a_min, a_max) = (self.min(), self.max());
        let (b_min, b_max) = (other.min(), other.max());
        a_min.x <= b_max.x && b_min.x <= a_max.x && a_min.y <= b_max.y && b_min.y <= a_max.y
    }

    /// True if `other` lies entirely inside this rectangle without touching its edges
    pub fn strictly_contains(&self, other: &Rect) -> bool {
        let (a_min, a_max) = (self.min(), self.max());
        let (b_min, b_max) = (other.min(), other.max());
        b_min.x > a_min.x && b_max.x < a_max.x && b_min.y > a_min.y && b_max.y < a_max.y
    }

    /// True if the outlines of the two rectangles cross or touch
    pub fn outline_crosses_outline(&self, other: &Rect) -> bool {
        self.intersects(other) && !self.strictly_contains(other) && !other.strictly_contains(self)
    }

    /// True if this rectangle's outline crosses or lies inside the filled `solid`
    pub fn outline_crosses_area(&self, solid: &Rect) -> bool {
        self.intersects(solid) && !self.strictly_contains(solid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inflate() {
        let r = Rect::centered(Vec2::new(300.0, 500.0)).inflate(40.0);
        assert_eq!(r.size, Vec2::new(380.0, 580.0));
        assert_eq!(r.center, Vec2::ZERO);

        // Shrinking past zero clamps instead of inverting
        let tiny = Rect::centered(Vec2::new(10.0, 10.0)).inflate(-20.0);
        assert_eq!(tiny.size, Vec2::ZERO);
    }

    #[test]
    fn test_contains_point_edges() {
        let r = Rect::new(Vec2::new(10.0, 10.0), Vec2::new(20.0, 20.0));
        assert!(r.contains_point(Vec2::new(0.0, 0.0)));
        assert!(r.contains_point(Vec2::new(20.0, 20.0)));
        assert!(!r.contains_point(Vec2::new(20.1, 10.0)));
    }

    #[test]
    fn test_outline_vs_outline() {
        let wall = Rect::centered(Vec2::new(300.0, 500.0));

        // Wide but short box: outlines cross
        let crossing = Rect::centered(Vec2::new(400.0, 400.0));
        assert!(crossing.outline_crosses_outline(&wall));

        // Box fully around the wall: no crossing
        let around = Rect::centered(Vec2::new(400.0, 600.0));
        assert!(!around.outline_crosses_outline(&wall));
        assert!(!wall.outline_crosses_outline(&around));

        // Far away: no crossing
        let away = Rect::new(Vec2::new(1000.0, 0.0), Vec2::new(10.0, 10.0));
        assert!(!away.outline_crosses_outline(&wall));
    }

    #[test]
    fn test_outline_vs_area() {
        let wall = Rect::centered(Vec2::new(300.0, 500.0));

        // Outline buried inside the solid still touches it
        let inside = Rect::centered(Vec2::new(100.0, 100.0));
        assert!(inside.outline_crosses_area(&wall));

        // Outline that encloses the solid does not
        let around = Rect::centered(Vec2::new(320.0, 520.0));
        assert!(!around.outline_crosses_area(&wall));
    }
}
