//! Axis-aligned bounding box collision
//!
//! Boxes are in screen space: +y points down, so `top < bottom`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::character::Character;
use super::obstacle::Obstacle;

/// Axis-aligned rectangle (top-left origin)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self::new(pos.x, pos.y, size.x, size.y)
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Shrink symmetrically by `padding` on every side
    pub fn shrink(&self, padding: f32) -> Self {
        Self::new(
            self.x + padding,
            self.y + padding,
            self.w - padding * 2.0,
            self.h - padding * 2.0,
        )
    }

    /// Separating-axis test. Touching edges count as overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        !(self.right() < other.left()
            || self.left() > other.right()
            || self.bottom() < other.top()
            || self.top() > other.bottom())
    }
}

/// True if the character's hitbox overlaps any obstacle's hitbox
pub fn check_collisions(character: &Character, obstacles: &[Obstacle]) -> bool {
    let bounds = character.bounds();
    obstacles.iter().any(|o| bounds.overlaps(&o.bounds()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_boxes_collide() {
        let a = Rect::new(10.0, 20.0, 30.0, 40.0);
        assert!(a.overlaps(&a));
    }

    #[test]
    fn test_separated_boxes_do_not_collide() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        // Right of a
        assert!(!a.overlaps(&Rect::new(10.5, 0.0, 10.0, 10.0)));
        // Below a
        assert!(!a.overlaps(&Rect::new(0.0, 11.0, 10.0, 10.0)));
        // Left of a
        assert!(!a.overlaps(&Rect::new(-20.0, 0.0, 10.0, 10.0)));
        // Above a
        assert!(!a.overlaps(&Rect::new(0.0, -10.1, 10.0, 10.0)));
    }

    #[test]
    fn test_partial_overlap_is_symmetric() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn test_shrink() {
        let r = Rect::new(200.0, 504.0, 96.0, 96.0).shrink(12.0);
        assert_eq!(r, Rect::new(212.0, 516.0, 72.0, 72.0));
        assert_eq!(r.right(), 284.0);
        assert_eq!(r.bottom(), 588.0);
    }
}
