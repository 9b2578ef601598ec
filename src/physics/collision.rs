//! Axis-aligned box overlap and separation
//!
//! Everything in the play area is a box, so separation is always along one
//! axis: whichever needs the smallest push.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn from_center(center: Vec2, half: Vec2) -> Self {
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    pub fn half_extents(&self) -> Vec2 {
        (self.max - self.min) * 0.5
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Strict intersection: boxes that only share an edge do not intersect
    #[inline]
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }

    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

/// Result of a separation check
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionResult {
    /// Whether the boxes intersect
    pub hit: bool,
    /// Unit axis to push the first box along to separate it from the second
    pub normal: Vec2,
    /// Push distance along `normal`
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }

    /// Normal points up: the first box is resting on top of the second
    pub fn lands_on_top(&self) -> bool {
        self.hit && self.normal.y < 0.0
    }
}

/// Minimum translation to move `a` out of `b`
///
/// Ties favor vertical separation so a box sliding along a floor is never
/// shoved sideways off it.
pub fn separate(a: &Aabb, b: &Aabb) -> CollisionResult {
    if !a.intersects(b) {
        return CollisionResult::miss();
    }

    // a's bottom sunk into b's top
    let push_up = a.max.y - b.min.y;
    // a's top sunk into b's bottom
    let push_down = b.max.y - a.min.y;
    let push_left = a.max.x - b.min.x;
    let push_right = b.max.x - a.min.x;

    let candidates = [
        (push_up, Vec2::new(0.0, -1.0)),
        (push_down, Vec2::new(0.0, 1.0)),
        (push_left, Vec2::new(-1.0, 0.0)),
        (push_right, Vec2::new(1.0, 0.0)),
    ];

    let mut best = candidates[0];
    for candidate in &candidates[1..] {
        if candidate.0 < best.0 {
            best = *candidate;
        }
    }

    CollisionResult {
        hit: true,
        normal: best.1,
        penetration: best.0,
    }
}

/// Reflect the part of `velocity` heading into a surface, scaled by `bounce`
///
/// Motion away from the surface is left alone.
#[inline]
pub fn reflect_into_surface(velocity: Vec2, normal: Vec2, bounce: Vec2) -> Vec2 {
    let approach = velocity.dot(normal);
    if approach >= 0.0 {
        return velocity;
    }
    if normal.x != 0.0 {
        Vec2::new(-velocity.x * bounce.x, velocity.y)
    } else {
        Vec2::new(velocity.x, -velocity.y * bounce.y)
    }
}
