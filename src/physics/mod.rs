//! Physics provider contract
//!
//! The simulation only talks to physics through [`PhysicsProvider`]. Bodies are
//! addressed by [`BodyHandle`] and grouped into [`Layer`]s; the simulation
//! registers which layer pairs collide (solid) or overlap (report only), and
//! each [`PhysicsProvider::step`] returns the contacts for those pairs.
//!
//! Calls with a handle the provider does not know are no-ops.

pub mod arcade;
pub mod collision;

pub use arcade::{ArcadeFactory, ArcadePhysics};
pub use collision::{Aabb, CollisionResult, reflect_into_surface, separate};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::PhysicsError;

/// Opaque body id, stable for the lifetime of one physics world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyHandle(pub u32);

/// Collision group a body belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Layer(pub u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyKind {
    /// Immovable, ignores gravity
    Static,
    /// Integrated every step
    Dynamic,
}

/// Everything needed to create a body
#[derive(Debug, Clone, Copy)]
pub struct BodyDesc {
    pub kind: BodyKind,
    pub layer: Layer,
    /// Center position
    pub pos: Vec2,
    /// Full width/height
    pub size: Vec2,
}

impl BodyDesc {
    pub fn fixed(layer: Layer, pos: Vec2, size: Vec2) -> Self {
        Self {
            kind: BodyKind::Static,
            layer,
            pos,
            size,
        }
    }

    pub fn dynamic(layer: Layer, pos: Vec2, size: Vec2) -> Self {
        Self {
            kind: BodyKind::Dynamic,
            layer,
            pos,
            size,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContactKind {
    /// Solid contact, already resolved by the provider
    Collide,
    /// Intersection with no physical response
    Overlap,
}

/// One contact from a step. `a` belongs to the first layer of the registered
/// pair, `b` to the second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contact {
    pub kind: ContactKind,
    pub a: BodyHandle,
    pub b: BodyHandle,
}

/// A 2D physics world the simulation can drive
pub trait PhysicsProvider {
    fn create_body(&mut self, desc: BodyDesc) -> BodyHandle;

    fn position(&self, body: BodyHandle) -> Option<Vec2>;
    fn velocity(&self, body: BodyHandle) -> Option<Vec2>;
    fn set_velocity(&mut self, body: BodyHandle, vel: Vec2);

    fn set_velocity_x(&mut self, body: BodyHandle, vx: f32) {
        if let Some(vel) = self.velocity(body) {
            self.set_velocity(body, Vec2::new(vx, vel.y));
        }
    }

    fn set_velocity_y(&mut self, body: BodyHandle, vy: f32) {
        if let Some(vel) = self.velocity(body) {
            self.set_velocity(body, Vec2::new(vel.x, vy));
        }
    }

    /// Per-axis restitution against solids and world bounds
    fn set_bounce(&mut self, body: BodyHandle, bounce: Vec2);
    fn set_collide_world_bounds(&mut self, body: BodyHandle, collide: bool);

    fn set_gravity(&mut self, gravity: Vec2);
    fn set_world_bounds(&mut self, bounds: Aabb);

    /// Solid response between two layers, reported as [`ContactKind::Collide`]
    fn add_collider(&mut self, a: Layer, b: Layer);
    /// Report-only intersections between two layers
    fn add_overlap(&mut self, a: Layer, b: Layer);

    /// Remove from the simulation until re-enabled
    fn disable_body(&mut self, body: BodyHandle);
    /// Reset to `pos` at rest and put back into the simulation
    fn enable_body(&mut self, body: BodyHandle, pos: Vec2);
    fn is_enabled(&self, body: BodyHandle) -> bool;

    /// Body rested on a solid surface below it during the last step
    fn touching_down(&self, body: BodyHandle) -> bool;

    /// Freeze all motion; `step` does nothing until resumed
    fn pause(&mut self);
    fn resume(&mut self);
    fn is_paused(&self) -> bool;

    /// Advance by `dt` seconds, returning contacts in a stable order
    fn step(&mut self, dt: f32) -> Vec<Contact>;
}

/// Creates a fresh provider for a mounted surface
pub trait PhysicsFactory {
    type Provider: PhysicsProvider;

    fn create(&mut self, width: f32, height: f32) -> Result<Self::Provider, PhysicsError>;
}
