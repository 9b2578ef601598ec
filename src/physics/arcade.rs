//! Arcade physics: boxes, gravity, bounce
//!
//! Semi-implicit Euler integration, then world-bounds clamping, then
//! pairwise separation for every registered collider pair. Bodies are stored
//! in creation order and pairs are visited in that order, so contacts come out
//! the same way every run.

use glam::Vec2;

use super::collision::{Aabb, reflect_into_surface, separate};
use super::{BodyDesc, BodyHandle, BodyKind, Contact, ContactKind, Layer, PhysicsFactory, PhysicsProvider};
use crate::error::PhysicsError;

/// Smallest surface a world can be built for
const MIN_WORLD_SIZE: f32 = 1.0;

#[derive(Debug, Clone, Copy)]
struct Body {
    kind: BodyKind,
    layer: Layer,
    pos: Vec2,
    half: Vec2,
    vel: Vec2,
    bounce: Vec2,
    collide_world_bounds: bool,
    enabled: bool,
    touching_down: bool,
}

impl Body {
    fn aabb(&self) -> Aabb {
        Aabb::from_center(self.pos, self.half)
    }

    fn is_dynamic(&self) -> bool {
        self.kind == BodyKind::Dynamic
    }
}

/// Box-only physics world
#[derive(Debug, Clone)]
pub struct ArcadePhysics {
    bodies: Vec<Body>,
    gravity: Vec2,
    bounds: Aabb,
    colliders: Vec<(Layer, Layer)>,
    overlaps: Vec<(Layer, Layer)>,
    paused: bool,
}

impl ArcadePhysics {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            bodies: Vec::new(),
            gravity: Vec2::ZERO,
            bounds: Aabb::new(Vec2::ZERO, Vec2::new(width, height)),
            colliders: Vec::new(),
            overlaps: Vec::new(),
            paused: false,
        }
    }

    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Box of an enabled body
    pub fn aabb(&self, body: BodyHandle) -> Option<Aabb> {
        self.get(body).filter(|b| b.enabled).map(Body::aabb)
    }

    fn get(&self, body: BodyHandle) -> Option<&Body> {
        self.bodies.get(body.0 as usize)
    }

    fn get_mut(&mut self, body: BodyHandle) -> Option<&mut Body> {
        self.bodies.get_mut(body.0 as usize)
    }

    fn integrate(&mut self, dt: f32) {
        let gravity = self.gravity;
        let bounds = self.bounds;
        for body in self.bodies.iter_mut().filter(|b| b.enabled && b.is_dynamic()) {
            body.touching_down = false;
            body.vel += gravity * dt;
            body.pos += body.vel * dt;

            if body.collide_world_bounds {
                clamp_to_bounds(body, &bounds);
            }
        }
    }

    /// Candidate pairs for a layer pair, each unordered pair once
    fn pairs(&self, la: Layer, lb: Layer) -> Vec<(usize, usize)> {
        let mut pairs = Vec::new();
        for (i, a) in self.bodies.iter().enumerate() {
            if !a.enabled || a.layer != la {
                continue;
            }
            for (j, b) in self.bodies.iter().enumerate() {
                if !b.enabled || b.layer != lb || i == j {
                    continue;
                }
                if la == lb && j < i {
                    continue;
                }
                pairs.push((i, j));
            }
        }
        pairs
    }

    fn resolve_colliders(&mut self, contacts: &mut Vec<Contact>) {
        for (la, lb) in self.colliders.clone() {
            for (i, j) in self.pairs(la, lb) {
                let mut a = self.bodies[i];
                let mut b = self.bodies[j];
                if !a.is_dynamic() && !b.is_dynamic() {
                    continue;
                }

                let result = separate(&a.aabb(), &b.aabb());
                if !result.hit {
                    continue;
                }

                match (a.is_dynamic(), b.is_dynamic()) {
                    (true, false) => {
                        a.pos += result.normal * result.penetration;
                        a.vel = reflect_into_surface(a.vel, result.normal, a.bounce);
                        a.touching_down |= result.lands_on_top();
                    }
                    (false, true) => {
                        let normal = -result.normal;
                        b.pos += normal * result.penetration;
                        b.vel = reflect_into_surface(b.vel, normal, b.bounce);
                        b.touching_down |= normal.y < 0.0;
                    }
                    _ => {
                        let push = result.normal * (result.penetration * 0.5);
                        a.pos += push;
                        b.pos -= push;
                        exchange_velocity(&mut a, &mut b, result.normal);
                        a.touching_down |= result.lands_on_top();
                        b.touching_down |= result.normal.y > 0.0;
                    }
                }

                self.bodies[i] = a;
                self.bodies[j] = b;
                contacts.push(Contact {
                    kind: ContactKind::Collide,
                    a: BodyHandle(i as u32),
                    b: BodyHandle(j as u32),
                });
            }
        }
    }

    fn report_overlaps(&self, contacts: &mut Vec<Contact>) {
        for &(la, lb) in &self.overlaps {
            for (i, j) in self.pairs(la, lb) {
                if self.bodies[i].aabb().intersects(&self.bodies[j].aabb()) {
                    contacts.push(Contact {
                        kind: ContactKind::Overlap,
                        a: BodyHandle(i as u32),
                        b: BodyHandle(j as u32),
                    });
                }
            }
        }
    }
}

fn clamp_to_bounds(body: &mut Body, bounds: &Aabb) {
    let min = bounds.min + body.half;
    let max = bounds.max - body.half;

    if body.pos.x < min.x {
        body.pos.x = min.x;
        body.vel = reflect_into_surface(body.vel, Vec2::X, body.bounce);
    } else if body.pos.x > max.x {
        body.pos.x = max.x;
        body.vel = reflect_into_surface(body.vel, Vec2::NEG_X, body.bounce);
    }

    if body.pos.y < min.y {
        body.pos.y = min.y;
        body.vel = reflect_into_surface(body.vel, Vec2::Y, body.bounce);
    } else if body.pos.y > max.y {
        body.pos.y = max.y;
        body.vel = reflect_into_surface(body.vel, Vec2::NEG_Y, body.bounce);
        body.touching_down = true;
    }
}

/// Equal-mass exchange of the velocity components along `normal`
fn exchange_velocity(a: &mut Body, b: &mut Body, normal: Vec2) {
    let closing = (a.vel - b.vel).dot(normal);
    if closing >= 0.0 {
        return;
    }
    if normal.x != 0.0 {
        let (va, vb) = (a.vel.x, b.vel.x);
        a.vel.x = vb * a.bounce.x;
        b.vel.x = va * b.bounce.x;
    } else {
        let (va, vb) = (a.vel.y, b.vel.y);
        a.vel.y = vb * a.bounce.y;
        b.vel.y = va * b.bounce.y;
    }
}

impl PhysicsProvider for ArcadePhysics {
    fn create_body(&mut self, desc: BodyDesc) -> BodyHandle {
        let handle = BodyHandle(self.bodies.len() as u32);
        self.bodies.push(Body {
            kind: desc.kind,
            layer: desc.layer,
            pos: desc.pos,
            half: desc.size * 0.5,
            vel: Vec2::ZERO,
            bounce: Vec2::ZERO,
            collide_world_bounds: false,
            enabled: true,
            touching_down: false,
        });
        handle
    }

    fn position(&self, body: BodyHandle) -> Option<Vec2> {
        self.get(body).map(|b| b.pos)
    }

    fn velocity(&self, body: BodyHandle) -> Option<Vec2> {
        self.get(body).map(|b| b.vel)
    }

    fn set_velocity(&mut self, body: BodyHandle, vel: Vec2) {
        if let Some(b) = self.get_mut(body).filter(|b| b.is_dynamic()) {
            b.vel = vel;
        }
    }

    fn set_bounce(&mut self, body: BodyHandle, bounce: Vec2) {
        if let Some(b) = self.get_mut(body) {
            b.bounce = bounce;
        }
    }

    fn set_collide_world_bounds(&mut self, body: BodyHandle, collide: bool) {
        if let Some(b) = self.get_mut(body) {
            b.collide_world_bounds = collide;
        }
    }

    fn set_gravity(&mut self, gravity: Vec2) {
        self.gravity = gravity;
    }

    fn set_world_bounds(&mut self, bounds: Aabb) {
        self.bounds = bounds;
    }

    fn add_collider(&mut self, a: Layer, b: Layer) {
        if !self.colliders.contains(&(a, b)) {
            self.colliders.push((a, b));
        }
    }

    fn add_overlap(&mut self, a: Layer, b: Layer) {
        if !self.overlaps.contains(&(a, b)) {
            self.overlaps.push((a, b));
        }
    }

    fn disable_body(&mut self, body: BodyHandle) {
        if let Some(b) = self.get_mut(body) {
            b.enabled = false;
            b.touching_down = false;
        }
    }

    fn enable_body(&mut self, body: BodyHandle, pos: Vec2) {
        if let Some(b) = self.get_mut(body) {
            b.pos = pos;
            b.vel = Vec2::ZERO;
            b.touching_down = false;
            b.enabled = true;
        }
    }

    fn is_enabled(&self, body: BodyHandle) -> bool {
        self.get(body).is_some_and(|b| b.enabled)
    }

    fn touching_down(&self, body: BodyHandle) -> bool {
        self.get(body).is_some_and(|b| b.enabled && b.touching_down)
    }

    fn pause(&mut self) {
        self.paused = true;
    }

    fn resume(&mut self) {
        self.paused = false;
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn step(&mut self, dt: f32) -> Vec<Contact> {
        if self.paused || dt <= 0.0 {
            return Vec::new();
        }

        let mut contacts = Vec::new();
        self.integrate(dt);
        self.resolve_colliders(&mut contacts);
        self.report_overlaps(&mut contacts);
        contacts
    }
}

/// Builds an [`ArcadePhysics`] sized to the mounted surface
#[derive(Debug, Clone, Copy, Default)]
pub struct ArcadeFactory;

impl PhysicsFactory for ArcadeFactory {
    type Provider = ArcadePhysics;

    fn create(&mut self, width: f32, height: f32) -> Result<ArcadePhysics, PhysicsError> {
        let usable = |v: f32| v.is_finite() && v >= MIN_WORLD_SIZE;
        if !usable(width) || !usable(height) {
            return Err(PhysicsError::DegenerateSurface { width, height });
        }
        Ok(ArcadePhysics::new(width, height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOLID: Layer = Layer(0);
    const MOVER: Layer = Layer(1);
    const PICKUP: Layer = Layer(2);
    const DT: f32 = 1.0 / 60.0;

    fn world_with_ground() -> (ArcadePhysics, BodyHandle) {
        let mut world = ArcadePhysics::new(800.0, 600.0);
        world.set_gravity(Vec2::new(0.0, 300.0));
        let ground = world.create_body(BodyDesc::fixed(
            SOLID,
            Vec2::new(400.0, 568.0),
            Vec2::new(800.0, 64.0),
        ));
        world.add_collider(MOVER, SOLID);
        (world, ground)
    }

    #[test]
    fn test_gravity_pulls_down() {
        let (mut world, _) = world_with_ground();
        let body = world.create_body(BodyDesc::dynamic(
            MOVER,
            Vec2::new(100.0, 100.0),
            Vec2::new(32.0, 48.0),
        ));
        world.step(DT);
        let pos = world.position(body).unwrap();
        assert!(pos.y > 100.0);
        assert!(!world.touching_down(body));
    }

    #[test]
    fn test_body_lands_and_reports_ground_contact() {
        let (mut world, ground) = world_with_ground();
        let body = world.create_body(BodyDesc::dynamic(
            MOVER,
            Vec2::new(100.0, 450.0),
            Vec2::new(32.0, 48.0),
        ));
        world.set_bounce(body, Vec2::splat(0.2));

        let mut landed = false;
        for _ in 0..300 {
            let contacts = world.step(DT);
            if world.touching_down(body) {
                landed = true;
                assert!(contacts.iter().any(|c| c.a == body && c.b == ground));
            }
        }
        assert!(landed);
        // Resting on the ground top (536)
        let pos = world.position(body).unwrap();
        assert!((pos.y + 24.0 - 536.0).abs() < 1.0, "feet at {}", pos.y + 24.0);
    }

    #[test]
    fn test_world_bounds_bounce() {
        let mut world = ArcadePhysics::new(800.0, 600.0);
        let body = world.create_body(BodyDesc::dynamic(
            MOVER,
            Vec2::new(795.0, 300.0),
            Vec2::new(14.0, 14.0),
        ));
        world.set_bounce(body, Vec2::ONE);
        world.set_collide_world_bounds(body, true);
        world.set_velocity(body, Vec2::new(120.0, 0.0));
        world.step(DT);

        let pos = world.position(body).unwrap();
        let vel = world.velocity(body).unwrap();
        assert_eq!(pos.x, 793.0);
        assert_eq!(vel.x, -120.0);
    }

    #[test]
    fn test_overlap_reports_without_response() {
        let mut world = ArcadePhysics::new(800.0, 600.0);
        world.add_overlap(MOVER, PICKUP);
        let mover = world.create_body(BodyDesc::dynamic(
            MOVER,
            Vec2::new(100.0, 100.0),
            Vec2::new(32.0, 48.0),
        ));
        let pickup = world.create_body(BodyDesc::dynamic(
            PICKUP,
            Vec2::new(110.0, 100.0),
            Vec2::new(24.0, 22.0),
        ));

        let contacts = world.step(DT);
        assert_eq!(
            contacts,
            vec![Contact {
                kind: ContactKind::Overlap,
                a: mover,
                b: pickup,
            }]
        );
        assert_eq!(world.position(pickup), Some(Vec2::new(110.0, 100.0)));
    }

    #[test]
    fn test_disabled_body_is_frozen_and_silent() {
        let mut world = ArcadePhysics::new(800.0, 600.0);
        world.set_gravity(Vec2::new(0.0, 300.0));
        world.add_overlap(MOVER, PICKUP);
        world.create_body(BodyDesc::dynamic(
            MOVER,
            Vec2::new(100.0, 100.0),
            Vec2::new(32.0, 48.0),
        ));
        let pickup = world.create_body(BodyDesc::dynamic(
            PICKUP,
            Vec2::new(100.0, 100.0),
            Vec2::new(24.0, 22.0),
        ));
        world.disable_body(pickup);

        assert!(world.step(DT).is_empty());
        assert_eq!(world.position(pickup), Some(Vec2::new(100.0, 100.0)));

        world.enable_body(pickup, Vec2::new(300.0, 0.0));
        assert!(world.is_enabled(pickup));
        assert_eq!(world.velocity(pickup), Some(Vec2::ZERO));
    }

    #[test]
    fn test_pause_freezes_everything() {
        let (mut world, _) = world_with_ground();
        let body = world.create_body(BodyDesc::dynamic(
            MOVER,
            Vec2::new(100.0, 100.0),
            Vec2::new(32.0, 48.0),
        ));
        world.set_velocity(body, Vec2::new(50.0, -20.0));
        world.pause();
        for _ in 0..10 {
            assert!(world.step(DT).is_empty());
        }
        assert_eq!(world.position(body), Some(Vec2::new(100.0, 100.0)));
        assert_eq!(world.velocity(body), Some(Vec2::new(50.0, -20.0)));

        world.resume();
        world.step(DT);
        assert_ne!(world.position(body), Some(Vec2::new(100.0, 100.0)));
    }

    #[test]
    fn test_static_bodies_ignore_velocity() {
        let (mut world, ground) = world_with_ground();
        world.set_velocity(ground, Vec2::new(10.0, 10.0));
        world.step(DT);
        assert_eq!(world.velocity(ground), Some(Vec2::ZERO));
        assert_eq!(world.position(ground), Some(Vec2::new(400.0, 568.0)));
    }

    #[test]
    fn test_unknown_handle_is_noop() {
        let mut world = ArcadePhysics::new(800.0, 600.0);
        let ghost = BodyHandle(42);
        world.set_velocity(ghost, Vec2::ONE);
        world.disable_body(ghost);
        assert_eq!(world.position(ghost), None);
        assert!(!world.touching_down(ghost));
        assert!(!world.is_enabled(ghost));
    }

    #[test]
    fn test_factory_rejects_degenerate_surface() {
        let mut factory = ArcadeFactory;
        assert!(factory.create(800.0, 600.0).is_ok());
        assert!(matches!(
            factory.create(0.0, 600.0),
            Err(PhysicsError::DegenerateSurface { .. })
        ));
        assert!(factory.create(f32::NAN, 600.0).is_err());
    }
}
