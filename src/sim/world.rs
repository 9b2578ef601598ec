//! One running game: physics world, entities, input and contact handlers

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::input::{InputState, TouchControls};
use super::state::{BOMBS, GameEvent, GameState, PLATFORMS, PLAYER, STARS};
use super::tick::{collect_star, hit_bomb};
use crate::consts::{WORLD_HEIGHT, WORLD_WIDTH};
use crate::physics::{Aabb, BodyHandle, Contact, ContactKind, Layer, PhysicsProvider};
use crate::settings::{TouchControlsMode, TouchStyle};
use crate::tuning::Tuning;

/// Game logic run for a contact: the owning simulation plus the two bodies,
/// in the order the pair was registered
pub type ContactHandler<P> = fn(&mut Simulation<P>, BodyHandle, BodyHandle);

struct ContactRule<P: PhysicsProvider> {
    kind: ContactKind,
    a: Layer,
    b: Layer,
    handler: ContactHandler<P>,
}

impl<P: PhysicsProvider> Clone for ContactRule<P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P: PhysicsProvider> Copy for ContactRule<P> {}

/// Per-session choices made by the host at start
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub seed: u64,
    /// Host viewport width, used for the touch-controls decision
    pub viewport_width: f32,
    pub touch_controls: TouchControlsMode,
    pub touch_style: TouchStyle,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            seed: 0,
            viewport_width: WORLD_WIDTH,
            touch_controls: TouchControlsMode::Auto,
            touch_style: TouchStyle::default(),
        }
    }
}

pub struct Simulation<P: PhysicsProvider> {
    pub(crate) physics: P,
    pub(crate) state: GameState,
    pub(crate) input: InputState,
    pub(crate) tuning: Tuning,
    pub(crate) rng: Pcg32,
    pub(crate) events: Vec<GameEvent>,
    /// Play area in world units
    pub(crate) world: Aabb,
    rules: Vec<ContactRule<P>>,
    /// Frame time not yet consumed by fixed physics steps
    pub(crate) accumulator: f32,
    pub(crate) time_ticks: u64,
}

impl<P: PhysicsProvider> Simulation<P> {
    /// Build the level inside `physics` and wire up contact handling
    pub fn new(mut physics: P, tuning: Tuning, options: SessionOptions) -> Self {
        let mut rng = Pcg32::seed_from_u64(options.seed);
        let world = Aabb::new(Vec2::ZERO, Vec2::new(WORLD_WIDTH, WORLD_HEIGHT));

        physics.set_gravity(Vec2::new(0.0, tuning.gravity));
        physics.set_world_bounds(world);

        let state = GameState::build(&mut physics, &tuning, &mut rng);

        let input = if options
            .touch_controls
            .enabled_for(options.viewport_width, tuning.mobile_breakpoint)
        {
            InputState::with_touch(TouchControls::layout(
                world.width(),
                state.platforms[0].top(),
                &options.touch_style,
            ))
        } else {
            InputState::new()
        };

        let mut sim = Self {
            physics,
            state,
            input,
            tuning,
            rng,
            events: Vec::new(),
            world,
            rules: Vec::new(),
            accumulator: 0.0,
            time_ticks: 0,
        };

        sim.collide(PLAYER, PLATFORMS);
        sim.collide(STARS, PLATFORMS);
        sim.on_overlap(PLAYER, STARS, collect_star);
        sim.collide(BOMBS, PLATFORMS);
        // Registered last so a hit outranks pickups from the same step
        sim.on_collide(PLAYER, BOMBS, hit_bomb);

        sim
    }

    /// Solid contact with no game logic
    pub fn collide(&mut self, a: Layer, b: Layer) {
        self.physics.add_collider(a, b);
    }

    pub fn on_collide(&mut self, a: Layer, b: Layer, handler: ContactHandler<P>) {
        self.physics.add_collider(a, b);
        self.rules.push(ContactRule {
            kind: ContactKind::Collide,
            a,
            b,
            handler,
        });
    }

    pub fn on_overlap(&mut self, a: Layer, b: Layer, handler: ContactHandler<P>) {
        self.physics.add_overlap(a, b);
        self.rules.push(ContactRule {
            kind: ContactKind::Overlap,
            a,
            b,
            handler,
        });
    }

    /// Run handlers rule by rule, in registration order
    pub(crate) fn dispatch(&mut self, contacts: &[Contact]) {
        for i in 0..self.rules.len() {
            let rule = self.rules[i];
            for contact in contacts.iter().filter(|c| c.kind == rule.kind) {
                if self.state.layer_of(contact.a) == Some(rule.a)
                    && self.state.layer_of(contact.b) == Some(rule.b)
                {
                    (rule.handler)(self, contact.a, contact.b);
                }
            }
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn physics(&self) -> &P {
        &self.physics
    }

    /// Direct provider access for tooling and scripted scenarios
    pub fn physics_mut(&mut self) -> &mut P {
        &mut self.physics
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    /// Input handlers write here between ticks
    pub fn input_mut(&mut self) -> &mut InputState {
        &mut self.input
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn world(&self) -> Aabb {
        self.world
    }

    pub fn score(&self) -> u32 {
        self.state.score
    }

    pub fn is_over(&self) -> bool {
        self.state.over
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }
}
