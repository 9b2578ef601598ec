//! Deterministic simulation module
//!
//! All gameplay logic lives here. Given the same seed, tuning and input
//! sequence, a session plays out identically:
//! - Fixed physics timestep, frame time carried in an accumulator
//! - Seeded RNG only
//! - Contacts handled in registration order, then provider order
//! - Physics only through the [`PhysicsProvider`](crate::physics::PhysicsProvider) trait
//! - No rendering or platform dependencies

pub mod input;
pub mod state;
pub mod tick;
pub mod world;

pub use input::{
    InputState, Intent, Key, KeyboardState, PointerEvent, TouchButton, TouchButtonKind,
    TouchControls,
};
pub use state::{
    Anim, BOMBS, Bomb, EntityRef, GameEvent, GameState, LEVEL_PLATFORMS, PLATFORMS, PLAYER,
    Platform, Player, STARS, Star, score_label,
};
pub use tick::{bomb_spawn_x, collect_star, hit_bomb, horizontal_motion, tick};
pub use world::{ContactHandler, SessionOptions, Simulation};
