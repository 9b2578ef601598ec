//! Star Catcher - a small 2D platformer
//!
//! Core modules:
//! - `sim`: Simulation (entities, input resolution, per-tick rules)
//! - `physics`: Physics provider contract and the arcade AABB provider
//! - `game`: Start/stop/restart lifecycle around one simulation instance
//! - `render`: Per-frame sprite snapshot for whatever draws the game
//! - `platform`: Browser bindings
//! - `tuning`: Data-driven game balance
//! - `settings`: Host preferences (touch controls)

pub mod error;
pub mod game;
pub mod physics;
pub mod platform;
pub mod render;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::{GameError, PhysicsError, TuningError};
pub use game::{Game, LifecyclePhase, Surface};
pub use settings::{Settings, TouchControlsMode, TouchStyle};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Play area size (logical units)
    pub const WORLD_WIDTH: f32 = 800.0;
    pub const WORLD_HEIGHT: f32 = 600.0;

    /// Downward gravity (units/s²)
    pub const GRAVITY_Y: f32 = 300.0;

    /// Player defaults
    pub const PLAYER_SPEED: f32 = 160.0;
    pub const JUMP_VELOCITY: f32 = -330.0;
    pub const PLAYER_SPAWN: (f32, f32) = (100.0, 450.0);
    pub const PLAYER_BOUNCE: f32 = 0.2;
    pub const PLAYER_SIZE: (f32, f32) = (32.0, 48.0);

    /// Stars
    pub const STAR_COUNT: usize = 12;
    pub const STAR_FIRST_X: f32 = 12.0;
    pub const STAR_STEP_X: f32 = 70.0;
    pub const STAR_BOUNCE_MIN: f32 = 0.4;
    pub const STAR_BOUNCE_MAX: f32 = 0.8;
    pub const STAR_SIZE: (f32, f32) = (24.0, 22.0);
    pub const SCORE_PER_STAR: u32 = 10;

    /// Bombs
    pub const BOMB_SPAWN_Y: f32 = 16.0;
    pub const BOMB_MAX_SPEED_X: f32 = 200.0;
    pub const BOMB_FALL_SPEED: f32 = 20.0;
    pub const BOMB_SIZE: (f32, f32) = (14.0, 14.0);

    /// Viewports narrower than this get on-screen touch controls
    pub const MOBILE_BREAKPOINT: f32 = 768.0;

    /// Fixed physics timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum physics steps per frame; lag beyond this is dropped
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Frame step used when the host gives no timing (60 Hz)
    pub const FRAME_DT: f32 = 1.0 / 60.0;
    /// Longest frame time the simulation accepts (tab-switch hitches)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Player tint after being hit
    pub const DEFEAT_TINT: u32 = 0xff0000;
}

/// Convert a `0xRRGGBB` color to normalized RGBA
#[inline]
pub fn rgb_to_rgba(rgb: u32) -> [f32; 4] {
    let r = ((rgb >> 16) & 0xff) as f32 / 255.0;
    let g = ((rgb >> 8) & 0xff) as f32 / 255.0;
    let b = (rgb & 0xff) as f32 / 255.0;
    [r, g, b, 1.0]
}
