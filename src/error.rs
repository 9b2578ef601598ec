//! Error types
//!
//! Nothing here is fatal to the host: a failed start leaves the game idle and a
//! bad tuning file falls back to defaults.

/// Failure to bring up a physics world
#[derive(Debug, thiserror::Error)]
pub enum PhysicsError {
    #[error("no surface is mounted to host the physics world")]
    NoSurface,

    #[error("surface {width}x{height} is too small for a physics world")]
    DegenerateSurface { width: f32, height: f32 },
}

/// Lifecycle failures reported to the UI boundary
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("physics initialization failed: {0}")]
    Physics(#[from] PhysicsError),

    #[error("invalid tuning: {0}")]
    Tuning(#[from] TuningError),
}

/// Tuning file problems
#[derive(Debug, thiserror::Error)]
pub enum TuningError {
    #[error("failed to parse tuning: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("tuning value '{name}' = {value} is out of range ({expected})")]
    OutOfRange {
        name: &'static str,
        value: f32,
        expected: &'static str,
    },
}
