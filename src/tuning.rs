//! Data-driven game balance
//!
//! Every field defaults to the constant in [`crate::consts`], so an empty JSON
//! object is a valid tuning file.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::TuningError;

/// Environment variable naming a JSON tuning file
pub const TUNING_ENV: &str = "STAR_CATCHER_TUNING";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Downward gravity (units/s²)
    pub gravity: f32,
    /// Horizontal run speed
    pub player_speed: f32,
    /// Vertical velocity applied on jump (negative is up)
    pub jump_velocity: f32,
    pub score_per_star: u32,
    pub star_count: usize,
    /// Horizontal gap between star slots
    pub star_spacing: f32,
    pub star_bounce_min: f32,
    pub star_bounce_max: f32,
    /// Bomb horizontal speed is drawn from `[-bomb_max_speed_x, bomb_max_speed_x]`
    pub bomb_max_speed_x: f32,
    pub bomb_fall_speed: f32,
    /// Viewports narrower than this get touch controls
    pub mobile_breakpoint: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: GRAVITY_Y,
            player_speed: PLAYER_SPEED,
            jump_velocity: JUMP_VELOCITY,
            score_per_star: SCORE_PER_STAR,
            star_count: STAR_COUNT,
            star_spacing: STAR_STEP_X,
            star_bounce_min: STAR_BOUNCE_MIN,
            star_bounce_max: STAR_BOUNCE_MAX,
            bomb_max_speed_x: BOMB_MAX_SPEED_X,
            bomb_fall_speed: BOMB_FALL_SPEED,
            mobile_breakpoint: MOBILE_BREAKPOINT,
        }
    }
}

impl Tuning {
    /// Parse and validate a JSON tuning document
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load from the file named by [`TUNING_ENV`]. Falls back to defaults if the
    /// variable is unset, the file is missing, or the contents are rejected.
    pub fn load() -> Self {
        let Ok(path) = std::env::var(TUNING_ENV) else {
            return Self::default();
        };
        match std::fs::read_to_string(&path) {
            Ok(content) => match Self::from_json(&content) {
                Ok(tuning) => {
                    log::info!("Loaded tuning from {path}");
                    tuning
                }
                Err(e) => {
                    log::warn!("Rejected tuning in {path}: {e}, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Failed to read {path}: {e}, using defaults");
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<(), TuningError> {
        fn check(
            name: &'static str,
            value: f32,
            ok: bool,
            expected: &'static str,
        ) -> Result<(), TuningError> {
            if ok && value.is_finite() {
                Ok(())
            } else {
                Err(TuningError::OutOfRange {
                    name,
                    value,
                    expected,
                })
            }
        }

        check("gravity", self.gravity, self.gravity >= 0.0, ">= 0")?;
        check("player_speed", self.player_speed, self.player_speed > 0.0, "> 0")?;
        check(
            "jump_velocity",
            self.jump_velocity,
            self.jump_velocity < 0.0,
            "< 0 (up is negative)",
        )?;
        check(
            "score_per_star",
            self.score_per_star as f32,
            self.score_per_star > 0,
            "> 0",
        )?;
        check(
            "star_count",
            self.star_count as f32,
            self.star_count > 0,
            "> 0",
        )?;
        check("star_spacing", self.star_spacing, self.star_spacing >= 0.0, ">= 0")?;
        check(
            "star_bounce_min",
            self.star_bounce_min,
            (0.0..=1.0).contains(&self.star_bounce_min),
            "0..=1",
        )?;
        check(
            "star_bounce_max",
            self.star_bounce_max,
            self.star_bounce_max > self.star_bounce_min && self.star_bounce_max <= 1.0,
            "star_bounce_min < max <= 1",
        )?;
        check(
            "bomb_max_speed_x",
            self.bomb_max_speed_x,
            self.bomb_max_speed_x >= 0.0,
            ">= 0",
        )?;
        check(
            "bomb_fall_speed",
            self.bomb_fall_speed,
            self.bomb_fall_speed >= 0.0,
            ">= 0",
        )?;
        check(
            "mobile_breakpoint",
            self.mobile_breakpoint,
            self.mobile_breakpoint >= 0.0,
            ">= 0",
        )?;
        Ok(())
    }
}
