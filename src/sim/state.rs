//! Entity registry and core simulation types
//!
//! Physics owns positions and velocities; the copies kept here are refreshed
//! after every tick so rendering and tests can read them without a provider.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::physics::{Aabb, BodyDesc, BodyHandle, Layer, PhysicsProvider};
use crate::tuning::Tuning;

/// Collision layers
pub const PLAYER: Layer = Layer(0);
pub const PLATFORMS: Layer = Layer(1);
pub const STARS: Layer = Layer(2);
pub const BOMBS: Layer = Layer(3);

/// Reference level: (center x, center y, width, height). The first entry is
/// the ground; touch controls sit on top of it.
pub const LEVEL_PLATFORMS: [(f32, f32, f32, f32); 4] = [
    (400.0, 568.0, 800.0, 64.0),
    (600.0, 400.0, 400.0, 32.0),
    (50.0, 250.0, 400.0, 32.0),
    (750.0, 220.0, 400.0, 32.0),
];

/// Player animation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Anim {
    Left,
    Right,
    /// Facing the camera, standing still
    #[default]
    Turn,
}

impl Anim {
    /// Frames per second of the walk cycles
    pub const WALK_FPS: f32 = 10.0;

    /// Spritesheet frame at `elapsed` seconds into the animation
    pub fn frame_at(self, elapsed: f32) -> u32 {
        let step = (elapsed.max(0.0) * Self::WALK_FPS) as u32;
        match self {
            Anim::Left => step % 4,
            Anim::Turn => 4,
            Anim::Right => 5 + step % 4,
        }
    }
}

/// The player sprite
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub body: BodyHandle,
    pub pos: Vec2,
    pub vel: Vec2,
    pub anim: Anim,
    /// Seconds since `anim` started
    pub anim_time: f32,
    pub bounce: f32,
    pub collide_world_bounds: bool,
    /// Ground contact from the last physics step
    pub touching_down: bool,
    /// Color multiplier, set when the player is hit
    pub tint: Option<u32>,
}

impl Player {
    /// Switch animation; replaying the current one keeps its frame clock
    pub fn play(&mut self, anim: Anim) {
        if self.anim != anim {
            self.anim = anim;
            self.anim_time = 0.0;
        }
    }

    pub fn advance_anim(&mut self, dt: f32) {
        self.anim_time += dt;
    }

    pub fn sprite_frame(&self) -> u32 {
        self.anim.frame_at(self.anim_time)
    }
}

/// Immovable level geometry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Platform {
    pub body: BodyHandle,
    pub bounds: Aabb,
}

impl Platform {
    pub fn top(&self) -> f32 {
        self.bounds.min.y
    }
}

/// A collectible star from the fixed pool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Star {
    pub body: BodyHandle,
    /// Column this star respawns in
    pub slot_x: f32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub active: bool,
    /// Vertical restitution, re-rolled on every refill
    pub bounce_y: f32,
}

/// A bouncing bomb
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bomb {
    pub body: BodyHandle,
    pub pos: Vec2,
    pub vel: Vec2,
}

/// Things the UI boundary may want to react to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A star was picked up; `text` is the refreshed score label
    StarCollected { star: usize, score: u32, text: String },
    /// The last star was taken and the pool came back
    StarsRefilled,
    BombSpawned { x: f32, vx: f32 },
    /// Run ended; score is frozen
    PlayerHit { final_score: u32 },
}

/// Which registry entry a body belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityRef {
    Player,
    Platform(usize),
    Star(usize),
    Bomb(usize),
}

/// All entities of one running game
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub player: Player,
    pub platforms: Vec<Platform>,
    pub stars: Vec<Star>,
    pub bombs: Vec<Bomb>,
    pub score: u32,
    /// Label shown in the corner, refreshed on every pickup
    pub score_text: String,
    /// Set once the player touches a bomb
    pub over: bool,
}

impl GameState {
    /// Create the level, the player and the star pool inside `physics`
    pub fn build<P: PhysicsProvider, R: Rng>(physics: &mut P, tuning: &Tuning, rng: &mut R) -> Self {
        let platforms = LEVEL_PLATFORMS
            .iter()
            .map(|&(x, y, w, h)| {
                let pos = Vec2::new(x, y);
                let size = Vec2::new(w, h);
                Platform {
                    body: physics.create_body(BodyDesc::fixed(PLATFORMS, pos, size)),
                    bounds: Aabb::from_center(pos, size * 0.5),
                }
            })
            .collect();

        let spawn = Vec2::new(PLAYER_SPAWN.0, PLAYER_SPAWN.1);
        let body = physics.create_body(BodyDesc::dynamic(
            PLAYER,
            spawn,
            Vec2::new(PLAYER_SIZE.0, PLAYER_SIZE.1),
        ));
        physics.set_bounce(body, Vec2::splat(PLAYER_BOUNCE));
        physics.set_collide_world_bounds(body, true);
        let player = Player {
            body,
            pos: spawn,
            vel: Vec2::ZERO,
            anim: Anim::Turn,
            anim_time: 0.0,
            bounce: PLAYER_BOUNCE,
            collide_world_bounds: true,
            touching_down: false,
            tint: None,
        };

        let stars = (0..tuning.star_count)
            .map(|i| {
                let slot_x = STAR_FIRST_X + tuning.star_spacing * i as f32;
                let pos = Vec2::new(slot_x, 0.0);
                let body = physics.create_body(BodyDesc::dynamic(
                    STARS,
                    pos,
                    Vec2::new(STAR_SIZE.0, STAR_SIZE.1),
                ));
                let bounce_y = rng.random_range(tuning.star_bounce_min..tuning.star_bounce_max);
                physics.set_bounce(body, Vec2::new(0.0, bounce_y));
                Star {
                    body,
                    slot_x,
                    pos,
                    vel: Vec2::ZERO,
                    active: true,
                    bounce_y,
                }
            })
            .collect();

        Self {
            player,
            platforms,
            stars,
            bombs: Vec::new(),
            score: 0,
            score_text: score_label(0),
            over: false,
        }
    }

    /// Look up which entity owns `body`
    pub fn entity(&self, body: BodyHandle) -> Option<EntityRef> {
        if self.player.body == body {
            return Some(EntityRef::Player);
        }
        if let Some(i) = self.stars.iter().position(|s| s.body == body) {
            return Some(EntityRef::Star(i));
        }
        if let Some(i) = self.bombs.iter().position(|b| b.body == body) {
            return Some(EntityRef::Bomb(i));
        }
        self.platforms
            .iter()
            .position(|p| p.body == body)
            .map(EntityRef::Platform)
    }

    /// Collision layer of `body`, if it belongs to this game
    pub fn layer_of(&self, body: BodyHandle) -> Option<Layer> {
        self.entity(body).map(|entity| match entity {
            EntityRef::Player => PLAYER,
            EntityRef::Platform(_) => PLATFORMS,
            EntityRef::Star(_) => STARS,
            EntityRef::Bomb(_) => BOMBS,
        })
    }

    pub fn active_stars(&self) -> usize {
        self.stars.iter().filter(|s| s.active).count()
    }

    /// Refresh cached positions, velocities and flags from physics
    pub fn sync_from<P: PhysicsProvider>(&mut self, physics: &P) {
        let player = &mut self.player;
        player.pos = physics.position(player.body).unwrap_or(player.pos);
        player.vel = physics.velocity(player.body).unwrap_or(player.vel);
        player.touching_down = physics.touching_down(player.body);

        for star in &mut self.stars {
            star.pos = physics.position(star.body).unwrap_or(star.pos);
            star.vel = physics.velocity(star.body).unwrap_or(star.vel);
            star.active = physics.is_enabled(star.body);
        }
        for bomb in &mut self.bombs {
            bomb.pos = physics.position(bomb.body).unwrap_or(bomb.pos);
            bomb.vel = physics.velocity(bomb.body).unwrap_or(bomb.vel);
        }
    }
}

pub fn score_label(score: u32) -> String {
    format!("Score: {}", score)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::ArcadePhysics;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn build() -> (ArcadePhysics, GameState) {
        let mut physics = ArcadePhysics::new(WORLD_WIDTH, WORLD_HEIGHT);
        let mut rng = Pcg32::seed_from_u64(7);
        let state = GameState::build(&mut physics, &Tuning::default(), &mut rng);
        (physics, state)
    }

    #[test]
    fn test_reference_layout() {
        let (physics, state) = build();
        assert_eq!(state.platforms.len(), 4);
        assert_eq!(state.platforms[0].top(), 536.0);
        assert_eq!(state.stars.len(), STAR_COUNT);
        assert!(state.bombs.is_empty());
        assert_eq!(state.score, 0);
        assert_eq!(state.score_text, "Score: 0");
        assert_eq!(physics.position(state.player.body), Some(Vec2::new(100.0, 450.0)));
    }

    #[test]
    fn test_stars_evenly_spaced() {
        let (_, state) = build();
        for (i, star) in state.stars.iter().enumerate() {
            assert_eq!(star.slot_x, 12.0 + 70.0 * i as f32);
            assert_eq!(star.pos.y, 0.0);
            assert!((STAR_BOUNCE_MIN..STAR_BOUNCE_MAX).contains(&star.bounce_y));
            assert!(star.active);
        }
    }

    #[test]
    fn test_entity_lookup() {
        let (_, state) = build();
        assert_eq!(state.entity(state.player.body), Some(EntityRef::Player));
        assert_eq!(state.layer_of(state.stars[3].body), Some(STARS));
        assert_eq!(state.layer_of(state.platforms[2].body), Some(PLATFORMS));
        assert_eq!(state.entity(BodyHandle(999)), None);
    }

    #[test]
    fn test_anim_frames() {
        assert_eq!(Anim::Turn.frame_at(3.0), 4);
        assert_eq!(Anim::Left.frame_at(0.0), 0);
        assert_eq!(Anim::Left.frame_at(0.35), 3);
        assert_eq!(Anim::Left.frame_at(0.45), 0);
        assert_eq!(Anim::Right.frame_at(0.15), 6);
    }

    #[test]
    fn test_replaying_anim_keeps_clock() {
        let (_, mut state) = build();
        state.player.play(Anim::Left);
        state.player.advance_anim(0.25);
        state.player.play(Anim::Left);
        assert_eq!(state.player.anim_time, 0.25);
        state.player.play(Anim::Right);
        assert_eq!(state.player.anim_time, 0.0);
    }
}
