//! Per-frame render snapshot
//!
//! Whatever draws the game (canvas, GPU, a test) gets a flat list of sprite
//! instances in world units plus the transform that fits the 800x600 play
//! area into the mounted surface. Nothing here touches a graphics API.

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use crate::consts::{BOMB_SIZE, PLAYER_SIZE, STAR_SIZE, WORLD_HEIGHT, WORLD_WIDTH};
use crate::game::LifecyclePhase;
use crate::physics::PhysicsProvider;
use crate::rgb_to_rgba;
use crate::sim::Simulation;

/// What a sprite instance depicts
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpriteKind {
    Platform = 0,
    Player = 1,
    Star = 2,
    Bomb = 3,
    TouchButton = 4,
}

/// One textured quad, laid out for an instance buffer
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct SpriteInstance {
    /// Center in world units
    pub center: [f32; 2],
    pub size: [f32; 2],
    /// Tint multiplied into the texture
    pub color: [f32; 4],
    /// Spritesheet frame (player), pressed flag (touch buttons), else 0
    pub frame: u32,
    pub kind: u32,
}

impl SpriteInstance {
    pub fn new(kind: SpriteKind, center: Vec2, size: Vec2, color: [f32; 4], frame: u32) -> Self {
        Self {
            center: center.to_array(),
            size: size.to_array(),
            color,
            frame,
            kind: kind as u32,
        }
    }
}

/// Colors for game elements
pub mod colors {
    /// No tint
    pub const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
}

/// Uniform scale that fits the play area inside a surface, centered
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitTransform {
    pub scale: f32,
    /// Letterbox offset in surface pixels
    pub offset: Vec2,
}

impl FitTransform {
    pub fn fit(surface_width: f32, surface_height: f32) -> Self {
        let world = Vec2::new(WORLD_WIDTH, WORLD_HEIGHT);
        let surface = Vec2::new(surface_width, surface_height);
        let scale = (surface.x / world.x).min(surface.y / world.y);
        Self {
            scale,
            offset: (surface - world * scale) * 0.5,
        }
    }

    pub fn to_surface(&self, world: Vec2) -> Vec2 {
        world * self.scale + self.offset
    }

    pub fn to_world(&self, surface: Vec2) -> Vec2 {
        (surface - self.offset) / self.scale
    }
}

/// Everything needed to draw one frame
#[derive(Debug, Clone)]
pub struct Frame {
    pub sprites: Vec<SpriteInstance>,
    pub score_text: String,
    /// Top-left of the score label, world units
    pub score_pos: Vec2,
    pub phase: LifecyclePhase,
    pub transform: FitTransform,
}

impl Frame {
    pub const SCORE_POS: Vec2 = Vec2::new(16.0, 16.0);

    /// Snapshot a simulation for a surface of the given size
    pub fn capture<P: PhysicsProvider>(
        sim: &Simulation<P>,
        phase: LifecyclePhase,
        surface_width: f32,
        surface_height: f32,
    ) -> Self {
        let state = sim.state();
        let mut sprites = Vec::with_capacity(
            state.platforms.len() + 1 + state.stars.len() + state.bombs.len() + 3,
        );

        for platform in &state.platforms {
            sprites.push(SpriteInstance::new(
                SpriteKind::Platform,
                platform.bounds.center(),
                platform.bounds.half_extents() * 2.0,
                colors::WHITE,
                0,
            ));
        }

        for star in state.stars.iter().filter(|s| s.active) {
            sprites.push(SpriteInstance::new(
                SpriteKind::Star,
                star.pos,
                Vec2::new(STAR_SIZE.0, STAR_SIZE.1),
                colors::WHITE,
                0,
            ));
        }

        let player = &state.player;
        sprites.push(SpriteInstance::new(
            SpriteKind::Player,
            player.pos,
            Vec2::new(PLAYER_SIZE.0, PLAYER_SIZE.1),
            player.tint.map_or(colors::WHITE, rgb_to_rgba),
            player.sprite_frame(),
        ));

        for bomb in &state.bombs {
            sprites.push(SpriteInstance::new(
                SpriteKind::Bomb,
                bomb.pos,
                Vec2::new(BOMB_SIZE.0, BOMB_SIZE.1),
                colors::WHITE,
                0,
            ));
        }

        if let Some(touch) = sim.input().touch() {
            let color = rgb_to_rgba(touch.style().background);
            for button in touch.buttons() {
                sprites.push(SpriteInstance::new(
                    SpriteKind::TouchButton,
                    button.region.center(),
                    button.region.half_extents() * 2.0,
                    color,
                    button.is_pressed() as u32,
                ));
            }
        }

        Self {
            sprites,
            score_text: state.score_text.clone(),
            score_pos: Self::SCORE_POS,
            phase,
            transform: FitTransform::fit(surface_width, surface_height),
        }
    }

    /// Raw instance buffer
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.sprites)
    }

    pub fn count(&self, kind: SpriteKind) -> usize {
        self.sprites.iter().filter(|s| s.kind == kind as u32).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{DEFEAT_TINT, FRAME_DT};
    use crate::physics::ArcadePhysics;
    use crate::sim::{SessionOptions, collect_star, hit_bomb, tick};
    use crate::tuning::Tuning;

    fn new_sim(viewport_width: f32) -> Simulation<ArcadePhysics> {
        Simulation::new(
            ArcadePhysics::new(WORLD_WIDTH, WORLD_HEIGHT),
            Tuning::default(),
            SessionOptions {
                seed: 3,
                viewport_width,
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_instance_layout() {
        assert_eq!(std::mem::size_of::<SpriteInstance>(), 40);
    }

    #[test]
    fn test_fresh_game_sprites() {
        let sim = new_sim(1280.0);
        let frame = Frame::capture(&sim, LifecyclePhase::Running, 800.0, 600.0);
        assert_eq!(frame.count(SpriteKind::Platform), 4);
        assert_eq!(frame.count(SpriteKind::Player), 1);
        assert_eq!(frame.count(SpriteKind::Star), 12);
        assert_eq!(frame.count(SpriteKind::Bomb), 0);
        assert_eq!(frame.count(SpriteKind::TouchButton), 0);
        assert_eq!(frame.score_text, "Score: 0");
        assert_eq!(frame.as_bytes().len(), frame.sprites.len() * 40);
    }

    #[test]
    fn test_touch_buttons_drawn_on_mobile() {
        let sim = new_sim(390.0);
        let frame = Frame::capture(&sim, LifecyclePhase::Running, 390.0, 844.0);
        assert_eq!(frame.count(SpriteKind::TouchButton), 3);
    }

    #[test]
    fn test_collected_star_hidden_and_player_red_after_hit() {
        let mut sim = new_sim(1280.0);
        let player = sim.state().player.body;
        let stars: Vec<_> = sim.state().stars.iter().map(|s| s.body).collect();
        for &star in &stars {
            collect_star(&mut sim, player, star);
        }
        // Whole pool came back with one bomb
        let bomb = sim.state().bombs[0].body;
        tick(&mut sim, FRAME_DT);

        collect_star(&mut sim, player, stars[0]);
        hit_bomb(&mut sim, player, bomb);
        sim.state.sync_from(&sim.physics);

        let frame = Frame::capture(&sim, LifecyclePhase::Over, 800.0, 600.0);
        assert_eq!(frame.count(SpriteKind::Star), 11);
        assert_eq!(frame.count(SpriteKind::Bomb), 1);
        let sprite = frame
            .sprites
            .iter()
            .find(|s| s.kind == SpriteKind::Player as u32)
            .unwrap();
        assert_eq!(sprite.color, rgb_to_rgba(DEFEAT_TINT));
        assert_eq!(frame.score_text, "Score: 130");
    }

    #[test]
    fn test_fit_letterboxes_wide_surface() {
        let fit = FitTransform::fit(1600.0, 600.0);
        assert_eq!(fit.scale, 1.0);
        assert_eq!(fit.offset, Vec2::new(400.0, 0.0));
        let p = Vec2::new(123.0, 456.0);
        assert_eq!(fit.to_world(fit.to_surface(p)), p);
    }

    #[test]
    fn test_fit_shrinks_narrow_surface() {
        let fit = FitTransform::fit(400.0, 800.0);
        assert_eq!(fit.scale, 0.5);
        assert_eq!(fit.offset, Vec2::new(0.0, 250.0));
        assert_eq!(fit.to_world(Vec2::new(200.0, 400.0)), Vec2::new(400.0, 300.0));
    }
}
