//! Game lifecycle
//!
//! Owns at most one [`Simulation`] at a time and moves it through
//! Idle -> Running -> Over. Every start builds a brand new physics world and
//! entity set from the factory; restart drops the old one first.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::{WORLD_HEIGHT, WORLD_WIDTH};
use crate::error::{GameError, PhysicsError};
use crate::physics::PhysicsFactory;
use crate::render::{FitTransform, Frame};
use crate::settings::Settings;
use crate::sim::{GameEvent, Key, PointerEvent, SessionOptions, Simulation, TouchButtonKind, tick};
use crate::tuning::Tuning;

/// Where the game is in its start/play/lose loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LifecyclePhase {
    /// Nothing running; waiting for start
    #[default]
    Idle,
    Running,
    /// Player was hit; the last frame stays up until restart or stop
    Over,
}

/// The host view the game draws into
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Surface {
    pub width: f32,
    pub height: f32,
}

impl Surface {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    fn validate(&self) -> Result<(), PhysicsError> {
        let usable = |v: f32| v.is_finite() && v >= 1.0;
        if usable(self.width) && usable(self.height) {
            Ok(())
        } else {
            Err(PhysicsError::DegenerateSurface {
                width: self.width,
                height: self.height,
            })
        }
    }
}

pub struct Game<F: PhysicsFactory> {
    factory: F,
    tuning: Tuning,
    settings: Settings,
    surface: Option<Surface>,
    /// Host viewport width in CSS pixels (touch-controls decision)
    viewport_width: f32,
    session: Option<Simulation<F::Provider>>,
    phase: LifecyclePhase,
    /// Draws a fresh seed for every session
    seeds: Pcg32,
    final_score: Option<u32>,
}

impl<F: PhysicsFactory> Game<F> {
    pub fn new(factory: F, tuning: Tuning, settings: Settings, seed: u64) -> Self {
        Self {
            factory,
            tuning,
            settings,
            surface: None,
            viewport_width: WORLD_WIDTH,
            session: None,
            phase: LifecyclePhase::Idle,
            seeds: Pcg32::seed_from_u64(seed),
            final_score: None,
        }
    }

    /// Attach the view the game renders into
    pub fn mount(&mut self, surface: Surface) {
        self.surface = Some(surface);
    }

    /// Detach the view; a running game is torn down with it
    pub fn unmount(&mut self) {
        self.stop();
        self.surface = None;
    }

    pub fn set_viewport_width(&mut self, width: f32) {
        self.viewport_width = width;
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Applies from the next start
    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
    }

    /// Start button. Over behaves like restart; Running ignores it.
    pub fn start(&mut self) -> Result<(), GameError> {
        match self.phase {
            LifecyclePhase::Running => {
                log::warn!("Start ignored: game already running");
                Ok(())
            }
            LifecyclePhase::Over => self.restart(),
            LifecyclePhase::Idle => self.launch(),
        }
    }

    /// Tear down the current session (if any) and start a new one
    pub fn restart(&mut self) -> Result<(), GameError> {
        self.teardown();
        log::info!("Restarting game");
        self.launch()
    }

    /// Tear down and go back to Idle
    pub fn stop(&mut self) {
        if self.phase != LifecyclePhase::Idle {
            log::info!("Game stopped");
        }
        self.teardown();
    }

    fn teardown(&mut self) {
        self.session = None;
        self.final_score = None;
        self.phase = LifecyclePhase::Idle;
    }

    fn launch(&mut self) -> Result<(), GameError> {
        let surface = self.surface.ok_or_else(|| {
            log::warn!("Start rejected: no surface mounted");
            PhysicsError::NoSurface
        })?;
        surface.validate()?;
        self.tuning.validate().inspect_err(|e| {
            log::warn!("Start rejected: {}", e);
        })?;

        let physics = self.factory.create(WORLD_WIDTH, WORLD_HEIGHT)?;
        let seed: u64 = self.seeds.random();
        let options = SessionOptions {
            seed,
            viewport_width: self.viewport_width,
            touch_controls: self.settings.touch_controls,
            touch_style: self.settings.touch_style.clone(),
        };
        self.session = Some(Simulation::new(physics, self.tuning.clone(), options));
        self.final_score = None;
        self.phase = LifecyclePhase::Running;
        log::info!("Game started with seed: {}", seed);
        Ok(())
    }

    /// Advance one rendered frame. Does nothing unless Running.
    pub fn frame(&mut self, dt: f32) -> Vec<GameEvent> {
        if self.phase != LifecyclePhase::Running {
            return Vec::new();
        }
        let Some(sim) = self.session.as_mut() else {
            return Vec::new();
        };
        let events = tick(sim, dt);
        if sim.is_over() {
            let score = sim.score();
            self.final_score = Some(score);
            self.phase = LifecyclePhase::Over;
            log::info!("Game over! Final score: {}", score);
        }
        events
    }

    pub fn phase(&self) -> LifecyclePhase {
        self.phase
    }

    pub fn is_over(&self) -> bool {
        self.phase == LifecyclePhase::Over
    }

    /// Current score; 0 when nothing is running
    pub fn score(&self) -> u32 {
        self.session.as_ref().map_or(0, Simulation::score)
    }

    pub fn score_text(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.state().score_text.as_str())
    }

    /// Score frozen at the moment of the hit
    pub fn final_score(&self) -> Option<u32> {
        self.final_score
    }

    pub fn final_score_text(&self) -> Option<String> {
        self.final_score.map(|score| format!("Final Score: {}", score))
    }

    pub fn simulation(&self) -> Option<&Simulation<F::Provider>> {
        self.session.as_ref()
    }

    pub fn simulation_mut(&mut self) -> Option<&mut Simulation<F::Provider>> {
        self.session.as_mut()
    }

    pub fn key_down(&mut self, key: Key) {
        if let Some(sim) = self.session.as_mut() {
            sim.input_mut().key_down(key);
        }
    }

    pub fn key_up(&mut self, key: Key) {
        if let Some(sim) = self.session.as_mut() {
            sim.input_mut().key_up(key);
        }
    }

    pub fn pointer(&mut self, kind: TouchButtonKind, event: PointerEvent) {
        if let Some(sim) = self.session.as_mut() {
            sim.input_mut().pointer(kind, event);
        }
    }

    /// Press the touch button under a point given in surface pixels
    pub fn pointer_down_at(&mut self, x: f32, y: f32) -> Option<TouchButtonKind> {
        let surface = self.surface?;
        let point = FitTransform::fit(surface.width, surface.height).to_world(Vec2::new(x, y));
        self.session.as_mut()?.input_mut().pointer_down_at(point)
    }

    /// Snapshot for drawing; still available after the game is over
    pub fn render(&self) -> Option<Frame> {
        let surface = self.surface?;
        let sim = self.session.as_ref()?;
        Some(Frame::capture(sim, self.phase, surface.width, surface.height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::FRAME_DT;
    use crate::error::TuningError;
    use crate::physics::{ArcadeFactory, ArcadePhysics, PhysicsProvider};
    use crate::sim::collect_star;

    fn game(seed: u64) -> Game<ArcadeFactory> {
        let mut game = Game::new(ArcadeFactory, Tuning::default(), Settings::default(), seed);
        game.mount(Surface::new(800.0, 600.0));
        game
    }

    fn sim_mut(game: &mut Game<ArcadeFactory>) -> &mut Simulation<ArcadePhysics> {
        game.session.as_mut().unwrap()
    }

    /// Pick up the whole pool so one bomb exists
    fn clear_pool(game: &mut Game<ArcadeFactory>) {
        let sim = sim_mut(game);
        let player = sim.state.player.body;
        let stars: Vec<_> = sim.state.stars.iter().map(|s| s.body).collect();
        for star in stars {
            collect_star(sim, player, star);
        }
    }

    /// Drop the first bomb on the player and run the frame that resolves it
    fn lose(game: &mut Game<ArcadeFactory>) -> Vec<GameEvent> {
        clear_pool(game);
        let sim = sim_mut(game);
        let bomb = sim.state.bombs[0].body;
        let pos = sim.physics.position(sim.state.player.body).unwrap();
        sim.physics.enable_body(bomb, pos);
        game.frame(FRAME_DT)
    }

    #[test]
    fn test_start_without_surface_stays_idle() {
        let mut game = Game::new(ArcadeFactory, Tuning::default(), Settings::default(), 1);
        let err = game.start().unwrap_err();
        assert!(matches!(err, GameError::Physics(PhysicsError::NoSurface)));
        assert_eq!(game.phase(), LifecyclePhase::Idle);
        assert!(game.simulation().is_none());
    }

    #[test]
    fn test_degenerate_surface_rejected() {
        let mut game = Game::new(ArcadeFactory, Tuning::default(), Settings::default(), 1);
        game.mount(Surface::new(0.0, 600.0));
        assert!(matches!(
            game.start(),
            Err(GameError::Physics(PhysicsError::DegenerateSurface { .. }))
        ));
        assert_eq!(game.phase(), LifecyclePhase::Idle);
    }

    #[test]
    fn test_invalid_tuning_stays_idle() {
        let tuning = Tuning {
            star_bounce_min: 0.5,
            star_bounce_max: 0.5,
            ..Tuning::default()
        };
        let mut game = Game::new(ArcadeFactory, tuning, Settings::default(), 1);
        game.mount(Surface::new(800.0, 600.0));
        assert!(matches!(
            game.start(),
            Err(GameError::Tuning(TuningError::OutOfRange {
                name: "star_bounce_max",
                ..
            }))
        ));
        assert_eq!(game.phase(), LifecyclePhase::Idle);
        assert!(game.simulation().is_none());

        let mut game = Game::new(
            ArcadeFactory,
            Tuning {
                star_bounce_min: f32::NAN,
                ..Tuning::default()
            },
            Settings::default(),
            1,
        );
        game.mount(Surface::new(800.0, 600.0));
        assert!(game.start().is_err());
        assert_eq!(game.phase(), LifecyclePhase::Idle);
    }

    #[test]
    fn test_start_while_running_is_noop() {
        let mut game = game(2);
        game.start().unwrap();
        for _ in 0..5 {
            game.frame(FRAME_DT);
        }
        game.start().unwrap();
        assert_eq!(game.phase(), LifecyclePhase::Running);
        assert_eq!(game.simulation().unwrap().time_ticks(), 5);
    }

    #[test]
    fn test_frame_idle_does_nothing() {
        let mut game = game(2);
        assert!(game.frame(FRAME_DT).is_empty());
        assert_eq!(game.score(), 0);
        assert!(game.render().is_none());
    }

    #[test]
    fn test_hit_reports_final_score() {
        let mut game = game(3);
        game.start().unwrap();
        let events = lose(&mut game);
        assert_eq!(events.last(), Some(&GameEvent::PlayerHit { final_score: 120 }));
        assert!(game.is_over());
        assert_eq!(game.final_score(), Some(120));
        assert_eq!(game.final_score_text().as_deref(), Some("Final Score: 120"));
        assert!(game.simulation().unwrap().physics().is_paused());

        // Frozen: more frames change nothing, last frame still drawable
        assert!(game.frame(FRAME_DT).is_empty());
        assert_eq!(game.score(), 120);
        assert!(game.render().is_some());
    }

    #[test]
    fn test_restart_clears_bombs_and_rerolls_pool() {
        let mut game = game(4);
        game.start().unwrap();
        let first: Vec<f32> = game
            .simulation()
            .unwrap()
            .state()
            .stars
            .iter()
            .map(|s| s.bounce_y)
            .collect();
        lose(&mut game);

        game.restart().unwrap();
        let sim = game.simulation().unwrap();
        assert_eq!(game.phase(), LifecyclePhase::Running);
        assert_eq!(game.score(), 0);
        assert_eq!(game.final_score(), None);
        assert!(sim.state().bombs.is_empty());
        assert_eq!(sim.state().active_stars(), 12);
        assert!(!sim.physics().is_paused());
        assert_eq!(sim.time_ticks(), 0);
        let second: Vec<f32> = sim.state().stars.iter().map(|s| s.bounce_y).collect();
        assert_ne!(first, second);
    }

    #[test]
    fn test_start_after_over_restarts() {
        let mut game = game(5);
        game.start().unwrap();
        lose(&mut game);
        game.start().unwrap();
        assert_eq!(game.phase(), LifecyclePhase::Running);
        assert_eq!(game.score(), 0);
    }

    #[test]
    fn test_stop_tears_down() {
        let mut game = game(6);
        game.start().unwrap();
        game.stop();
        assert_eq!(game.phase(), LifecyclePhase::Idle);
        assert!(game.simulation().is_none());
        assert_eq!(game.score(), 0);

        game.start().unwrap();
        game.unmount();
        assert_eq!(game.phase(), LifecyclePhase::Idle);
        assert!(game.start().is_err());
    }

    #[test]
    fn test_instances_are_independent() {
        let mut a = game(7);
        let mut b = game(7);
        a.start().unwrap();
        b.start().unwrap();
        clear_pool(&mut a);
        a.key_down(Key::Right);
        a.frame(FRAME_DT);
        b.frame(FRAME_DT);
        assert_eq!(a.score(), 120);
        assert_eq!(b.score(), 0);
        assert_eq!(a.simulation().unwrap().state().bombs.len(), 1);
        assert!(b.simulation().unwrap().state().bombs.is_empty());
        assert_eq!(b.simulation().unwrap().state().player.vel.x, 0.0);
    }

    #[test]
    fn test_pointer_maps_surface_to_world() {
        let mut game = Game::new(
            ArcadeFactory,
            Tuning::default(),
            Settings::default(),
            8,
        );
        // 400px wide phone: half scale, letterboxed vertically
        game.mount(Surface::new(400.0, 800.0));
        game.set_viewport_width(400.0);
        game.start().unwrap();
        // Jump button centered at world (700, 514)
        let hit = game.pointer_down_at(350.0, 250.0 + 514.0 * 0.5);
        assert_eq!(hit, Some(TouchButtonKind::Jump));
        game.pointer(TouchButtonKind::Jump, PointerEvent::Leave);
        assert!(!game.simulation().unwrap().input().intent().jump);
    }
}
