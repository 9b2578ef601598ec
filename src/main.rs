//! Star Catcher entry point
//!
//! The browser build is driven from JS through `platform::web::WebGame`. The
//! native build runs a headless session with a simple autoplay bot.

#[cfg(not(target_arch = "wasm32"))]
mod autoplay {
    use star_catcher::consts::*;
    use star_catcher::physics::ArcadeFactory;
    use star_catcher::sim::{GameEvent, GameState, Key};
    use star_catcher::{Game, Settings, Surface, Tuning};

    /// Two minutes at 60 Hz
    const MAX_FRAMES: u32 = 60 * 120;
    /// Close enough horizontally to stop walking
    const ARRIVE_DX: f32 = 6.0;
    /// Star this far above the player is worth a jump
    const JUMP_DY: f32 = 40.0;

    /// Holds keys the way a person would: press on change, release on change
    #[derive(Default)]
    struct Bot {
        left: bool,
        right: bool,
        up: bool,
    }

    impl Bot {
        fn decide(&self, state: &GameState) -> (bool, bool, bool) {
            let player = &state.player;
            let target = state
                .stars
                .iter()
                .filter(|s| s.active)
                .min_by(|a, b| {
                    let da = (a.pos - player.pos).length_squared();
                    let db = (b.pos - player.pos).length_squared();
                    da.total_cmp(&db)
                });
            let Some(star) = target else {
                return (false, false, false);
            };

            let dx = star.pos.x - player.pos.x;
            let left = dx < -ARRIVE_DX;
            let right = dx > ARRIVE_DX;
            // Release between jumps so the next press is fresh
            let up = !self.up && player.touching_down && star.pos.y < player.pos.y - JUMP_DY;
            (left, right, up)
        }

        fn apply(&mut self, game: &mut Game<ArcadeFactory>, (left, right, up): (bool, bool, bool)) {
            for (held, want, key) in [
                (&mut self.left, left, Key::Left),
                (&mut self.right, right, Key::Right),
                (&mut self.up, up, Key::Up),
            ] {
                if *held != want {
                    if want {
                        game.key_down(key);
                    } else {
                        game.key_up(key);
                    }
                    *held = want;
                }
            }
        }
    }

    pub fn run() {
        env_logger::init();
        log::info!("Star Catcher (native) starting...");

        let seed = std::env::args()
            .nth(1)
            .and_then(|s| s.parse().ok())
            .unwrap_or(42);
        let mut game = Game::new(ArcadeFactory, Tuning::load(), Settings::load(), seed);
        game.mount(Surface::new(WORLD_WIDTH, WORLD_HEIGHT));
        if let Err(e) = game.start() {
            log::error!("Failed to start: {}", e);
            return;
        }

        let mut bot = Bot::default();
        let mut frames = 0;
        while frames < MAX_FRAMES && !game.is_over() {
            if let Some(sim) = game.simulation() {
                let keys = bot.decide(sim.state());
                bot.apply(&mut game, keys);
            }
            for event in game.frame(FRAME_DT) {
                match event {
                    GameEvent::StarCollected { text, .. } => log::info!("{}", text),
                    GameEvent::StarsRefilled => log::info!("All stars collected, refilling"),
                    GameEvent::BombSpawned { x, .. } => log::info!("Bomb dropped at x={:.0}", x),
                    GameEvent::PlayerHit { .. } => {}
                }
            }
            frames += 1;
        }

        let seconds = frames as f32 * FRAME_DT;
        match game.final_score_text() {
            Some(text) => println!("{} after {:.1}s", text, seconds),
            None => println!("Survived {:.1}s with {} points", seconds, game.score()),
        }
        game.stop();
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    autoplay::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is WebGame, this is just to satisfy the compiler
}
