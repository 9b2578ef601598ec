//! Browser bindings
//!
//! JS owns the canvas, the event listeners and the animation loop; it forwards
//! events here and draws from [`WebGame::sprite_bytes`].

use wasm_bindgen::prelude::*;

use crate::consts::WORLD_WIDTH;
use crate::game::{Game, LifecyclePhase, Surface};
use crate::physics::ArcadeFactory;
use crate::settings::{Settings, TouchControlsMode};
use crate::sim::{Key, PointerEvent, TouchButtonKind};
use crate::tuning::Tuning;

fn viewport_width() -> f32 {
    web_sys::window()
        .and_then(|w| w.inner_width().ok())
        .and_then(|v| v.as_f64())
        .map_or(WORLD_WIDTH, |w| w as f32)
}

fn button_from_name(name: &str) -> Option<TouchButtonKind> {
    match name {
        "left" => Some(TouchButtonKind::Left),
        "right" => Some(TouchButtonKind::Right),
        "jump" => Some(TouchButtonKind::Jump),
        _ => None,
    }
}

#[wasm_bindgen]
pub struct WebGame {
    game: Game<ArcadeFactory>,
}

#[wasm_bindgen]
impl WebGame {
    /// Create a game mounted on a canvas of `width` x `height` pixels
    #[wasm_bindgen(constructor)]
    pub fn new(width: f32, height: f32) -> WebGame {
        console_error_panic_hook::set_once();
        // A second instance finds the logger already installed
        let _ = console_log::init_with_level(log::Level::Info);

        let seed = js_sys::Date::now() as u64;
        let mut game = Game::new(ArcadeFactory, Tuning::default(), Settings::load(), seed);
        game.mount(Surface::new(width, height));
        game.set_viewport_width(viewport_width());
        log::info!("Star Catcher initialized with seed: {}", seed);
        WebGame { game }
    }

    /// Canvas resized; takes effect for drawing now and touch layout next start
    pub fn resize(&mut self, width: f32, height: f32) {
        self.game.mount(Surface::new(width, height));
        self.game.set_viewport_width(viewport_width());
    }

    pub fn touch_controls(&self) -> String {
        self.game.settings().touch_controls.as_str().to_string()
    }

    /// "auto", "always"/"on" or "never"/"off"; saved and used from the next start
    pub fn set_touch_controls(&mut self, mode: &str) -> bool {
        let Some(mode) = TouchControlsMode::from_str(mode) else {
            return false;
        };
        let mut settings = self.game.settings().clone();
        settings.touch_controls = mode;
        settings.save();
        self.game.set_settings(settings);
        true
    }

    pub fn start(&mut self) -> Result<(), JsValue> {
        self.game.start().map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn restart(&mut self) -> Result<(), JsValue> {
        self.game.restart().map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn stop(&mut self) {
        self.game.stop();
    }

    pub fn score(&self) -> u32 {
        self.game.score()
    }

    pub fn is_over(&self) -> bool {
        self.game.is_over()
    }

    pub fn phase(&self) -> String {
        match self.game.phase() {
            LifecyclePhase::Idle => "idle",
            LifecyclePhase::Running => "running",
            LifecyclePhase::Over => "over",
        }
        .to_string()
    }

    pub fn score_text(&self) -> String {
        self.game.score_text().unwrap_or_default().to_string()
    }

    pub fn final_score_text(&self) -> Option<String> {
        self.game.final_score_text()
    }

    /// Returns whether the key was used, so JS can call `preventDefault`
    pub fn key_down(&mut self, key: &str) -> bool {
        let Some(key) = Key::from_dom(key) else {
            return false;
        };
        self.game.key_down(key);
        true
    }

    pub fn key_up(&mut self, key: &str) -> bool {
        let Some(key) = Key::from_dom(key) else {
            return false;
        };
        self.game.key_up(key);
        true
    }

    /// Pointer pressed at canvas pixel coordinates; returns the button name hit
    pub fn pointer_down(&mut self, x: f32, y: f32) -> Option<String> {
        self.game.pointer_down_at(x, y).map(|kind| {
            match kind {
                TouchButtonKind::Left => "left",
                TouchButtonKind::Right => "right",
                TouchButtonKind::Jump => "jump",
            }
            .to_string()
        })
    }

    pub fn pointer_up(&mut self, button: &str) {
        if let Some(kind) = button_from_name(button) {
            self.game.pointer(kind, PointerEvent::Up);
        }
    }

    pub fn pointer_leave(&mut self, button: &str) {
        if let Some(kind) = button_from_name(button) {
            self.game.pointer(kind, PointerEvent::Leave);
        }
    }

    /// Advance one animation frame; `dt` in seconds. Returns true while running.
    pub fn frame(&mut self, dt: f32) -> bool {
        for event in self.game.frame(dt) {
            log::debug!("{:?}", event);
        }
        self.game.phase() == LifecyclePhase::Running
    }

    /// Sprite instances for the current frame, 40 bytes each
    pub fn sprite_bytes(&self) -> Vec<u8> {
        self.game
            .render()
            .map(|frame| frame.as_bytes().to_vec())
            .unwrap_or_default()
    }

    /// Scale and letterbox offset as `[scale, offset_x, offset_y]`
    pub fn transform(&self) -> Vec<f32> {
        self.game
            .render()
            .map(|frame| {
                let t = frame.transform;
                vec![t.scale, t.offset.x, t.offset.y]
            })
            .unwrap_or_default()
    }
}
