//! Input resolution
//!
//! Keyboard and touch handlers only flip booleans here; the tick reads one
//! [`Intent`] per frame.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::physics::Aabb;
use crate::settings::TouchStyle;

/// Resolved input for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intent {
    pub move_left: bool,
    pub move_right: bool,
    /// Jump held and not yet spent on a jump
    pub jump: bool,
}

/// Direction keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value
    pub fn from_dom(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" => Some(Key::Left),
            "ArrowRight" => Some(Key::Right),
            "ArrowUp" => Some(Key::Up),
            "ArrowDown" => Some(Key::Down),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyboardState {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

impl KeyboardState {
    fn slot(&mut self, key: Key) -> &mut bool {
        match key {
            Key::Left => &mut self.left,
            Key::Right => &mut self.right,
            Key::Up => &mut self.up,
            Key::Down => &mut self.down,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TouchButtonKind {
    Left,
    Right,
    Jump,
}

impl TouchButtonKind {
    pub const ALL: [TouchButtonKind; 3] = [
        TouchButtonKind::Left,
        TouchButtonKind::Right,
        TouchButtonKind::Jump,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TouchButtonKind::Left => "⬅",
            TouchButtonKind::Right => "➡",
            TouchButtonKind::Jump => "⬆",
        }
    }
}

/// Pointer events scoped to one touch region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down,
    Up,
    /// Pointer dragged off the region; treated like `Up`
    Leave,
}

/// One on-screen button
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TouchButton {
    pub kind: TouchButtonKind,
    pub region: Aabb,
    pressed: bool,
}

impl TouchButton {
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }
}

/// The left/right/jump buttons shown on narrow screens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TouchControls {
    buttons: [TouchButton; 3],
    style: TouchStyle,
}

impl TouchControls {
    /// Lay the buttons out in a row resting on `ground_top`
    pub fn layout(play_width: f32, ground_top: f32, style: &TouchStyle) -> Self {
        let half = Vec2::new(style.width, style.height) * 0.5;
        let y = ground_top - half.y;
        let button = |kind, x: f32| TouchButton {
            kind,
            region: Aabb::from_center(Vec2::new(x, y), half),
            pressed: false,
        };
        Self {
            buttons: [
                button(TouchButtonKind::Left, 100.0),
                button(TouchButtonKind::Right, 250.0),
                button(TouchButtonKind::Jump, play_width - 100.0),
            ],
            style: style.clone(),
        }
    }

    pub fn style(&self) -> &TouchStyle {
        &self.style
    }

    pub fn buttons(&self) -> &[TouchButton] {
        &self.buttons
    }

    pub fn button(&self, kind: TouchButtonKind) -> &TouchButton {
        &self.buttons[kind as usize]
    }

    pub fn is_pressed(&self, kind: TouchButtonKind) -> bool {
        self.button(kind).pressed
    }

    /// Button under a point in play-area coordinates
    pub fn hit_test(&self, point: Vec2) -> Option<TouchButtonKind> {
        self.buttons
            .iter()
            .find(|b| b.region.contains_point(point))
            .map(|b| b.kind)
    }

    fn set(&mut self, kind: TouchButtonKind, pressed: bool) {
        self.buttons[kind as usize].pressed = pressed;
    }
}

/// Input handler state owned by one simulation instance
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputState {
    pub keyboard: KeyboardState,
    touch: Option<TouchControls>,
    /// Set by a fresh jump press, cleared by release or a successful jump
    jump_armed: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_touch(touch: TouchControls) -> Self {
        Self {
            touch: Some(touch),
            ..Self::default()
        }
    }

    pub fn touch(&self) -> Option<&TouchControls> {
        self.touch.as_ref()
    }

    pub fn key_down(&mut self, key: Key) {
        let slot = self.keyboard.slot(key);
        let fresh = !*slot;
        *slot = true;
        if key == Key::Up && fresh {
            self.jump_armed = true;
        }
    }

    pub fn key_up(&mut self, key: Key) {
        *self.keyboard.slot(key) = false;
        if key == Key::Up {
            self.disarm_if_released();
        }
    }

    /// Apply a pointer event to one region. Ignored when touch controls are off.
    pub fn pointer(&mut self, kind: TouchButtonKind, event: PointerEvent) {
        let Some(touch) = self.touch.as_mut() else {
            return;
        };
        match event {
            PointerEvent::Down => {
                let fresh = !touch.is_pressed(kind);
                touch.set(kind, true);
                if kind == TouchButtonKind::Jump && fresh {
                    self.jump_armed = true;
                }
            }
            PointerEvent::Up | PointerEvent::Leave => {
                touch.set(kind, false);
                if kind == TouchButtonKind::Jump {
                    self.disarm_if_released();
                }
            }
        }
    }

    /// Press whichever button is under `point`
    pub fn pointer_down_at(&mut self, point: Vec2) -> Option<TouchButtonKind> {
        let kind = self.touch.as_ref()?.hit_test(point)?;
        self.pointer(kind, PointerEvent::Down);
        Some(kind)
    }

    /// Release every touch button
    pub fn release_all_touch(&mut self) {
        for kind in TouchButtonKind::ALL {
            self.pointer(kind, PointerEvent::Up);
        }
    }

    fn touch_pressed(&self, kind: TouchButtonKind) -> bool {
        self.touch.as_ref().is_some_and(|t| t.is_pressed(kind))
    }

    fn jump_held(&self) -> bool {
        self.keyboard.up || self.touch_pressed(TouchButtonKind::Jump)
    }

    fn disarm_if_released(&mut self) {
        if !self.jump_held() {
            self.jump_armed = false;
        }
    }

    pub fn intent(&self) -> Intent {
        Intent {
            move_left: self.keyboard.left || self.touch_pressed(TouchButtonKind::Left),
            move_right: self.keyboard.right || self.touch_pressed(TouchButtonKind::Right),
            jump: self.jump_armed && self.jump_held(),
        }
    }

    /// Spend the current jump press; holding will not jump again
    pub fn consume_jump(&mut self) {
        self.jump_armed = false;
    }
}
