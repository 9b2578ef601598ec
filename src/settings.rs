//! Host preferences
//!
//! Persisted separately from anything gameplay-related in LocalStorage.

use serde::{Deserialize, Serialize};

/// When to show on-screen touch buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TouchControlsMode {
    /// Only on viewports narrower than the mobile breakpoint
    #[default]
    Auto,
    Always,
    Never,
}

impl TouchControlsMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TouchControlsMode::Auto => "Auto",
            TouchControlsMode::Always => "Always",
            TouchControlsMode::Never => "Never",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "auto" => Some(TouchControlsMode::Auto),
            "always" | "on" => Some(TouchControlsMode::Always),
            "never" | "off" => Some(TouchControlsMode::Never),
            _ => None,
        }
    }

    /// Whether a viewport this wide gets touch buttons
    pub fn enabled_for(&self, viewport_width: f32, breakpoint: f32) -> bool {
        match self {
            TouchControlsMode::Auto => viewport_width < breakpoint,
            TouchControlsMode::Always => true,
            TouchControlsMode::Never => false,
        }
    }
}

/// Look of the touch buttons (one style for all three)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TouchStyle {
    /// Button box size in play-area units
    pub width: f32,
    pub height: f32,
    pub font_size: f32,
    /// `0xRRGGBB`
    pub background: u32,
    pub color: u32,
    pub padding: (f32, f32),
    pub corner_radius: f32,
}

impl Default for TouchStyle {
    fn default() -> Self {
        Self {
            width: 64.0,
            height: 44.0,
            font_size: 16.0,
            background: 0x333333,
            color: 0xffffff,
            padding: (20.0, 10.0),
            corner_radius: 50.0,
        }
    }
}

/// Host settings/preferences
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub touch_controls: TouchControlsMode,
    pub touch_style: TouchStyle,
}

impl Settings {
    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "star_catcher_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(settings) = serde_json::from_str(&json) {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_uses_breakpoint() {
        let mode = TouchControlsMode::Auto;
        assert!(mode.enabled_for(767.0, 768.0));
        assert!(!mode.enabled_for(768.0, 768.0));
        assert!(!mode.enabled_for(1280.0, 768.0));
    }

    #[test]
    fn test_forced_modes() {
        assert!(TouchControlsMode::Always.enabled_for(1920.0, 768.0));
        assert!(!TouchControlsMode::Never.enabled_for(320.0, 768.0));
    }

    #[test]
    fn test_mode_from_str() {
        assert_eq!(TouchControlsMode::from_str("OFF"), Some(TouchControlsMode::Never));
        assert_eq!(TouchControlsMode::from_str("auto"), Some(TouchControlsMode::Auto));
        assert_eq!(TouchControlsMode::from_str("sometimes"), None);
    }

    #[test]
    fn test_settings_json_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{ "touch_controls": "Always" }"#).unwrap();
        assert_eq!(settings.touch_controls, TouchControlsMode::Always);
        assert_eq!(settings.touch_style, TouchStyle::default());
    }

    #[test]
    fn test_native_load_is_default() {
        let mut settings = Settings::load();
        assert_eq!(settings, Settings::default());
        settings.touch_controls = TouchControlsMode::Never;
        settings.save();
        assert_eq!(Settings::load(), Settings::default());
    }
}
