//! Player preferences
//!
//! Persisted as JSON alongside the score records.

use serde::{Deserialize, Serialize};

use crate::persistence::KeyValueStore;

/// Display preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Outline collision boxes (debug)
    pub show_hitboxes: bool,
    /// Version label in the top-right corner
    pub show_version: bool,
    /// Fraction of the viewport width the canvas may use (0.5 - 1.0)
    pub scale_to_viewport: f32,
    /// Keep the 2:1 playfield aspect when scaling
    pub maintain_aspect: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            show_hitboxes: false,
            show_version: true,
            scale_to_viewport: 0.9,
            maintain_aspect: true,
        }
    }
}

impl Settings {
    /// Storage key
    const STORAGE_KEY: &'static str = "barkour_settings";

    /// Viewport scale clamped to a usable range
    pub fn effective_scale(&self) -> f32 {
        self.scale_to_viewport.clamp(0.5, 1.0)
    }

    /// Canvas size in CSS pixels for a viewport, keeping the playfield aspect
    pub fn canvas_size(&self, viewport_w: f32, viewport_h: f32, aspect: f32) -> (f32, f32) {
        let mut width = viewport_w * self.effective_scale();
        let mut height = if self.maintain_aspect {
            width / aspect
        } else {
            viewport_h * self.effective_scale()
        };
        // Too tall for the viewport: fit by height instead
        if self.maintain_aspect && height > viewport_h * self.effective_scale() {
            height = viewport_h * self.effective_scale();
            width = height * aspect;
        }
        (width.floor(), height.floor())
    }

    /// Load settings, falling back to defaults
    pub fn load(store: &dyn KeyValueStore) -> Self {
        if let Some(json) = store.get(Self::STORAGE_KEY) {
            match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings");
                    return settings;
                }
                Err(e) => log::warn!("Ignoring unreadable settings: {e}"),
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    pub fn save(&self, store: &dyn KeyValueStore) {
        match serde_json::to_string(self) {
            Ok(json) => {
                store.set(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
            Err(e) => log::warn!("Failed to serialize settings: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_load_defaults_when_missing() {
        let store = MemoryStore::new();
        assert_eq!(Settings::load(&store), Settings::default());
    }

    #[test]
    fn test_canvas_keeps_playfield_aspect() {
        let settings = Settings::default();
        assert_eq!(settings.effective_scale(), 0.9);
        // Wide window: height-bound
        assert_eq!(settings.canvas_size(2000.0, 500.0, 2.0), (900.0, 450.0));
        // Narrow window: width-bound
        assert_eq!(settings.canvas_size(1000.0, 1000.0, 2.0), (900.0, 450.0));

        let clamped = Settings {
            scale_to_viewport: 3.0,
            ..Settings::default()
        };
        assert_eq!(clamped.effective_scale(), 1.0);
    }

    #[test]
    fn test_save_and_load() {
        let store = MemoryStore::new();
        let settings = Settings {
            show_hitboxes: true,
            ..Default::default()
        };
        settings.save(&store);
        assert_eq!(Settings::load(&store), settings);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let store = MemoryStore::new();
        store.set("barkour_settings", r#"{"show_hitboxes":true}"#);
        let settings = Settings::load(&store);
        assert!(settings.show_hitboxes);
        assert!(settings.show_version);
    }

    #[test]
    fn test_canvas_size_keeps_aspect() {
        let settings = Settings::default();
        let (w, h) = settings.canvas_size(1000.0, 1000.0, 2.0);
        assert_eq!((w, h), (900.0, 450.0));

        // Short, wide viewport is height-limited
        let (w, h) = settings.canvas_size(2000.0, 400.0, 2.0);
        assert_eq!((w, h), (720.0, 360.0));
    }
}
