//! Global settings carried inside the persisted profile

use crate::error::{MshufError, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_IMAGE_VIEWER: &str = "feh";
pub const DEFAULT_VIDEO_PLAYER: &str = "mpv";

/// Process-wide settings, read on every pick and mutated only through the
/// settings surface (`mshuf config`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Skip folders opened within the cooldown window
    pub cooldown_enabled: bool,
    /// Cooldown window in minutes; always positive
    pub cooldown_minutes: u32,
    /// Command used to open images; empty means the built-in default
    pub image_viewer: String,
    /// Command used to open videos; empty means the built-in default
    pub video_player: String,
    /// Height of the interactive panel's root list, in rows
    pub panel_rows: u16,
    /// Enter the interactive panel when invoked without a subcommand
    pub tui_autostart: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            cooldown_enabled: false,
            cooldown_minutes: 60,
            image_viewer: String::new(),
            video_player: String::new(),
            panel_rows: 12,
            tui_autostart: false,
        }
    }
}

impl Settings {
    /// The image viewer command, falling back to the built-in default
    pub fn image_viewer(&self) -> &str {
        if self.image_viewer.is_empty() {
            DEFAULT_IMAGE_VIEWER
        } else {
            &self.image_viewer
        }
    }

    /// The video player command, falling back to the built-in default
    pub fn video_player(&self) -> &str {
        if self.video_player.is_empty() {
            DEFAULT_VIDEO_PLAYER
        } else {
            &self.video_player
        }
    }

    /// Cooldown window in milliseconds
    pub fn cooldown_window_ms(&self) -> i64 {
        i64::from(self.cooldown_minutes) * 60_000
    }

    /// Settings keys accepted by [`Settings::set`]
    pub fn keys() -> &'static [&'static str] {
        &[
            "cooldown-enabled",
            "cooldown-minutes",
            "image-viewer",
            "video-player",
            "panel-rows",
            "tui-autostart",
        ]
    }

    /// Sets one setting from its string form, validating the value.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "cooldown-enabled" => self.cooldown_enabled = parse_bool(key, value)?,
            "cooldown-minutes" => {
                let minutes: u32 = value
                    .parse()
                    .map_err(|_| invalid(key, value, "a positive integer"))?;
                if minutes == 0 {
                    return Err(invalid(key, value, "a positive integer"));
                }
                self.cooldown_minutes = minutes;
            }
            "image-viewer" => self.image_viewer = value.to_string(),
            "video-player" => self.video_player = value.to_string(),
            "panel-rows" => {
                let rows: u16 = value
                    .parse()
                    .map_err(|_| invalid(key, value, "a positive integer"))?;
                if rows == 0 {
                    return Err(invalid(key, value, "a positive integer"));
                }
                self.panel_rows = rows;
            }
            "tui-autostart" => self.tui_autostart = parse_bool(key, value)?,
            _ => {
                return Err(MshufError::InvalidSetting(format!(
                    "unknown key '{}' (known keys: {})",
                    key,
                    Self::keys().join(", ")
                )))
            }
        }
        Ok(())
    }

    /// Current values as displayable (key, value) pairs
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        vec![
            ("cooldown-enabled", self.cooldown_enabled.to_string()),
            ("cooldown-minutes", self.cooldown_minutes.to_string()),
            ("image-viewer", self.image_viewer().to_string()),
            ("video-player", self.video_player().to_string()),
            ("panel-rows", self.panel_rows.to_string()),
            ("tui-autostart", self.tui_autostart.to_string()),
        ]
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value {
        "true" | "on" | "yes" | "1" => Ok(true),
        "false" | "off" | "no" | "0" => Ok(false),
        _ => Err(invalid(key, value, "true/false")),
    }
}

fn invalid(key: &str, value: &str, expected: &str) -> MshufError {
    MshufError::InvalidSetting(format!("{key}: '{value}' is not {expected}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert!(!settings.cooldown_enabled);
        assert_eq!(settings.cooldown_minutes, 60);
        assert_eq!(settings.image_viewer(), DEFAULT_IMAGE_VIEWER);
        assert_eq!(settings.video_player(), DEFAULT_VIDEO_PLAYER);
        assert_eq!(settings.panel_rows, 12);
        assert!(!settings.tui_autostart);
    }

    #[test]
    fn test_configured_viewers_take_precedence() {
        let mut settings = Settings::default();
        settings.set("image-viewer", "eog").unwrap();
        settings.set("video-player", "vlc").unwrap();
        assert_eq!(settings.image_viewer(), "eog");
        assert_eq!(settings.video_player(), "vlc");
    }

    #[test]
    fn test_set_cooldown() {
        let mut settings = Settings::default();
        settings.set("cooldown-enabled", "on").unwrap();
        settings.set("cooldown-minutes", "30").unwrap();
        assert!(settings.cooldown_enabled);
        assert_eq!(settings.cooldown_minutes, 30);
        assert_eq!(settings.cooldown_window_ms(), 30 * 60_000);
    }

    #[test]
    fn test_zero_cooldown_minutes_rejected() {
        let mut settings = Settings::default();
        assert!(settings.set("cooldown-minutes", "0").is_err());
        assert_eq!(settings.cooldown_minutes, 60);
    }

    #[test]
    fn test_zero_panel_rows_rejected() {
        let mut settings = Settings::default();
        assert!(settings.set("panel-rows", "0").is_err());
    }

    #[test]
    fn test_unknown_key_rejected() {
        let mut settings = Settings::default();
        let err = settings.set("no-such-key", "1").unwrap_err();
        assert!(err.to_string().contains("no-such-key"));
    }

    #[test]
    fn test_bad_bool_rejected() {
        let mut settings = Settings::default();
        assert!(settings.set("tui-autostart", "maybe").is_err());
    }

    #[test]
    fn test_settings_serialization_round_trip() {
        let mut settings = Settings::default();
        settings.set("cooldown-enabled", "true").unwrap();
        settings.set("image-viewer", "eog").unwrap();
        let json = serde_json::to_string(&settings).unwrap();
        let back: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(back, settings);
    }
}
