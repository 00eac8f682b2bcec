//! Game settings and preferences
//!
//! Key-value backed: a string "Difficulty" and an integer "Color" encoding.
//! Bad or missing values are recovered locally and never reach the player.

use std::fs;
use std::io;
use std::path::Path;

use serde_json::{Map, Value};

use crate::sim::DifficultyTier;
pub use crate::sim::PlayerColor;

/// Game settings/preferences
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Settings {
    /// Tier read at session start
    pub difficulty: DifficultyTier,
    /// Ship color read when the player entity is created
    pub player_color: PlayerColor,
    /// Sound effects muted
    pub muted: bool,
}

impl Settings {
    pub const DIFFICULTY_KEY: &'static str = "Difficulty";
    pub const COLOR_KEY: &'static str = "Color";
    pub const MUTED_KEY: &'static str = "Muted";

    /// Build settings from raw stored values, falling back to Easy / Green
    pub fn from_values(difficulty: Option<&str>, color: Option<i64>) -> Self {
        let difficulty = match difficulty {
            Some(name) => DifficultyTier::from_name(name).unwrap_or_else(|| {
                log::warn!("Unknown difficulty {:?}, using Easy", name);
                DifficultyTier::Easy
            }),
            None => DifficultyTier::Easy,
        };
        let player_color = match color {
            Some(encoding) => PlayerColor::from_encoding(encoding).unwrap_or_else(|| {
                log::warn!("Unknown player color encoding {}, using green", encoding);
                PlayerColor::default()
            }),
            None => PlayerColor::default(),
        };
        Self {
            difficulty,
            player_color,
            muted: false,
        }
    }

    /// Parse a JSON object of stored values; each key recovers independently
    pub fn from_json(json: &str) -> Self {
        let value: Value = match serde_json::from_str(json) {
            Ok(v) => v,
            Err(e) => {
                log::warn!("Corrupt settings ({}), using defaults", e);
                return Self::default();
            }
        };
        let mut settings = Self::from_values(
            typed(&value, Self::DIFFICULTY_KEY, Value::as_str),
            typed(&value, Self::COLOR_KEY, Value::as_i64),
        );
        settings.muted = typed(&value, Self::MUTED_KEY, Value::as_bool).unwrap_or(false);
        settings
    }

    pub fn to_json(&self) -> String {
        let mut map = Map::new();
        map.insert(Self::DIFFICULTY_KEY.into(), self.difficulty.as_str().into());
        map.insert(Self::COLOR_KEY.into(), self.player_color.encoding().into());
        map.insert(Self::MUTED_KEY.into(), self.muted.into());
        Value::Object(map).to_string()
    }

    /// Load settings from a file; missing or unreadable files give defaults
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(json) => {
                log::info!("Loaded settings from {}", path.display());
                Self::from_json(&json)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Failed to read settings {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> io::Result<()> {
        fs::write(path, self.to_json())?;
        log::info!("Settings saved");
        Ok(())
    }
}

/// Read a stored key; a value of the wrong type is ignored with a warning
fn typed<'a, T>(value: &'a Value, key: &str, read: fn(&'a Value) -> Option<T>) -> Option<T> {
    let raw = value.get(key)?;
    let typed = read(raw);
    if typed.is_none() {
        log::warn!("Ignoring {} setting of the wrong type: {}", key, raw);
    }
    typed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_easy_green() {
        let settings = Settings::default();
        assert_eq!(settings.difficulty, DifficultyTier::Easy);
        assert_eq!(settings.player_color, PlayerColor::Green);
        assert!(!settings.muted);
    }

    #[test]
    fn test_from_values_recovers_bad_input() {
        let settings = Settings::from_values(Some("Impossible"), Some(9));
        assert_eq!(settings, Settings::default());

        let settings = Settings::from_values(Some("Hard"), Some(2));
        assert_eq!(settings.difficulty, DifficultyTier::Hard);
        assert_eq!(settings.player_color, PlayerColor::Red);
    }

    #[test]
    fn test_json_round_trip() {
        let settings = Settings {
            difficulty: DifficultyTier::Medium,
            player_color: PlayerColor::Blue,
            muted: true,
        };
        assert_eq!(Settings::from_json(&settings.to_json()), settings);
    }

    #[test]
    fn test_json_keys_recover_independently() {
        let settings = Settings::from_json(r#"{"Difficulty": "Hard", "Color": "purple"}"#);
        assert_eq!(settings.difficulty, DifficultyTier::Hard);
        assert_eq!(settings.player_color, PlayerColor::Green);

        assert_eq!(Settings::from_json("not json"), Settings::default());
    }

    #[test]
    fn test_wrong_value_types_fall_back() {
        let settings = Settings::from_json(r#"{"Difficulty": 3, "Color": "blue", "Muted": "yes"}"#);
        assert_eq!(settings, Settings::default());

        let value: Value = serde_json::from_str(r#"{"Color": 2, "Muted": 1}"#).unwrap();
        assert_eq!(typed(&value, Settings::COLOR_KEY, Value::as_i64), Some(2));
        assert_eq!(typed(&value, Settings::MUTED_KEY, Value::as_bool), None);
        assert_eq!(typed(&value, Settings::DIFFICULTY_KEY, Value::as_str), None);

        // A JSON document that isn't an object has no keys at all
        assert_eq!(Settings::from_json("[1, 2]"), Settings::default());
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let path = std::env::temp_dir().join("balloon_defense_missing_settings.json");
        let _ = fs::remove_file(&path);
        assert_eq!(Settings::load(&path), Settings::default());
    }

    #[test]
    fn test_save_then_load() {
        let path = std::env::temp_dir().join(format!(
            "balloon_defense_settings_{}.json",
            std::process::id()
        ));
        let settings = Settings::from_values(Some("Medium"), Some(1));
        settings.save(&path).expect("write settings");
        assert_eq!(Settings::load(&path), settings);
        let _ = fs::remove_file(&path);
    }
}
