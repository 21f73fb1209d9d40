use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::storage::{DirStore, KeyValueStore, StorageError};

pub const THEME_KEY: &str = "habitflow_theme";
pub const DARK_MODE_KEY: &str = "habitflow_darkmode";
pub const LANGUAGE_KEY: &str = "habitflow_language";

pub const DEFAULT_MODEL: &str = "claude-haiku-4-5-20251001";

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("~/.local/share"))
        .join("habitflow")
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct HabitflowConfig {
    pub data_directory: PathBuf,
    pub debug_logging: bool,
    pub model: String,
}

impl Default for HabitflowConfig {
    fn default() -> Self {
        Self {
            data_directory: default_data_dir(),
            debug_logging: false,
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

impl HabitflowConfig {
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("habitflow")
            .join("config.json")
    }

    /// Load from the default location, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&Self::default_path())
    }

    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                log::warn!("Ignoring malformed config {}: {}", path.display(), e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    pub fn save_to(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(path, json)
    }

    /// Key-value store rooted at the data directory.
    pub fn store(&self) -> DirStore {
        DirStore::new(&self.data_directory)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Blue,
    Pink,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Blue => "blue",
            Self::Pink => "pink",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "blue" => Some(Self::Blue),
            "pink" => Some(Self::Pink),
            _ => None,
        }
    }

    /// Accent color, also the default color of new habits.
    pub fn primary_hex(&self) -> &'static str {
        match self {
            Self::Blue => "#6366f1",
            Self::Pink => "#f43f5e",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Nl,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Nl => "nl",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" | "english" => Some(Self::En),
            "nl" | "dutch" | "nederlands" => Some(Self::Nl),
            _ => None,
        }
    }

    /// Language name as written in prompts.
    pub fn prompt_name(&self) -> &'static str {
        match self {
            Self::En => "English",
            Self::Nl => "Nederlands",
        }
    }
}

/// UI preferences persisted next to the habits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Preferences {
    pub theme: Theme,
    pub dark_mode: bool,
    pub language: Language,
}

impl Preferences {
    /// Unknown or unreadable values fall back to defaults one by one.
    pub fn load(store: &impl KeyValueStore) -> Self {
        let read = |key: &str| match store.get(key) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("Failed to read preference {}: {}", key, e);
                None
            }
        };

        Self {
            theme: read(THEME_KEY)
                .and_then(|v| Theme::parse(&v))
                .unwrap_or_default(),
            dark_mode: read(DARK_MODE_KEY).is_some_and(|v| v.trim() == "true"),
            language: read(LANGUAGE_KEY)
                .and_then(|v| Language::parse(&v))
                .unwrap_or_default(),
        }
    }

    pub fn save(&self, store: &mut impl KeyValueStore) -> Result<(), StorageError> {
        store.set(THEME_KEY, self.theme.as_str())?;
        store.set(DARK_MODE_KEY, if self.dark_mode { "true" } else { "false" })?;
        store.set(LANGUAGE_KEY, self.language.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn missing_config_uses_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = HabitflowConfig::load_from(&tmp.path().join("nope.json"));
        assert_eq!(cfg, HabitflowConfig::default());
        assert_eq!(cfg.model, DEFAULT_MODEL);
    }

    #[test]
    fn config_round_trip_and_partial_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("habitflow").join("config.json");
        let cfg = HabitflowConfig {
            data_directory: tmp.path().join("data"),
            debug_logging: true,
            model: "claude-sonnet-4-5".into(),
        };
        cfg.save_to(&path).unwrap();
        assert_eq!(HabitflowConfig::load_from(&path), cfg);

        std::fs::write(&path, r#"{"debug_logging": true}"#).unwrap();
        let partial = HabitflowConfig::load_from(&path);
        assert!(partial.debug_logging);
        assert_eq!(partial.model, DEFAULT_MODEL);
    }

    #[test]
    fn preferences_round_trip() {
        let mut kv = MemoryStore::new();
        assert_eq!(Preferences::load(&kv), Preferences::default());

        let prefs = Preferences {
            theme: Theme::Pink,
            dark_mode: true,
            language: Language::Nl,
        };
        prefs.save(&mut kv).unwrap();
        assert_eq!(kv.get(DARK_MODE_KEY).unwrap().as_deref(), Some("true"));
        assert_eq!(Preferences::load(&kv), prefs);
    }

    #[test]
    fn garbage_preferences_fall_back() {
        let mut kv = MemoryStore::new();
        kv.set(THEME_KEY, "green").unwrap();
        kv.set(DARK_MODE_KEY, "yes").unwrap();
        kv.set(LANGUAGE_KEY, "Dutch").unwrap();
        let prefs = Preferences::load(&kv);
        assert_eq!(prefs.theme, Theme::Blue);
        assert!(!prefs.dark_mode);
        assert_eq!(prefs.language, Language::Nl);
    }
}
