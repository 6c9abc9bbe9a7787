//! Application settings management

use crate::PathManager;
use serde::{Deserialize, Serialize};
use std::fs;

/// Application settings stored in settings.toml
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Gemini model ID (e.g., "gemini-2.5-flash")
    pub default_model: Option<String>,
    /// Custom API base URL, for proxying the Gemini endpoint
    pub gemini_base_url: Option<String>,
    /// Seconds before the demo push notification fires
    pub notify_after_secs: Option<u64>,
}

impl Settings {
    /// Load settings from the settings file, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = PathManager::settings_path() else {
            return Self::default();
        };

        let Ok(content) = fs::read_to_string(&path) else {
            return Self::default();
        };

        toml::from_str(&content).unwrap_or_default()
    }

    /// Save settings to the settings file
    pub fn save(&self) -> anyhow::Result<()> {
        let path = PathManager::settings_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine settings path"))?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_roundtrip_through_toml() {
        let settings = Settings {
            default_model: Some("gemini-2.5-flash".to_string()),
            gemini_base_url: None,
            notify_after_secs: Some(15),
        };

        let content = toml::to_string_pretty(&settings).unwrap();
        let parsed: Settings = toml::from_str(&content).unwrap();

        assert_eq!(parsed.default_model.as_deref(), Some("gemini-2.5-flash"));
        assert_eq!(parsed.notify_after_secs, Some(15));
        assert!(parsed.gemini_base_url.is_none());
    }

    #[test]
    fn unknown_or_missing_fields_fall_back_to_defaults() {
        let parsed: Settings = toml::from_str("").unwrap();
        assert!(parsed.default_model.is_none());
        assert!(parsed.notify_after_secs.is_none());
    }
}
