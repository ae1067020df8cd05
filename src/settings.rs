//! User settings stored as settings.json in the app data directory

use crate::constants::DEFAULT_API_BASE_URL;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Window geometry
    pub window_x: Option<f32>,
    pub window_y: Option<f32>,
    pub window_w: Option<f32>,
    pub window_h: Option<f32>,

    /// Matching service base URL; `None` means the built-in default.
    pub api_base_url: Option<String>,

    /// Last contents of the skills editor, restored on launch.
    pub profile_draft: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            window_x: None,
            window_y: None,
            window_w: None,
            window_h: None,
            api_base_url: None,
            profile_draft: None,
        }
    }
}

impl Settings {
    pub fn load(data_dir: &Path) -> Self {
        let path = data_dir.join("settings.json");
        match std::fs::read_to_string(&path) {
            Ok(s) => match serde_json::from_str(&s) {
                Ok(settings) => {
                    debug!(path = %path.display(), "Settings loaded");
                    settings
                }
                Err(e) => {
                    warn!(error = %e, "Failed to parse settings, using defaults");
                    Self::default()
                }
            },
            Err(_) => {
                debug!("No settings file found, using defaults");
                Self::default()
            }
        }
    }

    pub fn save(&self, data_dir: &Path) {
        let path = data_dir.join("settings.json");
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = std::fs::write(&path, json) {
                    warn!(error = %e, "Failed to save settings");
                }
            }
            Err(e) => warn!(error = %e, "Failed to serialize settings"),
        }
    }

    pub fn api_base_url_or_default(&self) -> String {
        self.api_base_url
            .as_deref()
            .map(|s| s.trim_end_matches('/'))
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_API_BASE_URL)
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            window_x: Some(40.0),
            window_y: Some(60.0),
            window_w: Some(1280.0),
            window_h: Some(800.0),
            api_base_url: Some("http://10.0.0.5:8000/".to_string()),
            profile_draft: Some("I know Rust and SQL".to_string()),
        };
        settings.save(dir.path());

        let loaded = Settings::load(dir.path());
        assert_eq!(loaded.window_w, Some(1280.0));
        assert_eq!(loaded.profile_draft.as_deref(), Some("I know Rust and SQL"));
        // Trailing slash is stripped when the URL is used.
        assert_eq!(loaded.api_base_url_or_default(), "http://10.0.0.5:8000");
    }

    #[test]
    fn corrupt_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("settings.json"), "{not json").unwrap();

        let loaded = Settings::load(dir.path());
        assert_eq!(loaded.api_base_url, None);
        assert_eq!(loaded.api_base_url_or_default(), DEFAULT_API_BASE_URL);
    }
}
