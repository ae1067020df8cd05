//! Persisted session token
//!
//! The service issues its session as an `access_token` browser cookie. The
//! desktop client keeps the pasted value in session.json next to the other
//! app data and replays it as a cookie header.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredSession {
    pub token: String,
}

impl StoredSession {
    fn path(data_dir: &Path) -> std::path::PathBuf {
        data_dir.join("session.json")
    }

    pub fn load(data_dir: &Path) -> Option<Self> {
        let path = Self::path(data_dir);
        let raw = std::fs::read_to_string(&path).ok()?;
        match serde_json::from_str::<Self>(&raw) {
            Ok(session) if !session.token.trim().is_empty() => {
                debug!("Stored session loaded");
                Some(session)
            }
            Ok(_) => None,
            Err(e) => {
                warn!(error = %e, "Failed to parse stored session, ignoring");
                None
            }
        }
    }

    pub fn save(&self, data_dir: &Path) {
        let path = Self::path(data_dir);
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = std::fs::write(&path, json) {
                    warn!(error = %e, "Failed to save session");
                }
            }
            Err(e) => warn!(error = %e, "Failed to serialize session"),
        }
    }

    pub fn delete(data_dir: &Path) {
        let path = Self::path(data_dir);
        if path.exists() {
            if let Err(e) = std::fs::remove_file(&path) {
                warn!(error = %e, "Failed to delete stored session");
            } else {
                debug!("Stored session deleted");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_round_trip_and_delete() {
        let dir = tempfile::tempdir().unwrap();
        StoredSession {
            token: "tok-abc".to_string(),
        }
        .save(dir.path());

        let loaded = StoredSession::load(dir.path()).unwrap();
        assert_eq!(loaded.token, "tok-abc");

        StoredSession::delete(dir.path());
        assert!(StoredSession::load(dir.path()).is_none());
    }

    #[test]
    fn blank_or_corrupt_tokens_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("session.json"), r#"{"token": "  "}"#).unwrap();
        assert!(StoredSession::load(dir.path()).is_none());

        std::fs::write(dir.path().join("session.json"), "garbage").unwrap();
        assert!(StoredSession::load(dir.path()).is_none());
    }
}
