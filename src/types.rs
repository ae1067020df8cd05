//! Wire types for the matching service plus shared view state

use serde::{Deserialize, Serialize};

/// Body of `POST /matches`.
#[derive(Debug, Clone, Serialize)]
pub struct MatchRequest {
    pub user_profile: String,
}

/// A candidate open-source issue surfaced for a profile.
///
/// `repo_name` is absent on older service builds, so every render path has
/// to tolerate the empty case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Match {
    #[serde(default)]
    pub repo_name: Option<String>,
    pub title: String,
    pub score: f64,
    #[serde(default)]
    pub labels: Vec<String>,
    pub url: String,
}

/// Response of `POST /matches`.
#[derive(Debug, Clone, Deserialize)]
pub struct MatchResponse {
    pub matches: Vec<Match>,
    #[serde(default)]
    pub issues_scanned: Option<u64>,
    #[serde(default)]
    pub profile_summary: Option<String>,
}

/// The authenticated user as served by `GET /auth/me`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
}

/// Body of `PUT /auth/me`.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileUpdate {
    pub name: String,
    pub bio: String,
}

/// Lifecycle of the one outstanding match request.
#[derive(Clone, PartialEq)]
pub enum SearchStatus {
    Idle,
    Loading,
    Done,
    Failed(String),
}

/// Shared between the UI thread and the request task.
pub struct SearchState {
    pub generation: u64,
    pub status: SearchStatus,
    pub matches: Vec<Match>,
    pub issues_scanned: Option<u64>,
    /// Completed search waiting to be written to history on the UI thread.
    pub pending_record: Option<(String, usize, Option<f64>)>,
}

impl Default for SearchState {
    fn default() -> Self {
        Self {
            generation: 0,
            status: SearchStatus::Idle,
            matches: Vec::new(),
            issues_scanned: None,
            pending_record: None,
        }
    }
}

/// Whether a usable session exists.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Startup fetch of the stored session still in flight.
    Loading,
    SignedOut,
    SignedIn,
}

/// Shared between the UI thread and the auth tasks.
pub struct SessionState {
    pub phase: SessionPhase,
    pub user: Option<User>,
    /// Token validation in flight for the sign-in dialog.
    pub login_pending: bool,
    pub login_error: Option<String>,
    /// Validated (token, user) pair waiting for the UI thread to persist.
    pub pending_login: Option<(String, User)>,
    /// Stored token was rejected with 401 and must be deleted.
    pub token_rejected: bool,
    pub saving: bool,
    pub save_error: Option<String>,
    /// Profile save completed, toast not shown yet.
    pub saved: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            phase: SessionPhase::Loading,
            user: None,
            login_pending: false,
            login_error: None,
            pending_login: None,
            token_rejected: false,
            saving: false,
            save_error: None,
            saved: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn match_tolerates_missing_optional_fields() {
        let m: Match = serde_json::from_str(
            r#"{"title": "Fix typo in docs", "score": 0.42, "url": "https://github.com/x/y/issues/1"}"#,
        )
        .unwrap();
        assert_eq!(m.repo_name, None);
        assert!(m.labels.is_empty());
        assert_eq!(m.title, "Fix typo in docs");
    }

    #[test]
    fn match_response_without_scan_counts() {
        let r: MatchResponse = serde_json::from_str(r#"{"matches": []}"#).unwrap();
        assert!(r.matches.is_empty());
        assert_eq!(r.issues_scanned, None);
        assert_eq!(r.profile_summary, None);
    }

    #[test]
    fn user_with_null_fields() {
        let u: User = serde_json::from_str(
            r#"{"username": "octocat", "name": null, "email": null, "avatar_url": null, "bio": null}"#,
        )
        .unwrap();
        assert_eq!(u.username, "octocat");
        assert_eq!(u.name, None);
        assert_eq!(u.bio, None);
    }
}
