//! Application constants and configuration

/// Base URL of the matching service when none is configured.
pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8000";

pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Folder name under the platform data directory.
pub const DATA_DIR_NAME: &str = "FirstPR";

/// Search history keeps at most this many rows.
pub const HISTORY_LIMIT: usize = 50;
