//! Search history
//! SQLite storage for past profile searches, newest first, capped

use crate::constants::HISTORY_LIMIT;
use rusqlite::{params, Connection, Result};
use std::path::Path;
use tracing::{debug, error};

/// One past search as shown in the sidebar.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub id: i64,
    pub profile_text: String,
    pub match_count: i64,
    pub top_score: Option<f64>,
    pub created_at: String,
}

pub struct History {
    conn: Connection,
}

impl History {
    /// Open or create the history database at the given path.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        let history = Self { conn };
        history.init_schema()?;
        debug!(path = %path.display(), "History database opened");
        Ok(history)
    }

    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let history = Self { conn };
        history.init_schema()?;
        Ok(history)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS searches (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                profile_text TEXT NOT NULL,
                match_count INTEGER NOT NULL,
                top_score REAL,
                created_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_searches_created ON searches(created_at);",
        )?;
        Ok(())
    }

    /// Record a completed search and prune everything past the cap.
    pub fn record(
        &self,
        profile_text: &str,
        match_count: usize,
        top_score: Option<f64>,
    ) -> Result<()> {
        self.conn.execute(
            "INSERT INTO searches (profile_text, match_count, top_score, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                profile_text,
                match_count as i64,
                top_score,
                chrono::Utc::now().to_rfc3339()
            ],
        )?;
        self.conn.execute(
            "DELETE FROM searches WHERE id NOT IN
                (SELECT id FROM searches ORDER BY id DESC LIMIT ?1)",
            params![HISTORY_LIMIT as i64],
        )?;
        Ok(())
    }

    /// Most recent searches, newest first.
    pub fn recent(&self, limit: usize) -> Result<Vec<HistoryEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, profile_text, match_count, top_score, created_at
             FROM searches ORDER BY id DESC LIMIT ?1",
        )?;

        let entries = stmt
            .query_map(params![limit as i64], |row| {
                Ok(HistoryEntry {
                    id: row.get(0)?,
                    profile_text: row.get(1)?,
                    match_count: row.get(2)?,
                    top_score: row.get(3)?,
                    created_at: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>>>()?;

        Ok(entries)
    }

    pub fn clear(&self) -> Result<()> {
        self.conn.execute("DELETE FROM searches", [])?;
        Ok(())
    }

    pub fn count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM searches", [], |r| r.get(0))?;
        Ok(count as usize)
    }
}

/// Record a search, logging instead of propagating; history is best-effort.
pub fn record_best_effort(
    history: &History,
    profile_text: &str,
    match_count: usize,
    top_score: Option<f64>,
) {
    if let Err(e) = history.record(profile_text, match_count, top_score) {
        error!(error = %e, "Failed to record search history");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_and_list_newest_first() {
        let history = History::open_in_memory().unwrap();
        history.record("python and pandas", 10, Some(0.91)).unwrap();
        history.record("react and node", 3, Some(0.44)).unwrap();

        let recent = history.recent(10).unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].profile_text, "react and node");
        assert_eq!(recent[0].match_count, 3);
        assert_eq!(recent[1].top_score, Some(0.91));
    }

    #[test]
    fn prunes_past_the_cap() {
        let history = History::open_in_memory().unwrap();
        for i in 0..(HISTORY_LIMIT + 7) {
            history.record(&format!("profile {}", i), i, None).unwrap();
        }
        assert_eq!(history.count().unwrap(), HISTORY_LIMIT);

        // The survivors are the newest rows.
        let recent = history.recent(1).unwrap();
        assert_eq!(recent[0].profile_text, format!("profile {}", HISTORY_LIMIT + 6));
    }

    #[test]
    fn clear_empties_the_table() {
        let history = History::open_in_memory().unwrap();
        history.record("anything", 1, None).unwrap();
        history.clear().unwrap();
        assert_eq!(history.count().unwrap(), 0);
        assert!(history.recent(5).unwrap().is_empty());
    }

    #[test]
    fn persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.db");
        {
            let history = History::open(&path).unwrap();
            history.record("c++ and cmake", 6, Some(0.5)).unwrap();
        }
        let history = History::open(&path).unwrap();
        assert_eq!(history.recent(5).unwrap()[0].profile_text, "c++ and cmake");
    }
}
