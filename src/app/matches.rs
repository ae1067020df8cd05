//! Match search logic

use super::App;
use crate::history;
use crate::types::SearchStatus;
use eframe::egui;
use tracing::{info, warn};

impl App {
    /// Submit the current skills text to the matching service. One request at
    /// a time; the submit button is disabled while one is outstanding.
    pub fn submit_search(&mut self, ctx: &egui::Context) {
        let profile = self.profile_text.clone();

        let generation = {
            let mut s = self.search_state.lock().unwrap();
            if s.status == SearchStatus::Loading {
                return;
            }
            s.generation += 1;
            s.status = SearchStatus::Loading;
            s.matches.clear();
            s.issues_scanned = None;
            s.generation
        };

        info!(chars = profile.len(), "Submitting profile for matching");
        self.save_settings();

        let api = self.api.clone();
        let state = self.search_state.clone();
        let ctx = ctx.clone();

        self.runtime.spawn(async move {
            let result = api.find_matches(&profile).await;

            let mut s = state.lock().unwrap();
            // A newer submission superseded this one; drop the response.
            if s.generation != generation {
                return;
            }
            match result {
                Ok(response) => {
                    info!(
                        matches = response.matches.len(),
                        scanned = response.issues_scanned,
                        "Matches received"
                    );
                    let top_score = response.matches.first().map(|m| m.score);
                    s.pending_record =
                        Some((profile.clone(), response.matches.len(), top_score));
                    s.matches = response.matches;
                    s.issues_scanned = response.issues_scanned;
                    s.status = SearchStatus::Done;
                }
                Err(e) => {
                    warn!(error = %e, "Match request failed");
                    s.status = SearchStatus::Failed(e.to_string());
                }
            }
            drop(s);
            ctx.request_repaint();
        });
    }

    /// Drain results the background task left behind. History writes stay on
    /// the UI thread because the connection lives there.
    pub fn poll_search(&mut self) {
        let pending = {
            let mut s = self.search_state.lock().unwrap();
            s.pending_record.take()
        };
        if let Some((profile, count, top_score)) = pending {
            history::record_best_effort(&self.history, &profile, count, top_score);
            self.refresh_recent_searches();
        }
    }

    /// Put a past search back into the editor.
    pub fn restore_search(&mut self, profile_text: String) {
        self.profile_text = profile_text;
    }
}
