//! Session lifecycle: startup fetch, sign-in, profile save, logout

use super::App;
use crate::session::StoredSession;
use crate::types::{ProfileUpdate, SessionPhase};
use eframe::egui;
use tracing::{info, warn};

impl App {
    /// Resolve the stored session on startup. Without a token there is
    /// nothing to ask the service.
    pub fn fetch_session(&mut self, ctx: &egui::Context) {
        if !self.api.has_token() {
            self.session_state.lock().unwrap().phase = SessionPhase::SignedOut;
            return;
        }

        info!("Validating stored session");
        let api = self.api.clone();
        let state = self.session_state.clone();
        let ctx = ctx.clone();

        self.runtime.spawn(async move {
            let result = api.current_user().await;
            let mut s = state.lock().unwrap();
            match result {
                Ok(user) => {
                    info!(username = %user.username, "Session restored");
                    s.user = Some(user);
                    s.phase = SessionPhase::SignedIn;
                }
                Err(e) if e.is_unauthorized() => {
                    info!("Stored session expired");
                    s.phase = SessionPhase::SignedOut;
                    s.token_rejected = true;
                }
                Err(e) => {
                    // Service unreachable; keep the token for the next run.
                    warn!(error = %e, "Session check failed");
                    s.phase = SessionPhase::SignedOut;
                }
            }
            drop(s);
            ctx.request_repaint();
        });
    }

    /// Open the GitHub sign-in page and raise the token dialog.
    pub fn begin_login(&mut self) {
        let url = self.api.login_url();
        info!(url = %url, "Opening GitHub sign-in");
        if let Err(e) = open::that(&url) {
            warn!(error = %e, "Failed to open browser");
        }
        self.login_token_input.clear();
        self.session_state.lock().unwrap().login_error = None;
        self.show_login_modal = true;
    }

    /// Validate a pasted session token against `GET /auth/me`.
    pub fn submit_login_token(&mut self, ctx: &egui::Context) {
        let token = self.login_token_input.trim().to_string();
        {
            let mut s = self.session_state.lock().unwrap();
            if s.login_pending {
                return;
            }
            if token.is_empty() {
                s.login_error = Some("Paste the access token first.".to_string());
                return;
            }
            s.login_pending = true;
            s.login_error = None;
        }

        info!("Validating pasted session token");
        let api = self.api.with_token(Some(token.clone()));
        let state = self.session_state.clone();
        let ctx = ctx.clone();

        self.runtime.spawn(async move {
            let result = api.current_user().await;
            let mut s = state.lock().unwrap();
            s.login_pending = false;
            match result {
                Ok(user) => {
                    info!(username = %user.username, "Signed in");
                    s.user = Some(user.clone());
                    s.phase = SessionPhase::SignedIn;
                    s.pending_login = Some((token, user));
                }
                Err(e) => {
                    warn!(error = %e, "Token validation failed");
                    s.login_error = Some(e.to_string());
                }
            }
            drop(s);
            ctx.request_repaint();
        });
    }

    /// Save name and bio from the profile modal.
    pub fn save_profile(&mut self, ctx: &egui::Context) {
        {
            let mut s = self.session_state.lock().unwrap();
            if s.saving {
                return;
            }
            s.saving = true;
            s.save_error = None;
        }

        let update = ProfileUpdate {
            name: self.edit_name.clone(),
            bio: self.edit_bio.clone(),
        };
        info!("Saving profile");

        let api = self.api.clone();
        let state = self.session_state.clone();
        let ctx = ctx.clone();

        self.runtime.spawn(async move {
            let result = api.update_profile(&update).await;
            let mut s = state.lock().unwrap();
            s.saving = false;
            match result {
                Ok(user) => {
                    info!(username = %user.username, "Profile saved");
                    s.user = Some(user);
                    s.saved = true;
                }
                Err(e) => {
                    warn!(error = %e, "Profile save failed");
                    s.save_error = Some(e.to_string());
                }
            }
            drop(s);
            ctx.request_repaint();
        });
    }

    /// Clear the session locally and tell the service, best effort. Sign-out
    /// must not depend on the network call succeeding.
    pub fn logout(&mut self, ctx: &egui::Context) {
        info!("Logging out");
        let api = self.api.clone();
        let ctx_clone = ctx.clone();
        self.runtime.spawn(async move {
            if let Err(e) = api.logout().await {
                warn!(error = %e, "Logout request failed");
            }
            ctx_clone.request_repaint();
        });

        StoredSession::delete(&self.data_dir);
        self.api = self.api.with_token(None);
        {
            let mut s = self.session_state.lock().unwrap();
            s.user = None;
            s.phase = SessionPhase::SignedOut;
            s.saved = false;
            s.save_error = None;
        }
        self.show_profile_modal = false;
        self.profile_seeded = false;
    }

    /// Apply session side effects that must run on the UI thread: token
    /// persistence, dialog closing, the save toast.
    pub fn poll_session(&mut self) {
        let (pending_login, token_rejected, saved) = {
            let mut s = self.session_state.lock().unwrap();
            (
                s.pending_login.take(),
                std::mem::take(&mut s.token_rejected),
                std::mem::take(&mut s.saved),
            )
        };

        if let Some((token, user)) = pending_login {
            StoredSession { token: token.clone() }.save(&self.data_dir);
            self.api = self.api.with_token(Some(token));
            self.show_login_modal = false;
            self.login_token_input.clear();
            self.show_toast(format!("Signed in as @{}", user.username));
        }

        if token_rejected {
            StoredSession::delete(&self.data_dir);
            self.api = self.api.with_token(None);
        }

        if saved {
            self.show_toast("Profile saved");
        }
    }
}
