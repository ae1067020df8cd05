//! App module - contains the main application state and logic

mod account;
mod avatars;
mod matches;

use crate::api::ApiClient;
use crate::history::{History, HistoryEntry};
use crate::session::StoredSession;
use crate::settings::Settings;
use crate::theme;
use crate::types::*;
use eframe::egui;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

// ============================================================================
// APP STATE
// ============================================================================

pub struct App {
    // Search
    pub(crate) profile_text: String,
    pub(crate) search_state: Arc<Mutex<SearchState>>,
    // Session
    pub(crate) session_state: Arc<Mutex<SessionState>>,
    pub(crate) api: ApiClient,
    // Profile modal
    pub(crate) show_profile_modal: bool,
    pub(crate) profile_seeded: bool,
    pub(crate) edit_name: String,
    pub(crate) edit_bio: String,
    // Sign-in modal
    pub(crate) show_login_modal: bool,
    pub(crate) login_token_input: String,
    // Settings modal
    pub(crate) show_settings: bool,
    pub(crate) api_url_str: String,
    // Search history
    pub(crate) history: History,
    pub(crate) recent_searches: Vec<HistoryEntry>,
    // Avatar cache
    pub(crate) avatar_textures: HashMap<String, Option<egui::TextureHandle>>,
    pub(crate) avatar_fetching: Arc<Mutex<HashSet<String>>>,
    // Runtime & chrome
    pub(crate) runtime: tokio::runtime::Runtime,
    pub(crate) logo_texture: Option<egui::TextureHandle>,
    pub(crate) data_dir: PathBuf,
    pub(crate) cache_dir: PathBuf,
    pub(crate) window_pos: Option<egui::Pos2>,
    pub(crate) window_size: Option<egui::Vec2>,
    pub(crate) central_panel_rect: Option<egui::Rect>,
    pub(crate) startup_done: bool,
    pub needs_center: bool,
    // Toast notification
    pub(crate) toast_message: Option<String>,
    pub(crate) toast_start: Option<std::time::Instant>,
}

// ============================================================================
// APP INITIALIZATION & HELPERS
// ============================================================================

impl App {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        settings: Settings,
        history: History,
        data_dir: PathBuf,
    ) -> Self {
        // Force dark theme
        cc.egui_ctx.set_theme(egui::Theme::Dark);

        // Add Phosphor icons font
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);

        // Apply theme from theme.rs
        theme::apply_visuals(&cc.egui_ctx);

        let cache_dir = crate::utils::get_cache_dir();
        std::fs::create_dir_all(cache_dir.join("avatars")).ok();

        let base_url = settings.api_base_url_or_default();
        let token = StoredSession::load(&data_dir).map(|s| s.token);
        let api = ApiClient::new(base_url.clone(), token);

        let recent_searches = history.recent(10).unwrap_or_default();

        let profile_text = settings.profile_draft.clone().unwrap_or_else(|| {
            "I am a new Python developer. I have used pandas and scikit-learn.".to_string()
        });

        Self {
            profile_text,
            search_state: Arc::new(Mutex::new(SearchState::default())),
            session_state: Arc::new(Mutex::new(SessionState::default())),
            api,
            show_profile_modal: false,
            profile_seeded: false,
            edit_name: String::new(),
            edit_bio: String::new(),
            show_login_modal: false,
            login_token_input: String::new(),
            show_settings: false,
            api_url_str: base_url,
            history,
            recent_searches,
            avatar_textures: HashMap::new(),
            avatar_fetching: Arc::new(Mutex::new(HashSet::new())),
            runtime: tokio::runtime::Runtime::new().unwrap(),
            logo_texture: None,
            data_dir,
            cache_dir,
            window_pos: None,
            window_size: None,
            central_panel_rect: None,
            startup_done: false,
            needs_center: false,
            toast_message: None,
            toast_start: None,
        }
    }

    pub fn save_settings(&self) {
        let settings = Settings {
            window_x: self.window_pos.map(|p| p.x),
            window_y: self.window_pos.map(|p| p.y),
            window_w: self.window_size.map(|s| s.x),
            window_h: self.window_size.map(|s| s.y),
            api_base_url: Some(self.api_url_str.clone()),
            profile_draft: Some(self.profile_text.clone()),
        };
        settings.save(&self.data_dir);
    }

    /// Apply an edited API base URL from the settings modal. Rebuilding the
    /// client keeps the current session token.
    pub fn apply_api_url(&mut self) {
        let trimmed = self.api_url_str.trim().trim_end_matches('/').to_string();
        if trimmed.is_empty() {
            self.api_url_str = crate::constants::DEFAULT_API_BASE_URL.to_string();
        } else {
            self.api_url_str = trimmed;
        }
        let token = StoredSession::load(&self.data_dir).map(|s| s.token);
        self.api = ApiClient::new(self.api_url_str.clone(), token);
        self.save_settings();
    }

    pub fn refresh_recent_searches(&mut self) {
        self.recent_searches = self.history.recent(10).unwrap_or_default();
    }

    pub fn show_toast(&mut self, message: impl Into<String>) {
        self.toast_message = Some(message.into());
        self.toast_start = Some(std::time::Instant::now());
    }
}
