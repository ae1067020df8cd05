//! Avatar loading
//! Fetches the signed-in user's avatar once, caches it on disk, and decodes
//! it into a texture on the UI thread.

use super::App;
use crate::utils::avatar_cache_key;
use eframe::egui;
use tracing::{debug, warn};

impl App {
    pub fn load_avatar(&mut self, ctx: &egui::Context, url: &str) -> Option<egui::TextureHandle> {
        if let Some(cached) = self.avatar_textures.get(url) {
            return cached.clone();
        }

        let avatar_path = self
            .cache_dir
            .join("avatars")
            .join(avatar_cache_key(url));

        if avatar_path.exists() {
            // Cached files carry no extension, so sniff the format from bytes.
            let texture = std::fs::read(&avatar_path)
                .ok()
                .and_then(|bytes| image::load_from_memory(&bytes).ok())
                .map(|img| {
                    let rgba = img.to_rgba8();
                    let size = [rgba.width() as usize, rgba.height() as usize];
                    let pixels = rgba.into_raw();
                    ctx.load_texture(
                        format!("avatar_{}", avatar_cache_key(url)),
                        egui::ColorImage::from_rgba_unmultiplied(size, &pixels),
                        egui::TextureOptions::LINEAR,
                    )
                });
            if texture.is_none() {
                warn!(path = %avatar_path.display(), "Cached avatar failed to decode");
            }
            self.avatar_textures.insert(url.to_string(), texture.clone());
            return texture;
        }

        // Not cached yet; fetch once in the background.
        {
            let mut fetching = self.avatar_fetching.lock().unwrap();
            if fetching.contains(url) {
                return None;
            }
            fetching.insert(url.to_string());
        }

        debug!(url = %url, "Fetching avatar");
        let url = url.to_string();
        let fetching = self.avatar_fetching.clone();
        let ctx_clone = ctx.clone();

        self.runtime.spawn(async move {
            if let Ok(response) = reqwest::get(&url).await {
                if response.status().is_success() {
                    if let Ok(bytes) = response.bytes().await {
                        if let Some(parent) = avatar_path.parent() {
                            std::fs::create_dir_all(parent).ok();
                        }
                        std::fs::write(&avatar_path, &bytes).ok();
                    }
                }
            }
            fetching.lock().unwrap().remove(&url);
            ctx_clone.request_repaint();
        });

        None
    }
}
