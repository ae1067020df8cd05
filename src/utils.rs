//! Utility functions

use std::path::PathBuf;

// Pull-request mark, stroked so it stays crisp at sidebar sizes
pub const LOGO_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 104 104"><g fill="none" stroke-linecap="round"><circle cx="28" cy="22" r="11" stroke="#fff" stroke-width="8"/><path d="M28 33v38" stroke="#fff" stroke-width="8"/><circle cx="28" cy="82" r="11" stroke="#fff" stroke-width="8"/><path d="M52 22h10a14 14 0 0 1 14 14v35" stroke="#3b82f6" stroke-width="8"/><path d="M46 16l8 6-8 6" fill="#3b82f6" stroke="none"/><circle cx="76" cy="82" r="11" stroke="#3b82f6" stroke-width="8"/></g></svg>"##;

/// Rasterize the logo SVG at the given width, preserving aspect ratio.
pub fn rasterize_logo(width: u32) -> (Vec<u8>, u32, u32) {
    let tree = resvg::usvg::Tree::from_str(LOGO_SVG, &resvg::usvg::Options::default()).unwrap();
    let svg_size = tree.size();
    let scale = width as f32 / svg_size.width();
    let height = (svg_size.height() * scale).ceil() as u32;
    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height).unwrap();
    resvg::render(
        &tree,
        resvg::usvg::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );
    (premul_to_straight(&pixmap), width, height)
}

/// Rasterize the logo to a square image (for window/taskbar icons).
pub fn rasterize_logo_square(size: u32) -> (Vec<u8>, u32, u32) {
    let tree = resvg::usvg::Tree::from_str(LOGO_SVG, &resvg::usvg::Options::default()).unwrap();
    let scale = size as f32 / tree.size().width();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size, size).unwrap();
    resvg::render(
        &tree,
        resvg::usvg::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );
    (premul_to_straight(&pixmap), size, size)
}

fn premul_to_straight(pixmap: &resvg::tiny_skia::Pixmap) -> Vec<u8> {
    pixmap
        .pixels()
        .iter()
        .flat_map(|p| {
            let a = p.alpha();
            if a == 0 {
                [0, 0, 0, 0]
            } else {
                let r = (p.red() as u16 * 255 / a as u16) as u8;
                let g = (p.green() as u16 * 255 / a as u16) as u8;
                let b = (p.blue() as u16 * 255 / a as u16) as u8;
                [r, g, b, a]
            }
        })
        .collect()
}

/// Get the cache directory path
pub fn get_cache_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(crate::constants::DATA_DIR_NAME)
        .join("cache")
}

/// Stable on-disk name for a cached avatar URL.
pub fn avatar_cache_key(url: &str) -> String {
    use std::hash::{Hash, Hasher};
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    url.hash(&mut hasher);
    format!("{:016x}", hasher.finish())
}

/// Compact "how long ago" label for history rows. Falls back to the raw
/// string when it is not RFC 3339.
pub fn format_relative_time(rfc3339: &str) -> String {
    let parsed = match chrono::DateTime::parse_from_rfc3339(rfc3339) {
        Ok(t) => t.with_timezone(&chrono::Utc),
        Err(_) => return rfc3339.to_string(),
    };
    let elapsed = chrono::Utc::now().signed_duration_since(parsed);

    if elapsed.num_seconds() < 60 {
        "just now".to_string()
    } else if elapsed.num_minutes() < 60 {
        format!("{}m ago", elapsed.num_minutes())
    } else if elapsed.num_hours() < 24 {
        format!("{}h ago", elapsed.num_hours())
    } else if elapsed.num_days() < 7 {
        format!("{}d ago", elapsed.num_days())
    } else {
        parsed.format("%Y-%m-%d").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_time_buckets() {
        let now = chrono::Utc::now();
        assert_eq!(format_relative_time(&now.to_rfc3339()), "just now");
        assert_eq!(
            format_relative_time(&(now - chrono::Duration::minutes(5)).to_rfc3339()),
            "5m ago"
        );
        assert_eq!(
            format_relative_time(&(now - chrono::Duration::hours(3)).to_rfc3339()),
            "3h ago"
        );
        assert_eq!(
            format_relative_time(&(now - chrono::Duration::days(2)).to_rfc3339()),
            "2d ago"
        );
    }

    #[test]
    fn relative_time_falls_back_on_garbage() {
        assert_eq!(format_relative_time("not a date"), "not a date");
    }

    #[test]
    fn avatar_keys_are_stable_and_distinct() {
        let a = avatar_cache_key("https://avatars.example/u/1");
        let b = avatar_cache_key("https://avatars.example/u/2");
        assert_eq!(a, avatar_cache_key("https://avatars.example/u/1"));
        assert_ne!(a, b);
        assert_eq!(a.len(), 16);
    }
}
