#![windows_subsystem = "windows"]
//! FirstPR - Main entry point

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

mod api;
mod app;
mod constants;
mod history;
mod session;
mod settings;
mod theme;
mod types;
mod ui;
mod utils;

use app::App;
use constants::*;
use eframe::egui;
use history::History;
use std::path::PathBuf;
use tracing::{error, info};
use types::*;
use ui::components::{error_banner, format_score, label_pill, link_label, score_color};

/// Initialize file logging. Returns a guard that must be held for the app lifetime.
fn init_logging(data_dir: &std::path::Path) -> tracing_appender::non_blocking::WorkerGuard {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let logs_dir = data_dir.join("logs");
    std::fs::create_dir_all(&logs_dir).ok();

    let file_appender = tracing_appender::rolling::daily(&logs_dir, "firstpr.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,firstpr=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true),
        )
        .init();

    guard
}

fn main() -> eframe::Result<()> {
    let data_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DATA_DIR_NAME);

    std::fs::create_dir_all(&data_dir).ok();

    // Initialize logging - guard must live for entire app lifetime
    let _log_guard = init_logging(&data_dir);

    info!(version = APP_VERSION, "FirstPR starting");

    let history_path = data_dir.join("history.db");
    let history = match History::open(&history_path) {
        Ok(history) => history,
        Err(e) => {
            error!(error = %e, path = %history_path.display(), "Failed to open history database");
            panic!("Failed to open history database: {}", e);
        }
    };

    // Load saved window position/size
    let settings = settings::Settings::load(&data_dir);
    let win_pos = match (settings.window_x, settings.window_y) {
        (Some(x), Some(y)) => Some(egui::pos2(x, y)),
        _ => None,
    };
    let win_size = match (settings.window_w, settings.window_h) {
        (Some(w), Some(h)) => Some(egui::vec2(w, h)),
        _ => None,
    };

    let mut viewport = egui::ViewportBuilder::default()
        .with_inner_size(win_size.unwrap_or(egui::vec2(1180.0, 780.0)))
        .with_min_inner_size([960.0, 640.0])
        .with_title("FirstPR");

    // Window/taskbar icon rendered from the logo
    {
        let (pixels, w, h) = utils::rasterize_logo_square(256);
        let icon = egui::IconData {
            rgba: pixels,
            width: w,
            height: h,
        };
        viewport = viewport.with_icon(std::sync::Arc::new(icon));
    }

    let needs_center = win_pos.is_none();

    if let Some(pos) = win_pos {
        viewport = viewport.with_position(pos);
    }

    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        "FirstPR",
        options,
        Box::new(move |cc| {
            let mut app = App::new(cc, settings, history, data_dir);
            app.needs_center = needs_center;
            Ok(Box::new(app))
        }),
    )
}

// ============================================================================
// MAIN UPDATE LOOP & UI RENDERING
// ============================================================================

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Track window position/size for saving on exit
        ctx.input(|i| {
            if let Some(rect) = i.viewport().outer_rect {
                self.window_pos = Some(rect.min);
            }
            if let Some(rect) = i.viewport().inner_rect {
                self.window_size = Some(rect.size());
            }
        });

        // Resolve the stored session on the first frame
        if !self.startup_done {
            self.startup_done = true;
            self.fetch_session(ctx);
        }

        // Center window on first launch
        if self.needs_center {
            self.needs_center = false;
            if let Some(cmd) = egui::ViewportCommand::center_on_screen(ctx) {
                ctx.send_viewport_cmd(cmd);
            }
        }

        // Apply results left behind by background tasks
        self.poll_search();
        self.poll_session();

        // Ctrl+Enter submits from anywhere when no modal is open
        let modal_open = self.show_settings || self.show_profile_modal || self.show_login_modal;
        if !modal_open
            && ctx.input(|i| i.modifiers.ctrl && i.key_pressed(egui::Key::Enter))
        {
            self.submit_search(ctx);
        }

        // Left sidebar - skills editor and history (must be added BEFORE CentralPanel)
        egui::SidePanel::left("sidebar")
            .exact_width(theme::SIDEBAR_WIDTH)
            .resizable(false)
            .show_separator_line(false)
            .frame(
                egui::Frame::new()
                    .fill(theme::BG_BASE)
                    .inner_margin(egui::Margin {
                        left: 16,
                        right: 16,
                        top: 0,
                        bottom: 0,
                    }),
            )
            .show(ctx, |ui| {
                self.render_sidebar(ui, ctx);
            });

        // Central panel - match results (MUST be added LAST after all side panels)
        egui::CentralPanel::default()
            .frame(
                egui::Frame::new()
                    .fill(theme::BG_BASE)
                    .inner_margin(egui::Margin::same(16)),
            )
            .show(ctx, |ui| {
                self.central_panel_rect = Some(ui.max_rect());
                self.render_results(ui, ctx);
            });

        // Modals and toast are drawn over everything else
        self.render_login_modal(ctx);
        self.render_profile_modal(ctx);
        self.render_settings_modal(ctx);
        self.render_toast(ctx);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        info!("Application shutting down");
        self.save_settings();
    }
}

// ============================================================================
// SIDEBAR
// ============================================================================

impl App {
    fn render_sidebar(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        let panel_max_rect = ui.max_rect();

        ui.add_space(21.0);
        ui.with_layout(egui::Layout::top_down(egui::Align::Center), |ui| {
            let texture = self.logo_texture.get_or_insert_with(|| {
                let (pixels, w, h) = utils::rasterize_logo(96);
                ctx.load_texture(
                    "logo",
                    egui::ColorImage::from_rgba_unmultiplied([w as usize, h as usize], &pixels),
                    egui::TextureOptions::LINEAR,
                )
            });

            let logo_size = egui::vec2(48.0, 48.0);
            ui.image(egui::load::SizedTexture::new(texture.id(), logo_size));

            ui.add_space(6.0);
            ui.add(
                egui::Label::new(
                    egui::RichText::new("FIRSTPR.AI")
                        .size(theme::FONT_HEADING)
                        .strong()
                        .color(theme::TEXT_PRIMARY),
                )
                .selectable(false),
            );
            ui.add(
                egui::Label::new(
                    egui::RichText::new("Tell us your skills. We'll find your\nfirst open-source contribution.")
                        .size(theme::FONT_SMALL)
                        .color(theme::TEXT_DIM),
                )
                .selectable(false),
            );
        });
        ui.add_space(14.0);

        // Skills editor
        theme::section_frame().show(ui, |ui| {
            ui.add(
                egui::Label::new(
                    egui::RichText::new("YOUR SKILLS")
                        .color(theme::TEXT_DIM)
                        .size(theme::FONT_SMALL),
                )
                .selectable(false),
            );
            ui.add_space(6.0);
            egui::Frame::new()
                .fill(theme::BG_INPUT)
                .stroke(egui::Stroke::new(theme::STROKE_DEFAULT, theme::BORDER_SUBTLE))
                .corner_radius(theme::RADIUS_DEFAULT)
                .inner_margin(egui::Margin::symmetric(8, 8))
                .show(ui, |ui| {
                    ui.add(
                        egui::TextEdit::multiline(&mut self.profile_text)
                            .frame(false)
                            .desired_rows(6)
                            .desired_width(ui.available_width())
                            .hint_text("I am a new Python developer. I have used pandas..."),
                    );
                });
        });

        ui.add_space(8.0);

        // Submit button - full width, accent
        let is_loading = self.search_state.lock().unwrap().status == SearchStatus::Loading;
        let submit_enabled = !is_loading;
        let submit_rect = ui.available_rect_before_wrap();
        let submit_rect = egui::Rect::from_min_size(
            submit_rect.min,
            egui::vec2(submit_rect.width(), theme::BUTTON_HEIGHT_LARGE),
        );
        let submit_response = ui.allocate_rect(submit_rect, egui::Sense::click());

        let submit_fill = if submit_enabled {
            theme::BTN_ACCENT
        } else {
            theme::BTN_DISABLED
        };
        let (submit_fill, submit_draw) = if submit_enabled {
            theme::button_visual(&submit_response, submit_fill, submit_rect)
        } else {
            (submit_fill, submit_rect)
        };
        ui.painter()
            .rect_filled(submit_draw, theme::RADIUS_DEFAULT, submit_fill);
        let submit_text = if is_loading {
            "Scanning for matches...".to_string()
        } else {
            format!("{} Find My First PR", egui_phosphor::regular::MAGNIFYING_GLASS)
        };
        let submit_text_color = if submit_enabled {
            theme::TEXT_PRIMARY
        } else {
            theme::BTN_DISABLED_TEXT
        };
        ui.painter().text(
            submit_draw.center(),
            egui::Align2::CENTER_CENTER,
            &submit_text,
            egui::FontId::proportional(theme::FONT_BODY),
            submit_text_color,
        );
        if submit_response.hovered() {
            ui.ctx().set_cursor_icon(if submit_enabled {
                egui::CursorIcon::PointingHand
            } else {
                egui::CursorIcon::NotAllowed
            });
        }
        let submit_clicked = submit_enabled && submit_response.clicked();
        if submit_enabled {
            submit_response.on_hover_text("Ctrl+Enter");
        }
        if submit_clicked {
            self.submit_search(ctx);
        }

        ui.add_space(14.0);

        // Bottom area: account row + version line
        let bottom_height = 44.0 + 6.0 + 14.0 + 8.0;

        // Recent searches fill the space between the button and the bottom area
        let available_for_history = (ui.available_height() - bottom_height - 16.0).max(0.0);
        if !self.recent_searches.is_empty() {
            ui.horizontal(|ui| {
                ui.add(
                    egui::Label::new(
                        egui::RichText::new("RECENT SEARCHES")
                            .color(theme::TEXT_DIM)
                            .size(theme::FONT_SMALL),
                    )
                    .selectable(false),
                );
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui
                        .add(
                            egui::Button::new(
                                egui::RichText::new(egui_phosphor::regular::TRASH)
                                    .size(theme::FONT_SECTION)
                                    .color(theme::TEXT_DIM),
                            )
                            .frame(false),
                        )
                        .on_hover_text("Clear history")
                        .clicked()
                    {
                        if let Err(e) = self.history.clear() {
                            error!(error = %e, "Failed to clear history");
                        }
                        self.refresh_recent_searches();
                    }
                });
            });
            ui.add_space(2.0);

            egui::ScrollArea::vertical()
                .max_height(available_for_history)
                .scroll_bar_visibility(egui::scroll_area::ScrollBarVisibility::AlwaysHidden)
                .show(ui, |ui| {
                    let entries = self.recent_searches.clone();
                    for entry in &entries {
                        self.render_history_row(ui, entry);
                    }
                });
        }

        // Account + version pinned at absolute bottom of panel
        let bottom_rect = egui::Rect::from_min_max(
            egui::pos2(panel_max_rect.left(), panel_max_rect.bottom() - bottom_height),
            egui::pos2(panel_max_rect.right(), panel_max_rect.bottom()),
        );

        ui.allocate_ui_at_rect(bottom_rect, |ui| {
            ui.set_min_width(bottom_rect.width());
            self.render_account_row(ui, ctx);

            ui.add_space(6.0);
            ui.with_layout(egui::Layout::top_down(egui::Align::Center), |ui| {
                ui.add(
                    egui::Label::new(
                        egui::RichText::new(format!("v{}", APP_VERSION))
                            .size(theme::FONT_CAPTION)
                            .color(egui::Color32::from_rgb(0x45, 0x45, 0x4c)),
                    )
                    .selectable(false),
                );
            });
        });
    }

    fn render_history_row(&mut self, ui: &mut egui::Ui, entry: &history::HistoryEntry) {
        let row_height = 40.0;
        let (rect, response) = ui.allocate_exact_size(
            egui::vec2(ui.available_width(), row_height),
            egui::Sense::click(),
        );
        if !ui.is_rect_visible(rect) {
            return;
        }

        let painter = ui.painter();
        if response.hovered() {
            painter.rect_filled(rect, theme::RADIUS_DEFAULT, theme::BG_HOVER);
            ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
        }

        // First line of the profile, truncated to the row
        let first_line = entry.profile_text.lines().next().unwrap_or("");
        let mut title: String = first_line.chars().take(38).collect();
        if first_line.chars().count() > 38 {
            title.push('\u{2026}');
        }
        painter.text(
            egui::pos2(rect.min.x + 6.0, rect.min.y + 6.0),
            egui::Align2::LEFT_TOP,
            title,
            egui::FontId::proportional(theme::FONT_SECTION),
            theme::TEXT_SECONDARY,
        );

        let detail = format!(
            "{} matches \u{2022} {}",
            entry.match_count,
            utils::format_relative_time(&entry.created_at)
        );
        painter.text(
            egui::pos2(rect.min.x + 6.0, rect.max.y - 6.0),
            egui::Align2::LEFT_BOTTOM,
            detail,
            egui::FontId::proportional(theme::FONT_CAPTION),
            theme::TEXT_DIM,
        );

        if response.clicked() {
            self.restore_search(entry.profile_text.clone());
        }
    }

    fn render_account_row(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        let phase = self.session_state.lock().unwrap().phase;
        match phase {
            SessionPhase::Loading => {
                ui.horizontal(|ui| {
                    ui.add(egui::Spinner::new().size(14.0).color(theme::TEXT_DIM));
                    ui.add(
                        egui::Label::new(
                            egui::RichText::new("Checking session...")
                                .size(theme::FONT_SECTION)
                                .color(theme::TEXT_DIM),
                        )
                        .selectable(false),
                    );
                });
            }
            SessionPhase::SignedOut => {
                let (rect, response) = ui.allocate_exact_size(
                    egui::vec2(ui.available_width(), 36.0),
                    egui::Sense::click(),
                );
                let (fill, draw_rect) =
                    theme::button_visual(&response, theme::BTN_DEFAULT, rect);
                ui.painter()
                    .rect_filled(draw_rect, theme::RADIUS_DEFAULT, fill);
                ui.painter().text(
                    draw_rect.center(),
                    egui::Align2::CENTER_CENTER,
                    format!(
                        "{}  Sign in with GitHub",
                        egui_phosphor::regular::GITHUB_LOGO
                    ),
                    egui::FontId::proportional(theme::FONT_LABEL),
                    theme::TEXT_PRIMARY,
                );
                if response.hovered() {
                    ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
                }
                if response.clicked() {
                    self.begin_login();
                }
            }
            SessionPhase::SignedIn => {
                let (username, name, avatar_url) = {
                    let s = self.session_state.lock().unwrap();
                    let user = s.user.as_ref();
                    (
                        user.map(|u| u.username.clone()).unwrap_or_default(),
                        user.and_then(|u| u.name.clone()),
                        user.and_then(|u| u.avatar_url.clone()),
                    )
                };

                let (rect, response) = ui.allocate_exact_size(
                    egui::vec2(ui.available_width(), 40.0),
                    egui::Sense::click(),
                );
                if response.hovered() {
                    ui.painter()
                        .rect_filled(rect, theme::RADIUS_DEFAULT, theme::BG_HOVER);
                    ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
                }

                // Avatar or placeholder
                let avatar_size = 28.0;
                let avatar_rect = egui::Rect::from_center_size(
                    egui::pos2(rect.min.x + 6.0 + avatar_size / 2.0, rect.center().y),
                    egui::vec2(avatar_size, avatar_size),
                );
                let texture = avatar_url.as_deref().and_then(|url| self.load_avatar(ctx, url));
                let painter = ui.painter();
                if let Some(tex) = texture {
                    let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
                    let brush = egui::epaint::Brush {
                        fill_texture_id: tex.id(),
                        uv,
                    };
                    let mut shape = egui::epaint::RectShape::filled(
                        avatar_rect,
                        egui::CornerRadius::same((avatar_size / 2.0) as u8),
                        egui::Color32::WHITE,
                    );
                    shape.brush = Some(std::sync::Arc::new(brush));
                    painter.add(shape);
                } else {
                    painter.text(
                        avatar_rect.center(),
                        egui::Align2::CENTER_CENTER,
                        egui_phosphor::regular::USER_CIRCLE,
                        egui::FontId::proportional(24.0),
                        theme::TEXT_MUTED,
                    );
                }

                let text_x = avatar_rect.max.x + 8.0;
                painter.text(
                    egui::pos2(text_x, rect.min.y + 6.0),
                    egui::Align2::LEFT_TOP,
                    format!("@{}", username),
                    egui::FontId::proportional(theme::FONT_LABEL),
                    theme::TEXT_PRIMARY,
                );
                painter.text(
                    egui::pos2(text_x, rect.max.y - 6.0),
                    egui::Align2::LEFT_BOTTOM,
                    name.unwrap_or_else(|| "View profile".to_string()),
                    egui::FontId::proportional(theme::FONT_CAPTION),
                    theme::TEXT_DIM,
                );

                if response.clicked() {
                    self.profile_seeded = false;
                    self.show_profile_modal = true;
                }
            }
        }
    }
}

// ============================================================================
// RESULTS PANEL
// ============================================================================

impl App {
    fn render_results(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        let (status, issues_scanned, match_count) = {
            let s = self.search_state.lock().unwrap();
            (s.status.clone(), s.issues_scanned, s.matches.len())
        };

        // Header bar with result summary and settings gear
        ui.horizontal(|ui| {
            let status_text = match &status {
                SearchStatus::Done => match issues_scanned {
                    Some(scanned) => {
                        format!("{} matches \u{2022} scanned {} issues", match_count, scanned)
                    }
                    None => format!("{} matches", match_count),
                },
                SearchStatus::Loading => "Scanning for matches...".to_string(),
                _ => "Matches".to_string(),
            };
            ui.add(
                egui::Label::new(egui::RichText::new(status_text).color(theme::TEXT_DIM))
                    .selectable(false),
            );

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui
                    .add(egui::Button::new(egui_phosphor::regular::GEAR).frame(false))
                    .on_hover_text("Settings")
                    .clicked()
                {
                    self.show_settings = !self.show_settings;
                }
            });
        });

        ui.add_space(4.0);

        match status {
            SearchStatus::Failed(message) => {
                error_banner(ui, &message);
            }
            SearchStatus::Loading => {
                ui.vertical_centered(|ui| {
                    ui.add_space(ui.available_height() / 3.0);
                    ui.add(egui::Spinner::new().size(44.0).color(theme::ACCENT));
                });
            }
            SearchStatus::Idle => {
                ui.vertical_centered(|ui| {
                    ui.add_space(ui.available_height() / 3.0);
                    ui.label(
                        egui::RichText::new(egui_phosphor::regular::GIT_PULL_REQUEST)
                            .size(48.0)
                            .color(theme::TEXT_DIM),
                    );
                    ui.add_space(8.0);
                    ui.label(
                        egui::RichText::new("Enter your skills to get started!")
                            .size(theme::FONT_HEADING)
                            .color(theme::TEXT_MUTED),
                    );
                });
            }
            SearchStatus::Done if match_count == 0 => {
                ui.vertical_centered(|ui| {
                    ui.add_space(ui.available_height() / 3.0);
                    ui.label(
                        egui::RichText::new(egui_phosphor::regular::BINOCULARS)
                            .size(48.0)
                            .color(theme::TEXT_DIM),
                    );
                    ui.add_space(8.0);
                    ui.label(
                        egui::RichText::new("No matches for that profile yet")
                            .size(theme::FONT_HEADING)
                            .color(theme::TEXT_MUTED),
                    );
                    ui.label(
                        egui::RichText::new("Try describing more of your skills and interests.")
                            .size(theme::FONT_LABEL)
                            .color(theme::TEXT_DIM),
                    );
                });
            }
            SearchStatus::Done => {
                self.render_match_grid(ui);
            }
        }
    }

    fn render_match_grid(&mut self, ui: &mut egui::Ui) {
        let matches = self.search_state.lock().unwrap().matches.clone();

        let spacing = theme::SPACING_MD;
        let available = ui.available_width();
        let num_cols = ((available + spacing) / (theme::CARD_MIN_WIDTH + spacing))
            .floor()
            .max(1.0);
        let card_w = ((available - spacing * (num_cols - 1.0)) / num_cols).floor();
        let card_h = theme::CARD_HEIGHT;

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.horizontal_wrapped(|ui| {
                    ui.spacing_mut().item_spacing = egui::vec2(spacing, spacing);
                    for m in &matches {
                        Self::render_match_card(ui, m, card_w, card_h);
                    }
                });
            });
    }

    fn render_match_card(ui: &mut egui::Ui, m: &Match, card_w: f32, card_h: f32) {
        let (rect, response) =
            ui.allocate_exact_size(egui::vec2(card_w, card_h), egui::Sense::hover());
        if !ui.is_rect_visible(rect) {
            return;
        }

        let painter = ui.painter();
        painter.rect_filled(
            rect,
            theme::RADIUS_LARGE,
            egui::Color32::from_rgba_unmultiplied(0x18, 0x18, 0x1b, 150),
        );
        let border = if response.hovered() {
            theme::BORDER_DEFAULT
        } else {
            theme::BORDER_SUBTLE
        };
        painter.rect_stroke(
            rect,
            theme::RADIUS_LARGE,
            egui::Stroke::new(theme::STROKE_DEFAULT, border),
            egui::StrokeKind::Inside,
        );

        let inner = rect.shrink(theme::SPACING_LG);
        let footer_height = 24.0;
        let content_rect = egui::Rect::from_min_max(
            inner.min,
            egui::pos2(inner.max.x, inner.max.y - footer_height - 6.0),
        );

        // Score, right-aligned: colored percentage with a dim "match" caption
        let score_text = format_score(m.score);
        painter.text(
            content_rect.right_top(),
            egui::Align2::RIGHT_TOP,
            &score_text,
            egui::FontId::proportional(theme::FONT_HEADING),
            score_color(m.score),
        );
        painter.text(
            content_rect.right_top() + egui::vec2(0.0, 20.0),
            egui::Align2::RIGHT_TOP,
            "match",
            egui::FontId::proportional(theme::FONT_CAPTION),
            theme::TEXT_DIM,
        );

        // Repo name, uppercase accent label; may be absent on the wire
        let text_width = content_rect.width() - 76.0;
        let repo = m.repo_name.as_deref().unwrap_or("");
        if !repo.is_empty() {
            painter.text(
                content_rect.left_top(),
                egui::Align2::LEFT_TOP,
                repo.to_uppercase(),
                egui::FontId::proportional(theme::FONT_SMALL),
                theme::ACCENT_LIGHT,
            );
        }

        // Title, wrapped to at most two rows
        let title_galley = painter.layout(
            m.title.clone(),
            egui::FontId::proportional(15.0),
            theme::TEXT_PRIMARY,
            text_width,
        );
        let title_y = content_rect.min.y + 18.0;
        painter.galley(
            egui::pos2(content_rect.min.x, title_y),
            title_galley.clone(),
            theme::TEXT_PRIMARY,
        );

        // Label pills below the title, clipped to the card
        let pills_y = title_y + title_galley.size().y.min(42.0) + 8.0;
        let pills_rect = egui::Rect::from_min_max(
            egui::pos2(content_rect.min.x, pills_y),
            content_rect.max,
        );
        if pills_rect.height() > 12.0 && !m.labels.is_empty() {
            let mut pills_ui = ui.new_child(
                egui::UiBuilder::new()
                    .max_rect(pills_rect)
                    .layout(egui::Layout::left_to_right(egui::Align::TOP).with_main_wrap(true)),
            );
            pills_ui.set_clip_rect(pills_rect);
            pills_ui.spacing_mut().item_spacing = egui::vec2(4.0, 4.0);
            for label in &m.labels {
                label_pill(&mut pills_ui, label);
            }
        }

        // Footer link
        let footer_rect = egui::Rect::from_min_max(
            egui::pos2(inner.min.x, inner.max.y - footer_height),
            inner.max,
        );
        ui.painter().line_segment(
            [
                egui::pos2(rect.min.x, footer_rect.min.y - 4.0),
                egui::pos2(rect.max.x, footer_rect.min.y - 4.0),
            ],
            egui::Stroke::new(theme::STROKE_DEFAULT, theme::BORDER_SUBTLE),
        );
        let mut footer_ui = ui.new_child(
            egui::UiBuilder::new()
                .max_rect(footer_rect)
                .layout(egui::Layout::left_to_right(egui::Align::Center)),
        );
        if link_label(
            &mut footer_ui,
            &format!("View issue on GitHub {}", '\u{2192}'),
        ) {
            if let Err(e) = open::that(&m.url) {
                error!(error = %e, url = %m.url, "Failed to open issue in browser");
            }
        }
    }
}

// ============================================================================
// MODALS & TOAST
// ============================================================================

impl App {
    /// Title row with a close button, shared by all modals. Returns true when
    /// the close button was clicked.
    fn modal_title(ui: &mut egui::Ui, title: &str) -> bool {
        let mut close_clicked = false;
        ui.horizontal(|ui| {
            ui.add(
                egui::Label::new(egui::RichText::new(title).size(16.0).strong()).selectable(false),
            );
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let close_size = 24.0;
                let (rect, response) =
                    ui.allocate_exact_size(egui::vec2(close_size, close_size), egui::Sense::click());
                let close_color = if response.hovered() {
                    ui.painter()
                        .rect_filled(rect, theme::RADIUS_DEFAULT, theme::BG_SURFACE);
                    ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
                    theme::STATUS_ERROR
                } else {
                    theme::TEXT_DIM
                };
                ui.painter().text(
                    rect.center(),
                    egui::Align2::CENTER_CENTER,
                    egui_phosphor::regular::X,
                    egui::FontId::proportional(16.0),
                    close_color,
                );
                if response.clicked() {
                    close_clicked = true;
                }
            });
        });
        ui.add_space(4.0);
        ui.separator();
        ui.add_space(theme::SPACING_MD);
        close_clicked
    }

    fn input_frame() -> egui::Frame {
        egui::Frame::new()
            .fill(theme::BG_INPUT)
            .stroke(egui::Stroke::new(theme::STROKE_DEFAULT, theme::BORDER_SUBTLE))
            .corner_radius(theme::RADIUS_DEFAULT)
            .inner_margin(egui::Margin::symmetric(8, 6))
    }

    fn render_login_modal(&mut self, ctx: &egui::Context) {
        if !self.show_login_modal {
            return;
        }

        let mut close = false;
        let modal_response = egui::Modal::new(egui::Id::new("login_modal"))
            .backdrop_color(egui::Color32::from_black_alpha(120))
            .frame(
                egui::Frame::new()
                    .fill(egui::Color32::from_rgb(0x1a, 0x1a, 0x1e))
                    .stroke(egui::Stroke::new(1.0, egui::Color32::from_rgb(0x2a, 0x2a, 0x2e)))
                    .corner_radius(theme::RADIUS_LARGE)
                    .inner_margin(egui::Margin::same(20)),
            )
            .show(ctx, |ui| {
                ui.set_width(360.0);
                close = Self::modal_title(ui, "Sign in with GitHub");

                ui.add(
                    egui::Label::new(
                        egui::RichText::new(
                            "Your browser has opened the GitHub sign-in page. Finish signing in \
                             there, then paste the access token it hands back below.",
                        )
                        .size(theme::FONT_LABEL)
                        .color(theme::TEXT_MUTED),
                    )
                    .wrap(),
                );
                ui.add_space(4.0);
                if link_label(ui, "Reopen the sign-in page") {
                    let url = self.api.login_url();
                    if let Err(e) = open::that(&url) {
                        error!(error = %e, "Failed to open browser");
                    }
                }

                ui.add_space(theme::SPACING_MD);

                let mut submit = false;
                Self::input_frame().show(ui, |ui| {
                    let response = ui.add(
                        egui::TextEdit::singleline(&mut self.login_token_input)
                            .frame(false)
                            .password(true)
                            .desired_width(ui.available_width())
                            .hint_text("Access token"),
                    );
                    submit = response.lost_focus()
                        && ui.input(|i| i.key_pressed(egui::Key::Enter));
                });

                let (login_pending, login_error) = {
                    let s = self.session_state.lock().unwrap();
                    (s.login_pending, s.login_error.clone())
                };

                if let Some(message) = login_error {
                    ui.add_space(4.0);
                    ui.add(
                        egui::Label::new(
                            egui::RichText::new(message)
                                .size(theme::FONT_SECTION)
                                .color(theme::STATUS_ERROR),
                        )
                        .wrap(),
                    );
                }

                ui.add_space(theme::SPACING_MD);

                let connect_text = if login_pending {
                    "Checking token...".to_string()
                } else {
                    "Connect".to_string()
                };
                let button = if login_pending {
                    egui::Button::new(
                        egui::RichText::new(connect_text).color(theme::BTN_DISABLED_TEXT),
                    )
                    .fill(theme::BTN_DISABLED)
                    .corner_radius(theme::RADIUS_DEFAULT)
                } else {
                    theme::button_accent(connect_text)
                };
                let clicked = ui
                    .add_sized([ui.available_width(), 32.0], button)
                    .clicked();
                if (clicked || submit) && !login_pending {
                    self.submit_login_token(ctx);
                }
            });

        if close || modal_response.should_close() {
            self.show_login_modal = false;
        }
    }

    fn render_profile_modal(&mut self, ctx: &egui::Context) {
        if !self.show_profile_modal {
            return;
        }

        // Seed the edit fields from the cached user once per open
        if !self.profile_seeded {
            let s = self.session_state.lock().unwrap();
            if let Some(user) = &s.user {
                self.edit_name = user.name.clone().unwrap_or_default();
                self.edit_bio = user.bio.clone().unwrap_or_default();
            }
            drop(s);
            self.profile_seeded = true;
        }

        let (username, email, avatar_url, saving, save_error) = {
            let s = self.session_state.lock().unwrap();
            let user = s.user.as_ref();
            (
                user.map(|u| u.username.clone()).unwrap_or_default(),
                user.and_then(|u| u.email.clone()),
                user.and_then(|u| u.avatar_url.clone()),
                s.saving,
                s.save_error.clone(),
            )
        };

        let mut close = false;
        let mut logout_clicked = false;
        let modal_response = egui::Modal::new(egui::Id::new("profile_modal"))
            .backdrop_color(egui::Color32::from_black_alpha(120))
            .frame(
                egui::Frame::new()
                    .fill(egui::Color32::from_rgb(0x1a, 0x1a, 0x1e))
                    .stroke(egui::Stroke::new(1.0, egui::Color32::from_rgb(0x2a, 0x2a, 0x2e)))
                    .corner_radius(theme::RADIUS_LARGE)
                    .inner_margin(egui::Margin::same(20)),
            )
            .show(ctx, |ui| {
                ui.set_width(340.0);
                close = Self::modal_title(ui, "Profile");

                // Avatar + identity, centered
                ui.with_layout(egui::Layout::top_down(egui::Align::Center), |ui| {
                    let avatar_size = 64.0;
                    let (rect, _) = ui.allocate_exact_size(
                        egui::vec2(avatar_size, avatar_size),
                        egui::Sense::hover(),
                    );
                    let texture = avatar_url
                        .as_deref()
                        .and_then(|url| self.load_avatar(ctx, url));
                    if let Some(tex) = texture {
                        let uv =
                            egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
                        let brush = egui::epaint::Brush {
                            fill_texture_id: tex.id(),
                            uv,
                        };
                        let mut shape = egui::epaint::RectShape::filled(
                            rect,
                            egui::CornerRadius::same((avatar_size / 2.0) as u8),
                            egui::Color32::WHITE,
                        );
                        shape.brush = Some(std::sync::Arc::new(brush));
                        ui.painter().add(shape);
                    } else {
                        ui.painter().text(
                            rect.center(),
                            egui::Align2::CENTER_CENTER,
                            egui_phosphor::regular::USER_CIRCLE,
                            egui::FontId::proportional(52.0),
                            theme::TEXT_MUTED,
                        );
                    }
                    ui.add_space(6.0);
                    ui.add(
                        egui::Label::new(
                            egui::RichText::new(format!("@{}", username))
                                .size(theme::FONT_HEADING)
                                .strong(),
                        )
                        .selectable(false),
                    );
                    if let Some(email) = email {
                        ui.add(
                            egui::Label::new(
                                egui::RichText::new(email)
                                    .size(theme::FONT_SECTION)
                                    .color(theme::TEXT_DIM),
                            )
                            .selectable(false),
                        );
                    }
                });

                ui.add_space(theme::SPACING_MD);

                ui.add(
                    egui::Label::new(
                        egui::RichText::new("Name")
                            .size(theme::FONT_SECTION)
                            .color(theme::TEXT_MUTED),
                    )
                    .selectable(false),
                );
                Self::input_frame().show(ui, |ui| {
                    ui.add(
                        egui::TextEdit::singleline(&mut self.edit_name)
                            .frame(false)
                            .desired_width(ui.available_width())
                            .hint_text("Your full name"),
                    );
                });

                ui.add_space(theme::SPACING_SM);

                ui.add(
                    egui::Label::new(
                        egui::RichText::new("Bio")
                            .size(theme::FONT_SECTION)
                            .color(theme::TEXT_MUTED),
                    )
                    .selectable(false),
                );
                Self::input_frame().show(ui, |ui| {
                    ui.add(
                        egui::TextEdit::multiline(&mut self.edit_bio)
                            .frame(false)
                            .desired_rows(4)
                            .desired_width(ui.available_width())
                            .hint_text("Tell us about yourself..."),
                    );
                });

                if let Some(message) = save_error {
                    ui.add_space(4.0);
                    ui.add(
                        egui::Label::new(
                            egui::RichText::new(message)
                                .size(theme::FONT_SECTION)
                                .color(theme::STATUS_ERROR),
                        )
                        .wrap(),
                    );
                }

                ui.add_space(theme::SPACING_MD);

                ui.horizontal(|ui| {
                    let half = (ui.available_width() - 8.0) / 2.0;
                    let save_text = if saving { "Saving..." } else { "Save Changes" };
                    let save_button = if saving {
                        egui::Button::new(
                            egui::RichText::new(save_text).color(theme::BTN_DISABLED_TEXT),
                        )
                        .fill(theme::BTN_DISABLED)
                        .corner_radius(theme::RADIUS_DEFAULT)
                    } else {
                        theme::button_accent(save_text)
                    };
                    if ui.add_sized([half, 32.0], save_button).clicked() && !saving {
                        self.save_profile(ctx);
                    }
                    if ui
                        .add_sized([half, 32.0], theme::button_danger("Logout"))
                        .clicked()
                    {
                        logout_clicked = true;
                    }
                });
            });

        if logout_clicked {
            self.logout(ctx);
        } else if close || modal_response.should_close() {
            self.show_profile_modal = false;
            self.profile_seeded = false;
        }
    }

    fn render_settings_modal(&mut self, ctx: &egui::Context) {
        if !self.show_settings {
            return;
        }

        let mut close = false;
        let modal_response = egui::Modal::new(egui::Id::new("settings_modal"))
            .backdrop_color(egui::Color32::from_black_alpha(120))
            .frame(
                egui::Frame::new()
                    .fill(egui::Color32::from_rgb(0x1a, 0x1a, 0x1e))
                    .stroke(egui::Stroke::new(1.0, egui::Color32::from_rgb(0x2a, 0x2a, 0x2e)))
                    .corner_radius(theme::RADIUS_LARGE)
                    .inner_margin(egui::Margin::same(20)),
            )
            .show(ctx, |ui| {
                ui.set_width(320.0);
                close = Self::modal_title(ui, "Settings");

                // — Matching service —
                ui.add(
                    egui::Label::new(
                        egui::RichText::new("Matching service")
                            .size(theme::FONT_LABEL)
                            .color(theme::ACCENT_LIGHT),
                    )
                    .selectable(false),
                );
                ui.add_space(2.0);
                let mut apply_url = false;
                Self::input_frame().show(ui, |ui| {
                    let response = ui.add(
                        egui::TextEdit::singleline(&mut self.api_url_str)
                            .frame(false)
                            .desired_width(ui.available_width())
                            .font(egui::FontId::proportional(theme::FONT_LABEL))
                            .hint_text(DEFAULT_API_BASE_URL),
                    );
                    apply_url = response.lost_focus();
                });
                if apply_url {
                    self.apply_api_url();
                }

                ui.add_space(theme::SPACING_MD);
                ui.separator();
                ui.add_space(theme::SPACING_SM);

                // — Data —
                ui.add(
                    egui::Label::new(
                        egui::RichText::new("Data")
                            .size(theme::FONT_LABEL)
                            .color(theme::ACCENT_LIGHT),
                    )
                    .selectable(false),
                );
                ui.add_space(2.0);
                ui.horizontal(|ui| {
                    if ui
                        .add(theme::button(format!(
                            "{}  Open Logs",
                            egui_phosphor::regular::FOLDER_OPEN
                        )))
                        .clicked()
                    {
                        let logs_dir = self.data_dir.join("logs");
                        std::fs::create_dir_all(&logs_dir).ok();
                        let _ = open::that(&logs_dir);
                    }
                    if ui
                        .add(theme::button_danger(format!(
                            "{}  Clear History",
                            egui_phosphor::regular::TRASH
                        )))
                        .clicked()
                    {
                        if let Err(e) = self.history.clear() {
                            error!(error = %e, "Failed to clear history");
                        }
                        self.refresh_recent_searches();
                        self.show_toast("Search history cleared");
                    }
                });
            });

        if close || modal_response.should_close() {
            self.show_settings = false;
        }
    }

    // Toast notification (bottom-right of central panel, 3s visible then fade)
    fn render_toast(&mut self, ctx: &egui::Context) {
        let (Some(message), Some(panel_rect)) =
            (self.toast_message.clone(), self.central_panel_rect)
        else {
            return;
        };

        let elapsed = self
            .toast_start
            .map(|t| t.elapsed().as_secs_f32())
            .unwrap_or(0.0);
        if elapsed > 3.5 {
            self.toast_message = None;
            self.toast_start = None;
            return;
        }
        let alpha = if elapsed < 3.0 {
            1.0
        } else {
            1.0 - (elapsed - 3.0) / 0.5
        };

        let margin = 16.0;
        let toast_pos = egui::pos2(panel_rect.right() - margin, panel_rect.bottom() - margin);
        egui::Area::new(egui::Id::new("toast"))
            .fixed_pos(toast_pos)
            .pivot(egui::Align2::RIGHT_BOTTOM)
            .show(ctx, |ui| {
                egui::Frame::new()
                    .fill(theme::BG_SURFACE.gamma_multiply(alpha))
                    .stroke(egui::Stroke::new(
                        theme::STROKE_DEFAULT,
                        theme::BORDER_DEFAULT.gamma_multiply(alpha),
                    ))
                    .corner_radius(theme::RADIUS_MEDIUM)
                    .inner_margin(egui::Margin::symmetric(12, 8))
                    .show(ui, |ui| {
                        ui.add(
                            egui::Label::new(
                                egui::RichText::new(message)
                                    .size(theme::FONT_LABEL)
                                    .color(theme::TEXT_PRIMARY.gamma_multiply(alpha)),
                            )
                            .selectable(false),
                        );
                    });
            });
        ctx.request_repaint();
    }
}
