//! Reusable UI components
//!
//! This module contains standalone UI components that can be used
//! throughout the application.

use crate::theme;
use eframe::egui;

/// Format a 0-1 similarity score as a percentage with one decimal.
pub fn format_score(score: f64) -> String {
    format!("{:.1}%", score * 100.0)
}

/// Green above the 50% mark, yellow at or below it.
pub fn score_color(score: f64) -> egui::Color32 {
    if score > 0.5 {
        theme::SCORE_HIGH
    } else {
        theme::SCORE_LOW
    }
}

/// Small rounded label pill, as on the issue cards. Returns the pill width.
pub fn label_pill(ui: &mut egui::Ui, text: &str) -> f32 {
    let font = egui::FontId::proportional(theme::FONT_CAPTION);
    let galley = ui.fonts(|f| f.layout_no_wrap(text.to_string(), font.clone(), theme::PILL_TEXT));
    let size = egui::vec2(galley.size().x + 12.0, galley.size().y + 5.0);
    let (rect, _) = ui.allocate_exact_size(size, egui::Sense::hover());

    if ui.is_rect_visible(rect) {
        let painter = ui.painter();
        painter.rect_filled(rect, rect.height() / 2.0, theme::PILL_BG);
        painter.galley(
            egui::pos2(rect.min.x + 6.0, rect.center().y - galley.size().y / 2.0),
            galley,
            theme::PILL_TEXT,
        );
    }
    size.x
}

/// Link-styled label painted in the accent color. Returns true when clicked.
pub fn link_label(ui: &mut egui::Ui, text: &str) -> bool {
    let font = egui::FontId::proportional(theme::FONT_LABEL);
    let galley = ui.fonts(|f| f.layout_no_wrap(text.to_string(), font.clone(), theme::ACCENT_LIGHT));
    let (rect, response) = ui.allocate_exact_size(galley.size(), egui::Sense::click());

    if ui.is_rect_visible(rect) {
        let color = if response.hovered() {
            theme::lighten(theme::ACCENT_LIGHT, 0.25)
        } else {
            theme::ACCENT_LIGHT
        };
        ui.painter().galley(rect.min, galley, color);
        if response.hovered() {
            ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
            ui.painter().line_segment(
                [
                    egui::pos2(rect.min.x, rect.max.y),
                    egui::pos2(rect.max.x, rect.max.y),
                ],
                egui::Stroke::new(1.0, color),
            );
        }
    }
    response.clicked()
}

/// Single error banner for every failure in the app.
pub fn error_banner(ui: &mut egui::Ui, message: &str) {
    theme::error_frame().show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.horizontal_top(|ui| {
            ui.add(
                egui::Label::new(
                    egui::RichText::new(egui_phosphor::regular::WARNING_CIRCLE)
                        .size(18.0)
                        .color(theme::STATUS_ERROR),
                )
                .selectable(false),
            );
            ui.vertical(|ui| {
                ui.add(
                    egui::Label::new(
                        egui::RichText::new("Error")
                            .size(theme::FONT_BODY)
                            .strong()
                            .color(theme::STATUS_ERROR),
                    )
                    .selectable(false),
                );
                // Validation details arrive as multi-line JSON; keep it monospace.
                let body = if message.contains('\n') {
                    egui::RichText::new(message)
                        .monospace()
                        .size(theme::FONT_SECTION)
                        .color(egui::Color32::from_rgb(0xfe, 0xe2, 0xe2))
                } else {
                    egui::RichText::new(message)
                        .size(theme::FONT_LABEL)
                        .color(egui::Color32::from_rgb(0xfe, 0xe2, 0xe2))
                };
                ui.add(egui::Label::new(body).wrap());
            });
        });
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_formats_one_decimal() {
        assert_eq!(format_score(0.914), "91.4%");
        assert_eq!(format_score(0.5), "50.0%");
        assert_eq!(format_score(0.0), "0.0%");
    }

    #[test]
    fn fifty_percent_is_not_green() {
        assert_eq!(score_color(0.51), theme::SCORE_HIGH);
        assert_eq!(score_color(0.5), theme::SCORE_LOW);
        assert_eq!(score_color(0.1), theme::SCORE_LOW);
    }
}
