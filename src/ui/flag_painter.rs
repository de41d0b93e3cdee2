//! Paints flags from their `FlagPattern` with the egui painter.

use bevy_egui::egui;

use crate::data::{FlagLayout, FlagPattern};

const OUTLINE: egui::Color32 = egui::Color32::from_rgb(60, 60, 60);
const MISSING: egui::Color32 = egui::Color32::from_rgb(150, 150, 150);

pub fn color_of(hex: &str) -> egui::Color32 {
    egui::Color32::from_hex(hex).unwrap_or(MISSING)
}

/// Allocates `size` and paints the flag into it.
pub fn flag(ui: &mut egui::Ui, pattern: Option<&FlagPattern>, size: egui::Vec2) -> egui::Response {
    let (rect, response) = ui.allocate_exact_size(size, egui::Sense::hover());
    if ui.is_rect_visible(rect) {
        paint_flag(ui.painter(), rect, pattern);
    }
    response
}

pub fn paint_flag(painter: &egui::Painter, rect: egui::Rect, pattern: Option<&FlagPattern>) {
    let colors: Vec<egui::Color32> = pattern
        .map(|p| p.colors.iter().map(|c| color_of(c)).collect())
        .unwrap_or_default();

    match (pattern.map(|p| p.layout), colors.as_slice()) {
        (None, _) | (_, []) => {
            painter.rect_filled(rect, egui::CornerRadius::ZERO, MISSING);
            painter.text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                "?",
                egui::FontId::proportional(rect.height() * 0.5),
                egui::Color32::WHITE,
            );
        }
        (Some(FlagLayout::Horizontal), stripes) => {
            let height = rect.height() / stripes.len() as f32;
            for (i, &color) in stripes.iter().enumerate() {
                let min = egui::pos2(rect.left(), rect.top() + height * i as f32);
                painter.rect_filled(egui::Rect::from_min_size(min, egui::vec2(rect.width(), height)), egui::CornerRadius::ZERO, color);
            }
        }
        (Some(FlagLayout::Vertical), stripes) => {
            let width = rect.width() / stripes.len() as f32;
            for (i, &color) in stripes.iter().enumerate() {
                let min = egui::pos2(rect.left() + width * i as f32, rect.top());
                painter.rect_filled(egui::Rect::from_min_size(min, egui::vec2(width, rect.height())), egui::CornerRadius::ZERO, color);
            }
        }
        (Some(FlagLayout::Disc), [field, rest @ ..]) => {
            painter.rect_filled(rect, egui::CornerRadius::ZERO, *field);
            let disc = rest.first().copied().unwrap_or(*field);
            painter.circle_filled(rect.center(), rect.height() * 0.3, disc);
        }
        (Some(FlagLayout::Cross), [field, rest @ ..]) => {
            painter.rect_filled(rect, egui::CornerRadius::ZERO, *field);
            // Nordic cross: the vertical bar sits left of centre.
            let center_x = rect.left() + rect.width() * 0.36;
            for (thickness, &color) in [0.25, 0.125].iter().zip(rest) {
                let t = rect.height() * thickness;
                painter.rect_filled(
                    egui::Rect::from_center_size(egui::pos2(rect.center().x, rect.center().y), egui::vec2(rect.width(), t)),
                    egui::CornerRadius::ZERO,
                    color,
                );
                painter.rect_filled(
                    egui::Rect::from_center_size(egui::pos2(center_x, rect.center().y), egui::vec2(t, rect.height())),
                    egui::CornerRadius::ZERO,
                    color,
                );
            }
        }
    }
    painter.rect_stroke(rect, egui::CornerRadius::ZERO, egui::Stroke::new(1.0, OUTLINE), egui::StrokeKind::Inside);
}
