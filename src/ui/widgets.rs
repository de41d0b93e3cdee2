//! Widgets shared by the dashboard and the game screens.

use bevy_egui::egui;

/// Below this width grids collapse to a single column.
const NARROW_WIDTH: f32 = 600.0;
const GRID_BUTTON_HEIGHT: f32 = 44.0;
const TILE_ROUNDING: u8 = 6;
const TILE_INNER_MARGIN: i8 = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TopBarAction {
    Back,
    Reset,
}

/// Title bar with a "Dashboard" button on the left and an optional reset
/// button on the right.
pub fn top_bar(ctx: &egui::Context, title: &str, reset_label: Option<&str>) -> Option<TopBarAction> {
    let mut action = None;
    egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
        ui.horizontal(|ui| {
            if ui.button("← Dashboard").clicked() {
                action = Some(TopBarAction::Back);
            }
            ui.separator();
            ui.strong(title);
            if let Some(label) = reset_label {
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button(label).clicked() {
                        action = Some(TopBarAction::Reset);
                    }
                });
            }
        });
    });
    action
}

pub fn grid_columns(width: f32) -> usize {
    if width < NARROW_WIDTH { 1 } else { 2 }
}

/// Lays `items` out as equally sized buttons, one or two per row depending
/// on the available width. Returns the index of the clicked item.
pub fn button_grid<'a>(
    ui: &mut egui::Ui,
    items: impl IntoIterator<Item = (&'a str, bool)>,
) -> Option<usize> {
    let items: Vec<(&str, bool)> = items.into_iter().collect();
    let columns = grid_columns(ui.available_width());
    let spacing = ui.spacing().item_spacing.x;
    let width = (ui.available_width() - spacing * (columns - 1) as f32) / columns as f32;

    let mut clicked = None;
    for (row, chunk) in items.chunks(columns).enumerate() {
        ui.horizontal(|ui| {
            for (col, &(label, selected)) in chunk.iter().enumerate() {
                let button = egui::Button::new(egui::RichText::new(label).size(16.0)).selected(selected);
                if ui.add_sized([width, GRID_BUTTON_HEIGHT], button).clicked() {
                    clicked = Some(row * columns + col);
                }
            }
        });
    }
    clicked
}

/// Grid of region buttons. `remembered` is highlighted.
pub fn region_selector(
    ui: &mut egui::Ui,
    description: &str,
    regions: &[String],
    remembered: Option<&str>,
) -> Option<String> {
    ui.heading("Select Region");
    ui.label(description);
    ui.add_space(8.0);
    let items = regions.iter().map(|r| (r.as_str(), remembered == Some(r.as_str())));
    button_grid(ui, items).and_then(|i| regions.get(i).cloned())
}

/// Single-line text field with a "Guess" button. Returns the trimmed text when
/// submitted with Enter or the button; the field is cleared on submit.
pub fn guess_input(ui: &mut egui::Ui, text: &mut String, enabled: bool) -> Option<String> {
    let mut submitted = None;
    ui.horizontal(|ui| {
        let field = ui.add_enabled(
            enabled,
            egui::TextEdit::singleline(text)
                .hint_text("Enter country name...")
                .desired_width(300.0),
        );
        let entered = field.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
        let clicked = ui.add_enabled(enabled, egui::Button::new("Guess")).clicked();
        if (entered || clicked) && !text.trim().is_empty() {
            submitted = Some(text.trim().to_string());
            text.clear();
            field.request_focus();
        }
    });
    submitted
}

/// Rounded, filled frame used for dashboard tiles and score boxes.
pub fn tile_frame<R>(ui: &mut egui::Ui, fill: egui::Color32, content: impl FnOnce(&mut egui::Ui) -> R) -> R {
    egui::Frame::NONE
        .fill(fill)
        .corner_radius(egui::CornerRadius::same(TILE_ROUNDING))
        .inner_margin(egui::Margin::same(TILE_INNER_MARGIN))
        .show(ui, content)
        .inner
}

pub fn status_label(ui: &mut egui::Ui, text: &str) {
    if !text.is_empty() {
        ui.label(egui::RichText::new(text).size(18.0).strong());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn narrow_layouts_use_one_column() {
        assert_eq!(grid_columns(420.0), 1);
        assert_eq!(grid_columns(600.0), 2);
        assert_eq!(grid_columns(1024.0), 2);
    }
}
