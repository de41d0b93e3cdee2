//! Dashboard: game selection, theme, and this session's best scores.

use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};

use super::{palette, widgets};
use crate::debug::DebugMode;
use crate::persistence::{Preferences, ThemeChoice};
use crate::scoreboard::SessionScores;
use crate::screen::{GameMode, Screen};

const TITLE: &str = "Choose Your Game Mode";
const SCORE_BOX_WIDTH: f32 = 110.0;

pub fn dashboard_system(
    mut contexts: EguiContexts,
    mut next_screen: ResMut<NextState<Screen>>,
    mut preferences: ResMut<Preferences>,
    mut debug: ResMut<DebugMode>,
    session: Res<SessionScores>,
    time: Res<Time>,
) {
    let Ok(ctx) = contexts.ctx_mut() else { return };

    let mut theme = preferences.theme;
    let mut title_clicked = false;
    egui::TopBottomPanel::top("dashboard_header").show(ctx, |ui| {
        ui.horizontal(|ui| {
            let title = egui::Label::new(egui::RichText::new(TITLE).heading().strong()).sense(egui::Sense::click());
            title_clicked = ui.add(title).clicked();

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if debug.is_enabled() && ui.button("⚙ Debug").clicked() {
                    next_screen.set(Screen::Debug);
                }
                egui::ComboBox::from_id_salt("theme")
                    .selected_text(theme.label())
                    .show_ui(ui, |ui| {
                        for choice in ThemeChoice::ALL {
                            ui.selectable_value(&mut theme, choice, choice.label());
                        }
                    });
                ui.label("Theme:");
            });
        });
    });

    if title_clicked && debug.register_click(time.elapsed()) {
        next_screen.set(Screen::Debug);
    }
    // Only touch the resource on a real change so saving stays change-driven.
    if theme != preferences.theme {
        preferences.theme = theme;
    }

    egui::CentralPanel::default().show(ctx, |ui| {
        egui::ScrollArea::vertical().show(ui, |ui| {
            let titles = GameMode::ALL.iter().map(|mode| (mode.title(), false));
            if let Some(i) = widgets::button_grid(ui, titles) {
                if let Some(&mode) = GameMode::ALL.get(i) {
                    next_screen.set(Screen::Game(mode));
                }
            }

            ui.add_space(16.0);
            if ui.button(egui::RichText::new("My Best Scores").size(16.0)).clicked() {
                next_screen.set(Screen::Scoreboard);
            }

            ui.add_space(16.0);
            ui.horizontal_wrapped(|ui| {
                for mode in GameMode::ALL {
                    let Some(best) = session.best(mode).filter(|b| b.score > 0) else { continue };
                    widgets::tile_frame(ui, palette::score_color(best.score, best.total), |ui| {
                        ui.set_width(SCORE_BOX_WIDTH);
                        ui.vertical_centered(|ui| {
                            ui.label(egui::RichText::new(mode.short_name()).color(egui::Color32::BLACK));
                            ui.label(
                                egui::RichText::new(format!("{}/{}", best.score, best.total))
                                    .color(egui::Color32::BLACK)
                                    .size(18.0)
                                    .strong(),
                            );
                        });
                    });
                }
            });
        });
    });
}
