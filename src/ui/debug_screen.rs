//! Debug screen: read-only data inspector and debug-mode controls.

use bevy::log::{info, warn};
use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};

use super::widgets::{self, TopBarAction};
use crate::data::{Country, WorldData};
use crate::debug::{DEBUG_FILE, DebugMode};
use crate::scoreboard::Scoreboard;
use crate::screen::Screen;

const MISSING_LIST_HEIGHT: f32 = 160.0;

fn missing_list(ui: &mut egui::Ui, id: &str, heading: &str, countries: &[&Country]) {
    egui::CollapsingHeader::new(format!("{} ({})", heading, countries.len()))
        .id_salt(id)
        .show(ui, |ui| {
            egui::ScrollArea::vertical().id_salt(id).max_height(MISSING_LIST_HEIGHT).show(ui, |ui| {
                for country in countries {
                    ui.label(format!("{} ({})", country.name.common, country.cca2));
                }
            });
        });
}

pub fn debug_system(
    mut contexts: EguiContexts,
    mut next_screen: ResMut<NextState<Screen>>,
    mut debug: ResMut<DebugMode>,
    mut scoreboard: ResMut<Scoreboard>,
    data: Res<WorldData>,
) {
    let Ok(ctx) = contexts.ctx_mut() else { return };

    if let Some(TopBarAction::Back) = widgets::top_bar(ctx, "Debug", None) {
        next_screen.set(Screen::Dashboard);
    }

    let mut clear_scores = false;
    let mut persist = false;
    let mut disable = false;
    egui::CentralPanel::default().show(ctx, |ui| {
        egui::ScrollArea::vertical().auto_shrink([false; 2]).show(ui, |ui| {
            ui.heading("Data");
            egui::Grid::new("data_stats").num_columns(2).show(ui, |ui| {
                ui.label("Countries");
                ui.label(data.countries().len().to_string());
                ui.end_row();
                ui.label("Fact sets");
                ui.label(data.fact_count().to_string());
                ui.end_row();
                ui.label("Shapes");
                ui.label(data.shapes().len().to_string());
                ui.end_row();
                ui.label("Regions");
                ui.label(data.regions().join(", "));
                ui.end_row();
                ui.label("Score entries");
                ui.label(scoreboard.entries().len().to_string());
                ui.end_row();
            });
            missing_list(ui, "no_facts", "Countries without facts", &data.countries_without_facts());
            missing_list(ui, "no_shapes", "Countries without shapes", &data.countries_without_shapes());

            ui.separator();
            ui.heading("Debug mode");
            let source = debug.source().map_or("disabled", |s| s.describe());
            ui.label(format!("Enabled by: {}", source));
            ui.label(format!("{} present: {}", DEBUG_FILE, debug.marker_exists()));

            ui.add_space(8.0);
            ui.horizontal(|ui| {
                clear_scores = ui.button("Clear scoreboard").clicked();
                persist = ui.button("Persist debug mode").clicked();
                disable = ui.button("Disable debug mode").clicked();
            });
        });
    });

    if clear_scores {
        scoreboard.clear();
        scoreboard.save();
        info!("Scoreboard cleared");
    }
    if persist {
        match debug.persist() {
            Ok(()) => info!("Debug mode persisted"),
            Err(e) => warn!("Failed to persist debug mode: {}", e),
        }
    }
    if disable {
        debug.disable();
        next_screen.set(Screen::Dashboard);
    }
}
