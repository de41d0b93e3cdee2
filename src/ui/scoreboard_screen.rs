//! "My Best Scores": the top entries of every game mode.

use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};

use super::widgets::{self, TopBarAction};
use crate::scoreboard::{ScoreEntry, Scoreboard};
use crate::screen::{GameMode, Screen};

const TOP_SCORES: usize = 10;
const EMPTY_MESSAGE: &str = "No scores yet! Play some games to see your progress here.";
const COLUMNS: [&str; 6] = ["#", "Score", "Percent", "Duration", "Region", "Date"];

/// `m:ss` for durations under an hour, `h:mm:ss` otherwise.
pub fn format_duration(seconds: u64) -> String {
    let (h, m, s) = (seconds / 3600, seconds / 60 % 60, seconds % 60);
    if h > 0 {
        format!("{}:{:02}:{:02}", h, m, s)
    } else {
        format!("{}:{:02}", m, s)
    }
}

fn entry_cells(rank: usize, entry: &ScoreEntry) -> [String; 6] {
    [
        format!("{}", rank),
        format!("{}/{}", entry.score, entry.total),
        format!("{:.1}%", entry.percent),
        format_duration(entry.duration),
        entry.region.clone().unwrap_or_else(|| "-".to_string()),
        entry.date.format("%b %-d, %H:%M").to_string(),
    ]
}

pub fn scoreboard_system(
    mut contexts: EguiContexts,
    mut next_screen: ResMut<NextState<Screen>>,
    scoreboard: Res<Scoreboard>,
) {
    let Ok(ctx) = contexts.ctx_mut() else { return };

    if let Some(TopBarAction::Back) = widgets::top_bar(ctx, "My Best Scores", None) {
        next_screen.set(Screen::Dashboard);
    }

    egui::CentralPanel::default().show(ctx, |ui| {
        if scoreboard.entries().is_empty() {
            ui.vertical_centered(|ui| {
                ui.add_space(40.0);
                ui.label(egui::RichText::new(EMPTY_MESSAGE).size(16.0).italics());
            });
            return;
        }

        egui::ScrollArea::vertical().auto_shrink([false; 2]).show(ui, |ui| {
            for mode in GameMode::ALL {
                let Some(best) = scoreboard.personal_best(mode) else { continue };
                ui.horizontal(|ui| {
                    ui.heading(mode.title());
                    ui.label(format!("Best: {}/{} ({:.1}%)", best.score, best.total, best.percent));
                });
                let top = scoreboard.top_scores(mode, TOP_SCORES);
                egui::Grid::new(("scores", mode.key())).num_columns(COLUMNS.len()).striped(true).show(ui, |ui| {
                    for heading in COLUMNS {
                        ui.strong(heading);
                    }
                    ui.end_row();
                    for (i, entry) in top.iter().enumerate() {
                        for cell in entry_cells(i + 1, entry) {
                            ui.label(cell);
                        }
                        ui.end_row();
                    }
                });
                ui.add_space(12.0);
            }
        });
    });
}
