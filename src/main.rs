//! Flagged It - country guessing games.
//!
//! Built with Bevy 0.18 and bevy_egui. Seven minigames share one embedded data
//! set, a persistent scoreboard and a dashboard for picking the game.

use bevy::prelude::*;
use bevy_egui::EguiPlugin;

mod data;
mod debug;
mod games;
mod geometry;
mod input;
mod matcher;
mod persistence;
mod random;
mod raster;
mod scoreboard;
mod screen;
mod ui;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins
            .set(WindowPlugin {
                primary_window: Some(Window {
                    title: "Flagged It - Country Guessing Games".into(),
                    resolution: (1024, 768).into(),
                    ..default()
                }),
                ..default()
            })
            // Disable asset meta files as WASM version requests them and fails when they are not found.
            .set(AssetPlugin {
                meta_check: bevy::asset::AssetMetaCheck::Never,
                ..default()
            })
        )
        .add_plugins(EguiPlugin::default())
        .init_state::<screen::Screen>()
        .init_resource::<random::GameRng>()
        .add_plugins((
            data::DataPlugin,
            persistence::PreferencesPlugin,
            scoreboard::ScoreboardPlugin,
            debug::DebugPlugin,
            input::InputPlugin,
            games::GamesPlugin,
            ui::UiPlugin,
        ))
        .add_systems(Startup, setup)
        .run();
}

fn setup(mut commands: Commands) {
    commands.spawn(Camera2d);
}
