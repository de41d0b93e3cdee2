//! Non-game screens and the egui building blocks shared with the games.
//!
//! Each screen is a single egui system gated on its `Screen` state. Screens
//! switch by setting `NextState<Screen>` rather than touching other screens.

mod dashboard;
mod debug_screen;
pub mod flag_painter;
pub mod palette;
mod scoreboard_screen;
pub mod widgets;

use bevy::prelude::*;
use bevy_egui::EguiPrimaryContextPass;

use crate::screen::Screen;

pub struct UiPlugin;
impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app
            .add_systems(EguiPrimaryContextPass, (
                dashboard::dashboard_system.run_if(in_state(Screen::Dashboard)),
                scoreboard_screen::scoreboard_system.run_if(in_state(Screen::Scoreboard)),
                debug_screen::debug_system.run_if(in_state(Screen::Debug)),
            ))
            ;
    }
}
