//! Global keyboard shortcuts.
//!
//! Escape leaves any screen for the dashboard unless a text field has focus.

use bevy::prelude::*;
use bevy_egui::EguiContexts;

use crate::screen::Screen;

pub struct InputPlugin;
impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app
            .add_systems(Update, handle_input)
            ;
    }
}

fn handle_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    screen: Res<State<Screen>>,
    mut next_screen: ResMut<NextState<Screen>>,
    mut contexts: EguiContexts,
) {
    if contexts.ctx_mut().is_ok_and(|ctx| ctx.wants_keyboard_input()) {
        return;
    }

    if keyboard.just_pressed(KeyCode::Escape) && *screen.get() != Screen::Dashboard {
        next_screen.set(Screen::Dashboard);
    }
}
