//! The seven minigames.
//!
//! Every game keeps its state in a resource that exists only while its screen is
//! active: inserted on `OnEnter`, removed on `OnExit`. The rules live in plain
//! methods on that resource so they can be tested without an `App`; the egui
//! systems only translate clicks into those calls and render the result.

pub mod facts;
pub mod flag;
pub mod guessing;
pub mod hangman;
pub mod higher_lower;
pub mod list;
pub mod shape;

use std::time::Duration;

use bevy::prelude::*;

use crate::scoreboard::GameFinished;
use crate::screen::GameMode;

pub struct GamesPlugin;
impl Plugin for GamesPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((
            flag::FlagPlugin,
            shape::ShapePlugin,
            hangman::HangmanPlugin,
            facts::FactsPlugin,
            list::ListPlugin,
            higher_lower::HigherLowerPlugin,
            guessing::GuessingPlugin,
        ));
    }
}

pub const ERROR_LOADING: &str = "Error loading countries data";

/// Final result of a game session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Outcome {
    pub score: u32,
    pub total: u32,
}

impl Outcome {
    pub fn new(score: u32, total: u32) -> Self {
        Self { score, total }
    }

    pub fn percent(self) -> f64 {
        crate::scoreboard::percent(self.score, self.total)
    }

    pub fn into_event(self, mode: GameMode, elapsed: Duration) -> GameFinished {
        GameFinished::new(mode, self.score, self.total, elapsed)
    }
}
