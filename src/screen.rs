//! Top-level navigation state.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(States, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Screen {
    #[default]
    Dashboard,
    Scoreboard,
    Debug,
    Game(GameMode),
}

/// Declaration order is the display order on the dashboard and scoreboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    Flag,
    Shape,
    Hangman,
    Facts,
    List,
    HigherLower,
    Guessing,
}

impl GameMode {
    pub const ALL: [GameMode; 7] = [
        GameMode::Flag,
        GameMode::Shape,
        GameMode::Hangman,
        GameMode::Facts,
        GameMode::List,
        GameMode::HigherLower,
        GameMode::Guessing,
    ];

    /// Stable identifier used in the score file.
    pub fn key(self) -> &'static str {
        match self {
            GameMode::Flag => "flag",
            GameMode::Shape => "shape",
            GameMode::Hangman => "hangman",
            GameMode::Facts => "facts",
            GameMode::List => "list",
            GameMode::HigherLower => "higher_lower",
            GameMode::Guessing => "guessing",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            GameMode::Flag => "Guess by Flag",
            GameMode::Shape => "Guess by Shape",
            GameMode::Hangman => "Hangman",
            GameMode::Facts => "Guess by Facts",
            GameMode::List => "List All Countries",
            GameMode::HigherLower => "Higher or Lower",
            GameMode::Guessing => "What Country is This",
        }
    }

    /// Short label for the dashboard score boxes.
    pub fn short_name(self) -> &'static str {
        match self {
            GameMode::Flag => "Flag",
            GameMode::Shape => "Shape",
            GameMode::Hangman => "Hangman",
            GameMode::Facts => "Facts",
            GameMode::List => "List",
            GameMode::HigherLower => "Higher/Lower",
            GameMode::Guessing => "Guessing",
        }
    }
}
