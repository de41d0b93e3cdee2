//! Hangman on country names.

use std::collections::BTreeSet;
use std::time::Duration;

use bevy::prelude::*;
use bevy_egui::{EguiContexts, EguiPrimaryContextPass, egui};
use rand::Rng;
use rand::seq::IndexedRandom;

use super::{ERROR_LOADING, Outcome};
use crate::data::WorldData;
use crate::random::GameRng;
use crate::screen::{GameMode, Screen};
use crate::ui::widgets::{self, TopBarAction};

pub struct HangmanPlugin;
impl Plugin for HangmanPlugin {
    fn build(&self, app: &mut App) {
        let screen = Screen::Game(GameMode::Hangman);
        app.add_systems(OnEnter(screen), HangmanGame::insert)
            .add_systems(OnExit(screen), HangmanGame::remove)
            .add_systems(Update, HangmanGame::handle_keys.run_if(in_state(screen)))
            .add_systems(EguiPrimaryContextPass, HangmanGame::update.run_if(in_state(screen)))
            ;
    }
}

pub const MAX_WRONG: u32 = 6;
const KEYBOARD_ROWS: [&str; 3] = ["QWERTYUIOP", "ASDFGHJKL", "ZXCVBNM"];
const PROMPT: &str = "Guess the country name!";
const HIDDEN: char = '_';

#[derive(Resource)]
pub struct HangmanGame {
    names: Vec<String>,
    word: Vec<char>,
    revealed: Vec<char>,
    guessed: BTreeSet<char>,
    wrong: u32,
    status: String,
    outcome: Option<Outcome>,
    started: Duration,
}

/// Only plain A-Z letters are hidden; spaces, punctuation and accented
/// letters are shown from the start.
fn is_guessable(c: char) -> bool {
    c.is_ascii_uppercase()
}

impl HangmanGame {
    pub fn new(data: &WorldData, rng: &mut impl Rng, started: Duration) -> Self {
        let mut game = Self {
            names: data.countries().iter().map(|c| c.name.common.clone()).collect(),
            word: Vec::new(),
            revealed: Vec::new(),
            guessed: BTreeSet::new(),
            wrong: 0,
            status: String::new(),
            outcome: None,
            started,
        };
        game.new_word(rng, started);
        game
    }

    pub fn new_word(&mut self, rng: &mut impl Rng, started: Duration) {
        self.guessed.clear();
        self.wrong = 0;
        self.outcome = None;
        self.started = started;
        let Some(name) = self.names.choose(rng) else {
            self.word.clear();
            self.revealed.clear();
            self.status = ERROR_LOADING.to_string();
            return;
        };
        self.word = name.to_uppercase().chars().collect();
        self.revealed = self.word.iter()
            .map(|&c| if is_guessable(c) { HIDDEN } else { c })
            .collect();
        self.status = PROMPT.to_string();
    }

    pub fn word(&self) -> String {
        self.word.iter().collect()
    }

    /// Masked word with letters spaced out.
    pub fn display(&self) -> String {
        self.revealed.iter().map(char::to_string).collect::<Vec<_>>().join(" ")
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn wrong_guesses(&self) -> u32 {
        self.wrong
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn is_guessed(&self, letter: char) -> bool {
        self.guessed.contains(&letter.to_ascii_uppercase())
    }

    /// Returns the outcome when this guess ends the game.
    pub fn guess(&mut self, letter: char) -> Option<Outcome> {
        let letter = letter.to_ascii_uppercase();
        if self.is_over() || self.word.is_empty() || !is_guessable(letter) {
            return None;
        }
        if !self.guessed.insert(letter) {
            self.status = "Already guessed that letter!".to_string();
            return None;
        }

        let mut found = false;
        for (slot, &c) in self.revealed.iter_mut().zip(&self.word) {
            if c == letter {
                *slot = c;
                found = true;
            }
        }
        if !found {
            self.wrong += 1;
        }

        let outcome = if self.wrong >= MAX_WRONG {
            self.status = format!("Game over! The word was: {}", self.word());
            Outcome::new(0, 1)
        } else if !self.revealed.contains(&HIDDEN) {
            self.status = "Congratulations! You won!".to_string();
            Outcome::new(1, 1)
        } else {
            self.status = PROMPT.to_string();
            return None;
        };
        self.outcome = Some(outcome);
        Some(outcome)
    }

    fn finish(&self, commands: &mut Commands, outcome: Outcome, now: Duration) {
        commands.trigger(outcome.into_event(GameMode::Hangman, now.saturating_sub(self.started)));
    }

    // ========================================================================
    // Systems
    // ========================================================================

    fn insert(mut commands: Commands, data: Res<WorldData>, mut rng: ResMut<GameRng>, time: Res<Time>) {
        commands.insert_resource(HangmanGame::new(&data, &mut rng.0, time.elapsed()));
    }

    fn remove(mut commands: Commands) {
        commands.remove_resource::<HangmanGame>();
    }

    /// Physical keyboard letters.
    fn handle_keys(
        mut commands: Commands,
        keyboard: Res<ButtonInput<KeyCode>>,
        time: Res<Time>,
        game: Option<ResMut<HangmanGame>>,
    ) {
        let Some(mut game) = game else { return };
        for letter in keyboard.get_just_pressed().filter_map(|&key| letter_for(key)) {
            if let Some(outcome) = game.guess(letter) {
                game.finish(&mut commands, outcome, time.elapsed());
            }
        }
    }

    fn update(
        mut commands: Commands,
        mut contexts: EguiContexts,
        mut game: ResMut<HangmanGame>,
        mut rng: ResMut<GameRng>,
        mut next_screen: ResMut<NextState<Screen>>,
        time: Res<Time>,
    ) {
        let Ok(ctx) = contexts.ctx_mut() else { return };

        match widgets::top_bar(ctx, GameMode::Hangman.title(), Some("New Game")) {
            Some(TopBarAction::Back) => next_screen.set(Screen::Dashboard),
            Some(TopBarAction::Reset) => game.new_word(&mut rng.0, time.elapsed()),
            None => {}
        }

        let mut pressed = None;
        egui::CentralPanel::default().show(ctx, |ui| {
            widgets::status_label(ui, game.status());
            ui.add_space(12.0);
            ui.label(egui::RichText::new(game.display()).monospace().size(32.0));
            ui.add_space(8.0);
            ui.label(format!("Wrong guesses: {}/{}", game.wrong_guesses(), MAX_WRONG));
            ui.separator();

            let playable = !game.is_over() && !game.word.is_empty();
            for row in KEYBOARD_ROWS {
                ui.horizontal(|ui| {
                    for letter in row.chars() {
                        let enabled = playable && !game.is_guessed(letter);
                        let button = egui::Button::new(egui::RichText::new(letter.to_string()).monospace().size(20.0))
                            .min_size(egui::vec2(36.0, 36.0));
                        if ui.add_enabled(enabled, button).clicked() {
                            pressed = Some(letter);
                        }
                    }
                });
            }
        });

        if let Some(outcome) = pressed.and_then(|letter| game.guess(letter)) {
            game.finish(&mut commands, outcome, time.elapsed());
        }
    }
}

fn letter_for(key: KeyCode) -> Option<char> {
    let letter = match key {
        KeyCode::KeyA => 'A',
        KeyCode::KeyB => 'B',
        KeyCode::KeyC => 'C',
        KeyCode::KeyD => 'D',
        KeyCode::KeyE => 'E',
        KeyCode::KeyF => 'F',
        KeyCode::KeyG => 'G',
        KeyCode::KeyH => 'H',
        KeyCode::KeyI => 'I',
        KeyCode::KeyJ => 'J',
        KeyCode::KeyK => 'K',
        KeyCode::KeyL => 'L',
        KeyCode::KeyM => 'M',
        KeyCode::KeyN => 'N',
        KeyCode::KeyO => 'O',
        KeyCode::KeyP => 'P',
        KeyCode::KeyQ => 'Q',
        KeyCode::KeyR => 'R',
        KeyCode::KeyS => 'S',
        KeyCode::KeyT => 'T',
        KeyCode::KeyU => 'U',
        KeyCode::KeyV => 'V',
        KeyCode::KeyW => 'W',
        KeyCode::KeyX => 'X',
        KeyCode::KeyY => 'Y',
        KeyCode::KeyZ => 'Z',
        _ => return None,
    };
    Some(letter)
}
