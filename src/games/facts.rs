//! Guess by Facts: identify a country from up to three trivia facts.

use std::time::Duration;

use bevy::prelude::*;
use bevy_egui::{EguiContexts, EguiPrimaryContextPass, egui};
use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};

use super::{ERROR_LOADING, Outcome};
use crate::data::{Country, WorldData};
use crate::matcher;
use crate::random::GameRng;
use crate::screen::{GameMode, Screen};
use crate::ui::widgets::{self, TopBarAction};

pub struct FactsPlugin;
impl Plugin for FactsPlugin {
    fn build(&self, app: &mut App) {
        let screen = Screen::Game(GameMode::Facts);
        app.add_systems(OnEnter(screen), FactsGame::insert)
            .add_systems(OnExit(screen), FactsGame::remove)
            .add_systems(EguiPrimaryContextPass, FactsGame::update.run_if(in_state(screen)))
            ;
    }
}

pub const MAX_TRIES: u32 = 3;
const MAX_SHOWN: usize = 3;
const PROMPT: &str = "Which country is this?";

#[derive(Resource)]
pub struct FactsGame {
    pool: Vec<Country>,
    target: Option<Country>,
    /// Facts for the target in the order they will be revealed.
    facts: Vec<String>,
    shown: usize,
    tries: u32,
    status: String,
    outcome: Option<Outcome>,
    input: String,
    started: Duration,
}

impl FactsGame {
    pub fn new(data: &WorldData, rng: &mut impl Rng, started: Duration) -> Self {
        let pool = data.countries().iter().filter(|c| data.has_facts(&c.cca2)).cloned().collect();
        let mut game = Self {
            pool,
            target: None,
            facts: Vec::new(),
            shown: 0,
            tries: MAX_TRIES,
            status: String::new(),
            outcome: None,
            input: String::new(),
            started,
        };
        game.new_game(data, rng, started);
        game
    }

    pub fn new_game(&mut self, data: &WorldData, rng: &mut impl Rng, started: Duration) {
        self.tries = MAX_TRIES;
        self.outcome = None;
        self.started = started;
        self.input.clear();
        self.target = self.pool.choose(rng).cloned();

        let Some(target) = &self.target else {
            self.facts.clear();
            self.shown = 0;
            self.status = ERROR_LOADING.to_string();
            return;
        };
        self.facts = data.facts_for(&target.cca2).map(|f| f.facts.clone()).unwrap_or_default();
        self.facts.shuffle(rng);
        self.shown = 1;
        self.status = PROMPT.to_string();
    }

    pub fn target(&self) -> Option<&Country> {
        self.target.as_ref()
    }

    pub fn shown_facts(&self) -> &[String] {
        &self.facts[..self.shown.min(self.facts.len())]
    }

    pub fn tries_left(&self) -> u32 {
        self.tries
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    /// Returns the outcome when the guess ends the game.
    pub fn guess(&mut self, input: &str) -> Option<Outcome> {
        if self.is_over() {
            return None;
        }
        let target = self.target.as_ref()?;
        let name = target.name.common.clone();

        let outcome = if matcher::matches_country(input, target) {
            self.status = format!("Correct! It was {}!", name);
            Outcome::new(self.tries, MAX_TRIES)
        } else {
            self.tries = self.tries.saturating_sub(1);
            if self.tries > 0 {
                if self.shown < MAX_SHOWN && self.shown < self.facts.len() {
                    self.shown += 1;
                    self.status = "Wrong! Try again with the next fact.".to_string();
                } else {
                    self.status = "Wrong! No more facts available.".to_string();
                }
                return None;
            }
            self.status = format!("Game over! It was {}", name);
            Outcome::new(0, MAX_TRIES)
        };
        self.outcome = Some(outcome);
        Some(outcome)
    }

    // ========================================================================
    // Systems
    // ========================================================================

    fn insert(mut commands: Commands, data: Res<WorldData>, mut rng: ResMut<GameRng>, time: Res<Time>) {
        commands.insert_resource(FactsGame::new(&data, &mut rng.0, time.elapsed()));
    }

    fn remove(mut commands: Commands) {
        commands.remove_resource::<FactsGame>();
    }

    fn update(
        mut commands: Commands,
        mut contexts: EguiContexts,
        mut game: ResMut<FactsGame>,
        mut rng: ResMut<GameRng>,
        mut next_screen: ResMut<NextState<Screen>>,
        data: Res<WorldData>,
        time: Res<Time>,
    ) {
        let Ok(ctx) = contexts.ctx_mut() else { return };

        match widgets::top_bar(ctx, GameMode::Facts.title(), Some("New Game")) {
            Some(TopBarAction::Back) => next_screen.set(Screen::Dashboard),
            Some(TopBarAction::Reset) => game.new_game(&data, &mut rng.0, time.elapsed()),
            None => {}
        }

        let game = &mut *game;
        let mut submitted = None;
        egui::CentralPanel::default().show(ctx, |ui| {
            widgets::status_label(ui, &game.status);
            ui.label(format!("Tries left: {}/{}", game.tries, MAX_TRIES));
            ui.separator();

            for (i, fact) in game.shown_facts().iter().enumerate() {
                ui.label(egui::RichText::new(format!("Fact {}: {}", i + 1, fact)).size(16.0));
                ui.add_space(4.0);
            }
            ui.add_space(12.0);

            let enabled = game.target.is_some() && game.outcome.is_none();
            submitted = widgets::guess_input(ui, &mut game.input, enabled);
        });

        if let Some(outcome) = submitted.and_then(|text| game.guess(&text)) {
            let elapsed = time.elapsed().saturating_sub(game.started);
            commands.trigger(outcome.into_event(GameMode::Facts, elapsed));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures;
    use crate::games::testing::rng;

    fn france_game() -> FactsGame {
        let data = fixtures::world();
        let mut game = FactsGame::new(&data, &mut rng(), Duration::ZERO);
        // Pin the target so the test does not depend on the seed.
        game.pool.retain(|c| c.cca2 == "FR");
        game.new_game(&data, &mut rng(), Duration::ZERO);
        game
    }

    #[test]
    fn only_countries_with_facts_are_picked() {
        let data = fixtures::world();
        let game = FactsGame::new(&data, &mut rng(), Duration::ZERO);

        let target = game.target().unwrap();
        assert!(data.has_facts(&target.cca2));
        assert_eq!(game.shown_facts().len(), 1);
        assert_eq!(game.status(), PROMPT);
    }

    #[test]
    fn first_try_scores_full_marks() {
        let mut game = france_game();

        assert_eq!(game.guess("FR"), Some(Outcome::new(3, 3)));
        assert_eq!(game.status(), "Correct! It was France!");
        assert!(game.guess("France").is_none());
    }

    #[test]
    fn wrong_guess_reveals_next_fact() {
        let mut game = france_game();

        assert!(game.guess("Spain").is_none());
        assert_eq!(game.status(), "Wrong! Try again with the next fact.");
        assert_eq!(game.shown_facts().len(), 2);
        assert_eq!(game.tries_left(), 2);

        assert_eq!(game.guess("french republic"), Some(Outcome::new(2, 3)));
    }

    #[test]
    fn three_misses_end_the_game() {
        let mut game = france_game();

        game.guess("a");
        game.guess("b");
        assert_eq!(game.shown_facts().len(), 3);
        assert_eq!(game.guess("c"), Some(Outcome::new(0, 3)));
        assert_eq!(game.status(), "Game over! It was France");
    }

    #[test]
    fn running_out_of_facts_keeps_the_last_one() {
        let data = fixtures::world();
        let mut game = FactsGame::new(&data, &mut rng(), Duration::ZERO);
        game.pool.retain(|c| c.cca2 == "JP");
        game.new_game(&data, &mut rng(), Duration::ZERO);

        assert!(game.guess("China").is_none());
        assert_eq!(game.status(), "Wrong! No more facts available.");
        assert_eq!(game.shown_facts(), ["only fact".to_string()]);
    }

    #[test]
    fn facts_are_not_repeated() {
        let mut game = france_game();
        game.guess("x");
        game.guess("y");

        let mut shown = game.shown_facts().to_vec();
        shown.sort();
        shown.dedup();
        assert_eq!(shown.len(), 3);
    }

    #[test]
    fn no_facts_reports_error() {
        let data = WorldData::from_json(fixtures::COUNTRIES, "{}", "{}");
        let mut game = FactsGame::new(&data, &mut rng(), Duration::ZERO);

        assert!(game.target().is_none());
        assert_eq!(game.status(), ERROR_LOADING);
        assert!(game.guess("France").is_none());
    }
}
