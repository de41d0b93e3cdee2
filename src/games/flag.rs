//! Guess by Flag: ten rounds of four multiple-choice options.

use std::collections::HashSet;
use std::time::Duration;

use bevy::prelude::*;
use bevy_egui::{EguiContexts, EguiPrimaryContextPass, egui};
use rand::Rng;
use rand::seq::{IndexedRandom, IteratorRandom, SliceRandom};

use super::{ERROR_LOADING, Outcome};
use crate::data::{Country, WorldData};
use crate::random::GameRng;
use crate::screen::{GameMode, Screen};
use crate::ui::flag_painter;
use crate::ui::palette;
use crate::ui::widgets::{self, TopBarAction};

pub struct FlagPlugin;
impl Plugin for FlagPlugin {
    fn build(&self, app: &mut App) {
        let screen = Screen::Game(GameMode::Flag);
        app.add_systems(OnEnter(screen), FlagGame::insert)
            .add_systems(OnExit(screen), FlagGame::remove)
            .add_systems(Update, FlagGame::tick.run_if(resource_exists::<FlagGame>))
            .add_systems(EguiPrimaryContextPass, FlagGame::update.run_if(in_state(screen)))
            ;
    }
}

pub const ROUNDS: u32 = 10;
const OPTIONS: usize = 4;
const NEXT_ROUND_DELAY_SECS: f32 = 1.5;
const QUESTION: &str = "Which country does this flag belong to?";

pub struct FlagRound {
    pub target: Country,
    pub options: Vec<Country>,
    /// CCA2 of the clicked option.
    pub answer: Option<String>,
}

#[derive(Resource)]
pub struct FlagGame {
    pool: Vec<Country>,
    used: HashSet<String>,
    round: Option<FlagRound>,
    score: u32,
    answered: u32,
    status: String,
    next_round: Option<Timer>,
    finished: bool,
    started: Duration,
}

impl FlagGame {
    /// The pool is every country that has a flag pattern to paint.
    pub fn new(data: &WorldData, rng: &mut impl Rng, started: Duration) -> Self {
        let pool = data.countries().iter().filter(|c| c.flag.is_some()).cloned().collect();
        let mut game = Self {
            pool,
            used: HashSet::new(),
            round: None,
            score: 0,
            answered: 0,
            status: String::new(),
            next_round: None,
            finished: false,
            started,
        };
        game.new_round(rng);
        game
    }

    pub fn round(&self) -> Option<&FlagRound> {
        self.round.as_ref()
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn answered(&self) -> u32 {
        self.answered
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    fn new_round(&mut self, rng: &mut impl Rng) {
        self.next_round = None;
        if self.pool.len() < OPTIONS {
            self.round = None;
            self.status = ERROR_LOADING.to_string();
            return;
        }
        if self.used.len() >= self.pool.len() {
            self.used.clear();
        }

        let fresh: Vec<&Country> = self.pool.iter().filter(|c| !self.used.contains(&c.cca2)).collect();
        let Some(target) = fresh.choose(rng).map(|c| (*c).clone()) else { return };
        self.used.insert(target.cca2.clone());

        let mut options: Vec<Country> = self.pool.iter()
            .filter(|c| c.cca2 != target.cca2)
            .choose_multiple(rng, OPTIONS - 1)
            .into_iter()
            .cloned()
            .collect();
        options.push(target.clone());
        options.shuffle(rng);

        self.round = Some(FlagRound { target, options, answer: None });
        self.status = QUESTION.to_string();
    }

    /// Scores the clicked option and schedules the next round.
    pub fn answer(&mut self, cca2: &str) {
        let Some(round) = self.round.as_mut() else { return };
        if round.answer.is_some() || self.finished {
            return;
        }
        round.answer = Some(cca2.to_string());
        self.answered += 1;
        let name = &round.target.name.common;
        if cca2 == round.target.cca2 {
            self.score += 1;
            self.status = format!("Correct! It's {}", name);
        } else {
            self.status = format!("Wrong! It's {}", name);
        }
        self.next_round = Some(Timer::from_seconds(NEXT_ROUND_DELAY_SECS, TimerMode::Once));
    }

    /// Advances the delay after an answer. Returns the outcome once the last
    /// round's delay has elapsed.
    pub fn advance(&mut self, delta: Duration, rng: &mut impl Rng) -> Option<Outcome> {
        let timer = self.next_round.as_mut()?;
        timer.tick(delta);
        if !timer.just_finished() {
            return None;
        }
        self.next_round = None;

        if self.answered < ROUNDS {
            self.new_round(rng);
            return None;
        }
        let outcome = Outcome::new(self.score, ROUNDS);
        self.finished = true;
        self.status = format!("Game complete! Score: {}/{} ({:.0}%)", self.score, ROUNDS, outcome.percent());
        Some(outcome)
    }

    pub fn reset(&mut self, rng: &mut impl Rng, started: Duration) {
        self.score = 0;
        self.answered = 0;
        self.used.clear();
        self.finished = false;
        self.started = started;
        self.new_round(rng);
    }

    // ========================================================================
    // Systems
    // ========================================================================

    fn insert(mut commands: Commands, data: Res<WorldData>, mut rng: ResMut<GameRng>, time: Res<Time>) {
        commands.insert_resource(FlagGame::new(&data, &mut rng.0, time.elapsed()));
    }

    fn remove(mut commands: Commands) {
        commands.remove_resource::<FlagGame>();
    }

    fn tick(mut commands: Commands, time: Res<Time>, mut game: ResMut<FlagGame>, mut rng: ResMut<GameRng>) {
        if let Some(outcome) = game.advance(time.delta(), &mut rng.0) {
            let elapsed = time.elapsed().saturating_sub(game.started);
            commands.trigger(outcome.into_event(GameMode::Flag, elapsed));
        }
    }

    fn update(
        mut contexts: EguiContexts,
        mut game: ResMut<FlagGame>,
        mut rng: ResMut<GameRng>,
        mut next_screen: ResMut<NextState<Screen>>,
        time: Res<Time>,
    ) {
        let Ok(ctx) = contexts.ctx_mut() else { return };

        match widgets::top_bar(ctx, GameMode::Flag.title(), Some("New Game")) {
            Some(TopBarAction::Back) => next_screen.set(Screen::Dashboard),
            Some(TopBarAction::Reset) => game.reset(&mut rng.0, time.elapsed()),
            None => {}
        }

        let mut clicked = None;
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.label(format!("Score: {}/{}", game.score, game.answered));
            widgets::status_label(ui, &game.status);
            ui.separator();

            let Some(round) = game.round() else { return };
            ui.vertical_centered(|ui| {
                ui.add_space(12.0);
                flag_painter::flag(ui, round.target.flag.as_ref(), egui::vec2(400.0, 250.0));
                ui.add_space(16.0);
            });

            let answered = round.answer.is_some();
            let labels = round.options.iter().map(|c| (c.name.common.as_str(), false));
            if answered {
                // Reveal: the correct option green, every other option red.
                ui.horizontal_wrapped(|ui| {
                    for option in &round.options {
                        let fill = if option.cca2 == round.target.cca2 { palette::ANSWER_CORRECT } else { palette::ANSWER_WRONG };
                        widgets::tile_frame(ui, fill, |ui| {
                            ui.label(egui::RichText::new(&option.name.common).color(egui::Color32::WHITE).size(16.0));
                        });
                    }
                });
            } else if let Some(i) = widgets::button_grid(ui, labels) {
                clicked = round.options.get(i).map(|c| c.cca2.clone());
            }
        });

        if let Some(cca2) = clicked {
            game.answer(&cca2);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures;
    use crate::games::testing::rng;

    const TICK: Duration = Duration::from_millis(1600);

    #[test]
    fn round_has_four_distinct_options_including_target() {
        let data = fixtures::world();
        let game = FlagGame::new(&data, &mut rng(), Duration::ZERO);

        let round = game.round().unwrap();
        assert_eq!(round.options.len(), OPTIONS);
        let codes: HashSet<&str> = round.options.iter().map(|c| c.cca2.as_str()).collect();
        assert_eq!(codes.len(), OPTIONS);
        assert!(codes.contains(round.target.cca2.as_str()));
        // Chile has no flag pattern and must never be offered.
        assert!(!codes.contains("CL"));
        assert_eq!(game.status(), QUESTION);
    }

    #[test]
    fn answering_scores_and_waits_before_next_round() {
        let data = fixtures::world();
        let mut rng = rng();
        let mut game = FlagGame::new(&data, &mut rng, Duration::ZERO);
        let target = game.round().unwrap().target.clone();

        game.answer(&target.cca2);
        assert_eq!(game.score(), 1);
        assert_eq!(game.status(), format!("Correct! It's {}", target.name.common));

        // A second click on the same round is ignored.
        game.answer("XX");
        assert_eq!(game.answered(), 1);

        assert!(game.advance(Duration::from_millis(500), &mut rng).is_none());
        assert!(game.round().unwrap().answer.is_some());
        assert!(game.advance(TICK, &mut rng).is_none());
        assert!(game.round().unwrap().answer.is_none());
    }

    #[test]
    fn wrong_answer_names_the_target() {
        let data = fixtures::world();
        let mut game = FlagGame::new(&data, &mut rng(), Duration::ZERO);
        let round = game.round().unwrap();
        let target = round.target.name.common.clone();
        let wrong = round.options.iter().find(|c| c.name.common != target).unwrap().cca2.clone();

        game.answer(&wrong);
        assert_eq!(game.score(), 0);
        assert_eq!(game.status(), format!("Wrong! It's {}", target));
    }

    #[test]
    fn game_completes_after_ten_rounds() {
        let data = fixtures::world();
        let mut rng = rng();
        let mut game = FlagGame::new(&data, &mut rng, Duration::ZERO);

        let mut outcome = None;
        for _ in 0..ROUNDS {
            let target = game.round().unwrap().target.cca2.clone();
            game.answer(&target);
            outcome = game.advance(TICK, &mut rng);
        }

        assert_eq!(outcome, Some(Outcome::new(10, 10)));
        assert!(game.is_finished());
        assert_eq!(game.status(), "Game complete! Score: 10/10 (100%)");
    }

    #[test]
    fn targets_do_not_repeat_until_pool_is_exhausted() {
        let data = fixtures::world();
        let mut rng = rng();
        let mut game = FlagGame::new(&data, &mut rng, Duration::ZERO);

        let mut seen = HashSet::new();
        for _ in 0..5 {
            let target = game.round().unwrap().target.cca2.clone();
            assert!(seen.insert(target.clone()), "{target} repeated");
            game.answer(&target);
            game.advance(TICK, &mut rng);
        }
    }

    #[test]
    fn too_few_flags_reports_error() {
        let data = WorldData::from_json(
            r##"[{"name": {"common": "A", "official": "A"}, "cca2": "AA", "cca3": "AAA",
                 "flag": {"layout": "horizontal", "colors": ["#000000"]}}]"##,
            "{}",
            "{}",
        );
        let game = FlagGame::new(&data, &mut rng(), Duration::ZERO);

        assert!(game.round().is_none());
        assert_eq!(game.status(), ERROR_LOADING);
    }

    #[test]
    fn reset_clears_progress() {
        let data = fixtures::world();
        let mut rng = rng();
        let mut game = FlagGame::new(&data, &mut rng, Duration::ZERO);
        let target = game.round().unwrap().target.cca2.clone();
        game.answer(&target);

        game.reset(&mut rng, Duration::from_secs(5));
        assert_eq!((game.score(), game.answered()), (0, 0));
        assert!(game.round().unwrap().answer.is_none());
    }
}
