//! What Country is This: guess a hidden country, getting hints about region,
//! population and area after each attempt.

use std::time::Duration;

use bevy::prelude::*;
use bevy_egui::{EguiContexts, EguiPrimaryContextPass, egui};
use rand::Rng;
use rand::seq::IndexedRandom;

use super::{ERROR_LOADING, Outcome};
use crate::data::{Country, WorldData};
use crate::games::higher_lower::format_population;
use crate::matcher::{self, MatchLevel};
use crate::random::GameRng;
use crate::screen::{GameMode, Screen};
use crate::ui::flag_painter;
use crate::ui::palette;
use crate::ui::widgets::{self, TopBarAction};

pub struct GuessingPlugin;
impl Plugin for GuessingPlugin {
    fn build(&self, app: &mut App) {
        let screen = Screen::Game(GameMode::Guessing);
        app.add_systems(OnEnter(screen), GuessingGame::insert)
            .add_systems(OnExit(screen), GuessingGame::remove)
            .add_systems(EguiPrimaryContextPass, GuessingGame::update.run_if(in_state(screen)))
            ;
    }
}

const PROMPT: &str = "Make a guess!";
const HISTORY_COLUMNS: [&str; 5] = ["Flag", "Country", "Continent", "Population", "Area"];

/// How close a guessed value is to the target's.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Proximity {
    Exact,
    Close,
    Near,
    Fair,
    Far,
}

impl Proximity {
    /// Percentage difference relative to `target`; absolute difference when
    /// the target is zero.
    pub fn of(guess: f64, target: f64) -> Self {
        if guess == target {
            return Proximity::Exact;
        }
        let diff = if target == 0.0 {
            (guess - target).abs()
        } else {
            (guess - target).abs() * 100.0 / target.abs()
        };
        match diff {
            d if d <= 10.0 => Proximity::Close,
            d if d <= 25.0 => Proximity::Near,
            d if d <= 50.0 => Proximity::Fair,
            _ => Proximity::Far,
        }
    }

    pub fn color(self) -> egui::Color32 {
        match self {
            Proximity::Exact | Proximity::Close => palette::GOOD,
            Proximity::Near => palette::CLOSE,
            Proximity::Fair => palette::FAIR,
            Proximity::Far => palette::BAD,
        }
    }
}

/// Where the target lies relative to the guess.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Higher,
    Lower,
    Equal,
}

impl Direction {
    pub fn of(guess: f64, target: f64) -> Self {
        if target > guess {
            Direction::Higher
        } else if target < guess {
            Direction::Lower
        } else {
            Direction::Equal
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            Direction::Higher => "↑",
            Direction::Lower => "↓",
            Direction::Equal => "",
        }
    }
}

/// A numeric comparison shown in one history cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Hint {
    pub proximity: Proximity,
    pub direction: Direction,
}

impl Hint {
    pub fn compare(guess: f64, target: f64) -> Self {
        Self { proximity: Proximity::of(guess, target), direction: Direction::of(guess, target) }
    }
}

pub struct GuessRow {
    pub country: Country,
    pub same_region: bool,
    pub population: Hint,
    pub area: Hint,
}

impl GuessRow {
    pub fn new(guess: &Country, target: &Country) -> Self {
        Self {
            country: guess.clone(),
            same_region: guess.region == target.region,
            population: Hint::compare(guess.population as f64, target.population as f64),
            area: Hint::compare(guess.area, target.area),
        }
    }
}

#[derive(Resource)]
pub struct GuessingGame {
    pool: Vec<Country>,
    target: Option<Country>,
    history: Vec<GuessRow>,
    status: String,
    solved: bool,
    input: String,
    started: Duration,
}

impl GuessingGame {
    pub fn new(data: &WorldData, rng: &mut impl Rng, started: Duration) -> Self {
        let mut game = Self {
            pool: data.countries().to_vec(),
            target: None,
            history: Vec::new(),
            status: String::new(),
            solved: false,
            input: String::new(),
            started,
        };
        game.new_game(rng, started);
        game
    }

    pub fn new_game(&mut self, rng: &mut impl Rng, started: Duration) {
        self.history.clear();
        self.solved = false;
        self.input.clear();
        self.started = started;
        self.target = self.pool.choose(rng).cloned();
        self.status = if self.target.is_some() { PROMPT } else { ERROR_LOADING }.to_string();
    }

    pub fn target(&self) -> Option<&Country> {
        self.target.as_ref()
    }

    pub fn history(&self) -> &[GuessRow] {
        &self.history
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn is_solved(&self) -> bool {
        self.solved
    }

    /// Returns the outcome when the guess names the target.
    pub fn guess(&mut self, input: &str) -> Option<Outcome> {
        if self.solved {
            return None;
        }
        let target = self.target.as_ref()?;
        let Some(country) = matcher::find_country(&self.pool, input, MatchLevel::ALL) else {
            self.status = "Country not found!".to_string();
            return None;
        };
        if self.history.iter().any(|row| row.country.cca2 == country.cca2) {
            self.status = "Already guessed!".to_string();
            return None;
        }

        let correct = country.cca2 == target.cca2;
        self.history.push(GuessRow::new(country, target));
        if !correct {
            self.status = PROMPT.to_string();
            return None;
        }
        self.status = format!("Correct! It was {}!", target.name.common);
        self.solved = true;
        Some(Outcome::new(1, self.history.len() as u32))
    }

    // ========================================================================
    // Systems
    // ========================================================================

    fn insert(mut commands: Commands, data: Res<WorldData>, mut rng: ResMut<GameRng>, time: Res<Time>) {
        commands.insert_resource(GuessingGame::new(&data, &mut rng.0, time.elapsed()));
    }

    fn remove(mut commands: Commands) {
        commands.remove_resource::<GuessingGame>();
    }

    fn update(
        mut commands: Commands,
        mut contexts: EguiContexts,
        mut game: ResMut<GuessingGame>,
        mut rng: ResMut<GameRng>,
        mut next_screen: ResMut<NextState<Screen>>,
        time: Res<Time>,
    ) {
        let Ok(ctx) = contexts.ctx_mut() else { return };

        match widgets::top_bar(ctx, GameMode::Guessing.title(), Some("New Game")) {
            Some(TopBarAction::Back) => next_screen.set(Screen::Dashboard),
            Some(TopBarAction::Reset) => game.new_game(&mut rng.0, time.elapsed()),
            None => {}
        }

        let game = &mut *game;
        let mut submitted = None;
        egui::CentralPanel::default().show(ctx, |ui| {
            widgets::status_label(ui, &game.status);
            ui.label(format!("Guesses: {}", game.history.len()));
            let enabled = game.target.is_some() && !game.solved;
            submitted = widgets::guess_input(ui, &mut game.input, enabled);
            ui.separator();

            if game.history.is_empty() {
                return;
            }
            egui::ScrollArea::vertical().auto_shrink([false; 2]).show(ui, |ui| {
                egui::Grid::new("guess_history").num_columns(HISTORY_COLUMNS.len()).spacing([12.0, 6.0]).show(ui, |ui| {
                    for heading in HISTORY_COLUMNS {
                        hint_cell(ui, palette::TILE, heading.to_string());
                    }
                    ui.end_row();
                    // Latest guess first.
                    for row in game.history.iter().rev() {
                        history_row(ui, row);
                        ui.end_row();
                    }
                });
            });
        });

        if let Some(outcome) = submitted.and_then(|text| game.guess(&text)) {
            let elapsed = time.elapsed().saturating_sub(game.started);
            commands.trigger(outcome.into_event(GameMode::Guessing, elapsed));
        }
    }
}

fn history_row(ui: &mut egui::Ui, row: &GuessRow) {
    flag_painter::flag(ui, row.country.flag.as_ref(), egui::vec2(48.0, 30.0));
    ui.label(&row.country.name.common);
    let region_fill = if row.same_region { palette::GOOD } else { palette::BAD };
    hint_cell(ui, region_fill, row.country.region.clone());
    hint_cell(
        ui,
        row.population.proximity.color(),
        format!("{} {}", format_population(row.country.population), row.population.direction.arrow()),
    );
    hint_cell(
        ui,
        row.area.proximity.color(),
        format!("{} km² {}", format_population(row.country.area.round() as u64), row.area.direction.arrow()),
    );
}

fn hint_cell(ui: &mut egui::Ui, fill: egui::Color32, text: String) {
    widgets::tile_frame(ui, fill, |ui| {
        ui.label(egui::RichText::new(text.trim_end()).color(egui::Color32::WHITE).strong());
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures;
    use crate::games::testing::rng;

    fn game_targeting(cca2: &str) -> GuessingGame {
        let data = fixtures::world();
        let mut game = GuessingGame::new(&data, &mut rng(), Duration::ZERO);
        game.target = data.country_by_cca2(cca2).cloned();
        game
    }

    #[test]
    fn proximity_bands() {
        assert_eq!(Proximity::of(100.0, 100.0), Proximity::Exact);
        assert_eq!(Proximity::of(110.0, 100.0), Proximity::Close);
        assert_eq!(Proximity::of(80.0, 100.0), Proximity::Near);
        assert_eq!(Proximity::of(150.0, 100.0), Proximity::Fair);
        assert_eq!(Proximity::of(151.0, 100.0), Proximity::Far);
    }

    #[test]
    fn zero_target_uses_absolute_difference() {
        assert_eq!(Proximity::of(8.0, 0.0), Proximity::Close);
        assert_eq!(Proximity::of(60.0, 0.0), Proximity::Far);
    }

    #[test]
    fn arrow_points_towards_target() {
        assert_eq!(Direction::of(10.0, 20.0).arrow(), "↑");
        assert_eq!(Direction::of(20.0, 10.0).arrow(), "↓");
        assert_eq!(Direction::of(5.0, 5.0), Direction::Equal);
    }

    #[test]
    fn wrong_guess_adds_hint_row() {
        let mut game = game_targeting("FR");

        assert!(game.guess("Germany").is_none());
        assert_eq!(game.status(), PROMPT);
        let row = &game.history()[0];
        assert!(row.same_region);
        assert_eq!(row.population.direction, Direction::Lower);
        assert_eq!(row.population.proximity, Proximity::Near);
        assert_eq!(row.area.direction, Direction::Higher);
        assert_eq!(row.area.proximity, Proximity::Fair);
    }

    #[test]
    fn unknown_and_repeated_guesses_are_rejected() {
        let mut game = game_targeting("FR");

        assert!(game.guess("Atlantis").is_none());
        assert_eq!(game.status(), "Country not found!");
        game.guess("JP");
        assert!(game.guess("japan").is_none());
        assert_eq!(game.status(), "Already guessed!");
        assert_eq!(game.history().len(), 1);
    }

    #[test]
    fn correct_guess_scores_one_over_attempts() {
        let mut game = game_targeting("FR");
        game.guess("Chile");
        game.guess("Egypt");

        assert_eq!(game.guess("fra"), Some(Outcome::new(1, 3)));
        assert_eq!(game.status(), "Correct! It was France!");
        assert!(game.is_solved());
        assert!(game.guess("Germany").is_none());
    }

    #[test]
    fn new_game_clears_history() {
        let mut game = game_targeting("FR");
        game.guess("Japan");

        game.new_game(&mut rng(), Duration::from_secs(3));
        assert!(game.history().is_empty());
        assert!(game.target().is_some());
    }
}
