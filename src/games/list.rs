//! List All Countries: name every country of a region from memory.

use std::time::Duration;

use bevy::prelude::*;
use bevy_egui::{EguiContexts, EguiPrimaryContextPass, egui};

use super::Outcome;
use crate::data::{Country, WorldData};
use crate::matcher::{self, MatchLevel};
use crate::scoreboard::SessionScores;
use crate::screen::{GameMode, Screen};
use crate::ui::widgets::{self, TopBarAction};

pub struct ListPlugin;
impl Plugin for ListPlugin {
    fn build(&self, app: &mut App) {
        let screen = Screen::Game(GameMode::List);
        app.add_systems(OnEnter(screen), ListGame::insert)
            .add_systems(OnExit(screen), ListGame::remove)
            .add_systems(EguiPrimaryContextPass, ListGame::update.run_if(in_state(screen)))
            ;
    }
}

const START_STATUS: &str = "Start guessing countries!";

pub struct ListEntry {
    pub country: Country,
    pub found: bool,
}

pub struct ListSession {
    pub region: String,
    entries: Vec<ListEntry>,
    status: String,
    outcome: Option<Outcome>,
    started: Duration,
}

impl ListSession {
    pub fn start(data: &WorldData, region: &str, started: Duration) -> Self {
        let mut countries: Vec<Country> = data.countries_in_region(region).into_iter().cloned().collect();
        countries.sort_by(|a, b| a.name.common.cmp(&b.name.common));
        Self {
            region: region.to_string(),
            entries: countries.into_iter().map(|country| ListEntry { country, found: false }).collect(),
            status: START_STATUS.to_string(),
            outcome: None,
            started,
        }
    }

    pub fn entries(&self) -> &[ListEntry] {
        &self.entries
    }

    pub fn found(&self) -> u32 {
        self.entries.iter().filter(|e| e.found).count() as u32
    }

    pub fn total(&self) -> u32 {
        self.entries.len() as u32
    }

    pub fn completion(&self) -> f64 {
        crate::scoreboard::percent(self.found(), self.total())
    }

    pub fn progress_label(&self) -> String {
        format!("{}: {}/{} countries found", self.region, self.found(), self.total())
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    /// Reveals the first unfound country matching `input`. Returns the
    /// outcome once every country has been listed.
    pub fn guess(&mut self, input: &str) -> Option<Outcome> {
        if self.is_over() {
            return None;
        }
        let hit = self.entries.iter_mut()
            .find(|e| !e.found && matcher::match_country(input, &e.country, MatchLevel::COMMON | MatchLevel::OFFICIAL));
        let Some(entry) = hit else {
            self.status = "Not found or already guessed. Try again!".to_string();
            return None;
        };
        entry.found = true;
        self.status = format!("Correct! {} added to the list.", entry.country.name.common);

        if self.found() < self.total() {
            return None;
        }
        self.status = "Congratulations! You've listed all countries!".to_string();
        let outcome = Outcome::new(self.found(), self.total());
        self.outcome = Some(outcome);
        Some(outcome)
    }

    /// Reveals the remaining names and ends the game with the current count.
    pub fn give_up(&mut self) -> Option<Outcome> {
        if self.is_over() {
            return None;
        }
        let outcome = Outcome::new(self.found(), self.total());
        self.status = format!("You listed {} of {} countries.", outcome.score, outcome.total);
        self.outcome = Some(outcome);
        Some(outcome)
    }

    /// Display line for entry `i`: its name once found or revealed, else "?".
    pub fn line(&self, i: usize) -> String {
        let Some(entry) = self.entries.get(i) else { return String::new() };
        if entry.found || self.is_over() {
            format!("{}. {}", i + 1, entry.country.name.common)
        } else {
            format!("{}. ?", i + 1)
        }
    }
}

#[derive(Resource)]
pub struct ListGame {
    regions: Vec<String>,
    session: Option<ListSession>,
    input: String,
}

impl ListGame {
    pub fn new(data: &WorldData) -> Self {
        Self { regions: data.regions(), session: None, input: String::new() }
    }

    pub fn session(&self) -> Option<&ListSession> {
        self.session.as_ref()
    }

    pub fn start_region(&mut self, data: &WorldData, region: &str, started: Duration) {
        self.input.clear();
        self.session = Some(ListSession::start(data, region, started));
    }

    // ========================================================================
    // Systems
    // ========================================================================

    fn insert(mut commands: Commands, data: Res<WorldData>) {
        commands.insert_resource(ListGame::new(&data));
    }

    fn remove(mut commands: Commands) {
        commands.remove_resource::<ListGame>();
    }

    fn update(
        mut commands: Commands,
        mut contexts: EguiContexts,
        mut game: ResMut<ListGame>,
        mut session_scores: ResMut<SessionScores>,
        mut next_screen: ResMut<NextState<Screen>>,
        data: Res<WorldData>,
        time: Res<Time>,
    ) {
        let Ok(ctx) = contexts.ctx_mut() else { return };

        match widgets::top_bar(ctx, GameMode::List.title(), Some("Change Region")) {
            Some(TopBarAction::Back) => next_screen.set(Screen::Dashboard),
            Some(TopBarAction::Reset) => game.session = None,
            None => {}
        }

        let game = &mut *game;
        let mut chosen_region = None;
        let mut finished = None;
        egui::CentralPanel::default().show(ctx, |ui| {
            let Some(session) = game.session.as_mut() else {
                chosen_region = widgets::region_selector(
                    ui,
                    "Choose a region and list all of its countries!",
                    &game.regions,
                    session_scores.list_region.as_deref(),
                );
                return;
            };

            ui.label(session.progress_label());
            ui.label(format!("Completion: {:.0}%", session.completion()));
            let mut outcome = None;
            ui.horizontal(|ui| {
                if let Some(guess) = widgets::guess_input(ui, &mut game.input, !session.is_over()) {
                    outcome = session.guess(&guess);
                }
                if ui.add_enabled(!session.is_over(), egui::Button::new("Give Up")).clicked() {
                    outcome = session.give_up();
                }
            });
            widgets::status_label(ui, session.status());
            ui.separator();

            egui::ScrollArea::vertical().auto_shrink([false; 2]).show(ui, |ui| {
                let columns = widgets::grid_columns(ui.available_width()) * 2;
                egui::Grid::new("country_list").num_columns(columns).striped(true).show(ui, |ui| {
                    for i in 0..session.entries().len() {
                        ui.label(session.line(i));
                        if (i + 1) % columns == 0 {
                            ui.end_row();
                        }
                    }
                });
            });
            finished = outcome.map(|o| (o, session.started, session.region.clone()));
        });

        if let Some(region) = chosen_region {
            session_scores.list_region = Some(region.clone());
            game.start_region(&data, &region, time.elapsed());
        }
        if let Some((outcome, started, region)) = finished {
            let elapsed = time.elapsed().saturating_sub(started);
            commands.trigger(outcome.into_event(GameMode::List, elapsed).with_region(region));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{WORLD, fixtures};

    fn africa() -> ListSession {
        ListSession::start(&fixtures::world(), "Africa", Duration::ZERO)
    }

    #[test]
    fn entries_are_sorted_and_hidden() {
        let session = africa();

        let names: Vec<&str> = session.entries().iter().map(|e| e.country.name.common.as_str()).collect();
        assert_eq!(names, vec!["Egypt", "Ivory Coast"]);
        assert_eq!(session.line(0), "1. ?");
        assert_eq!(session.progress_label(), "Africa: 0/2 countries found");
        assert_eq!(session.status(), "Start guessing countries!");
    }

    #[test]
    fn official_names_count_but_codes_do_not() {
        let mut session = africa();

        assert!(session.guess("EG").is_none());
        assert_eq!(session.status(), "Not found or already guessed. Try again!");
        assert!(session.guess("republic of côte d'ivoire").is_none());
        assert_eq!(session.status(), "Correct! Ivory Coast added to the list.");
        assert_eq!(session.line(1), "2. Ivory Coast");
    }

    #[test]
    fn repeated_guess_is_rejected() {
        let mut session = africa();
        session.guess("Egypt");

        assert!(session.guess("egypt").is_none());
        assert_eq!(session.status(), "Not found or already guessed. Try again!");
        assert_eq!(session.found(), 1);
    }

    #[test]
    fn listing_everything_finishes() {
        let mut session = africa();
        session.guess("Egypt");

        assert_eq!(session.guess("Ivory Coast"), Some(Outcome::new(2, 2)));
        assert_eq!(session.status(), "Congratulations! You've listed all countries!");
        assert_eq!(session.completion(), 100.0);
    }

    #[test]
    fn giving_up_reveals_and_scores_current_count() {
        let mut session = ListSession::start(&fixtures::world(), WORLD, Duration::ZERO);
        session.guess("Japan");

        assert_eq!(session.give_up(), Some(Outcome::new(1, 6)));
        assert!(session.line(0).ends_with("Chile"));
        assert!(session.give_up().is_none());
        assert!(session.guess("France").is_none());
    }

    #[test]
    fn list_game_starts_on_region_selection() {
        let data = fixtures::world();
        let mut game = ListGame::new(&data);
        assert!(game.session().is_none());

        game.start_region(&data, "Europe", Duration::ZERO);
        assert_eq!(game.session().map(|s| s.total()), Some(2));
    }
}
