//! Higher or Lower: is the next country's population above or below the
//! current one's?

use std::time::Duration;

use bevy::prelude::*;
use bevy_egui::{EguiContexts, EguiPrimaryContextPass, egui};
use rand::Rng;
use rand::seq::IndexedRandom;

use super::{ERROR_LOADING, Outcome};
use crate::data::{Country, WorldData};
use crate::random::GameRng;
use crate::screen::{GameMode, Screen};
use crate::ui::widgets::{self, TopBarAction};

pub struct HigherLowerPlugin;
impl Plugin for HigherLowerPlugin {
    fn build(&self, app: &mut App) {
        let screen = Screen::Game(GameMode::HigherLower);
        app.add_systems(OnEnter(screen), HigherLowerGame::insert)
            .add_systems(OnExit(screen), HigherLowerGame::remove)
            .add_systems(EguiPrimaryContextPass, HigherLowerGame::update.run_if(in_state(screen)))
            ;
    }
}

const INTRO: &str = "Try to guess which country has a higher population!";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Start,
    Playing,
    Over,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Choice {
    Higher,
    Lower,
}

#[derive(Resource)]
pub struct HigherLowerGame {
    pool: Vec<Country>,
    phase: Phase,
    current: Option<Country>,
    next: Option<Country>,
    streak: u32,
    rounds: u32,
    status: String,
    started: Duration,
}

/// Population with thousands separators.
pub fn format_population(population: u64) -> String {
    let digits = population.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

impl HigherLowerGame {
    pub fn new(data: &WorldData) -> Self {
        Self {
            pool: data.countries().to_vec(),
            phase: Phase::Start,
            current: None,
            next: None,
            streak: 0,
            rounds: 0,
            status: INTRO.to_string(),
            started: Duration::ZERO,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn current(&self) -> Option<&Country> {
        self.current.as_ref()
    }

    pub fn next(&self) -> Option<&Country> {
        self.next.as_ref()
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn start(&mut self, rng: &mut impl Rng, started: Duration) {
        self.streak = 0;
        self.rounds = 0;
        self.started = started;
        if self.pool.len() < 2 {
            self.status = ERROR_LOADING.to_string();
            return;
        }
        self.current = self.pool.choose(rng).cloned();
        self.draw_next(rng);
        self.phase = Phase::Playing;
        self.status = "Does the second country have a higher or lower population?".to_string();
    }

    /// Back to the start screen.
    pub fn reset(&mut self) {
        self.phase = Phase::Start;
        self.current = None;
        self.next = None;
        self.streak = 0;
        self.rounds = 0;
        self.status = INTRO.to_string();
    }

    fn draw_next(&mut self, rng: &mut impl Rng) {
        let current = self.current.as_ref().map(|c| c.cca2.as_str());
        let candidates: Vec<&Country> = self.pool.iter().filter(|c| Some(c.cca2.as_str()) != current).collect();
        self.next = candidates.choose(rng).map(|c| (*c).clone());
    }

    /// Equal populations count as correct. Returns the outcome once a wrong
    /// guess ends the run.
    pub fn guess(&mut self, choice: Choice, rng: &mut impl Rng) -> Option<Outcome> {
        if self.phase != Phase::Playing {
            return None;
        }
        let (Some(current), Some(next)) = (&self.current, &self.next) else { return None };
        self.rounds += 1;

        let correct = match choice {
            Choice::Higher => next.population >= current.population,
            Choice::Lower => next.population <= current.population,
        };
        if correct {
            self.streak += 1;
            self.status = format!(
                "Correct! {} has a population of {}",
                next.name.common,
                format_population(next.population)
            );
            self.current = self.next.take();
            self.draw_next(rng);
            return None;
        }

        self.status = format!(
            "Wrong! {} has a population of {}. Final streak: {}",
            next.name.common,
            format_population(next.population),
            self.streak
        );
        self.phase = Phase::Over;
        Some(Outcome::new(self.streak, self.rounds))
    }

    // ========================================================================
    // Systems
    // ========================================================================

    fn insert(mut commands: Commands, data: Res<WorldData>) {
        commands.insert_resource(HigherLowerGame::new(&data));
    }

    fn remove(mut commands: Commands) {
        commands.remove_resource::<HigherLowerGame>();
    }

    fn update(
        mut commands: Commands,
        mut contexts: EguiContexts,
        mut game: ResMut<HigherLowerGame>,
        mut rng: ResMut<GameRng>,
        mut next_screen: ResMut<NextState<Screen>>,
        time: Res<Time>,
    ) {
        let Ok(ctx) = contexts.ctx_mut() else { return };

        match widgets::top_bar(ctx, GameMode::HigherLower.title(), Some("Reset")) {
            Some(TopBarAction::Back) => next_screen.set(Screen::Dashboard),
            Some(TopBarAction::Reset) => game.reset(),
            None => {}
        }

        let mut start = false;
        let mut choice = None;
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.label(format!("Streak: {}", game.streak()));
            widgets::status_label(ui, game.status());
            ui.separator();

            match game.phase() {
                Phase::Start => {
                    ui.vertical_centered(|ui| {
                        ui.add_space(24.0);
                        if ui.button(egui::RichText::new("Start Game").size(20.0)).clicked() {
                            start = true;
                        }
                    });
                }
                Phase::Playing | Phase::Over => {
                    let reveal = game.phase() == Phase::Over;
                    ui.columns(2, |columns| {
                        if let Some(current) = game.current() {
                            country_card(&mut columns[0], current, true);
                        }
                        if let Some(next) = game.next() {
                            country_card(&mut columns[1], next, reveal);
                        }
                    });
                    ui.add_space(16.0);
                    if !reveal {
                        ui.horizontal(|ui| {
                            if ui.button(egui::RichText::new("Higher ↑").size(18.0)).clicked() {
                                choice = Some(Choice::Higher);
                            }
                            if ui.button(egui::RichText::new("Lower ↓").size(18.0)).clicked() {
                                choice = Some(Choice::Lower);
                            }
                        });
                    } else if ui.button("Play Again").clicked() {
                        start = true;
                    }
                }
            }
        });

        if start {
            game.start(&mut rng.0, time.elapsed());
        }
        if let Some(outcome) = choice.and_then(|c| game.guess(c, &mut rng.0)) {
            let elapsed = time.elapsed().saturating_sub(game.started);
            commands.trigger(outcome.into_event(GameMode::HigherLower, elapsed));
        }
    }
}

fn country_card(ui: &mut egui::Ui, country: &Country, show_population: bool) {
    ui.vertical_centered(|ui| {
        crate::ui::flag_painter::flag(ui, country.flag.as_ref(), egui::vec2(240.0, 150.0));
        ui.heading(&country.name.common);
        let population = if show_population { format_population(country.population) } else { "?".to_string() };
        ui.label(format!("Population: {}", population));
    });
}
