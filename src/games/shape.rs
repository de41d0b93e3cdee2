//! Guess by Shape: name each country of a region from its silhouette.
//!
//! Coordinates are parsed lazily into a shared cache. Starting a region spawns a
//! background task on the `AsyncComputeTaskPool` that fills the cache ahead of
//! play; the main flow never waits for it and parses on a cache miss instead.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use bevy::log::{debug, info};
use bevy::prelude::*;
use bevy::tasks::{AsyncComputeTaskPool, Task, block_on, poll_once};
use bevy_egui::{EguiContexts, EguiPrimaryContextPass, egui};
use rand::Rng;
use rand::seq::SliceRandom;

use super::Outcome;
use crate::data::{Feature, Geometry, WorldData};
use crate::geometry::{self, MultiPolygon};
use crate::matcher;
use crate::raster::{self, ISLAND_CANVAS, MAIN_CANVAS};
use crate::random::GameRng;
use crate::screen::{GameMode, Screen};
use crate::ui::widgets::{self, TopBarAction};

pub struct ShapePlugin;
impl Plugin for ShapePlugin {
    fn build(&self, app: &mut App) {
        let screen = Screen::Game(GameMode::Shape);
        app.add_systems(OnEnter(screen), ShapeGame::insert)
            .add_systems(OnExit(screen), ShapeGame::remove)
            .add_systems(Update, (ShapeGame::tick, ShapeGame::poll_prewarm).run_if(resource_exists::<ShapeGame>))
            .add_systems(EguiPrimaryContextPass, ShapeGame::update.run_if(in_state(screen)))
            ;
    }
}

const NEXT_COUNTRY_DELAY_SECS: f32 = 2.0;

pub type ShapeCache = Arc<RwLock<HashMap<usize, MultiPolygon>>>;

/// Parses every geometry missing from `cache`. Returns how many were added.
pub fn prewarm(geometries: &[Geometry], cache: &ShapeCache) -> usize {
    let mut added = 0;
    for (i, geometry) in geometries.iter().enumerate() {
        let cached = cache.read().is_ok_and(|c| c.contains_key(&i));
        if cached {
            continue;
        }
        let parsed = geometry::parse_geometry(geometry);
        if let Ok(mut c) = cache.write() {
            c.entry(i).or_insert(parsed);
            added += 1;
        }
    }
    added
}

/// One pass through the shuffled shapes of a region.
pub struct ShapeSession {
    region: String,
    features: Vec<Feature>,
    cache: ShapeCache,
    current: Option<usize>,
    next_index: usize,
    score: u32,
    total: u32,
    result: String,
    awaiting_next: Option<Timer>,
    finished: bool,
    /// Bumped whenever a different shape is shown.
    shape_version: u64,
    started: Duration,
}

impl ShapeSession {
    pub fn start(data: &WorldData, region: &str, rng: &mut impl Rng, started: Duration) -> Self {
        let mut features: Vec<Feature> = data.shapes_in_region(region).into_iter().cloned().collect();
        features.shuffle(rng);
        let mut session = Self {
            region: region.to_string(),
            features,
            cache: ShapeCache::default(),
            current: None,
            next_index: 0,
            score: 0,
            total: 0,
            result: String::new(),
            awaiting_next: None,
            finished: false,
            shape_version: 0,
            started,
        };
        if !session.next_country() {
            session.finish();
        }
        session
    }

    pub fn cache(&self) -> &ShapeCache {
        &self.cache
    }

    pub fn geometries(&self) -> Vec<Geometry> {
        self.features.iter().map(|f| f.geometry.clone()).collect()
    }

    pub fn current_feature(&self) -> Option<&Feature> {
        self.current.and_then(|i| self.features.get(i))
    }

    pub fn result(&self) -> &str {
        &self.result
    }

    pub fn score(&self) -> (u32, u32) {
        (self.score, self.total)
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn accepts_guess(&self) -> bool {
        !self.finished && self.awaiting_next.is_none() && self.current.is_some()
    }

    pub fn progress_label(&self) -> String {
        let position = self.current.map_or(self.features.len(), |i| i + 1);
        format!("{}: Country {}/{}", self.region, position, self.features.len())
    }

    /// Cached coordinates for feature `index`, parsed and cached on a miss.
    pub fn coordinates(&self, index: usize) -> MultiPolygon {
        if let Some(coords) = self.cache.read().ok().and_then(|c| c.get(&index).cloned()) {
            return coords;
        }
        let Some(feature) = self.features.get(index) else { return Vec::new() };
        let coords = geometry::parse_geometry(&feature.geometry);
        if let Ok(mut c) = self.cache.write() {
            c.insert(index, coords.clone());
        }
        coords
    }

    pub fn current_shape(&self) -> MultiPolygon {
        self.current.map(|i| self.coordinates(i)).unwrap_or_default()
    }

    /// Moves to the next feature with drawable coordinates. Returns false when
    /// none is left.
    pub fn next_country(&mut self) -> bool {
        while self.next_index < self.features.len() {
            let index = self.next_index;
            self.next_index += 1;
            if !self.coordinates(index).is_empty() {
                self.current = Some(index);
                self.result.clear();
                self.shape_version += 1;
                return true;
            }
        }
        false
    }

    fn finish(&mut self) -> Outcome {
        self.finished = true;
        self.awaiting_next = None;
        let outcome = Outcome::new(self.score, self.total);
        self.result = format!(
            "Game complete! Final score: {}/{} ({:.1}%)",
            self.score, self.total, outcome.percent()
        );
        outcome
    }

    /// Checks a guess against the shown country by its name or any of its
    /// names and codes. The last country ends the game right away.
    pub fn guess(&mut self, input: &str, data: &WorldData) -> Option<Outcome> {
        let input = input.trim();
        if input.is_empty() || !self.accepts_guess() {
            return None;
        }
        let feature = self.current_feature()?;
        let name = feature.properties.name.clone();
        let correct = matcher::matches_name(input, &name)
            || data.country_by_cca3(&feature.id).is_some_and(|c| matcher::matches_country(input, c));

        self.total += 1;
        if correct {
            self.score += 1;
            self.result = format!("Correct! It's {}", name);
        } else {
            self.result = format!("Wrong! It's {}", name);
        }

        if self.next_index >= self.features.len() {
            return Some(self.finish());
        }
        self.awaiting_next = Some(Timer::from_seconds(NEXT_COUNTRY_DELAY_SECS, TimerMode::Once));
        None
    }

    pub fn advance(&mut self, delta: Duration) -> Option<Outcome> {
        let timer = self.awaiting_next.as_mut()?;
        timer.tick(delta);
        if !timer.just_finished() {
            return None;
        }
        self.awaiting_next = None;
        if self.next_country() { None } else { Some(self.finish()) }
    }
}

struct ShapeTextures {
    version: u64,
    main: Option<egui::TextureHandle>,
    islands: Vec<egui::TextureHandle>,
}

#[derive(Resource)]
pub struct ShapeGame {
    regions: Vec<String>,
    session: Option<ShapeSession>,
    prewarm: Option<Task<usize>>,
    textures: Option<ShapeTextures>,
    input: String,
}

impl ShapeGame {
    fn new(data: &WorldData) -> Self {
        Self {
            regions: data.shape_regions(),
            session: None,
            prewarm: None,
            textures: None,
            input: String::new(),
        }
    }

    fn start_region(&mut self, data: &WorldData, region: &str, rng: &mut impl Rng, now: Duration) {
        let session = ShapeSession::start(data, region, rng, now);
        let geometries = session.geometries();
        let cache = session.cache().clone();
        self.prewarm = Some(AsyncComputeTaskPool::get().spawn(async move { prewarm(&geometries, &cache) }));
        debug!("Shape game started for {} ({} shapes)", region, session.features.len());
        self.session = Some(session);
        self.textures = None;
        self.input.clear();
    }

    fn back_to_selection(&mut self) {
        self.session = None;
        self.prewarm = None;
        self.textures = None;
    }

    /// Re-rasterizes the main shape and islands when the shown country changes.
    fn refresh_textures(&mut self, ctx: &egui::Context) {
        let Some(session) = self.session.as_ref() else { return };
        if self.textures.as_ref().is_some_and(|t| t.version == session.shape_version) {
            return;
        }
        let shape = session.current_shape();
        let (main, islands) = match geometry::split_main(&shape) {
            Some((main, islands)) => {
                let main_raster = raster::render_shape(std::slice::from_ref(main), MAIN_CANVAS);
                let main = ctx.load_texture("shape_main", main_raster.to_color_image(), egui::TextureOptions::LINEAR);
                let islands = islands.into_iter()
                    .enumerate()
                    .map(|(i, island)| {
                        let island_raster = raster::render_shape(std::slice::from_ref(island), ISLAND_CANVAS);
                        ctx.load_texture(format!("shape_island_{i}"), island_raster.to_color_image(), egui::TextureOptions::LINEAR)
                    })
                    .collect();
                (Some(main), islands)
            }
            None => (None, Vec::new()),
        };
        self.textures = Some(ShapeTextures { version: session.shape_version, main, islands });
    }

    // ========================================================================
    // Systems
    // ========================================================================

    fn insert(mut commands: Commands, data: Res<WorldData>) {
        commands.insert_resource(ShapeGame::new(&data));
    }

    fn remove(mut commands: Commands) {
        commands.remove_resource::<ShapeGame>();
    }

    fn tick(mut commands: Commands, time: Res<Time>, mut game: ResMut<ShapeGame>) {
        let Some(session) = game.session.as_mut() else { return };
        if let Some(outcome) = session.advance(time.delta()) {
            let elapsed = time.elapsed().saturating_sub(session.started);
            commands.trigger(outcome.into_event(GameMode::Shape, elapsed).with_region(session.region.clone()));
        }
    }

    /// Polls the pre-warm task without blocking; drops it once done.
    fn poll_prewarm(mut game: ResMut<ShapeGame>) {
        let Some(task) = game.prewarm.as_mut() else { return };
        if let Some(added) = block_on(poll_once(task)) {
            info!("Pre-warmed {} shapes", added);
            game.prewarm = None;
        }
    }

    fn update(
        mut commands: Commands,
        mut contexts: EguiContexts,
        mut game: ResMut<ShapeGame>,
        mut rng: ResMut<GameRng>,
        mut next_screen: ResMut<NextState<Screen>>,
        data: Res<WorldData>,
        time: Res<Time>,
    ) {
        let Ok(ctx) = contexts.ctx_mut() else { return };

        match widgets::top_bar(ctx, GameMode::Shape.title(), Some("New Game")) {
            Some(TopBarAction::Back) => next_screen.set(Screen::Dashboard),
            Some(TopBarAction::Reset) => game.back_to_selection(),
            None => {}
        }

        game.refresh_textures(ctx);
        let game = &mut *game;

        let mut chosen_region = None;
        let mut finished = None;
        egui::CentralPanel::default().show(ctx, |ui| {
            let Some(session) = game.session.as_mut() else {
                chosen_region = widgets::region_selector(
                    ui,
                    "Choose a region and guess all country shapes!",
                    &game.regions,
                    None,
                );
                return;
            };

            let (score, total) = session.score();
            ui.label(format!("Score: {}/{}", score, total));
            ui.label(session.progress_label());
            if let Some(guess) = widgets::guess_input(ui, &mut game.input, session.accepts_guess()) {
                finished = session.guess(&guess, &data).map(|o| (o, session.started, session.region.clone()));
            }
            widgets::status_label(ui, session.result());
            ui.separator();

            let Some(textures) = game.textures.as_ref() else { return };
            ui.horizontal_top(|ui| {
                if !textures.islands.is_empty() {
                    egui::ScrollArea::vertical().id_salt("islands").max_height(MAIN_CANVAS.height as f32).show(ui, |ui| {
                        ui.vertical(|ui| {
                            for island in &textures.islands {
                                ui.image(egui::load::SizedTexture::new(island.id(), island.size_vec2()));
                            }
                        });
                    });
                }
                if let Some(main) = &textures.main {
                    ui.image(egui::load::SizedTexture::new(main.id(), main.size_vec2()));
                }
            });
        });

        if let Some(region) = chosen_region {
            game.start_region(&data, &region, &mut rng.0, time.elapsed());
        }
        if let Some((outcome, started, region)) = finished {
            let elapsed = time.elapsed().saturating_sub(started);
            commands.trigger(outcome.into_event(GameMode::Shape, elapsed).with_region(region));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{WORLD, fixtures};
    use crate::games::testing::rng;

    const TICK: Duration = Duration::from_millis(2100);

    fn world_session() -> ShapeSession {
        ShapeSession::start(&fixtures::world(), WORLD, &mut rng(), Duration::ZERO)
    }

    #[test]
    fn skips_features_without_coordinates() {
        let mut session = world_session();
        let data = fixtures::world();

        // Germany's geometry is a Point and must never be shown.
        let mut shown = Vec::new();
        loop {
            let feature = session.current_feature().unwrap();
            assert_ne!(feature.id, "DEU");
            shown.push(feature.id.clone());
            let name = feature.properties.name.clone();
            if session.guess(&name, &data).is_some() {
                break;
            }
            session.advance(TICK);
            if session.is_finished() {
                break;
            }
        }
        shown.sort();
        assert_eq!(shown, vec!["FRA", "JPN"]);
        assert_eq!(session.score(), (2, 2));
        assert!(session.result().starts_with("Game complete! Final score: 2/2"));
    }

    #[test]
    fn guesses_match_names_and_codes() {
        let data = fixtures::world();
        let mut session = world_session();
        let feature = session.current_feature().unwrap().clone();

        assert!(session.guess("   ", &data).is_none());
        assert_eq!(session.score(), (0, 0));

        session.guess(&feature.id.to_lowercase(), &data);
        assert_eq!(session.score(), (1, 1));
        assert_eq!(session.result(), format!("Correct! It's {}", feature.properties.name));
        assert!(!session.accepts_guess());
    }

    #[test]
    fn wrong_guess_counts_and_waits() {
        let data = fixtures::world();
        let mut session = world_session();
        let name = session.current_feature().unwrap().properties.name.clone();

        session.guess("Atlantis", &data);
        assert_eq!(session.score(), (0, 1));
        assert_eq!(session.result(), format!("Wrong! It's {}", name));

        assert!(session.advance(Duration::from_millis(500)).is_none());
        assert!(!session.accepts_guess());
        session.advance(TICK);
        assert!(session.accepts_guess());
        assert!(session.result().is_empty());
    }

    #[test]
    fn progress_label_counts_from_one() {
        let session = world_session();

        assert!(session.progress_label().starts_with("World: Country "));
        assert!(session.progress_label().ends_with("/3"));
    }

    #[test]
    fn region_without_drawable_shapes_finishes_immediately() {
        let session = ShapeSession::start(&fixtures::world(), "Africa", &mut rng(), Duration::ZERO);

        assert!(session.is_finished());
        assert!(session.current_feature().is_none());
    }

    #[test]
    fn prewarm_fills_missing_entries_only() {
        let session = world_session();
        let before = session.cache().read().unwrap().len();

        let added = prewarm(&session.geometries(), session.cache());
        assert_eq!(added, 3 - before);
        assert_eq!(session.cache().read().unwrap().len(), 3);
        assert_eq!(prewarm(&session.geometries(), session.cache()), 0);
    }

    #[test]
    fn cache_miss_parses_on_demand() {
        let session = world_session();
        session.cache().write().unwrap().clear();

        let index = session.features.iter().position(|f| f.id == "JPN").unwrap();
        assert_eq!(session.coordinates(index).len(), 2);
        assert!(session.cache().read().unwrap().contains_key(&index));
    }
}
