//! Embedded reference data: countries, trivia facts and boundary shapes.
//!
//! The JSON sources are compiled into the binary and parsed once at startup into
//! the read-only `WorldData` resource. A source that fails to parse is logged and
//! replaced with an empty table so the UI degrades instead of crashing.

pub mod models;

use std::collections::{BTreeSet, HashMap};

use bevy::log::{info, warn};
use bevy::prelude::*;

pub use models::{Country, CountryFacts, Feature, FlagLayout, FlagPattern, GeoJson, Geometry};

pub struct DataPlugin;
impl Plugin for DataPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(WorldData::embedded());
    }
}

/// Pseudo-region containing every country.
pub const WORLD: &str = "World";

const COUNTRIES_JSON: &str = include_str!("../../assets/data/countries.json");
const FACTS_JSON: &str = include_str!("../../assets/data/facts.json");
const SHAPES_JSON: &str = include_str!("../../assets/data/shapes.geojson");

#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("failed to parse {source_name}: {error}")]
    Parse {
        source_name: &'static str,
        error: serde_json::Error,
    },
}

fn parse<T: serde::de::DeserializeOwned>(source_name: &'static str, json: &str) -> Result<T, DataError> {
    serde_json::from_str(json).map_err(|error| DataError::Parse { source_name, error })
}

/// Parses `json`, logging and falling back to the default value on failure.
fn parse_or_default<T: serde::de::DeserializeOwned + Default>(source_name: &'static str, json: &str) -> T {
    parse(source_name, json).unwrap_or_else(|e| {
        warn!("{}", e);
        T::default()
    })
}

pub fn load_countries(json: &str) -> Vec<Country> {
    parse_or_default("countries", json)
}

pub fn load_country_facts(json: &str) -> HashMap<String, CountryFacts> {
    parse_or_default("facts", json)
}

pub fn load_shapes(json: &str) -> GeoJson {
    parse_or_default("shapes", json)
}

/// Immutable reference tables shared by every game.
#[derive(Resource, Default)]
pub struct WorldData {
    countries: Vec<Country>,
    facts: HashMap<String, CountryFacts>,
    shapes: Vec<Feature>,
}

impl WorldData {
    pub fn embedded() -> Self {
        let data = Self::from_json(COUNTRIES_JSON, FACTS_JSON, SHAPES_JSON);
        info!(
            "Loaded {} countries, {} fact sets, {} shapes",
            data.countries.len(),
            data.facts.len(),
            data.shapes.len()
        );
        data
    }

    pub fn from_json(countries: &str, facts: &str, shapes: &str) -> Self {
        Self::new(load_countries(countries), load_country_facts(facts), load_shapes(shapes).features)
    }

    pub fn new(countries: Vec<Country>, facts: HashMap<String, CountryFacts>, shapes: Vec<Feature>) -> Self {
        Self { countries, facts, shapes }
    }

    pub fn countries(&self) -> &[Country] {
        &self.countries
    }

    pub fn shapes(&self) -> &[Feature] {
        &self.shapes
    }

    pub fn facts_for(&self, cca2: &str) -> Option<&CountryFacts> {
        self.facts.get(cca2)
    }

    pub fn has_facts(&self, cca2: &str) -> bool {
        self.facts_for(cca2).is_some_and(|f| !f.facts.is_empty())
    }

    pub fn fact_count(&self) -> usize {
        self.facts.len()
    }

    pub fn country_by_cca2(&self, cca2: &str) -> Option<&Country> {
        self.countries.iter().find(|c| c.cca2.eq_ignore_ascii_case(cca2))
    }

    pub fn country_by_cca3(&self, cca3: &str) -> Option<&Country> {
        self.countries.iter().find(|c| c.cca3.eq_ignore_ascii_case(cca3))
    }

    /// `World` first, then every distinct region in alphabetical order.
    pub fn regions(&self) -> Vec<String> {
        let distinct: BTreeSet<&str> = self.countries.iter()
            .map(|c| c.region.as_str())
            .filter(|r| !r.is_empty())
            .collect();
        std::iter::once(WORLD.to_string())
            .chain(distinct.into_iter().map(str::to_string))
            .collect()
    }

    /// Regions for which at least one boundary shape is available.
    pub fn shape_regions(&self) -> Vec<String> {
        self.regions()
            .into_iter()
            .filter(|region| !self.shapes_in_region(region).is_empty())
            .collect()
    }

    pub fn countries_in_region(&self, region: &str) -> Vec<&Country> {
        self.countries.iter().filter(|c| in_region(c, region)).collect()
    }

    /// Shapes whose CCA3 id resolves to a country of `region`.
    pub fn shapes_in_region(&self, region: &str) -> Vec<&Feature> {
        self.shapes.iter()
            .filter(|feature| {
                region == WORLD
                    || self.country_by_cca3(&feature.id).is_some_and(|c| c.region == region)
            })
            .collect()
    }

    /// Countries the facts game can never pick.
    pub fn countries_without_facts(&self) -> Vec<&Country> {
        self.countries.iter().filter(|c| !self.has_facts(&c.cca2)).collect()
    }

    /// Countries with no boundary feature for the shape game.
    pub fn countries_without_shapes(&self) -> Vec<&Country> {
        self.countries.iter()
            .filter(|c| !self.shapes.iter().any(|f| f.id.eq_ignore_ascii_case(&c.cca3)))
            .collect()
    }
}

pub fn in_region(country: &Country, region: &str) -> bool {
    region == WORLD || country.region == region
}
