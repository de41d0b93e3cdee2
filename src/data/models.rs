//! Serde models for the embedded reference data.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CountryName {
    pub common: String,
    pub official: String,
}

/// How a flag is painted: stripes in the listed order, a centred disc on a
/// plain field, or a Nordic cross (optionally with an inner cross colour).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlagLayout {
    Horizontal,
    Vertical,
    Disc,
    Cross,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FlagPattern {
    pub layout: FlagLayout,
    /// `#RRGGBB` colours. Stripes use every entry; disc and cross use
    /// `[field, figure]` or `[field, outer, inner]`.
    pub colors: Vec<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Country {
    pub name: CountryName,
    pub cca2: String,
    pub cca3: String,
    #[serde(default)]
    pub capital: Vec<String>,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub subregion: String,
    #[serde(default)]
    pub languages: BTreeMap<String, String>,
    #[serde(default)]
    pub latlng: Vec<f64>,
    #[serde(default)]
    pub population: u64,
    #[serde(default)]
    pub area: f64,
    #[serde(default)]
    pub flag: Option<FlagPattern>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CountryFacts {
    pub name: String,
    pub facts: Vec<String>,
}

// ============================================================================
// GeoJSON
// ============================================================================

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct GeoJson {
    #[serde(rename = "type")]
    pub kind: String,
    pub features: Vec<Feature>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: String,
    /// CCA3 code of the country this boundary belongs to.
    pub id: String,
    pub properties: Properties,
    pub geometry: Geometry,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Properties {
    pub name: String,
}

/// Coordinates stay untyped until the shape game needs them; see
/// [`crate::geometry::parse_geometry`].
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Geometry {
    #[serde(rename = "type")]
    pub kind: String,
    pub coordinates: serde_json::Value,
}
