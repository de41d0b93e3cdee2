//! Shared random source for every game.

use bevy::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

#[derive(Resource)]
pub struct GameRng(pub StdRng);
impl GameRng {
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn startup_seed() -> u64 {
        use std::time::{SystemTime, UNIX_EPOCH};

        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(42)
            .saturating_add(1)
    }

    #[cfg(target_arch = "wasm32")]
    fn startup_seed() -> u64 {
        (js_sys::Date::now() as u64).saturating_add(1)
    }
}
impl Default for GameRng {
    fn default() -> Self {
        Self::seeded(Self::startup_seed())
    }
}
