//! Persistent high-score table and the per-run session scores.
//!
//! Finished games trigger `GameFinished`; the observer records the result into
//! the persistent `Scoreboard` (saved immediately) and the in-memory
//! `SessionScores` shown on the dashboard.

use std::collections::HashMap;
use std::time::Duration;

use bevy::log::{debug, info, warn};
use bevy::prelude::*;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::persistence::{self, Slot};
use crate::screen::GameMode;

pub struct ScoreboardPlugin;
impl Plugin for ScoreboardPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(Scoreboard::load())
            .init_resource::<SessionScores>()
            .add_observer(GameFinished::on_trigger)
            ;
    }
}

const SCOREBOARD_SLOT: Slot = Slot { file: "scoreboard.json", key: "scoreboard" };
/// Entries kept per game mode.
pub const MAX_ENTRIES_PER_MODE: usize = 100;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub game_mode: GameMode,
    pub score: u32,
    pub total: u32,
    pub percent: f64,
    pub date: DateTime<Utc>,
    /// Seconds.
    pub duration: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

impl ScoreEntry {
    /// Undated entry; `Scoreboard::record` stamps the date.
    pub fn new(game_mode: GameMode, score: u32, total: u32, duration: Duration, region: Option<String>) -> Self {
        Self {
            game_mode,
            score,
            total,
            percent: percent(score, total),
            date: DateTime::UNIX_EPOCH,
            duration: duration.as_secs(),
            region,
        }
    }
}

pub fn percent(score: u32, total: u32) -> f64 {
    if total == 0 { 0.0 } else { score as f64 / total as f64 * 100.0 }
}

#[derive(Resource, Debug, Default)]
pub struct Scoreboard {
    entries: Vec<ScoreEntry>,
}

impl Scoreboard {
    /// Entries from storage may be in any order; they are normalised here.
    pub fn from_entries(entries: Vec<ScoreEntry>) -> Self {
        let mut board = Self { entries };
        board.normalize();
        board
    }

    pub fn entries(&self) -> &[ScoreEntry] {
        &self.entries
    }

    /// Stamps `entry` with `now`, then keeps each mode's best
    /// `MAX_ENTRIES_PER_MODE` entries ordered by percent, newest first on ties.
    pub fn record(&mut self, mut entry: ScoreEntry, now: DateTime<Utc>) {
        entry.date = now;
        self.entries.push(entry);
        self.normalize();
    }

    /// Groups entries by mode, best percent first, and trims each mode.
    fn normalize(&mut self) {
        self.entries.sort_by(|a, b| {
            a.game_mode.cmp(&b.game_mode)
                .then(b.percent.total_cmp(&a.percent))
                .then(b.date.cmp(&a.date))
        });
        let mut per_mode: HashMap<GameMode, usize> = HashMap::new();
        self.entries.retain(|e| {
            let count = per_mode.entry(e.game_mode).or_default();
            *count += 1;
            *count <= MAX_ENTRIES_PER_MODE
        });
    }

    pub fn top_scores(&self, mode: GameMode, limit: usize) -> Vec<&ScoreEntry> {
        self.entries.iter().filter(|e| e.game_mode == mode).take(limit).collect()
    }

    pub fn personal_best(&self, mode: GameMode) -> Option<&ScoreEntry> {
        self.entries.iter().find(|e| e.game_mode == mode)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn from_json(content: &str) -> Self {
        match serde_json::from_str(content) {
            Ok(entries) => Self::from_entries(entries),
            Err(e) => {
                warn!("Failed to parse scoreboard: {}", e);
                Self::default()
            }
        }
    }

    fn load() -> Self {
        match persistence::read(SCOREBOARD_SLOT) {
            Ok(Some(content)) => {
                let board = Self::from_json(&content);
                debug!("Loaded {} score entries", board.entries.len());
                board
            }
            Ok(None) => Self::default(),
            Err(e) => {
                warn!("Failed to read scoreboard: {}", e);
                Self::default()
            }
        }
    }

    pub fn save(&self) {
        let content = match serde_json::to_string_pretty(&self.entries) {
            Ok(content) => content,
            Err(e) => {
                warn!("Failed to serialize scoreboard: {}", e);
                return;
            }
        };
        match persistence::write(SCOREBOARD_SLOT, &content) {
            Ok(()) => debug!("Saved {} score entries", self.entries.len()),
            Err(e) => warn!("Failed to save scoreboard: {}", e),
        }
    }
}

// ============================================================================
// Session scores
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionBest {
    pub score: u32,
    pub total: u32,
}

/// Best results of the current run, plus the region last played in the list game.
#[derive(Resource, Debug, Default)]
pub struct SessionScores {
    best: HashMap<GameMode, SessionBest>,
    pub list_region: Option<String>,
}

impl SessionScores {
    /// Replaces the stored result only when `score` beats it.
    pub fn update(&mut self, mode: GameMode, score: u32, total: u32) {
        let candidate = SessionBest { score, total };
        self.best.entry(mode)
            .and_modify(|best| if score > best.score { *best = candidate })
            .or_insert(candidate);
    }

    pub fn best(&self, mode: GameMode) -> Option<SessionBest> {
        self.best.get(&mode).copied()
    }
}

// ============================================================================
// Events
// ============================================================================

/// Emitted once by a game when its session ends.
#[derive(Event, Debug, Clone)]
pub struct GameFinished {
    pub mode: GameMode,
    pub score: u32,
    pub total: u32,
    pub duration: Duration,
    pub region: Option<String>,
}

impl GameFinished {
    pub fn new(mode: GameMode, score: u32, total: u32, duration: Duration) -> Self {
        Self { mode, score, total, duration, region: None }
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    fn on_trigger(
        trigger: On<GameFinished>,
        mut scoreboard: ResMut<Scoreboard>,
        mut session: ResMut<SessionScores>,
    ) {
        let event = trigger.event();
        info!("{} finished: {}/{}", event.mode.title(), event.score, event.total);

        event.apply(&mut scoreboard, &mut session, Utc::now());
        scoreboard.save();
    }

    /// Records the result in the persistent board and the session bests.
    pub fn apply(&self, scoreboard: &mut Scoreboard, session: &mut SessionScores, now: DateTime<Utc>) {
        session.update(self.mode, self.score, self.total);
        let entry = ScoreEntry::new(self.mode, self.score, self.total, self.duration, self.region.clone());
        scoreboard.record(entry, now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, minute, 0).unwrap()
    }

    fn entry(mode: GameMode, score: u32, total: u32) -> ScoreEntry {
        ScoreEntry::new(mode, score, total, Duration::from_secs(30), None)
    }

    #[test]
    fn percent_handles_zero_total() {
        assert_eq!(percent(3, 4), 75.0);
        assert_eq!(percent(0, 0), 0.0);
    }

    #[test]
    fn record_orders_by_percent_then_newest() {
        let mut board = Scoreboard::default();
        board.record(entry(GameMode::Flag, 5, 10), at(0));
        board.record(entry(GameMode::Flag, 9, 10), at(1));
        board.record(entry(GameMode::Flag, 1, 2), at(2));

        let top = board.top_scores(GameMode::Flag, 10);
        let scores: Vec<(u32, DateTime<Utc>)> = top.iter().map(|e| (e.score, e.date)).collect();
        assert_eq!(scores, vec![(9, at(1)), (1, at(2)), (5, at(0))]);
        assert_eq!(board.personal_best(GameMode::Flag).map(|e| e.score), Some(9));
    }

    #[test]
    fn modes_are_kept_apart() {
        let mut board = Scoreboard::default();
        board.record(entry(GameMode::Hangman, 1, 1), at(0));
        board.record(entry(GameMode::Flag, 2, 10), at(1));

        assert_eq!(board.top_scores(GameMode::Flag, 10).len(), 1);
        assert_eq!(board.top_scores(GameMode::Hangman, 10).len(), 1);
        assert!(board.personal_best(GameMode::Shape).is_none());
    }

    #[test]
    fn keeps_top_hundred_per_mode() {
        let mut board = Scoreboard::default();
        for i in 0..105 {
            board.record(entry(GameMode::Facts, i % 4, 3), at((i % 60) as u32));
        }
        board.record(entry(GameMode::List, 1, 2), at(0));

        assert_eq!(board.top_scores(GameMode::Facts, usize::MAX).len(), MAX_ENTRIES_PER_MODE);
        assert_eq!(board.top_scores(GameMode::List, usize::MAX).len(), 1);
        assert_eq!(board.top_scores(GameMode::Facts, 3).len(), 3);
    }

    #[test]
    fn clear_empties_the_board() {
        let mut board = Scoreboard::default();
        board.record(entry(GameMode::Flag, 1, 10), at(0));
        board.clear();

        assert!(board.entries().is_empty());
    }

    #[test]
    fn json_format_uses_mode_keys_and_rfc3339_dates() {
        let mut board = Scoreboard::default();
        board.record(
            ScoreEntry::new(GameMode::HigherLower, 4, 5, Duration::from_secs(61), Some("Europe".into())),
            at(30),
        );

        let json = serde_json::to_string(board.entries()).unwrap();
        assert!(json.contains("\"game_mode\":\"higher_lower\""));
        assert!(json.contains("\"date\":\"2024-05-01T12:30:00Z\""));
        assert!(json.contains("\"duration\":61"));

        let restored = Scoreboard::from_json(&json);
        assert_eq!(restored.entries(), board.entries());
    }

    #[test]
    fn loaded_entries_are_sorted_best_first() {
        let json = r#"[
            {"game_mode": "flag", "score": 2, "total": 10, "percent": 20.0, "date": "2024-05-01T12:00:00Z", "duration": 40},
            {"game_mode": "hangman", "score": 1, "total": 1, "percent": 100.0, "date": "2024-05-01T12:05:00Z", "duration": 20},
            {"game_mode": "flag", "score": 9, "total": 10, "percent": 90.0, "date": "2024-05-01T11:00:00Z", "duration": 35}
        ]"#;
        let board = Scoreboard::from_json(json);

        assert_eq!(board.personal_best(GameMode::Flag).map(|e| e.score), Some(9));
        let flags: Vec<u32> = board.top_scores(GameMode::Flag, 10).iter().map(|e| e.score).collect();
        assert_eq!(flags, vec![9, 2]);
        assert_eq!(board.entries()[0].game_mode, GameMode::Flag);
    }

    #[test]
    fn loaded_entries_are_trimmed_per_mode() {
        let entries = (0..120).map(|i| entry(GameMode::Shape, i % 7, 7)).collect();
        let board = Scoreboard::from_entries(entries);

        assert_eq!(board.top_scores(GameMode::Shape, usize::MAX).len(), MAX_ENTRIES_PER_MODE);
        assert_eq!(board.personal_best(GameMode::Shape).map(|e| e.score), Some(6));
    }

    #[test]
    fn finished_game_updates_board_and_session() {
        let mut board = Scoreboard::default();
        let mut session = SessionScores::default();

        GameFinished::new(GameMode::List, 3, 8, Duration::from_secs(95))
            .with_region("Europe")
            .apply(&mut board, &mut session, at(15));
        GameFinished::new(GameMode::List, 1, 8, Duration::from_secs(10))
            .apply(&mut board, &mut session, at(20));

        let best = board.personal_best(GameMode::List).unwrap();
        assert_eq!((best.score, best.total, best.duration), (3, 8, 95));
        assert_eq!(best.region.as_deref(), Some("Europe"));
        assert_eq!(best.date, at(15));
        assert_eq!(board.entries().len(), 2);
        assert_eq!(session.best(GameMode::List), Some(SessionBest { score: 3, total: 8 }));
    }

    #[test]
    fn corrupt_json_reads_as_empty() {
        assert!(Scoreboard::from_json("{oops").entries().is_empty());
    }

    #[test]
    fn session_keeps_best_result() {
        let mut session = SessionScores::default();
        session.update(GameMode::Flag, 7, 10);
        session.update(GameMode::Flag, 4, 10);
        session.update(GameMode::HigherLower, 2, 3);
        session.update(GameMode::HigherLower, 1, 2);

        assert_eq!(session.best(GameMode::Flag), Some(SessionBest { score: 7, total: 10 }));
        assert_eq!(session.best(GameMode::HigherLower), Some(SessionBest { score: 2, total: 3 }));
        assert!(session.best(GameMode::Shape).is_none());
    }
}
