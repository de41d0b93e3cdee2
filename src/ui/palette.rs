use bevy_egui::egui::Color32;

/// Neutral fill for table header tiles.
pub const TILE: Color32 = Color32::from_rgb(100, 100, 100);
pub const GOOD: Color32 = Color32::from_rgb(0, 200, 0);
pub const CLOSE: Color32 = Color32::from_rgb(255, 200, 0);
pub const FAIR: Color32 = Color32::from_rgb(255, 140, 0);
pub const BAD: Color32 = Color32::from_rgb(220, 0, 0);

pub const ANSWER_CORRECT: Color32 = Color32::from_rgb(30, 180, 80);
pub const ANSWER_WRONG: Color32 = Color32::from_rgb(255, 99, 71);

const SCORE_HIGH: Color32 = Color32::from_rgb(144, 238, 144);
const SCORE_MID: Color32 = Color32::from_rgb(255, 165, 0);
const SCORE_LOW: Color32 = Color32::from_rgb(255, 99, 71);
const SCORE_NONE: Color32 = Color32::from_rgb(200, 200, 200);

/// Background of a dashboard score box: >=70% green, >=40% orange, else red.
pub fn score_color(score: u32, total: u32) -> Color32 {
    if total == 0 {
        return SCORE_NONE;
    }
    let percent = crate::scoreboard::percent(score, total);
    if percent >= 70.0 {
        SCORE_HIGH
    } else if percent >= 40.0 {
        SCORE_MID
    } else {
        SCORE_LOW
    }
}
