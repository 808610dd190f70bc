use crate::game::stats::PlayStats;
use chrono::{DateTime, Utc};
use serde::Serialize;

pub const POINTS_PER_NOTE: u64 = 50;

pub const MIN_STARS: u8 = 3;

// Average multiplier needed for each star count, best first. The ratio must be
// strictly greater than the threshold.
const STAR_THRESHOLDS: [(f64, u8); 6] = [
    (6.0, 9),
    (5.2, 8),
    (4.4, 7),
    (3.6, 6),
    (2.8, 5),
    (2.0, 4),
];

/// Score multiplier for the current grouped streak.
pub fn multiplier_for_streak(streak: u32) -> u64 {
    if streak < 10 {
        1
    } else if streak < 20 {
        2
    } else if streak < 30 {
        3
    } else {
        4
    }
}

/// Star rating from the average multiplier achieved over the track. Anything
/// below the lowest threshold, including an empty track, floors at 3 stars.
pub fn star_count(score: u64, total_notes: usize) -> u8 {
    let base_score = total_notes as u64 * POINTS_PER_NOTE;
    if base_score == 0 {
        return MIN_STARS;
    }
    let average_multiplier = score as f64 / base_score as f64;
    STAR_THRESHOLDS
        .iter()
        .find(|(threshold, _)| average_multiplier > *threshold)
        .map_or(MIN_STARS, |&(_, stars)| stars)
}

/// End-of-song record handed to persistence and the results screen.
#[derive(Clone, Debug, Serialize)]
pub struct PlaySummary {
    pub track: String,
    pub total_notes: usize,
    pub notes_hit: u32,
    pub notes_hit_individual: u32,
    pub best_streak: u32,
    pub score: u64,
    pub stars: u8,
    pub percentage: f64,
    pub failed: bool,
    pub finished: bool,
    pub played_at: DateTime<Utc>,
}

impl PlaySummary {
    pub fn new(track: impl Into<String>, stats: &PlayStats, finished: bool) -> Self {
        Self {
            track: track.into(),
            total_notes: stats.total_notes,
            notes_hit: stats.notes_hit_grouped,
            notes_hit_individual: stats.notes_hit_individual,
            best_streak: stats.best_streak_grouped,
            score: stats.score,
            stars: stats.star_count(),
            percentage: stats.percentage(),
            failed: stats.failed,
            finished,
            played_at: Utc::now(),
        }
    }
}
