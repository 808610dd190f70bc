use crate::game::judgment::Judgment;
use crate::game::life::{self, LifeChange, MAX_ROCK_METER};
use crate::game::scores::{self, POINTS_PER_NOTE};
use log::info;

/// Running tally for one play session.
///
/// "Grouped" counters treat a chord as a single unit, "individual" counters
/// count every lane of it.
#[derive(Clone, Debug, PartialEq)]
pub struct PlayStats {
    pub total_notes: usize,
    pub notes_hit_grouped: u32,
    pub note_streak_grouped: u32,
    pub notes_hit_individual: u32,
    pub note_streak_individual: u32,
    pub best_streak_grouped: u32,
    pub score: u64,
    pub rock_meter: f64,
    pub failed: bool,
    life_change: LifeChange,
}

impl PlayStats {
    pub fn new(total_notes: usize, initial_rock_meter: f64, life_change: LifeChange) -> Self {
        Self {
            total_notes,
            notes_hit_grouped: 0,
            note_streak_grouped: 0,
            notes_hit_individual: 0,
            note_streak_individual: 0,
            best_streak_grouped: 0,
            score: 0,
            rock_meter: initial_rock_meter.min(MAX_ROCK_METER),
            failed: false,
            life_change,
        }
    }

    /// Feeds one judgment into the economy. Lane hits are bookkeeping only:
    /// the chord pays out when it completes.
    pub fn apply(&mut self, judgment: &Judgment) {
        match *judgment {
            Judgment::LaneHit { .. } => {}
            Judgment::ChordHit { size, .. } => self.hit_chord(size),
            Judgment::Miss { size, .. } => self.miss_chord(size),
            Judgment::OverHit { .. } => self.over_hit(),
        }
    }

    pub fn hit_chord(&mut self, size: usize) {
        let size_u32 = size as u32;
        self.notes_hit_grouped = self.notes_hit_grouped.saturating_add(1);
        self.note_streak_grouped = self.note_streak_grouped.saturating_add(1);
        self.notes_hit_individual = self.notes_hit_individual.saturating_add(size_u32);
        self.note_streak_individual = self.note_streak_individual.saturating_add(size_u32);
        self.best_streak_grouped = self.best_streak_grouped.max(self.note_streak_grouped);

        self.raise_rock_meter(self.life_change.increment * life::chord_size_multiplier(size));
        self.score += POINTS_PER_NOTE * size as u64 * self.multiplier();
    }

    pub fn miss_chord(&mut self, size: usize) {
        self.lower_rock_meter(self.life_change.decrement * life::chord_size_multiplier(size));
        self.reset_streaks();
    }

    pub fn over_hit(&mut self) {
        self.lower_rock_meter(self.life_change.decrement * life::chord_size_multiplier(1));
        self.reset_streaks();
    }

    #[inline(always)]
    pub fn multiplier(&self) -> u64 {
        scores::multiplier_for_streak(self.note_streak_grouped)
    }

    /// Share of chords hit, in `0.0..=1.0`.
    pub fn percentage(&self) -> f64 {
        if self.total_notes == 0 {
            return 0.0;
        }
        self.notes_hit_grouped as f64 / self.total_notes as f64
    }

    pub fn star_count(&self) -> u8 {
        scores::star_count(self.score, self.total_notes)
    }

    /// The meter as a UI gauge would draw it.
    pub fn rock_meter_display(&self) -> f64 {
        self.rock_meter.clamp(0.0, MAX_ROCK_METER)
    }

    fn reset_streaks(&mut self) {
        self.note_streak_grouped = 0;
        self.note_streak_individual = 0;
    }

    fn raise_rock_meter(&mut self, amount: f64) {
        self.rock_meter = (self.rock_meter + amount).min(MAX_ROCK_METER);
    }

    fn lower_rock_meter(&mut self, amount: f64) {
        self.rock_meter -= amount;
        if self.rock_meter < 0.0 && !self.failed {
            self.failed = true;
            info!("Player has failed! Rock meter at {:.3}", self.rock_meter);
        }
    }
}

impl Default for PlayStats {
    fn default() -> Self {
        Self::new(0, life::INITIAL_ROCK_METER, LifeChange::default())
    }
}
