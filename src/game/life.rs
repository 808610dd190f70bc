// Rock meter tuning. The meter starts half full, a full meter is 1.0 and the
// player fails the moment it drops below 0.0.

pub const INITIAL_ROCK_METER: f64 = 0.5;
pub const MAX_ROCK_METER: f64 = 1.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LifeChange {
    pub increment: f64,
    pub decrement: f64,
}

impl LifeChange {
    pub const HIT: f64 = 0.02;
    pub const MISS: f64 = 0.025;
}

impl Default for LifeChange {
    fn default() -> Self {
        Self {
            increment: Self::HIT,
            decrement: Self::MISS,
        }
    }
}

/// Bigger chords move the meter further in either direction.
pub fn chord_size_multiplier(size: usize) -> f64 {
    match size {
        1 => 1.0,
        2 => 1.2,
        3 => 1.4,
        4 => 1.7,
        5 => 2.0,
        _ => 1.0,
    }
}
