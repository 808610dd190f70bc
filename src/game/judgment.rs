use crate::core::input::Lane;

/// Outcome of a press or tick as seen by the scoring side.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Judgment {
    /// One lane of the pending chord was struck. Scoring waits for the chord to complete.
    LaneHit {
        note_index: usize,
        lane: Lane,
        time_error_ms: i64,
    },
    /// Every note of a chord has been hit. `size` is the chord's note count.
    ChordHit { first_index: usize, size: usize },
    /// A chord's window elapsed. `size` counts the notes that were still unresolved.
    Miss { first_index: usize, size: usize },
    /// A press that matched no pending note. `None` is a strum with no fret held.
    OverHit { lane: Option<Lane> },
}

impl Judgment {
    /// Whether this outcome resets both streak counters.
    #[inline(always)]
    pub const fn breaks_streak(&self) -> bool {
        matches!(self, Judgment::Miss { .. } | Judgment::OverHit { .. })
    }
}
