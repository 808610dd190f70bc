use crate::core::input::Lane;
use serde::Serialize;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default, Serialize)]
pub enum NoteResult {
    #[default]
    Unresolved,
    Hit,
    Missed,
}

impl NoteResult {
    #[inline(always)]
    pub const fn is_resolved(self) -> bool {
        !matches!(self, NoteResult::Unresolved)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayableNote {
    pub timestamp_ms: i64,
    pub lane: Lane,
    pub sustain_ms: i64,
    result: NoteResult,
}

impl PlayableNote {
    pub fn new(timestamp_ms: i64, lane: Lane, sustain_ms: i64) -> Self {
        Self {
            timestamp_ms,
            lane,
            sustain_ms: sustain_ms.max(0),
            result: NoteResult::Unresolved,
        }
    }

    #[inline(always)]
    pub fn result(&self) -> NoteResult {
        self.result
    }

    #[inline(always)]
    pub fn end_ms(&self) -> i64 {
        self.timestamp_ms + self.sustain_ms
    }

    /// Resolution is one-way: a note leaves `Unresolved` exactly once.
    pub(crate) fn resolve(&mut self, result: NoteResult) {
        assert!(
            !self.result.is_resolved() && result.is_resolved(),
            "note at {}ms ({}) resolved twice: {:?} -> {:?}",
            self.timestamp_ms,
            self.lane,
            self.result,
            result
        );
        self.result = result;
    }
}
