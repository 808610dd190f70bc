use crate::core::input::Lane;
use crate::game::note::{NoteResult, PlayableNote};
use std::ops::Range;

/// Ordered notes of one track. Only the per-note result changes after load.
#[derive(Clone, Debug, Default)]
pub struct Timeline {
    notes: Vec<PlayableNote>,
    longest_sustain_ms: i64,
}

impl Timeline {
    /// Builds a timeline from notes already sorted by timestamp. Notes that
    /// share a timestamp are ordered by lane so chord scans are stable.
    pub(crate) fn from_sorted(mut notes: Vec<PlayableNote>) -> Self {
        debug_assert!(notes.windows(2).all(|w| w[0].timestamp_ms <= w[1].timestamp_ms));
        notes.sort_by_key(|n| (n.timestamp_ms, n.lane));
        Self::with_notes(notes)
    }

    /// Convenience for hosts and tests holding `(timestamp, lane, sustain)` tuples.
    /// Input order does not matter.
    pub fn from_tuples<I>(tuples: I) -> Self
    where
        I: IntoIterator<Item = (i64, Lane, i64)>,
    {
        let mut notes: Vec<PlayableNote> = tuples
            .into_iter()
            .map(|(ts, lane, sustain)| PlayableNote::new(ts, lane, sustain))
            .collect();
        notes.sort_by_key(|n| (n.timestamp_ms, n.lane));
        Self::with_notes(notes)
    }

    fn with_notes(notes: Vec<PlayableNote>) -> Self {
        let longest_sustain_ms = notes.iter().map(|n| n.sustain_ms).max().unwrap_or(0);
        Self {
            notes,
            longest_sustain_ms,
        }
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.notes.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    #[inline(always)]
    pub fn notes(&self) -> &[PlayableNote] {
        &self.notes
    }

    #[inline(always)]
    pub fn get(&self, index: usize) -> Option<&PlayableNote> {
        self.notes.get(index)
    }

    /// Index range of the chord starting at `index`: the run of notes sharing
    /// `notes[index].timestamp_ms`. Empty when `index` is out of bounds.
    pub fn chord_range(&self, index: usize) -> Range<usize> {
        let Some(first) = self.notes.get(index) else {
            return index..index;
        };
        let len = self.notes[index..]
            .iter()
            .take_while(|n| n.timestamp_ms == first.timestamp_ms)
            .count();
        index..index + len
    }

    pub fn chord_at(&self, index: usize) -> &[PlayableNote] {
        self.notes.get(self.chord_range(index)).unwrap_or(&[])
    }

    /// Note count with each chord counted once.
    pub fn grouped_note_count(&self) -> usize {
        let Some(first) = self.notes.first() else {
            return 0;
        };
        let mut count = 1;
        let mut prev = first.timestamp_ms;
        for note in &self.notes[1..] {
            if note.timestamp_ms != prev {
                count += 1;
                prev = note.timestamp_ms;
            }
        }
        count
    }

    pub(crate) fn resolve(&mut self, index: usize, result: NoteResult) {
        self.notes[index].resolve(result);
    }

    #[inline(always)]
    pub fn longest_sustain_ms(&self) -> i64 {
        self.longest_sustain_ms
    }

    /// First index whose timestamp is at or after `time_ms`.
    pub fn first_index_at_or_after(&self, time_ms: i64) -> usize {
        self.notes.partition_point(|n| n.timestamp_ms < time_ms)
    }

    /// Time of the last moment any note is still on the board (tail of the longest sustain).
    pub fn last_note_end_ms(&self) -> Option<i64> {
        self.notes.iter().map(PlayableNote::end_ms).max()
    }
}
