use crate::config::Settings;
use crate::core::input::{LANE_COUNT, Lane};
use crate::game::judgment::Judgment;
use crate::game::note::NoteResult;
use crate::game::scores::PlaySummary;
use crate::game::stats::PlayStats;
use crate::game::timeline::Timeline;
use log::{debug, info, warn};
use std::ops::Range;

/// Last press on a lane, kept for the fret flash.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LaneFeedback {
    pub played_correctly: bool,
    pub over_hit: bool,
    pub at_ms: i64,
}

/// One play session of one track.
///
/// Every note before `next_index` is resolved. Notes from `next_index` on belong
/// to the pending chord (some of which may already be Hit) or are Unresolved.
pub struct State {
    pub track_name: String,
    timeline: Timeline,
    next_index: usize,
    stats: PlayStats,
    settings: Settings,
    lane_feedback: [Option<LaneFeedback>; LANE_COUNT],
    last_hit_chord: Option<Range<usize>>,
    current_time_ms: i64,
}

impl State {
    #[inline(always)]
    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    #[inline(always)]
    pub fn stats(&self) -> &PlayStats {
        &self.stats
    }

    #[inline(always)]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Index of the last note behind the cursor, `None` before anything resolved.
    #[inline(always)]
    pub fn last_resolved_index(&self) -> Option<usize> {
        self.next_index.checked_sub(1)
    }

    #[inline(always)]
    pub fn lane_feedback(&self) -> &[Option<LaneFeedback>; LANE_COUNT] {
        &self.lane_feedback
    }

    /// Latest clock value the engine has seen, `None` before the first call.
    pub fn current_time_ms(&self) -> Option<i64> {
        (self.current_time_ms != i64::MIN).then_some(self.current_time_ms)
    }

    /// Whether every note of the timeline is resolved.
    #[inline(always)]
    pub fn is_finished(&self) -> bool {
        self.next_index == self.timeline.len()
    }
}

pub fn init(track_name: impl Into<String>, timeline: Timeline, settings: Settings) -> State {
    let track_name = track_name.into();
    let total_notes = timeline.grouped_note_count();
    info!(
        "Starting '{}': {} notes ({} chords), hit window ±{}ms",
        track_name,
        timeline.len(),
        total_notes,
        settings.hit_window_ms
    );
    State {
        track_name,
        stats: PlayStats::new(total_notes, settings.initial_rock_meter, settings.life_change),
        timeline,
        next_index: 0,
        settings,
        lane_feedback: [None; LANE_COUNT],
        last_hit_chord: None,
        current_time_ms: i64::MIN,
    }
}

/// Judges one lane press at `now_ms`. Expired chords are missed first, then the
/// press either hits a note of the pending chord or is an over-hit.
pub fn handle_lane_press(state: &mut State, lane: Lane, now_ms: i64) -> Vec<Judgment> {
    let now_ms = advance_clock(state, now_ms);
    let mut judgments = Vec::new();
    skip_expired_chords(state, now_ms, &mut judgments);
    press_lane(state, lane, now_ms, &mut judgments);
    judgments
}

/// Clock tick: misses every chord whose window has closed.
pub fn update(state: &mut State, now_ms: i64) -> Vec<Judgment> {
    let now_ms = advance_clock(state, now_ms);
    let mut judgments = Vec::new();
    skip_expired_chords(state, now_ms, &mut judgments);
    judgments
}

/// Presses every lane of the most recently completed chord again. Without a
/// previous hit this is a strum on nothing and counts as one over-hit.
pub fn replay_last_hit(state: &mut State, now_ms: i64) -> Vec<Judgment> {
    let now_ms = advance_clock(state, now_ms);
    let mut judgments = Vec::new();
    skip_expired_chords(state, now_ms, &mut judgments);

    let Some(range) = state.last_hit_chord.clone() else {
        emit(state, Judgment::OverHit { lane: None }, &mut judgments);
        return judgments;
    };
    let lanes: Vec<Lane> = state.timeline.notes()[range].iter().map(|n| n.lane).collect();
    for lane in lanes {
        press_lane(state, lane, now_ms, &mut judgments);
    }
    judgments
}

pub fn summary(state: &State) -> PlaySummary {
    PlaySummary::new(state.track_name.as_str(), &state.stats, state.is_finished())
}

fn advance_clock(state: &mut State, now_ms: i64) -> i64 {
    if now_ms < state.current_time_ms {
        warn!(
            "Clock went backwards ({}ms after {}ms), holding at {}ms.",
            now_ms, state.current_time_ms, state.current_time_ms
        );
        return state.current_time_ms;
    }
    state.current_time_ms = now_ms;
    now_ms
}

fn skip_expired_chords(state: &mut State, now_ms: i64, judgments: &mut Vec<Judgment>) {
    let window = state.settings.hit_window_ms;
    while let Some(first) = state.timeline.get(state.next_index) {
        if first.timestamp_ms.saturating_add(window) >= now_ms {
            break;
        }
        let range = state.timeline.chord_range(state.next_index);
        let mut missed = 0;
        for index in range.clone() {
            if !state.timeline.notes()[index].result().is_resolved() {
                state.timeline.resolve(index, NoteResult::Missed);
                missed += 1;
            }
        }
        let first_index = range.start;
        advance_past(state, range);
        emit(
            state,
            Judgment::Miss {
                first_index,
                size: missed,
            },
            judgments,
        );
    }
}

fn press_lane(state: &mut State, lane: Lane, now_ms: i64, judgments: &mut Vec<Judgment>) {
    let hit = try_hit(state, lane, now_ms, judgments);
    state.lane_feedback[lane.index()] = Some(LaneFeedback {
        played_correctly: hit,
        over_hit: !hit,
        at_ms: now_ms,
    });
    if !hit {
        emit(state, Judgment::OverHit { lane: Some(lane) }, judgments);
    }
}

fn try_hit(state: &mut State, lane: Lane, now_ms: i64, judgments: &mut Vec<Judgment>) -> bool {
    let range = state.timeline.chord_range(state.next_index);
    let Some(first) = state.timeline.get(range.start) else {
        return false;
    };
    if now_ms.abs_diff(first.timestamp_ms) > state.settings.hit_window_ms.unsigned_abs() {
        return false;
    }
    let time_error_ms = now_ms - first.timestamp_ms;
    let notes = state.timeline.notes();
    let Some(note_index) = range
        .clone()
        .find(|&i| notes[i].lane == lane && !notes[i].result().is_resolved())
    else {
        return false;
    };

    state.timeline.resolve(note_index, NoteResult::Hit);
    emit(
        state,
        Judgment::LaneHit {
            note_index,
            lane,
            time_error_ms,
        },
        judgments,
    );

    let notes = state.timeline.notes();
    if range.clone().all(|i| notes[i].result() == NoteResult::Hit) {
        let judgment = Judgment::ChordHit {
            first_index: range.start,
            size: range.len(),
        };
        advance_past(state, range.clone());
        state.last_hit_chord = Some(range);
        emit(state, judgment, judgments);
    }
    true
}

fn advance_past(state: &mut State, chord: Range<usize>) {
    assert_eq!(chord.start, state.next_index, "cursor must advance one chord at a time");
    assert!(
        chord.end > chord.start && chord.end <= state.timeline.len(),
        "cursor advanced out of range: {:?} of {}",
        chord,
        state.timeline.len()
    );
    state.next_index = chord.end;
}

fn emit(state: &mut State, judgment: Judgment, judgments: &mut Vec<Judgment>) {
    state.stats.apply(&judgment);
    debug!(
        "{:?} at {}ms: streak {} ({} individual), meter {:.3}",
        judgment,
        state.current_time_ms,
        state.stats.note_streak_grouped,
        state.stats.note_streak_individual,
        state.stats.rock_meter
    );
    judgments.push(judgment);
}
