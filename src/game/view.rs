use crate::core::input::{ALL_LANES, LANE_COUNT, Lane};
use crate::game::gameplay::State;
use crate::game::note::NoteResult;
use crate::game::stats::PlayStats;
use serde::Serialize;

/// Rows drawn below the strum line, for notes that just went past.
pub const STRUM_LINE_MARGIN: usize = 4;
/// How long a fret stays lit after a press.
pub const FEEDBACK_DURATION_MS: i64 = 150;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize)]
pub enum Cell {
    #[default]
    Empty,
    Note(NoteResult),
    Sustain,
}

/// One row of the fret board covering `[start_ms, start_ms + line_time)`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NoteLine {
    pub start_ms: i64,
    pub cells: [Cell; LANE_COUNT],
}

impl NoteLine {
    #[inline(always)]
    pub fn cell(&self, lane: Lane) -> Cell {
        self.cells[lane.index()]
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|c| *c == Cell::Empty)
    }
}

/// Fret flash for one lane. Both flags are false once the flash has faded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct LaneState {
    pub lane: Lane,
    pub played_correctly: bool,
    pub over_hit: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct StatsView {
    pub score: u64,
    pub note_streak: u32,
    pub multiplier: u64,
    pub rock_meter: f64,
    pub failed: bool,
}

impl From<&PlayStats> for StatsView {
    fn from(stats: &PlayStats) -> Self {
        Self {
            score: stats.score,
            note_streak: stats.note_streak_grouped,
            multiplier: stats.multiplier(),
            rock_meter: stats.rock_meter_display(),
            failed: stats.failed,
        }
    }
}

/// Read-only snapshot of a session, top row furthest in the future.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ViewModel {
    pub now_ms: i64,
    pub strum_line: usize,
    pub rows: Vec<NoteLine>,
    pub lanes: [LaneState; LANE_COUNT],
    pub stats: StatsView,
}

pub fn build(state: &State, now_ms: i64) -> ViewModel {
    let settings = state.settings();
    let height = settings.fret_board_height;
    let line_time = settings.line_time_ms;
    let strum_line = height.saturating_sub(STRUM_LINE_MARGIN);
    let strum = strum_line as i64;
    let lowest_offset = strum - (height as i64 - 1);

    let mut rows: Vec<NoteLine> = (0..height as i64)
        .map(|r| NoteLine {
            start_ms: now_ms + (strum - r) * line_time,
            cells: [Cell::Empty; LANE_COUNT],
        })
        .collect();

    let timeline = state.timeline();
    let view_start = now_ms + lowest_offset * line_time;
    let view_end = now_ms + (strum + 1) * line_time;
    let first = timeline.first_index_at_or_after(view_start.saturating_sub(timeline.longest_sustain_ms()));

    for note in timeline.notes()[first..]
        .iter()
        .take_while(|n| n.timestamp_ms < view_end)
    {
        let lane = note.lane.index();
        let head_offset = (note.timestamp_ms - now_ms).div_euclid(line_time);
        let tail_offset = (note.end_ms() - now_ms).div_euclid(line_time);

        for offset in (head_offset + 1).max(lowest_offset)..=tail_offset.min(strum) {
            let cell = &mut rows[(strum - offset) as usize].cells[lane];
            if *cell == Cell::Empty {
                *cell = Cell::Sustain;
            }
        }
        if (lowest_offset..=strum).contains(&head_offset) {
            rows[(strum - head_offset) as usize].cells[lane] = Cell::Note(note.result());
        }
    }

    let feedback = state.lane_feedback();
    let lanes = ALL_LANES.map(|lane| {
        let active = feedback[lane.index()]
            .filter(|f| (0..FEEDBACK_DURATION_MS).contains(&(now_ms - f.at_ms)));
        LaneState {
            lane,
            played_correctly: active.is_some_and(|f| f.played_correctly),
            over_hit: active.is_some_and(|f| f.over_hit),
        }
    });

    ViewModel {
        now_ms,
        strum_line,
        rows,
        lanes,
        stats: StatsView::from(state.stats()),
    }
}
