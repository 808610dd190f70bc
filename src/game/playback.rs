use crate::core::input::InputEdge;
use crate::game::gameplay::{self, State};
use crate::game::judgment::Judgment;
use crate::game::timeline::Timeline;
use log::{debug, info};

pub const DEFAULT_TICK_MS: i64 = 10;

#[derive(Debug, Clone, Default)]
pub struct PlaybackOutcome {
    pub judgments: Vec<Judgment>,
    pub ended_at_ms: i64,
    pub stopped_on_failure: bool,
    /// Presses that came after the song was over.
    pub ignored_presses: usize,
}

/// A perfect input log: every note pressed on its timestamp.
pub fn autoplay(timeline: &Timeline) -> Vec<InputEdge> {
    timeline
        .notes()
        .iter()
        .map(|n| InputEdge {
            lane: n.lane,
            at_ms: n.timestamp_ms,
        })
        .collect()
}

/// Clock value after which the last note can no longer be hit.
pub fn song_end_ms(state: &State) -> i64 {
    let last = state.timeline().last_note_end_ms().unwrap_or(0);
    last + state.settings().hit_window_ms + 1
}

/// Plays a session like the host loop would: the clock starts at the lead-in,
/// ticks every `tick_ms`, and each press is delivered at its own time. Stops
/// as soon as the player fails.
pub fn run(state: &mut State, presses: &[InputEdge], tick_ms: i64) -> PlaybackOutcome {
    let tick_ms = tick_ms.max(1);
    let start = -state.settings().lead_in_ms;
    let end = song_end_ms(state);
    let mut outcome = PlaybackOutcome::default();
    let mut pending = presses.iter().peekable();
    let mut now = start;

    info!(
        "Playing '{}' from {}ms to {}ms, {} presses",
        state.track_name,
        start,
        end,
        presses.len()
    );

    'song: loop {
        while let Some(press) = pending.next_if(|p| p.at_ms <= now) {
            outcome
                .judgments
                .extend(gameplay::handle_lane_press(state, press.lane, press.at_ms));
            if state.stats().failed {
                outcome.stopped_on_failure = true;
                break 'song;
            }
        }
        outcome.judgments.extend(gameplay::update(state, now));
        if state.stats().failed {
            outcome.stopped_on_failure = true;
            break;
        }
        if now >= end {
            break;
        }
        now = (now + tick_ms).min(end);
    }

    outcome.ended_at_ms = state.current_time_ms().unwrap_or(now);
    outcome.ignored_presses = pending.count();
    if outcome.ignored_presses > 0 {
        debug!("{} presses after the end of the song were ignored", outcome.ignored_presses);
    }
    if outcome.stopped_on_failure {
        info!("Session failed at {}ms", outcome.ended_at_ms);
    } else {
        info!("Session finished at {}ms", outcome.ended_at_ms);
    }
    outcome
}
