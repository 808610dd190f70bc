use fretline::config::Settings;
use fretline::core::input::{ALL_LANES, Lane};
use fretline::game::gameplay::{self, State};
use fretline::game::judgment::Judgment;
use fretline::game::life::MAX_ROCK_METER;
use fretline::game::note::NoteResult;
use fretline::game::timeline::Timeline;
use proptest::prelude::*;
use std::collections::BTreeSet;

#[derive(Clone, Copy, Debug)]
enum Event {
    Press(Lane, i64),
    Tick(i64),
}

fn lane() -> impl Strategy<Value = Lane> {
    (0..ALL_LANES.len()).prop_map(|i| ALL_LANES[i])
}

fn track() -> impl Strategy<Value = Timeline> {
    prop::collection::btree_set((0i64..60, 0usize..5), 0..40).prop_map(|cells: BTreeSet<(i64, usize)>| {
        Timeline::from_tuples(cells.into_iter().map(|(slot, lane)| (slot * 80, ALL_LANES[lane], 0)))
    })
}

/// Presses and ticks with a non-decreasing clock.
fn events() -> impl Strategy<Value = Vec<Event>> {
    prop::collection::vec((0i64..40, prop::bool::weighted(0.8), lane()), 0..120).prop_map(|steps| {
        let mut now = -200;
        steps
            .into_iter()
            .map(|(advance, is_press, lane)| {
                now += advance;
                if is_press { Event::Press(lane, now) } else { Event::Tick(now) }
            })
            .collect()
    })
}

fn apply(state: &mut State, event: Event) -> Vec<Judgment> {
    match event {
        Event::Press(lane, at) => gameplay::handle_lane_press(state, lane, at),
        Event::Tick(at) => gameplay::update(state, at),
    }
}

fn start(timeline: Timeline) -> State {
    gameplay::init("ExpertSingle", timeline, Settings::default())
}

fn check_cursor(state: &State) {
    let notes = state.timeline().notes();
    let next = state.last_resolved_index().map_or(0, |i| i + 1);
    assert!(notes[..next].iter().all(|n| n.result().is_resolved()));
    let pending = state.timeline().chord_range(next);
    assert!(notes[pending.end..].iter().all(|n| n.result() == NoteResult::Unresolved));
    assert!(notes[pending].iter().all(|n| n.result() != NoteResult::Missed));
}

proptest! {
    #[test]
    fn cursor_only_moves_forward(timeline in track(), script in events()) {
        let mut state = start(timeline);
        let mut previous = state.last_resolved_index();
        for event in script {
            apply(&mut state, event);
            let current = state.last_resolved_index();
            prop_assert!(current >= previous);
            check_cursor(&state);
            previous = current;
        }
    }

    #[test]
    fn every_note_resolves_exactly_once(timeline in track(), script in events()) {
        let total = timeline.len();
        let mut state = start(timeline);
        let mut judgments = Vec::new();
        for event in script {
            judgments.extend(apply(&mut state, event));
        }
        judgments.extend(gameplay::update(&mut state, 1_000_000));

        let mut hit_indices = BTreeSet::new();
        let mut missed = 0;
        for judgment in &judgments {
            match *judgment {
                Judgment::LaneHit { note_index, .. } => {
                    prop_assert!(hit_indices.insert(note_index));
                }
                Judgment::Miss { size, .. } => missed += size,
                _ => {}
            }
        }
        prop_assert_eq!(hit_indices.len() + missed, total);
        prop_assert!(state.is_finished());
        prop_assert!(state.timeline().notes().iter().all(|n| n.result().is_resolved()));
    }

    #[test]
    fn only_misses_and_over_hits_break_streaks(timeline in track(), script in events()) {
        let mut state = start(timeline);
        for event in script {
            let before = state.stats().note_streak_grouped;
            let judgments = apply(&mut state, event);
            let after = state.stats().note_streak_grouped;

            let last_break = judgments.iter().rposition(Judgment::breaks_streak);
            let tail = last_break.map_or(&judgments[..], |i| &judgments[i + 1..]);
            let chord_hits = tail.iter().filter(|j| matches!(j, Judgment::ChordHit { .. })).count() as u32;
            let expected = if last_break.is_some() { chord_hits } else { before + chord_hits };
            prop_assert_eq!(after, expected);
        }
    }

    #[test]
    fn rock_meter_is_clamped_and_failure_latches(timeline in track(), script in events()) {
        let mut state = start(timeline);
        let mut was_failed = false;
        for event in script {
            apply(&mut state, event);
            let stats = state.stats();
            prop_assert!(stats.rock_meter <= MAX_ROCK_METER);
            if stats.rock_meter < 0.0 || was_failed {
                prop_assert!(stats.failed);
            }
            was_failed = stats.failed;
        }
    }

    #[test]
    fn chord_lanes_can_be_pressed_in_any_order(
        lanes in prop::sample::subsequence(ALL_LANES.to_vec(), 1..=5).prop_shuffle(),
        offset in -100i64..=100,
    ) {
        let mut sorted = lanes.clone();
        sorted.sort();
        let timeline = || Timeline::from_tuples(sorted.iter().map(|&lane| (1000, lane, 0)));

        let mut shuffled = start(timeline());
        for &lane in &lanes {
            gameplay::handle_lane_press(&mut shuffled, lane, 1000 + offset);
        }
        let mut in_order = start(timeline());
        for &lane in &sorted {
            gameplay::handle_lane_press(&mut in_order, lane, 1000 + offset);
        }

        prop_assert_eq!(shuffled.stats(), in_order.stats());
        prop_assert_eq!(shuffled.stats().notes_hit_grouped, 1);
        prop_assert_eq!(shuffled.stats().notes_hit_individual, lanes.len() as u32);
        prop_assert!(shuffled.is_finished());
    }
}
