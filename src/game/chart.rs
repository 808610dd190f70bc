use crate::core::input::Lane;
use crate::error::{Error, Result};
use crate::game::note::PlayableNote;
use crate::game::timeline::Timeline;
use log::info;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Expert,
}

pub const ALL_DIFFICULTIES: [Difficulty; 4] = [
    Difficulty::Easy,
    Difficulty::Medium,
    Difficulty::Hard,
    Difficulty::Expert,
];

impl Difficulty {
    pub const fn name(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
            Difficulty::Expert => "Expert",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Instrument {
    /// Lead guitar.
    Single,
    DoubleBass,
    DoubleGuitar,
}

pub const ALL_INSTRUMENTS: [Instrument; 3] = [
    Instrument::Single,
    Instrument::DoubleBass,
    Instrument::DoubleGuitar,
];

impl Instrument {
    pub const fn name(self) -> &'static str {
        match self {
            Instrument::Single => "Single",
            Instrument::DoubleBass => "DoubleBass",
            Instrument::DoubleGuitar => "DoubleGuitar",
        }
    }
}

/// Chart section name such as `ExpertSingle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrackName {
    pub difficulty: Difficulty,
    pub instrument: Instrument,
}

impl Default for TrackName {
    fn default() -> Self {
        TrackName {
            difficulty: Difficulty::Expert,
            instrument: Instrument::Single,
        }
    }
}

impl fmt::Display for TrackName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.difficulty.name(), self.instrument.name())
    }
}

fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix).then(|| &s[prefix.len()..])
}

impl FromStr for TrackName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let (difficulty, rest) = ALL_DIFFICULTIES
            .iter()
            .find_map(|d| strip_prefix_ignore_case(trimmed, d.name()).map(|rest| (*d, rest)))
            .ok_or_else(|| Error::InvalidTrackName(trimmed.to_string()))?;
        let instrument = ALL_INSTRUMENTS
            .iter()
            .copied()
            .find(|i| i.name().eq_ignore_ascii_case(rest))
            .ok_or_else(|| Error::InvalidTrackName(trimmed.to_string()))?;
        Ok(TrackName {
            difficulty,
            instrument,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ChartNote {
    pub time: i64,
    pub lane: Lane,
    #[serde(default)]
    pub sustain: i64,
}

/// Parsed chart: song metadata plus the note list of every track.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Chart {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub artist: String,
    #[serde(default)]
    pub tracks: BTreeMap<String, Vec<ChartNote>>,
}

pub fn parse(bytes: &[u8]) -> Result<Chart> {
    Ok(serde_json::from_slice(bytes)?)
}

pub fn load(path: &Path) -> Result<Chart> {
    let bytes = fs::read(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let chart = parse(&bytes)?;
    info!(
        "Loaded chart '{}' by '{}' from '{}' ({} tracks)",
        chart.title,
        chart.artist,
        path.display(),
        chart.tracks.len()
    );
    Ok(chart)
}

impl Chart {
    /// Tracks with a recognised name, in sorted order.
    pub fn track_names(&self) -> Vec<TrackName> {
        let mut names: Vec<TrackName> = self.tracks.keys().filter_map(|k| k.parse().ok()).collect();
        names.sort();
        names
    }

    fn find_track(&self, name: TrackName) -> Option<&[ChartNote]> {
        self.tracks
            .iter()
            .find(|(key, _)| key.parse::<TrackName>().is_ok_and(|k| k == name))
            .map(|(_, notes)| notes.as_slice())
    }

    /// Builds the playable timeline for one track. Notes must be sorted by time;
    /// notes sharing a time form a chord.
    pub fn track(&self, name: TrackName) -> Result<Timeline> {
        let Some(notes) = self.find_track(name) else {
            let available: Vec<String> = self.track_names().iter().map(ToString::to_string).collect();
            return Err(Error::TrackNotFound {
                track: name.to_string(),
                available: available.join(", "),
            });
        };

        if let Some(index) = (1..notes.len()).find(|&i| notes[i].time < notes[i - 1].time) {
            return Err(Error::UnsortedNotes {
                track: name.to_string(),
                index,
            });
        }

        let notes = notes
            .iter()
            .map(|n| PlayableNote::new(n.time, n.lane, n.sustain))
            .collect();
        Ok(Timeline::from_sorted(notes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::Lane::*;

    const SAMPLE: &str = r#"{
        "title": "Through the Fire",
        "artist": "Test Band",
        "tracks": {
            "ExpertSingle": [
                { "time": 1000, "lane": "green" },
                { "time": 1500, "lane": "yellow", "sustain": 250 },
                { "time": 1500, "lane": "red" },
                { "time": 2000, "lane": "orange" }
            ],
            "easyDoubleBass": [
                { "time": 1000, "lane": "green" }
            ],
            "Events": []
        }
    }"#;

    #[test]
    fn track_names_round_trip() {
        for difficulty in ALL_DIFFICULTIES {
            for instrument in ALL_INSTRUMENTS {
                let name = TrackName {
                    difficulty,
                    instrument,
                };
                assert_eq!(name.to_string().parse::<TrackName>().unwrap(), name);
            }
        }
        assert_eq!(TrackName::default().to_string(), "ExpertSingle");
        assert_eq!(
            "hardDoubleGuitar".parse::<TrackName>().unwrap(),
            TrackName {
                difficulty: Difficulty::Hard,
                instrument: Instrument::DoubleGuitar
            }
        );
    }

    #[test]
    fn bad_track_names_are_rejected() {
        for bad in ["", "Expert", "Single", "ExpertDrums", "InsaneSingle", "ExpertSingleX"] {
            assert!(
                matches!(bad.parse::<TrackName>(), Err(Error::InvalidTrackName(_))),
                "{bad} should not parse"
            );
        }
    }

    #[test]
    fn track_builds_a_timeline_with_lane_ordered_chords() {
        let chart = parse(SAMPLE.as_bytes()).unwrap();
        assert_eq!(chart.title, "Through the Fire");
        let timeline = chart.track(TrackName::default()).unwrap();
        assert_eq!(timeline.len(), 4);
        assert_eq!(timeline.grouped_note_count(), 3);
        let chord: Vec<Lane> = timeline.chord_at(1).iter().map(|n| n.lane).collect();
        assert_eq!(chord, vec![Red, Yellow]);
        assert_eq!(timeline.notes()[2].sustain_ms, 250);
    }

    #[test]
    fn track_lookup_ignores_case_and_unknown_sections() {
        let chart = parse(SAMPLE.as_bytes()).unwrap();
        let easy_bass = "EasyDoubleBass".parse().unwrap();
        assert_eq!(chart.track(easy_bass).unwrap().len(), 1);
        assert_eq!(chart.track_names().len(), 2);
    }

    #[test]
    fn missing_track_lists_available_ones() {
        let chart = parse(SAMPLE.as_bytes()).unwrap();
        let err = chart.track("MediumSingle".parse().unwrap()).unwrap_err();
        match err {
            Error::TrackNotFound { track, available } => {
                assert_eq!(track, "MediumSingle");
                assert_eq!(available, "EasyDoubleBass, ExpertSingle");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unsorted_track_is_rejected() {
        let chart = parse(
            br#"{ "tracks": { "ExpertSingle": [
                { "time": 1000, "lane": "green" },
                { "time": 900, "lane": "red" }
            ] } }"#,
        )
        .unwrap();
        assert!(matches!(
            chart.track(TrackName::default()),
            Err(Error::UnsortedNotes { index: 1, .. })
        ));
    }

    #[test]
    fn malformed_chart_is_a_json_error() {
        assert!(matches!(parse(b"{ \"tracks\": 5 }"), Err(Error::Json(_))));
        let bad_lane = br#"{ "tracks": { "ExpertSingle": [ { "time": 1, "lane": "purple" } ] } }"#;
        assert!(matches!(parse(bad_lane), Err(Error::Json(_))));
    }

    #[test]
    fn load_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("song.json");
        fs::write(&path, SAMPLE).unwrap();
        let chart = load(&path).unwrap();
        assert_eq!(chart.artist, "Test Band");

        let missing = load(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(
            missing,
            Error::Io { ref source, .. } if source.kind() == std::io::ErrorKind::NotFound
        ));
    }
}
