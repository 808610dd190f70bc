use crate::error::{Error, Result};
use log::info;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

pub const LANE_COUNT: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Lane {
    Green = 0,
    Red = 1,
    Yellow = 2,
    Blue = 3,
    Orange = 4,
}

pub const ALL_LANES: [Lane; LANE_COUNT] = [
    Lane::Green,
    Lane::Red,
    Lane::Yellow,
    Lane::Blue,
    Lane::Orange,
];

impl Lane {
    #[inline(always)]
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn name(self) -> &'static str {
        match self {
            Lane::Green => "green",
            Lane::Red => "red",
            Lane::Yellow => "yellow",
            Lane::Blue => "blue",
            Lane::Orange => "orange",
        }
    }
}

impl fmt::Display for Lane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single fret press as delivered by the host loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputEdge {
    pub lane: Lane,
    #[serde(rename = "at")]
    pub at_ms: i64,
}

/// Reads a JSON array of presses. Presses are returned sorted by time so the
/// host loop can feed them to the engine in clock order.
pub fn load_input_log(path: &Path) -> Result<Vec<InputEdge>> {
    let bytes = fs::read(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let edges = parse_input_log(&bytes)?;
    info!("Loaded {} presses from '{}'.", edges.len(), path.display());
    Ok(edges)
}

pub fn parse_input_log(bytes: &[u8]) -> Result<Vec<InputEdge>> {
    let mut edges: Vec<InputEdge> = serde_json::from_slice(bytes)?;
    edges.sort_by_key(|edge| edge.at_ms);
    Ok(edges)
}
