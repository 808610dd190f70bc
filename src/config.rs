use crate::error::{Error, Result};
use crate::game::life::{self, LifeChange};
use crate::game::view::STRUM_LINE_MARGIN;
use configparser::ini::Ini;
use log::{info, warn};
use std::fmt::Display;
use std::path::Path;
use std::str::FromStr;

pub const DEFAULT_CONFIG_PATH: &str = "fretline.ini";

const GAMEPLAY_SECTION: &str = "Gameplay";
const ROCK_METER_SECTION: &str = "RockMeter";

/// Session settings. Read once when a session starts; the engine never writes them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Settings {
    /// Half-width of the hit window around a note, in milliseconds.
    pub hit_window_ms: i64,
    /// Song time covered by one fret-board row. Smaller is a faster scroll.
    pub line_time_ms: i64,
    /// Visible fret-board rows.
    pub fret_board_height: usize,
    /// Clock value the host starts from, before the first note.
    pub lead_in_ms: i64,
    pub initial_rock_meter: f64,
    pub life_change: LifeChange,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            hit_window_ms: 100,
            line_time_ms: 30,
            fret_board_height: 30,
            lead_in_ms: 3000,
            initial_rock_meter: life::INITIAL_ROCK_METER,
            life_change: LifeChange::default(),
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        if self.hit_window_ms <= 0 {
            return Err(invalid("HitWindowMs", self.hit_window_ms));
        }
        if self.line_time_ms <= 0 {
            return Err(invalid("LineTimeMs", self.line_time_ms));
        }
        if self.fret_board_height <= STRUM_LINE_MARGIN {
            return Err(invalid("FretBoardHeight", self.fret_board_height));
        }
        if self.lead_in_ms < 0 {
            return Err(invalid("LeadInMs", self.lead_in_ms));
        }
        if !(self.initial_rock_meter > 0.0 && self.initial_rock_meter <= 1.0) {
            return Err(invalid("Initial", self.initial_rock_meter));
        }
        if !(self.life_change.increment > 0.0 && self.life_change.increment <= 1.0) {
            return Err(invalid("Increment", self.life_change.increment));
        }
        if !(self.life_change.decrement > 0.0 && self.life_change.decrement <= 1.0) {
            return Err(invalid("Decrement", self.life_change.decrement));
        }
        Ok(())
    }
}

fn invalid(key: &'static str, value: impl Display) -> Error {
    Error::InvalidSetting {
        key,
        value: value.to_string(),
    }
}

fn write_default_file(path: &Path) -> std::io::Result<()> {
    info!("Config file not found, writing defaults to '{}'.", path.display());
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let defaults = Settings::default();
    let mut conf = Ini::new();
    conf.set(GAMEPLAY_SECTION, "HitWindowMs", Some(defaults.hit_window_ms.to_string()));
    conf.set(GAMEPLAY_SECTION, "LineTimeMs", Some(defaults.line_time_ms.to_string()));
    conf.set(GAMEPLAY_SECTION, "FretBoardHeight", Some(defaults.fret_board_height.to_string()));
    conf.set(GAMEPLAY_SECTION, "LeadInMs", Some(defaults.lead_in_ms.to_string()));
    conf.set(ROCK_METER_SECTION, "Initial", Some(defaults.initial_rock_meter.to_string()));
    conf.set(ROCK_METER_SECTION, "Increment", Some(defaults.life_change.increment.to_string()));
    conf.set(ROCK_METER_SECTION, "Decrement", Some(defaults.life_change.decrement.to_string()));
    conf.write(path)
}

fn read_value<T: FromStr + Copy>(conf: &Ini, section: &str, key: &str, default: T) -> T {
    match conf.get(section, key) {
        Some(raw) => raw.trim().parse::<T>().unwrap_or_else(|_| {
            warn!("Ignoring invalid {}.{} = '{}', using default.", section, key, raw);
            default
        }),
        None => default,
    }
}

/// Parses settings from INI text. Missing or unparseable keys keep their defaults.
pub fn parse(text: &str) -> Result<Settings> {
    let mut conf = Ini::new();
    if let Err(e) = conf.read(text.to_string()) {
        warn!("Failed to parse config: {}. Using defaults.", e);
        return Ok(Settings::default());
    }
    settings_from_ini(&conf)
}

fn settings_from_ini(conf: &Ini) -> Result<Settings> {
    let d = Settings::default();
    let settings = Settings {
        hit_window_ms: read_value(conf, GAMEPLAY_SECTION, "HitWindowMs", d.hit_window_ms),
        line_time_ms: read_value(conf, GAMEPLAY_SECTION, "LineTimeMs", d.line_time_ms),
        fret_board_height: read_value(conf, GAMEPLAY_SECTION, "FretBoardHeight", d.fret_board_height),
        lead_in_ms: read_value(conf, GAMEPLAY_SECTION, "LeadInMs", d.lead_in_ms),
        initial_rock_meter: read_value(conf, ROCK_METER_SECTION, "Initial", d.initial_rock_meter),
        life_change: LifeChange {
            increment: read_value(conf, ROCK_METER_SECTION, "Increment", d.life_change.increment),
            decrement: read_value(conf, ROCK_METER_SECTION, "Decrement", d.life_change.decrement),
        },
    };
    settings.validate()?;
    Ok(settings)
}

/// Loads settings from the config file, creating it with defaults if missing.
pub fn load(path: &Path) -> Result<Settings> {
    let settings = if path.exists() {
        let mut conf = Ini::new();
        match conf.load(path) {
            Ok(_) => settings_from_ini(&conf)?,
            Err(e) => {
                warn!("Failed to load '{}': {}. Using defaults.", path.display(), e);
                Settings::default()
            }
        }
    } else {
        if let Err(e) = write_default_file(path) {
            warn!("Failed to create default config file: {}", e);
        }
        Settings::default()
    };

    info!(
        "Settings: hit window ±{}ms, line time {}ms, board height {}",
        settings.hit_window_ms, settings.line_time_ms, settings.fret_board_height
    );
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_reads_every_key() {
        let text = "\
[Gameplay]
HitWindowMs = 80
LineTimeMs = 45
FretBoardHeight = 24
LeadInMs = 1500

[RockMeter]
Initial = 0.75
Increment = 0.03
Decrement = 0.05
";
        let settings = parse(text).expect("valid config");
        assert_eq!(settings.hit_window_ms, 80);
        assert_eq!(settings.line_time_ms, 45);
        assert_eq!(settings.fret_board_height, 24);
        assert_eq!(settings.lead_in_ms, 1500);
        assert_eq!(settings.initial_rock_meter, 0.75);
        assert_eq!(settings.life_change.increment, 0.03);
        assert_eq!(settings.life_change.decrement, 0.05);
    }

    #[test]
    fn unparseable_values_fall_back_to_defaults() {
        let settings = parse("[Gameplay]\nHitWindowMs = fast\nLineTimeMs = 50\n").expect("valid config");
        assert_eq!(settings.hit_window_ms, Settings::default().hit_window_ms);
        assert_eq!(settings.line_time_ms, 50);
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let err = parse("[Gameplay]\nHitWindowMs = 0\n").unwrap_err();
        assert!(matches!(err, Error::InvalidSetting { key: "HitWindowMs", .. }));

        let err = parse("[Gameplay]\nFretBoardHeight = 2\n").unwrap_err();
        assert!(matches!(err, Error::InvalidSetting { key: "FretBoardHeight", .. }));

        let err = parse("[RockMeter]\nDecrement = 1.5\n").unwrap_err();
        assert!(matches!(err, Error::InvalidSetting { key: "Decrement", .. }));
    }

    #[test]
    fn load_creates_default_file_and_reloads_it() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("profile").join("fretline.ini");

        let first = load(&path).expect("defaults");
        assert_eq!(first, Settings::default());
        assert!(path.exists());

        let second = load(&path).expect("reload written defaults");
        assert_eq!(second, Settings::default());
    }

    #[test]
    fn load_reads_existing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("custom.ini");
        std::fs::write(&path, "[Gameplay]\nHitWindowMs = 70\n").expect("write config");

        let settings = load(&path).expect("custom config");
        assert_eq!(settings.hit_window_ms, 70);
        assert_eq!(settings.line_time_ms, Settings::default().line_time_ms);
    }
}
