//! Settings file and command-line overrides
//!
//! Settings live in `~/.config/countdown/config.toml`. Every field is
//! optional; a missing file yields the defaults.

use directories::ProjectDirs;
use jiff::civil::{Date, DateTime, Time};
use jiff::tz::TimeZone;
use jiff::Timestamp;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::countdown::{Countdown, CountdownError};
use crate::dashboard::{self, Cadence};
use crate::quotes::{Quote, QuoteBook};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid date-time '{value}': {source}")]
    DateTime { value: String, source: jiff::Error },
    #[error("{0} must be greater than zero")]
    ZeroInterval(&'static str),
    #[error(transparent)]
    Countdown(#[from] CountdownError),
}

/// Which layer-shell layer the overlay is placed on
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SurfaceLayer {
    Background,
    Bottom,
    #[default]
    Top,
    Overlay,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Settings {
    /// Civil date or date-time in local time where progress starts
    #[serde(default = "default_start")]
    pub start: String,

    /// Civil date or date-time in local time being counted down to
    #[serde(default = "default_target")]
    pub target: String,

    /// Heading text; derived from the target when absent
    #[serde(default)]
    pub heading: Option<String>,

    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,

    #[serde(default = "default_quote_interval_ms")]
    pub quote_interval_ms: u64,

    #[serde(default)]
    pub layer: SurfaceLayer,

    /// Replaces the built-in quotes when non-empty
    #[serde(default)]
    pub quotes: Vec<Quote>,
}

fn default_start() -> String {
    "2024-11-01T00:00:00".to_string()
}

fn default_target() -> String {
    "2025-06-10T00:00:00".to_string()
}

fn default_tick_ms() -> u64 {
    1_000
}

fn default_quote_interval_ms() -> u64 {
    60_000
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            start: default_start(),
            target: default_target(),
            heading: None,
            tick_ms: default_tick_ms(),
            quote_interval_ms: default_quote_interval_ms(),
            layer: SurfaceLayer::default(),
            quotes: Vec::new(),
        }
    }
}

/// Values given on the command line; they win over the file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub start: Option<String>,
    pub target: Option<String>,
    pub heading: Option<String>,
}

/// Fully resolved configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub heading: String,
    pub countdown: Countdown,
    pub cadence: Cadence,
    pub layer: SurfaceLayer,
    pub quotes: QuoteBook,
}

impl Settings {
    /// Load settings from `path`, or from the default location when `None`.
    ///
    /// An explicit path must exist. The default location may be absent, in
    /// which case the defaults are used.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::read(path);
        }

        let Some(path) = config_path() else {
            log::info!("Could not determine config directory, using defaults");
            return Ok(Self::default());
        };

        if !path.exists() {
            log::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        Self::read(&path)
    }

    fn read(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = toml::from_str(&contents)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn apply(&mut self, overrides: Overrides) {
        if let Some(start) = overrides.start {
            self.start = start;
        }
        if let Some(target) = overrides.target {
            self.target = target;
        }
        if overrides.heading.is_some() {
            self.heading = overrides.heading;
        }
    }

    /// Resolve against the system time zone
    pub fn resolve(&self) -> Result<Config, ConfigError> {
        self.resolve_in(&TimeZone::system())
    }

    pub fn resolve_in(&self, tz: &TimeZone) -> Result<Config, ConfigError> {
        if self.tick_ms == 0 {
            return Err(ConfigError::ZeroInterval("tick_ms"));
        }
        if self.quote_interval_ms == 0 {
            return Err(ConfigError::ZeroInterval("quote_interval_ms"));
        }

        let start = parse_local(&self.start, tz)?;
        let target = parse_local(&self.target, tz)?;
        let countdown = Countdown::new(start, target)?;

        let heading = self
            .heading
            .clone()
            .unwrap_or_else(|| dashboard::heading_for(target, tz));

        let quotes = QuoteBook::new(self.quotes.clone()).unwrap_or_else(|| {
            log::debug!("No quotes configured, using built-in list");
            QuoteBook::builtin()
        });

        Ok(Config {
            heading,
            countdown,
            cadence: Cadence {
                tick: Duration::from_millis(self.tick_ms),
                quote: Duration::from_millis(self.quote_interval_ms),
            },
            layer: self.layer,
            quotes,
        })
    }
}

/// Get the path to the config file: ~/.config/countdown/config.toml
pub fn config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "countdown").map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Parse `2025-06-10T00:00:00` or `2025-06-10` as a civil time in `tz`
pub fn parse_local(value: &str, tz: &TimeZone) -> Result<Timestamp, ConfigError> {
    let invalid = |source| ConfigError::DateTime {
        value: value.to_string(),
        source,
    };

    let datetime = match value.parse::<DateTime>() {
        Ok(datetime) => datetime,
        Err(_) => value
            .parse::<Date>()
            .map_err(invalid)?
            .to_datetime(Time::midnight()),
    };

    let zoned = datetime.to_zoned(tz.clone()).map_err(invalid)?;
    Ok(zoned.timestamp())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_settings() {
        let config = Settings::default().resolve_in(&TimeZone::UTC).unwrap();

        assert_eq!(config.heading, "Time Until June 10, 2025");
        assert_eq!(
            config.countdown.start(),
            "2024-11-01T00:00:00Z".parse::<Timestamp>().unwrap()
        );
        assert_eq!(
            config.countdown.target(),
            "2025-06-10T00:00:00Z".parse::<Timestamp>().unwrap()
        );
        assert_eq!(config.cadence, Cadence::default());
        assert_eq!(config.layer, SurfaceLayer::Top);
        assert_eq!(config.quotes, QuoteBook::builtin());
    }

    #[test]
    fn test_parse_toml() {
        let settings: Settings = toml::from_str(
            r#"
            target = "2026-01-01"
            heading = "New Year"
            tick_ms = 500
            layer = "background"

            [[quotes]]
            text = "Keep going."
            author = "Anonymous"
            "#,
        )
        .unwrap();

        assert_eq!(settings.start, default_start());
        assert_eq!(settings.quote_interval_ms, 60_000);

        let config = settings.resolve_in(&TimeZone::UTC).unwrap();
        assert_eq!(config.heading, "New Year");
        assert_eq!(config.cadence.tick, Duration::from_millis(500));
        assert_eq!(config.layer, SurfaceLayer::Background);
        assert_eq!(config.quotes.len(), 1);
        assert_eq!(
            config.countdown.target(),
            "2026-01-01T00:00:00Z".parse::<Timestamp>().unwrap()
        );
    }

    #[test]
    fn test_overrides_win() {
        let mut settings = Settings {
            heading: Some("From file".to_string()),
            ..Settings::default()
        };
        settings.apply(Overrides {
            start: Some("2025-01-01".to_string()),
            target: Some("2025-02-01T12:30:00".to_string()),
            heading: None,
        });

        let config = settings.resolve_in(&TimeZone::UTC).unwrap();
        assert_eq!(config.heading, "From file");
        assert_eq!(
            config.countdown.target(),
            "2025-02-01T12:30:00Z".parse::<Timestamp>().unwrap()
        );
    }

    #[test]
    fn test_rejects_reversed_range() {
        let settings = Settings {
            start: "2026-01-01".to_string(),
            target: "2025-01-01".to_string(),
            ..Settings::default()
        };
        assert!(matches!(
            settings.resolve_in(&TimeZone::UTC),
            Err(ConfigError::Countdown(_))
        ));
    }

    #[test]
    fn test_rejects_zero_interval() {
        let settings = Settings {
            tick_ms: 0,
            ..Settings::default()
        };
        assert!(matches!(
            settings.resolve_in(&TimeZone::UTC),
            Err(ConfigError::ZeroInterval("tick_ms"))
        ));
    }

    #[test]
    fn test_rejects_garbage_date() {
        let err = parse_local("next tuesday", &TimeZone::UTC).unwrap_err();
        assert!(err.to_string().contains("next tuesday"));
    }

    #[test]
    fn test_load_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "target = \"2030-01-01\"").unwrap();

        let settings = Settings::load(Some(file.path())).unwrap();
        assert_eq!(settings.target, "2030-01-01");
        assert_eq!(settings.tick_ms, 1_000);
    }

    #[test]
    fn test_load_missing_explicit_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(matches!(
            Settings::load(Some(&missing)),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn test_load_malformed_file_fails() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "tick_ms = \"soon\"").unwrap();
        assert!(matches!(
            Settings::load(Some(file.path())),
            Err(ConfigError::Parse(_))
        ));
    }
}
