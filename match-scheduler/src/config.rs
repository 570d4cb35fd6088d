// Configuration loading (scheduler.toml). Every field has a default, so a
// missing file is not an error.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::schedule::slot_utils::parse_time_to_minutes;
use crate::schedule::types::DEFAULT_LOCATION_PREFIX;

pub const DEFAULT_CONFIG_PATH: &str = "scheduler.toml";
pub const DEFAULT_TIME_SLOTS: [&str; 4] = ["14:00", "16:00", "18:00", "20:00"];

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    Validation { field: String, message: String },
}

// ---------------------------------------------------------------------------
// Structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub schedule: ScheduleDefaults,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
    pub admin_password: String,
    /// CSV of teams loaded into the store at startup.
    pub teams_csv: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            port: 8080,
            admin_password: "admin123".to_string(),
            teams_csv: None,
        }
    }
}

/// Defaults applied when a run does not say otherwise.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScheduleDefaults {
    pub time_slots: Vec<String>,
    pub field_count: u32,
    pub match_duration: u32,
    pub round_robin: bool,
    pub location_prefix: String,
    /// Fixed seed for the capacity shuffle; entropy when absent.
    pub seed: Option<u64>,
}

impl Default for ScheduleDefaults {
    fn default() -> Self {
        ScheduleDefaults {
            time_slots: DEFAULT_TIME_SLOTS.iter().map(|s| s.to_string()).collect(),
            field_count: 2,
            match_duration: 90,
            round_robin: false,
            location_prefix: DEFAULT_LOCATION_PREFIX.to_string(),
            seed: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Loads config from `path`. A missing file yields the defaults;
/// `ADMIN_PASSWORD` in the environment overrides the file.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let mut config = if path.exists() {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        parse_config(&text).map_err(|e| match e {
            ParseOrValidate::Parse(source) => ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            },
            ParseOrValidate::Validate(e) => e,
        })?
    } else {
        tracing::info!(path = %path.display(), "no config file, using defaults");
        Config::default()
    };

    if let Ok(password) = std::env::var("ADMIN_PASSWORD") {
        if !password.is_empty() {
            config.server.admin_password = password;
        }
    }

    validate(&config)?;
    Ok(config)
}

#[derive(Debug)]
enum ParseOrValidate {
    Parse(toml::de::Error),
    Validate(ConfigError),
}

fn parse_config(text: &str) -> Result<Config, ParseOrValidate> {
    let config: Config = toml::from_str(text).map_err(ParseOrValidate::Parse)?;
    validate(&config).map_err(ParseOrValidate::Validate)?;
    Ok(config)
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn invalid(field: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::Validation {
        field: field.to_string(),
        message: message.into(),
    }
}

pub fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.server.admin_password.is_empty() {
        return Err(invalid("server.admin_password", "must not be empty"));
    }

    let schedule = &config.schedule;
    if schedule.time_slots.is_empty() {
        return Err(invalid("schedule.time_slots", "at least one time slot is required"));
    }
    for slot in &schedule.time_slots {
        if parse_time_to_minutes(slot).is_none() {
            return Err(invalid(
                "schedule.time_slots",
                format!("`{slot}` is not a HH:MM time"),
            ));
        }
    }

    if !(1..=10).contains(&schedule.field_count) {
        return Err(invalid(
            "schedule.field_count",
            format!("must be between 1 and 10, got {}", schedule.field_count),
        ));
    }

    if schedule.match_duration < 60 {
        return Err(invalid(
            "schedule.match_duration",
            format!("must be at least 60 minutes, got {}", schedule.match_duration),
        ));
    }

    if schedule.location_prefix.trim().is_empty() {
        return Err(invalid("schedule.location_prefix", "must not be empty"));
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn empty_file_gives_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.schedule.time_slots, DEFAULT_TIME_SLOTS.to_vec());
        assert_eq!(config.schedule.field_count, 2);
        assert_eq!(config.schedule.match_duration, 90);
        assert_eq!(config.schedule.location_prefix, "Terrain");
        assert!(config.schedule.seed.is_none());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let text = r#"
            [server]
            port = 9090

            [schedule]
            time_slots = ["10:00", "12:00"]
            round_robin = true
            seed = 42
        "#;
        let config = parse_config(text).unwrap();
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.admin_password, "admin123");
        assert_eq!(config.schedule.time_slots, vec!["10:00", "12:00"]);
        assert!(config.schedule.round_robin);
        assert_eq!(config.schedule.seed, Some(42));
        assert_eq!(config.schedule.field_count, 2);
    }

    #[test]
    fn rejects_bad_values() {
        let cases = [
            ("[schedule]\nfield_count = 0", "schedule.field_count"),
            ("[schedule]\nfield_count = 11", "schedule.field_count"),
            ("[schedule]\ntime_slots = []", "schedule.time_slots"),
            ("[schedule]\ntime_slots = [\"7pm\"]", "schedule.time_slots"),
            ("[schedule]\nmatch_duration = 30", "schedule.match_duration"),
            ("[server]\nadmin_password = \"\"", "server.admin_password"),
        ];
        for (text, expected) in cases {
            match parse_config(text) {
                Err(ParseOrValidate::Validate(ConfigError::Validation { field, .. })) => {
                    assert_eq!(field, expected, "for {text:?}")
                }
                _ => panic!("expected validation error for {text:?}"),
            }
        }
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scheduler.toml");
        fs::write(&path, "[schedule\nfield_count = ").unwrap();
        assert!(matches!(load_config(&path), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn loads_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scheduler.toml");
        fs::write(&path, "[schedule]\nfield_count = 4\nlocation_prefix = \"Pitch\"\n").unwrap();
        let config = load_config(&path).unwrap();
        assert_eq!(config.schedule.field_count, 4);
        assert_eq!(config.schedule.location_prefix, "Pitch");
    }

    #[test]
    fn missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.schedule.field_count, 2);
    }
}
