//! Configuration loading and typed config structures for the pond engine.
//!
//! The canonical configuration lives in `pond-config.yaml` at the project
//! root. Every section and field has a default, so a missing key keeps the
//! value documented on the field.

use std::path::Path;

use serde::Deserialize;
use uuid::Uuid;

use pond_life::LifeConfig;
use pond_types::{CatalogItem, HazardKind, PlayerId};

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A value is present but unusable.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Explanation of what is wrong.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level pond configuration, mirroring `pond-config.yaml`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PondConfig {
    /// Grid size and owner.
    #[serde(default)]
    pub pond: PondSection,

    /// Day/night phase lengths and tick pacing.
    #[serde(default)]
    pub cycle: CycleConfig,

    /// Hazard timer intervals.
    #[serde(default)]
    pub hazards: HazardConfig,

    /// Slot life-cycle tunables.
    #[serde(default)]
    pub life: LifeConfig,

    /// External pond store connection.
    #[serde(default)]
    pub store: StoreConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Items available to the caretaker.
    #[serde(default = "pond_life::starter_items")]
    pub catalog: Vec<CatalogItem>,
}

impl Default for PondConfig {
    fn default() -> Self {
        Self {
            pond: PondSection::default(),
            cycle: CycleConfig::default(),
            hazards: HazardConfig::default(),
            life: LifeConfig::default(),
            store: StoreConfig::default(),
            logging: LoggingConfig::default(),
            catalog: pond_life::starter_items(),
        }
    }
}

impl PondConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values:
    /// - `POND_STORE_URL` overrides `store.base_url`
    /// - `POND_STORE_TOKEN` overrides `store.token`
    /// - `POND_PLAYER_ID` overrides `pond.player_id`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string, applying env overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes to unit, not to an empty mapping.
        let mut config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `POND_*` environment variable overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if `POND_PLAYER_ID` is not a UUID.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(val) = std::env::var("POND_STORE_URL") {
            self.store.base_url = Some(val);
        }
        if let Ok(val) = std::env::var("POND_STORE_TOKEN") {
            self.store.token = Some(val);
        }
        if let Ok(val) = std::env::var("POND_PLAYER_ID") {
            let id = Uuid::parse_str(val.trim()).map_err(|e| ConfigError::Invalid {
                reason: format!("POND_PLAYER_ID is not a UUID: {e}"),
            })?;
            self.pond.player_id = Some(PlayerId::from(id));
        }
        Ok(())
    }

    /// Check value ranges that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pond.rows == 0 || self.pond.cols == 0 {
            return Err(ConfigError::Invalid {
                reason: String::from("pond grid must have at least one row and one column"),
            });
        }
        if self.cycle.day_secs == 0 || self.cycle.night_secs == 0 {
            return Err(ConfigError::Invalid {
                reason: String::from("day and night must last at least one second"),
            });
        }
        if self.cycle.tick_interval_ms == 0 {
            return Err(ConfigError::Invalid {
                reason: String::from("tick_interval_ms must be positive"),
            });
        }
        if self.life.default_max_health == 0 {
            return Err(ConfigError::Invalid {
                reason: String::from("life.default_max_health must be positive"),
            });
        }
        Ok(())
    }
}

/// Grid size and owner of the pond.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PondSection {
    /// Grid rows.
    #[serde(default = "default_rows")]
    pub rows: u32,

    /// Grid columns.
    #[serde(default = "default_cols")]
    pub cols: u32,

    /// Owner of the pond. A fresh id is generated when absent.
    #[serde(default)]
    pub player_id: Option<PlayerId>,
}

impl Default for PondSection {
    fn default() -> Self {
        Self {
            rows: default_rows(),
            cols: default_cols(),
            player_id: None,
        }
    }
}

/// Day/night phase lengths and tick pacing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct CycleConfig {
    /// Seconds of daylight.
    #[serde(default = "default_day_secs")]
    pub day_secs: u64,

    /// Seconds of night.
    #[serde(default = "default_night_secs")]
    pub night_secs: u64,

    /// Real milliseconds per simulated second.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            day_secs: default_day_secs(),
            night_secs: default_night_secs(),
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}

/// Intervals of the repeating hazard timers. Zero disables a timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct HazardConfig {
    /// Seconds between pH hazard attempts.
    #[serde(default = "default_ph_interval_secs")]
    pub ph_interval_secs: u64,

    /// Seconds between oxygen hazard attempts.
    #[serde(default = "default_oxygen_interval_secs")]
    pub oxygen_interval_secs: u64,

    /// Seconds between temperature hazard attempts.
    #[serde(default = "default_temperature_interval_secs")]
    pub temperature_interval_secs: u64,
}

impl HazardConfig {
    /// Interval of the timer driving `kind`. Water quality has no timer.
    pub const fn interval_for(&self, kind: HazardKind) -> Option<u64> {
        match kind {
            HazardKind::Ph => Some(self.ph_interval_secs),
            HazardKind::Oxygen => Some(self.oxygen_interval_secs),
            HazardKind::Temperature => Some(self.temperature_interval_secs),
            HazardKind::WaterQuality => None,
        }
    }
}

impl Default for HazardConfig {
    fn default() -> Self {
        Self {
            ph_interval_secs: default_ph_interval_secs(),
            oxygen_interval_secs: default_oxygen_interval_secs(),
            temperature_interval_secs: default_temperature_interval_secs(),
        }
    }
}

/// Connection to the external pond store.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StoreConfig {
    /// Base URL of the store API. Absent means local-only play.
    #[serde(default)]
    pub base_url: Option<String>,

    /// Bearer token sent with every request.
    #[serde(default)]
    pub token: Option<String>,

    /// Per-request timeout in milliseconds.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Seconds between market bonus polls.
    #[serde(default = "default_bonus_poll_secs")]
    pub bonus_poll_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            token: None,
            request_timeout_ms: default_request_timeout_ms(),
            bonus_poll_secs: default_bonus_poll_secs(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions
// ---------------------------------------------------------------------------

const fn default_rows() -> u32 {
    4
}

const fn default_cols() -> u32 {
    6
}

const fn default_day_secs() -> u64 {
    180
}

const fn default_night_secs() -> u64 {
    120
}

const fn default_tick_interval_ms() -> u64 {
    1000
}

const fn default_ph_interval_secs() -> u64 {
    180
}

const fn default_oxygen_interval_secs() -> u64 {
    240
}

const fn default_temperature_interval_secs() -> u64 {
    300
}

const fn default_request_timeout_ms() -> u64 {
    5000
}

const fn default_bonus_poll_secs() -> u64 {
    30
}

fn default_log_level() -> String {
    String::from("info")
}
