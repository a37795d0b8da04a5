//! # League Configuration
//!
//! Unified configuration for the draft queue subsystem and runtime
//! parameters.
//!
//! Every value has a default. Environment variables override them:
//!
//! | Variable                  | Field                              | Default |
//! |---------------------------|------------------------------------|---------|
//! | `DL_K_FACTOR`             | `draft.rating.k_factor`            | 32      |
//! | `DL_DEFAULT_RATING`       | `draft.rating.default_rating`      | 1000    |
//! | `DL_MAX_CONFLICT_RETRIES` | `draft.max_conflict_retries`       | 3       |
//! | `DL_BUS_CAPACITY`         | `bus.capacity`                     | 1000    |
//! | `DL_LOG`                  | `log.filter`                       | `info`  |
//!
//! League ratings are defined with K = 32 and a starting rating of 1000.
//! `DL_K_FACTOR` and `DL_DEFAULT_RATING` exist for offline experiments only:
//! any other value produces ratings that are not comparable with a standard
//! league, and the container logs a warning at startup when either is set.

use dl_01_rating::RatingConfig;
use dl_02_draft_queue::DraftQueueConfig;
use shared_bus::DEFAULT_CHANNEL_CAPACITY;
use std::str::FromStr;
use thiserror::Error;

pub const ENV_K_FACTOR: &str = "DL_K_FACTOR";
pub const ENV_DEFAULT_RATING: &str = "DL_DEFAULT_RATING";
pub const ENV_MAX_CONFLICT_RETRIES: &str = "DL_MAX_CONFLICT_RETRIES";
pub const ENV_BUS_CAPACITY: &str = "DL_BUS_CAPACITY";
pub const ENV_LOG: &str = "DL_LOG";

/// Complete league configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeagueConfig {
    /// Draft queue and rating configuration.
    pub draft: DraftQueueConfig,
    /// Event bus configuration.
    pub bus: BusConfig,
    /// Logging configuration.
    pub log: LogConfig,
}

impl LeagueConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup` on top of the defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(k) = parse_var(&lookup, ENV_K_FACTOR)? {
            config.draft.rating.k_factor = k;
        }
        if let Some(rating) = parse_var(&lookup, ENV_DEFAULT_RATING)? {
            config.draft.rating.default_rating = rating;
        }
        if let Some(retries) = parse_var(&lookup, ENV_MAX_CONFLICT_RETRIES)? {
            config.draft.max_conflict_retries = retries;
        }
        if let Some(capacity) = parse_var(&lookup, ENV_BUS_CAPACITY)? {
            config.bus.capacity = capacity;
        }
        if let Some(filter) = lookup(ENV_LOG) {
            config.log.filter = filter;
        }

        config.validate()?;
        Ok(config)
    }

    /// Whether the rating parameters are the league's standard K and
    /// starting rating.
    pub fn rating_is_standard(&self) -> bool {
        self.draft.rating == RatingConfig::default()
    }

    /// Reject values the subsystems cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.draft
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        if self.bus.capacity == 0 {
            return Err(ConfigError::Invalid(
                "bus capacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_var<T, F>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Malformed { key, value: raw }),
    }
}

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// An environment override could not be parsed.
    #[error("{key} has malformed value {value:?}")]
    Malformed { key: &'static str, value: String },

    /// A value parsed but is out of range.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Event bus configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusConfig {
    /// Events buffered per subscriber before it lags.
    pub capacity: usize,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// `tracing_subscriber::EnvFilter` directive.
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}
