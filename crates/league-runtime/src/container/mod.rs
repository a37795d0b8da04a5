//! # League Container
//!
//! Configuration and dependency wiring for the runtime.
//!
//! - Adapters are created once and shared through `Arc`
//! - The draft queue service talks to the outside world only through its ports

pub mod config;
pub mod league;

pub use config::{BusConfig, ConfigError, LeagueConfig, LogConfig};
pub use league::{ConcreteDraftQueueService, LeagueContainer};
