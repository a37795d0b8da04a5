//! # League Runtime Library
//!
//! Exposes the runtime's container and handlers for testing. The main entry
//! point is the `main.rs` binary.
//!
//! ## Architectural Patterns
//!
//! - **Hexagonal Architecture**: the draft queue service sees only its ports;
//!   this crate supplies the in-memory adapters behind them
//! - **Event notification**: every successful write is published on the
//!   shared bus, and the event log handler is just another subscriber

#![allow(clippy::type_complexity)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod container;
pub mod handlers;

pub use container::{ConfigError, LeagueConfig, LeagueContainer};
pub use handlers::{EventLogHandler, ScriptRunner, ScriptSummary};
