//! # Handlers
//!
//! Drivers that sit on either side of the draft queue service: the command
//! script feeds it, the event log handler watches what it publishes.

pub mod events;
pub mod script;

pub use events::EventLogHandler;
pub use script::{parse_line, ParseError, ScriptCommand, ScriptRunner, ScriptSummary};
