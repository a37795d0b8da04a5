//! Domain layer for the Draft Queue subsystem.
//!
//! Pure transition logic: no I/O, no logging, no clocks. Callers persist
//! the values returned here.

pub mod captains;
pub mod queue_machine;
pub mod recorder;
pub mod sequencer;

pub use captains::{select_captains, CaptainSelection};
pub use queue_machine::{QueueStateMachine, ReportOutcome};
pub use recorder::MatchRecorder;
pub use sequencer::{drafter_at, next_drafter, SNAKE_ORDER};
