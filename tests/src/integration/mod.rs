//! # Integration Tests
//!
//! Exercise the draft queue service, the rating engine, the event bus and
//! the runtime container together.

pub mod concurrency;
pub mod flows;
