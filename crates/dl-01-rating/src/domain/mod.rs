//! # Domain Layer - Rating Subsystem
//!
//! - `engine`: Elo computation and its configuration
//! - `value_objects`: roster entries and computed updates

pub mod engine;
pub mod value_objects;

pub use engine::{RatingConfig, RatingEngine, K_FACTOR};
pub use value_objects::{RatedPlayer, RatingUpdate};
