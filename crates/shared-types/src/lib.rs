//! # Shared Types Crate
//!
//! This crate contains the data model shared by every league subsystem:
//! identities, player profiles, queues (including the draft-phase fields) and
//! immutable match records.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All cross-subsystem types are defined here.
//! - **Data, not behaviour**: Lifecycle rules live in the subsystem crates
//!   (`dl-02-draft-queue` owns the queue state machine); this crate only holds
//!   the shapes and read-only accessors.
//! - **Typed team identity**: `TeamSide` replaces free-form "A"/"B" tags for
//!   captain slots, rosters and winners.

pub mod entities;

pub use entities::*;
