//! # Draft League Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── benches/          # criterion benchmarks (rating engine, draft)
//! └── src/
//!     ├── fixtures.rs   # seeded leagues and full queues
//!     └── integration/  # cross-crate flows and concurrency
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p league-tests
//!
//! # By category
//! cargo test -p league-tests integration::flows
//! cargo test -p league-tests integration::concurrency
//!
//! # Benchmarks
//! cargo bench -p league-tests
//! ```

#![allow(dead_code)]

pub mod fixtures;
pub mod integration;
