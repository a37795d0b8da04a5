//! # dl-01-rating
//!
//! Rating Engine computing post-match skill updates for two teams.
//!
//! ## Algorithm (logistic Elo, team averages)
//!
//! ```text
//! avg(team)  = mean of member ratings (missing rating → default 1000)
//! expectedA  = 1 / (1 + 10^((avg(B) - avg(A)) / 400))
//! expectedB  = 1 - expectedA
//! actualT    = 1 if T won else 0
//! newRating  = rating + round(K * (actualT - expectedT))
//! ```
//!
//! ## Domain Invariants
//!
//! | Invariant | Enforcement |
//! |-----------|-------------|
//! | Batch, not cascade: every update reads the same pre-match snapshot | `RatingEngine::compute` reads only the rosters it is handed, never its own output |
//! | Every rostered member weighs equally in the team average | `RatingEngine::team_average` |
//! | Rounding is half-away-from-zero on the raw delta | `RatingEngine::delta` (`f64::round`) |
//! | A player appears on at most one roster | `RatingError::DuplicatePlayer` |
//!
//! The engine is pure: no I/O, no logging. Applying the returned updates to
//! the player registry is the caller's job.
//!
//! ## Example
//!
//! ```rust
//! use dl_01_rating::{RatedPlayer, RatingEngine};
//! use shared_types::{PlayerId, TeamSide};
//!
//! let team_a: Vec<_> = ["a1", "a2", "a3", "a4"]
//!     .iter()
//!     .map(|id| RatedPlayer::new(PlayerId::from(*id), Some(1050)))
//!     .collect();
//! let team_b: Vec<_> = ["b1", "b2", "b3", "b4"]
//!     .iter()
//!     .map(|id| RatedPlayer::new(PlayerId::from(*id), Some(950)))
//!     .collect();
//!
//! let updates = RatingEngine::default()
//!     .compute(&team_a, &team_b, TeamSide::A)
//!     .unwrap();
//! assert_eq!(updates[0].after, 1062);
//! ```

pub mod domain;
pub mod error;

pub use domain::{RatedPlayer, RatingConfig, RatingEngine, RatingUpdate, K_FACTOR};
pub use error::{RatingError, RatingResult};
