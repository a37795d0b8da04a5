//! Snake-draft turn order.
//!
//! ```text
//! pick:     0  1  2  3  4  5  | 6
//! drafter:  A  B  B  A  A  B  | done
//! ```

use crate::error::{DraftError, DraftResult};
use shared_types::{Captains, PickIndex, PlayerId, TeamSide, DRAFT_PICKS};

/// Drafting side for each pick of an 8-player, 2-captain draft.
pub const SNAKE_ORDER: [TeamSide; DRAFT_PICKS as usize] = [
    TeamSide::A,
    TeamSide::B,
    TeamSide::B,
    TeamSide::A,
    TeamSide::A,
    TeamSide::B,
];

/// Side that makes pick `index`, or `None` once all picks are made.
pub fn drafter_at(index: PickIndex) -> DraftResult<Option<TeamSide>> {
    match index.value() {
        i if i < DRAFT_PICKS => Ok(Some(SNAKE_ORDER[usize::from(i)])),
        DRAFT_PICKS => Ok(None),
        i => Err(DraftError::invariant(format!(
            "pick index {i} beyond the last pick {DRAFT_PICKS}"
        ))),
    }
}

/// Captain who makes pick `index`.
pub fn next_drafter(captains: &Captains, index: PickIndex) -> DraftResult<Option<PlayerId>> {
    Ok(drafter_at(index)?.map(|side| captains.captain(side).clone()))
}
