//! The vote transition engine.
//!
//! Pure decision logic, independent of storage. The table itself lives in
//! `forum_shared::transition` so the optimistic client applies exactly the
//! same rules; this module adds the action parsing used at the API boundary.
pub use forum_shared::transition::{VoteTransition, transition, weight_of};

use forum_shared::types::VoteAction;
use crate::errors::VoteError;

/// Parses a wire action (`"up"` / `"down"`).
///
/// # Errors
///
/// Returns `VoteError::InvalidAction` for any other value.
pub fn parse_action(raw: &str) -> Result<VoteAction, VoteError> {
    raw.parse::<VoteAction>()
        .map_err(|e| VoteError::InvalidAction(e.0))
}
