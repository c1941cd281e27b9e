//! The vote state machine.
//!
//! States are `None`, `Some(Up)` and `Some(Down)`; actions are the two vote
//! controls. The table below is the single source of truth for both the
//! storage layer and the optimistic client:
//!
//! | current | action    | next | delta |
//! |---------|-----------|------|-------|
//! | none    | ClickUp   | up   | +1    |
//! | none    | ClickDown | down | -1    |
//! | up      | ClickUp   | none | -1    |
//! | up      | ClickDown | down | -2    |
//! | down    | ClickDown | none | +1    |
//! | down    | ClickUp   | up   | +2    |
//!
//! A direction switch moves the counter by two in a single step so readers
//! never observe the intermediate "none" state.
use crate::types::{VoteAction, VoteValue};

/// Outcome of one transition: the next vote state and the counter delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteTransition {
    pub next: Option<VoteValue>,
    pub delta: i64,
}

/// Maps the current vote state and a requested action to the next state and counter delta.
pub fn transition(current: Option<VoteValue>, action: VoteAction) -> VoteTransition {
    use VoteAction::{ClickDown, ClickUp};
    use VoteValue::{Down, Up};

    let (next, delta) = match (current, action) {
        (None, ClickUp) => (Some(Up), 1),
        (None, ClickDown) => (Some(Down), -1),
        (Some(Up), ClickUp) => (None, -1),
        (Some(Up), ClickDown) => (Some(Down), -2),
        (Some(Down), ClickDown) => (None, 1),
        (Some(Down), ClickUp) => (Some(Up), 2),
    };
    VoteTransition { next, delta }
}

/// Net counter contribution of a vote state.
pub fn weight_of(vote: Option<VoteValue>) -> i64 {
    vote.map_or(0, VoteValue::weight)
}

#[cfg(test)]
mod tests {
    use super::*;
    use VoteAction::{ClickDown, ClickUp};
    use VoteValue::{Down, Up};

    #[test]
    fn test_transition_table() {
        let cases = [
            (None, ClickUp, Some(Up), 1),
            (None, ClickDown, Some(Down), -1),
            (Some(Up), ClickUp, None, -1),
            (Some(Up), ClickDown, Some(Down), -2),
            (Some(Down), ClickDown, None, 1),
            (Some(Down), ClickUp, Some(Up), 2),
        ];
        for (current, action, next, delta) in cases {
            assert_eq!(
                transition(current, action),
                VoteTransition { next, delta },
                "{current:?} + {action:?}"
            );
        }
    }

    #[test]
    fn test_delta_matches_weight_difference() {
        for current in [None, Some(Up), Some(Down)] {
            for action in [ClickUp, ClickDown] {
                let t = transition(current, action);
                assert_eq!(t.delta, weight_of(t.next) - weight_of(current));
            }
        }
    }

    #[test]
    fn test_toggle_off_then_on_restores_counter() {
        let first = transition(Some(Up), ClickUp);
        assert_eq!(first, VoteTransition { next: None, delta: -1 });
        let second = transition(first.next, ClickUp);
        assert_eq!(second, VoteTransition { next: Some(Up), delta: 1 });
        assert_eq!(first.delta + second.delta, 0);
    }

    #[test]
    fn test_round_trip_up_down_down() {
        let start = 7;
        let mut state = None;
        let mut counter = start;

        for (action, expected_state, expected_counter) in [
            (ClickUp, Some(Up), start + 1),
            (ClickDown, Some(Down), start - 1),
            (ClickDown, None, start),
        ] {
            let t = transition(state, action);
            state = t.next;
            counter += t.delta;
            assert_eq!(state, expected_state);
            assert_eq!(counter, expected_counter);
        }
    }
}
