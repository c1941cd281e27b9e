use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Represents the direction of a stored vote.
///
/// There is no "none" variant: the absence of a vote is modelled as
/// `Option<VoteValue>::None` and is never materialized as a record.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum VoteValue {
    /// Indicates an upvote or positive endorsement.
    Up,
    /// Indicates a downvote or negative endorsement.
    Down,
}

impl VoteValue {
    /// Contribution of this vote to the target's net counter.
    pub fn weight(self) -> i64 {
        match self {
            VoteValue::Up => 1,
            VoteValue::Down => -1,
        }
    }
}

impl fmt::Display for VoteValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VoteValue::Up => f.write_str("up"),
            VoteValue::Down => f.write_str("down"),
        }
    }
}

/// A click on one of the two vote controls.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum VoteAction {
    #[serde(rename = "up")]
    ClickUp,
    #[serde(rename = "down")]
    ClickDown,
}

impl VoteAction {
    /// The vote direction this control casts.
    pub fn direction(self) -> VoteValue {
        match self {
            VoteAction::ClickUp => VoteValue::Up,
            VoteAction::ClickDown => VoteValue::Down,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            VoteAction::ClickUp => "up",
            VoteAction::ClickDown => "down",
        }
    }
}

impl fmt::Display for VoteAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid vote action: {0}")]
pub struct ParseVoteActionError(pub String);

impl FromStr for VoteAction {
    type Err = ParseVoteActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" => Ok(VoteAction::ClickUp),
            "down" => Ok(VoteAction::ClickDown),
            other => Err(ParseVoteActionError(other.to_string())),
        }
    }
}
