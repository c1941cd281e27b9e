use crate::types::TargetId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The kind of entity a vote applies to.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    Question,
    Answer,
}

impl TargetKind {
    /// Path segment used by the HTTP surface (`questions` / `answers`).
    pub fn collection(self) -> &'static str {
        match self {
            TargetKind::Question => "questions",
            TargetKind::Answer => "answers",
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetKind::Question => f.write_str("question"),
            TargetKind::Answer => f.write_str("answer"),
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid target kind: {0}")]
pub struct ParseTargetKindError(pub String);

impl FromStr for TargetKind {
    type Err = ParseTargetKindError;

    /// Accepts both the singular name and the collection name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "question" | "questions" => Ok(TargetKind::Question),
            "answer" | "answers" => Ok(TargetKind::Answer),
            other => Err(ParseTargetKindError(other.to_string())),
        }
    }
}

/// A question or an answer that can receive votes.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct VoteTarget {
    pub kind: TargetKind,
    pub id: TargetId,
}

impl VoteTarget {
    pub fn question(id: TargetId) -> Self {
        Self { kind: TargetKind::Question, id }
    }

    pub fn answer(id: TargetId) -> Self {
        Self { kind: TargetKind::Answer, id }
    }
}

impl fmt::Display for VoteTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.id)
    }
}
