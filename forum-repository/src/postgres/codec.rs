//! Column encodings shared by the PostgreSQL repositories.
use forum_shared::types::{TargetKind, VoteValue};
use crate::errors::RepositoryError;

pub(crate) fn encode_vote(vote: VoteValue) -> i16 {
    match vote {
        VoteValue::Up => 0,
        VoteValue::Down => 1,
    }
}

pub(crate) fn decode_vote(code: i16) -> Result<VoteValue, RepositoryError> {
    match code {
        0 => Ok(VoteValue::Up),
        1 => Ok(VoteValue::Down),
        other => Err(RepositoryError::InvalidVoteType(other)),
    }
}

pub(crate) fn encode_kind(kind: TargetKind) -> i16 {
    match kind {
        TargetKind::Question => 0,
        TargetKind::Answer => 1,
    }
}

/// Table holding the counter for a target kind.
pub(crate) fn target_table(kind: TargetKind) -> &'static str {
    match kind {
        TargetKind::Question => "questions",
        TargetKind::Answer => "answers",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vote_codes() {
        assert_eq!(decode_vote(encode_vote(VoteValue::Up)).unwrap(), VoteValue::Up);
        assert_eq!(decode_vote(encode_vote(VoteValue::Down)).unwrap(), VoteValue::Down);
        assert!(matches!(decode_vote(2), Err(RepositoryError::InvalidVoteType(2))));
    }

    #[test]
    fn test_kind_codes() {
        assert_ne!(encode_kind(TargetKind::Question), encode_kind(TargetKind::Answer));
        assert_eq!(target_table(TargetKind::Question), "questions");
        assert_eq!(target_table(TargetKind::Answer), "answers");
    }
}
