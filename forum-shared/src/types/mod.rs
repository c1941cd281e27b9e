mod ids;
mod question;
mod target;
mod user_vote;
mod vote;
mod vote_change;
mod votes_count;

pub use ids::{
    AnswerId, QuestionId, TargetId, USER_AVATAR_HEADER, USER_ID_HEADER, USER_NAME_HEADER, UserId,
};
pub use question::{
    AI_ASSISTANT_ID, AI_ASSISTANT_NAME, Answer, Author, NewAnswer, NewQuestion, ParseFilterError,
    Question, QuestionFilter, QuestionWithAnswers,
};
pub use target::{ParseTargetKindError, TargetKind, VoteTarget};
pub use user_vote::UserVote;
pub use vote::{ParseVoteActionError, VoteAction, VoteValue};
pub use vote_change::{CastOutcome, CastVoteRequest, VoteChange, VoteState};
pub use votes_count::VotesCount;
