//! Application services behind the HTTP routes.
//!
//! Vote operations live in `forum_voting::VoteService`; this module holds
//! the question and answer flows.
mod questions;

pub use questions::{AskQuestion, PostAnswer, QuestionError, QuestionService, FEED_LIMIT};
