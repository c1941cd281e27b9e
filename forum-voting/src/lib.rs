//! # Forum Voting
//! This crate holds the server side of the voting subsystem: the vote
//! transition engine and the `VoteService` that reads the current vote,
//! applies a transition through the vote store, and retries once on
//! concurrent modification.
pub mod engine;
pub mod errors;
pub mod service;

pub use errors::VoteError;
pub use service::VoteService;
