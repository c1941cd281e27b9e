//! # Forum Shared
//! This crate defines the data structures shared across the forum workspace.
//! It includes identities, vote targets, vote values and actions, stored vote
//! records, counter snapshots, the question/answer read models, and the vote
//! transition table used by both the server and the optimistic client.
pub mod transition;
pub mod types;

pub use transition::{VoteTransition, transition};
