//! This module defines and re-exports the interfaces for the forum repository.
//! It serves as a central point for accessing traits related to data interaction.
mod questions;
mod votes;

pub use questions::QuestionRepository;
pub use votes::VoteRepository;
