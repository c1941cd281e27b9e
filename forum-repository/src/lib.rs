//! # Forum Repository
//! This crate provides traits and implementations for interacting with the
//! forum data store. It includes definitions for errors, interfaces, a
//! PostgreSQL implementation, and an in-process implementation for tests and
//! local development.
pub mod errors;
pub mod interfaces;
pub mod memory;
pub mod postgres;

pub use errors::RepositoryError;
pub use interfaces::{QuestionRepository, VoteRepository};
pub use memory::InMemoryForumRepository;
pub use postgres::{PostgresQuestionRepository, PostgresVoteRepository};
