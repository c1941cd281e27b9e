//! Forum API Library
//!
//! This library provides the HTTP surface of the forum: configuration
//! management, dependency wiring, identity extraction, the vote and question
//! routes, and the AI text-generation collaborator.

pub mod ai;
pub mod config;
pub mod errors;
pub mod http;
pub mod services;

pub use config::{ApiConfig, Dependencies};
pub use errors::{ApiError, StartupError};
pub use http::{AppState, router};
