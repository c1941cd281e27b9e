//! Configuration module for the Forum API.
//! Defines and manages application-wide settings and dependencies.
mod dependencies;
mod settings;

pub use dependencies::Dependencies;
pub use settings::{ApiConfig, AiConfig, ConfigError, LogFormat};
