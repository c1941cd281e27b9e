//! Client side of the voting subsystem.
//!
//! This crate provides:
//! - [`VoteController`] the optimistic per-target vote control
//! - [`VoteGateway`] trait for the remote `getVoteState` / `castVote` operations
//! - [`HttpVoteGateway`] production gateway talking to the forum API
//! - [`Notifier`] trait for user-visible notifications
//!
//! ## Usage
//!
//! ```ignore
//! use forum_client::{HttpVoteGateway, TracingNotifier, VoteController, VoteControllerConfig};
//!
//! let gateway = Arc::new(HttpVoteGateway::new("http://localhost:8080"));
//! let controller = VoteController::new(
//!     VoteTarget::question(id),
//!     question.upvotes,
//!     gateway,
//!     Arc::new(TracingNotifier),
//!     VoteControllerConfig::default(),
//! );
//! controller.set_user(Some(user));
//! controller.load().await;
//!
//! if let ClickOutcome::Pending(pending) = controller.click(VoteAction::ClickUp) {
//!     // `controller.displayed()` already shows the new vote and count.
//!     pending.settle().await;
//! }
//! ```
mod config;
mod controller;
mod errors;
mod gateway;
mod notifier;

pub use config::VoteControllerConfig;
pub use controller::{ClickOutcome, DisplayedVote, PendingVote, VoteController, VoteSettlement};
pub use errors::ClientError;
pub use gateway::{HttpVoteGateway, VoteGateway};
pub use notifier::{Notification, Notifier, TracingNotifier};
