//! User-visible notifications raised by the vote control.
use forum_shared::types::TargetKind;
use tracing::{info, warn};

/// A notification surfaced to the end user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// A signed-out user clicked a vote control.
    AuthRequired { kind: TargetKind },
    /// A vote request failed and the displayed state was rolled back.
    VoteFailed,
}

impl Notification {
    pub fn message(&self) -> String {
        match self {
            Notification::AuthRequired { kind } => {
                format!("Please log in to vote on {}.", kind.collection())
            }
            Notification::VoteFailed => {
                "Failed to register your vote. Please try again.".to_string()
            }
        }
    }
}

/// Delivers notifications to whatever surface displays them.
///
/// Called from the controller and from its background tasks, so
/// implementations must not block.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Writes notifications to the log. Used by headless clients.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification {
            Notification::AuthRequired { .. } => {
                info!(message = %notification.message(), "Auth required")
            }
            Notification::VoteFailed => warn!(message = %notification.message(), "Vote failed"),
        }
    }
}
