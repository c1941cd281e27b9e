use std::time::Duration;

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Settings for a [`crate::VoteController`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteControllerConfig {
    /// How long a vote request may run before it is treated as failed and rolled back.
    pub request_timeout: Duration,
}

impl VoteControllerConfig {
    pub fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }
}

impl Default for VoteControllerConfig {
    fn default() -> Self {
        Self {
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}
