//! Optimistic vote control for one question or answer.
//!
//! A click updates the displayed vote and counter synchronously using the
//! shared transition table, then persists the action in a background task.
//! On failure the display reverts to the snapshot taken by that click.
//!
//! Only one request per target is in flight at a time: while a request is
//! pending the control is disabled and further clicks return
//! [`ClickOutcome::InFlight`]. Every rollback therefore targets the state
//! right before its own click.
//!
//! Vote fetches are tagged with the identity session and the click version
//! they started under. A fetch that returns after either moved on is dropped,
//! so a stale read never replaces the locally tracked vote.
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use forum_shared::transition;
use forum_shared::types::{CastOutcome, UserId, VoteAction, VoteTarget, VoteValue};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::config::VoteControllerConfig;
use crate::errors::ClientError;
use crate::gateway::VoteGateway;
use crate::notifier::{Notification, Notifier};

/// What the control currently shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayedVote {
    pub vote: Option<VoteValue>,
    pub upvotes: i64,
}

/// Result of a click.
#[derive(Debug)]
pub enum ClickOutcome {
    /// No signed-in user. A notification was raised and nothing changed.
    AuthRequired,
    /// A request for this target is still pending; the click was ignored.
    InFlight,
    /// The display was updated and the request is running in the background.
    Pending(PendingVote),
}

/// How a pending vote ended.
#[derive(Debug)]
pub enum VoteSettlement {
    /// The server applied the vote. The display keeps the optimistic projection.
    Confirmed(CastOutcome),
    /// The request failed or timed out and the display was restored.
    RolledBack(ClientError),
}

/// Handle to the background request started by a click.
#[derive(Debug)]
pub struct PendingVote {
    handle: JoinHandle<VoteSettlement>,
}

impl PendingVote {
    /// Waits for the request to finish.
    pub async fn settle(self) -> VoteSettlement {
        match self.handle.await {
            Ok(settlement) => settlement,
            Err(e) => VoteSettlement::RolledBack(ClientError::Transient(e.to_string())),
        }
    }
}

struct ControllerState {
    user: Option<UserId>,
    displayed: DisplayedVote,
    in_flight: bool,
    /// Bumped on every identity change so late responses for a previous
    /// user do not touch the display.
    session: u64,
    /// Bumped on every accepted click.
    version: u64,
}

/// Optimistic vote control bound to one target.
pub struct VoteController {
    target: VoteTarget,
    gateway: Arc<dyn VoteGateway>,
    notifier: Arc<dyn Notifier>,
    config: VoteControllerConfig,
    state: Arc<Mutex<ControllerState>>,
}

fn lock(state: &Mutex<ControllerState>) -> MutexGuard<'_, ControllerState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

impl VoteController {
    /// Creates a control showing `initial_upvotes` and no vote.
    pub fn new(
        target: VoteTarget,
        initial_upvotes: i64,
        gateway: Arc<dyn VoteGateway>,
        notifier: Arc<dyn Notifier>,
        config: VoteControllerConfig,
    ) -> Self {
        Self {
            target,
            gateway,
            notifier,
            config,
            state: Arc::new(Mutex::new(ControllerState {
                user: None,
                displayed: DisplayedVote {
                    vote: None,
                    upvotes: initial_upvotes,
                },
                in_flight: false,
                session: 0,
                version: 0,
            })),
        }
    }

    pub fn target(&self) -> VoteTarget {
        self.target
    }

    pub fn displayed(&self) -> DisplayedVote {
        lock(&self.state).displayed
    }

    /// Whether the control is disabled by a pending request.
    pub fn is_busy(&self) -> bool {
        lock(&self.state).in_flight
    }

    /// Switches the signed-in identity.
    ///
    /// The displayed vote belongs to the previous identity, so it is reset to
    /// none until [`VoteController::load`] runs for the new one. If a vote is
    /// pending at the time, the new identity's vote is fetched once that
    /// request settles.
    pub fn set_user(&self, user: Option<UserId>) {
        let mut state = lock(&self.state);
        if state.user == user {
            return;
        }
        state.user = user;
        state.displayed.vote = None;
        state.session += 1;
    }

    /// Adopts a counter value from an explicit refetch of the target.
    pub fn sync_upvotes(&self, upvotes: i64) {
        let mut state = lock(&self.state);
        if !state.in_flight {
            state.displayed.upvotes = upvotes;
        }
    }

    /// Fetches the stored vote of the signed-in user.
    ///
    /// Failures are logged and leave the displayed vote at none. The result is
    /// discarded if a click or identity change happened while it was loading.
    pub async fn load(&self) {
        refresh_vote(&self.state, self.gateway.as_ref(), self.target, self.config.request_timeout)
            .await;
    }

    /// Handles a click on one of the vote controls.
    ///
    /// Must be called from within a tokio runtime; the request is spawned
    /// onto it.
    pub fn click(&self, action: VoteAction) -> ClickOutcome {
        let mut state = lock(&self.state);
        let Some(user) = state.user.clone() else {
            drop(state);
            self.notifier.notify(Notification::AuthRequired {
                kind: self.target.kind,
            });
            return ClickOutcome::AuthRequired;
        };
        if state.in_flight {
            debug!(target_id = %self.target.id, "Vote control busy, click ignored");
            return ClickOutcome::InFlight;
        }

        let snapshot = state.displayed;
        let step = transition(snapshot.vote, action);
        state.displayed = DisplayedVote {
            vote: step.next,
            upvotes: snapshot.upvotes + step.delta,
        };
        state.in_flight = true;
        state.version += 1;
        let session = state.session;
        drop(state);

        let gateway = Arc::clone(&self.gateway);
        let notifier = Arc::clone(&self.notifier);
        let shared = Arc::clone(&self.state);
        let target = self.target;
        let timeout = self.config.request_timeout;

        let handle = tokio::spawn(async move {
            let result = tokio::time::timeout(timeout, gateway.cast_vote(&user, target, action))
                .await
                .unwrap_or(Err(ClientError::Timeout));

            let identity_changed = {
                let mut state = lock(&shared);
                state.in_flight = false;
                let identity_changed = state.session != session;
                if result.is_err() {
                    if identity_changed {
                        // The vote belongs to a previous identity; only the counter is shared.
                        state.displayed.upvotes = snapshot.upvotes;
                    } else {
                        state.displayed = snapshot;
                    }
                }
                identity_changed
            };

            let settlement = match result {
                Ok(outcome) => VoteSettlement::Confirmed(outcome),
                Err(e) => {
                    warn!(
                        target_kind = %target.kind,
                        target_id = %target.id,
                        action = %action,
                        error = %e,
                        "Vote failed, rolled back"
                    );
                    notifier.notify(Notification::VoteFailed);
                    VoteSettlement::RolledBack(e)
                }
            };

            // Loads for the new identity were dropped while this request was pending.
            if identity_changed {
                refresh_vote(&shared, gateway.as_ref(), target, timeout).await;
            }
            settlement
        });

        ClickOutcome::Pending(PendingVote { handle })
    }
}

async fn refresh_vote(
    shared: &Mutex<ControllerState>,
    gateway: &dyn VoteGateway,
    target: VoteTarget,
    timeout: Duration,
) {
    let (user, session, version) = {
        let state = lock(shared);
        match &state.user {
            Some(user) => (user.clone(), state.session, state.version),
            None => return,
        }
    };

    let fetched = tokio::time::timeout(timeout, gateway.fetch_vote(&user, target))
        .await
        .unwrap_or(Err(ClientError::Timeout));

    match fetched {
        Ok(vote) => {
            let mut state = lock(shared);
            if state.session == session && state.version == version && !state.in_flight {
                state.displayed.vote = vote;
            } else {
                debug!(target_id = %target.id, "Discarding stale vote state");
            }
        }
        Err(e) => {
            warn!(
                target_kind = %target.kind,
                target_id = %target.id,
                error = %e,
                "Failed to load vote state"
            );
        }
    }
}
