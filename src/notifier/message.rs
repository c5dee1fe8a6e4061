//! Requests accepted by the notifier actor and the values it answers with.

use crate::model::Notification;
use crate::notifier::TickError;
use std::time::Duration;
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by the actor.
pub type Response<T> = oneshot::Sender<T>;

/// Internal message type sent to the notifier actor.
///
/// The actor handles one request at a time, interleaved with its own timer
/// fires, so a tick never runs concurrently with another tick.
#[derive(Debug)]
pub enum NotifierRequest {
    /// Install (or replace) the polling timer.
    Start {
        interval: Duration,
        respond_to: Response<StartOutcome>,
    },
    /// Remove the polling timer.
    Stop { respond_to: Response<StopOutcome> },
    /// Run one tick now.
    CheckNow { respond_to: Response<TickOutcome> },
    /// Report whether the polling timer is installed.
    IsRunning { respond_to: Response<bool> },
}

/// Result of a `start` request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// A new timer was installed; no previous timer existed.
    Started,
    /// An existing timer was replaced by one with the new interval.
    Restarted,
    /// Notification permission was never granted; nothing was scheduled.
    PermissionDenied,
}

/// Result of a `stop` request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    Stopped,
    AlreadyStopped,
}

/// What a single tick did.
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// The feed was read and these notifications were presented (possibly none).
    Dispatched(Vec<Notification>),
    /// The tick was abandoned; detector state is unchanged.
    Skipped(TickError),
}

impl TickOutcome {
    /// Notifications presented during the tick.
    pub fn notifications(&self) -> &[Notification] {
        match self {
            TickOutcome::Dispatched(sent) => sent,
            TickOutcome::Skipped(_) => &[],
        }
    }
}
