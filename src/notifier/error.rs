//! Error types for the notifier.

use crate::clients::FeedError;
use thiserror::Error;

/// Errors returned by [`NotifierClient`](crate::notifier::NotifierClient) calls.
///
/// These never describe a failed poll; see [`TickError`] for that.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum NotifierError {
    /// The notifier actor is no longer running.
    #[error("Notifier closed")]
    ActorClosed,

    /// The notifier actor dropped the response channel.
    #[error("Notifier dropped response channel")]
    ActorDropped,

    /// The polling interval was zero or longer than
    /// [`MAX_INTERVAL`](crate::notifier::MAX_INTERVAL).
    #[error("Polling interval must be greater than zero and at most 24 hours")]
    InvalidInterval,
}

/// Why a tick produced no notifications.
///
/// Ticks are best-effort: every variant is logged and swallowed by the actor.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TickError {
    /// No session token is stored, so there is nothing to check.
    #[error("No session token")]
    Unauthenticated,

    /// The backend could not be reached or answered with an error status.
    #[error("Transport failure: {0}")]
    TransportFailure(String),

    /// The backend answered with an unexpected payload.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl From<FeedError> for TickError {
    fn from(e: FeedError) -> Self {
        match e {
            FeedError::Unauthorized => TickError::Unauthenticated,
            FeedError::Transport(msg) => TickError::TransportFailure(msg),
            FeedError::Status(code) => TickError::TransportFailure(format!("HTTP {}", code)),
            FeedError::Malformed(msg) => TickError::MalformedResponse(msg),
        }
    }
}
