//! Order change notifier: polling, diffing and dispatch.
//!
//! - [`ChangeDetector`] - compares consecutive feed snapshots
//! - [`NotifierActor`] - owns the detector and the timer, runs ticks sequentially
//! - [`NotifierClient`] - type-safe handle (`start`, `stop`, `check_now`, ...)

pub mod actor;
pub mod client;
pub mod detector;
pub mod error;
pub mod message;

pub use actor::*;
pub use client::*;
pub use detector::*;
pub use error::*;
pub use message::*;

use tokio::sync::mpsc;

/// Creates a new notifier actor and its client.
///
/// The actor does nothing until it is spawned with
/// [`NotifierActor::run`] and a [`NotifierContext`].
pub fn new(buffer_size: usize) -> (NotifierActor, NotifierClient) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (NotifierActor::new(receiver), NotifierClient::new(sender))
}
