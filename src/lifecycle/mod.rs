//! # Notifier Lifecycle & Orchestration
//!
//! Starts the notifier actor with its collaborators wired in, and shuts it
//! down again.
//!
//! ## Dependency Injection via Context
//!
//! The actor is created without dependencies; the token store, feed and
//! presenter are injected when it starts running:
//!
//! ```rust,ignore
//! let (actor, client) = notifier::new(32);
//! let handle = tokio::spawn(actor.run(NotifierContext::new(tokens, feed, presenter)));
//! ```
//!
//! Tests swap in [`MockFeed`](crate::mock::MockFeed) and
//! [`RecordingPresenter`](crate::mock::RecordingPresenter) through the same
//! context.
//!
//! ## Graceful Shutdown
//!
//! 1. **Drop all clients** - closes the sender side of the channel
//! 2. **Actor detects closure** - `receiver.recv()` returns `None`
//! 3. **Actor cleans up** - the timer is dropped and the final state logged
//! 4. **Await completion** - [`NotifierSystem::shutdown`] joins the task
//!
//! A tick in progress when the last client is dropped runs to completion.

pub mod notifier_system;
pub mod tracing;

pub use notifier_system::*;
pub use self::tracing::*;
