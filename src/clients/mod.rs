//! External collaborators of the notifier, each behind an `async_trait` seam.
//!
//! - [`TokenStore`] - where the session token lives
//! - [`OrderFeedSource`] - the remote order notification endpoint
//! - [`NotificationPresenter`] - the platform notification API

pub mod order_feed;
pub mod presenter;
pub mod token_store;

pub use order_feed::*;
pub use presenter::*;
pub use token_store::*;
