//! Pure data structures (DTOs) exchanged with the order feed and the presenter.

pub mod feed;
pub mod notification;
pub mod order;

pub use feed::*;
pub use notification::*;
pub use order::*;
