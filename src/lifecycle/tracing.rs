//! # Observability & Tracing
//!
//! [`setup_tracing`] initializes structured logging with the `tracing` crate.
//!
//! ## Configuration
//!
//! Compact format without the crate/module prefix (`with_target(false)`).
//! `RUST_LOG` wins when set; otherwise the level passed in by the binary
//! (`--log-level`) is used.
//!
//! ## What Gets Traced
//!
//! - **Actor lifecycle**: `Notifier started` (with the permission result) and `Shutdown`
//! - **Timer**: `Polling started`, `Polling restarted`, `Polling stopped`
//! - **Ticks**: `Tick complete` with assigned/unassigned/dispatched counts,
//!   or `Tick skipped` with the reason
//! - **Notifications**: one `Dispatching` event per notification
//!
//! ## Usage Examples
//!
//! ```bash
//! # Compact logs (default)
//! RUST_LOG=info order-notifier --config config.toml
//!
//! # Full feed payloads and per-order baseline/state events
//! RUST_LOG=debug order-notifier --config config.toml
//!
//! # Only the detector
//! RUST_LOG=order_notifier::notifier::detector=debug order-notifier
//! ```
//!
//! With `RUST_LOG=info` a tick that finds a delivered order looks like:
//!
//! ```text
//! INFO Dispatching notification=Order delivered: Order 17 was marked as delivered.
//! INFO Notification title="Order delivered" body="Order 17 was marked as delivered."
//! INFO Tick complete assigned=3 unassigned=0 dispatched=1
//! ```

use tracing_subscriber::EnvFilter;

pub fn setup_tracing(default_level: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}
