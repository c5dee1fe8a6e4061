//! # Order Notifier
//!
//! > **Local notifications for a delivery driver's order feed.**
//!
//! This crate polls the delivery backend for the orders assigned to the
//! logged-in driver, compares each snapshot with the previous one, and raises
//! local notifications when something worth knowing happened:
//!
//! - new unassigned orders are waiting,
//! - an order in progress was delivered,
//! - an order in progress was marked as not delivered,
//! - the destination address of an order changed.
//!
//! ## 🏗️ Design
//!
//! The notifier is a single actor running in its own Tokio task. It owns the
//! last observed state of every order and the polling timer, and handles
//! timer fires and client requests one at a time. Ticks therefore never
//! overlap, and an out-of-band "check right now" after a delivery simply
//! queues behind a tick that is already running.
//!
//! Polling is best-effort. A missing session, an unreachable server or an
//! unexpected payload skips the tick, gets logged, and leaves the notifier's
//! memory untouched.
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. The Engine ([`notifier`])
//! - [`ChangeDetector`](notifier::ChangeDetector): the snapshot diff.
//! - [`NotifierActor`](notifier::NotifierActor): timer, ticks, dispatch.
//! - [`NotifierClient`](notifier::NotifierClient): `start`, `stop`, `check_now`, `check_after`.
//!
//! ### 2. The Collaborators ([`clients`])
//! Token store, order feed and notification presenter, each behind a trait.
//!
//! ### 3. The Data ([`model`])
//! Order snapshots, the feed payload and the notifications themselves.
//!
//! ### 4. The Orchestrator ([`lifecycle`])
//! [`NotifierSystem`](lifecycle::NotifierSystem) wires everything together;
//! [`setup_tracing`](lifecycle::setup_tracing) configures logging.
//!
//! ### 5. Configuration ([`config`]) and test doubles ([`mock`])
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! RUST_LOG=info cargo run -- --config config.toml --token "$JWT"
//! ```
//!
//! ### Running Tests
//!
//! ```bash
//! cargo test
//! ```

pub mod clients;
pub mod config;
pub mod lifecycle;
pub mod mock;
pub mod model;
pub mod notifier;
