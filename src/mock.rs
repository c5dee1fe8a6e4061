//! # Mock Collaborators
//!
//! Utilities for testing the notifier without a backend or a notification tray.
//!
//! - [`MockFeed`] answers `fetch` calls from a queue of expectations.
//! - [`RecordingPresenter`] remembers everything it was asked to show.
//!
//! # Example
//! ```ignore
//! let feed = MockFeed::new();
//! feed.expect_fetch().return_ok(OrderFeed::new(vec![], 3));
//! feed.expect_fetch().return_err(FeedError::Status(502));
//!
//! let presenter = RecordingPresenter::granting();
//! // Wire both into a NotifierContext, run ticks...
//! feed.verify(); // Ensures all expectations were met
//! ```

use crate::clients::{FeedError, NotificationPresenter, OrderFeedSource};
use crate::model::OrderFeed;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

// =============================================================================
// ORDER FEED
// =============================================================================

struct FetchExpectation {
    delay: Option<Duration>,
    response: Result<OrderFeed, FeedError>,
}

#[derive(Default)]
struct FeedState {
    expectations: Mutex<VecDeque<FetchExpectation>>,
    tokens: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    unexpected: AtomicUsize,
}

/// A scripted [`OrderFeedSource`] with expectation tracking.
///
/// Each `fetch` consumes the next expectation in order. A fetch with no
/// expectation left returns a transport error and makes [`verify`](Self::verify)
/// fail.
#[derive(Clone, Default)]
pub struct MockFeed {
    state: Arc<FeedState>,
}

impl MockFeed {
    /// Creates a new mock feed with no expectations.
    pub fn new() -> Self {
        Self::default()
    }

    /// Expects one `fetch` call.
    pub fn expect_fetch(&self) -> FetchExpectationBuilder {
        FetchExpectationBuilder {
            delay: None,
            state: self.state.clone(),
        }
    }

    /// The mock as a shareable trait object.
    pub fn source(&self) -> Arc<dyn OrderFeedSource> {
        Arc::new(self.clone())
    }

    /// Tokens passed to `fetch`, in call order.
    pub fn tokens_seen(&self) -> Vec<String> {
        self.state.tokens.lock().unwrap().clone()
    }

    /// Number of `fetch` calls so far.
    pub fn calls(&self) -> usize {
        self.state.tokens.lock().unwrap().len()
    }

    /// Highest number of `fetch` calls that were in progress at the same time.
    pub fn max_in_flight(&self) -> usize {
        self.state.max_in_flight.load(Ordering::SeqCst)
    }

    /// Verifies that all expectations were met and nothing unexpected happened.
    pub fn verify(&self) {
        let unexpected = self.state.unexpected.load(Ordering::SeqCst);
        if unexpected > 0 {
            panic!("{} unexpected fetch call(s)", unexpected);
        }
        let remaining = self.state.expectations.lock().unwrap().len();
        if remaining > 0 {
            panic!("Not all expectations were met. {} remaining", remaining);
        }
    }
}

#[async_trait]
impl OrderFeedSource for MockFeed {
    async fn fetch(&self, token: &str) -> Result<OrderFeed, FeedError> {
        self.state.tokens.lock().unwrap().push(token.to_string());
        let expectation = self.state.expectations.lock().unwrap().pop_front();
        let Some(expectation) = expectation else {
            self.state.unexpected.fetch_add(1, Ordering::SeqCst);
            return Err(FeedError::Transport("unexpected fetch".to_string()));
        };

        let now = self.state.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if let Some(delay) = expectation.delay {
            tokio::time::sleep(delay).await;
        }
        self.state.in_flight.fetch_sub(1, Ordering::SeqCst);

        expectation.response
    }
}

/// Builder for `fetch` expectations.
pub struct FetchExpectationBuilder {
    delay: Option<Duration>,
    state: Arc<FeedState>,
}

impl FetchExpectationBuilder {
    /// Makes the fetch take `delay` before answering.
    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Sets the expectation to return a successful result.
    pub fn return_ok(self, feed: OrderFeed) {
        self.push(Ok(feed));
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: FeedError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<OrderFeed, FeedError>) {
        self.state
            .expectations
            .lock()
            .unwrap()
            .push_back(FetchExpectation {
                delay: self.delay,
                response,
            });
    }
}

// =============================================================================
// PRESENTER
// =============================================================================

/// [`NotificationPresenter`] that records `(title, body)` pairs.
#[derive(Clone)]
pub struct RecordingPresenter {
    granted: Arc<AtomicBool>,
    permission_requests: Arc<AtomicUsize>,
    presented: Arc<Mutex<Vec<(String, String)>>>,
}

impl RecordingPresenter {
    /// A presenter whose permission prompt is accepted.
    pub fn granting() -> Self {
        Self::with_permission(true)
    }

    /// A presenter whose permission prompt is declined.
    pub fn denying() -> Self {
        Self::with_permission(false)
    }

    fn with_permission(granted: bool) -> Self {
        Self {
            granted: Arc::new(AtomicBool::new(granted)),
            permission_requests: Arc::new(AtomicUsize::new(0)),
            presented: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// The presenter as a shareable trait object.
    pub fn presenter(&self) -> Arc<dyn NotificationPresenter> {
        Arc::new(self.clone())
    }

    /// Everything presented so far, oldest first.
    pub fn presented(&self) -> Vec<(String, String)> {
        self.presented.lock().unwrap().clone()
    }

    /// How many times permission was requested.
    pub fn permission_requests(&self) -> usize {
        self.permission_requests.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NotificationPresenter for RecordingPresenter {
    async fn request_permission(&self) -> bool {
        self.permission_requests.fetch_add(1, Ordering::SeqCst);
        self.granted.load(Ordering::SeqCst)
    }

    async fn present(&self, title: &str, body: &str) {
        self.presented
            .lock()
            .unwrap()
            .push((title.to_string(), body.to_string()));
    }
}
