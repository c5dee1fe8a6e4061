//! # Notifier Actor
//!
//! The "server" half of the order change notifier. It owns the
//! [`ChangeDetector`] and the polling timer, and processes
//! [`NotifierRequest`]s and timer fires in a single loop.
//!
//! **Concurrency Model**:
//! Timer ticks and out-of-band `check_now` requests are handled by the same
//! task, one at a time. A tick that is still waiting on the network delays
//! the next timer fire instead of overlapping with it, and the detector
//! needs no `Mutex`.

use crate::clients::{FeedError, NotificationPresenter, OrderFeedSource, TokenStore};
use crate::model::OrderFeed;
use crate::notifier::{
    ChangeDetector, NotifierRequest, StartOutcome, StopOutcome, TickError, TickOutcome,
    MAX_INTERVAL,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{self, Instant, Interval, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Dependencies injected into the actor when it starts running.
#[derive(Clone)]
pub struct NotifierContext {
    pub token_store: Arc<dyn TokenStore>,
    pub feed: Arc<dyn OrderFeedSource>,
    pub presenter: Arc<dyn NotificationPresenter>,
    /// Forget the session token when the backend answers 401.
    pub clear_token_on_unauthorized: bool,
}

impl NotifierContext {
    pub fn new(
        token_store: Arc<dyn TokenStore>,
        feed: Arc<dyn OrderFeedSource>,
        presenter: Arc<dyn NotificationPresenter>,
    ) -> Self {
        Self {
            token_store,
            feed,
            presenter,
            clear_token_on_unauthorized: true,
        }
    }

    pub fn clear_token_on_unauthorized(mut self, clear: bool) -> Self {
        self.clear_token_on_unauthorized = clear;
        self
    }
}

enum Event {
    Request(NotifierRequest),
    TimerFired,
}

/// The actor that polls the order feed and raises notifications.
pub struct NotifierActor {
    receiver: mpsc::Receiver<NotifierRequest>,
    detector: ChangeDetector,
    timer: Option<Interval>,
    permission_granted: bool,
}

impl NotifierActor {
    pub(crate) fn new(receiver: mpsc::Receiver<NotifierRequest>) -> Self {
        Self {
            receiver,
            detector: ChangeDetector::new(),
            timer: None,
            permission_granted: false,
        }
    }

    /// Runs the actor's event loop until every client has been dropped.
    ///
    /// Notification permission is requested once, before the first request
    /// is processed.
    pub async fn run(mut self, context: NotifierContext) {
        self.permission_granted = context.presenter.request_permission().await;
        info!(permission_granted = self.permission_granted, "Notifier started");

        loop {
            // Timer fires win over queued requests.
            let event = tokio::select! {
                biased;
                _ = next_fire(&mut self.timer) => Event::TimerFired,
                request = self.receiver.recv() => match request {
                    Some(request) => Event::Request(request),
                    None => break,
                },
            };

            match event {
                Event::Request(request) => self.handle(request, &context).await,
                Event::TimerFired => {
                    debug!("Timer fired");
                    self.tick(&context).await;
                }
            }
        }

        info!(tracked_orders = self.detector.tracked_orders(), "Shutdown");
    }

    async fn handle(&mut self, request: NotifierRequest, context: &NotifierContext) {
        match request {
            NotifierRequest::Start {
                interval,
                respond_to,
            } => {
                let _ = respond_to.send(self.start(interval));
            }
            NotifierRequest::Stop { respond_to } => {
                let outcome = if self.timer.take().is_some() {
                    info!("Polling stopped");
                    StopOutcome::Stopped
                } else {
                    debug!("Polling already stopped");
                    StopOutcome::AlreadyStopped
                };
                let _ = respond_to.send(outcome);
            }
            NotifierRequest::CheckNow { respond_to } => {
                debug!("Check requested");
                let outcome = self.tick(context).await;
                let _ = respond_to.send(outcome);
            }
            NotifierRequest::IsRunning { respond_to } => {
                let _ = respond_to.send(self.timer.is_some());
            }
        }
    }

    fn start(&mut self, interval: Duration) -> StartOutcome {
        if !self.permission_granted {
            warn!("Notification permission not granted, polling not started");
            return StartOutcome::PermissionDenied;
        }

        // Raw requests bypass the client's bounds check.
        let interval = interval.min(MAX_INTERVAL);
        let mut timer = time::interval_at(Instant::now() + interval, interval);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

        if self.timer.replace(timer).is_some() {
            info!(interval_secs = interval.as_secs_f64(), "Polling restarted");
            StartOutcome::Restarted
        } else {
            info!(interval_secs = interval.as_secs_f64(), "Polling started");
            StartOutcome::Started
        }
    }

    /// One poll-and-diff cycle. Never fails: errors become `Skipped`.
    async fn tick(&mut self, context: &NotifierContext) -> TickOutcome {
        let feed = match poll(context).await {
            Ok(feed) => feed,
            Err(e) => {
                match &e {
                    TickError::Unauthenticated => debug!(error = %e, "Tick skipped"),
                    _ => warn!(error = %e, "Tick skipped"),
                }
                return TickOutcome::Skipped(e);
            }
        };

        let queued = self.detector.observe(&feed);
        for notification in &queued {
            info!(%notification, "Dispatching");
            context
                .presenter
                .present(notification.title(), &notification.body())
                .await;
        }
        info!(
            assigned = feed.assigned_orders.len(),
            unassigned = feed.unassigned_count(),
            dispatched = queued.len(),
            "Tick complete"
        );
        TickOutcome::Dispatched(queued)
    }
}

async fn poll(context: &NotifierContext) -> Result<OrderFeed, TickError> {
    let token = match context.token_store.get().await {
        Ok(Some(token)) => token,
        Ok(None) => return Err(TickError::Unauthenticated),
        Err(e) => {
            warn!(error = %e, "Could not read session token");
            return Err(TickError::Unauthenticated);
        }
    };

    match context.feed.fetch(&token).await {
        Ok(feed) => {
            debug!(?feed, "Feed received");
            Ok(feed)
        }
        Err(FeedError::Unauthorized) => {
            if context.clear_token_on_unauthorized {
                info!("Session rejected, clearing token");
                if let Err(e) = context.token_store.remove().await {
                    warn!(error = %e, "Could not clear session token");
                }
            }
            Err(TickError::Unauthenticated)
        }
        Err(e) => Err(e.into()),
    }
}

async fn next_fire(timer: &mut Option<Interval>) {
    match timer {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::MemoryTokenStore;
    use crate::mock::{MockFeed, RecordingPresenter};
    use tokio::sync::oneshot;

    #[tokio::test]
    async fn raw_start_with_huge_interval_is_clamped() {
        let feed = MockFeed::new();
        let presenter = RecordingPresenter::granting();
        let context = NotifierContext::new(
            Arc::new(MemoryTokenStore::new()),
            feed.source(),
            presenter.presenter(),
        );
        let (sender, receiver) = mpsc::channel(4);
        let handle = tokio::spawn(NotifierActor::new(receiver).run(context));

        let (respond_to, response) = oneshot::channel();
        sender
            .send(NotifierRequest::Start {
                interval: Duration::MAX,
                respond_to,
            })
            .await
            .unwrap();
        assert_eq!(response.await.unwrap(), StartOutcome::Started);

        let (respond_to, response) = oneshot::channel();
        sender
            .send(NotifierRequest::IsRunning { respond_to })
            .await
            .unwrap();
        assert!(response.await.unwrap());

        drop(sender);
        handle.await.unwrap();
        feed.verify();
    }
}
