use crate::notifier::{NotifierError, NotifierRequest, StartOutcome, StopOutcome, TickOutcome};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, instrument};

/// Longest accepted polling interval.
pub const MAX_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

/// Cloneable handle to a running [`NotifierActor`](crate::notifier::NotifierActor).
///
/// Screens that finish or cancel an order hold a clone and call
/// [`check_after`](Self::check_after) once the mutation succeeds.
#[derive(Clone)]
pub struct NotifierClient {
    sender: mpsc::Sender<NotifierRequest>,
}

impl NotifierClient {
    pub fn new(sender: mpsc::Sender<NotifierRequest>) -> Self {
        Self { sender }
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> NotifierRequest,
    ) -> Result<T, NotifierError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| NotifierError::ActorClosed)?;
        response.await.map_err(|_| NotifierError::ActorDropped)
    }

    /// Starts polling every `interval`, replacing any running timer.
    ///
    /// Returns [`NotifierError::InvalidInterval`] for a zero interval or one
    /// above [`MAX_INTERVAL`].
    #[instrument(skip(self))]
    pub async fn start(&self, interval: Duration) -> Result<StartOutcome, NotifierError> {
        if interval.is_zero() || interval > MAX_INTERVAL {
            return Err(NotifierError::InvalidInterval);
        }
        debug!("Sending request");
        self.request(|respond_to| NotifierRequest::Start {
            interval,
            respond_to,
        })
        .await
    }

    /// [`start`](Self::start) with the interval given in whole minutes.
    pub async fn start_minutes(&self, minutes: u64) -> Result<StartOutcome, NotifierError> {
        self.start(Duration::from_secs(minutes.saturating_mul(60)))
            .await
    }

    /// Stops polling. Stopping an idle notifier reports `AlreadyStopped`.
    #[instrument(skip(self))]
    pub async fn stop(&self) -> Result<StopOutcome, NotifierError> {
        debug!("Sending request");
        self.request(|respond_to| NotifierRequest::Stop { respond_to })
            .await
    }

    /// Runs one tick now and waits for it to finish.
    ///
    /// If a timer tick is in progress this waits for it first.
    #[instrument(skip(self))]
    pub async fn check_now(&self) -> Result<TickOutcome, NotifierError> {
        debug!("Sending request");
        self.request(|respond_to| NotifierRequest::CheckNow { respond_to })
            .await
    }

    /// Schedules a [`check_now`](Self::check_now) after `delay` without
    /// blocking the caller.
    pub fn check_after(&self, delay: Duration) -> JoinHandle<Result<TickOutcome, NotifierError>> {
        let client = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            client.check_now().await
        })
    }

    /// Whether a polling timer is installed.
    pub async fn is_running(&self) -> Result<bool, NotifierError> {
        self.request(|respond_to| NotifierRequest::IsRunning { respond_to })
            .await
    }
}
