use crate::clients::{
    FileTokenStore, HttpOrderFeed, MemoryTokenStore, NotificationPresenter, TokenStore,
};
use crate::config::NotifierConfig;
use crate::notifier::{self, NotifierClient, NotifierContext, NotifierError, TickOutcome};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Capacity of the notifier's request channel.
const REQUEST_BUFFER: usize = 32;

/// Default pause between a finished order action and the follow-up check.
pub const DEFAULT_CHECK_DELAY: Duration = Duration::from_secs(1);

/// Runtime orchestrator for the order change notifier.
///
/// `NotifierSystem` is responsible for:
/// - **Lifecycle Management**: spawning the notifier actor and shutting it down
/// - **Dependency Wiring**: injecting the token store, feed and presenter
///
/// # Example
///
/// ```ignore
/// let system = NotifierSystem::new(context);
/// system.notifier.start_minutes(1).await?;
///
/// // After a delivery screen finishes an order:
/// system.order_action_completed();
///
/// system.shutdown().await?;
/// ```
pub struct NotifierSystem {
    /// Client for interacting with the notifier actor
    pub notifier: NotifierClient,

    /// Session token store shared with the actor
    pub token_store: Arc<dyn TokenStore>,

    check_delay: Duration,
    handle: JoinHandle<()>,
}

impl NotifierSystem {
    /// Spawns the notifier actor with the given collaborators.
    pub fn new(context: NotifierContext) -> Self {
        let token_store = context.token_store.clone();
        let (actor, notifier) = notifier::new(REQUEST_BUFFER);
        let handle = tokio::spawn(actor.run(context));

        Self {
            notifier,
            token_store,
            check_delay: DEFAULT_CHECK_DELAY,
            handle,
        }
    }

    /// Overrides the delay used by [`order_action_completed`](Self::order_action_completed).
    pub fn with_check_delay(mut self, delay: Duration) -> Self {
        self.check_delay = delay;
        self
    }

    /// Schedules a check shortly after an order was delivered or cancelled,
    /// so the driver hears about it without waiting for the next timer tick.
    pub fn order_action_completed(&self) -> JoinHandle<Result<TickOutcome, NotifierError>> {
        info!(
            delay = ?self.check_delay,
            "Order action completed, scheduling check"
        );
        self.notifier.check_after(self.check_delay)
    }

    /// Builds the HTTP feed and token store described by `config` and spawns
    /// the actor with `presenter`.
    pub fn from_config(
        config: &NotifierConfig,
        presenter: Arc<dyn NotificationPresenter>,
    ) -> Result<Self, String> {
        let feed = HttpOrderFeed::new(
            &config.api.base_url,
            &config.api.feed_path,
            config.request_timeout(),
        )
        .map_err(|e| e.to_string())?;
        info!(url = feed.url(), "Order feed configured");

        let token_store: Arc<dyn TokenStore> = match &config.session.token_path {
            Some(path) => {
                info!(path = %path.display(), "Using file token store");
                Arc::new(FileTokenStore::new(path))
            }
            None => Arc::new(MemoryTokenStore::new()),
        };

        let context = NotifierContext::new(token_store, Arc::new(feed), presenter)
            .clear_token_on_unauthorized(config.notifier.clear_token_on_unauthorized);
        Ok(Self::new(context).with_check_delay(config.check_delay()))
    }

    /// Gracefully shuts down the notifier.
    ///
    /// Dropping the client closes the request channel; the actor finishes the
    /// request it is handling, logs its final state and exits. Clones of the
    /// client held elsewhere keep the actor alive until they are dropped too.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down notifier...");
        drop(self.notifier);

        if let Err(e) = self.handle.await {
            error!("Notifier task failed: {:?}", e);
            return Err(format!("Notifier task failed: {:?}", e));
        }

        info!("Notifier shutdown complete.");
        Ok(())
    }
}
