use async_trait::async_trait;
use tracing::info;

/// Platform hook that shows local notifications.
///
/// Presentation is fire-and-forget: the notifier never waits for the user
/// and never retries.
#[async_trait]
pub trait NotificationPresenter: Send + Sync {
    /// Asks the platform for permission to show notifications.
    ///
    /// The notifier calls this once when it starts running.
    async fn request_permission(&self) -> bool;

    /// Shows one notification.
    async fn present(&self, title: &str, body: &str);
}

/// Presenter that writes every notification to the log.
///
/// Used by the headless binary, where there is no notification tray.
#[derive(Debug, Clone, Default)]
pub struct LogPresenter;

#[async_trait]
impl NotificationPresenter for LogPresenter {
    async fn request_permission(&self) -> bool {
        true
    }

    async fn present(&self, title: &str, body: &str) {
        info!(title, body, "Notification");
    }
}
