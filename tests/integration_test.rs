use order_notifier::clients::{MemoryTokenStore, TokenStore};
use order_notifier::config::NotifierConfig;
use order_notifier::lifecycle::NotifierSystem;
use order_notifier::mock::{MockFeed, RecordingPresenter};
use order_notifier::model::{Notification, OrderFeed, OrderId, OrderSnapshot, OrderState};
use order_notifier::notifier::{NotifierContext, StartOutcome, TickError, TickOutcome};
use std::sync::Arc;
use std::time::Duration;

/// Full session: login, cold-start baseline, new orders appearing, a
/// delivery finished from the detail screen, and a graceful shutdown.
#[tokio::test(start_paused = true)]
async fn test_full_notifier_session() {
    let feed = MockFeed::new();
    let presenter = RecordingPresenter::granting();
    let tokens = Arc::new(MemoryTokenStore::new());
    let context = NotifierContext::new(tokens.clone(), feed.source(), presenter.presenter());
    let system = NotifierSystem::new(context).with_check_delay(Duration::from_millis(500));

    // Not logged in yet: nothing to check.
    assert_eq!(
        system.notifier.check_now().await.unwrap(),
        TickOutcome::Skipped(TickError::Unauthenticated)
    );

    system.token_store.save("jwt-driver-7").await.unwrap();
    assert_eq!(
        system.notifier.start_minutes(1).await.unwrap(),
        StartOutcome::Started
    );

    // Unassigned counts across ticks: 0, 3, 3, 5, 0, 2.
    let counts = [0u64, 3, 3, 5, 0, 2];
    for (tick, count) in counts.iter().enumerate() {
        let state = if tick == 0 {
            OrderState::from("asignado")
        } else {
            OrderState::InProgress
        };
        feed.expect_fetch().return_ok(OrderFeed::new(
            vec![OrderSnapshot::new("101", state, "Av. Colón 1200")],
            *count,
        ));
    }
    for _ in counts {
        tokio::time::advance(Duration::from_secs(60)).await;
        system.notifier.is_running().await.unwrap();
    }
    assert_eq!(feed.calls(), counts.len());

    let new_orders: Vec<String> = presenter
        .presented()
        .into_iter()
        .map(|(_, body)| body)
        .collect();
    assert_eq!(
        new_orders,
        vec![
            "You have 3 new orders to dispatch.",
            "You have 5 new orders to dispatch.",
            "You have 2 new orders to dispatch.",
        ]
    );

    // The driver finishes order 101; the screen asks for a prompt check.
    feed.expect_fetch().return_ok(OrderFeed::new(
        vec![OrderSnapshot::new("101", OrderState::Delivered, "Av. Colón 1200")],
        2,
    ));
    let outcome = system.order_action_completed().await.unwrap().unwrap();
    assert_eq!(
        outcome.notifications(),
        &[Notification::Delivered {
            order_id: OrderId::from("101")
        }]
    );

    assert!(feed.tokens_seen().iter().all(|t| t == "jwt-driver-7"));
    assert_eq!(presenter.permission_requests(), 1);

    system.notifier.stop().await.unwrap();
    system.shutdown().await.unwrap();
    feed.verify();
}

#[tokio::test]
async fn test_system_from_config_uses_file_token_store() {
    let dir = tempfile::tempdir().unwrap();
    let token_path = dir.path().join("session.jwt");
    let config: NotifierConfig = format!(
        r#"
        [api]
        base_url = "http://127.0.0.1:9"
        request_timeout_secs = 1

        [notifier]
        interval_minutes = 2
        check_delay_ms = 10

        [session]
        token_path = "{}"
        "#,
        token_path.display().to_string().replace('\\', "\\\\")
    )
    .parse()
    .unwrap();

    let presenter = RecordingPresenter::granting();
    let system = NotifierSystem::from_config(&config, presenter.presenter()).unwrap();

    // No token file yet, so the backend is never contacted.
    let outcome = system.order_action_completed().await.unwrap().unwrap();
    assert_eq!(outcome, TickOutcome::Skipped(TickError::Unauthenticated));

    system.token_store.save("jwt-from-login").await.unwrap();
    assert_eq!(
        tokio::fs::read_to_string(&token_path).await.unwrap(),
        "jwt-from-login"
    );

    assert_eq!(
        system.notifier.start(config.interval()).await.unwrap(),
        StartOutcome::Started
    );
    assert!(system.notifier.is_running().await.unwrap());
    system.notifier.stop().await.unwrap();

    system.shutdown().await.unwrap();
    assert!(presenter.presented().is_empty());
}
