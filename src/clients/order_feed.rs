//! # Order Notification Feed
//!
//! Read-only poll of the backend's order notification endpoint.

use crate::model::OrderFeed;
use async_trait::async_trait;
use reqwest::{header, StatusCode};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, instrument};

/// Errors that can occur while fetching the order feed.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FeedError {
    /// The backend rejected the bearer token (HTTP 401).
    #[error("Session rejected by the server")]
    Unauthorized,

    /// The request never produced a response (DNS, connect, timeout...).
    #[error("Transport error: {0}")]
    Transport(String),

    /// The backend answered with a non-success status.
    #[error("Unexpected HTTP status: {0}")]
    Status(u16),

    /// The body was not the expected JSON document.
    #[error("Malformed feed payload: {0}")]
    Malformed(String),
}

/// Source of [`OrderFeed`] snapshots.
#[async_trait]
pub trait OrderFeedSource: Send + Sync {
    /// Fetches the current feed on behalf of the session owning `token`.
    async fn fetch(&self, token: &str) -> Result<OrderFeed, FeedError>;
}

/// [`OrderFeedSource`] backed by the REST API.
#[derive(Debug, Clone)]
pub struct HttpOrderFeed {
    client: reqwest::Client,
    url: String,
}

impl HttpOrderFeed {
    /// Builds a feed client for `{base_url}{path}` with a per-request timeout.
    pub fn new(base_url: &str, path: &str, timeout: Duration) -> Result<Self, FeedError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FeedError::Transport(e.to_string()))?;
        Ok(Self::with_client(client, base_url, path))
    }

    /// Uses an existing `reqwest::Client` (shared connection pool).
    pub fn with_client(client: reqwest::Client, base_url: &str, path: &str) -> Self {
        Self {
            client,
            url: format!("{}{}", base_url.trim_end_matches('/'), path),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl OrderFeedSource for HttpOrderFeed {
    #[instrument(skip(self, token), fields(url = %self.url))]
    async fn fetch(&self, token: &str) -> Result<OrderFeed, FeedError> {
        let response = self
            .client
            .get(&self.url)
            .bearer_auth(token)
            .header(header::CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|e| FeedError::Transport(e.to_string()))?;

        let status = response.status();
        debug!(status = status.as_u16(), "Feed responded");
        if status == StatusCode::UNAUTHORIZED {
            return Err(FeedError::Unauthorized);
        }
        if !status.is_success() {
            return Err(FeedError::Status(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FeedError::Transport(e.to_string()))?;
        OrderFeed::from_slice(&body).map_err(|e| FeedError::Malformed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Serves exactly one canned HTTP response and hands back the raw request.
    async fn serve_once(
        status_line: &'static str,
        body: &'static str,
    ) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 4096];
            let n = socket.read(&mut buf).await.unwrap();
            let response = format!(
                "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            String::from_utf8_lossy(&buf[..n]).to_string()
        });
        (base_url, handle)
    }

    fn feed_for(base_url: &str) -> HttpOrderFeed {
        let client = reqwest::Client::builder()
            .no_proxy()
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap();
        HttpOrderFeed::with_client(client, base_url, "/orders/updates")
    }

    #[test]
    fn joins_base_url_and_path() {
        let feed = feed_for("https://api.example.com/");
        assert_eq!(feed.url(), "https://api.example.com/orders/updates");
    }

    #[tokio::test]
    async fn fetch_sends_bearer_token_and_decodes_body() {
        let (base_url, server) = serve_once(
            "200 OK",
            r#"{"assignedOrders":[{"id":"a1","estado":"in_progress","destino":"Calle 1"}],"totalUnassigned":2}"#,
        )
        .await;

        let feed = feed_for(&base_url).fetch("jwt-123").await.unwrap();
        assert_eq!(feed.assigned_orders.len(), 1);
        assert_eq!(feed.unassigned_count(), 2);

        let request = server.await.unwrap().to_lowercase();
        assert!(request.starts_with("get /orders/updates"));
        assert!(request.contains("authorization: bearer jwt-123"));
    }

    #[tokio::test]
    async fn unauthorized_status_is_reported() {
        let (base_url, _server) = serve_once("401 Unauthorized", "{}").await;
        let err = feed_for(&base_url).fetch("expired").await.unwrap_err();
        assert_eq!(err, FeedError::Unauthorized);
    }

    #[tokio::test]
    async fn server_error_is_reported_as_status() {
        let (base_url, _server) = serve_once("500 Internal Server Error", "{}").await;
        let err = feed_for(&base_url).fetch("jwt").await.unwrap_err();
        assert_eq!(err, FeedError::Status(500));
    }

    #[tokio::test]
    async fn unexpected_body_is_malformed() {
        let (base_url, _server) = serve_once("200 OK", r#"{"assignedOrders": 3}"#).await;
        let err = feed_for(&base_url).fetch("jwt").await.unwrap_err();
        assert!(matches!(err, FeedError::Malformed(_)), "got {:?}", err);
    }

    #[tokio::test]
    async fn refused_connection_is_a_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let err = feed_for(&base_url).fetch("jwt").await.unwrap_err();
        assert!(matches!(err, FeedError::Transport(_)), "got {:?}", err);
    }
}
