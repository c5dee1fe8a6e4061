//! A delivery order as reported by the order notification feed.
//!
//! Snapshots are ephemeral: a fresh set arrives with every tick and nothing
//! here is persisted. The notifier only keeps the last observed
//! [`OrderState`] and destination per [`OrderId`].

use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Type-safe identifier for Orders.
///
/// The backend sends ids either as JSON strings or numbers; both end up here
/// as their string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawOrderId")]
pub struct OrderId(pub String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawOrderId {
    Text(String),
    Number(serde_json::Number),
}

impl From<RawOrderId> for OrderId {
    fn from(raw: RawOrderId) -> Self {
        match raw {
            RawOrderId::Text(s) => Self(s),
            RawOrderId::Number(n) => Self(n.to_string()),
        }
    }
}

impl From<&str> for OrderId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for OrderId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Delivery state of an order.
///
/// Only the `InProgress -> Delivered` and `InProgress -> NotDelivered`
/// transitions raise notifications. Every other state string the backend
/// uses is kept verbatim in [`OrderState::Other`] so changes are still
/// tracked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OrderState {
    InProgress,
    Delivered,
    NotDelivered,
    Other(String),
}

impl OrderState {
    /// Canonical wire name of the state.
    pub fn as_str(&self) -> &str {
        match self {
            OrderState::InProgress => "in_progress",
            OrderState::Delivered => "delivered",
            OrderState::NotDelivered => "not_delivered",
            OrderState::Other(raw) => raw,
        }
    }
}

impl From<&str> for OrderState {
    fn from(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "in_progress" | "en_proceso" | "en proceso" => OrderState::InProgress,
            "delivered" | "entregado" | "completado" => OrderState::Delivered,
            "not_delivered" | "no_entregado" | "no entregado" | "cancelado" | "cancelled" => {
                OrderState::NotDelivered
            }
            _ => OrderState::Other(raw.to_string()),
        }
    }
}

impl From<String> for OrderState {
    fn from(raw: String) -> Self {
        OrderState::from(raw.as_str())
    }
}

impl From<OrderState> for String {
    fn from(state: OrderState) -> Self {
        state.as_str().to_string()
    }
}

impl Display for OrderState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One assigned order in a feed response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderSnapshot {
    pub id: OrderId,
    #[serde(rename = "estado")]
    pub state: OrderState,
    #[serde(rename = "destino", default, deserialize_with = "null_as_empty")]
    pub destination: String,
}

impl OrderSnapshot {
    /// Creates a new OrderSnapshot instance.
    ///
    /// # Arguments
    /// * `id` - Order identifier as sent by the backend
    /// * `state` - Current delivery state
    /// * `destination` - Destination address, empty when unknown
    pub fn new(id: impl Into<OrderId>, state: OrderState, destination: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            state,
            destination: destination.into(),
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_aliases_are_case_insensitive() {
        assert_eq!(OrderState::from("EN_PROCESO"), OrderState::InProgress);
        assert_eq!(OrderState::from("Entregado"), OrderState::Delivered);
        assert_eq!(OrderState::from("No Entregado"), OrderState::NotDelivered);
        assert_eq!(
            OrderState::from("asignado"),
            OrderState::Other("asignado".to_string())
        );
    }

    #[test]
    fn snapshot_accepts_numeric_id_and_null_destination() {
        let snapshot: OrderSnapshot =
            serde_json::from_str(r#"{"id": 42, "estado": "in_progress", "destino": null}"#)
                .unwrap();
        assert_eq!(snapshot.id, OrderId::from("42"));
        assert_eq!(snapshot.state, OrderState::InProgress);
        assert_eq!(snapshot.destination, "");
    }
}
