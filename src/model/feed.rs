//! Response body of the order notification endpoint.

use crate::model::OrderSnapshot;
use serde::{Deserialize, Serialize};

/// One poll's worth of server-reported order state.
///
/// Missing lists decode as empty. When `totalUnassigned` is absent the
/// length of `unassignedOrders` is used instead, see
/// [`OrderFeed::unassigned_count`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderFeed {
    #[serde(default)]
    pub assigned_orders: Vec<OrderSnapshot>,
    #[serde(default)]
    pub unassigned_orders: Vec<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_unassigned: Option<u64>,
}

impl OrderFeed {
    /// Builds a feed from assigned snapshots and an explicit unassigned count.
    pub fn new(assigned_orders: Vec<OrderSnapshot>, total_unassigned: u64) -> Self {
        Self {
            assigned_orders,
            unassigned_orders: Vec::new(),
            total_unassigned: Some(total_unassigned),
        }
    }

    /// Number of orders nobody has picked up yet.
    pub fn unassigned_count(&self) -> u64 {
        self.total_unassigned
            .unwrap_or(self.unassigned_orders.len() as u64)
    }

    /// Decodes a raw response body.
    pub fn from_slice(body: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(body)
    }
}
