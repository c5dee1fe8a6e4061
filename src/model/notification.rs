use crate::model::OrderId;
use std::fmt::Display;

/// A local notification the notifier decided to raise during a tick.
///
/// The presenter only sees [`title`](Notification::title) and
/// [`body`](Notification::body); the variant keeps the structured data for
/// logging and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// More unassigned orders are waiting than the last time we told the user.
    NewOrders { count: u64 },
    /// An order went from in progress to delivered.
    Delivered { order_id: OrderId },
    /// An order went from in progress to not delivered.
    Cancelled { order_id: OrderId },
    /// The destination address of an order changed.
    DestinationChanged {
        order_id: OrderId,
        from: String,
        to: String,
    },
}

impl Notification {
    pub fn title(&self) -> &'static str {
        match self {
            Notification::NewOrders { .. } => "New orders!",
            Notification::Delivered { .. } => "Order delivered",
            Notification::Cancelled { .. } => "Order cancelled",
            Notification::DestinationChanged { .. } => "Destination changed",
        }
    }

    pub fn body(&self) -> String {
        match self {
            Notification::NewOrders { count } => {
                format!("You have {} new orders to dispatch.", count)
            }
            Notification::Delivered { order_id } => {
                format!("Order {} was marked as delivered.", order_id)
            }
            Notification::Cancelled { order_id } => {
                format!("Order {} was marked as not delivered.", order_id)
            }
            Notification::DestinationChanged { order_id, from, to } => {
                format!("Order {} destination changed from {} to {}.", order_id, from, to)
            }
        }
    }
}

impl Display for Notification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.title(), self.body())
    }
}
