//! # Change Detector
//!
//! The bookkeeping half of the notifier: remembers what each order looked
//! like on the previous tick and turns the difference into [`Notification`]s.
//!
//! ## Rules
//!
//! - The first time an order id is seen it is only recorded (baseline).
//!   This holds even when the order is already delivered or cancelled.
//! - `in_progress -> delivered` queues [`Notification::Delivered`].
//! - `in_progress -> not_delivered` queues [`Notification::Cancelled`].
//! - Any other state change is recorded silently.
//! - A destination change where both values are non-empty queues
//!   [`Notification::DestinationChanged`].
//! - The unassigned count notifies when it rises above the last notified
//!   count. Only a zero count lowers that baseline (back to zero).
//!
//! The detector is plain data, owned by the notifier actor. It never sees a
//! failed tick, so a failed fetch leaves it untouched.

use crate::model::{Notification, OrderFeed, OrderId, OrderState};
use std::collections::HashMap;
use tracing::debug;

/// In-memory state carried between ticks.
#[derive(Debug, Default, Clone)]
pub struct ChangeDetector {
    last_state: HashMap<OrderId, OrderState>,
    last_destination: HashMap<OrderId, String>,
    last_notified_count: Option<u64>,
}

impl ChangeDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compares `feed` with the previous observation, records it, and returns
    /// the notifications to raise in dispatch order.
    ///
    /// Assigned-order notifications come first, in feed order, followed by
    /// the new-orders notification if any.
    pub fn observe(&mut self, feed: &OrderFeed) -> Vec<Notification> {
        let mut queued = Vec::new();

        for order in &feed.assigned_orders {
            let Some(previous) = self.last_state.get(&order.id) else {
                debug!(order_id = %order.id, state = %order.state, "Baseline");
                self.last_state.insert(order.id.clone(), order.state.clone());
                self.last_destination
                    .insert(order.id.clone(), order.destination.clone());
                continue;
            };

            match (previous, &order.state) {
                (OrderState::InProgress, OrderState::Delivered) => {
                    queued.push(Notification::Delivered {
                        order_id: order.id.clone(),
                    });
                }
                (OrderState::InProgress, OrderState::NotDelivered) => {
                    queued.push(Notification::Cancelled {
                        order_id: order.id.clone(),
                    });
                }
                (previous, current) if previous != current => {
                    debug!(order_id = %order.id, from = %previous, to = %current, "State changed");
                }
                _ => {}
            }

            if let Some(previous) = self.last_destination.get(&order.id) {
                if !previous.is_empty()
                    && !order.destination.is_empty()
                    && *previous != order.destination
                {
                    queued.push(Notification::DestinationChanged {
                        order_id: order.id.clone(),
                        from: previous.clone(),
                        to: order.destination.clone(),
                    });
                }
            }

            self.last_state.insert(order.id.clone(), order.state.clone());
            self.last_destination
                .insert(order.id.clone(), order.destination.clone());
        }

        let count = feed.unassigned_count();
        if count > 0 {
            if self.last_notified_count.map_or(true, |last| count > last) {
                queued.push(Notification::NewOrders { count });
                self.last_notified_count = Some(count);
            }
        } else {
            self.last_notified_count = Some(0);
        }

        queued
    }

    /// Last recorded state of `id`, if it has been observed.
    pub fn last_state(&self, id: &OrderId) -> Option<&OrderState> {
        self.last_state.get(id)
    }

    /// Last recorded destination of `id`, if it has been observed.
    pub fn last_destination(&self, id: &OrderId) -> Option<&str> {
        self.last_destination.get(id).map(String::as_str)
    }

    /// Unassigned count the user was last told about (`None` before the first tick).
    pub fn last_notified_count(&self) -> Option<u64> {
        self.last_notified_count
    }

    /// Number of distinct orders observed so far.
    pub fn tracked_orders(&self) -> usize {
        self.last_state.len()
    }
}
