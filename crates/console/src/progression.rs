//! Deterministic order progression for local demo mode.
//!
//! Instead of background timers mutating orders, progression is a pure
//! function of the order list and a clock reading: an order is "due" once it
//! has dwelled in its current status for the scheduled time, measured from
//! `updated_at`. The order store applies due transitions one forward step at
//! a time, so a call sequence with increasing `now` values reproduces the
//! same lifecycle walk every run.

use chrono::{DateTime, Duration, Utc};

use plateful_core::{OrderId, OrderStatus};

use crate::models::Order;

/// Dwell times per non-terminal status.
#[derive(Debug, Clone)]
pub struct StatusSchedule {
    pending: Duration,
    confirmed: Duration,
    preparing: Duration,
    ready: Duration,
}

impl StatusSchedule {
    /// The demo default: a new order reaches `delivered` in about half an
    /// hour of simulated time.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            pending: Duration::minutes(2),
            confirmed: Duration::minutes(3),
            preparing: Duration::minutes(12),
            ready: Duration::minutes(10),
        }
    }

    /// A schedule with a uniform dwell for every status (test helper and
    /// fast-forward demos).
    #[must_use]
    pub const fn uniform(dwell: Duration) -> Self {
        Self {
            pending: dwell,
            confirmed: dwell,
            preparing: dwell,
            ready: dwell,
        }
    }

    /// Scheduled dwell for a status; `None` for terminal states.
    #[must_use]
    pub const fn dwell(&self, status: OrderStatus) -> Option<Duration> {
        match status {
            OrderStatus::Pending => Some(self.pending),
            OrderStatus::Confirmed => Some(self.confirmed),
            OrderStatus::Preparing => Some(self.preparing),
            OrderStatus::Ready => Some(self.ready),
            OrderStatus::Delivered | OrderStatus::Cancelled => None,
        }
    }
}

/// One forward step an order is due for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DueTransition {
    pub order_id: OrderId,
    pub from: OrderStatus,
    pub to: OrderStatus,
}

/// Compute the forward steps due at `now`.
///
/// Each order contributes at most one step per call; orders appear in input
/// order, so the result is deterministic for a given list and clock reading.
#[must_use]
pub fn due_transitions(
    orders: &[Order],
    schedule: &StatusSchedule,
    now: DateTime<Utc>,
) -> Vec<DueTransition> {
    orders
        .iter()
        .filter_map(|order| {
            let dwell = schedule.dwell(order.status)?;
            if now - order.updated_at < dwell {
                return None;
            }
            let to = order.status.next()?;
            Some(DueTransition {
                order_id: order.id.clone(),
                from: order.status,
                to,
            })
        })
        .collect()
}
