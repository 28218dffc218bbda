//! Derived order analytics: KPI rollups and the notification projection.
//!
//! Like rating stats, everything here is recomputed from the order list per
//! call; there is no incremental state to fall out of sync.

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;

use plateful_core::{OrderId, OrderStatus};

use crate::models::Order;

/// A half-open time window `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    /// The window covering the last `days` days up to (and excluding) `now`.
    #[must_use]
    pub fn last_days(days: i64, now: DateTime<Utc>) -> Self {
        Self {
            start: now - Duration::days(days),
            end: now,
        }
    }

    /// Whether `at` falls inside the window. The start is inclusive, the end
    /// exclusive, so adjacent windows never double-count an instant.
    #[must_use]
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at < self.end
    }
}

/// Key performance figures over a window of orders.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct KpiSummary {
    pub total_revenue: Decimal,
    pub order_count: u32,
    /// Zero when there are no orders in the window.
    pub average_order_value: Decimal,
    pub unique_customers: u32,
}

/// Compute KPIs for orders created inside `window`.
///
/// Cancelled orders are excluded from every figure; a cancelled order brought
/// in no revenue and should not dilute the average.
#[must_use]
pub fn kpi_summary(orders: &[Order], window: &TimeWindow) -> KpiSummary {
    let mut total_revenue = Decimal::ZERO;
    let mut order_count: u32 = 0;
    let mut customers: HashSet<String> = HashSet::new();

    for order in orders {
        if order.status == OrderStatus::Cancelled || !window.contains(order.created_at) {
            continue;
        }
        total_revenue += order.total;
        order_count += 1;
        let customer = order
            .customer_id
            .as_ref()
            .map_or_else(|| order.customer_name.clone(), |id| id.as_str().to_string());
        customers.insert(customer);
    }

    let average_order_value = if order_count == 0 {
        Decimal::ZERO
    } else {
        total_revenue / Decimal::from(order_count)
    };

    KpiSummary {
        total_revenue,
        order_count,
        average_order_value,
        unique_customers: u32::try_from(customers.len()).unwrap_or(u32::MAX),
    }
}

/// A console notification projected from an order.
///
/// Notifications are not stored; they are a view over the order list, so
/// marking one read is a patch on the underlying order.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Notification {
    pub order_id: OrderId,
    pub message: String,
    pub read: bool,
    pub at: DateTime<Utc>,
}

/// Project notifications from orders, newest first.
#[must_use]
pub fn notifications(orders: &[Order]) -> Vec<Notification> {
    let mut notifications: Vec<Notification> = orders
        .iter()
        .map(|order| Notification {
            order_id: order.id.clone(),
            message: match order.status {
                OrderStatus::Pending => format!("New order {} received", order.order_number),
                OrderStatus::Cancelled => format!("Order {} was cancelled", order.order_number),
                status => format!("Order {} is now {status}", order.order_number),
            },
            read: order.notification_read,
            at: order.updated_at,
        })
        .collect();
    notifications.sort_by(|a, b| b.at.cmp(&a.at));
    notifications
}

/// Number of unread notifications.
#[must_use]
pub fn unread_count(orders: &[Order]) -> usize {
    orders.iter().filter(|o| !o.notification_read).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use plateful_core::{CurrencyCode, MerchantId, UserId};

    fn order(
        id: &str,
        status: OrderStatus,
        total: Decimal,
        customer: Option<&str>,
        created_at: &str,
    ) -> Order {
        let created_at: DateTime<Utc> = created_at.parse().unwrap();
        Order {
            id: OrderId::new(id),
            order_number: format!("PF-{id}"),
            status,
            merchant_id: MerchantId::new("m-1"),
            customer_id: customer.map(UserId::new),
            customer_name: "Walk-in".to_string(),
            items: vec![],
            subtotal: total,
            total,
            currency_code: CurrencyCode::USD,
            table_number: None,
            notification_read: false,
            created_at,
            updated_at: created_at,
        }
    }

    fn window() -> TimeWindow {
        TimeWindow {
            start: "2026-08-01T00:00:00Z".parse().unwrap(),
            end: "2026-08-08T00:00:00Z".parse().unwrap(),
        }
    }

    #[test]
    fn window_is_half_open() {
        let w = window();
        assert!(w.contains(w.start));
        assert!(!w.contains(w.end));
    }

    #[test]
    fn cancelled_orders_are_excluded() {
        let orders = vec![
            order("1", OrderStatus::Delivered, Decimal::from(30), Some("c-1"), "2026-08-02T10:00:00Z"),
            order("2", OrderStatus::Cancelled, Decimal::from(99), Some("c-2"), "2026-08-03T10:00:00Z"),
            order("3", OrderStatus::Ready, Decimal::from(10), Some("c-1"), "2026-08-04T10:00:00Z"),
        ];

        let kpis = kpi_summary(&orders, &window());
        assert_eq!(kpis.order_count, 2);
        assert_eq!(kpis.total_revenue, Decimal::from(40));
        assert_eq!(kpis.average_order_value, Decimal::from(20));
        assert_eq!(kpis.unique_customers, 1);
    }

    #[test]
    fn out_of_window_orders_are_excluded() {
        let orders = vec![
            order("1", OrderStatus::Delivered, Decimal::from(30), None, "2026-07-20T10:00:00Z"),
            order("2", OrderStatus::Delivered, Decimal::from(12), None, "2026-08-08T00:00:00Z"),
        ];
        let kpis = kpi_summary(&orders, &window());
        assert_eq!(kpis.order_count, 0);
        assert_eq!(kpis.average_order_value, Decimal::ZERO);
    }

    #[test]
    fn notifications_project_newest_first() {
        let orders = vec![
            order("1", OrderStatus::Pending, Decimal::ZERO, None, "2026-08-02T10:00:00Z"),
            order("2", OrderStatus::Cancelled, Decimal::ZERO, None, "2026-08-05T10:00:00Z"),
        ];

        let feed = notifications(&orders);
        assert_eq!(feed.len(), 2);
        assert_eq!(feed[0].order_id, OrderId::new("2"));
        assert!(feed[0].message.contains("cancelled"));
        assert!(feed[1].message.contains("received"));
        assert_eq!(unread_count(&orders), 2);
    }
}
