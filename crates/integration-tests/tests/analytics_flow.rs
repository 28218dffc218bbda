//! Derived views stay consistent with store mutations.

use chrono::Utc;

use plateful_console::analytics::TimeWindow;
use plateful_console::models::ReviewDraft;
use plateful_core::{MerchantId, OrderStatus, Role};

use plateful_integration_tests::signed_in_console;

#[tokio::test]
async fn rating_stats_follow_new_reviews() {
    let ctx = signed_in_console(Role::SuperAdmin);
    let merchant = MerchantId::new("m-1");

    let before = ctx.console.merchant_rating_stats(&merchant);
    assert_eq!(before.average_rating, "4.4");
    assert_eq!(before.total_reviews, 5);

    ctx.console
        .reviews
        .store()
        .create(ReviewDraft {
            merchant_id: merchant.clone(),
            product_id: None,
            order_id: None,
            rating: 1,
            title: None,
            comment: Some("Cold food".to_string()),
            author: "Frank".to_string(),
        })
        .await
        .unwrap();

    let after = ctx.console.merchant_rating_stats(&merchant);
    assert_eq!(after.total_reviews, 6);
    // (22 + 1) / 6 = 3.8333... -> 3.8
    assert_eq!(after.average_rating, "3.8");
    assert_eq!(after.rating_distribution[&1], 1);
}

#[tokio::test]
async fn kpis_exclude_cancelled_orders() {
    let ctx = signed_in_console(Role::Admin);
    let window = TimeWindow::last_days(3650, Utc::now());

    let before = ctx.console.kpis(&window);
    let orders = ctx.console.orders.store().snapshot();
    let active = orders
        .iter()
        .filter(|o| o.status != OrderStatus::Cancelled)
        .count();
    assert_eq!(before.order_count as usize, active);

    // Cancelling a pending order removes it from the rollup.
    let pending = orders
        .iter()
        .find(|o| o.status == OrderStatus::Pending)
        .unwrap();
    ctx.console
        .orders
        .set_status(pending.id.as_str(), OrderStatus::Cancelled)
        .await
        .unwrap();

    let after = ctx.console.kpis(&window);
    assert_eq!(after.order_count, before.order_count - 1);
    assert!(after.total_revenue < before.total_revenue);
}

#[tokio::test]
async fn notifications_clear_as_they_are_read() {
    let ctx = signed_in_console(Role::Admin);

    let unread = ctx.console.unread_notifications();
    assert!(unread > 0);

    let order = ctx
        .console
        .orders
        .store()
        .snapshot()
        .into_iter()
        .find(|o| !o.notification_read)
        .unwrap();
    ctx.console
        .orders
        .mark_notification_read(order.id.as_str())
        .await
        .unwrap();

    assert_eq!(ctx.console.unread_notifications(), unread - 1);

    // A status change surfaces the order again.
    let confirmable = ctx
        .console
        .orders
        .store()
        .snapshot()
        .into_iter()
        .find(|o| o.status == OrderStatus::Pending)
        .unwrap();
    ctx.console
        .orders
        .mark_notification_read(confirmable.id.as_str())
        .await
        .unwrap();
    let unread = ctx.console.unread_notifications();

    ctx.console
        .orders
        .set_status(confirmable.id.as_str(), OrderStatus::Confirmed)
        .await
        .unwrap();
    assert_eq!(ctx.console.unread_notifications(), unread + 1);
}
