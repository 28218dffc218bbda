//! Read-only reports over console data.

use chrono::Utc;
use tracing::info;

use plateful_console::analytics::TimeWindow;
use plateful_console::{Console, ConsoleConfig};
use plateful_core::MerchantId;

/// Print rating statistics, optionally scoped to one merchant.
///
/// # Errors
///
/// Returns an error if the console cannot be opened or refreshed.
pub async fn stats(merchant: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let console = Console::open(ConsoleConfig::from_env()?)?;
    console.reviews.store().refresh().await?;

    let stats = match merchant {
        Some(id) => console.merchant_rating_stats(&MerchantId::new(id)),
        None => console.rating_stats(),
    };

    info!("Rating statistics");
    info!("  Average rating: {}", stats.average_rating);
    info!("  Total reviews: {}", stats.total_reviews);
    for (star, count) in stats.rating_distribution.iter().rev() {
        info!("  {star} star: {count}");
    }
    Ok(())
}

/// Print the KPI rollup for the last `days` days.
///
/// # Errors
///
/// Returns an error if the console cannot be opened or refreshed.
pub async fn kpi(days: i64) -> Result<(), Box<dyn std::error::Error>> {
    let console = Console::open(ConsoleConfig::from_env()?)?;
    console.orders.store().refresh().await?;

    let window = TimeWindow::last_days(days, Utc::now());
    let kpis = console.kpis(&window);

    info!("KPIs over the last {days} days");
    info!("  Orders: {}", kpis.order_count);
    info!("  Revenue: {}", kpis.total_revenue);
    info!("  Average order value: {:.2}", kpis.average_order_value);
    info!("  Unique customers: {}", kpis.unique_customers);
    info!("  Unread notifications: {}", console.unread_notifications());
    Ok(())
}
