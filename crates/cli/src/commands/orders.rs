//! Order flow commands.

use chrono::Utc;
use tracing::info;

use plateful_console::progression::StatusSchedule;
use plateful_console::{Console, ConsoleConfig};

/// List cached orders.
///
/// # Errors
///
/// Returns an error if the console cannot be opened or refreshed.
pub async fn list() -> Result<(), Box<dyn std::error::Error>> {
    let console = Console::open(ConsoleConfig::from_env()?)?;
    console.orders.store().refresh().await?;

    for order in console.orders.store().snapshot() {
        info!(
            "{} [{}] {} - {}",
            order.order_number,
            order.status,
            order.customer_name,
            order.total_price().display()
        );
    }
    Ok(())
}

/// Advance every due demo order one lifecycle step.
///
/// Requires a signed-in identity with `manage_orders` (see `pf-cli login`).
///
/// # Errors
///
/// Returns an error if no identity is signed in or the advance fails.
pub async fn advance() -> Result<(), Box<dyn std::error::Error>> {
    let console = Console::open(ConsoleConfig::from_env()?)?;

    let advanced = console
        .orders
        .advance_due(&StatusSchedule::standard(), Utc::now())
        .await?;

    if advanced.is_empty() {
        info!("no orders due");
    }
    for transition in advanced {
        info!(
            "order {}: {} -> {}",
            transition.order_id, transition.from, transition.to
        );
    }
    Ok(())
}
