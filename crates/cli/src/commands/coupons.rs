//! Coupon commands.

use tracing::info;

use plateful_console::{Console, ConsoleConfig};

/// List coupons with their usage.
///
/// # Errors
///
/// Returns an error if the console cannot be opened or refreshed.
pub async fn list() -> Result<(), Box<dyn std::error::Error>> {
    let console = Console::open(ConsoleConfig::from_env()?)?;
    console.coupons.store().refresh().await?;

    for coupon in console.coupons.store().snapshot() {
        let state = if coupon.is_active { "active" } else { "inactive" };
        info!(
            "{} ({}) {}/{} uses [{state}]",
            coupon.code, coupon.id, coupon.times_used, coupon.max_uses
        );
    }
    Ok(())
}

/// Deactivate a coupon without deleting it.
///
/// Requires a signed-in identity with `manage_coupons`.
///
/// # Errors
///
/// Returns an error if the coupon is unknown or the session lacks the
/// permission.
pub async fn deactivate(id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let console = Console::open(ConsoleConfig::from_env()?)?;
    console.coupons.store().refresh().await?;

    let coupon = console.coupons.deactivate(id).await?;
    info!("coupon {} deactivated", coupon.code);
    Ok(())
}
