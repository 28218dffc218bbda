//! Seed the local demo data directory.

use tracing::info;

use plateful_console::config::{ConsoleConfig, Mode};
use plateful_console::seed::seed_demo_data;
use plateful_console::storage::{LocalStore, keys};

const RESOURCE_KEYS: [&str; 5] = [
    keys::MERCHANTS,
    keys::PRODUCTS,
    keys::ORDERS,
    keys::REVIEWS,
    keys::COUPONS,
];

/// Seed demo fixtures, optionally wiping the resource lists first.
///
/// # Errors
///
/// Returns an error in remote mode or when the data directory cannot be
/// written.
pub fn run(force: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = ConsoleConfig::from_env()?;
    if config.mode == Mode::Remote {
        return Err("seed works on local demo data; unset PLATEFUL_API_URL".into());
    }

    let storage = LocalStore::open(&config.data_dir)?;

    if force {
        for key in RESOURCE_KEYS {
            storage.clear(key)?;
        }
        info!("cleared existing demo data");
    }

    if seed_demo_data(&storage)? {
        info!(dir = %storage.dir().display(), "demo data ready");
    } else {
        info!("demo data already present; use --force to reset");
    }
    Ok(())
}
