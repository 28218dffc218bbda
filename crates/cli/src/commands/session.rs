//! Sign console identities in and out of the local session.

use tracing::info;

use plateful_console::Session;
use plateful_console::config::{ConsoleConfig, Mode};
use plateful_console::storage::LocalStore;
use plateful_core::{Email, Identity, Role, UserId};

/// Persist a signed-in identity for subsequent commands.
///
/// # Errors
///
/// Returns an error for an invalid email or role, in remote mode, or when
/// the identity cannot be persisted.
pub fn login(email: &str, name: &str, role: &str) -> Result<(), Box<dyn std::error::Error>> {
    let config = ConsoleConfig::from_env()?;
    if config.mode == Mode::Remote {
        return Err("login manages the local demo session; unset PLATEFUL_API_URL".into());
    }

    let email = Email::parse(email)?;
    let role: Role = role.parse()?;

    let identity = Identity {
        id: UserId::generate(),
        name: name.to_string(),
        email,
        role,
    };

    let storage = LocalStore::open(&config.data_dir)?;
    Session::signed_in(identity).persist(&storage)?;

    info!(%name, %role, "signed in");
    Ok(())
}

/// Clear the persisted identity.
///
/// # Errors
///
/// Returns an error when the identity cannot be removed.
pub fn logout() -> Result<(), Box<dyn std::error::Error>> {
    let config = ConsoleConfig::from_env()?;
    let storage = LocalStore::open(&config.data_dir)?;
    Session::teardown(&storage)?;
    info!("signed out");
    Ok(())
}
