//! Integration tests for Plateful.
//!
//! Tests run the console end to end in local demo mode against a temporary
//! data directory, so no network or external service is needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p plateful-integration-tests
//! ```

use tempfile::TempDir;

use plateful_console::{Console, ConsoleConfig};
use plateful_core::{Email, Identity, Role, UserId};

/// A local-mode console over a temporary data directory.
///
/// Keep the struct alive for the duration of the test; dropping it removes
/// the directory.
pub struct TestConsole {
    pub console: Console,
    _dir: TempDir,
}

/// Open a seeded local console signed in with `role`.
///
/// # Panics
///
/// Panics if the console cannot be opened; tests have no graceful path there.
#[must_use]
pub fn signed_in_console(role: Role) -> TestConsole {
    let dir = TempDir::new().expect("create temp dir");
    let console = Console::open(ConsoleConfig::local(dir.path()))
        .expect("open console")
        .sign_in(test_identity(role))
        .expect("sign in");
    TestConsole {
        console,
        _dir: dir,
    }
}

/// Open a seeded local console with no signed-in identity.
#[must_use]
pub fn anonymous_console() -> TestConsole {
    let dir = TempDir::new().expect("create temp dir");
    let console = Console::open(ConsoleConfig::local(dir.path())).expect("open console");
    TestConsole {
        console,
        _dir: dir,
    }
}

/// A fixed test identity with the given role.
#[must_use]
pub fn test_identity(role: Role) -> Identity {
    Identity {
        id: UserId::new("u-test"),
        name: "Test Operator".to_string(),
        email: Email::parse("operator@plateful.dev").expect("valid email"),
        role,
    }
}
