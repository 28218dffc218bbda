//! Session context carrying the signed-in identity.
//!
//! The session is an explicit object handed to store constructors and the
//! access evaluator; there is no ambient global identity. Lifecycle:
//! `init` (load the persisted identity or start anonymous) -> active ->
//! `teardown` (clear the persisted identity on sign-out).

use plateful_core::Identity;

use crate::storage::{LocalStore, StorageError, keys};

/// The current console session.
///
/// Immutable once constructed; signing in or out produces a new session (and
/// fresh stores built from it).
#[derive(Debug, Clone)]
pub struct Session {
    identity: Option<Identity>,
}

impl Session {
    /// A session with no signed-in identity. Every permission check against
    /// it fails closed.
    #[must_use]
    pub const fn anonymous() -> Self {
        Self { identity: None }
    }

    /// A session for a signed-in identity.
    #[must_use]
    pub const fn signed_in(identity: Identity) -> Self {
        Self {
            identity: Some(identity),
        }
    }

    /// Initialize a session from local storage, falling back to anonymous if
    /// no identity was persisted.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::DataCorruption`] if a persisted identity
    /// exists but cannot be decoded.
    pub fn init(storage: &LocalStore) -> Result<Self, StorageError> {
        let identity = storage.read::<Identity>(keys::ADMIN_USER)?;
        Ok(Self { identity })
    }

    /// Persist this session's identity so the next `init` restores it.
    ///
    /// Anonymous sessions clear any previously persisted identity.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the identity cannot be written.
    pub fn persist(&self, storage: &LocalStore) -> Result<(), StorageError> {
        match &self.identity {
            Some(identity) => storage.write(keys::ADMIN_USER, identity),
            None => storage.clear(keys::ADMIN_USER),
        }
    }

    /// Tear the session down: clear the persisted identity.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the persisted identity cannot be removed.
    pub fn teardown(storage: &LocalStore) -> Result<(), StorageError> {
        storage.clear(keys::ADMIN_USER)
    }

    /// The signed-in identity, if any.
    #[must_use]
    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }
}
