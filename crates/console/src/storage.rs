//! On-device key-value persistence for local demo mode.
//!
//! Each key maps to one JSON file under the data directory. Stores read their
//! list at initialization and rewrite it synchronously after every mutation,
//! so the on-disk state is durable before a mutator returns.
//!
//! # Keys
//!
//! - `orders` - Order list
//! - `merchants` - Merchant list
//! - `products` - Product list
//! - `reviews` - Review list
//! - `coupons` - Coupon list
//! - `transactions` - Payment transaction list
//! - `admin_notifications` - Dismissed-notification bookkeeping
//! - `admin_user` - The signed-in console identity

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Fixed storage keys.
pub mod keys {
    pub const ORDERS: &str = "orders";
    pub const MERCHANTS: &str = "merchants";
    pub const PRODUCTS: &str = "products";
    pub const REVIEWS: &str = "reviews";
    pub const COUPONS: &str = "coupons";
    pub const TRANSACTIONS: &str = "transactions";
    pub const ADMIN_NOTIFICATIONS: &str = "admin_notifications";
    pub const ADMIN_USER: &str = "admin_user";
}

/// Errors that can occur during local persistence.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("storage i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Data on disk is corrupted or not valid JSON for the expected type.
    #[error("data corruption under key '{key}': {detail}")]
    DataCorruption { key: String, detail: String },
}

/// A key-value JSON store over a data directory.
#[derive(Debug, Clone)]
pub struct LocalStore {
    dir: PathBuf,
}

impl LocalStore {
    /// Open (and create if needed) a local store rooted at `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    /// Whether a value exists under `key`.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.path_for(key).exists()
    }

    /// Read the value under `key`, or `None` if it has never been written.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::DataCorruption`] if the file exists but does
    /// not deserialize into `T`.
    pub fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }

        let bytes = fs::read(&path)?;
        let value = serde_json::from_slice(&bytes).map_err(|e| StorageError::DataCorruption {
            key: key.to_string(),
            detail: e.to_string(),
        })?;
        Ok(Some(value))
    }

    /// Write `value` under `key`, replacing any previous value.
    ///
    /// The write goes through a temporary file and a rename, so readers never
    /// observe a half-written list.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if the file cannot be written, or
    /// [`StorageError::DataCorruption`] if `value` fails to serialize.
    pub fn write<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let json = serde_json::to_vec_pretty(value).map_err(|e| StorageError::DataCorruption {
            key: key.to_string(),
            detail: e.to_string(),
        })?;

        let path = self.path_for(key);
        let tmp = self.dir.join(format!("{key}.json.tmp"));
        fs::write(&tmp, &json)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    /// Remove the value under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if the file exists but cannot be removed.
    pub fn clear(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key);
        if path.exists() {
            fs::remove_file(&path)?;
        }
        Ok(())
    }

    /// The directory this store writes into.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store() -> (TempDir, LocalStore) {
        let dir = TempDir::new().unwrap();
        let store = LocalStore::open(dir.path()).unwrap();
        (dir, store)
    }

    #[test]
    fn read_missing_key_returns_none() {
        let (_dir, store) = store();
        let value: Option<Vec<String>> = store.read(keys::ORDERS).unwrap();
        assert!(value.is_none());
    }

    #[test]
    fn write_then_read_round_trips() {
        let (_dir, store) = store();
        let orders = vec!["ord-1".to_string(), "ord-2".to_string()];
        store.write(keys::ORDERS, &orders).unwrap();

        let back: Option<Vec<String>> = store.read(keys::ORDERS).unwrap();
        assert_eq!(back, Some(orders));
        assert!(store.contains(keys::ORDERS));
    }

    #[test]
    fn corrupt_data_is_reported_with_key() {
        let (dir, store) = store();
        fs::write(dir.path().join("coupons.json"), b"not json").unwrap();

        let err = store.read::<Vec<String>>(keys::COUPONS).unwrap_err();
        assert!(err.to_string().contains("coupons"));
    }

    #[test]
    fn clear_removes_the_key() {
        let (_dir, store) = store();
        store.write(keys::ADMIN_USER, &"alice").unwrap();
        store.clear(keys::ADMIN_USER).unwrap();
        assert!(!store.contains(keys::ADMIN_USER));
    }
}
