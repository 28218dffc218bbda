//! Merchant (restaurant) entity and wire normalization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use plateful_core::MerchantId;

use crate::error::StoreError;

/// A restaurant on the platform.
///
/// Merchants with order history are never hard-deleted; deletion deactivates
/// them so their orders stay attributable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Merchant {
    pub id: MerchantId,
    pub name: String,
    pub cuisine: Option<String>,
    pub address: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Payload for creating a merchant.
#[derive(Debug, Clone, Serialize)]
pub struct MerchantDraft {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cuisine: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// Partial update for a merchant. Only provided fields change.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MerchantPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cuisine: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// Wire shape for merchants; aliases accept the camelCase demo convention.
#[derive(Debug, Clone, Deserialize)]
pub struct RawMerchant {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub cuisine: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default = "default_active", alias = "isActive")]
    pub is_active: bool,
    #[serde(alias = "createdAt")]
    pub created_at: DateTime<Utc>,
}

const fn default_active() -> bool {
    true
}

impl TryFrom<RawMerchant> for Merchant {
    type Error = StoreError;

    fn try_from(raw: RawMerchant) -> Result<Self, Self::Error> {
        if raw.name.trim().is_empty() {
            return Err(StoreError::Validation(
                "merchant name cannot be empty".to_string(),
            ));
        }

        Ok(Self {
            id: MerchantId::new(raw.id),
            name: raw.name,
            cuisine: raw.cuisine,
            address: raw.address,
            is_active: raw.is_active,
            created_at: raw.created_at,
        })
    }
}

impl Merchant {
    /// Build a fresh merchant from a draft (local demo mode).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] for an empty name.
    pub fn from_draft(draft: MerchantDraft, now: DateTime<Utc>) -> Result<Self, StoreError> {
        if draft.name.trim().is_empty() {
            return Err(StoreError::Validation(
                "merchant name cannot be empty".to_string(),
            ));
        }

        Ok(Self {
            id: MerchantId::generate(),
            name: draft.name,
            cuisine: draft.cuisine,
            address: draft.address,
            is_active: true,
            created_at: now,
        })
    }

    /// Apply a partial update in place.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] for an empty patched name.
    pub fn apply_patch(&mut self, patch: &MerchantPatch) -> Result<(), StoreError> {
        if let Some(name) = &patch.name
            && name.trim().is_empty()
        {
            return Err(StoreError::Validation(
                "merchant name cannot be empty".to_string(),
            ));
        }

        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(cuisine) = &patch.cuisine {
            self.cuisine = Some(cuisine.clone());
        }
        if let Some(address) = &patch.address {
            self.address = Some(address.clone());
        }
        if let Some(active) = patch.is_active {
            self.is_active = active;
        }
        Ok(())
    }
}
