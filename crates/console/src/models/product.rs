//! Product (menu item) entity and wire normalization.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use plateful_core::{CurrencyCode, MerchantId, ProductId};

use crate::error::StoreError;

/// A menu item offered by a merchant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub merchant_id: MerchantId,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub currency_code: CurrencyCode,
    pub category: Option<String>,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
}

/// Payload for creating a product.
#[derive(Debug, Clone, Serialize)]
pub struct ProductDraft {
    pub merchant_id: MerchantId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: Decimal,
    pub currency_code: CurrencyCode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// Partial update for a product. Only provided fields change.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProductPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_available: Option<bool>,
}

/// Wire shape for products; aliases accept the camelCase demo convention.
#[derive(Debug, Clone, Deserialize)]
pub struct RawProduct {
    pub id: String,
    #[serde(alias = "merchantId")]
    pub merchant_id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Decimal,
    #[serde(default, alias = "currencyCode")]
    pub currency_code: CurrencyCode,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default = "default_available", alias = "isAvailable")]
    pub is_available: bool,
    #[serde(alias = "createdAt")]
    pub created_at: DateTime<Utc>,
}

const fn default_available() -> bool {
    true
}

fn validate_price(price: Decimal) -> Result<(), StoreError> {
    if price < Decimal::ZERO {
        return Err(StoreError::Validation(
            "product price cannot be negative".to_string(),
        ));
    }
    Ok(())
}

impl TryFrom<RawProduct> for Product {
    type Error = StoreError;

    fn try_from(raw: RawProduct) -> Result<Self, Self::Error> {
        if raw.name.trim().is_empty() {
            return Err(StoreError::Validation(
                "product name cannot be empty".to_string(),
            ));
        }
        validate_price(raw.price)?;

        Ok(Self {
            id: ProductId::new(raw.id),
            merchant_id: MerchantId::new(raw.merchant_id),
            name: raw.name,
            description: raw.description,
            price: raw.price,
            currency_code: raw.currency_code,
            category: raw.category,
            is_available: raw.is_available,
            created_at: raw.created_at,
        })
    }
}

impl Product {
    /// Build a fresh product from a draft (local demo mode).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] for an empty name or a negative
    /// price.
    pub fn from_draft(draft: ProductDraft, now: DateTime<Utc>) -> Result<Self, StoreError> {
        if draft.name.trim().is_empty() {
            return Err(StoreError::Validation(
                "product name cannot be empty".to_string(),
            ));
        }
        validate_price(draft.price)?;

        Ok(Self {
            id: ProductId::generate(),
            merchant_id: draft.merchant_id,
            name: draft.name,
            description: draft.description,
            price: draft.price,
            currency_code: draft.currency_code,
            category: draft.category,
            is_available: true,
            created_at: now,
        })
    }

    /// Apply a partial update in place.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] for an empty patched name or a
    /// negative patched price.
    pub fn apply_patch(&mut self, patch: &ProductPatch) -> Result<(), StoreError> {
        if let Some(name) = &patch.name
            && name.trim().is_empty()
        {
            return Err(StoreError::Validation(
                "product name cannot be empty".to_string(),
            ));
        }
        if let Some(price) = patch.price {
            validate_price(price)?;
        }

        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(description) = &patch.description {
            self.description = Some(description.clone());
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(category) = &patch.category {
            self.category = Some(category.clone());
        }
        if let Some(available) = patch.is_available {
            self.is_available = available;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camel_case_fixture() -> serde_json::Value {
        serde_json::json!({
            "id": "p-1",
            "merchantId": "m-1",
            "name": "Pad Thai",
            "price": "11.50",
            "currencyCode": "USD",
            "category": "Noodles",
            "createdAt": "2026-07-15T10:00:00Z"
        })
    }

    #[test]
    fn camel_case_payload_normalizes() {
        let raw: RawProduct = serde_json::from_value(camel_case_fixture()).unwrap();
        let product = Product::try_from(raw).unwrap();

        assert_eq!(product.merchant_id, MerchantId::new("m-1"));
        assert_eq!(product.price, Decimal::new(1150, 2));
        assert_eq!(product.category.as_deref(), Some("Noodles"));
        // availability defaults to true when the wire omits it
        assert!(product.is_available);
    }

    #[test]
    fn normalization_is_idempotent() {
        let raw: RawProduct = serde_json::from_value(camel_case_fixture()).unwrap();
        let once = Product::try_from(raw).unwrap();

        let reserialized = serde_json::to_value(&once).unwrap();
        let raw_again: RawProduct = serde_json::from_value(reserialized).unwrap();
        let twice = Product::try_from(raw_again).unwrap();

        assert_eq!(once, twice);
    }

    #[test]
    fn negative_price_is_rejected() {
        let mut fixture = camel_case_fixture();
        fixture["price"] = serde_json::json!("-1.00");
        let raw: RawProduct = serde_json::from_value(fixture).unwrap();
        assert!(matches!(
            Product::try_from(raw),
            Err(StoreError::Validation(_))
        ));
    }

    #[test]
    fn patch_revalidates_the_name() {
        let raw: RawProduct = serde_json::from_value(camel_case_fixture()).unwrap();
        let mut product = Product::try_from(raw).unwrap();

        let patch = ProductPatch {
            name: Some("   ".to_string()),
            ..ProductPatch::default()
        };
        assert!(product.apply_patch(&patch).is_err());
        assert_eq!(product.name, "Pad Thai");
    }
}
