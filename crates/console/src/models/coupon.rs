//! Coupon entity and wire normalization.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use plateful_core::{CouponId, DiscountType};

use crate::error::StoreError;

/// A discount coupon.
///
/// Invariant: `times_used <= max_uses`. A coupon that has been used cannot be
/// hard-deleted; it is deactivated instead (see the store's delete guard).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coupon {
    pub id: CouponId,
    pub code: String,
    pub discount_type: DiscountType,
    pub discount_value: Decimal,
    pub min_order_amount: Decimal,
    pub max_uses: u32,
    pub times_used: u32,
    pub valid_from: DateTime<Utc>,
    pub valid_until: DateTime<Utc>,
    pub is_active: bool,
}

/// Payload for creating a coupon.
#[derive(Debug, Clone, Serialize)]
pub struct CouponDraft {
    pub code: String,
    pub discount_type: DiscountType,
    pub discount_value: Decimal,
    pub min_order_amount: Decimal,
    pub max_uses: u32,
    pub valid_from: DateTime<Utc>,
    pub valid_until: DateTime<Utc>,
}

/// Partial update for a coupon. Only provided fields change.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CouponPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_value: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_order_amount: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_uses: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_until: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// Wire shape for coupons; aliases accept the camelCase demo convention.
#[derive(Debug, Clone, Deserialize)]
pub struct RawCoupon {
    pub id: String,
    pub code: String,
    #[serde(alias = "discountType")]
    pub discount_type: DiscountType,
    #[serde(alias = "discountValue")]
    pub discount_value: Decimal,
    #[serde(default, alias = "minOrderAmount")]
    pub min_order_amount: Decimal,
    #[serde(alias = "maxUses")]
    pub max_uses: u32,
    #[serde(default, alias = "timesUsed")]
    pub times_used: u32,
    #[serde(alias = "validFrom")]
    pub valid_from: DateTime<Utc>,
    #[serde(alias = "validUntil")]
    pub valid_until: DateTime<Utc>,
    #[serde(default = "default_active", alias = "isActive")]
    pub is_active: bool,
}

const fn default_active() -> bool {
    true
}

fn validate_discount(discount_type: DiscountType, value: Decimal) -> Result<(), StoreError> {
    if value <= Decimal::ZERO {
        return Err(StoreError::Validation(
            "discount value must be positive".to_string(),
        ));
    }
    if discount_type == DiscountType::Percentage && value > Decimal::from(100) {
        return Err(StoreError::Validation(
            "percentage discount cannot exceed 100".to_string(),
        ));
    }
    Ok(())
}

impl TryFrom<RawCoupon> for Coupon {
    type Error = StoreError;

    fn try_from(raw: RawCoupon) -> Result<Self, Self::Error> {
        validate_discount(raw.discount_type, raw.discount_value)?;
        if raw.times_used > raw.max_uses {
            return Err(StoreError::Validation(format!(
                "coupon {} has times_used {} exceeding max_uses {}",
                raw.code, raw.times_used, raw.max_uses
            )));
        }

        Ok(Self {
            id: CouponId::new(raw.id),
            code: raw.code,
            discount_type: raw.discount_type,
            discount_value: raw.discount_value,
            min_order_amount: raw.min_order_amount,
            max_uses: raw.max_uses,
            times_used: raw.times_used,
            valid_from: raw.valid_from,
            valid_until: raw.valid_until,
            is_active: raw.is_active,
        })
    }
}

impl Coupon {
    /// Build a fresh coupon from a draft (local demo mode).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] for an empty code, a non-positive
    /// discount, a percentage over 100, or an inverted validity window.
    pub fn from_draft(draft: CouponDraft) -> Result<Self, StoreError> {
        if draft.code.trim().is_empty() {
            return Err(StoreError::Validation(
                "coupon code cannot be empty".to_string(),
            ));
        }
        validate_discount(draft.discount_type, draft.discount_value)?;
        if draft.valid_until <= draft.valid_from {
            return Err(StoreError::Validation(
                "coupon validity window must end after it starts".to_string(),
            ));
        }

        Ok(Self {
            id: CouponId::generate(),
            code: draft.code,
            discount_type: draft.discount_type,
            discount_value: draft.discount_value,
            min_order_amount: draft.min_order_amount,
            max_uses: draft.max_uses,
            times_used: 0,
            valid_from: draft.valid_from,
            valid_until: draft.valid_until,
            is_active: true,
        })
    }

    /// Apply a partial update in place.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] if the patched discount value is
    /// invalid or `max_uses` would drop below `times_used`.
    pub fn apply_patch(&mut self, patch: &CouponPatch) -> Result<(), StoreError> {
        if let Some(value) = patch.discount_value {
            validate_discount(self.discount_type, value)?;
        }
        if let Some(max_uses) = patch.max_uses
            && max_uses < self.times_used
        {
            return Err(StoreError::Validation(format!(
                "max_uses {max_uses} cannot drop below times_used {}",
                self.times_used
            )));
        }

        if let Some(value) = patch.discount_value {
            self.discount_value = value;
        }
        if let Some(min) = patch.min_order_amount {
            self.min_order_amount = min;
        }
        if let Some(max_uses) = patch.max_uses {
            self.max_uses = max_uses;
        }
        if let Some(until) = patch.valid_until {
            self.valid_until = until;
        }
        if let Some(active) = patch.is_active {
            self.is_active = active;
        }
        Ok(())
    }

    /// Whether deletion must fall back to deactivation.
    #[must_use]
    pub const fn has_usage(&self) -> bool {
        self.times_used > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camel_case_fixture() -> serde_json::Value {
        serde_json::json!({
            "id": "cpn-1",
            "code": "WELCOME10",
            "discountType": "percentage",
            "discountValue": "10",
            "minOrderAmount": "25",
            "maxUses": 100,
            "timesUsed": 3,
            "validFrom": "2026-08-01T00:00:00Z",
            "validUntil": "2026-09-01T00:00:00Z"
        })
    }

    #[test]
    fn camel_case_payload_normalizes() {
        let raw: RawCoupon = serde_json::from_value(camel_case_fixture()).unwrap();
        let coupon = Coupon::try_from(raw).unwrap();

        assert_eq!(coupon.code, "WELCOME10");
        assert_eq!(coupon.discount_type, DiscountType::Percentage);
        assert_eq!(coupon.times_used, 3);
        assert!(coupon.is_active);
        assert!(coupon.has_usage());
    }

    #[test]
    fn normalization_is_idempotent() {
        let raw: RawCoupon = serde_json::from_value(camel_case_fixture()).unwrap();
        let once = Coupon::try_from(raw).unwrap();

        let reserialized = serde_json::to_value(&once).unwrap();
        let raw_again: RawCoupon = serde_json::from_value(reserialized).unwrap();
        let twice = Coupon::try_from(raw_again).unwrap();

        assert_eq!(once, twice);
    }

    #[test]
    fn usage_above_max_is_rejected() {
        let mut fixture = camel_case_fixture();
        fixture["timesUsed"] = serde_json::json!(101);
        let raw: RawCoupon = serde_json::from_value(fixture).unwrap();
        assert!(matches!(
            Coupon::try_from(raw),
            Err(StoreError::Validation(_))
        ));
    }

    #[test]
    fn patch_cannot_shrink_max_uses_below_usage() {
        let raw: RawCoupon = serde_json::from_value(camel_case_fixture()).unwrap();
        let mut coupon = Coupon::try_from(raw).unwrap();

        let patch = CouponPatch {
            max_uses: Some(2),
            ..CouponPatch::default()
        };
        assert!(coupon.apply_patch(&patch).is_err());
        assert_eq!(coupon.max_uses, 100);
    }

    #[test]
    fn percentage_over_100_is_rejected() {
        let draft = CouponDraft {
            code: "BIG".to_string(),
            discount_type: DiscountType::Percentage,
            discount_value: Decimal::from(120),
            min_order_amount: Decimal::ZERO,
            max_uses: 10,
            valid_from: "2026-08-01T00:00:00Z".parse().unwrap(),
            valid_until: "2026-09-01T00:00:00Z".parse().unwrap(),
        };
        assert!(matches!(
            Coupon::from_draft(draft),
            Err(StoreError::Validation(_))
        ));
    }
}
