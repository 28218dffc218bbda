//! Review entity and wire normalization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use plateful_core::{MerchantId, OrderId, ProductId, ReviewId};

use crate::error::StoreError;

/// A customer review of a merchant (optionally tied to a product and order).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: ReviewId,
    pub merchant_id: MerchantId,
    pub product_id: Option<ProductId>,
    pub order_id: Option<OrderId>,
    /// Integer rating in `1..=5`.
    pub rating: u8,
    pub title: Option<String>,
    pub comment: Option<String>,
    pub author: String,
    /// Set by moderation once the review is confirmed to match a real order.
    pub is_verified: bool,
    /// Null until a merchant responds; re-responding overwrites.
    pub merchant_response: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Payload for creating a review.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewDraft {
    pub merchant_id: MerchantId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<ProductId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<OrderId>,
    pub rating: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub author: String,
}

/// Partial update for a review. Only provided fields change.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReviewPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Wire shape for reviews; aliases accept the camelCase demo convention.
#[derive(Debug, Clone, Deserialize)]
pub struct RawReview {
    pub id: String,
    #[serde(alias = "merchantId")]
    pub merchant_id: String,
    #[serde(default, alias = "productId")]
    pub product_id: Option<String>,
    #[serde(default, alias = "orderId")]
    pub order_id: Option<String>,
    pub rating: u8,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
    pub author: String,
    #[serde(default, alias = "isVerified")]
    pub is_verified: bool,
    #[serde(default, alias = "merchantResponse")]
    pub merchant_response: Option<String>,
    #[serde(alias = "createdAt")]
    pub created_at: DateTime<Utc>,
}

fn validate_rating(rating: u8) -> Result<(), StoreError> {
    if (1..=5).contains(&rating) {
        Ok(())
    } else {
        Err(StoreError::Validation(format!(
            "rating must be between 1 and 5, got {rating}"
        )))
    }
}

impl TryFrom<RawReview> for Review {
    type Error = StoreError;

    fn try_from(raw: RawReview) -> Result<Self, Self::Error> {
        validate_rating(raw.rating)?;

        Ok(Self {
            id: ReviewId::new(raw.id),
            merchant_id: MerchantId::new(raw.merchant_id),
            product_id: raw.product_id.map(ProductId::new),
            order_id: raw.order_id.map(OrderId::new),
            rating: raw.rating,
            title: raw.title,
            comment: raw.comment,
            author: raw.author,
            is_verified: raw.is_verified,
            merchant_response: raw.merchant_response,
            created_at: raw.created_at,
        })
    }
}

impl Review {
    /// Build a fresh review from a draft (local demo mode).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] for a rating outside `1..=5` or an
    /// empty author.
    pub fn from_draft(draft: ReviewDraft, now: DateTime<Utc>) -> Result<Self, StoreError> {
        validate_rating(draft.rating)?;
        if draft.author.trim().is_empty() {
            return Err(StoreError::Validation(
                "review author cannot be empty".to_string(),
            ));
        }

        Ok(Self {
            id: ReviewId::generate(),
            merchant_id: draft.merchant_id,
            product_id: draft.product_id,
            order_id: draft.order_id,
            rating: draft.rating,
            title: draft.title,
            comment: draft.comment,
            author: draft.author,
            is_verified: false,
            merchant_response: None,
            created_at: now,
        })
    }

    /// Apply a partial update in place.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] if the patched rating is outside
    /// `1..=5`.
    pub fn apply_patch(&mut self, patch: &ReviewPatch) -> Result<(), StoreError> {
        if let Some(rating) = patch.rating {
            validate_rating(rating)?;
            self.rating = rating;
        }
        if let Some(title) = &patch.title {
            self.title = Some(title.clone());
        }
        if let Some(comment) = &patch.comment {
            self.comment = Some(comment.clone());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camel_case_fixture() -> serde_json::Value {
        serde_json::json!({
            "id": "rev-1",
            "merchantId": "m-1",
            "productId": "p-2",
            "rating": 4,
            "comment": "Great noodles",
            "author": "Ava",
            "isVerified": true,
            "createdAt": "2026-08-02T09:30:00Z"
        })
    }

    #[test]
    fn camel_case_payload_normalizes() {
        let raw: RawReview = serde_json::from_value(camel_case_fixture()).unwrap();
        let review = Review::try_from(raw).unwrap();

        assert_eq!(review.merchant_id, MerchantId::new("m-1"));
        assert_eq!(review.product_id, Some(ProductId::new("p-2")));
        assert_eq!(review.rating, 4);
        assert!(review.is_verified);
        assert!(review.merchant_response.is_none());
    }

    #[test]
    fn normalization_is_idempotent() {
        let raw: RawReview = serde_json::from_value(camel_case_fixture()).unwrap();
        let once = Review::try_from(raw).unwrap();

        let reserialized = serde_json::to_value(&once).unwrap();
        let raw_again: RawReview = serde_json::from_value(reserialized).unwrap();
        let twice = Review::try_from(raw_again).unwrap();

        assert_eq!(once, twice);
    }

    #[test]
    fn out_of_range_rating_is_rejected() {
        for rating in [0u8, 6] {
            let mut fixture = camel_case_fixture();
            fixture["rating"] = serde_json::json!(rating);
            let raw: RawReview = serde_json::from_value(fixture).unwrap();
            assert!(matches!(
                Review::try_from(raw),
                Err(StoreError::Validation(_))
            ));
        }
    }

    #[test]
    fn patch_revalidates_the_rating() {
        let raw: RawReview = serde_json::from_value(camel_case_fixture()).unwrap();
        let mut review = Review::try_from(raw).unwrap();

        let patch = ReviewPatch {
            rating: Some(9),
            ..ReviewPatch::default()
        };
        assert!(review.apply_patch(&patch).is_err());
        // failed patch leaves the review unchanged
        assert_eq!(review.rating, 4);
    }
}
