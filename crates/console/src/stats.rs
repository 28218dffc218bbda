//! Review rating aggregation.
//!
//! Stats are recomputed from the review list on every call; nothing is cached
//! or incrementally maintained, so they can never drift from the underlying
//! data.

use std::collections::BTreeMap;

use rust_decimal::{Decimal, RoundingStrategy};

use plateful_core::{MerchantId, ProductId};

use crate::models::Review;

/// Aggregated rating figures for a set of reviews.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RatingStats {
    /// Average rating formatted with one decimal place ("4.4"); "0.0" when
    /// there are no reviews.
    pub average_rating: String,
    pub total_reviews: u32,
    /// Count per star value; every key in `1..=5` is present, zeros included.
    pub rating_distribution: BTreeMap<u8, u32>,
}

/// Compute rating stats over `reviews`.
#[must_use]
pub fn rating_stats<'a>(reviews: impl IntoIterator<Item = &'a Review>) -> RatingStats {
    let mut distribution: BTreeMap<u8, u32> = (1..=5).map(|star| (star, 0)).collect();
    let mut total: u32 = 0;
    let mut sum: u64 = 0;

    for review in reviews {
        // Ratings outside 1..=5 cannot exist past normalization.
        if let Some(count) = distribution.get_mut(&review.rating) {
            *count += 1;
            total += 1;
            sum += u64::from(review.rating);
        }
    }

    let average_rating = if total == 0 {
        "0.0".to_string()
    } else {
        let average = Decimal::from(sum) / Decimal::from(total);
        let rounded =
            average.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
        format!("{rounded:.1}")
    };

    RatingStats {
        average_rating,
        total_reviews: total,
        rating_distribution: distribution,
    }
}

/// Rating stats for one merchant.
#[must_use]
pub fn merchant_rating_stats(reviews: &[Review], merchant_id: &MerchantId) -> RatingStats {
    rating_stats(reviews.iter().filter(|r| &r.merchant_id == merchant_id))
}

/// Rating stats for one product.
#[must_use]
pub fn product_rating_stats(reviews: &[Review], product_id: &ProductId) -> RatingStats {
    rating_stats(
        reviews
            .iter()
            .filter(|r| r.product_id.as_ref() == Some(product_id)),
    )
}
