//! Review store: CRUD, filtered queries, merchant responses, moderation.

use serde_json::json;
use tracing::{info, instrument};

use plateful_core::{MerchantId, Permission, ProductId};

use crate::access::require_permission;
use crate::error::StoreError;
use crate::models::{RawReview, Review, ReviewDraft, ReviewPatch};
use crate::stats::{RatingStats, merchant_rating_stats, product_rating_stats};
use crate::storage::keys;
use crate::store::{Backend, Resource, Store};

impl Resource for Review {
    type Raw = RawReview;
    type Draft = ReviewDraft;
    type Patch = ReviewPatch;

    const STORAGE_KEY: &'static str = keys::REVIEWS;
    const ENDPOINT: &'static str = "/api/reviews";
    const SINGULAR: &'static str = "review";
    const PLURAL: &'static str = "reviews";
    const MUTATE: Permission = Permission::ModerateReviews;

    fn resource_id(&self) -> &str {
        self.id.as_str()
    }

    fn normalize(raw: Self::Raw) -> Result<Self, StoreError> {
        Self::try_from(raw)
    }

    fn create_from(
        draft: Self::Draft,
        now: chrono::DateTime<chrono::Utc>,
    ) -> Result<Self, StoreError> {
        Self::from_draft(draft, now)
    }

    fn merge_patch(&mut self, patch: &Self::Patch) -> Result<(), StoreError> {
        self.apply_patch(patch)
    }
}

/// Sort order for review queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReviewSort {
    #[default]
    Newest,
    Oldest,
    RatingHigh,
    RatingLow,
}

impl ReviewSort {
    const fn as_query(self) -> &'static str {
        match self {
            Self::Newest => "newest",
            Self::Oldest => "oldest",
            Self::RatingHigh => "rating_high",
            Self::RatingLow => "rating_low",
        }
    }
}

/// Filter, sort, and page parameters for review queries.
///
/// In remote mode the filter is sent as query parameters; sorting and paging
/// are applied again to the returned page, so both modes produce the same
/// shape for the same inputs.
#[derive(Debug, Clone, Default)]
pub struct ReviewFilter {
    pub merchant_id: Option<MerchantId>,
    pub product_id: Option<ProductId>,
    pub author: Option<String>,
    pub min_rating: Option<u8>,
    pub max_rating: Option<u8>,
    pub verified_only: bool,
    pub sort: ReviewSort,
    /// 1-based page number.
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl ReviewFilter {
    /// Whether a review matches the filter.
    #[must_use]
    pub fn matches(&self, review: &Review) -> bool {
        if let Some(merchant_id) = &self.merchant_id
            && &review.merchant_id != merchant_id
        {
            return false;
        }
        if let Some(product_id) = &self.product_id
            && review.product_id.as_ref() != Some(product_id)
        {
            return false;
        }
        if let Some(author) = &self.author
            && !review.author.eq_ignore_ascii_case(author)
        {
            return false;
        }
        if let Some(min) = self.min_rating
            && review.rating < min
        {
            return false;
        }
        if let Some(max) = self.max_rating
            && review.rating > max
        {
            return false;
        }
        if self.verified_only && !review.is_verified {
            return false;
        }
        true
    }

    /// Query parameters for the remote list endpoint.
    #[must_use]
    pub fn query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(merchant_id) = &self.merchant_id {
            query.push(("merchant_id", merchant_id.as_str().to_string()));
        }
        if let Some(product_id) = &self.product_id {
            query.push(("product_id", product_id.as_str().to_string()));
        }
        if let Some(author) = &self.author {
            query.push(("author", author.clone()));
        }
        if let Some(min) = self.min_rating {
            query.push(("min_rating", min.to_string()));
        }
        if let Some(max) = self.max_rating {
            query.push(("max_rating", max.to_string()));
        }
        if self.verified_only {
            query.push(("verified", "true".to_string()));
        }
        query.push(("sort", self.sort.as_query().to_string()));
        if let Some(page) = self.page {
            query.push(("page", page.to_string()));
        }
        if let Some(limit) = self.limit {
            query.push(("limit", limit.to_string()));
        }
        query
    }

    /// Sort and page a filtered list.
    #[must_use]
    pub fn apply(&self, mut reviews: Vec<Review>) -> Vec<Review> {
        match self.sort {
            ReviewSort::Newest => reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            ReviewSort::Oldest => reviews.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
            ReviewSort::RatingHigh => reviews.sort_by(|a, b| b.rating.cmp(&a.rating)),
            ReviewSort::RatingLow => reviews.sort_by(|a, b| a.rating.cmp(&b.rating)),
        }

        if let Some(limit) = self.limit {
            let page = self.page.unwrap_or(1).max(1);
            // Widen before multiplying so huge page/limit values skip past the
            // end instead of overflowing.
            let start = u64::from(page - 1) * u64::from(limit);
            let start = usize::try_from(start).unwrap_or(usize::MAX);
            reviews = reviews
                .into_iter()
                .skip(start)
                .take(limit as usize)
                .collect();
        }
        reviews
    }
}

/// Store for customer reviews.
pub struct ReviewStore {
    inner: Store<Review>,
}

impl ReviewStore {
    /// Create the store over a backend and session.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Storage`] if the persisted list cannot be read.
    pub fn new(
        backend: Backend,
        session: std::sync::Arc<crate::session::Session>,
    ) -> Result<Self, StoreError> {
        Ok(Self {
            inner: Store::new(backend, session)?,
        })
    }

    /// The underlying generic store (refresh, snapshot, CRUD).
    #[must_use]
    pub fn store(&self) -> &Store<Review> {
        &self.inner
    }

    /// Query reviews with filtering, sorting, and paging.
    ///
    /// # Errors
    ///
    /// Remote mode surfaces API failures; local mode cannot fail.
    #[instrument(skip(self, filter))]
    pub async fn search(&self, filter: &ReviewFilter) -> Result<Vec<Review>, StoreError> {
        let matched = match self.inner.backend() {
            Backend::Remote(client) => {
                let raw: Vec<RawReview> = client
                    .get_list(Review::ENDPOINT, &filter.query(), Review::PLURAL)
                    .await?;
                raw.into_iter()
                    .map(Review::try_from)
                    .collect::<Result<Vec<_>, _>>()?
                    .into_iter()
                    .filter(|r| filter.matches(r))
                    .collect()
            }
            Backend::Local(_) => self
                .inner
                .snapshot()
                .into_iter()
                .filter(|r| filter.matches(r))
                .collect(),
        };
        Ok(filter.apply(matched))
    }

    /// Record (or overwrite) the merchant's response to a review.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::PermissionDenied`] without `respond_reviews`,
    /// [`StoreError::Validation`] for an empty response, or
    /// [`StoreError::NotFound`] for an unknown id.
    #[instrument(skip(self, response))]
    pub async fn respond(&self, id: &str, response: &str) -> Result<Review, StoreError> {
        require_permission(self.inner.session().identity(), Permission::RespondReviews)?;
        if response.trim().is_empty() {
            return Err(StoreError::Validation(
                "review response cannot be empty".to_string(),
            ));
        }
        let _guard = self.inner.lock_mutations().await;

        let review = match self.inner.backend() {
            Backend::Remote(client) => {
                let path = format!("{}/{id}/respond", Review::ENDPOINT);
                let raw: RawReview = client
                    .post(&path, &json!({ "response": response }), Review::SINGULAR)
                    .await?;
                let review = Review::try_from(raw)?;
                self.inner.merge(review.clone());
                review
            }
            Backend::Local(_) => self.inner.modify(id, |review| {
                review.merchant_response = Some(response.to_string());
                Ok(())
            })?,
        };

        self.inner.persist()?;
        info!(review = id, "merchant response recorded");
        Ok(review)
    }

    /// Rating stats for one merchant.
    ///
    /// Remote mode asks the platform for the precomputed figures; local mode
    /// recomputes them from the cached reviews.
    ///
    /// # Errors
    ///
    /// Remote mode surfaces API failures; local mode cannot fail.
    pub async fn merchant_stats(&self, id: &MerchantId) -> Result<RatingStats, StoreError> {
        match self.inner.backend() {
            Backend::Remote(client) => {
                let path = format!("{}/stats/merchant/{id}", Review::ENDPOINT);
                Ok(client.get_one(&path, "stats").await?)
            }
            Backend::Local(_) => Ok(merchant_rating_stats(&self.inner.snapshot(), id)),
        }
    }

    /// Rating stats for one product.
    ///
    /// # Errors
    ///
    /// Remote mode surfaces API failures; local mode cannot fail.
    pub async fn product_stats(&self, id: &ProductId) -> Result<RatingStats, StoreError> {
        match self.inner.backend() {
            Backend::Remote(client) => {
                let path = format!("{}/stats/product/{id}", Review::ENDPOINT);
                Ok(client.get_one(&path, "stats").await?)
            }
            Backend::Local(_) => Ok(product_rating_stats(&self.inner.snapshot(), id)),
        }
    }

    /// Mark a review as verified (moderation).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::PermissionDenied`] without `moderate_reviews`,
    /// or [`StoreError::NotFound`] for an unknown id.
    #[instrument(skip(self))]
    pub async fn verify(&self, id: &str) -> Result<Review, StoreError> {
        require_permission(self.inner.session().identity(), Permission::ModerateReviews)?;
        let _guard = self.inner.lock_mutations().await;

        let review = match self.inner.backend() {
            Backend::Remote(client) => {
                let path = format!("{}/{id}/approve", Review::ENDPOINT);
                let raw: RawReview = client
                    .patch(&path, &json!({ "is_verified": true }), Review::SINGULAR)
                    .await?;
                let review = Review::try_from(raw)?;
                self.inner.merge(review.clone());
                review
            }
            Backend::Local(_) => self.inner.modify(id, |review| {
                review.is_verified = true;
                Ok(())
            })?,
        };

        self.inner.persist()?;
        Ok(review)
    }
}
