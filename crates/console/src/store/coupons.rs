//! Coupon store: CRUD with a usage guard on deletion.

use tracing::instrument;

use plateful_core::Permission;

use crate::access::require_permission;
use crate::error::StoreError;
use crate::models::{Coupon, CouponDraft, CouponPatch, RawCoupon};
use crate::storage::keys;
use crate::store::{Backend, Resource, Store};

impl Resource for Coupon {
    type Raw = RawCoupon;
    type Draft = CouponDraft;
    type Patch = CouponPatch;

    const STORAGE_KEY: &'static str = keys::COUPONS;
    const ENDPOINT: &'static str = "/api/coupons";
    const SINGULAR: &'static str = "coupon";
    const PLURAL: &'static str = "coupons";
    const MUTATE: Permission = Permission::ManageCoupons;

    fn resource_id(&self) -> &str {
        self.id.as_str()
    }

    fn normalize(raw: Self::Raw) -> Result<Self, StoreError> {
        Self::try_from(raw)
    }

    fn create_from(
        draft: Self::Draft,
        _now: chrono::DateTime<chrono::Utc>,
    ) -> Result<Self, StoreError> {
        Self::from_draft(draft)
    }

    fn merge_patch(&mut self, patch: &Self::Patch) -> Result<(), StoreError> {
        self.apply_patch(patch)
    }

    // Coupon codes are unique per platform (case-insensitive).
    fn check_create(&self, existing: &[Self]) -> Result<(), StoreError> {
        if existing
            .iter()
            .any(|c| c.code.eq_ignore_ascii_case(&self.code))
        {
            return Err(StoreError::Conflict(format!(
                "coupon code {} already exists",
                self.code
            )));
        }
        Ok(())
    }

    // A used coupon stays on record so past orders keep their discount trail.
    fn soft_deletes(&self) -> bool {
        self.has_usage()
    }

    fn deactivate(&mut self) {
        self.is_active = false;
    }
}

/// Store for discount coupons.
pub struct CouponStore {
    inner: Store<Coupon>,
}

impl CouponStore {
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
    pub fn store(&self) -> &Store<Coupon> {
        &self.inner
    }

    /// Look a coupon up by its code (case-insensitive).
    #[must_use]
    pub fn find_by_code(&self, code: &str) -> Option<Coupon> {
        self.inner
            .snapshot()
            .into_iter()
            .find(|c| c.code.eq_ignore_ascii_case(code))
    }

    /// Deactivate a coupon without deleting it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] or [`StoreError::PermissionDenied`].
    pub async fn deactivate(&self, id: &str) -> Result<Coupon, StoreError> {
        let patch = CouponPatch {
            is_active: Some(false),
            ..CouponPatch::default()
        };
        self.inner.update(id, patch).await
    }

    /// Record one redemption of a coupon (local mode bookkeeping).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Conflict`] if the coupon is inactive or fully
    /// used, or [`StoreError::NotFound`] for an unknown id.
    #[instrument(skip(self))]
    pub async fn record_use(&self, id: &str) -> Result<Coupon, StoreError> {
        require_permission(self.inner.session().identity(), Permission::ManageCoupons)?;
        let _guard = self.inner.lock_mutations().await;

        let coupon = self.inner.modify(id, |coupon| {
            if !coupon.is_active {
                return Err(StoreError::Conflict(format!(
                    "coupon {} is inactive",
                    coupon.code
                )));
            }
            if coupon.times_used >= coupon.max_uses {
                return Err(StoreError::Conflict(format!(
                    "coupon {} has no uses left",
                    coupon.code
                )));
            }
            coupon.times_used += 1;
            Ok(())
        })?;

        self.inner.persist()?;
        Ok(coupon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use plateful_core::{DiscountType, Email, Identity, Role, UserId};
    use rust_decimal::Decimal;
    use tempfile::TempDir;

    use crate::session::Session;
    use crate::storage::LocalStore;
    use crate::store::DeleteOutcome;

    fn local_store(dir: &TempDir) -> CouponStore {
        let storage = LocalStore::open(dir.path()).unwrap();
        let session = Arc::new(Session::signed_in(Identity {
            id: UserId::new("u-1"),
            name: "Lee".to_string(),
            email: Email::parse("lee@plateful.dev").unwrap(),
            role: Role::Admin,
        }));
        CouponStore::new(Backend::Local(storage), session).unwrap()
    }

    fn draft(code: &str) -> CouponDraft {
        CouponDraft {
            code: code.to_string(),
            discount_type: DiscountType::Percentage,
            discount_value: Decimal::from(10),
            min_order_amount: Decimal::ZERO,
            max_uses: 2,
            valid_from: "2026-08-01T00:00:00Z".parse().unwrap(),
            valid_until: "2026-09-01T00:00:00Z".parse().unwrap(),
        }
    }

    #[tokio::test]
    async fn duplicate_codes_conflict() {
        let dir = TempDir::new().unwrap();
        let store = local_store(&dir);

        store.store().create(draft("WELCOME10")).await.unwrap();
        let err = store.store().create(draft("welcome10")).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn unused_coupons_delete_outright() {
        let dir = TempDir::new().unwrap();
        let store = local_store(&dir);

        let coupon = store.store().create(draft("SUMMER")).await.unwrap();
        let outcome = store.store().delete(coupon.id.as_str()).await.unwrap();

        assert_eq!(outcome, DeleteOutcome::Removed);
        assert!(store.store().get(coupon.id.as_str()).is_none());
    }

    #[tokio::test]
    async fn used_coupons_deactivate_instead_of_deleting() {
        let dir = TempDir::new().unwrap();
        let store = local_store(&dir);

        let coupon = store.store().create(draft("LOYAL")).await.unwrap();
        store.record_use(coupon.id.as_str()).await.unwrap();

        let outcome = store.store().delete(coupon.id.as_str()).await.unwrap();
        assert_eq!(outcome, DeleteOutcome::Deactivated);

        let kept = store.store().get(coupon.id.as_str()).unwrap();
        assert!(!kept.is_active);
        assert_eq!(kept.times_used, 1);
    }

    #[tokio::test]
    async fn redemption_stops_at_max_uses() {
        let dir = TempDir::new().unwrap();
        let store = local_store(&dir);
        let coupon = store.store().create(draft("TWICE")).await.unwrap();
        let id = coupon.id.as_str().to_string();

        store.record_use(&id).await.unwrap();
        store.record_use(&id).await.unwrap();
        let err = store.record_use(&id).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn find_by_code_is_case_insensitive() {
        let dir = TempDir::new().unwrap();
        let store = local_store(&dir);
        store.store().create(draft("WELCOME10")).await.unwrap();

        assert!(store.find_by_code("Welcome10").is_some());
        assert!(store.find_by_code("GONE").is_none());
    }
}
