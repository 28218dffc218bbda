//! Merchant store: restaurant CRUD with an order-history delete guard.

use tracing::{info, instrument};

use plateful_core::Permission;

use crate::access::require_permission;
use crate::error::StoreError;
use crate::models::{Merchant, MerchantDraft, MerchantPatch, Order, RawMerchant};
use crate::storage::keys;
use crate::store::{Backend, DeleteOutcome, Resource, Store};

impl Resource for Merchant {
    type Raw = RawMerchant;
    type Draft = MerchantDraft;
    type Patch = MerchantPatch;

    const STORAGE_KEY: &'static str = keys::MERCHANTS;
    const ENDPOINT: &'static str = "/api/merchants";
    const SINGULAR: &'static str = "merchant";
    const PLURAL: &'static str = "merchants";
    const MUTATE: Permission = Permission::ManageMerchants;

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

    fn deactivate(&mut self) {
        self.is_active = false;
    }
}

/// Store for merchants.
pub struct MerchantStore {
    inner: Store<Merchant>,
}

impl MerchantStore {
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
    pub fn store(&self) -> &Store<Merchant> {
        &self.inner
    }

    /// Active merchants only.
    #[must_use]
    pub fn active(&self) -> Vec<Merchant> {
        self.inner
            .snapshot()
            .into_iter()
            .filter(|m| m.is_active)
            .collect()
    }

    /// Delete a merchant, deactivating instead when it has order history so
    /// past orders stay attributable.
    ///
    /// `orders` is the current order snapshot; in remote mode the server
    /// applies the same guard and the outcome follows its response.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for an unknown id or
    /// [`StoreError::PermissionDenied`] without `manage_merchants`.
    #[instrument(skip(self, orders))]
    pub async fn delete_with_history_guard(
        &self,
        id: &str,
        orders: &[Order],
    ) -> Result<DeleteOutcome, StoreError> {
        if matches!(self.inner.backend(), Backend::Remote(_)) {
            return self.inner.delete(id).await;
        }

        require_permission(self.inner.session().identity(), Permission::ManageMerchants)?;
        let _guard = self.inner.lock_mutations().await;

        let has_history = orders.iter().any(|o| o.merchant_id.as_str() == id);
        let outcome = if has_history {
            self.inner.modify(id, |merchant| {
                merchant.deactivate();
                Ok(())
            })?;
            DeleteOutcome::Deactivated
        } else {
            self.inner
                .get(id)
                .ok_or_else(|| StoreError::NotFound(format!("merchant {id}")))?;
            self.inner.remove(id);
            DeleteOutcome::Removed
        };

        self.inner.persist()?;
        info!(merchant = id, ?outcome, "merchant deleted");
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use chrono::Utc;
    use plateful_core::{CurrencyCode, Email, Identity, MerchantId, OrderId, OrderStatus, Role, UserId};
    use tempfile::TempDir;

    use crate::session::Session;
    use crate::storage::LocalStore;

    fn local_store(dir: &TempDir) -> MerchantStore {
        let storage = LocalStore::open(dir.path()).unwrap();
        let session = Arc::new(Session::signed_in(Identity {
            id: UserId::new("u-1"),
            name: "Remy".to_string(),
            email: Email::parse("remy@plateful.dev").unwrap(),
            role: Role::Admin,
        }));
        MerchantStore::new(Backend::Local(storage), session).unwrap()
    }

    fn draft(name: &str) -> MerchantDraft {
        MerchantDraft {
            name: name.to_string(),
            cuisine: Some("Thai".to_string()),
            address: None,
        }
    }

    fn order_for(merchant: &Merchant) -> Order {
        let now = Utc::now();
        Order {
            id: OrderId::new("ord-1"),
            order_number: "PF-1001".to_string(),
            status: OrderStatus::Delivered,
            merchant_id: merchant.id.clone(),
            customer_id: None,
            customer_name: "Ava".to_string(),
            items: vec![],
            subtotal: rust_decimal::Decimal::ZERO,
            total: rust_decimal::Decimal::ZERO,
            currency_code: CurrencyCode::USD,
            table_number: None,
            notification_read: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn merchants_without_history_delete_outright() {
        let dir = TempDir::new().unwrap();
        let store = local_store(&dir);
        let merchant = store.store().create(draft("Lotus Kitchen")).await.unwrap();

        let outcome = store
            .delete_with_history_guard(merchant.id.as_str(), &[])
            .await
            .unwrap();
        assert_eq!(outcome, DeleteOutcome::Removed);
        assert!(store.store().get(merchant.id.as_str()).is_none());
    }

    #[tokio::test]
    async fn merchants_with_history_deactivate() {
        let dir = TempDir::new().unwrap();
        let store = local_store(&dir);
        let merchant = store.store().create(draft("Lotus Kitchen")).await.unwrap();
        let orders = vec![order_for(&merchant)];

        let outcome = store
            .delete_with_history_guard(merchant.id.as_str(), &orders)
            .await
            .unwrap();
        assert_eq!(outcome, DeleteOutcome::Deactivated);

        let kept = store.store().get(merchant.id.as_str()).unwrap();
        assert!(!kept.is_active);
        assert!(!store.active().iter().any(|m| m.id == merchant.id));
    }

    #[tokio::test]
    async fn deleting_an_unknown_merchant_is_not_found() {
        let dir = TempDir::new().unwrap();
        let store = local_store(&dir);
        let err = store
            .delete_with_history_guard("m-missing", &[])
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));

        let unrelated = order_for(&Merchant {
            id: MerchantId::new("m-other"),
            name: "Else".to_string(),
            cuisine: None,
            address: None,
            is_active: true,
            created_at: Utc::now(),
        });
        let err = store
            .delete_with_history_guard("m-missing", &[unrelated])
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }
}
