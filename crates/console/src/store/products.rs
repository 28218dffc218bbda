//! Product store: menu item CRUD and availability toggling.

use plateful_core::{MerchantId, Permission};

use crate::error::StoreError;
use crate::models::{Product, ProductDraft, ProductPatch, RawProduct};
use crate::storage::keys;
use crate::store::{Backend, Resource, Store};

impl Resource for Product {
    type Raw = RawProduct;
    type Draft = ProductDraft;
    type Patch = ProductPatch;

    const STORAGE_KEY: &'static str = keys::PRODUCTS;
    const ENDPOINT: &'static str = "/api/products";
    const SINGULAR: &'static str = "product";
    const PLURAL: &'static str = "products";
    const MUTATE: Permission = Permission::ManageProducts;

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

/// Store for menu items.
pub struct ProductStore {
    inner: Store<Product>,
}

impl ProductStore {
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
    pub fn store(&self) -> &Store<Product> {
        &self.inner
    }

    /// All products of one merchant.
    #[must_use]
    pub fn by_merchant(&self, merchant_id: &MerchantId) -> Vec<Product> {
        self.inner
            .snapshot()
            .into_iter()
            .filter(|p| &p.merchant_id == merchant_id)
            .collect()
    }

    /// Set a product's availability (sold-out toggle).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] or [`StoreError::PermissionDenied`].
    pub async fn set_availability(
        &self,
        id: &str,
        is_available: bool,
    ) -> Result<Product, StoreError> {
        let patch = ProductPatch {
            is_available: Some(is_available),
            ..ProductPatch::default()
        };
        self.inner.update(id, patch).await
    }
}
