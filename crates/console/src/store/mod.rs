//! Resource stores: cached state plus remote/local mutation flow.
//!
//! Every resource (orders, reviews, coupons, products, merchants) is managed
//! by a [`Store`] parameterized over the [`Resource`] trait. A store holds an
//! in-memory snapshot and a backend:
//!
//! - **Remote** mode talks to the platform API. Mutations confirm with the
//!   server first and merge the server's canonical entity into the cache only
//!   on success, so a failed request leaves the snapshot untouched.
//! - **Local** mode is the offline demo: mutations validate and apply against
//!   the cache, then persist the full list to disk before returning.
//!
//! Mutations are serialized through an async lock per store, so two
//! concurrent mutators cannot interleave their read-modify-write cycles.
//! Reads take a cheap snapshot and never block on mutation.

use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, instrument};

use plateful_core::Permission;

use crate::access::require_permission;
use crate::api::ApiClient;
use crate::error::StoreError;
use crate::session::Session;
use crate::storage::LocalStore;

pub mod coupons;
pub mod merchants;
pub mod orders;
pub mod products;
pub mod reviews;

pub use coupons::CouponStore;
pub use merchants::MerchantStore;
pub use orders::{OrderFilter, OrderStore};
pub use products::ProductStore;
pub use reviews::{ReviewFilter, ReviewSort, ReviewStore};

/// Where a store's data lives.
#[derive(Clone)]
pub enum Backend {
    /// Platform API over HTTP.
    Remote(ApiClient),
    /// On-device JSON files (offline demo).
    Local(LocalStore),
}

/// What a delete actually did.
///
/// Guarded resources (a coupon with usage, a merchant with order history) are
/// deactivated instead of removed, so history stays attributable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The entity was removed.
    Removed,
    /// The entity was kept but marked inactive.
    Deactivated,
}

/// A managed resource type.
///
/// Implementations wire an entity into the generic [`Store`]: its wire shape,
/// creation/patch payloads, storage key, API endpoint, envelope keys, and the
/// permission guarding its mutators.
pub trait Resource:
    Clone + Send + Sync + Serialize + DeserializeOwned + 'static
{
    /// Wire shape accepted from the API or legacy fixtures.
    type Raw: DeserializeOwned + Send;
    /// Creation payload.
    type Draft: Serialize + Send + Sync;
    /// Partial-update payload.
    type Patch: Serialize + Send + Sync;

    /// Key under which the local store persists the list.
    const STORAGE_KEY: &'static str;
    /// API collection path, e.g. `/api/orders`.
    const ENDPOINT: &'static str;
    /// Envelope key for a single entity, e.g. `order`.
    const SINGULAR: &'static str;
    /// Envelope key for the list, e.g. `orders`.
    const PLURAL: &'static str;
    /// Permission required by create/update/delete.
    const MUTATE: Permission;

    fn resource_id(&self) -> &str;

    /// Normalize a wire payload into the canonical shape.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] if the payload violates an entity
    /// invariant.
    fn normalize(raw: Self::Raw) -> Result<Self, StoreError>;

    /// Build a fresh entity from a draft (local mode).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] if the draft is invalid.
    fn create_from(draft: Self::Draft, now: DateTime<Utc>) -> Result<Self, StoreError>;

    /// Apply a partial update in place (local mode).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] if the patch is invalid; the entity
    /// must be left unchanged in that case.
    fn merge_patch(&mut self, patch: &Self::Patch) -> Result<(), StoreError>;

    /// Extra creation check against the existing list (e.g. uniqueness).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Conflict`] if the new entity clashes.
    fn check_create(&self, _existing: &[Self]) -> Result<(), StoreError> {
        Ok(())
    }

    /// Whether deleting this entity must deactivate instead of remove.
    fn soft_deletes(&self) -> bool {
        false
    }

    /// Mark the entity inactive (used by guarded deletes).
    fn deactivate(&mut self) {}
}

/// Cached state store for one resource.
pub struct Store<R: Resource> {
    backend: Backend,
    session: Arc<Session>,
    items: RwLock<Vec<R>>,
    // Serializes mutations; reads go straight to `items`.
    mutations: Mutex<()>,
}

impl<R: Resource> Store<R> {
    /// Create a store. Local mode loads the persisted list immediately;
    /// remote mode starts empty until [`refresh`](Self::refresh).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Storage`] if the persisted list exists but
    /// cannot be decoded.
    pub fn new(backend: Backend, session: Arc<Session>) -> Result<Self, StoreError> {
        let items = match &backend {
            Backend::Remote(_) => Vec::new(),
            Backend::Local(storage) => storage.read::<Vec<R>>(R::STORAGE_KEY)?.unwrap_or_default(),
        };

        Ok(Self {
            backend,
            session,
            items: RwLock::new(items),
            mutations: Mutex::new(()),
        })
    }

    /// Re-fetch the list from the backend and replace the snapshot.
    ///
    /// # Errors
    ///
    /// Remote mode surfaces [`ApiError`](crate::api::ApiError)s mapped into
    /// [`StoreError`]; local mode surfaces [`StoreError::Storage`].
    #[instrument(skip(self), fields(resource = R::SINGULAR))]
    pub async fn refresh(&self) -> Result<usize, StoreError> {
        let fresh = match &self.backend {
            Backend::Remote(client) => {
                let raw: Vec<R::Raw> = client.get_list(R::ENDPOINT, &[], R::PLURAL).await?;
                raw.into_iter().map(R::normalize).collect::<Result<_, _>>()?
            }
            Backend::Local(storage) => storage.read::<Vec<R>>(R::STORAGE_KEY)?.unwrap_or_default(),
        };

        let count = fresh.len();
        *self.write_items() = fresh;
        debug!(count, "refreshed {}", R::PLURAL);
        Ok(count)
    }

    /// A clone of the current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Vec<R> {
        self.read_items().clone()
    }

    /// Number of cached entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read_items().len()
    }

    /// Whether the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read_items().is_empty()
    }

    /// Look up one entity by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<R> {
        self.read_items()
            .iter()
            .find(|item| item.resource_id() == id)
            .cloned()
    }

    /// Create an entity. Newest first: the created entity is prepended.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::PermissionDenied`] without the mutate permission,
    /// [`StoreError::Validation`] for an invalid draft, or a remote/storage
    /// error from the backend.
    #[instrument(skip(self, draft), fields(resource = R::SINGULAR))]
    pub async fn create(&self, draft: R::Draft) -> Result<R, StoreError> {
        require_permission(self.session.identity(), R::MUTATE)?;
        let _guard = self.mutations.lock().await;

        let entity = match &self.backend {
            Backend::Remote(client) => {
                let raw: R::Raw = client.post(R::ENDPOINT, &draft, R::SINGULAR).await?;
                R::normalize(raw)?
            }
            Backend::Local(_) => {
                let entity = R::create_from(draft, Utc::now())?;
                entity.check_create(self.read_items().as_slice())?;
                entity
            }
        };

        self.write_items().insert(0, entity.clone());
        self.persist()?;
        Ok(entity)
    }

    /// Patch an entity by id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for an unknown id,
    /// [`StoreError::PermissionDenied`] without the mutate permission, or a
    /// validation/backend error.
    #[instrument(skip(self, patch), fields(resource = R::SINGULAR))]
    pub async fn update(&self, id: &str, patch: R::Patch) -> Result<R, StoreError> {
        require_permission(self.session.identity(), R::MUTATE)?;
        let _guard = self.mutations.lock().await;

        match &self.backend {
            Backend::Remote(client) => {
                let path = format!("{}/{id}", R::ENDPOINT);
                let raw: R::Raw = client.patch(&path, &patch, R::SINGULAR).await?;
                let entity = R::normalize(raw)?;
                self.merge(entity.clone());
                Ok(entity)
            }
            Backend::Local(_) => {
                let entity = self.modify(id, |item| item.merge_patch(&patch))?;
                self.persist()?;
                Ok(entity)
            }
        }
    }

    /// Delete an entity by id.
    ///
    /// Guarded entities are deactivated instead (see [`DeleteOutcome`]).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for an unknown id,
    /// [`StoreError::PermissionDenied`] without the mutate permission, or a
    /// backend error.
    #[instrument(skip(self), fields(resource = R::SINGULAR))]
    pub async fn delete(&self, id: &str) -> Result<DeleteOutcome, StoreError> {
        require_permission(self.session.identity(), R::MUTATE)?;
        let _guard = self.mutations.lock().await;

        let outcome = match &self.backend {
            Backend::Remote(client) => {
                let response = client.delete(&format!("{}/{id}", R::ENDPOINT)).await?;
                if response.deactivated {
                    let mut items = self.write_items();
                    if let Some(item) = items.iter_mut().find(|i| i.resource_id() == id) {
                        item.deactivate();
                    }
                    DeleteOutcome::Deactivated
                } else {
                    self.write_items().retain(|i| i.resource_id() != id);
                    DeleteOutcome::Removed
                }
            }
            Backend::Local(_) => {
                let guarded = self
                    .get(id)
                    .ok_or_else(|| StoreError::NotFound(format!("{} {id}", R::SINGULAR)))?
                    .soft_deletes();

                if guarded {
                    self.modify(id, |item| {
                        item.deactivate();
                        Ok(())
                    })?;
                    DeleteOutcome::Deactivated
                } else {
                    self.write_items().retain(|i| i.resource_id() != id);
                    DeleteOutcome::Removed
                }
            }
        };

        self.persist()?;
        Ok(outcome)
    }

    pub(crate) fn backend(&self) -> &Backend {
        &self.backend
    }

    pub(crate) fn session(&self) -> &Session {
        &self.session
    }

    /// Acquire the mutation lock (for wrapper-store operations).
    pub(crate) async fn lock_mutations(&self) -> MutexGuard<'_, ()> {
        self.mutations.lock().await
    }

    /// Replace the cached entity with the same id, or prepend if absent,
    /// then persist in local mode. Used to merge server-confirmed state.
    pub(crate) fn merge(&self, entity: R) {
        let mut items = self.write_items();
        match items
            .iter_mut()
            .find(|i| i.resource_id() == entity.resource_id())
        {
            Some(slot) => *slot = entity,
            None => items.insert(0, entity),
        }
    }

    /// Mutate the cached entity with `id` in place. The closure must leave
    /// the entity unchanged when it fails.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for an unknown id, or the closure's
    /// error.
    pub(crate) fn modify(
        &self,
        id: &str,
        f: impl FnOnce(&mut R) -> Result<(), StoreError>,
    ) -> Result<R, StoreError> {
        let mut items = self.write_items();
        let item = items
            .iter_mut()
            .find(|i| i.resource_id() == id)
            .ok_or_else(|| StoreError::NotFound(format!("{} {id}", R::SINGULAR)))?;
        f(item)?;
        Ok(item.clone())
    }

    /// Drop the cached entity with `id`, if present.
    pub(crate) fn remove(&self, id: &str) {
        self.write_items().retain(|i| i.resource_id() != id);
    }

    /// Write the full list to disk (local mode only; a no-op in remote mode).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Storage`] if the write fails.
    pub(crate) fn persist(&self) -> Result<(), StoreError> {
        if let Backend::Local(storage) = &self.backend {
            storage.write(R::STORAGE_KEY, &*self.read_items())?;
        }
        Ok(())
    }

    fn read_items(&self) -> std::sync::RwLockReadGuard<'_, Vec<R>> {
        self.items.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_items(&self) -> std::sync::RwLockWriteGuard<'_, Vec<R>> {
        self.items.write().unwrap_or_else(PoisonError::into_inner)
    }
}
