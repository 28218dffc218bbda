//! The console facade: one object bundling session, stores, and derived
//! views, built from a [`ConsoleConfig`].

use std::sync::Arc;

use tracing::info;

use plateful_core::Identity;

use crate::analytics::{KpiSummary, Notification, TimeWindow, kpi_summary, notifications, unread_count};
use crate::api::ApiClient;
use crate::config::{ConsoleConfig, Mode};
use crate::error::StoreError;
use crate::seed::seed_demo_data;
use crate::session::Session;
use crate::stats::{RatingStats, merchant_rating_stats, rating_stats};
use crate::storage::LocalStore;
use crate::store::{
    Backend, CouponStore, MerchantStore, OrderStore, ProductStore, ReviewStore,
};

/// The assembled console: one store per resource over a shared backend and
/// session.
///
/// Signing in or out replaces the whole console (see [`Console::sign_in`]);
/// stores never observe an identity change mid-flight.
pub struct Console {
    config: ConsoleConfig,
    storage: Option<LocalStore>,
    session: Arc<Session>,
    pub orders: OrderStore,
    pub reviews: ReviewStore,
    pub coupons: CouponStore,
    pub products: ProductStore,
    pub merchants: MerchantStore,
}

impl Console {
    /// Build a console from configuration.
    ///
    /// Local mode opens the data directory, seeds demo fixtures on first run,
    /// and restores any persisted identity. Remote mode builds the API client
    /// and starts with the given (or anonymous) session; call
    /// [`refresh_all`](Self::refresh_all) to populate the caches.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the data directory cannot be opened, the
    /// persisted data is corrupt, or the HTTP client cannot be built.
    pub fn open(config: ConsoleConfig) -> Result<Self, StoreError> {
        let (backend, storage, session) = match config.mode {
            Mode::Local => {
                let storage = LocalStore::open(&config.data_dir)?;
                seed_demo_data(&storage)?;
                let session = Arc::new(Session::init(&storage)?);
                (Backend::Local(storage.clone()), Some(storage), session)
            }
            Mode::Remote => {
                let remote = config.remote.as_ref().ok_or_else(|| {
                    StoreError::Validation("remote mode requires remote configuration".to_string())
                })?;
                let client = ApiClient::new(remote).map_err(StoreError::from)?;
                (Backend::Remote(client), None, Arc::new(Session::anonymous()))
            }
        };

        Self::assemble(config, storage, session, backend)
    }

    fn assemble(
        config: ConsoleConfig,
        storage: Option<LocalStore>,
        session: Arc<Session>,
        backend: Backend,
    ) -> Result<Self, StoreError> {
        Ok(Self {
            orders: OrderStore::new(backend.clone(), Arc::clone(&session))?,
            reviews: ReviewStore::new(backend.clone(), Arc::clone(&session))?,
            coupons: CouponStore::new(backend.clone(), Arc::clone(&session))?,
            products: ProductStore::new(backend.clone(), Arc::clone(&session))?,
            merchants: MerchantStore::new(backend, Arc::clone(&session))?,
            config,
            storage,
            session,
        })
    }

    /// Re-fetch every store from the backend.
    ///
    /// # Errors
    ///
    /// Returns the first backend failure encountered.
    pub async fn refresh_all(&self) -> Result<(), StoreError> {
        self.orders.store().refresh().await?;
        self.reviews.store().refresh().await?;
        self.coupons.store().refresh().await?;
        self.products.store().refresh().await?;
        self.merchants.store().refresh().await?;
        Ok(())
    }

    /// Rebuild the console with `identity` signed in, persisting it in local
    /// mode so the next start restores the session.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if persisting the identity or rebuilding the
    /// stores fails.
    pub fn sign_in(self, identity: Identity) -> Result<Self, StoreError> {
        let session = Session::signed_in(identity);
        if let Some(storage) = &self.storage {
            session.persist(storage)?;
        }
        info!(user = %session.identity().map_or("?", |i| i.name.as_str()), "signed in");
        self.rebuild(Arc::new(session))
    }

    /// Rebuild the console signed out, clearing any persisted identity.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if clearing the identity or rebuilding the
    /// stores fails.
    pub fn sign_out(self) -> Result<Self, StoreError> {
        if let Some(storage) = &self.storage {
            Session::teardown(storage)?;
        }
        self.rebuild(Arc::new(Session::anonymous()))
    }

    fn rebuild(self, session: Arc<Session>) -> Result<Self, StoreError> {
        let backend = match &self.storage {
            Some(storage) => Backend::Local(storage.clone()),
            None => {
                let remote = self.config.remote.as_ref().ok_or_else(|| {
                    StoreError::Validation("remote mode requires remote configuration".to_string())
                })?;
                Backend::Remote(ApiClient::new(remote).map_err(StoreError::from)?)
            }
        };
        Self::assemble(self.config, self.storage, session, backend)
    }

    /// The active session.
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The loaded configuration.
    #[must_use]
    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    /// Rating stats over all cached reviews.
    #[must_use]
    pub fn rating_stats(&self) -> RatingStats {
        rating_stats(&self.reviews.store().snapshot())
    }

    /// Rating stats for one merchant.
    #[must_use]
    pub fn merchant_rating_stats(&self, merchant_id: &plateful_core::MerchantId) -> RatingStats {
        merchant_rating_stats(&self.reviews.store().snapshot(), merchant_id)
    }

    /// KPI rollup for cached orders created inside `window`.
    #[must_use]
    pub fn kpis(&self, window: &TimeWindow) -> KpiSummary {
        kpi_summary(&self.orders.store().snapshot(), window)
    }

    /// Notification feed projected from cached orders, newest first.
    #[must_use]
    pub fn notifications(&self) -> Vec<Notification> {
        notifications(&self.orders.store().snapshot())
    }

    /// Unread notification count.
    #[must_use]
    pub fn unread_notifications(&self) -> usize {
        unread_count(&self.orders.store().snapshot())
    }
}
