//! Plateful console core: access control, resource stores, and derived
//! aggregation for the food-delivery admin console.
//!
//! The crate is organized around three layers:
//!
//! - **Access**: a static role-permission registry ([`plateful_core::Role`])
//!   queried through the pure evaluator in [`access`]. Checks fail closed.
//! - **State**: one [`store::Store`] per resource (orders, reviews, coupons,
//!   products, merchants), operating against either the platform API or
//!   on-device demo data, selected once at startup by [`config`].
//! - **Derived views**: rating stats, KPI rollups, and the notification feed
//!   in [`stats`] and [`analytics`], recomputed from store snapshots per
//!   call.
//!
//! [`console::Console`] wires the layers together for binaries and tests.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod access;
pub mod analytics;
pub mod api;
pub mod config;
pub mod console;
pub mod error;
pub mod models;
pub mod progression;
pub mod seed;
pub mod session;
pub mod stats;
pub mod storage;
pub mod store;

pub use config::{ConsoleConfig, Mode};
pub use console::Console;
pub use error::StoreError;
pub use session::Session;
