//! Canonical entity models and wire normalization.
//!
//! Each entity has two shapes:
//!
//! - The canonical struct (snake_case fields) used everywhere inside the
//!   console: stores, aggregation, and the view layer.
//! - A `Raw*` wire struct that accepts both the remote API's snake_case
//!   convention and the legacy demo fixtures' camelCase convention through an
//!   explicit `#[serde(alias)]` table, converted via `TryFrom` into the
//!   canonical shape.
//!
//! Normalization is total (every field has a defined mapping or default) and
//! idempotent: serializing a canonical entity and normalizing it again yields
//! an identical value. Each module pins that property with a test.

pub mod coupon;
pub mod merchant;
pub mod order;
pub mod product;
pub mod review;

pub use coupon::{Coupon, CouponDraft, CouponPatch, RawCoupon};
pub use merchant::{Merchant, MerchantDraft, MerchantPatch, RawMerchant};
pub use order::{Order, OrderDraft, OrderItem, OrderPatch, RawOrder, RawOrderItem};
pub use product::{Product, ProductDraft, ProductPatch, RawProduct};
pub use review::{RawReview, Review, ReviewDraft, ReviewPatch};
