//! Demo fixtures for local mode.
//!
//! Seeding is idempotent per key: a list is written only when its key has
//! never been written, so user edits survive restarts.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::info;

use plateful_core::{
    CouponId, CurrencyCode, DiscountType, MerchantId, OrderId, OrderStatus, ProductId, ReviewId,
};

use crate::models::{Coupon, Merchant, Order, OrderItem, Product, Review};
use crate::storage::{LocalStore, StorageError, keys};

fn ts(s: &str) -> DateTime<Utc> {
    s.parse().unwrap_or_default()
}

/// Write demo fixtures for any resource key that has never been written.
///
/// Returns `true` if anything was seeded.
///
/// # Errors
///
/// Returns a [`StorageError`] if a list cannot be written.
pub fn seed_demo_data(storage: &LocalStore) -> Result<bool, StorageError> {
    let mut seeded = false;

    if !storage.contains(keys::MERCHANTS) {
        storage.write(keys::MERCHANTS, &merchants())?;
        seeded = true;
    }
    if !storage.contains(keys::PRODUCTS) {
        storage.write(keys::PRODUCTS, &products())?;
        seeded = true;
    }
    if !storage.contains(keys::ORDERS) {
        storage.write(keys::ORDERS, &orders())?;
        seeded = true;
    }
    if !storage.contains(keys::REVIEWS) {
        storage.write(keys::REVIEWS, &reviews())?;
        seeded = true;
    }
    if !storage.contains(keys::COUPONS) {
        storage.write(keys::COUPONS, &coupons())?;
        seeded = true;
    }

    if seeded {
        info!(dir = %storage.dir().display(), "seeded demo data");
    }
    Ok(seeded)
}

fn merchants() -> Vec<Merchant> {
    vec![
        Merchant {
            id: MerchantId::new("m-1"),
            name: "Lotus Kitchen".to_string(),
            cuisine: Some("Thai".to_string()),
            address: Some("14 Canal St".to_string()),
            is_active: true,
            created_at: ts("2026-06-01T08:00:00Z"),
        },
        Merchant {
            id: MerchantId::new("m-2"),
            name: "Trattoria Nonna".to_string(),
            cuisine: Some("Italian".to_string()),
            address: Some("3 Harbor Way".to_string()),
            is_active: true,
            created_at: ts("2026-06-10T09:30:00Z"),
        },
        Merchant {
            id: MerchantId::new("m-3"),
            name: "Smokestack BBQ".to_string(),
            cuisine: Some("Barbecue".to_string()),
            address: None,
            is_active: false,
            created_at: ts("2026-05-20T11:00:00Z"),
        },
    ]
}

fn products() -> Vec<Product> {
    let product = |id: &str, merchant: &str, name: &str, cents: i64, category: &str| Product {
        id: ProductId::new(id),
        merchant_id: MerchantId::new(merchant),
        name: name.to_string(),
        description: None,
        price: Decimal::new(cents, 2),
        currency_code: CurrencyCode::USD,
        category: Some(category.to_string()),
        is_available: true,
        created_at: ts("2026-06-15T10:00:00Z"),
    };

    vec![
        product("p-1", "m-1", "Pad Thai", 1150, "Noodles"),
        product("p-2", "m-1", "Green Curry", 1325, "Curry"),
        product("p-3", "m-1", "Mango Sticky Rice", 650, "Dessert"),
        product("p-4", "m-2", "Margherita", 1400, "Pizza"),
        product("p-5", "m-2", "Tagliatelle al Ragu", 1680, "Pasta"),
    ]
}

fn orders() -> Vec<Order> {
    let item = |product: &str, name: &str, quantity: u32, cents: i64| OrderItem {
        product_id: Some(ProductId::new(product)),
        name: name.to_string(),
        quantity,
        unit_price: Decimal::new(cents, 2),
    };

    let order = |id: &str,
                 number: &str,
                 status: OrderStatus,
                 merchant: &str,
                 customer: &str,
                 items: Vec<OrderItem>,
                 created: &str| {
        let subtotal: Decimal = items.iter().map(OrderItem::line_total).sum();
        Order {
            id: OrderId::new(id),
            order_number: number.to_string(),
            status,
            merchant_id: MerchantId::new(merchant),
            customer_id: None,
            customer_name: customer.to_string(),
            items,
            subtotal,
            total: subtotal,
            currency_code: CurrencyCode::USD,
            table_number: None,
            notification_read: status.is_terminal(),
            created_at: ts(created),
            updated_at: ts(created),
        }
    };

    vec![
        order(
            "ord-1",
            "PF-1001",
            OrderStatus::Pending,
            "m-1",
            "Ava Chen",
            vec![item("p-1", "Pad Thai", 2, 1150), item("p-3", "Mango Sticky Rice", 1, 650)],
            "2026-08-24T18:05:00Z",
        ),
        order(
            "ord-2",
            "PF-1002",
            OrderStatus::Preparing,
            "m-2",
            "Ben Ortiz",
            vec![item("p-4", "Margherita", 1, 1400)],
            "2026-08-24T17:40:00Z",
        ),
        order(
            "ord-3",
            "PF-1003",
            OrderStatus::Delivered,
            "m-1",
            "Cory Nilsen",
            vec![item("p-2", "Green Curry", 2, 1325)],
            "2026-08-23T19:15:00Z",
        ),
        order(
            "ord-4",
            "PF-1004",
            OrderStatus::Cancelled,
            "m-2",
            "Dee Park",
            vec![item("p-5", "Tagliatelle al Ragu", 1, 1680)],
            "2026-08-22T12:30:00Z",
        ),
    ]
}

fn reviews() -> Vec<Review> {
    let review = |id: &str, product: Option<&str>, rating: u8, author: &str, created: &str| Review {
        id: ReviewId::new(id),
        merchant_id: MerchantId::new("m-1"),
        product_id: product.map(ProductId::new),
        order_id: None,
        rating,
        title: None,
        comment: None,
        author: author.to_string(),
        is_verified: rating >= 4,
        merchant_response: None,
        created_at: ts(created),
    };

    // Average for m-1 works out to 4.4.
    vec![
        review("rev-1", Some("p-1"), 5, "Ava Chen", "2026-08-10T09:00:00Z"),
        review("rev-2", Some("p-2"), 4, "Ben Ortiz", "2026-08-12T14:20:00Z"),
        review("rev-3", None, 5, "Cory Nilsen", "2026-08-15T11:45:00Z"),
        review("rev-4", Some("p-1"), 3, "Dee Park", "2026-08-18T16:30:00Z"),
        review("rev-5", Some("p-3"), 5, "Elle Roy", "2026-08-20T10:10:00Z"),
    ]
}

fn coupons() -> Vec<Coupon> {
    vec![
        Coupon {
            id: CouponId::new("cpn-1"),
            code: "WELCOME10".to_string(),
            discount_type: DiscountType::Percentage,
            discount_value: Decimal::from(10),
            min_order_amount: Decimal::from(25),
            max_uses: 100,
            times_used: 12,
            valid_from: ts("2026-08-01T00:00:00Z"),
            valid_until: ts("2026-10-01T00:00:00Z"),
            is_active: true,
        },
        Coupon {
            id: CouponId::new("cpn-2"),
            code: "FREESHIP".to_string(),
            discount_type: DiscountType::FixedAmount,
            discount_value: Decimal::new(499, 2),
            min_order_amount: Decimal::from(15),
            max_uses: 50,
            times_used: 0,
            valid_from: ts("2026-08-15T00:00:00Z"),
            valid_until: ts("2026-09-15T00:00:00Z"),
            is_active: true,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    use crate::stats::merchant_rating_stats;

    #[test]
    fn seeding_is_idempotent_per_key() {
        let dir = TempDir::new().unwrap();
        let storage = LocalStore::open(dir.path()).unwrap();

        assert!(seed_demo_data(&storage).unwrap());
        assert!(!seed_demo_data(&storage).unwrap());

        // A user wipe of one key reseeds only that key.
        storage.clear(keys::COUPONS).unwrap();
        let orders_before: Vec<Order> = storage.read(keys::ORDERS).unwrap().unwrap();
        assert!(seed_demo_data(&storage).unwrap());
        let orders_after: Vec<Order> = storage.read(keys::ORDERS).unwrap().unwrap();
        assert_eq!(orders_before.len(), orders_after.len());
    }

    #[test]
    fn fixtures_satisfy_entity_invariants() {
        for coupon in coupons() {
            assert!(coupon.times_used <= coupon.max_uses);
            assert!(coupon.valid_from < coupon.valid_until);
        }
        for review in reviews() {
            assert!((1..=5).contains(&review.rating));
        }
        for order in orders() {
            assert_eq!(
                order.subtotal,
                order.items.iter().map(OrderItem::line_total).sum::<Decimal>()
            );
        }
    }

    #[test]
    fn seeded_reviews_average_to_4_4() {
        let stats = merchant_rating_stats(&reviews(), &MerchantId::new("m-1"));
        assert_eq!(stats.average_rating, "4.4");
        assert_eq!(stats.total_reviews, 5);
    }
}
