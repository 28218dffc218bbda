//! Order entity and wire normalization.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use plateful_core::{CurrencyCode, MerchantId, OrderId, OrderStatus, Price, ProductId, UserId};

use crate::error::StoreError;

/// A customer order in its canonical shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    /// Human-facing order number (e.g. "PF-1042").
    pub order_number: String,
    pub status: OrderStatus,
    pub merchant_id: MerchantId,
    pub customer_id: Option<UserId>,
    pub customer_name: String,
    pub items: Vec<OrderItem>,
    pub subtotal: Decimal,
    pub total: Decimal,
    pub currency_code: CurrencyCode,
    /// Dine-in table, when the order was placed at a table.
    pub table_number: Option<String>,
    /// Whether the notification projected from this order has been read.
    /// Non-cancel status transitions reset this to `false`.
    pub notification_read: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One line of an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: Option<ProductId>,
    pub name: String,
    pub quantity: u32,
    pub unit_price: Decimal,
}

impl OrderItem {
    /// Line total (quantity times unit price).
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        Decimal::from(self.quantity) * self.unit_price
    }
}

/// Payload for creating an order.
#[derive(Debug, Clone, Serialize)]
pub struct OrderDraft {
    pub order_number: String,
    pub merchant_id: MerchantId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<UserId>,
    pub customer_name: String,
    pub items: Vec<OrderItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_number: Option<String>,
    pub currency_code: CurrencyCode,
}

/// Partial update for an order. Only provided fields change.
#[derive(Debug, Clone, Default, Serialize)]
pub struct OrderPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification_read: Option<bool>,
}

/// Wire shape for orders.
///
/// Field aliases carry the camelCase demo convention; the primary names are
/// the canonical snake_case, so normalizing an already-canonical payload is a
/// no-op.
#[derive(Debug, Clone, Deserialize)]
pub struct RawOrder {
    pub id: String,
    #[serde(alias = "orderNumber")]
    pub order_number: String,
    pub status: OrderStatus,
    #[serde(alias = "merchantId")]
    pub merchant_id: String,
    #[serde(default, alias = "customerId")]
    pub customer_id: Option<String>,
    #[serde(alias = "customerName")]
    pub customer_name: String,
    #[serde(default)]
    pub items: Vec<RawOrderItem>,
    #[serde(default)]
    pub subtotal: Option<Decimal>,
    #[serde(default)]
    pub total: Option<Decimal>,
    #[serde(default, alias = "currencyCode")]
    pub currency_code: CurrencyCode,
    #[serde(default, alias = "tableNumber")]
    pub table_number: Option<String>,
    #[serde(default, alias = "notificationRead")]
    pub notification_read: Option<bool>,
    #[serde(alias = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(default, alias = "updatedAt")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Wire shape for order lines.
#[derive(Debug, Clone, Deserialize)]
pub struct RawOrderItem {
    #[serde(default, alias = "productId")]
    pub product_id: Option<String>,
    pub name: String,
    pub quantity: u32,
    #[serde(alias = "unitPrice", alias = "price")]
    pub unit_price: Decimal,
}

impl From<RawOrderItem> for OrderItem {
    fn from(raw: RawOrderItem) -> Self {
        Self {
            product_id: raw.product_id.map(ProductId::new),
            name: raw.name,
            quantity: raw.quantity,
            unit_price: raw.unit_price,
        }
    }
}

impl TryFrom<RawOrder> for Order {
    type Error = StoreError;

    fn try_from(raw: RawOrder) -> Result<Self, Self::Error> {
        if raw.customer_name.trim().is_empty() {
            return Err(StoreError::Validation(
                "order customer name cannot be empty".to_string(),
            ));
        }

        let items: Vec<OrderItem> = raw.items.into_iter().map(Into::into).collect();
        let computed_subtotal: Decimal = items.iter().map(OrderItem::line_total).sum();
        let subtotal = raw.subtotal.unwrap_or(computed_subtotal);
        let total = raw.total.unwrap_or(subtotal);

        Ok(Self {
            id: OrderId::new(raw.id),
            order_number: raw.order_number,
            status: raw.status,
            merchant_id: MerchantId::new(raw.merchant_id),
            customer_id: raw.customer_id.map(UserId::new),
            customer_name: raw.customer_name,
            items,
            subtotal,
            total,
            currency_code: raw.currency_code,
            table_number: raw.table_number,
            notification_read: raw.notification_read.unwrap_or(false),
            created_at: raw.created_at,
            updated_at: raw.updated_at.unwrap_or(raw.created_at),
        })
    }
}

impl Order {
    /// Build a fresh order from a draft (local demo mode).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] for an empty customer name or an
    /// order with no items.
    pub fn from_draft(draft: OrderDraft, now: DateTime<Utc>) -> Result<Self, StoreError> {
        if draft.customer_name.trim().is_empty() {
            return Err(StoreError::Validation(
                "order customer name cannot be empty".to_string(),
            ));
        }
        if draft.items.is_empty() {
            return Err(StoreError::Validation(
                "order must contain at least one item".to_string(),
            ));
        }

        let subtotal: Decimal = draft.items.iter().map(OrderItem::line_total).sum();

        Ok(Self {
            id: OrderId::generate(),
            order_number: draft.order_number,
            status: OrderStatus::Pending,
            merchant_id: draft.merchant_id,
            customer_id: draft.customer_id,
            customer_name: draft.customer_name,
            items: draft.items,
            subtotal,
            total: subtotal,
            currency_code: draft.currency_code,
            table_number: draft.table_number,
            notification_read: false,
            created_at: now,
            updated_at: now,
        })
    }

    /// The order total as a displayable price.
    #[must_use]
    pub const fn total_price(&self) -> Price {
        Price::new(self.total, self.currency_code)
    }

    /// Apply a partial update in place.
    pub fn apply_patch(&mut self, patch: &OrderPatch) {
        if let Some(name) = &patch.customer_name {
            self.customer_name = name.clone();
        }
        if let Some(table) = &patch.table_number {
            self.table_number = Some(table.clone());
        }
        if let Some(read) = patch.notification_read {
            self.notification_read = read;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camel_case_fixture() -> serde_json::Value {
        serde_json::json!({
            "id": "ord-1",
            "orderNumber": "PF-1001",
            "status": "pending",
            "merchantId": "m-1",
            "customerName": "Ava",
            "items": [
                { "productId": "p-1", "name": "Pad Thai", "quantity": 2, "price": "11.50" }
            ],
            "tableNumber": "7",
            "createdAt": "2026-08-01T12:00:00Z"
        })
    }

    #[test]
    fn camel_case_payload_normalizes() {
        let raw: RawOrder = serde_json::from_value(camel_case_fixture()).unwrap();
        let order = Order::try_from(raw).unwrap();

        assert_eq!(order.order_number, "PF-1001");
        assert_eq!(order.merchant_id, MerchantId::new("m-1"));
        assert_eq!(order.table_number.as_deref(), Some("7"));
        // subtotal/total derived from items when the wire omits them
        assert_eq!(order.subtotal, Decimal::new(2300, 2));
        assert_eq!(order.total, order.subtotal);
        assert!(!order.notification_read);
        assert_eq!(order.updated_at, order.created_at);
    }

    #[test]
    fn normalization_is_idempotent() {
        let raw: RawOrder = serde_json::from_value(camel_case_fixture()).unwrap();
        let once = Order::try_from(raw).unwrap();

        let reserialized = serde_json::to_value(&once).unwrap();
        let raw_again: RawOrder = serde_json::from_value(reserialized).unwrap();
        let twice = Order::try_from(raw_again).unwrap();

        assert_eq!(once, twice);
    }

    #[test]
    fn empty_customer_name_is_rejected() {
        let mut fixture = camel_case_fixture();
        fixture["customerName"] = serde_json::json!("  ");
        let raw: RawOrder = serde_json::from_value(fixture).unwrap();
        assert!(matches!(
            Order::try_from(raw),
            Err(StoreError::Validation(_))
        ));
    }

    #[test]
    fn draft_requires_items() {
        let draft = OrderDraft {
            order_number: "PF-1002".to_string(),
            merchant_id: MerchantId::new("m-1"),
            customer_id: None,
            customer_name: "Ben".to_string(),
            items: vec![],
            table_number: None,
            currency_code: CurrencyCode::USD,
        };
        assert!(matches!(
            Order::from_draft(draft, Utc::now()),
            Err(StoreError::Validation(_))
        ));
    }
}
