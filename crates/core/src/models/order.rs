//! Order models: orders, line items, delivery methods.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::entity::{Entity, NoFilter, NoRelation, NoSortField};
use crate::types::{DeliveryMethodId, OrderId, ProductId};

/// A shipping option with its price and lead time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryMethod {
    pub id: DeliveryMethodId,
    pub short_name: String,
    pub delivery_time: String,
    pub description: String,
    pub price: Decimal,
}

impl Entity for DeliveryMethod {
    type Key = DeliveryMethodId;
    type Filter = NoFilter;
    type SortField = NoSortField;
    type Relation = NoRelation;

    fn key(&self) -> DeliveryMethodId {
        self.id
    }

    fn matches(&self, filter: &NoFilter) -> bool {
        match *filter {}
    }

    fn compare(&self, _other: &Self, field: &NoSortField) -> Ordering {
        match *field {}
    }
}

/// Shipping address captured at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderAddress {
    pub first_name: String,
    pub last_name: String,
    pub street: String,
    pub city: String,
    pub country: String,
}

/// Snapshot of a product at the moment it was ordered.
///
/// Copied rather than referenced so later catalog edits never rewrite order
/// history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: ProductId,
    pub product_name: String,
    pub picture_url: String,
    pub price: Decimal,
    pub quantity: u32,
}

/// Payment lifecycle of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    Pending,
    PaymentReceived,
    PaymentFailed,
}

/// A placed order.
///
/// `delivery_method` is a relation: it stays `None` unless the read that
/// produced this row asked for it via an include.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub user_email: String,
    pub order_date: DateTime<Utc>,
    pub address: OrderAddress,
    pub delivery_method_id: DeliveryMethodId,
    pub delivery_method: Option<DeliveryMethod>,
    pub status: OrderStatus,
    pub items: Vec<OrderItem>,
    pub sub_total: Decimal,
    pub payment_intent_id: Option<String>,
}

impl Order {
    /// Create a pending order for `user_email`, dated now, with its subtotal
    /// computed from the line items.
    #[must_use]
    pub fn new(
        user_email: impl Into<String>,
        address: OrderAddress,
        delivery_method_id: DeliveryMethodId,
        items: Vec<OrderItem>,
    ) -> Self {
        let sub_total = items
            .iter()
            .map(|item| item.price * Decimal::from(item.quantity))
            .sum();

        Self {
            id: OrderId::generate(),
            user_email: user_email.into(),
            order_date: Utc::now(),
            address,
            delivery_method_id,
            delivery_method: None,
            status: OrderStatus::Pending,
            items,
            sub_total,
            payment_intent_id: None,
        }
    }

    /// Order total: subtotal plus shipping.
    ///
    /// Returns `None` when the delivery method relation is not loaded.
    #[must_use]
    pub fn total(&self) -> Option<Decimal> {
        self.delivery_method
            .as_ref()
            .map(|method| self.sub_total + method.price)
    }
}

/// Filter descriptor for order reads.
#[derive(Debug, Clone, PartialEq)]
pub enum OrderFilter {
    /// Every order placed under this email.
    UserEmail(String),
    /// The order carrying this payment-intent ID.
    PaymentIntent(String),
    /// Point lookup by order ID.
    Id(OrderId),
}

/// Sort fields for order reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderSortField {
    OrderDate,
}

/// Relations an order read can eagerly materialize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderRelation {
    DeliveryMethod,
}

impl Entity for Order {
    type Key = OrderId;
    type Filter = OrderFilter;
    type SortField = OrderSortField;
    type Relation = OrderRelation;

    fn key(&self) -> OrderId {
        self.id
    }

    fn matches(&self, filter: &OrderFilter) -> bool {
        match filter {
            OrderFilter::UserEmail(email) => self.user_email == *email,
            OrderFilter::PaymentIntent(intent) => self.payment_intent_id.as_deref() == Some(intent),
            OrderFilter::Id(id) => self.id == *id,
        }
    }

    fn compare(&self, other: &Self, field: &OrderSortField) -> Ordering {
        match field {
            OrderSortField::OrderDate => self.order_date.cmp(&other.order_date),
        }
    }
}
