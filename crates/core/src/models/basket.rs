//! The shopping-basket aggregate.
//!
//! Baskets live in the key-value store, not the relational store, and their
//! serialized JSON form is the sole durable representation. Field names are
//! part of the wire format - clients and the payment flow read the same
//! PascalCase JSON - so the serde renames here must not change.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One line in a basket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BasketItem {
    pub id: i32,
    pub name: String,
    pub picture_url: String,
    pub price: Decimal,
    pub quantity: u32,
}

/// A customer's basket, keyed by an external identifier (usually the user ID).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CustomerBasket {
    pub id: String,
    pub items: Vec<BasketItem>,
    pub client_secret: Option<String>,
    pub payment_intent_id: Option<String>,
    pub delivery_method_id: Option<i32>,
    pub shipping_price: Option<Decimal>,
}

impl CustomerBasket {
    /// An empty basket under `id`.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            items: Vec::new(),
            client_secret: None,
            payment_intent_id: None,
            delivery_method_id: None,
            shipping_price: None,
        }
    }

    /// Add an item, merging quantities when the product is already present.
    pub fn add_item(&mut self, item: BasketItem) {
        if let Some(existing) = self.items.iter_mut().find(|line| line.id == item.id) {
            existing.quantity += item.quantity;
        } else {
            self.items.push(item);
        }
    }

    /// The amount to charge: item prices times quantities, plus shipping.
    #[must_use]
    pub fn amount(&self) -> Decimal {
        let items: Decimal = self
            .items
            .iter()
            .map(|item| item.price * Decimal::from(item.quantity))
            .sum();
        items + self.shipping_price.unwrap_or_default()
    }
}
