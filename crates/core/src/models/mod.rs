//! Catalog, order, and basket domain models.

pub mod basket;
pub mod order;
pub mod product;

pub use basket::{BasketItem, CustomerBasket};
pub use order::{
    DeliveryMethod, Order, OrderAddress, OrderFilter, OrderItem, OrderRelation, OrderSortField,
    OrderStatus,
};
pub use product::{
    Product, ProductBrand, ProductFilter, ProductRelation, ProductSortField, ProductType,
};
