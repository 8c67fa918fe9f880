//! Orchard Persistence - the data-access core.
//!
//! # Architecture
//!
//! Business operations ask a [`UnitOfWork`] for the repository of an entity
//! type, read through [`Specification`]s, stage mutations, and commit once
//! per logical operation:
//!
//! ```rust,ignore
//! use orchard_core::{models::product::Product, specifications};
//! use orchard_persistence::{MemoryStore, UnitOfWork};
//!
//! let store = MemoryStore::new();
//! store.register::<Product>();
//!
//! let uow = UnitOfWork::new(store.clone());
//! let products = uow.repository::<Product>();
//! products.add(new_product);
//! let listing = products
//!     .get_all_with(&specifications::product_catalog(&query))
//!     .await?;
//! uow.save_changes().await?;
//! ```
//!
//! The basket store is independent of the relational components and is used
//! directly, never through the unit of work.
//!
//! [`Specification`]: orchard_core::Specification

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod basket;
pub mod error;
pub mod evaluator;
mod relations;
pub mod repository;
pub mod store;
pub mod unit_of_work;

pub use basket::{BasketStore, DEFAULT_BASKET_TTL};
pub use error::{BasketError, StoreError};
pub use repository::Repository;
pub use store::{Materialize, MemoryStore, RelationSource};
pub use unit_of_work::UnitOfWork;
