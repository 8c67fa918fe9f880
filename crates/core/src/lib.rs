//! Orchard Core - Shared types library.
//!
//! This crate provides the common types used across the Orchard data-access
//! components:
//!
//! - `persistence` - Generic repository, unit of work, and basket store
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no storage access.
//! Queries are described declaratively: an entity names its filter, sort, and
//! relation descriptors as data, and a storage engine decides how to honor
//! them. This keeps every query description reusable and testable against a
//! plain in-memory sequence.
//!
//! # Modules
//!
//! - [`entity`] - The `Entity` contract persisted records implement
//! - [`specification`] - Declarative query descriptions
//! - [`models`] - Catalog, order, and basket domain models
//! - [`specifications`] - Ready-made specifications for common queries
//! - [`types`] - Newtype wrappers for type-safe IDs

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod entity;
pub mod models;
pub mod specification;
pub mod specifications;
pub mod types;

pub use entity::{Entity, NoFilter, NoRelation, NoSortField};
pub use specification::{OrderBy, Page, SortDirection, Specification};
pub use types::*;
