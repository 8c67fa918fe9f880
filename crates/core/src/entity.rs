//! The contract every persisted record implements.
//!
//! An entity names its query surface through associated types: a filter
//! descriptor, a sort-field descriptor, and a relation descriptor. All three
//! are plain data - a storage engine translates them into its native query
//! form, and the in-memory evaluator applies them directly via [`Entity::matches`]
//! and [`Entity::compare`].

use std::cmp::Ordering;
use std::fmt::Debug;
use std::hash::Hash;

/// A persisted record with an immutable unique key.
///
/// Keys are assigned before first persistence and never change while the
/// entity is in storage.
pub trait Entity: Clone + Debug + Send + Sync + 'static {
    /// Unique key type. `Ord` because the in-memory store keys tables by it.
    type Key: Clone + Debug + Eq + Ord + Hash + Send + Sync + 'static;

    /// Declarative filter descriptor. [`NoFilter`] for entities that are
    /// never filtered.
    type Filter: Clone + Debug + Send + Sync + 'static;

    /// Declarative sort-field descriptor. [`NoSortField`] for entities that
    /// are never sorted.
    type SortField: Clone + Debug + Send + Sync + 'static;

    /// Named relation reference for eager loading. [`NoRelation`] for
    /// entities without relations.
    type Relation: Clone + Debug + PartialEq + Send + Sync + 'static;

    /// The entity's unique key.
    fn key(&self) -> Self::Key;

    /// Whether this entity satisfies the filter descriptor.
    fn matches(&self, filter: &Self::Filter) -> bool;

    /// Compare two entities by the named sort field.
    fn compare(&self, other: &Self, field: &Self::SortField) -> Ordering;
}

/// Placeholder filter for entities that are never filtered.
///
/// Uninhabited, so a specification over such an entity cannot carry criteria
/// at all; `matches` is implemented with an empty match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoFilter {}

/// Placeholder sort field for entities that are never sorted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoSortField {}

/// Placeholder relation for entities without relations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoRelation {}
