//! Declarative query descriptions.
//!
//! A [`Specification`] is a pure data object describing a query over one
//! entity type: an optional filter, an ordered list of eager-load references,
//! an optional sort, and an optional pagination window. It holds no storage
//! handles and performs no I/O - evaluation is the storage engine's job.
//!
//! Consumers build a specification once and never mutate it after handing it
//! to a repository.

use crate::entity::Entity;

/// Direction of an ordered read.
///
/// A specification carries at most one sort, and the direction travels with
/// it, so ascending and descending can never both be set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// A sort field paired with its direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderBy<F> {
    pub field: F,
    pub direction: SortDirection,
}

/// Pagination window, applied as skip-then-take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// Rows to skip before the window starts.
    pub skip: usize,
    /// Maximum rows in the window.
    pub take: usize,
}

/// Declarative description of a query over entity type `T`.
///
/// An empty specification (no filter, no sort, no page) evaluates to every
/// entity in store-defined order.
#[derive(Debug, Clone)]
pub struct Specification<T: Entity> {
    criteria: Option<T::Filter>,
    includes: Vec<T::Relation>,
    order_by: Option<OrderBy<T::SortField>>,
    page: Option<Page>,
}

impl<T: Entity> Specification<T> {
    /// A specification filtered by `criteria`.
    #[must_use]
    pub fn matching(criteria: T::Filter) -> Self {
        Self {
            criteria: Some(criteria),
            includes: Vec::new(),
            order_by: None,
            page: None,
        }
    }

    /// A specification that matches every entity.
    #[must_use]
    pub fn unfiltered() -> Self {
        Self {
            criteria: None,
            includes: Vec::new(),
            order_by: None,
            page: None,
        }
    }

    /// Append a relation to eagerly materialize alongside each result row.
    ///
    /// Includes are kept in insertion order and never affect row count.
    #[must_use]
    pub fn include(mut self, relation: T::Relation) -> Self {
        self.includes.push(relation);
        self
    }

    /// Sort results by `field` in `direction`.
    ///
    /// Replaces any previously set sort, so a specification can never carry
    /// two competing orderings.
    #[must_use]
    pub fn order_by(mut self, field: T::SortField, direction: SortDirection) -> Self {
        self.order_by = Some(OrderBy { field, direction });
        self
    }

    /// Restrict results to a window of `take` rows after skipping `skip`.
    ///
    /// Without this call the window is absent and every matching row is
    /// returned.
    #[must_use]
    pub fn paginate(mut self, skip: usize, take: usize) -> Self {
        self.page = Some(Page { skip, take });
        self
    }

    /// The filter descriptor, if any. Absent means match-all.
    #[must_use]
    pub const fn criteria(&self) -> Option<&T::Filter> {
        self.criteria.as_ref()
    }

    /// Relations to eagerly materialize, in insertion order.
    #[must_use]
    pub fn includes(&self) -> &[T::Relation] {
        &self.includes
    }

    /// The sort, if any.
    #[must_use]
    pub const fn order(&self) -> Option<&OrderBy<T::SortField>> {
        self.order_by.as_ref()
    }

    /// The pagination window, if any.
    #[must_use]
    pub const fn page(&self) -> Option<Page> {
        self.page
    }
}

impl<T: Entity> Default for Specification<T> {
    fn default() -> Self {
        Self::unfiltered()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::product::{Product, ProductFilter, ProductRelation, ProductSortField};
    use crate::types::ProductId;

    #[test]
    fn test_empty_specification() {
        let spec = Specification::<Product>::unfiltered();
        assert!(spec.criteria().is_none());
        assert!(spec.includes().is_empty());
        assert!(spec.order().is_none());
        assert!(spec.page().is_none());
    }

    #[test]
    fn test_includes_keep_insertion_order() {
        let spec = Specification::<Product>::unfiltered()
            .include(ProductRelation::Kind)
            .include(ProductRelation::Brand);
        assert_eq!(
            spec.includes(),
            &[ProductRelation::Kind, ProductRelation::Brand]
        );
    }

    #[test]
    fn test_order_by_replaces_previous_sort() {
        let spec = Specification::<Product>::matching(ProductFilter::Id(ProductId::new(1)))
            .order_by(ProductSortField::Name, SortDirection::Ascending)
            .order_by(ProductSortField::Price, SortDirection::Descending);

        let order = spec.order().copied().unwrap();
        assert_eq!(order.field, ProductSortField::Price);
        assert_eq!(order.direction, SortDirection::Descending);
    }

    #[test]
    fn test_paginate_sets_window() {
        let spec = Specification::<Product>::unfiltered().paginate(10, 5);
        assert_eq!(spec.page(), Some(Page { skip: 10, take: 5 }));
    }
}
