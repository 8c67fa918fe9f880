//! Ready-made specifications for the common catalog and order queries.
//!
//! Business operations reuse these instead of assembling filter/include/sort
//! combinations inline at every call site.

use crate::models::order::{Order, OrderFilter, OrderRelation, OrderSortField};
use crate::models::product::{Product, ProductFilter, ProductRelation, ProductSortField};
use crate::specification::{SortDirection, Specification};
use crate::types::{BrandId, OrderId, ProductId, ProductTypeId};

const DEFAULT_PAGE_SIZE: usize = 5;
const MAX_PAGE_SIZE: usize = 10;

/// How a catalog listing is sorted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductSortOption {
    NameAscending,
    NameDescending,
    PriceAscending,
    PriceDescending,
}

/// Caller-supplied parameters for a catalog listing.
///
/// The page size is clamped on write so a client cannot request arbitrarily
/// large pages (maximum 10, default 5).
#[derive(Debug, Clone)]
pub struct ProductQuery {
    pub brand: Option<BrandId>,
    pub kind: Option<ProductTypeId>,
    pub search: Option<String>,
    pub sort: Option<ProductSortOption>,
    /// 1-based page index.
    pub page_index: usize,
    page_size: usize,
}

impl Default for ProductQuery {
    fn default() -> Self {
        Self {
            brand: None,
            kind: None,
            search: None,
            sort: None,
            page_index: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ProductQuery {
    /// The effective page size.
    #[must_use]
    pub const fn page_size(&self) -> usize {
        self.page_size
    }

    /// Set the page size, clamped to the maximum.
    pub const fn set_page_size(&mut self, size: usize) {
        self.page_size = if size > MAX_PAGE_SIZE {
            MAX_PAGE_SIZE
        } else {
            size
        };
    }

    fn filter(&self) -> ProductFilter {
        ProductFilter::Catalog {
            brand: self.brand,
            kind: self.kind,
            search: self.search.clone(),
        }
    }
}

/// Catalog listing: filtered, with brand and type loaded, sorted, paginated.
#[must_use]
pub fn product_catalog(query: &ProductQuery) -> Specification<Product> {
    let mut spec = Specification::matching(query.filter())
        .include(ProductRelation::Brand)
        .include(ProductRelation::Kind);

    spec = match query.sort {
        Some(ProductSortOption::NameAscending) => {
            spec.order_by(ProductSortField::Name, SortDirection::Ascending)
        }
        Some(ProductSortOption::NameDescending) => {
            spec.order_by(ProductSortField::Name, SortDirection::Descending)
        }
        Some(ProductSortOption::PriceAscending) => {
            spec.order_by(ProductSortField::Price, SortDirection::Ascending)
        }
        Some(ProductSortOption::PriceDescending) => {
            spec.order_by(ProductSortField::Price, SortDirection::Descending)
        }
        None => spec,
    };

    let skip = query.page_index.max(1) - 1;
    spec.paginate(skip * query.page_size, query.page_size)
}

/// The same filter as [`product_catalog`] without includes, sort, or paging.
///
/// Used to count the matching rows for pagination headers.
#[must_use]
pub fn product_count(query: &ProductQuery) -> Specification<Product> {
    Specification::matching(query.filter())
}

/// Point lookup of one product with brand and type loaded.
#[must_use]
pub fn product_by_id(id: ProductId) -> Specification<Product> {
    Specification::matching(ProductFilter::Id(id))
        .include(ProductRelation::Brand)
        .include(ProductRelation::Kind)
}

/// Every order placed under `email`, newest first, with shipping loaded.
#[must_use]
pub fn orders_for_user(email: impl Into<String>) -> Specification<Order> {
    Specification::matching(OrderFilter::UserEmail(email.into()))
        .include(OrderRelation::DeliveryMethod)
        .order_by(OrderSortField::OrderDate, SortDirection::Descending)
}

/// Point lookup of one order with shipping loaded.
#[must_use]
pub fn order_by_id(id: OrderId) -> Specification<Order> {
    Specification::matching(OrderFilter::Id(id)).include(OrderRelation::DeliveryMethod)
}

/// The order carrying `payment_intent_id`, if any.
#[must_use]
pub fn order_by_payment_intent(payment_intent_id: impl Into<String>) -> Specification<Order> {
    Specification::matching(OrderFilter::PaymentIntent(payment_intent_id.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::specification::Page;

    #[test]
    fn test_page_size_is_clamped() {
        let mut query = ProductQuery::default();
        assert_eq!(query.page_size(), DEFAULT_PAGE_SIZE);

        query.set_page_size(50);
        assert_eq!(query.page_size(), MAX_PAGE_SIZE);

        query.set_page_size(3);
        assert_eq!(query.page_size(), 3);
    }

    #[test]
    fn test_catalog_pagination_window() {
        let mut query = ProductQuery::default();
        query.page_index = 3;
        query.set_page_size(10);

        let spec = product_catalog(&query);
        assert_eq!(spec.page(), Some(Page { skip: 20, take: 10 }));
    }

    #[test]
    fn test_catalog_loads_brand_and_kind() {
        let spec = product_catalog(&ProductQuery::default());
        assert_eq!(
            spec.includes(),
            &[ProductRelation::Brand, ProductRelation::Kind]
        );
    }

    #[test]
    fn test_count_has_no_window() {
        let spec = product_count(&ProductQuery::default());
        assert!(spec.page().is_none());
        assert!(spec.includes().is_empty());
        assert!(spec.order().is_none());
    }

    #[test]
    fn test_orders_for_user_sorts_newest_first() {
        let spec = orders_for_user("ada@example.com");
        let order = spec.order().copied().expect("sort is set");
        assert_eq!(order.field, OrderSortField::OrderDate);
        assert_eq!(order.direction, SortDirection::Descending);
    }
}
