//! Pure specification evaluation.
//!
//! [`evaluate`] turns a fetched row set and a specification into the rows the
//! caller asked for. It composes plain sequence operators - filter, stable
//! sort, skip-then-take - and performs no I/O, so it is testable against any
//! in-memory collection. Eager-load materialization is the store's job and
//! happens after evaluation, on the rows that survive; includes never affect
//! row count.

use orchard_core::{Entity, SortDirection, Specification};

/// Apply `spec` to `rows`: filter, then sort, then paginate.
///
/// A specification with no filter, no sort, and no page returns the rows
/// unchanged. Pagination is skip-then-take over the filtered, sorted rows.
#[must_use]
pub fn evaluate<T: Entity>(rows: Vec<T>, spec: &Specification<T>) -> Vec<T> {
    let mut rows = match spec.criteria() {
        Some(filter) => rows.into_iter().filter(|row| row.matches(filter)).collect(),
        None => rows,
    };

    if let Some(order) = spec.order() {
        rows.sort_by(|a, b| {
            let ordering = a.compare(b, &order.field);
            match order.direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        });
    }

    if let Some(page) = spec.page() {
        rows = rows.into_iter().skip(page.skip).take(page.take).collect();
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use orchard_core::models::product::{Product, ProductFilter, ProductSortField};
    use orchard_core::types::{BrandId, ProductId, ProductTypeId};
    use rust_decimal::Decimal;

    fn product(id: i32, name: &str, cents: i64) -> Product {
        Product {
            id: ProductId::new(id),
            name: name.to_owned(),
            description: String::new(),
            picture_url: String::new(),
            price: Decimal::new(cents, 2),
            brand_id: BrandId::new(1),
            brand: None,
            type_id: ProductTypeId::new(1),
            kind: None,
        }
    }

    fn names(rows: &[Product]) -> Vec<&str> {
        rows.iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn test_empty_specification_returns_everything() {
        let rows = vec![product(1, "b", 100), product(2, "a", 200)];
        let out = evaluate(rows.clone(), &Specification::unfiltered());
        assert_eq!(out, rows);
    }

    #[test]
    fn test_filter_applies_before_sort_and_page() {
        let rows = vec![
            product(1, "board", 300),
            product(2, "hat", 100),
            product(3, "bag", 200),
        ];
        let spec = Specification::matching(ProductFilter::Catalog {
            brand: None,
            kind: None,
            search: Some("b".to_owned()),
        })
        .order_by(ProductSortField::Price, SortDirection::Ascending)
        .paginate(0, 1);

        let out = evaluate(rows, &spec);
        assert_eq!(names(&out), vec!["bag"]);
    }

    #[test]
    fn test_ascending_sort_by_name() {
        let rows = vec![product(1, "b", 0), product(2, "a", 0), product(3, "c", 0)];
        let spec =
            Specification::unfiltered().order_by(ProductSortField::Name, SortDirection::Ascending);
        assert_eq!(names(&evaluate(rows, &spec)), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_descending_sort_by_price() {
        let rows = vec![product(1, "a", 100), product(2, "b", 300), product(3, "c", 200)];
        let spec = Specification::unfiltered()
            .order_by(ProductSortField::Price, SortDirection::Descending);
        assert_eq!(names(&evaluate(rows, &spec)), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_pagination_is_skip_then_take() {
        let rows: Vec<Product> = (1..=10)
            .map(|i| product(i, &format!("p{i:02}"), i64::from(i)))
            .collect();
        let spec = Specification::unfiltered()
            .order_by(ProductSortField::Name, SortDirection::Ascending)
            .paginate(4, 3);

        assert_eq!(names(&evaluate(rows, &spec)), vec!["p05", "p06", "p07"]);
    }

    #[test]
    fn test_pagination_window_sizes() {
        // |result| == max(0, min(take, n - skip)) for n == 4
        let rows: Vec<Product> = (1..=4).map(|i| product(i, "p", 0)).collect();
        for (skip, take, expected) in [(0, 2, 2), (2, 10, 2), (4, 3, 0), (9, 1, 0), (0, 0, 0)] {
            let spec = Specification::unfiltered().paginate(skip, take);
            assert_eq!(
                evaluate(rows.clone(), &spec).len(),
                expected,
                "skip={skip} take={take}"
            );
        }
    }

    #[test]
    fn test_no_page_returns_full_count() {
        let rows: Vec<Product> = (1..=7).map(|i| product(i, "p", 0)).collect();
        let out = evaluate(rows, &Specification::unfiltered());
        assert_eq!(out.len(), 7);
    }
}
