//! Catalog models: products, brands, and product types.

use std::cmp::Ordering;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::entity::{Entity, NoFilter, NoRelation, NoSortField};
use crate::types::{BrandId, ProductId, ProductTypeId};

/// A manufacturer or label a product is sold under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductBrand {
    pub id: BrandId,
    pub name: String,
}

impl Entity for ProductBrand {
    type Key = BrandId;
    type Filter = NoFilter;
    type SortField = NoSortField;
    type Relation = NoRelation;

    fn key(&self) -> BrandId {
        self.id
    }

    fn matches(&self, filter: &NoFilter) -> bool {
        match *filter {}
    }

    fn compare(&self, _other: &Self, field: &NoSortField) -> Ordering {
        match *field {}
    }
}

/// A product category (e.g. "boards", "hats").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductType {
    pub id: ProductTypeId,
    pub name: String,
}

impl Entity for ProductType {
    type Key = ProductTypeId;
    type Filter = NoFilter;
    type SortField = NoSortField;
    type Relation = NoRelation;

    fn key(&self) -> ProductTypeId {
        self.id
    }

    fn matches(&self, filter: &NoFilter) -> bool {
        match *filter {}
    }

    fn compare(&self, _other: &Self, field: &NoSortField) -> Ordering {
        match *field {}
    }
}

/// A catalog product.
///
/// `brand` and `kind` are relations: they stay `None` unless the read that
/// produced this row asked for them via an include.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub picture_url: String,
    pub price: Decimal,
    pub brand_id: BrandId,
    pub brand: Option<ProductBrand>,
    pub type_id: ProductTypeId,
    pub kind: Option<ProductType>,
}

/// Filter descriptor for product reads.
#[derive(Debug, Clone, PartialEq)]
pub enum ProductFilter {
    /// Catalog query. All fields optional and conjunctive; `search` is a
    /// case-insensitive substring match on the product name.
    Catalog {
        brand: Option<BrandId>,
        kind: Option<ProductTypeId>,
        search: Option<String>,
    },
    /// Point lookup by product ID.
    Id(ProductId),
}

/// Sort fields for product reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductSortField {
    Name,
    Price,
}

/// Relations a product read can eagerly materialize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductRelation {
    Brand,
    Kind,
}

impl Entity for Product {
    type Key = ProductId;
    type Filter = ProductFilter;
    type SortField = ProductSortField;
    type Relation = ProductRelation;

    fn key(&self) -> ProductId {
        self.id
    }

    fn matches(&self, filter: &ProductFilter) -> bool {
        match filter {
            ProductFilter::Catalog {
                brand,
                kind,
                search,
            } => {
                brand.is_none_or(|b| b == self.brand_id)
                    && kind.is_none_or(|k| k == self.type_id)
                    && search.as_ref().is_none_or(|term| {
                        self.name.to_lowercase().contains(&term.to_lowercase())
                    })
            }
            ProductFilter::Id(id) => self.id == *id,
        }
    }

    fn compare(&self, other: &Self, field: &ProductSortField) -> Ordering {
        match field {
            ProductSortField::Name => self.name.cmp(&other.name),
            ProductSortField::Price => self.price.cmp(&other.price),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(name: &str, brand: i32, kind: i32) -> Product {
        Product {
            id: ProductId::new(1),
            name: name.to_owned(),
            description: String::new(),
            picture_url: String::new(),
            price: Decimal::new(1999, 2),
            brand_id: BrandId::new(brand),
            brand: None,
            type_id: ProductTypeId::new(kind),
            kind: None,
        }
    }

    #[test]
    fn test_catalog_filter_is_conjunctive() {
        let p = product("Cedar Longboard", 1, 2);

        let all = ProductFilter::Catalog {
            brand: Some(BrandId::new(1)),
            kind: Some(ProductTypeId::new(2)),
            search: Some("long".to_owned()),
        };
        assert!(p.matches(&all));

        let wrong_brand = ProductFilter::Catalog {
            brand: Some(BrandId::new(9)),
            kind: None,
            search: None,
        };
        assert!(!p.matches(&wrong_brand));
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let p = product("Cedar Longboard", 1, 2);
        let filter = ProductFilter::Catalog {
            brand: None,
            kind: None,
            search: Some("CEDAR".to_owned()),
        };
        assert!(p.matches(&filter));
    }

    #[test]
    fn test_empty_catalog_filter_matches_all() {
        let p = product("anything", 3, 4);
        let filter = ProductFilter::Catalog {
            brand: None,
            kind: None,
            search: None,
        };
        assert!(p.matches(&filter));
    }
}
