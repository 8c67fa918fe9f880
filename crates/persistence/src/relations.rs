//! Relation wiring for the domain models.
//!
//! Each entity the store can hold declares here how its relations detach on
//! write and materialize on an included read. Foreign keys that point at no
//! row leave the relation unloaded rather than failing the read.

use orchard_core::models::order::{DeliveryMethod, Order, OrderRelation};
use orchard_core::models::product::{Product, ProductBrand, ProductRelation, ProductType};

use crate::error::StoreError;
use crate::store::{Materialize, RelationSource};

impl Materialize for Product {
    fn detach(&mut self) {
        self.brand = None;
        self.kind = None;
    }

    fn materialize(
        &mut self,
        relation: &ProductRelation,
        source: &RelationSource<'_>,
    ) -> Result<(), StoreError> {
        match relation {
            ProductRelation::Brand => self.brand = source.find(&self.brand_id)?,
            ProductRelation::Kind => self.kind = source.find(&self.type_id)?,
        }
        Ok(())
    }
}

impl Materialize for Order {
    fn detach(&mut self) {
        self.delivery_method = None;
    }

    fn materialize(
        &mut self,
        relation: &OrderRelation,
        source: &RelationSource<'_>,
    ) -> Result<(), StoreError> {
        match relation {
            OrderRelation::DeliveryMethod => {
                self.delivery_method = source.find(&self.delivery_method_id)?;
            }
        }
        Ok(())
    }
}

impl Materialize for ProductBrand {
    fn detach(&mut self) {}

    fn materialize(
        &mut self,
        relation: &orchard_core::NoRelation,
        _source: &RelationSource<'_>,
    ) -> Result<(), StoreError> {
        match *relation {}
    }
}

impl Materialize for ProductType {
    fn detach(&mut self) {}

    fn materialize(
        &mut self,
        relation: &orchard_core::NoRelation,
        _source: &RelationSource<'_>,
    ) -> Result<(), StoreError> {
        match *relation {}
    }
}

impl Materialize for DeliveryMethod {
    fn detach(&mut self) {}

    fn materialize(
        &mut self,
        relation: &orchard_core::NoRelation,
        _source: &RelationSource<'_>,
    ) -> Result<(), StoreError> {
        match *relation {}
    }
}
