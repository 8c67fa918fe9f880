//! The in-memory relational store.
//!
//! [`MemoryStore`] plays the role the database context plays behind a SQL
//! engine: it owns one table per registered entity type, hands out rows,
//! materializes eagerly-loaded relations, and applies a staged batch of
//! mutations atomically. Repositories and the unit of work sit on top of it;
//! nothing else touches the tables directly.
//!
//! # Atomicity
//!
//! `commit` applies the whole batch to a snapshot of the tables and swaps the
//! snapshot in only if every operation succeeds, so a failed commit leaves
//! the live tables exactly as they were.

use std::any::{Any, TypeId, type_name};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use orchard_core::Entity;

use crate::error::StoreError;

/// Rows of one entity type, keyed by entity ID.
struct Table<T: Entity> {
    rows: BTreeMap<T::Key, T>,
}

impl<T: Entity> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
        }
    }
}

impl<T: Entity> Clone for Table<T> {
    fn clone(&self) -> Self {
        Self {
            rows: self.rows.clone(),
        }
    }
}

/// Object-safe view of a table so tables of different entity types can live
/// in one registry. Retrieval downcasts back to the concrete `Table<T>`.
trait AnyTable: Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn clone_box(&self) -> Box<dyn AnyTable>;
}

impl<T: Entity> AnyTable for Table<T> {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn clone_box(&self) -> Box<dyn AnyTable> {
        Box::new(self.clone())
    }
}

/// The full table registry, keyed by entity type identity.
#[derive(Default)]
pub(crate) struct Tables {
    by_type: HashMap<TypeId, Box<dyn AnyTable>>,
}

impl Clone for Tables {
    fn clone(&self) -> Self {
        Self {
            by_type: self
                .by_type
                .iter()
                .map(|(type_id, table)| (*type_id, table.clone_box()))
                .collect(),
        }
    }
}

impl Tables {
    fn table<T: Entity>(&self) -> Result<&Table<T>, StoreError> {
        self.by_type
            .get(&TypeId::of::<T>())
            .and_then(|table| table.as_any().downcast_ref::<Table<T>>())
            .ok_or(StoreError::UnregisteredEntity(type_name::<T>()))
    }

    fn table_mut<T: Entity>(&mut self) -> Result<&mut Table<T>, StoreError> {
        self.by_type
            .get_mut(&TypeId::of::<T>())
            .and_then(|table| table.as_any_mut().downcast_mut::<Table<T>>())
            .ok_or(StoreError::UnregisteredEntity(type_name::<T>()))
    }
}

/// Read access to sibling tables while a relation is being materialized.
pub struct RelationSource<'a> {
    tables: &'a Tables,
}

impl RelationSource<'_> {
    /// Find a related row by key.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::UnregisteredEntity` if no table exists for `R`.
    /// A dangling foreign key is `Ok(None)`, not an error.
    pub fn find<R: Entity>(&self, key: &R::Key) -> Result<Option<R>, StoreError> {
        Ok(self.tables.table::<R>()?.rows.get(key).cloned())
    }
}

/// How an entity's relations move between storage and the loaded row.
///
/// Rows are stored with relations detached; an include on a read materializes
/// them back from the sibling tables. Entities without relations implement
/// both methods as no-ops (the relation type is uninhabited).
pub trait Materialize: Entity {
    /// Reset every relation to its unloaded state. Applied when a row is
    /// written, so reads without includes always see unloaded relations.
    fn detach(&mut self);

    /// Load the named relation onto this row from the sibling tables.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::UnregisteredEntity` if the related entity type
    /// has no table.
    fn materialize(
        &mut self,
        relation: &Self::Relation,
        source: &RelationSource<'_>,
    ) -> Result<(), StoreError>;
}

/// A staged mutation for one entity.
#[derive(Debug, Clone)]
pub(crate) enum Operation<T: Entity> {
    Insert(T),
    Update(T),
    Delete(T::Key),
}

/// Object-safe staged mutation, so one commit batch can span entity types.
pub(crate) trait StagedOp: Send {
    fn apply(&self, tables: &mut Tables) -> Result<(), StoreError>;
}

pub(crate) struct Staged<T: Materialize>(pub(crate) Operation<T>);

impl<T: Materialize> StagedOp for Staged<T> {
    fn apply(&self, tables: &mut Tables) -> Result<(), StoreError> {
        let table = tables.table_mut::<T>()?;
        match &self.0 {
            Operation::Insert(row) => {
                if table.rows.contains_key(&row.key()) {
                    return Err(StoreError::DuplicateKey(type_name::<T>()));
                }
                let mut row = row.clone();
                row.detach();
                table.rows.insert(row.key(), row);
            }
            Operation::Update(row) => {
                if !table.rows.contains_key(&row.key()) {
                    return Err(StoreError::MissingRow {
                        table: type_name::<T>(),
                        op: "update",
                    });
                }
                let mut row = row.clone();
                row.detach();
                table.rows.insert(row.key(), row);
            }
            Operation::Delete(key) => {
                if table.rows.remove(key).is_none() {
                    return Err(StoreError::MissingRow {
                        table: type_name::<T>(),
                        op: "delete",
                    });
                }
            }
        }
        Ok(())
    }
}

/// The in-memory relational store.
///
/// Cheaply cloneable; clones share the same tables. Entity types must be
/// registered before use - operating on an unregistered type is caller
/// misuse and fails with [`StoreError::UnregisteredEntity`].
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a table for `T`. Registering twice is a no-op and keeps the
    /// existing rows.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::LockPoisoned` if a previous writer panicked.
    pub fn register<T: Materialize>(&self) -> Result<(), StoreError> {
        let mut tables = self.write()?;
        tables
            .by_type
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::new(Table::<T>::default()));
        Ok(())
    }

    pub(crate) fn fetch_all<T: Entity>(&self) -> Result<Vec<T>, StoreError> {
        Ok(self.read()?.table::<T>()?.rows.values().cloned().collect())
    }

    pub(crate) fn fetch_by_key<T: Entity>(&self, key: &T::Key) -> Result<Option<T>, StoreError> {
        Ok(self.read()?.table::<T>()?.rows.get(key).cloned())
    }

    /// Materialize `includes` onto every row, in include order.
    pub(crate) fn materialize_rows<T: Materialize>(
        &self,
        rows: &mut [T],
        includes: &[T::Relation],
    ) -> Result<(), StoreError> {
        if includes.is_empty() {
            return Ok(());
        }
        let tables = self.read()?;
        let source = RelationSource { tables: &tables };
        for row in rows.iter_mut() {
            for relation in includes {
                row.materialize(relation, &source)?;
            }
        }
        Ok(())
    }

    /// Apply a staged batch atomically and return the affected-row count.
    ///
    /// Either every operation lands or none does.
    pub(crate) fn commit(&self, batch: Vec<Box<dyn StagedOp>>) -> Result<usize, StoreError> {
        if batch.is_empty() {
            return Ok(0);
        }

        let mut tables = self.write()?;
        let mut staged = tables.clone();
        for op in &batch {
            op.apply(&mut staged)?;
        }
        *tables = staged;
        Ok(batch.len())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, StoreError> {
        self.tables.read().map_err(|_| StoreError::LockPoisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, StoreError> {
        self.tables.write().map_err(|_| StoreError::LockPoisoned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orchard_core::models::product::ProductBrand;
    use orchard_core::types::BrandId;

    fn brand(id: i32, name: &str) -> ProductBrand {
        ProductBrand {
            id: BrandId::new(id),
            name: name.to_owned(),
        }
    }

    fn insert(row: ProductBrand) -> Box<dyn StagedOp> {
        Box::new(Staged(Operation::Insert(row)))
    }

    #[test]
    fn test_unregistered_type_is_caller_misuse() {
        let store = MemoryStore::new();
        let err = store.fetch_all::<ProductBrand>().unwrap_err();
        assert!(matches!(err, StoreError::UnregisteredEntity(_)));
    }

    #[test]
    fn test_commit_inserts_and_counts() {
        let store = MemoryStore::new();
        store.register::<ProductBrand>().expect("register");

        let count = store
            .commit(vec![insert(brand(1, "Cedar")), insert(brand(2, "Pine"))])
            .expect("commit");
        assert_eq!(count, 2);
        assert_eq!(store.fetch_all::<ProductBrand>().expect("fetch").len(), 2);
    }

    #[test]
    fn test_failed_commit_leaves_tables_unchanged() {
        let store = MemoryStore::new();
        store.register::<ProductBrand>().expect("register");
        store
            .commit(vec![insert(brand(1, "Cedar"))])
            .expect("seed commit");

        // Second op collides; the valid first op must not land either.
        let err = store
            .commit(vec![insert(brand(2, "Pine")), insert(brand(1, "Dup"))])
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateKey(_)));

        let rows = store.fetch_all::<ProductBrand>().expect("fetch");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows.first().map(|b| b.name.as_str()), Some("Cedar"));
    }

    #[test]
    fn test_update_and_delete_require_existing_rows() {
        let store = MemoryStore::new();
        store.register::<ProductBrand>().expect("register");

        let update: Box<dyn StagedOp> = Box::new(Staged(Operation::Update(brand(1, "Cedar"))));
        assert!(matches!(
            store.commit(vec![update]).unwrap_err(),
            StoreError::MissingRow { op: "update", .. }
        ));

        let delete: Box<dyn StagedOp> =
            Box::new(Staged(Operation::<ProductBrand>::Delete(BrandId::new(1))));
        assert!(matches!(
            store.commit(vec![delete]).unwrap_err(),
            StoreError::MissingRow { op: "delete", .. }
        ));
    }
}
