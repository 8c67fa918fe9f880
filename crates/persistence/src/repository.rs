//! The generic per-entity repository.
//!
//! A repository belongs to exactly one unit of work. Reads go straight to the
//! store; `add`/`update`/`delete` only stage mutations, which become durable
//! when the owning unit of work commits. Storage errors propagate unchanged -
//! the repository performs no retries and no error translation.
//!
//! Async signatures match the store boundary; the in-memory engine happens to
//! complete without suspending.

use std::sync::{Mutex, PoisonError};

use orchard_core::Specification;

use crate::error::StoreError;
use crate::evaluator::evaluate;
use crate::store::{Materialize, MemoryStore, Operation, Staged, StagedOp};

/// CRUD and specification-aware reads over one entity type.
pub struct Repository<T: Materialize> {
    store: MemoryStore,
    staged: Mutex<Vec<Operation<T>>>,
}

#[allow(clippy::unused_async)]
impl<T: Materialize> Repository<T> {
    pub(crate) fn new(store: MemoryStore) -> Self {
        Self {
            store,
            staged: Mutex::new(Vec::new()),
        }
    }

    /// Every entity of this type, in store-defined order.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::UnregisteredEntity` if no table exists for `T`.
    pub async fn get_all(&self) -> Result<Vec<T>, StoreError> {
        self.store.fetch_all::<T>()
    }

    /// Point lookup by key. Absence is `Ok(None)`, never an error.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::UnregisteredEntity` if no table exists for `T`.
    pub async fn get_by_id(&self, key: &T::Key) -> Result<Option<T>, StoreError> {
        self.store.fetch_by_key::<T>(key)
    }

    /// Every entity matching `spec`, filtered, sorted, and paginated, with
    /// the specification's includes materialized.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::UnregisteredEntity` if no table exists for `T`
    /// or for an included relation's entity type.
    pub async fn get_all_with(&self, spec: &Specification<T>) -> Result<Vec<T>, StoreError> {
        let rows = self.store.fetch_all::<T>()?;
        let mut rows = evaluate(rows, spec);
        self.store.materialize_rows(&mut rows, spec.includes())?;
        Ok(rows)
    }

    /// The first entity matching `spec`, with includes materialized.
    ///
    /// Absence is `Ok(None)`, never an error.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::UnregisteredEntity` if no table exists for `T`
    /// or for an included relation's entity type.
    pub async fn get_one_with(&self, spec: &Specification<T>) -> Result<Option<T>, StoreError> {
        let rows = self.store.fetch_all::<T>()?;
        let mut row = evaluate(rows, spec).into_iter().next();
        if let Some(row) = row.as_mut() {
            self.store
                .materialize_rows(std::slice::from_mut(row), spec.includes())?;
        }
        Ok(row)
    }

    /// Stage an insert. Durable only after the owning unit of work commits.
    pub fn add(&self, entity: T) {
        self.stage(Operation::Insert(entity));
    }

    /// Stage an update. Durable only after the owning unit of work commits.
    pub fn update(&self, entity: T) {
        self.stage(Operation::Update(entity));
    }

    /// Stage a delete. Durable only after the owning unit of work commits.
    pub fn delete(&self, entity: &T) {
        self.stage(Operation::Delete(entity.key()));
    }

    fn stage(&self, op: Operation<T>) {
        // A poisoned lock only means another caller panicked mid-push; the
        // staged list itself is still valid.
        self.staged
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(op);
    }

    /// Hand every staged mutation to the unit of work, leaving this
    /// repository's staging area empty.
    pub(crate) fn take_staged(&self) -> Vec<Box<dyn StagedOp>> {
        let ops = std::mem::take(
            &mut *self.staged.lock().unwrap_or_else(PoisonError::into_inner),
        );
        ops.into_iter()
            .map(|op| Box::new(Staged(op)) as Box<dyn StagedOp>)
            .collect()
    }
}
