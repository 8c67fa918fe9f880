//! The unit of work: one transaction scope per logical operation.
//!
//! A unit of work hands out exactly one repository per entity type and
//! commits everything those repositories staged as a single atomic batch.
//! Create one per inbound operation and discard it afterwards; sharing an
//! instance across concurrent operations is unsupported.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::debug;

use crate::error::StoreError;
use crate::repository::Repository;
use crate::store::{Materialize, MemoryStore, StagedOp};

/// Type-erased handle to a repository's staging area, so `save_changes` can
/// drain repositories of different entity types uniformly.
trait StagedSource: Send + Sync {
    fn take_staged(&self) -> Vec<Box<dyn StagedOp>>;
}

impl<T: Materialize> StagedSource for Repository<T> {
    fn take_staged(&self) -> Vec<Box<dyn StagedOp>> {
        Self::take_staged(self)
    }
}

/// Repositories created so far, keyed by entity type identity.
#[derive(Default)]
struct RepositoryCache {
    by_type: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
    sources: Vec<Arc<dyn StagedSource>>,
}

/// A transactional scope multiplexing per-entity repositories over one store.
pub struct UnitOfWork {
    store: MemoryStore,
    cache: Mutex<RepositoryCache>,
}

impl UnitOfWork {
    /// Create a unit of work over `store`.
    #[must_use]
    pub fn new(store: MemoryStore) -> Self {
        Self {
            store,
            cache: Mutex::new(RepositoryCache::default()),
        }
    }

    /// The repository for entity type `T`, created lazily on first request.
    ///
    /// Every call for the same `T` on the same unit of work returns the same
    /// instance; a fresh unit of work gets a fresh repository.
    pub fn repository<T: Materialize>(&self) -> Arc<Repository<T>> {
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(handle) = cache.by_type.get(&TypeId::of::<T>())
            && let Some(repository) = handle.downcast_ref::<Arc<Repository<T>>>()
        {
            return Arc::clone(repository);
        }

        let repository = Arc::new(Repository::<T>::new(self.store.clone()));
        cache
            .by_type
            .insert(TypeId::of::<T>(), Box::new(Arc::clone(&repository)));
        cache
            .sources
            .push(Arc::clone(&repository) as Arc<dyn StagedSource>);
        repository
    }

    /// Commit every staged mutation from every repository of this unit of
    /// work as one atomic batch.
    ///
    /// Returns the number of affected entities. Either every staged mutation
    /// becomes durable or none does.
    ///
    /// # Errors
    ///
    /// Returns the underlying [`StoreError`] unchanged; on error the store is
    /// left exactly as it was before the call.
    #[allow(clippy::unused_async)]
    pub async fn save_changes(&self) -> Result<usize, StoreError> {
        let sources: Vec<Arc<dyn StagedSource>> = {
            let cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
            cache.sources.clone()
        };

        let batch: Vec<Box<dyn StagedOp>> = sources
            .iter()
            .flat_map(|source| source.take_staged())
            .collect();

        debug!(staged = batch.len(), "committing unit of work");
        self.store.commit(batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orchard_core::models::product::{ProductBrand, ProductType};
    use orchard_core::types::{BrandId, ProductTypeId};

    fn store() -> MemoryStore {
        let store = MemoryStore::new();
        store.register::<ProductBrand>().expect("register brand");
        store.register::<ProductType>().expect("register type");
        store
    }

    #[test]
    fn test_repository_is_cached_per_entity_type() {
        let uow = UnitOfWork::new(store());

        let first = uow.repository::<ProductBrand>();
        let second = uow.repository::<ProductBrand>();
        assert!(Arc::ptr_eq(&first, &second));

        // A different entity type gets its own repository; a fresh unit of
        // work gets a fresh instance.
        let _types = uow.repository::<ProductType>();
        let other_uow = UnitOfWork::new(store());
        let third = other_uow.repository::<ProductBrand>();
        assert!(!Arc::ptr_eq(&first, &third));
    }

    #[tokio::test]
    async fn test_save_changes_spans_all_repositories() {
        let store = store();
        let uow = UnitOfWork::new(store.clone());

        uow.repository::<ProductBrand>().add(ProductBrand {
            id: BrandId::new(1),
            name: "Cedar".to_owned(),
        });
        uow.repository::<ProductType>().add(ProductType {
            id: ProductTypeId::new(1),
            name: "Boards".to_owned(),
        });

        let affected = uow.save_changes().await.expect("commit");
        assert_eq!(affected, 2);
        assert_eq!(store.fetch_all::<ProductBrand>().expect("fetch").len(), 1);
        assert_eq!(store.fetch_all::<ProductType>().expect("fetch").len(), 1);
    }

    #[tokio::test]
    async fn test_empty_save_changes_affects_nothing() {
        let uow = UnitOfWork::new(store());
        assert_eq!(uow.save_changes().await.expect("commit"), 0);
    }
}
