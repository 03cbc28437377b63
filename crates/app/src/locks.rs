//! Per-product locks
//!
//! Campaign operations that read and then write product state hold the locks of every product
//! they touch, so two requests for the same product never interleave between validation and
//! projection.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::domain::products::records::ProductUuid;

type Registry = Arc<Mutex<FxHashMap<ProductUuid, Arc<AsyncMutex<()>>>>>;

/// Registry of product locks shared by every campaign operation in the process.
#[derive(Clone, Default)]
pub struct ProductLocks {
    registry: Registry,
}

impl Debug for ProductLocks {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("ProductLocks")
            .field("tracked", &lock_registry(&self.registry).len())
            .finish()
    }
}

impl ProductLocks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock every product in `products`, waiting for holders to release them.
    ///
    /// Ids are deduplicated and locked in ascending order, so callers with overlapping sets
    /// cannot deadlock.
    pub async fn acquire<I>(&self, products: I) -> ProductLocksGuard
    where
        I: IntoIterator<Item = ProductUuid>,
    {
        let mut products: SmallVec<[ProductUuid; 8]> = products.into_iter().collect();

        products.sort_unstable();
        products.dedup();

        let mutexes: SmallVec<[(ProductUuid, Arc<AsyncMutex<()>>); 8]> = {
            let mut registry = lock_registry(&self.registry);

            products
                .iter()
                .map(|product| (*product, Arc::clone(registry.entry(*product).or_default())))
                .collect()
        };

        let mut guards = SmallVec::with_capacity(mutexes.len());

        for (product, mutex) in mutexes {
            guards.push((product, mutex.lock_owned().await));
        }

        ProductLocksGuard {
            registry: Arc::clone(&self.registry),
            guards,
        }
    }

    /// Number of products with a live lock entry.
    #[cfg(test)]
    fn tracked(&self) -> usize {
        lock_registry(&self.registry).len()
    }
}

/// Holds a set of product locks until dropped.
pub struct ProductLocksGuard {
    registry: Registry,
    guards: SmallVec<[(ProductUuid, OwnedMutexGuard<()>); 8]>,
}

impl ProductLocksGuard {
    /// Products held by this guard, ascending.
    pub fn products(&self) -> impl Iterator<Item = ProductUuid> + '_ {
        self.guards.iter().map(|(product, _)| *product)
    }
}

impl Debug for ProductLocksGuard {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_list().entries(self.products()).finish()
    }
}

impl Drop for ProductLocksGuard {
    fn drop(&mut self) {
        let released: SmallVec<[ProductUuid; 8]> = self
            .guards
            .drain(..)
            .map(|(product, guard)| {
                drop(guard);
                product
            })
            .collect();

        let mut registry = lock_registry(&self.registry);

        for product in released {
            // Only the registry still refers to the mutex: nobody holds or waits for it.
            if registry
                .get(&product)
                .is_some_and(|mutex| Arc::strong_count(mutex) == 1)
            {
                registry.remove(&product);
            }
        }
    }
}

fn lock_registry(
    registry: &Registry,
) -> MutexGuard<'_, FxHashMap<ProductUuid, Arc<AsyncMutex<()>>>> {
    registry.lock().unwrap_or_else(PoisonError::into_inner)
}
