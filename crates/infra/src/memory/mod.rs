//! In-memory stores for development and tests.
//!
//! Each store keeps its rows in an [`InMemoryTable`]; a poisoned lock is
//! reported as `StoreError::Backend`.

mod auth;
mod catalog;
mod stock;

use std::collections::HashMap;
use std::sync::RwLock;

use shelfwise_core::{Entity, StoreError, StoreResult};

pub use auth::{InMemoryOtpStore, InMemoryRefreshTokenStore, InMemoryUserStore};
pub use catalog::InMemoryCatalogStore;
pub use stock::{InMemoryProductLevelStore, InMemoryPurchaseStore};

/// Entity table keyed by `Entity::id`.
#[derive(Debug)]
pub struct InMemoryTable<E: Entity> {
    rows: RwLock<HashMap<E::Id, E>>,
}

impl<E: Entity> Default for InMemoryTable<E> {
    fn default() -> Self {
        Self {
            rows: RwLock::new(HashMap::new()),
        }
    }
}

impl<E> InMemoryTable<E>
where
    E: Entity + Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &E::Id) -> StoreResult<Option<E>> {
        self.read(|rows| rows.get(id).cloned())
    }

    pub fn find(&self, pred: impl Fn(&E) -> bool) -> StoreResult<Option<E>> {
        self.read(|rows| rows.values().find(|e| pred(e)).cloned())
    }

    pub fn filter(&self, pred: impl Fn(&E) -> bool) -> StoreResult<Vec<E>> {
        self.read(|rows| rows.values().filter(|e| pred(e)).cloned().collect())
    }

    pub fn upsert(&self, entity: E) -> StoreResult<()> {
        self.write(|rows| {
            rows.insert(*entity.id(), entity);
        })
    }

    pub fn remove(&self, id: &E::Id) -> StoreResult<bool> {
        self.write(|rows| rows.remove(id).is_some())
    }

    pub fn read<R>(&self, f: impl FnOnce(&HashMap<E::Id, E>) -> R) -> StoreResult<R> {
        let rows = self
            .rows
            .read()
            .map_err(|_| StoreError::backend("in-memory table lock poisoned"))?;
        Ok(f(&rows))
    }

    /// Run `f` with exclusive access; used for read-modify-write sequences.
    pub fn write<R>(&self, f: impl FnOnce(&mut HashMap<E::Id, E>) -> R) -> StoreResult<R> {
        let mut rows = self
            .rows
            .write()
            .map_err(|_| StoreError::backend("in-memory table lock poisoned"))?;
        Ok(f(&mut rows))
    }
}
