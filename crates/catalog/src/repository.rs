use std::collections::HashMap;

use shelfwise_core::{CategoryId, StoreResult};

use crate::record::CatalogRecord;

#[async_trait::async_trait]
pub trait CatalogRepository<E: CatalogRecord>: Send + Sync {
    async fn insert(&self, record: &E) -> StoreResult<()>;

    async fn get(&self, id: E::Id) -> StoreResult<Option<E>>;

    /// Newest first.
    async fn list(&self) -> StoreResult<Vec<E>>;

    async fn update(&self, record: &E) -> StoreResult<()>;

    /// Returns `false` when no row matched.
    async fn delete(&self, id: E::Id) -> StoreResult<bool>;
}

/// Product totals per category, computed by the store.
#[async_trait::async_trait]
pub trait ProductCounts: Send + Sync {
    /// Categories without products are absent from the map.
    async fn count_by_category(&self) -> StoreResult<HashMap<CategoryId, i64>>;
}
