use shelfwise_core::{ProductId, StoreResult};

use crate::level::ProductLevel;

/// Read-modify-write step run by [`ProductLevelRepository::modify`].
///
/// Receives the current row (if any) and returns the row to persist, or
/// `None` to leave storage untouched.
pub type LevelMutation = Box<dyn FnOnce(Option<ProductLevel>) -> Option<ProductLevel> + Send>;

/// Storage seam for product levels.
#[async_trait::async_trait]
pub trait ProductLevelRepository: Send + Sync {
    async fn get_by_product(&self, product_id: ProductId) -> StoreResult<Option<ProductLevel>>;

    async fn list(&self) -> StoreResult<Vec<ProductLevel>>;

    /// Run `mutation` against the product's row while holding a per-store lock
    /// (in-memory mutex, or `SELECT ... FOR UPDATE` in a transaction), then
    /// upsert its result. Returns what was written.
    async fn modify(&self, product_id: ProductId, mutation: LevelMutation) -> StoreResult<Option<ProductLevel>>;
}
