use shelfwise_core::{PurchaseId, StoreResult};

use crate::purchase::Purchase;

#[async_trait::async_trait]
pub trait PurchaseRepository: Send + Sync {
    async fn insert(&self, purchase: &Purchase) -> StoreResult<()>;

    async fn get(&self, id: PurchaseId) -> StoreResult<Option<Purchase>>;

    async fn list(&self) -> StoreResult<Vec<Purchase>>;

    async fn update(&self, purchase: &Purchase) -> StoreResult<()>;

    /// Returns `false` when no row matched.
    async fn delete(&self, id: PurchaseId) -> StoreResult<bool>;
}
