use shelfwise_core::{ProductId, PurchaseId, StoreResult};
use shelfwise_inventory::{LevelMutation, ProductLevel, ProductLevelRepository};
use shelfwise_purchasing::{Purchase, PurchaseRepository};

use super::InMemoryTable;

/// Product levels; `modify` runs under the table's write lock.
#[derive(Debug, Default)]
pub struct InMemoryProductLevelStore {
    table: InMemoryTable<ProductLevel>,
}

impl InMemoryProductLevelStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl ProductLevelRepository for InMemoryProductLevelStore {
    async fn get_by_product(&self, product_id: ProductId) -> StoreResult<Option<ProductLevel>> {
        self.table.find(|l| l.product_id == product_id)
    }

    async fn list(&self) -> StoreResult<Vec<ProductLevel>> {
        let mut levels = self.table.filter(|_| true)?;
        levels.sort_by_key(|l| l.created_at);
        Ok(levels)
    }

    async fn modify(&self, product_id: ProductId, mutation: LevelMutation) -> StoreResult<Option<ProductLevel>> {
        self.table.write(|rows| {
            let current = rows.values().find(|l| l.product_id == product_id).cloned();
            let next = mutation(current);
            if let Some(level) = &next {
                rows.insert(level.id, level.clone());
            }
            next
        })
    }
}

#[derive(Debug, Default)]
pub struct InMemoryPurchaseStore {
    table: InMemoryTable<Purchase>,
}

impl InMemoryPurchaseStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl PurchaseRepository for InMemoryPurchaseStore {
    async fn insert(&self, purchase: &Purchase) -> StoreResult<()> {
        self.table.upsert(purchase.clone())
    }

    async fn get(&self, id: PurchaseId) -> StoreResult<Option<Purchase>> {
        self.table.get(&id)
    }

    async fn list(&self) -> StoreResult<Vec<Purchase>> {
        let mut purchases = self.table.filter(|_| true)?;
        purchases.sort_by_key(|p| p.created_at);
        Ok(purchases)
    }

    async fn update(&self, purchase: &Purchase) -> StoreResult<()> {
        self.table.upsert(purchase.clone())
    }

    async fn delete(&self, id: PurchaseId) -> StoreResult<bool> {
        self.table.remove(&id)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use shelfwise_inventory::{StockLedger, StockPolicy};

    use super::*;

    #[tokio::test]
    async fn ledger_over_memory_store_keeps_one_row_per_product() {
        let store = Arc::new(InMemoryProductLevelStore::new());
        let ledger = StockLedger::new(store.clone(), StockPolicy::default());
        let p = ProductId::new();

        ledger.record_purchase(p, 3).await.unwrap();
        ledger.record_purchase(p, 4).await.unwrap();
        ledger.adjust_in_stock(p, -1).await.unwrap();

        let all = store.list().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!((all[0].purchase_quantity, all[0].in_stock_quantity), (7, 2));
    }
}
