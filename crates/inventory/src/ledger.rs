//! Stock Ledger service.

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;

use shelfwise_core::{ProductId, StoreError};

use crate::level::{LevelCommand, ProductLevel, StockPolicy, apply};
use crate::repository::ProductLevelRepository;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Product level not found.")]
    NotFound,

    #[error("stock ledger storage failure: {0}")]
    Storage(#[from] StoreError),
}

/// Maintains per-product purchase and in-stock quantities.
#[derive(Clone)]
pub struct StockLedger {
    repo: Arc<dyn ProductLevelRepository>,
    policy: StockPolicy,
}

impl StockLedger {
    pub fn new(repo: Arc<dyn ProductLevelRepository>, policy: StockPolicy) -> Self {
        Self { repo, policy }
    }

    pub fn policy(&self) -> StockPolicy {
        self.policy
    }

    pub async fn get_by_product(&self, product_id: ProductId) -> Result<Option<ProductLevel>, LedgerError> {
        Ok(self.repo.get_by_product(product_id).await?)
    }

    pub async fn list(&self) -> Result<Vec<ProductLevel>, LedgerError> {
        Ok(self.repo.list().await?)
    }

    /// Add purchased units; creates the level on the first purchase.
    pub async fn record_purchase(&self, product_id: ProductId, quantity: i32) -> Result<ProductLevel, LedgerError> {
        self.execute(product_id, LevelCommand::RecordPurchase { quantity })
            .await?
            .ok_or(LedgerError::NotFound)
    }

    /// Undo a purchase: take the units out of stock, then out of the purchased total.
    ///
    /// Both steps always run. The first failure is returned; on success the
    /// level after the purchased-total step is returned.
    pub async fn reverse_purchase(
        &self,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<Option<ProductLevel>, LedgerError> {
        let in_stock = self.adjust_in_stock(product_id, -quantity).await;
        if let Err(e) = &in_stock {
            tracing::warn!(%product_id, quantity, error = %e, "in-stock reversal failed");
        }
        let purchased = self.adjust_purchase_quantity(product_id, -quantity).await;
        if let Err(e) = &purchased {
            tracing::warn!(%product_id, quantity, error = %e, "purchase quantity reversal failed");
        }

        in_stock?;
        purchased
    }

    pub async fn adjust_in_stock(&self, product_id: ProductId, delta: i32) -> Result<ProductLevel, LedgerError> {
        self.execute(product_id, LevelCommand::AdjustInStock { delta })
            .await?
            .ok_or(LedgerError::NotFound)
    }

    /// Never creates a level; unknown products report `NotFound`.
    pub async fn set_reorder_level(&self, product_id: ProductId, level: i32) -> Result<ProductLevel, LedgerError> {
        self.execute(product_id, LevelCommand::SetReorderLevel { level })
            .await?
            .ok_or(LedgerError::NotFound)
    }

    /// `Ok(None)` when the product has no level and `delta <= 0`.
    pub async fn adjust_purchase_quantity(
        &self,
        product_id: ProductId,
        delta: i32,
    ) -> Result<Option<ProductLevel>, LedgerError> {
        self.execute(product_id, LevelCommand::AdjustPurchaseQuantity { delta }).await
    }

    async fn execute(&self, product_id: ProductId, command: LevelCommand) -> Result<Option<ProductLevel>, LedgerError> {
        let policy = self.policy;
        let written = self
            .repo
            .modify(
                product_id,
                Box::new(move |current| apply(current, product_id, command, policy, Utc::now())),
            )
            .await?;

        if let Some(level) = &written {
            tracing::debug!(
                %product_id,
                ?command,
                purchase = level.purchase_quantity,
                in_stock = level.in_stock_quantity,
                "product level updated"
            );
        }
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};

    use tokio::sync::Mutex;

    use shelfwise_core::StoreResult;

    use super::*;
    use crate::repository::LevelMutation;

    #[derive(Default)]
    struct Levels {
        rows: Mutex<HashMap<ProductId, ProductLevel>>,
        fail_writes: AtomicBool,
    }

    #[async_trait::async_trait]
    impl ProductLevelRepository for Levels {
        async fn get_by_product(&self, product_id: ProductId) -> StoreResult<Option<ProductLevel>> {
            Ok(self.rows.lock().await.get(&product_id).cloned())
        }

        async fn list(&self) -> StoreResult<Vec<ProductLevel>> {
            Ok(self.rows.lock().await.values().cloned().collect())
        }

        async fn modify(&self, product_id: ProductId, mutation: LevelMutation) -> StoreResult<Option<ProductLevel>> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(StoreError::backend("offline"));
            }
            let mut rows = self.rows.lock().await;
            let next = mutation(rows.get(&product_id).cloned());
            if let Some(level) = &next {
                rows.insert(product_id, level.clone());
            }
            Ok(next)
        }
    }

    fn ledger() -> (StockLedger, Arc<Levels>) {
        let repo = Arc::new(Levels::default());
        (StockLedger::new(repo.clone(), StockPolicy::default()), repo)
    }

    #[tokio::test]
    async fn purchase_then_reverse_returns_to_zero_purchased() {
        let (ledger, _) = ledger();
        let p = ProductId::new();

        ledger.record_purchase(p, 10).await.unwrap();
        let reversed = ledger.reverse_purchase(p, 4).await.unwrap().unwrap();
        assert_eq!((reversed.purchase_quantity, reversed.in_stock_quantity), (6, 6));

        let level = ledger.get_by_product(p).await.unwrap().unwrap();
        assert_eq!(level, reversed);
    }

    #[tokio::test]
    async fn reversal_of_unknown_product_creates_an_empty_level() {
        let (ledger, _) = ledger();
        let p = ProductId::new();

        ledger.reverse_purchase(p, 5).await.unwrap();

        let level = ledger.get_by_product(p).await.unwrap().unwrap();
        assert_eq!((level.purchase_quantity, level.in_stock_quantity), (0, 0));
    }

    #[tokio::test]
    async fn set_reorder_on_unknown_product_is_not_found() {
        let (ledger, repo) = ledger();
        assert_eq!(
            ledger.set_reorder_level(ProductId::new(), 3).await,
            Err(LedgerError::NotFound)
        );
        assert!(repo.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn reverse_purchase_reports_storage_failure() {
        let (ledger, repo) = ledger();
        let p = ProductId::new();
        ledger.record_purchase(p, 10).await.unwrap();

        repo.fail_writes.store(true, Ordering::SeqCst);
        let result = ledger.reverse_purchase(p, 4).await;
        repo.fail_writes.store(false, Ordering::SeqCst);

        assert!(matches!(result, Err(LedgerError::Storage(_))));

        let level = ledger.get_by_product(p).await.unwrap().unwrap();
        assert_eq!(level.purchase_quantity, 10);
    }

    #[tokio::test]
    async fn concurrent_purchases_are_not_lost() {
        let (ledger, _) = ledger();
        let p = ProductId::new();

        let tasks: Vec<_> = (0..20)
            .map(|_| {
                let ledger = ledger.clone();
                tokio::spawn(async move { ledger.record_purchase(p, 1).await })
            })
            .collect();
        for t in tasks {
            t.await.unwrap().unwrap();
        }

        let level = ledger.get_by_product(p).await.unwrap().unwrap();
        assert_eq!(level.purchase_quantity, 20);
    }
}
