//! Purchase records and their effect on the Stock Ledger.

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;

use shelfwise_core::{PurchaseId, StoreError};
use shelfwise_inventory::{LedgerError, ProductLevel, StockLedger};

use crate::purchase::{Purchase, PurchaseDraft};
use crate::repository::PurchaseRepository;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PurchaseError {
    #[error("Validation failed.")]
    ValidationFailed(Vec<String>),

    #[error("Not found")]
    NotFound,

    #[error("purchase storage failure: {0}")]
    Storage(#[from] StoreError),
}

/// Outcome of the best-effort ledger step that follows a purchase write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StockSync {
    /// The ledger was updated; carries the level after the change when known.
    Applied(Option<ProductLevel>),
    /// The purchase was written but the ledger update failed.
    Degraded(LedgerError),
}

impl StockSync {
    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded(_))
    }
}

/// A successful purchase write together with its ledger outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct Recorded<T> {
    pub value: T,
    pub stock: StockSync,
}

#[derive(Clone)]
pub struct PurchaseService {
    repo: Arc<dyn PurchaseRepository>,
    ledger: StockLedger,
}

impl PurchaseService {
    pub fn new(repo: Arc<dyn PurchaseRepository>, ledger: StockLedger) -> Self {
        Self { repo, ledger }
    }

    /// Persist a purchase, then add its quantity to the product's level.
    pub async fn create(&self, draft: PurchaseDraft) -> Result<Recorded<Purchase>, PurchaseError> {
        draft.validate().map_err(PurchaseError::ValidationFailed)?;

        let purchase = draft.into_purchase(Utc::now());
        self.repo.insert(&purchase).await?;

        let stock = match self
            .ledger
            .record_purchase(purchase.product_id, purchase.quantity)
            .await
        {
            Ok(level) => StockSync::Applied(Some(level)),
            Err(e) => {
                tracing::warn!(
                    purchase_id = %purchase.id,
                    product_id = %purchase.product_id,
                    error = %e,
                    "purchase recorded without stock update"
                );
                StockSync::Degraded(e)
            }
        };

        tracing::info!(purchase_id = %purchase.id, quantity = purchase.quantity, "purchase created");
        Ok(Recorded { value: purchase, stock })
    }

    pub async fn get(&self, id: PurchaseId) -> Result<Purchase, PurchaseError> {
        self.repo.get(id).await?.ok_or(PurchaseError::NotFound)
    }

    pub async fn list(&self) -> Result<Vec<Purchase>, PurchaseError> {
        Ok(self.repo.list().await?)
    }

    /// Overwrite the editable fields. Stock levels are left as they are.
    pub async fn update(&self, id: PurchaseId, draft: PurchaseDraft) -> Result<Purchase, PurchaseError> {
        draft.validate().map_err(PurchaseError::ValidationFailed)?;

        let mut existing = self.repo.get(id).await?.ok_or(PurchaseError::NotFound)?;
        draft.apply_to(&mut existing);
        self.repo.update(&existing).await?;
        Ok(existing)
    }

    /// Reverse the purchase on the ledger, then delete it.
    pub async fn delete(&self, id: PurchaseId) -> Result<Recorded<()>, PurchaseError> {
        let existing = self.repo.get(id).await?.ok_or(PurchaseError::NotFound)?;

        let stock = match self
            .ledger
            .reverse_purchase(existing.product_id, existing.quantity)
            .await
        {
            Ok(level) => StockSync::Applied(level),
            Err(e) => {
                tracing::warn!(
                    purchase_id = %id,
                    product_id = %existing.product_id,
                    error = %e,
                    "purchase deleted without full stock reversal"
                );
                StockSync::Degraded(e)
            }
        };
        self.repo.delete(id).await?;

        tracing::info!(purchase_id = %id, "purchase deleted");
        Ok(Recorded { value: (), stock })
    }
}
