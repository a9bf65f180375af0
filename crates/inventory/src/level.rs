use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shelfwise_core::{Entity, ProductId, ProductLevelId};

/// Per-product stock aggregate.
///
/// Quantities never go negative; every mutation clamps at zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductLevel {
    pub id: ProductLevelId,
    pub product_id: ProductId,
    pub purchase_quantity: i32,
    pub in_stock_quantity: i32,
    pub reorder_level: i32,
    pub created_at: DateTime<Utc>,
}

impl ProductLevel {
    fn create(product_id: ProductId, purchase: i32, in_stock: i32, now: DateTime<Utc>) -> Self {
        Self {
            id: ProductLevelId::new(),
            product_id,
            purchase_quantity: purchase.max(0),
            in_stock_quantity: in_stock.max(0),
            reorder_level: 0,
            created_at: now,
        }
    }

    /// At or below the reorder threshold.
    pub fn needs_reorder(&self) -> bool {
        self.in_stock_quantity <= self.reorder_level
    }
}

impl Entity for ProductLevel {
    type Id = ProductLevelId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// How a zero in-stock quantity is treated after a mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StockPolicy {
    /// A zero in-stock quantity is refilled from the purchased quantity.
    ///
    /// Long-standing behavior that existing data depends on: an item that
    /// sold out reads as fully stocked again after its next mutation.
    #[default]
    BackfillZeroInStock,
    /// In-stock quantity is reported exactly as adjusted.
    Strict,
}

/// Ledger mutation applied to a product's level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelCommand {
    RecordPurchase { quantity: i32 },
    AdjustInStock { delta: i32 },
    SetReorderLevel { level: i32 },
    AdjustPurchaseQuantity { delta: i32 },
}

/// Deterministically apply `command` to the current level (if any).
///
/// Returns the level to persist, or `None` when nothing should be written:
/// `SetReorderLevel` on a missing product, or a non-positive purchase
/// adjustment on a missing product.
pub fn apply(
    current: Option<ProductLevel>,
    product_id: ProductId,
    command: LevelCommand,
    policy: StockPolicy,
    now: DateTime<Utc>,
) -> Option<ProductLevel> {
    let mut level = match (current, command) {
        (None, LevelCommand::RecordPurchase { quantity }) => {
            ProductLevel::create(product_id, quantity, quantity, now)
        }
        (None, LevelCommand::AdjustInStock { delta }) => ProductLevel::create(product_id, 0, delta, now),
        (None, LevelCommand::SetReorderLevel { .. }) => return None,
        (None, LevelCommand::AdjustPurchaseQuantity { delta }) => {
            if delta <= 0 {
                return None;
            }
            ProductLevel::create(product_id, delta, delta, now)
        }
        (Some(mut level), command) => {
            match command {
                LevelCommand::RecordPurchase { quantity } => {
                    level.purchase_quantity = clamped(level.purchase_quantity, quantity);
                }
                LevelCommand::AdjustInStock { delta } => {
                    level.in_stock_quantity = clamped(level.in_stock_quantity, delta);
                }
                LevelCommand::SetReorderLevel { level: reorder } => {
                    level.reorder_level = reorder;
                }
                LevelCommand::AdjustPurchaseQuantity { delta } => {
                    level.purchase_quantity = clamped(level.purchase_quantity, delta);
                }
            }
            level
        }
    };

    if policy == StockPolicy::BackfillZeroInStock && level.in_stock_quantity == 0 {
        level.in_stock_quantity = level.purchase_quantity;
    }
    Some(level)
}

fn clamped(current: i32, delta: i32) -> i32 {
    current.saturating_add(delta).max(0)
}
