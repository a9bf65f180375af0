use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shelfwise_core::{CategoryId, Entity, ProductId, PurchaseId, SubCategoryId};

pub const MAX_SKU_LEN: usize = 100;

/// A recorded purchase of stock.
///
/// Catalog ids are stored as given; they are not checked against the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Purchase {
    pub id: PurchaseId,
    pub sku: String,
    pub category_id: CategoryId,
    pub sub_category_id: SubCategoryId,
    pub product_id: ProductId,
    pub unit_cost: f64,
    pub quantity: i32,
    pub total_amount: f64,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub manufactured_date: Option<DateTime<Utc>>,
    pub expiry_date: Option<DateTime<Utc>>,
}

impl Entity for Purchase {
    type Id = PurchaseId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Caller-supplied purchase fields, used for both create and update.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PurchaseDraft {
    /// Honored on create when present and non-nil.
    pub id: Option<PurchaseId>,
    pub sku: String,
    pub category_id: CategoryId,
    pub sub_category_id: SubCategoryId,
    pub product_id: ProductId,
    pub unit_cost: f64,
    pub quantity: i32,
    pub total_amount: f64,
    pub created_by: String,
    /// Honored on create when present.
    pub created_at: Option<DateTime<Utc>>,
    pub manufactured_date: Option<DateTime<Utc>>,
    pub expiry_date: Option<DateTime<Utc>>,
}

impl PurchaseDraft {
    /// Field-level validation; returns every failure at once.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.sku.trim().is_empty() {
            errors.push("SKU is required.".to_string());
        } else if self.sku.chars().count() > MAX_SKU_LEN {
            errors.push(format!("SKU must be at most {MAX_SKU_LEN} characters."));
        }
        if !(self.unit_cost.is_finite() && self.unit_cost >= 0.0) {
            errors.push("Unit Cost must be a positive number".to_string());
        }
        if self.quantity < 0 {
            errors.push("Quantity must be a positive number".to_string());
        }
        if !(self.total_amount.is_finite() && self.total_amount >= 0.0) {
            errors.push("Price must be a positive number".to_string());
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// Build a new purchase, filling id and timestamp when absent.
    pub fn into_purchase(self, now: DateTime<Utc>) -> Purchase {
        let id = self.id.filter(|id| !id.is_nil()).unwrap_or_default();
        Purchase {
            id,
            sku: self.sku,
            category_id: self.category_id,
            sub_category_id: self.sub_category_id,
            product_id: self.product_id,
            unit_cost: self.unit_cost,
            quantity: self.quantity,
            total_amount: self.total_amount,
            created_by: self.created_by,
            created_at: self.created_at.unwrap_or(now),
            manufactured_date: self.manufactured_date,
            expiry_date: self.expiry_date,
        }
    }

    /// Overwrite the editable fields of `existing`; id and `created_at` are kept.
    pub fn apply_to(self, existing: &mut Purchase) {
        existing.sku = self.sku;
        existing.category_id = self.category_id;
        existing.sub_category_id = self.sub_category_id;
        existing.product_id = self.product_id;
        existing.unit_cost = self.unit_cost;
        existing.quantity = self.quantity;
        existing.total_amount = self.total_amount;
        existing.created_by = self.created_by;
        existing.manufactured_date = self.manufactured_date;
        existing.expiry_date = self.expiry_date;
    }
}
