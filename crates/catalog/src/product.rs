use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shelfwise_core::{CategoryId, Entity, ProductId, SubCategoryId};

use crate::record::{CatalogRecord, finish, require};

/// A sellable product. Stock quantities live in the Stock Ledger, keyed by
/// the same [`ProductId`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub sku: String,
    pub category_id: CategoryId,
    pub sub_category_id: SubCategoryId,
    /// Brands are not modelled; the id is stored as given.
    pub brand_id: Uuid,
    /// Unit short name, e.g. "kg".
    pub unit: String,
    pub quantity: i32,
    pub price: f64,
    pub image_url: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub manufactured_date: Option<DateTime<Utc>>,
    pub expiry_date: Option<DateTime<Utc>>,
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProductDraft {
    pub id: Option<ProductId>,
    pub name: String,
    pub sku: String,
    pub category_id: CategoryId,
    pub sub_category_id: SubCategoryId,
    pub brand_id: Uuid,
    pub unit: String,
    pub quantity: i32,
    pub price: f64,
    pub image_url: String,
    pub created_by: String,
    pub created_at: Option<DateTime<Utc>>,
    pub manufactured_date: Option<DateTime<Utc>>,
    pub expiry_date: Option<DateTime<Utc>>,
}

impl CatalogRecord for Product {
    type Draft = ProductDraft;

    const KIND: &'static str = "product";

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn validate(draft: &ProductDraft) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        require(&mut errors, &draft.name, "Name");
        finish(errors)
    }

    fn from_draft(draft: ProductDraft, now: DateTime<Utc>) -> Self {
        Self {
            id: draft.id.filter(|id| !id.is_nil()).unwrap_or_default(),
            name: draft.name,
            sku: draft.sku,
            category_id: draft.category_id,
            sub_category_id: draft.sub_category_id,
            brand_id: draft.brand_id,
            unit: draft.unit,
            quantity: draft.quantity,
            price: draft.price,
            image_url: draft.image_url,
            created_by: draft.created_by,
            created_at: draft.created_at.unwrap_or(now),
            manufactured_date: draft.manufactured_date,
            expiry_date: draft.expiry_date,
        }
    }

    fn apply(draft: ProductDraft, existing: &mut Self) {
        existing.name = draft.name;
        existing.sku = draft.sku;
        existing.category_id = draft.category_id;
        existing.sub_category_id = draft.sub_category_id;
        existing.brand_id = draft.brand_id;
        existing.unit = draft.unit;
        existing.quantity = draft.quantity;
        existing.price = draft.price;
        existing.image_url = draft.image_url;
        existing.created_by = draft.created_by;
        existing.manufactured_date = draft.manufactured_date;
        existing.expiry_date = draft.expiry_date;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_name_is_required() {
        assert_eq!(
            Product::validate(&ProductDraft::default()),
            Err(vec!["Name is required.".to_string()])
        );
        let draft = ProductDraft {
            name: "Orange juice".into(),
            ..ProductDraft::default()
        };
        assert!(Product::validate(&draft).is_ok());
    }

    #[test]
    fn from_draft_honors_supplied_id_and_timestamp() {
        let id = ProductId::new();
        let at = Utc::now() - chrono::Duration::hours(1);
        let product = Product::from_draft(
            ProductDraft {
                id: Some(id),
                name: "Orange juice".into(),
                created_at: Some(at),
                ..ProductDraft::default()
            },
            Utc::now(),
        );
        assert_eq!((product.id, product.created_at), (id, at));
    }
}
