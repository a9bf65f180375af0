//! Catalog CRUD with validation.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use thiserror::Error;

use shelfwise_core::StoreError;

use crate::category::Category;
use crate::product::Product;
use crate::record::CatalogRecord;
use crate::repository::{CatalogRepository, ProductCounts};
use crate::sub_category::SubCategory;
use crate::unit::Unit;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Validation failed.")]
    ValidationFailed(Vec<String>),

    #[error("Not found")]
    NotFound,

    #[error("catalog storage failure: {0}")]
    Storage(#[from] StoreError),
}

/// Create, read, update and delete for one kind of catalog record.
pub struct RecordService<E: CatalogRecord> {
    repo: Arc<dyn CatalogRepository<E>>,
}

impl<E: CatalogRecord> Clone for RecordService<E> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
        }
    }
}

impl<E: CatalogRecord> RecordService<E> {
    pub fn new(repo: Arc<dyn CatalogRepository<E>>) -> Self {
        Self { repo }
    }

    pub async fn create(&self, draft: E::Draft) -> Result<E, CatalogError> {
        E::validate(&draft).map_err(CatalogError::ValidationFailed)?;

        let record = E::from_draft(draft, Utc::now());
        self.repo.insert(&record).await?;

        tracing::info!(kind = E::KIND, id = ?record.id(), "catalog record created");
        Ok(record)
    }

    pub async fn get(&self, id: E::Id) -> Result<E, CatalogError> {
        self.repo.get(id).await?.ok_or(CatalogError::NotFound)
    }

    pub async fn list(&self) -> Result<Vec<E>, CatalogError> {
        Ok(self.repo.list().await?)
    }

    pub async fn update(&self, id: E::Id, draft: E::Draft) -> Result<E, CatalogError> {
        E::validate(&draft).map_err(CatalogError::ValidationFailed)?;

        let mut existing = self.repo.get(id).await?.ok_or(CatalogError::NotFound)?;
        E::apply(draft, &mut existing);
        self.repo.update(&existing).await?;
        Ok(existing)
    }

    pub async fn delete(&self, id: E::Id) -> Result<(), CatalogError> {
        if !self.repo.delete(id).await? {
            return Err(CatalogError::NotFound);
        }
        tracing::info!(kind = E::KIND, ?id, "catalog record deleted");
        Ok(())
    }
}

/// A category together with the number of products filed under it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySummary {
    pub category: Category,
    pub product_count: i64,
}

#[derive(Clone)]
pub struct CatalogService {
    pub categories: RecordService<Category>,
    pub sub_categories: RecordService<SubCategory>,
    pub units: RecordService<Unit>,
    pub products: RecordService<Product>,
    product_counts: Arc<dyn ProductCounts>,
}

impl CatalogService {
    pub fn new(
        categories: Arc<dyn CatalogRepository<Category>>,
        sub_categories: Arc<dyn CatalogRepository<SubCategory>>,
        units: Arc<dyn CatalogRepository<Unit>>,
        products: Arc<dyn CatalogRepository<Product>>,
        product_counts: Arc<dyn ProductCounts>,
    ) -> Self {
        Self {
            categories: RecordService::new(categories),
            sub_categories: RecordService::new(sub_categories),
            units: RecordService::new(units),
            products: RecordService::new(products),
            product_counts,
        }
    }

    /// Categories, newest first, each with its product count.
    pub async fn list_categories(&self) -> Result<Vec<CategorySummary>, CatalogError> {
        let categories = self.categories.list().await?;
        let counts = self.product_counts.count_by_category().await?;

        Ok(categories
            .into_iter()
            .map(|category| CategorySummary {
                product_count: counts.get(&category.id).copied().unwrap_or(0),
                category,
            })
            .collect())
    }
}
