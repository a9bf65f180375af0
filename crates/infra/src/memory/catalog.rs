use std::cmp::Reverse;
use std::collections::HashMap;

use shelfwise_catalog::{CatalogRecord, CatalogRepository, Product, ProductCounts};
use shelfwise_core::{CategoryId, StoreResult};

use super::InMemoryTable;

/// One catalog table; works for every [`CatalogRecord`].
pub struct InMemoryCatalogStore<E: CatalogRecord> {
    table: InMemoryTable<E>,
}

impl<E: CatalogRecord> Default for InMemoryCatalogStore<E> {
    fn default() -> Self {
        Self {
            table: InMemoryTable::default(),
        }
    }
}

impl<E: CatalogRecord> InMemoryCatalogStore<E> {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl<E: CatalogRecord> CatalogRepository<E> for InMemoryCatalogStore<E> {
    async fn insert(&self, record: &E) -> StoreResult<()> {
        self.table.upsert(record.clone())
    }

    async fn get(&self, id: E::Id) -> StoreResult<Option<E>> {
        self.table.get(&id)
    }

    async fn list(&self) -> StoreResult<Vec<E>> {
        let mut rows = self.table.filter(|_| true)?;
        rows.sort_by_key(|r| Reverse(r.created_at()));
        Ok(rows)
    }

    async fn update(&self, record: &E) -> StoreResult<()> {
        self.table.upsert(record.clone())
    }

    async fn delete(&self, id: E::Id) -> StoreResult<bool> {
        self.table.remove(&id)
    }
}

#[async_trait::async_trait]
impl ProductCounts for InMemoryCatalogStore<Product> {
    async fn count_by_category(&self) -> StoreResult<HashMap<CategoryId, i64>> {
        self.table.read(|rows| {
            let mut counts = HashMap::new();
            for product in rows.values() {
                *counts.entry(product.category_id).or_insert(0) += 1;
            }
            counts
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use shelfwise_catalog::{Unit, UnitDraft};

    use super::*;

    fn unit(name: &str, minutes_ago: i64) -> Unit {
        Unit::from_draft(
            UnitDraft {
                name: name.into(),
                short_name: name[..1].into(),
                created_at: Some(Utc::now() - Duration::minutes(minutes_ago)),
                ..UnitDraft::default()
            },
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn lists_newest_first() {
        let store = InMemoryCatalogStore::<Unit>::new();
        store.insert(&unit("Gram", 10)).await.unwrap();
        store.insert(&unit("Litre", 0)).await.unwrap();
        store.insert(&unit("Box", 5)).await.unwrap();

        let names: Vec<_> = store.list().await.unwrap().into_iter().map(|u| u.name).collect();
        assert_eq!(names, ["Litre", "Box", "Gram"]);
    }

    #[tokio::test]
    async fn delete_reports_whether_a_row_matched() {
        let store = InMemoryCatalogStore::<Unit>::new();
        let gram = unit("Gram", 0);
        store.insert(&gram).await.unwrap();

        assert!(store.delete(gram.id).await.unwrap());
        assert!(!store.delete(gram.id).await.unwrap());
        assert!(store.get(gram.id).await.unwrap().is_none());
    }
}
