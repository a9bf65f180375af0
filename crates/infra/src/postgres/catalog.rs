use std::collections::HashMap;
use std::marker::PhantomData;

use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::Query;
use sqlx::{PgPool, Postgres, Row};
use uuid::Uuid;

use shelfwise_catalog::{CatalogRecord, CatalogRepository, Category, Product, ProductCounts, SubCategory, Unit};
use shelfwise_core::{CategoryId, ProductId, StoreResult, SubCategoryId, UnitId};

use super::map_sqlx_error;

pub type PgQuery<'q> = Query<'q, Postgres, PgArguments>;

/// Table layout of a catalog record.
///
/// `COLUMNS` starts with `id`; `bind_columns` binds values in the same order.
pub trait PgCatalogRecord: CatalogRecord {
    const TABLE: &'static str;
    const COLUMNS: &'static [&'static str];

    fn key(id: &Self::Id) -> Uuid;

    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error>;

    fn bind_columns<'q>(&'q self, query: PgQuery<'q>) -> PgQuery<'q>;
}

impl PgCatalogRecord for Category {
    const TABLE: &'static str = "categories";
    const COLUMNS: &'static [&'static str] = &["id", "name", "slug", "is_active", "image_url", "created_at"];

    fn key(id: &CategoryId) -> Uuid {
        *id.as_uuid()
    }

    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: CategoryId::from_uuid(row.try_get("id")?),
            name: row.try_get("name")?,
            slug: row.try_get("slug")?,
            is_active: row.try_get("is_active")?,
            image_url: row.try_get("image_url")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn bind_columns<'q>(&'q self, query: PgQuery<'q>) -> PgQuery<'q> {
        query
            .bind(self.id.as_uuid())
            .bind(&self.name)
            .bind(&self.slug)
            .bind(self.is_active)
            .bind(&self.image_url)
            .bind(self.created_at)
    }
}

impl PgCatalogRecord for SubCategory {
    const TABLE: &'static str = "sub_categories";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "name",
        "slug",
        "category_id",
        "description",
        "code",
        "is_active",
        "created_at",
    ];

    fn key(id: &SubCategoryId) -> Uuid {
        *id.as_uuid()
    }

    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: SubCategoryId::from_uuid(row.try_get("id")?),
            name: row.try_get("name")?,
            slug: row.try_get("slug")?,
            category_id: CategoryId::from_uuid(row.try_get("category_id")?),
            description: row.try_get("description")?,
            code: row.try_get("code")?,
            is_active: row.try_get("is_active")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn bind_columns<'q>(&'q self, query: PgQuery<'q>) -> PgQuery<'q> {
        query
            .bind(self.id.as_uuid())
            .bind(&self.name)
            .bind(&self.slug)
            .bind(self.category_id.as_uuid())
            .bind(&self.description)
            .bind(&self.code)
            .bind(self.is_active)
            .bind(self.created_at)
    }
}

impl PgCatalogRecord for Unit {
    const TABLE: &'static str = "units";
    const COLUMNS: &'static [&'static str] =
        &["id", "name", "short_name", "is_active", "no_of_products", "created_at"];

    fn key(id: &UnitId) -> Uuid {
        *id.as_uuid()
    }

    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: UnitId::from_uuid(row.try_get("id")?),
            name: row.try_get("name")?,
            short_name: row.try_get("short_name")?,
            is_active: row.try_get("is_active")?,
            no_of_products: row.try_get("no_of_products")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn bind_columns<'q>(&'q self, query: PgQuery<'q>) -> PgQuery<'q> {
        query
            .bind(self.id.as_uuid())
            .bind(&self.name)
            .bind(&self.short_name)
            .bind(self.is_active)
            .bind(self.no_of_products)
            .bind(self.created_at)
    }
}

impl PgCatalogRecord for Product {
    const TABLE: &'static str = "products";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "name",
        "sku",
        "category_id",
        "sub_category_id",
        "brand_id",
        "unit",
        "quantity",
        "price",
        "image_url",
        "created_by",
        "created_at",
        "manufactured_date",
        "expiry_date",
    ];

    fn key(id: &ProductId) -> Uuid {
        *id.as_uuid()
    }

    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: ProductId::from_uuid(row.try_get("id")?),
            name: row.try_get("name")?,
            sku: row.try_get("sku")?,
            category_id: CategoryId::from_uuid(row.try_get("category_id")?),
            sub_category_id: SubCategoryId::from_uuid(row.try_get("sub_category_id")?),
            brand_id: row.try_get("brand_id")?,
            unit: row.try_get("unit")?,
            quantity: row.try_get("quantity")?,
            price: row.try_get("price")?,
            image_url: row.try_get("image_url")?,
            created_by: row.try_get("created_by")?,
            created_at: row.try_get("created_at")?,
            manufactured_date: row.try_get("manufactured_date")?,
            expiry_date: row.try_get("expiry_date")?,
        })
    }

    fn bind_columns<'q>(&'q self, query: PgQuery<'q>) -> PgQuery<'q> {
        query
            .bind(self.id.as_uuid())
            .bind(&self.name)
            .bind(&self.sku)
            .bind(self.category_id.as_uuid())
            .bind(self.sub_category_id.as_uuid())
            .bind(self.brand_id)
            .bind(&self.unit)
            .bind(self.quantity)
            .bind(self.price)
            .bind(&self.image_url)
            .bind(&self.created_by)
            .bind(self.created_at)
            .bind(self.manufactured_date)
            .bind(self.expiry_date)
    }
}

fn insert_sql(table: &str, columns: &[&str]) -> String {
    let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("${i}")).collect();
    format!(
        "INSERT INTO {table} ({}) VALUES ({})",
        columns.join(", "),
        placeholders.join(", ")
    )
}

/// `created_at` is rewritten with its stored value, so it never changes.
fn update_sql(table: &str, columns: &[&str]) -> String {
    let assignments: Vec<String> = columns
        .iter()
        .enumerate()
        .skip(1)
        .map(|(i, column)| format!("{column} = ${}", i + 1))
        .collect();
    format!("UPDATE {table} SET {} WHERE id = $1", assignments.join(", "))
}

/// One catalog table in PostgreSQL.
pub struct PostgresCatalogStore<E> {
    pool: PgPool,
    _record: PhantomData<fn() -> E>,
}

impl<E> Clone for PostgresCatalogStore<E> {
    fn clone(&self) -> Self {
        Self::new(self.pool.clone())
    }
}

impl<E> PostgresCatalogStore<E> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _record: PhantomData,
        }
    }
}

#[async_trait::async_trait]
impl<E: PgCatalogRecord> CatalogRepository<E> for PostgresCatalogStore<E> {
    async fn insert(&self, record: &E) -> StoreResult<()> {
        let sql = insert_sql(E::TABLE, E::COLUMNS);
        record
            .bind_columns(sqlx::query(&sql))
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(&format!("insert_{}", E::TABLE), e))?;
        Ok(())
    }

    async fn get(&self, id: E::Id) -> StoreResult<Option<E>> {
        let sql = format!("SELECT {} FROM {} WHERE id = $1", E::COLUMNS.join(", "), E::TABLE);
        let row = sqlx::query(&sql)
            .bind(E::key(&id))
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(&format!("get_{}", E::TABLE), e))?;

        row.as_ref()
            .map(E::from_row)
            .transpose()
            .map_err(|e| map_sqlx_error(&format!("decode_{}", E::TABLE), e))
    }

    async fn list(&self) -> StoreResult<Vec<E>> {
        let sql = format!(
            "SELECT {} FROM {} ORDER BY created_at DESC",
            E::COLUMNS.join(", "),
            E::TABLE
        );
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(&format!("list_{}", E::TABLE), e))?;

        rows.iter()
            .map(E::from_row)
            .collect::<Result<_, _>>()
            .map_err(|e| map_sqlx_error(&format!("decode_{}", E::TABLE), e))
    }

    async fn update(&self, record: &E) -> StoreResult<()> {
        let sql = update_sql(E::TABLE, E::COLUMNS);
        record
            .bind_columns(sqlx::query(&sql))
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(&format!("update_{}", E::TABLE), e))?;
        Ok(())
    }

    async fn delete(&self, id: E::Id) -> StoreResult<bool> {
        let sql = format!("DELETE FROM {} WHERE id = $1", E::TABLE);
        let result = sqlx::query(&sql)
            .bind(E::key(&id))
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(&format!("delete_{}", E::TABLE), e))?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait::async_trait]
impl ProductCounts for PostgresCatalogStore<Product> {
    async fn count_by_category(&self) -> StoreResult<HashMap<CategoryId, i64>> {
        let rows = sqlx::query("SELECT category_id, COUNT(*) AS product_count FROM products GROUP BY category_id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("count_products_by_category", e))?;

        rows.iter()
            .map(|row| -> Result<(CategoryId, i64), sqlx::Error> {
                let category: Uuid = row.try_get("category_id")?;
                let count: i64 = row.try_get("product_count")?;
                Ok((CategoryId::from_uuid(category), count))
            })
            .collect::<Result<_, _>>()
            .map_err(|e| map_sqlx_error("decode_product_count", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_binds_every_column_in_order() {
        assert_eq!(
            insert_sql("units", Unit::COLUMNS),
            "INSERT INTO units (id, name, short_name, is_active, no_of_products, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6)"
        );
    }

    #[test]
    fn update_keys_on_id_and_keeps_placeholder_positions() {
        assert_eq!(
            update_sql("categories", Category::COLUMNS),
            "UPDATE categories SET name = $2, slug = $3, is_active = $4, image_url = $5, created_at = $6 \
             WHERE id = $1"
        );
    }
}
