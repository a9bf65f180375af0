use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::instrument;

use shelfwise_core::{CategoryId, ProductId, ProductLevelId, PurchaseId, StoreResult, SubCategoryId};
use shelfwise_inventory::{LevelMutation, ProductLevel, ProductLevelRepository};
use shelfwise_purchasing::{Purchase, PurchaseRepository};

use super::map_sqlx_error;

const LEVEL_COLUMNS: &str = "id, product_id, purchase_quantity, in_stock_quantity, reorder_level, created_at";
const PURCHASE_COLUMNS: &str = "id, sku, category_id, sub_category_id, product_id, unit_cost, quantity, \
     total_amount, created_by, created_at, manufactured_date, expiry_date";

fn level_from_row(row: &PgRow) -> Result<ProductLevel, sqlx::Error> {
    Ok(ProductLevel {
        id: ProductLevelId::from_uuid(row.try_get("id")?),
        product_id: ProductId::from_uuid(row.try_get("product_id")?),
        purchase_quantity: row.try_get("purchase_quantity")?,
        in_stock_quantity: row.try_get("in_stock_quantity")?,
        reorder_level: row.try_get("reorder_level")?,
        created_at: row.try_get("created_at")?,
    })
}

fn purchase_from_row(row: &PgRow) -> Result<Purchase, sqlx::Error> {
    Ok(Purchase {
        id: PurchaseId::from_uuid(row.try_get("id")?),
        sku: row.try_get("sku")?,
        category_id: CategoryId::from_uuid(row.try_get("category_id")?),
        sub_category_id: SubCategoryId::from_uuid(row.try_get("sub_category_id")?),
        product_id: ProductId::from_uuid(row.try_get("product_id")?),
        unit_cost: row.try_get("unit_cost")?,
        quantity: row.try_get("quantity")?,
        total_amount: row.try_get("total_amount")?,
        created_by: row.try_get("created_by")?,
        created_at: row.try_get("created_at")?,
        manufactured_date: row.try_get("manufactured_date")?,
        expiry_date: row.try_get("expiry_date")?,
    })
}

/// Product levels with per-product row locking.
///
/// `modify` takes a transaction-scoped advisory lock on the product id before
/// `SELECT ... FOR UPDATE`, so first-time creation is serialized as well.
#[derive(Debug, Clone)]
pub struct PostgresProductLevelStore {
    pool: PgPool,
}

impl PostgresProductLevelStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl ProductLevelRepository for PostgresProductLevelStore {
    async fn get_by_product(&self, product_id: ProductId) -> StoreResult<Option<ProductLevel>> {
        let row = sqlx::query(&format!("SELECT {LEVEL_COLUMNS} FROM product_levels WHERE product_id = $1"))
            .bind(product_id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("get_product_level", e))?;

        row.as_ref()
            .map(level_from_row)
            .transpose()
            .map_err(|e| map_sqlx_error("decode_product_level", e))
    }

    async fn list(&self) -> StoreResult<Vec<ProductLevel>> {
        let rows = sqlx::query(&format!("SELECT {LEVEL_COLUMNS} FROM product_levels ORDER BY created_at"))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("list_product_levels", e))?;

        rows.iter()
            .map(level_from_row)
            .collect::<Result<_, _>>()
            .map_err(|e| map_sqlx_error("decode_product_level", e))
    }

    #[instrument(skip(self, mutation), fields(product_id = %product_id), err)]
    async fn modify(&self, product_id: ProductId, mutation: LevelMutation) -> StoreResult<Option<ProductLevel>> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin_transaction", e))?;

        sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1::text, 0))")
            .bind(product_id.as_uuid())
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("lock_product_level", e))?;

        let current = sqlx::query(&format!(
            "SELECT {LEVEL_COLUMNS} FROM product_levels WHERE product_id = $1 FOR UPDATE"
        ))
        .bind(product_id.as_uuid())
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("select_product_level", e))?
        .as_ref()
        .map(level_from_row)
        .transpose()
        .map_err(|e| map_sqlx_error("decode_product_level", e))?;

        let Some(next) = mutation(current) else {
            tx.rollback().await.map_err(|e| map_sqlx_error("rollback", e))?;
            return Ok(None);
        };

        sqlx::query(
            r#"
            INSERT INTO product_levels (id, product_id, purchase_quantity, in_stock_quantity, reorder_level, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (product_id) DO UPDATE SET
                purchase_quantity = EXCLUDED.purchase_quantity,
                in_stock_quantity = EXCLUDED.in_stock_quantity,
                reorder_level = EXCLUDED.reorder_level
            "#,
        )
        .bind(next.id.as_uuid())
        .bind(next.product_id.as_uuid())
        .bind(next.purchase_quantity)
        .bind(next.in_stock_quantity)
        .bind(next.reorder_level)
        .bind(next.created_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("upsert_product_level", e))?;

        tx.commit().await.map_err(|e| map_sqlx_error("commit", e))?;
        Ok(Some(next))
    }
}

#[derive(Debug, Clone)]
pub struct PostgresPurchaseStore {
    pool: PgPool,
}

impl PostgresPurchaseStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl PurchaseRepository for PostgresPurchaseStore {
    async fn insert(&self, purchase: &Purchase) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO purchases (
                id, sku, category_id, sub_category_id, product_id, unit_cost, quantity,
                total_amount, created_by, created_at, manufactured_date, expiry_date
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(purchase.id.as_uuid())
        .bind(&purchase.sku)
        .bind(purchase.category_id.as_uuid())
        .bind(purchase.sub_category_id.as_uuid())
        .bind(purchase.product_id.as_uuid())
        .bind(purchase.unit_cost)
        .bind(purchase.quantity)
        .bind(purchase.total_amount)
        .bind(&purchase.created_by)
        .bind(purchase.created_at)
        .bind(purchase.manufactured_date)
        .bind(purchase.expiry_date)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_purchase", e))?;
        Ok(())
    }

    async fn get(&self, id: PurchaseId) -> StoreResult<Option<Purchase>> {
        let row = sqlx::query(&format!("SELECT {PURCHASE_COLUMNS} FROM purchases WHERE id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("get_purchase", e))?;

        row.as_ref()
            .map(purchase_from_row)
            .transpose()
            .map_err(|e| map_sqlx_error("decode_purchase", e))
    }

    async fn list(&self) -> StoreResult<Vec<Purchase>> {
        let rows = sqlx::query(&format!("SELECT {PURCHASE_COLUMNS} FROM purchases ORDER BY created_at"))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("list_purchases", e))?;

        rows.iter()
            .map(purchase_from_row)
            .collect::<Result<_, _>>()
            .map_err(|e| map_sqlx_error("decode_purchase", e))
    }

    async fn update(&self, purchase: &Purchase) -> StoreResult<()> {
        sqlx::query(
            r#"
            UPDATE purchases SET
                sku = $2, category_id = $3, sub_category_id = $4, product_id = $5,
                unit_cost = $6, quantity = $7, total_amount = $8, created_by = $9,
                manufactured_date = $10, expiry_date = $11
            WHERE id = $1
            "#,
        )
        .bind(purchase.id.as_uuid())
        .bind(&purchase.sku)
        .bind(purchase.category_id.as_uuid())
        .bind(purchase.sub_category_id.as_uuid())
        .bind(purchase.product_id.as_uuid())
        .bind(purchase.unit_cost)
        .bind(purchase.quantity)
        .bind(purchase.total_amount)
        .bind(&purchase.created_by)
        .bind(purchase.manufactured_date)
        .bind(purchase.expiry_date)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("update_purchase", e))?;
        Ok(())
    }

    async fn delete(&self, id: PurchaseId) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM purchases WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_purchase", e))?;
        Ok(result.rows_affected() > 0)
    }
}
