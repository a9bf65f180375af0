//! Store selection: PostgreSQL when a database URL is configured, otherwise in-memory.

use std::sync::Arc;

use sqlx::PgPool;

use shelfwise_auth::{PasswordResetOtpRepository, RefreshTokenRepository, UserRepository};
use shelfwise_catalog::{CatalogRepository, Category, Product, ProductCounts, SubCategory, Unit};
use shelfwise_inventory::ProductLevelRepository;
use shelfwise_purchasing::PurchaseRepository;

use crate::memory::{
    InMemoryCatalogStore, InMemoryOtpStore, InMemoryProductLevelStore, InMemoryPurchaseStore, InMemoryRefreshTokenStore,
    InMemoryUserStore,
};
use crate::postgres::{
    PostgresCatalogStore, PostgresOtpStore, PostgresProductLevelStore, PostgresPurchaseStore, PostgresRefreshTokenStore,
    PostgresUserStore,
};

/// Every repository the application needs, behind trait objects.
#[derive(Clone)]
pub struct Stores {
    pub users: Arc<dyn UserRepository>,
    pub otps: Arc<dyn PasswordResetOtpRepository>,
    pub refresh_tokens: Arc<dyn RefreshTokenRepository>,
    pub product_levels: Arc<dyn ProductLevelRepository>,
    pub purchases: Arc<dyn PurchaseRepository>,
    pub categories: Arc<dyn CatalogRepository<Category>>,
    pub sub_categories: Arc<dyn CatalogRepository<SubCategory>>,
    pub units: Arc<dyn CatalogRepository<Unit>>,
    pub products: Arc<dyn CatalogRepository<Product>>,
    /// Same table as `products`.
    pub product_counts: Arc<dyn ProductCounts>,
}

impl Stores {
    pub fn in_memory() -> Self {
        let products = Arc::new(InMemoryCatalogStore::<Product>::new());
        Self {
            users: Arc::new(InMemoryUserStore::new()),
            otps: Arc::new(InMemoryOtpStore::new()),
            refresh_tokens: Arc::new(InMemoryRefreshTokenStore::new()),
            product_levels: Arc::new(InMemoryProductLevelStore::new()),
            purchases: Arc::new(InMemoryPurchaseStore::new()),
            categories: Arc::new(InMemoryCatalogStore::<Category>::new()),
            sub_categories: Arc::new(InMemoryCatalogStore::<SubCategory>::new()),
            units: Arc::new(InMemoryCatalogStore::<Unit>::new()),
            products: products.clone(),
            product_counts: products,
        }
    }

    pub fn postgres(pool: PgPool) -> Self {
        let products = Arc::new(PostgresCatalogStore::<Product>::new(pool.clone()));
        Self {
            users: Arc::new(PostgresUserStore::new(pool.clone())),
            otps: Arc::new(PostgresOtpStore::new(pool.clone())),
            refresh_tokens: Arc::new(PostgresRefreshTokenStore::new(pool.clone())),
            product_levels: Arc::new(PostgresProductLevelStore::new(pool.clone())),
            purchases: Arc::new(PostgresPurchaseStore::new(pool.clone())),
            categories: Arc::new(PostgresCatalogStore::<Category>::new(pool.clone())),
            sub_categories: Arc::new(PostgresCatalogStore::<SubCategory>::new(pool.clone())),
            units: Arc::new(PostgresCatalogStore::<Unit>::new(pool)),
            products: products.clone(),
            product_counts: products,
        }
    }

    /// Connect to `database_url` when given, otherwise fall back to in-memory stores.
    pub async fn connect(database_url: Option<&str>) -> Result<Self, sqlx::Error> {
        match database_url {
            Some(url) => {
                let pool = crate::db::connect(url).await?;
                tracing::info!("using postgres stores");
                Ok(Self::postgres(pool))
            }
            None => {
                tracing::warn!("DATABASE_URL not set, using in-memory stores (data is not persisted)");
                Ok(Self::in_memory())
            }
        }
    }
}
