//! PostgreSQL stores.
//!
//! ## Error Mapping
//!
//! | SQLx error | PostgreSQL code | `StoreError` |
//! |------------|-----------------|--------------|
//! | Database (unique violation) | `23505` | `Conflict` |
//! | Database (other) | any | `Backend` |
//! | PoolClosed / PoolTimedOut / Io / other | n/a | `Backend` |

mod auth;
mod catalog;
mod stock;

use shelfwise_core::StoreError;

pub use auth::{PostgresOtpStore, PostgresRefreshTokenStore, PostgresUserStore};
pub use catalog::{PgCatalogRecord, PostgresCatalogStore};
pub use stock::{PostgresProductLevelStore, PostgresPurchaseStore};

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error in {}: {}", operation, db_err.message());
            match db_err.code().as_deref() {
                Some("23505") => StoreError::Conflict(msg),
                _ => StoreError::Backend(msg),
            }
        }
        sqlx::Error::PoolClosed => StoreError::Backend(format!("connection pool closed in {}", operation)),
        sqlx::Error::PoolTimedOut => StoreError::Backend(format!("connection pool timed out in {}", operation)),
        other => StoreError::Backend(format!("{} failed: {}", operation, other)),
    }
}
