//! PostgreSQL pool and schema migrations.

use std::time::Duration;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

/// Connect and bring the schema up to date.
pub async fn connect(database_url: &str) -> Result<PgPool, sqlx::Error> {
    tracing::info!("connecting to postgres");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await?;

    run_migrations(&pool).await?;
    Ok(pool)
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    tracing::info!("running database migrations");
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}
