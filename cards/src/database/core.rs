use super::types::Database;
use anyhow::Result;
use pd_find::CatalogHandle;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::sync::Arc;

fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

impl Database {
    /// Connects, creating the file if needed, runs migrations and loads the catalog.
    pub async fn new(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true)
            .with_regexp();

        // Every connection to an in-memory database is a separate database, so keep exactly one.
        let pool_options = if is_in_memory(database_url) {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new()
        };
        let pool = pool_options.connect_with(options).await?;
        sqlx::migrate!().run(&pool).await?;

        let db = Self {
            pool,
            catalog: Arc::new(CatalogHandle::default()),
        };
        db.refresh_catalog().await?;
        tracing::info!("Card database ready at {}", database_url);
        Ok(db)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
