use super::types::{Database, SeasonRecord};
use anyhow::{bail, Result};
use chrono::NaiveDate;
use pd_find::catalog::{self, PENNY_DREADFUL};
use pd_find::colors::Color;
use pd_find::{Catalog, NamedId};
use sqlx::Row;
use std::sync::Arc;

impl Database {
    /// Snapshot the store's searches currently compile against.
    pub fn catalog(&self) -> Arc<Catalog> {
        self.catalog.load()
    }

    /// Reads colors, rarities, formats and seasons from the tables.
    pub async fn load_catalog(&self) -> Result<Catalog> {
        let mut catalog = Catalog::builtin();

        for row in sqlx::query("SELECT id, symbol FROM color")
            .fetch_all(&self.pool)
            .await?
        {
            let symbol: String = row.get("symbol");
            if let Some(color) = symbol.chars().next().and_then(Color::from_symbol) {
                catalog.color_ids[color.index()] = row.get("id");
            }
        }

        catalog.rarities = sqlx::query("SELECT id, name FROM rarity ORDER BY id")
            .fetch_all(&self.pool)
            .await?
            .iter()
            .map(|row| NamedId::new(row.get("id"), row.get::<String, _>("name")))
            .collect();

        catalog.formats = sqlx::query("SELECT id, name FROM format ORDER BY id")
            .fetch_all(&self.pool)
            .await?
            .iter()
            .map(|row| NamedId::new(row.get("id"), row.get::<String, _>("name")))
            .collect();

        catalog.seasons = sqlx::query("SELECT code FROM season ORDER BY number")
            .fetch_all(&self.pool)
            .await?
            .iter()
            .map(|row| row.get::<String, _>("code"))
            .collect();

        Ok(catalog)
    }

    /// Loads a fresh catalog and swaps it into this store and the process-wide handle.
    pub async fn refresh_catalog(&self) -> Result<Arc<Catalog>> {
        let fresh = self.load_catalog().await?;
        self.catalog.store(fresh.clone());
        catalog::global().store(fresh);
        Ok(self.catalog.load())
    }

    pub async fn seasons(&self) -> Result<Vec<SeasonRecord>> {
        let seasons = sqlx::query_as::<_, SeasonRecord>(
            "SELECT number, code, start_date FROM season ORDER BY number",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(seasons)
    }

    /// Starts a new season. The outgoing season's legality is kept under
    /// `Penny Dreadful {previous code}` and a fresh `Penny Dreadful` format is created.
    pub async fn add_season(&self, code: &str, start_date: NaiveDate) -> Result<SeasonRecord> {
        let code = code.trim().to_uppercase();
        if code.is_empty() || !code.chars().all(|c| c.is_ascii_alphanumeric()) {
            bail!("Invalid set code '{}'", code);
        }

        let mut tx = self.pool.begin().await?;

        let exists = sqlx::query("SELECT 1 FROM season WHERE code = ?")
            .bind(&code)
            .fetch_optional(&mut *tx)
            .await?;
        if exists.is_some() {
            bail!("Season {} already exists", code);
        }

        let previous = sqlx::query("SELECT number, code, start_date FROM season ORDER BY number DESC LIMIT 1")
            .fetch_optional(&mut *tx)
            .await?;
        let number = match &previous {
            Some(row) => {
                let previous_code: String = row.get("code");
                let previous_start: String = row.get("start_date");
                if start_date.to_string() <= previous_start {
                    bail!(
                        "Season {} must start after {} ({})",
                        code,
                        previous_code,
                        previous_start
                    );
                }
                sqlx::query("UPDATE format SET name = ? WHERE name = ?")
                    .bind(format!("{} {}", PENNY_DREADFUL, previous_code))
                    .bind(PENNY_DREADFUL)
                    .execute(&mut *tx)
                    .await?;
                row.get::<i64, _>("number") + 1
            }
            None => 1,
        };

        sqlx::query("INSERT INTO format (name) VALUES (?) ON CONFLICT(name) DO NOTHING")
            .bind(PENNY_DREADFUL)
            .execute(&mut *tx)
            .await?;
        sqlx::query("INSERT INTO season (number, code, start_date) VALUES (?, ?, ?)")
            .bind(number)
            .bind(&code)
            .bind(start_date.to_string())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        tracing::info!("Season {} ({}) starts {}", number, code, start_date);

        self.refresh_catalog().await?;
        Ok(SeasonRecord {
            number,
            code,
            start_date: start_date.to_string(),
        })
    }
}
