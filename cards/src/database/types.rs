use pd_find::CatalogHandle;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use std::sync::Arc;

#[derive(Clone)]
pub struct Database {
    pub(crate) pool: SqlitePool,
    /// Catalog the store's searches compile against, kept in step with the tables.
    pub(crate) catalog: Arc<CatalogHandle>,
}

/// One search hit. Colors are symbols in WUBRG order, e.g. `RG`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct CardRecord {
    pub id: i64,
    pub name: String,
    pub mana_cost: String,
    pub cmc: Option<f64>,
    pub type_line: String,
    pub oracle_text: String,
    pub power: Option<f64>,
    pub toughness: Option<f64>,
    pub loyalty: Option<f64>,
    pub layout: String,
    pub colors: String,
    pub color_identity: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    pub limit: i64,
    pub offset: i64,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            limit: crate::config::DEFAULT_SEARCH_RESULT_LIMIT,
            offset: 0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResults {
    pub cards: Vec<CardRecord>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct SeasonRecord {
    pub number: i64,
    pub code: String,
    pub start_date: String,
}
