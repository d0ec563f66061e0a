use anyhow::{Context, Result};

pub const DEFAULT_DATABASE_URL: &str = "sqlite:./cards.db?mode=rwc";
pub const DEFAULT_SEARCH_RESULT_LIMIT: i64 = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub database_url: String,
    pub search_result_limit: i64,
}

impl AppConfig {
    /// Reads `DATABASE_URL` and `SEARCH_RESULT_LIMIT`. Call `dotenv::dotenv()` first to pick up `.env`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let database_url =
            lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());
        let search_result_limit = match lookup("SEARCH_RESULT_LIMIT") {
            Some(raw) => raw
                .trim()
                .parse::<i64>()
                .with_context(|| format!("SEARCH_RESULT_LIMIT must be a number, got '{}'", raw))?,
            None => DEFAULT_SEARCH_RESULT_LIMIT,
        };
        Ok(Self {
            database_url,
            search_result_limit,
        })
    }

    /// Command-line flags win over the environment.
    pub fn with_overrides(mut self, database_url: Option<String>, limit: Option<i64>) -> Self {
        if let Some(url) = database_url {
            self.database_url = url;
        }
        if let Some(limit) = limit {
            self.search_result_limit = limit;
        }
        self
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            search_result_limit: DEFAULT_SEARCH_RESULT_LIMIT,
        }
    }
}
