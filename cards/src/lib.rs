//! Card store backed by SQLite, searched with the `pd-find` query language.

pub mod config;
pub mod database;
pub mod errors;
pub mod import;
pub mod matcher;

pub use config::AppConfig;
pub use database::{CardRecord, Database, SearchOptions, SearchResults, SeasonRecord};
pub use errors::CardsError;
pub use import::{read_cards, CardImport, PrintingImport};
pub use matcher::{JaroWinklerMatcher, NameMatcher, SearchResult};
