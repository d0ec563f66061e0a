pub mod cards;
pub mod catalog;
pub mod core;
pub mod types;

pub use cards::MAX_SEARCH_LIMIT;
pub use types::{CardRecord, Database, SearchOptions, SearchResults, SeasonRecord};
