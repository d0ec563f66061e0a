//! Shared setup for the card store integration tests

#![allow(dead_code)]

use pd_cards::{read_cards, CardImport, Database, SearchOptions};
use std::path::PathBuf;

pub fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/cards.json")
}

/// Fresh in-memory database, migrated and loaded with the fixture cards.
pub async fn setup_test_db() -> Database {
    let db = Database::new("sqlite::memory:")
        .await
        .expect("Failed to open in-memory database");
    load_fixtures(&db).await;
    db
}

pub async fn load_fixtures(db: &Database) {
    let cards = read_cards(&fixture_path()).expect("Failed to read fixture cards");
    db.import_cards(&cards)
        .await
        .expect("Failed to import fixture cards");
}

/// Imports cards given as a JSON array in the fixture format.
pub async fn import_json(db: &Database, json: &str) -> anyhow::Result<usize> {
    let cards: Vec<CardImport> = serde_json::from_str(json).expect("Invalid card JSON");
    db.import_cards(&cards).await
}

/// Names of every card a query matches, in name order.
pub async fn names(db: &Database, query: &str) -> Vec<String> {
    let results = db
        .search(query, SearchOptions::default())
        .await
        .unwrap_or_else(|e| panic!("search {:?} failed: {}", query, e));
    results.cards.into_iter().map(|card| card.name).collect()
}
