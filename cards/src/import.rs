//! Card data files: a JSON array of cards in roughly the shape Scryfall publishes.

use crate::errors::CardsError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardImport {
    pub name: String,
    #[serde(default = "default_layout")]
    pub layout: String,
    #[serde(default)]
    pub mana_cost: String,
    /// Missing for cards without a mana value, such as lands.
    pub cmc: Option<f64>,
    #[serde(default)]
    pub type_line: String,
    #[serde(default)]
    pub oracle_text: String,
    /// Printed as text: `*` and `1+*` are stored as NULL.
    pub power: Option<String>,
    pub toughness: Option<String>,
    pub loyalty: Option<String>,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub color_identity: Vec<String>,
    /// Format name to `Legal`, `Restricted`, `Banned` or `not_legal`, in any case
    #[serde(default)]
    pub legalities: BTreeMap<String, String>,
    #[serde(default)]
    pub printings: Vec<PrintingImport>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrintingImport {
    pub set: String,
    pub set_name: String,
    pub rarity: String,
}

fn default_layout() -> String {
    "normal".to_string()
}

/// Legality as stored in `card_legality`. Search treats every stored row except `Banned` as
/// playable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Legality {
    Legal,
    Restricted,
    Banned,
}

impl Legality {
    /// `Ok(None)` for `not_legal`, which is stored as no row at all.
    pub fn parse(value: &str) -> Result<Option<Self>, CardsError> {
        match value.trim().to_lowercase().replace(' ', "_").as_str() {
            "legal" => Ok(Some(Legality::Legal)),
            "restricted" => Ok(Some(Legality::Restricted)),
            "banned" => Ok(Some(Legality::Banned)),
            "not_legal" => Ok(None),
            _ => Err(CardsError::Import(format!("unknown legality '{}'", value))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Legality::Legal => "Legal",
            Legality::Restricted => "Restricted",
            Legality::Banned => "Banned",
        }
    }
}

/// Numeric value of a printed stat, `None` when it is not a plain number.
pub fn parse_stat(value: Option<&str>) -> Option<f64> {
    value.and_then(|v| v.trim().parse::<f64>().ok())
}

pub fn read_cards(path: &Path) -> Result<Vec<CardImport>, CardsError> {
    let data = std::fs::read_to_string(path)?;
    let cards: Vec<CardImport> = serde_json::from_str(&data)?;
    tracing::info!("Read {} cards from {}", cards.len(), path.display());
    Ok(cards)
}
