//! Read-only lookup data the renderer needs: color, rarity and format ids plus the season list.
//!
//! A compilation works against one `Arc<Catalog>` snapshot. New data (a season rotation, freshly
//! imported formats) is published by storing a whole new snapshot in a [`CatalogHandle`].

use crate::colors::Color;
use arc_swap::ArcSwap;
use std::sync::Arc;

pub const PENNY_DREADFUL: &str = "Penny Dreadful";

/// Season codes in order; season 1 is EMN.
pub const BUILTIN_SEASONS: &[&str] = &[
    "EMN", "KLD", // 2016
    "AER", "AKH", "HOU", "XLN", // 2017
    "RIX", "DOM", "M19", "GRN", // 2018
    "RNA", "WAR", "M20", "ELD", // 2019
    "THB", "IKO", "M21", "ZNR", // 2020
    "KHM", "STX", "AFR", "MID", "VOW", // 2021
    "NEO", "SNC", "DMU", "BRO", // 2022
    "ONE", "MOM", "WOE", "LCI", // 2023
    "MKM", "OTJ", "BLB", "DSK", // 2024
];

const BUILTIN_FORMATS: &[&str] = &[
    "Vintage", "Legacy", "Modern", "Pioneer", "Standard", "Pauper", "Commander",
];

const BUILTIN_RARITIES: &[&str] = &["Common", "Uncommon", "Rare", "Mythic Rare"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedId {
    pub id: i64,
    pub name: String,
}

impl NamedId {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    /// Row ids of W, U, B, R, G in that order
    pub color_ids: [i64; 5],
    pub rarities: Vec<NamedId>,
    pub formats: Vec<NamedId>,
    /// Season codes, index 0 is season 1. The last entry is the current season.
    pub seasons: Vec<String>,
}

impl Catalog {
    /// Catalog matching the seed data shipped with the card store.
    pub fn builtin() -> Self {
        Self::with_seasons(BUILTIN_SEASONS.iter().map(|s| s.to_string()).collect())
    }

    /// Builds the default formats for a season list: the current Penny Dreadful format, one
    /// archived format per past season, then the usual constructed formats.
    pub fn with_seasons(seasons: Vec<String>) -> Self {
        let past = seasons.len().saturating_sub(1);
        let format_names = std::iter::once(PENNY_DREADFUL.to_string())
            .chain(
                seasons
                    .iter()
                    .take(past)
                    .map(|code| format!("{} {}", PENNY_DREADFUL, code)),
            )
            .chain(BUILTIN_FORMATS.iter().map(|s| s.to_string()));
        let formats = format_names
            .enumerate()
            .map(|(i, name)| NamedId::new(i as i64 + 1, name))
            .collect();
        let rarities = BUILTIN_RARITIES
            .iter()
            .enumerate()
            .map(|(i, name)| NamedId::new(i as i64 + 1, *name))
            .collect();
        Self {
            color_ids: [1, 2, 3, 4, 5],
            rarities,
            formats,
            seasons,
        }
    }

    pub fn color_id(&self, color: Color) -> i64 {
        self.color_ids[color.index()]
    }

    pub fn current_season(&self) -> u32 {
        self.seasons.len() as u32
    }

    pub fn season_code(&self, number: u32) -> Option<&str> {
        let index = (number as usize).checked_sub(1)?;
        self.seasons.get(index).map(String::as_str)
    }

    /// 1-based season number for a set code, case-insensitive.
    pub fn season_number(&self, code: &str) -> Option<u32> {
        self.seasons
            .iter()
            .position(|s| s.eq_ignore_ascii_case(code))
            .map(|i| i as u32 + 1)
    }

    pub fn format_id(&self, name: &str) -> Option<i64> {
        self.formats
            .iter()
            .find(|f| f.name.eq_ignore_ascii_case(name))
            .map(|f| f.id)
    }

    /// Ids of every format whose name starts with `prefix`, case-insensitive.
    pub fn formats_with_prefix(&self, prefix: &str) -> Vec<i64> {
        let prefix = prefix.to_lowercase();
        self.formats
            .iter()
            .filter(|f| f.name.to_lowercase().starts_with(&prefix))
            .map(|f| f.id)
            .collect()
    }

    /// Accepts the full name, its initial, first word, spaceless form or initials:
    /// `mythic rare`, `m`, `mythic`, `mythicrare`, `mr`.
    pub fn rarity_id(&self, term: &str) -> Option<i64> {
        let term = term.trim().to_lowercase();
        self.rarities
            .iter()
            .find(|r| rarity_spellings(&r.name).iter().any(|s| *s == term))
            .map(|r| r.id)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn rarity_spellings(name: &str) -> Vec<String> {
    let lower = name.to_lowercase();
    let words: Vec<&str> = lower.split_whitespace().collect();
    let initials: String = words.iter().filter_map(|w| w.chars().next()).collect();
    let mut spellings = vec![lower.clone(), lower.replace(' ', ""), initials];
    if let Some(first) = words.first() {
        spellings.push(first.to_string());
        spellings.extend(first.chars().next().map(|c| c.to_string()));
    }
    spellings
}

/// Atomically swappable catalog snapshot.
pub struct CatalogHandle {
    snap: ArcSwap<Catalog>,
}

impl CatalogHandle {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            snap: ArcSwap::from_pointee(catalog),
        }
    }

    /// Snapshot for one compilation. Later stores never change it.
    pub fn load(&self) -> Arc<Catalog> {
        self.snap.load_full()
    }

    pub fn store(&self, catalog: Catalog) {
        tracing::info!(
            seasons = catalog.seasons.len(),
            formats = catalog.formats.len(),
            "Installing new card catalog"
        );
        self.snap.store(Arc::new(catalog));
    }
}

impl Default for CatalogHandle {
    fn default() -> Self {
        Self::new(Catalog::builtin())
    }
}

lazy_static::lazy_static! {
    static ref GLOBAL_CATALOG: CatalogHandle = CatalogHandle::default();
}

/// Process-wide catalog used by [`crate::compile`].
pub fn global() -> &'static CatalogHandle {
    &GLOBAL_CATALOG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_formats() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.format_id("Penny Dreadful"), Some(1));
        assert_eq!(catalog.format_id("penny dreadful emn"), Some(2));
        // The current season has no archived format yet.
        assert_eq!(catalog.format_id("Penny Dreadful DSK"), None);
        assert_eq!(catalog.formats_with_prefix("penny dreadful").len(), 35);
        assert_eq!(catalog.formats_with_prefix("mod"), vec![38]);
    }

    #[test]
    fn test_seasons() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.current_season(), 35);
        assert_eq!(catalog.season_code(1), Some("EMN"));
        assert_eq!(catalog.season_code(0), None);
        assert_eq!(catalog.season_code(36), None);
        assert_eq!(catalog.season_number("kld"), Some(2));
    }

    #[test]
    fn test_rarity_spellings() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.rarity_id("common"), Some(1));
        assert_eq!(catalog.rarity_id("U"), Some(2));
        assert_eq!(catalog.rarity_id("mythic"), Some(4));
        assert_eq!(catalog.rarity_id("mythicrare"), Some(4));
        assert_eq!(catalog.rarity_id("mr"), Some(4));
        assert_eq!(catalog.rarity_id("m"), Some(4));
        assert_eq!(catalog.rarity_id("legendary"), None);
    }

    #[test]
    fn test_handle_swaps_whole_snapshot() {
        let handle = CatalogHandle::default();
        let before = handle.load();

        let mut seasons = before.seasons.clone();
        seasons.push("FDN".to_string());
        handle.store(Catalog::with_seasons(seasons));

        let after = handle.load();
        assert_eq!(before.current_season(), 35);
        assert_eq!(after.current_season(), 36);
        assert_eq!(after.format_id("Penny Dreadful DSK"), Some(36));
    }
}
