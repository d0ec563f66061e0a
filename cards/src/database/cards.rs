use super::types::{CardRecord, Database, SearchOptions, SearchResults};
use crate::errors::CardsError;
use crate::import::{parse_stat, CardImport, Legality};
use anyhow::{anyhow, Result};
use pd_find::colors::Color;
use pd_find::{RenderContext, SearchError};
use sqlx::Row;

pub const MAX_SEARCH_LIMIT: i64 = 1000;

const CARD_SELECT: &str = "SELECT c.id, c.name, c.mana_cost, c.cmc, c.type_line, c.oracle_text, \
     c.power, c.toughness, c.loyalty, c.layout, \
     COALESCE((SELECT GROUP_CONCAT(co.symbol, '') FROM card_color AS cc JOIN color AS co ON co.id = cc.color_id WHERE cc.card_id = c.id), '') AS colors, \
     COALESCE((SELECT GROUP_CONCAT(co.symbol, '') FROM card_color_identity AS ci JOIN color AS co ON co.id = ci.color_id WHERE ci.card_id = c.id), '') AS color_identity \
     FROM card AS c";

/// Color symbols in WUBRG order.
fn wubrg(symbols: &str) -> String {
    let mut colors: Vec<Color> = symbols.chars().filter_map(Color::from_symbol).collect();
    colors.sort();
    colors.dedup();
    colors.iter().map(|c| c.symbol()).collect()
}

impl Database {
    /// Runs a search-language query against the card table, ordered by name.
    pub async fn search(
        &self,
        query: &str,
        options: SearchOptions,
    ) -> Result<SearchResults, CardsError> {
        if !(1..=MAX_SEARCH_LIMIT).contains(&options.limit) {
            return Err(SearchError::InvalidArgument(format!(
                "limit must be between 1 and {}, got {}",
                MAX_SEARCH_LIMIT, options.limit
            ))
            .into());
        }
        if options.offset < 0 {
            return Err(SearchError::InvalidArgument(format!(
                "offset must not be negative, got {}",
                options.offset
            ))
            .into());
        }

        let catalog = self.catalog.load();
        let (fragment, warnings) =
            pd_find::compile_with(query, &RenderContext::new(&catalog))?;
        let sql = format!(
            "{} WHERE {} ORDER BY c.name LIMIT ? OFFSET ?",
            CARD_SELECT, fragment
        );

        let mut cards = sqlx::query_as::<_, CardRecord>(&sql)
            .bind(options.limit)
            .bind(options.offset)
            .fetch_all(&self.pool)
            .await?;
        for card in &mut cards {
            card.colors = wubrg(&card.colors);
            card.color_identity = wubrg(&card.color_identity);
        }

        tracing::debug!(query, results = cards.len(), "Searched cards");
        Ok(SearchResults { cards, warnings })
    }

    /// Inserts or replaces cards with their colors, legalities and printings. Formats and
    /// editions named by the cards are created as needed. Returns the number of cards written.
    pub async fn import_cards(&self, cards: &[CardImport]) -> Result<usize> {
        let catalog = self.catalog.load();
        let mut tx = self.pool.begin().await?;

        for card in cards {
            let card_id: i64 = sqlx::query(
                "INSERT INTO card (name, name_ascii, layout, mana_cost, cmc, type_line, oracle_text, search_text, power, toughness, loyalty)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                 ON CONFLICT(name) DO UPDATE SET
                    name_ascii = excluded.name_ascii,
                    layout = excluded.layout,
                    mana_cost = excluded.mana_cost,
                    cmc = excluded.cmc,
                    type_line = excluded.type_line,
                    oracle_text = excluded.oracle_text,
                    search_text = excluded.search_text,
                    power = excluded.power,
                    toughness = excluded.toughness,
                    loyalty = excluded.loyalty
                 RETURNING id",
            )
            .bind(&card.name)
            .bind(pd_find::unaccent(&card.name))
            .bind(&card.layout)
            .bind(&card.mana_cost)
            .bind(card.cmc)
            .bind(&card.type_line)
            .bind(&card.oracle_text)
            .bind(pd_find::strip_reminder_text(&card.oracle_text))
            .bind(parse_stat(card.power.as_deref()))
            .bind(parse_stat(card.toughness.as_deref()))
            .bind(parse_stat(card.loyalty.as_deref()))
            .fetch_one(&mut *tx)
            .await?
            .get("id");

            for table in ["card_color", "card_color_identity", "card_legality", "printing"] {
                sqlx::query(&format!("DELETE FROM {} WHERE card_id = ?", table))
                    .bind(card_id)
                    .execute(&mut *tx)
                    .await?;
            }

            for (table, symbols) in [
                ("card_color", &card.colors),
                ("card_color_identity", &card.color_identity),
            ] {
                for symbol in symbols {
                    sqlx::query(&format!(
                        "INSERT OR IGNORE INTO {} (card_id, color_id) SELECT ?, id FROM color WHERE symbol = ?",
                        table
                    ))
                    .bind(card_id)
                    .bind(symbol.to_uppercase())
                    .execute(&mut *tx)
                    .await?;
                }
            }

            for (format_name, legality) in &card.legalities {
                let legality = match Legality::parse(legality) {
                    Ok(Some(legality)) => legality,
                    Ok(None) => continue,
                    Err(e) => return Err(anyhow!("{}: {} in {}", card.name, e, format_name)),
                };
                sqlx::query("INSERT INTO format (name) VALUES (?) ON CONFLICT(name) DO NOTHING")
                    .bind(format_name)
                    .execute(&mut *tx)
                    .await?;
                sqlx::query(
                    "INSERT INTO card_legality (card_id, format_id, legality)
                     SELECT ?, id, ? FROM format WHERE name = ?",
                )
                .bind(card_id)
                .bind(legality.as_str())
                .bind(format_name)
                .execute(&mut *tx)
                .await?;
            }

            for printing in &card.printings {
                let rarity_id = catalog.rarity_id(&printing.rarity).ok_or_else(|| {
                    anyhow!("{}: unknown rarity '{}'", card.name, printing.rarity)
                })?;
                let edition_id: i64 = sqlx::query(
                    "INSERT INTO edition (code, name) VALUES (?, ?)
                     ON CONFLICT(code) DO UPDATE SET name = excluded.name
                     RETURNING id",
                )
                .bind(printing.set.to_uppercase())
                .bind(&printing.set_name)
                .fetch_one(&mut *tx)
                .await?
                .get("id");
                sqlx::query(
                    "INSERT OR IGNORE INTO printing (card_id, edition_id, rarity_id) VALUES (?, ?, ?)",
                )
                .bind(card_id)
                .bind(edition_id)
                .bind(rarity_id)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;
        tracing::info!("Imported {} cards", cards.len());

        self.refresh_catalog().await?;
        Ok(cards.len())
    }

    /// Every card name, for the name matcher.
    pub async fn card_names(&self) -> Result<Vec<String>> {
        let names = sqlx::query("SELECT name FROM card ORDER BY name")
            .fetch_all(&self.pool)
            .await?
            .iter()
            .map(|row| row.get::<String, _>("name"))
            .collect();
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wubrg_order() {
        assert_eq!(wubrg("GR"), "RG");
        assert_eq!(wubrg("BUW"), "WUB");
        assert_eq!(wubrg(""), "");
        assert_eq!(wubrg("GG"), "G");
    }
}
