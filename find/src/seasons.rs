//! Season/format resolution: `pd`, `pd7`, `pds7`, `pdall`, `penny dreadful season 7`, `kld` …

use crate::catalog::{self, Catalog, PENNY_DREADFUL};
use crate::error::SearchError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeasonSpec {
    Season(u32),
    All,
}

/// Longest prefixes first so `pds7` is not read as `pd` + `s7`.
const SEASON_PREFIXES: &[&str] = &[
    "penny dreadful season ",
    "penny dreadful ",
    "season ",
    "pds",
    "pd",
];

/// Resolves against the process-wide catalog.
pub fn resolve_season(token: &str) -> Result<SeasonSpec, SearchError> {
    resolve_season_in(token, &catalog::global().load())
}

pub fn resolve_season_in(token: &str, catalog: &Catalog) -> Result<SeasonSpec, SearchError> {
    let normalized = token
        .trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    match normalized.as_str() {
        "pd" | "penny" | "pennydreadful" | "penny dreadful" => {
            return Ok(SeasonSpec::Season(catalog.current_season()))
        }
        "all" | "pdall" | "pdsall" => return Ok(SeasonSpec::All),
        _ => {}
    }

    let mut candidates: Vec<&str> = SEASON_PREFIXES
        .iter()
        .filter_map(|prefix| normalized.strip_prefix(prefix))
        .collect();
    if candidates.is_empty() {
        candidates.push(&normalized);
    }

    candidates
        .into_iter()
        .find_map(|rest| season_from(rest, catalog))
        .ok_or_else(|| {
            SearchError::invalid_value(format!("I don't know a season called '{}'", token))
        })
}

/// Bare number or set code. Never clamps: anything outside the known list is `None`.
fn season_from(rest: &str, catalog: &Catalog) -> Option<SeasonSpec> {
    if !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit()) {
        let n = rest.parse::<u32>().ok()?;
        return match n {
            0 => Some(SeasonSpec::All),
            n if n <= catalog.current_season() => Some(SeasonSpec::Season(n)),
            _ => None,
        };
    }
    catalog.season_number(rest).map(SeasonSpec::Season)
}

/// `EMN` for season 1, `ALL` for all time.
pub fn season_code(spec: SeasonSpec, catalog: &Catalog) -> Result<String, SearchError> {
    match spec {
        SeasonSpec::All => Ok("ALL".to_string()),
        SeasonSpec::Season(n) => catalog
            .season_code(n)
            .map(str::to_string)
            .ok_or_else(|| SearchError::invalid_value(format!("I don't know a season called '{}'", n))),
    }
}

pub fn season_name(spec: SeasonSpec) -> String {
    match spec {
        SeasonSpec::All => "All Time".to_string(),
        SeasonSpec::Season(n) => format!("Season {}", n),
    }
}

/// Format ids a season's legality lives under. The current season is plain "Penny Dreadful",
/// earlier ones are archived as "Penny Dreadful EMN" and so on.
pub fn format_ids(spec: SeasonSpec, catalog: &Catalog) -> Result<Vec<i64>, SearchError> {
    let ids = match spec {
        SeasonSpec::All => catalog.formats_with_prefix(PENNY_DREADFUL),
        SeasonSpec::Season(n) if n == catalog.current_season() => {
            catalog.format_id(PENNY_DREADFUL).into_iter().collect()
        }
        SeasonSpec::Season(_) => {
            let code = season_code(spec, catalog)?;
            catalog
                .format_id(&format!("{} {}", PENNY_DREADFUL, code))
                .into_iter()
                .collect()
        }
    };
    if ids.is_empty() {
        return Err(SearchError::invalid_value(format!(
            "No legality data for {}",
            season_name(spec)
        )));
    }
    Ok(ids)
}
