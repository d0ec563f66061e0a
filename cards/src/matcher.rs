//! "Did you mean" lookup for card names, used when a search finds nothing.

use serde::{Deserialize, Serialize};
use strsim::jaro_winkler;

pub const SIMILARITY_THRESHOLD: f64 = 0.85;
const MAX_FUZZY_MATCHES: usize = 5;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub exact: Option<String>,
    pub prefix_matches: Vec<String>,
    pub fuzzy_matches: Vec<String>,
}

impl SearchResult {
    pub fn is_empty(&self) -> bool {
        self.exact.is_none() && self.prefix_matches.is_empty() && self.fuzzy_matches.is_empty()
    }

    /// Every candidate, best first, without repeats.
    pub fn candidates(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        let all = self
            .exact
            .iter()
            .chain(self.prefix_matches.iter())
            .chain(self.fuzzy_matches.iter());
        for name in all {
            if !out.contains(name) {
                out.push(name.clone());
            }
        }
        out
    }
}

pub trait NameMatcher {
    fn fuzzy_lookup(&self, name: &str) -> SearchResult;
}

/// Case-insensitive matcher over a fixed list of canonical names.
pub struct JaroWinklerMatcher {
    names: Vec<String>,
}

impl JaroWinklerMatcher {
    pub fn new(names: Vec<String>) -> Self {
        Self { names }
    }
}

impl NameMatcher for JaroWinklerMatcher {
    fn fuzzy_lookup(&self, name: &str) -> SearchResult {
        let wanted = name.trim().to_lowercase();
        if wanted.is_empty() {
            return SearchResult::default();
        }

        let exact = self
            .names
            .iter()
            .find(|n| n.to_lowercase() == wanted)
            .cloned();
        let prefix_matches: Vec<String> = self
            .names
            .iter()
            .filter(|n| {
                let lower = n.to_lowercase();
                lower != wanted && lower.starts_with(&wanted)
            })
            .cloned()
            .collect();

        let mut scored: Vec<(f64, &String)> = self
            .names
            .iter()
            .map(|n| (jaro_winkler(&wanted, &n.to_lowercase()), n))
            .filter(|(score, n)| {
                *score > SIMILARITY_THRESHOLD && Some(*n) != exact.as_ref() && !prefix_matches.contains(n)
            })
            .collect();
        scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.cmp(b.1)));
        let fuzzy_matches = scored
            .into_iter()
            .take(MAX_FUZZY_MATCHES)
            .map(|(_, n)| n.clone())
            .collect();

        SearchResult {
            exact,
            prefix_matches,
            fuzzy_matches,
        }
    }
}
