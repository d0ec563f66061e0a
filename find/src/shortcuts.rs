//! Named boolean macros behind `is:`. Each one is written in the search language itself and
//! parsed once into an expression that the renderer substitutes in place.

use crate::error::SearchError;
use crate::types::Expression;
use std::collections::HashMap;

const SHORTCUTS: &[(&str, &str)] = &[
    // Land cycles
    ("bikeland", r#"t:land o:"cycling {2}""#),
    ("bounceland", r#"t:land o:"return a land you control to its owner's hand""#),
    ("canopyland", r#"t:land o:"{1}, {T}, Sacrifice ~: Draw a card.""#),
    (
        "checkland",
        r"t:land o:/enters (the battlefield )?tapped unless you control an? (plains|island|swamp|mountain|forest) or an? /",
    ),
    ("fastland", r#"t:land o:"unless you control two or fewer other lands""#),
    ("slowland", r#"t:land o:"~ doesn't untap during your next untap step.""#),
    ("painland", r#"t:land o:"~ deals 1 damage to you.""#),
    ("shockland", r#"t:land o:"you may pay 2 life" o:tapped"#),
    ("scryland", r#"t:land o:tapped o:"scry 1""#),
    (
        "fetchland",
        r#"t:land o:"Search your library for a " (o:"land card" or o:"plains card" or o:"island card" or o:"swamp card" or o:"mountain card" or o:"forest card" or o:"gate card")"#,
    ),
    ("gainland", r#"t:land o:"when ~ enters" o:"you gain 1 life""#),
    ("storageland", r#"o:"storage counter""#),
    ("triome", r#"t:land o:"cycling {3}""#),
    ("creatureland", r#"t:land o:"becomes a" o:creature"#),
    // Card shapes
    ("dfc", "layout:transform OR layout:modal_dfc OR layout:meld OR layout:reversible_card"),
    ("mdfc", "layout:modal_dfc"),
    ("transform", "layout:transform"),
    ("meld", "layout:meld"),
    ("split", "layout:split"),
    ("flip", "layout:flip"),
    ("adventure", "layout:adventure"),
    // Everything else
    ("commander", r#"(t:legendary t:creature) OR o:"can be your commander""#),
    (
        "permanent",
        "t:artifact OR t:creature OR t:enchantment OR t:land OR t:planeswalker OR t:battle",
    ),
    ("spell", "-t:land"),
    ("vanilla", "t:creature -fo:/./"),
    ("phyrexian", r"m:/\smp/"),
    ("hybrid", r"m:/\{[0-9WUBRG]\/[WUBRG]\}/"),
];

/// Alternate names. An alias renders exactly like its target.
const ALIASES: &[(&str, &str)] = &[
    ("cycleland", "bikeland"),
    ("bicycleland", "bikeland"),
    ("karoo", "bounceland"),
    ("canland", "canopyland"),
    ("fetch", "fetchland"),
    ("refuge", "gainland"),
    ("manland", "creatureland"),
];

lazy_static::lazy_static! {
    static ref PREBUILT: HashMap<&'static str, Result<Expression, SearchError>> = SHORTCUTS
        .iter()
        .map(|(name, query)| (*name, build(query)))
        .collect();
}

fn build(query: &str) -> Result<Expression, SearchError> {
    let tokens = crate::tokenizer::tokenize(query)?;
    crate::parser::parse(tokens)
}

/// Canonical shortcut name for `name` or one of its aliases.
pub fn canonical_name(name: &str) -> Option<&'static str> {
    let name = name.trim().to_lowercase();
    ALIASES
        .iter()
        .find(|(alias, _)| *alias == name)
        .map(|(_, target)| *target)
        .or_else(|| SHORTCUTS.iter().find(|(n, _)| *n == name).map(|(n, _)| *n))
}

pub fn expression(name: &str) -> Result<&'static Expression, SearchError> {
    let canonical = canonical_name(name)
        .ok_or_else(|| SearchError::invalid_value(format!("Unknown shortcut 'is:{}'", name)))?;
    match PREBUILT.get(canonical) {
        Some(Ok(expression)) => Ok(expression),
        Some(Err(err)) => Err(err.clone()),
        None => Err(SearchError::invalid_value(format!(
            "Unknown shortcut 'is:{}'",
            name
        ))),
    }
}

/// All accepted names, canonical and aliases.
pub fn names() -> impl Iterator<Item = &'static str> {
    SHORTCUTS
        .iter()
        .map(|(name, _)| *name)
        .chain(ALIASES.iter().map(|(alias, _)| *alias))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_shortcut_parses() {
        for name in names() {
            assert!(expression(name).is_ok(), "is:{} failed to build", name);
        }
    }

    #[test]
    fn test_aliases_resolve_to_same_expression() {
        for (alias, target) in ALIASES {
            assert_eq!(canonical_name(alias), Some(*target));
            assert_eq!(expression(alias).unwrap(), expression(target).unwrap());
        }
    }

    #[test]
    fn test_definitions_do_not_nest() {
        for (name, query) in SHORTCUTS {
            assert!(!query.contains("is:"), "is:{} refers to another shortcut", name);
        }
    }

    #[test]
    fn test_unknown_shortcut() {
        assert_eq!(canonical_name("notaland"), None);
        assert!(matches!(
            expression("notaland"),
            Err(SearchError::InvalidValue(_))
        ));
        assert_eq!(canonical_name("Refuge"), canonical_name("gainland"));
    }
}
