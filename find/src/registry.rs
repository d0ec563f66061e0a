use crate::types::{FieldKind, NumericField, TextField};
use std::collections::HashMap;

lazy_static::lazy_static! {
    static ref FIELDS: HashMap<&'static str, FieldKind> = field_registry();
}

/// Every key alias the language understands, mapped to its field kind
fn field_registry() -> HashMap<&'static str, FieldKind> {
    let mut map = HashMap::new();
    // Colors
    for key in ["c", "color", "colors"] {
        map.insert(key, FieldKind::ColorSet);
    }
    for key in ["ci", "id", "identity", "coloridentity", "commander", "cid"] {
        map.insert(key, FieldKind::ColorIdentitySet);
    }

    // Text
    for key in ["t", "type", "subtype", "sub", "supertype", "super"] {
        map.insert(key, FieldKind::TypeLine);
    }
    for key in ["o", "oracle", "text"] {
        map.insert(key, FieldKind::TextLike(TextField::Oracle));
    }
    for key in ["fo", "fulloracle"] {
        map.insert(key, FieldKind::TextLike(TextField::FullOracle));
    }
    for key in ["name", "n", "q"] {
        map.insert(key, FieldKind::TextLike(TextField::Name));
    }
    map.insert("layout", FieldKind::TextLike(TextField::Layout));

    // Mana
    for key in ["m", "mana"] {
        map.insert(key, FieldKind::ManaCost);
    }

    // Numbers
    for (key, field) in numeric_aliases() {
        map.insert(key, FieldKind::NumericNullable(field));
    }

    // Printings and legality
    for key in ["e", "s", "set", "edition"] {
        map.insert(key, FieldKind::Edition);
    }
    for key in ["r", "rarity"] {
        map.insert(key, FieldKind::Rarity);
    }
    for key in ["f", "format", "legal"] {
        map.insert(key, FieldKind::Legality);
    }

    map.insert("is", FieldKind::BooleanShortcut);
    map
}

fn numeric_aliases() -> [(&'static str, NumericField); 10] {
    [
        ("cmc", NumericField::Cmc),
        ("mv", NumericField::Cmc),
        ("manavalue", NumericField::Cmc),
        ("pow", NumericField::Power),
        ("power", NumericField::Power),
        ("tou", NumericField::Toughness),
        ("toughness", NumericField::Toughness),
        ("loy", NumericField::Loyalty),
        ("loyalty", NumericField::Loyalty),
        ("loyal", NumericField::Loyalty),
    ]
}

/// Scryfall keys that are recognised but have no counterpart here. Criteria using them are
/// dropped with a warning instead of turning into a name search.
const UNSUPPORTED_KEYS: &[&str] = &[
    "order", "sort", "direction", "unique", "prefer", "display", "include", "lang", "usd", "eur",
    "tix", "a", "artist", "ft", "flavor", "wm", "watermark", "border", "frame", "game", "in", "st",
    "year", "date", "new", "cube", "art", "function", "oracletag", "otag", "atag", "arttag", "has",
    "stamp", "produces",
];

/// Case-insensitive key lookup.
pub fn lookup(key: &str) -> Option<FieldKind> {
    FIELDS.get(key.to_ascii_lowercase().as_str()).copied()
}

pub fn is_unsupported(key: &str) -> bool {
    let key = key.to_ascii_lowercase();
    UNSUPPORTED_KEYS.contains(&key.as_str())
}

/// Numeric field named by a value, for comparisons like `pow>tou`.
pub fn numeric_field(name: &str) -> Option<NumericField> {
    match lookup(name) {
        Some(FieldKind::NumericNullable(field)) => Some(field),
        _ => None,
    }
}
