//! Color set algebra for `c:` (printed colors) and `ci:` (color identity).

use crate::builder::RenderContext;
use crate::error::SearchError;
use crate::types::Operator;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Color {
    White,
    Blue,
    Black,
    Red,
    Green,
}

impl Color {
    pub const ALL: [Color; 5] = [
        Color::White,
        Color::Blue,
        Color::Black,
        Color::Red,
        Color::Green,
    ];

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn symbol(&self) -> char {
        match self {
            Color::White => 'W',
            Color::Blue => 'U',
            Color::Black => 'B',
            Color::Red => 'R',
            Color::Green => 'G',
        }
    }

    pub fn from_symbol(c: char) -> Option<Color> {
        match c.to_ascii_uppercase() {
            'W' => Some(Color::White),
            'U' => Some(Color::Blue),
            'B' => Some(Color::Black),
            'R' => Some(Color::Red),
            'G' => Some(Color::Green),
            _ => None,
        }
    }
}

/// Which join table a color query runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorTarget {
    Colors,
    Identity,
}

impl ColorTarget {
    pub fn table(&self) -> &'static str {
        match self {
            ColorTarget::Colors => "card_color",
            ColorTarget::Identity => "card_color_identity",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    Contains,
    ExactSet,
    SupersetOf,
    SubsetOf,
    StrictSupersetOf,
    StrictSubsetOf,
    Colorless,
    Multicolor,
    /// Number of colors compared with the operator, e.g. `c>=2`
    Count(Operator, u32),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorSetQuery {
    pub target: ColorTarget,
    /// Sorted in WUBRG order, no duplicates
    pub colors: Vec<Color>,
    pub mode: ColorMode,
}

/// Named color combinations, mapped to their letters.
const COLOR_NAMES: &[(&str, &str)] = &[
    ("white", "w"),
    ("blue", "u"),
    ("black", "b"),
    ("red", "r"),
    ("green", "g"),
    ("colorless", "c"),
    ("multicolor", "m"),
    ("multicolored", "m"),
    // Guilds
    ("azorius", "wu"),
    ("dimir", "ub"),
    ("rakdos", "br"),
    ("gruul", "rg"),
    ("selesnya", "gw"),
    ("orzhov", "wb"),
    ("izzet", "ur"),
    ("golgari", "bg"),
    ("boros", "rw"),
    ("simic", "gu"),
    // Shards
    ("bant", "gwu"),
    ("esper", "wub"),
    ("grixis", "ubr"),
    ("jund", "brg"),
    ("naya", "rgw"),
    // Wedges
    ("abzan", "wbg"),
    ("jeskai", "urw"),
    ("sultai", "bgu"),
    ("mardu", "rwb"),
    ("temur", "gur"),
];

impl ColorSetQuery {
    pub fn parse(target: ColorTarget, operator: Operator, value: &str) -> Result<Self, SearchError> {
        let lowered = value.trim().to_lowercase();

        if !lowered.is_empty() && lowered.chars().all(|c| c.is_ascii_digit()) {
            let count = lowered.parse::<u32>().map_err(|_| {
                SearchError::invalid_value(format!("'{}' is too many colors", value))
            })?;
            return Ok(Self {
                target,
                colors: Vec::new(),
                mode: ColorMode::Count(operator, count),
            });
        }

        let letters = COLOR_NAMES
            .iter()
            .find(|(name, _)| *name == lowered)
            .map(|(_, letters)| letters.to_string())
            .unwrap_or(lowered);

        let mut colors = BTreeSet::new();
        let mut colorless = false;
        let mut multicolor = false;
        for c in letters.chars() {
            match c {
                'c' => colorless = true,
                'm' => multicolor = true,
                _ => match Color::from_symbol(c) {
                    Some(color) => {
                        colors.insert(color);
                    }
                    None => {
                        return Err(SearchError::invalid_value(format!(
                            "Invalid color '{}' in '{}'",
                            c, value
                        )))
                    }
                },
            }
        }
        let colors: Vec<Color> = colors.into_iter().collect();

        if multicolor && (colorless || !colors.is_empty()) {
            let named: String = colors
                .iter()
                .map(|c| c.symbol().to_ascii_lowercase())
                .collect();
            return Err(SearchError::invalid_value(format!(
                "Using 'm' with other colors is not supported, use 'color>{}' instead",
                named
            )));
        }
        if colorless && !colors.is_empty() {
            return Err(SearchError::invalid_value(
                "Using 'c' with other colors is not supported",
            ));
        }

        let mode = if multicolor {
            match operator {
                Operator::Colon | Operator::Eq | Operator::Bang | Operator::Gte => {
                    ColorMode::Multicolor
                }
                _ => {
                    return Err(SearchError::invalid_value(format!(
                        "'m' cannot be used with '{}'",
                        operator
                    )))
                }
            }
        } else if colorless {
            match operator {
                Operator::Colon | Operator::Eq | Operator::Bang | Operator::Lte => {
                    ColorMode::Colorless
                }
                _ => {
                    return Err(SearchError::invalid_value(format!(
                        "Colorless cannot be used with '{}'",
                        operator
                    )))
                }
            }
        } else {
            match (operator, target) {
                (Operator::Colon, ColorTarget::Colors) => ColorMode::Contains,
                // Identity reads as "fits in a deck of these colors".
                (Operator::Colon, ColorTarget::Identity) => ColorMode::SubsetOf,
                (Operator::Eq | Operator::Bang, _) => ColorMode::ExactSet,
                (Operator::Gte, _) => ColorMode::SupersetOf,
                (Operator::Lte, _) => ColorMode::SubsetOf,
                (Operator::Gt, _) => ColorMode::StrictSupersetOf,
                (Operator::Lt, _) => ColorMode::StrictSubsetOf,
            }
        };

        Ok(Self {
            target,
            colors,
            mode,
        })
    }

    pub fn render(&self, ctx: &RenderContext) -> String {
        let table = self.target.table();
        let card_id = ctx.column("id");
        let color_id = |color: Color| ctx.catalog.color_id(color);

        let member = |color: Color| {
            format!(
                "{} IN (SELECT card_id FROM {} WHERE color_id = {})",
                card_id,
                table,
                color_id(color)
            )
        };
        let absent = |color: Color| {
            format!(
                "{} NOT IN (SELECT card_id FROM {} WHERE color_id = {})",
                card_id,
                table,
                color_id(color)
            )
        };
        let having = |negated: bool, op: &str, n: usize| {
            format!(
                "{} {} (SELECT card_id FROM {} GROUP BY card_id HAVING COUNT(card_id) {} {})",
                card_id,
                if negated { "NOT IN" } else { "IN" },
                table,
                op,
                n
            )
        };
        let others = || Color::ALL.into_iter().filter(|c| !self.colors.contains(c));

        let n = self.colors.len();
        let mut parts: Vec<String> = Vec::new();
        match self.mode {
            ColorMode::Contains | ColorMode::SupersetOf => {
                parts.extend(self.colors.iter().map(|c| member(*c)));
            }
            ColorMode::ExactSet => {
                parts.extend(self.colors.iter().map(|c| member(*c)));
                parts.push(having(false, "<=", n));
            }
            ColorMode::StrictSupersetOf => {
                parts.extend(self.colors.iter().map(|c| member(*c)));
                parts.push(having(false, ">", n));
            }
            ColorMode::SubsetOf => {
                parts.extend(others().map(absent));
            }
            ColorMode::StrictSubsetOf => {
                parts.extend(others().map(absent));
                parts.push(having(true, ">=", n));
            }
            ColorMode::Colorless => {
                parts.push(format!("{} NOT IN (SELECT card_id FROM {})", card_id, table));
                if self.target == ColorTarget::Identity {
                    parts.extend(Color::ALL.into_iter().map(absent));
                }
            }
            ColorMode::Multicolor => {
                parts.push(having(false, ">", 1));
            }
            ColorMode::Count(op, count) => {
                parts.push(format!(
                    "(SELECT COUNT(*) FROM {} WHERE {}.card_id = {}) {} {}",
                    table,
                    table,
                    card_id,
                    op.sql_comparison(),
                    count
                ));
            }
        }

        if parts.is_empty() {
            // Every card is a subset of all five colors.
            return "1 = 1".to_string();
        }
        parts.join(" AND ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(target: ColorTarget, op: Operator, value: &str) -> ColorSetQuery {
        ColorSetQuery::parse(target, op, value).unwrap()
    }

    #[test]
    fn test_letters_sorted_and_deduplicated() {
        let q = parse(ColorTarget::Colors, Operator::Colon, "grRg");
        assert_eq!(q.colors, vec![Color::Red, Color::Green]);
        assert_eq!(q.mode, ColorMode::Contains);
    }

    #[test]
    fn test_named_combinations() {
        let esper = parse(ColorTarget::Identity, Operator::Lte, "Esper");
        assert_eq!(esper.colors, vec![Color::White, Color::Blue, Color::Black]);
        assert_eq!(esper.mode, ColorMode::SubsetOf);

        let gruul = parse(ColorTarget::Colors, Operator::Eq, "gruul");
        assert_eq!(gruul.colors, vec![Color::Red, Color::Green]);
        assert_eq!(gruul.mode, ColorMode::ExactSet);
    }

    #[test]
    fn test_operator_modes() {
        use Operator::*;
        let modes: Vec<ColorMode> = [Colon, Eq, Bang, Gte, Lte, Gt, Lt]
            .into_iter()
            .map(|op| parse(ColorTarget::Colors, op, "b").mode)
            .collect();
        assert_eq!(
            modes,
            vec![
                ColorMode::Contains,
                ColorMode::ExactSet,
                ColorMode::ExactSet,
                ColorMode::SupersetOf,
                ColorMode::SubsetOf,
                ColorMode::StrictSupersetOf,
                ColorMode::StrictSubsetOf,
            ]
        );
        assert_eq!(
            parse(ColorTarget::Identity, Colon, "b").mode,
            ColorMode::SubsetOf
        );
    }

    #[test]
    fn test_multicolor_and_colorless() {
        assert_eq!(
            parse(ColorTarget::Colors, Operator::Colon, "m").mode,
            ColorMode::Multicolor
        );
        assert_eq!(
            parse(ColorTarget::Identity, Operator::Eq, "colorless").mode,
            ColorMode::Colorless
        );
        assert_eq!(
            parse(ColorTarget::Colors, Operator::Gte, "2").mode,
            ColorMode::Count(Operator::Gte, 2)
        );
    }

    #[test]
    fn test_mixing_m_with_colors_rejected() {
        let err = ColorSetQuery::parse(ColorTarget::Identity, Operator::Colon, "bm").unwrap_err();
        assert_eq!(
            err,
            SearchError::InvalidValue(
                "Using 'm' with other colors is not supported, use 'color>b' instead".into()
            )
        );
        assert!(ColorSetQuery::parse(ColorTarget::Colors, Operator::Colon, "cr").is_err());
        assert!(ColorSetQuery::parse(ColorTarget::Colors, Operator::Colon, "rx").is_err());
        assert!(ColorSetQuery::parse(ColorTarget::Colors, Operator::Lt, "m").is_err());
    }
}
