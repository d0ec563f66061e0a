use crate::catalog::Catalog;
use crate::colors::{ColorSetQuery, ColorTarget};
use crate::error::SearchError;
use crate::mana;
use crate::names::unaccent;
use crate::registry;
use crate::seasons::{self, resolve_season_in};
use crate::shortcuts;
use crate::sql;
use crate::tokenizer::is_number;
use crate::types::{Expression, FieldKind, NumericField, Operator, TextField, Value};

pub const DEFAULT_CARD_ALIAS: &str = "c";

/// Nesting allowed when a shortcut's expansion contains further shortcuts.
const MAX_SHORTCUT_DEPTH: usize = 4;

/// What the surrounding query has in scope. Fragments only reference the card table through
/// `card_alias`, so callers choose the alias instead of inheriting one.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub card_alias: &'a str,
    pub catalog: &'a Catalog,
}

impl<'a> RenderContext<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self {
            card_alias: DEFAULT_CARD_ALIAS,
            catalog,
        }
    }

    pub fn with_card_alias(mut self, card_alias: &'a str) -> Self {
        self.card_alias = card_alias;
        self
    }

    /// `c.name` for `name`
    pub fn column(&self, name: &str) -> String {
        format!("{}.{}", self.card_alias, name)
    }
}

/// Regex shorthands, longest first so `\smp` is not read as `\sm` + `p`.
const REGEX_SHORTHANDS: &[(&str, &str)] = &[
    ("spt", r"[-+]?[0-9X*]+/[-+]?[0-9X*]+"),
    ("spp", r"\+[0-9X]+/\+[0-9X]+"),
    ("smm", r"-[0-9X]+/-[0-9X]+"),
    ("smp", r"\{(?:[WUBRG]/)?[WUBRG]/P\}"),
    ("sm", r"\{[0-9WUBRGCXSP/]+\}"),
    ("sc", r"\{(?:[0-9]/)?[WUBRG](?:/[WUBRGP])*\}"),
];

/// Expands `\sm`, `\sc`, `\spt`, `\spp`, `\smm` and `\smp`. An escaped backslash is left alone.
pub fn expand_shorthands(pattern: &str) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let mut expanded = String::with_capacity(pattern.len());
    let mut i = 0;
    while i < chars.len() {
        if chars[i] == '\\' {
            if chars.get(i + 1) == Some(&'\\') {
                expanded.push_str(r"\\");
                i += 2;
                continue;
            }
            let ahead: String = chars[i + 1..].iter().take(3).collect();
            if let Some((name, replacement)) = REGEX_SHORTHANDS
                .iter()
                .find(|(name, _)| ahead.starts_with(name))
            {
                expanded.push_str(replacement);
                i += 1 + name.len();
                continue;
            }
        }
        expanded.push(chars[i]);
        i += 1;
    }
    expanded
}

/// The pattern exactly as the database will run it, compiled here so bad patterns fail early.
pub(crate) fn regex_for_validation(pattern: &str) -> Result<regex::Regex, regex::Error> {
    regex::Regex::new(&format!("(?i){}", expand_shorthands(pattern)))
}

/// Renders an expression to a parenthesized SQL boolean fragment.
pub fn render(expression: &Expression, ctx: &RenderContext) -> Result<String, SearchError> {
    if !sql::is_identifier(ctx.card_alias) {
        return Err(SearchError::InvalidArgument(format!(
            "'{}' is not a valid table alias",
            ctx.card_alias
        )));
    }
    render_node(expression, ctx, 0)
}

fn render_node(
    expression: &Expression,
    ctx: &RenderContext,
    depth: usize,
) -> Result<String, SearchError> {
    match expression {
        Expression::Predicate {
            kind,
            operator,
            value,
        } => build_predicate(*kind, *operator, value, ctx, depth),
        Expression::And(left, right) => Ok(format!(
            "({} AND {})",
            render_node(left, ctx, depth)?,
            render_node(right, ctx, depth)?
        )),
        Expression::Or(left, right) => Ok(format!(
            "({} OR {})",
            render_node(left, ctx, depth)?,
            render_node(right, ctx, depth)?
        )),
        Expression::Not(inner) => Ok(format!("NOT {}", render_node(inner, ctx, depth)?)),
    }
}

fn build_predicate(
    kind: FieldKind,
    operator: Operator,
    value: &Value,
    ctx: &RenderContext,
    depth: usize,
) -> Result<String, SearchError> {
    let text = value.as_str();
    let clause = match kind {
        FieldKind::BooleanShortcut => return render_shortcut(text, ctx, depth),
        FieldKind::TextLike(field) => build_text_clause(field, operator, text, ctx),
        FieldKind::TypeLine => build_text_clause(TextField::TypeLine, operator, text, ctx),
        FieldKind::RegexLike(field) => build_regex_clause(field, text, ctx),
        FieldKind::NumericNullable(field) => build_numeric_clause(field, operator, value, ctx)?,
        FieldKind::ColorSet => {
            ColorSetQuery::parse(ColorTarget::Colors, operator, text)?.render(ctx)
        }
        FieldKind::ColorIdentitySet => {
            ColorSetQuery::parse(ColorTarget::Identity, operator, text)?.render(ctx)
        }
        FieldKind::ManaCost => build_mana_clause(operator, text, ctx)?,
        FieldKind::Edition => build_edition_clause(text, ctx),
        FieldKind::Rarity => build_rarity_clause(operator, text, ctx)?,
        FieldKind::Legality => build_legality_clause(text, ctx)?,
    };
    Ok(format!("({})", clause))
}

fn render_shortcut(name: &str, ctx: &RenderContext, depth: usize) -> Result<String, SearchError> {
    if depth >= MAX_SHORTCUT_DEPTH {
        return Err(SearchError::invalid_value(format!(
            "Shortcut 'is:{}' expands too deeply",
            name
        )));
    }
    let expansion = shortcuts::expression(name)?;
    render_node(expansion, ctx, depth + 1)
}

/// In rules text `~` stands for the card's own name, escaped so `special` characters in the name
/// match literally.
fn with_card_name(
    field: TextField,
    literal: String,
    special: &[char],
    ctx: &RenderContext,
) -> String {
    if field.is_rules_text() && literal.contains('~') {
        let name = format!(
            "' || {} || '",
            sql::escaped_column(&ctx.column("name"), special)
        );
        format!("({})", literal.replace('~', &name))
    } else {
        literal
    }
}

fn build_text_clause(
    field: TextField,
    operator: Operator,
    text: &str,
    ctx: &RenderContext,
) -> String {
    let column = ctx.column(field.column());
    let text = match field {
        TextField::Name => unaccent(text),
        _ => text.to_string(),
    };
    match operator {
        Operator::Bang => format!("{} = {} COLLATE NOCASE", column, sql::quote(&text)),
        _ => format!(
            "{} LIKE {} ESCAPE '\\'",
            column,
            with_card_name(field, sql::like_contains(&text), sql::LIKE_SPECIAL, ctx)
        ),
    }
}

fn build_regex_clause(field: TextField, pattern: &str, ctx: &RenderContext) -> String {
    let literal = sql::quote(&format!("(?i){}", expand_shorthands(pattern)));
    format!(
        "{} REGEXP {}",
        ctx.column(field.column()),
        with_card_name(field, literal, sql::REGEX_SPECIAL, ctx)
    )
}

/// `field IS NOT NULL AND field <op> value`. Negating the whole conjunction also matches rows
/// where the field is null.
fn build_numeric_clause(
    field: NumericField,
    operator: Operator,
    value: &Value,
    ctx: &RenderContext,
) -> Result<String, SearchError> {
    let column = ctx.column(field.column());
    let op = operator.sql_comparison();
    if let Value::Number(n) = value {
        if is_number(n) {
            return Ok(format!("{} IS NOT NULL AND {} {} {}", column, column, op, n));
        }
    }
    match registry::numeric_field(value.as_str()) {
        Some(other) => {
            let other = ctx.column(other.column());
            Ok(format!(
                "{} IS NOT NULL AND {} IS NOT NULL AND {} {} {}",
                column, other, column, op, other
            ))
        }
        None => Err(SearchError::invalid_value(format!(
            "'{}' is not a number",
            value.as_str()
        ))),
    }
}

fn build_mana_clause(
    operator: Operator,
    text: &str,
    ctx: &RenderContext,
) -> Result<String, SearchError> {
    let column = ctx.column("mana_cost");
    let symbols = mana::parse_symbols(text)?;
    let clause = match operator {
        Operator::Eq | Operator::Bang => {
            format!("{} = {}", column, sql::quote(&mana::format_cost(&symbols)))
        }
        _ => mana::grouped_runs(&symbols)
            .iter()
            .map(|run| format!("{} LIKE {} ESCAPE '\\'", column, sql::like_contains(run)))
            .collect::<Vec<_>>()
            .join(" AND "),
    };
    Ok(clause)
}

/// Matches a set code exactly or a set name by substring, in any printing.
fn build_edition_clause(text: &str, ctx: &RenderContext) -> String {
    format!(
        "{} IN (SELECT card_id FROM printing WHERE edition_id IN (SELECT id FROM edition WHERE code = {} COLLATE NOCASE OR name LIKE {} ESCAPE '\\'))",
        ctx.column("id"),
        sql::quote(text),
        sql::like_contains(text)
    )
}

fn build_rarity_clause(
    operator: Operator,
    text: &str,
    ctx: &RenderContext,
) -> Result<String, SearchError> {
    let rarity_id = ctx
        .catalog
        .rarity_id(text)
        .ok_or_else(|| SearchError::invalid_value(format!("Invalid rarity '{}'", text)))?;
    Ok(format!(
        "{} IN (SELECT card_id FROM printing WHERE rarity_id {} {})",
        ctx.column("id"),
        operator.sql_comparison(),
        rarity_id
    ))
}

fn build_legality_clause(text: &str, ctx: &RenderContext) -> Result<String, SearchError> {
    let ids = legality_format_ids(text, ctx.catalog)?
        .iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    Ok(format!(
        "{} IN (SELECT card_id FROM card_legality WHERE format_id IN ({}) AND legality <> 'Banned')",
        ctx.column("id"),
        ids
    ))
}

/// Season-like tokens go through the season resolver, anything else matches format names by prefix.
fn legality_format_ids(term: &str, catalog: &Catalog) -> Result<Vec<i64>, SearchError> {
    let lowered = term.trim().to_lowercase();
    let season_like = lowered.starts_with("pd")
        || lowered.starts_with("penny")
        || lowered.starts_with("season")
        || lowered == "all"
        || (!lowered.is_empty() && lowered.chars().all(|c| c.is_ascii_digit()));
    if season_like {
        let spec = resolve_season_in(term, catalog)?;
        return seasons::format_ids(spec, catalog);
    }

    let ids = catalog.formats_with_prefix(&lowered);
    if ids.is_empty() {
        return Err(SearchError::invalid_value(format!(
            "Invalid format '{}'",
            term
        )));
    }
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shorthand_expansion() {
        assert_eq!(expand_shorthands(r"\sm"), r"\{[0-9WUBRGCXSP/]+\}");
        assert_eq!(expand_shorthands(r"\smp"), r"\{(?:[WUBRG]/)?[WUBRG]/P\}");
        assert_eq!(expand_shorthands(r"\smm"), r"-[0-9X]+/-[0-9X]+");
        assert_eq!(expand_shorthands(r"\spt"), r"[-+]?[0-9X*]+/[-+]?[0-9X*]+");
        assert_eq!(
            expand_shorthands(r"add \sc or \sc"),
            r"add \{(?:[0-9]/)?[WUBRG](?:/[WUBRGP])*\} or \{(?:[0-9]/)?[WUBRG](?:/[WUBRGP])*\}"
        );
    }

    #[test]
    fn test_escaped_backslash_not_expanded() {
        assert_eq!(expand_shorthands(r"\\sm"), r"\\sm");
        assert_eq!(expand_shorthands(r"\s+\d"), r"\s+\d");
    }

    #[test]
    fn test_every_shorthand_is_a_valid_regex() {
        for (name, _) in REGEX_SHORTHANDS {
            assert!(regex_for_validation(&format!("\\{}", name)).is_ok(), "{}", name);
        }
    }

    #[test]
    fn test_shorthands_match_what_they_describe() {
        let pt = regex_for_validation(r"^\spt$").unwrap();
        assert!(pt.is_match("*/*"));
        assert!(pt.is_match("+1/+1"));
        assert!(!pt.is_match("flying"));
        let smp = regex_for_validation(r"\smp").unwrap();
        assert!(smp.is_match("{G/U/P}"));
        assert!(smp.is_match("{B/P}"));
        assert!(!smp.is_match("{B}"));
    }

    #[test]
    fn test_bad_alias_rejected() {
        let catalog = Catalog::builtin();
        let ctx = RenderContext::new(&catalog).with_card_alias("c; --");
        let expression = Expression::predicate(
            FieldKind::TextLike(TextField::Name),
            Operator::Colon,
            Value::PlainString("x".into()),
        );
        assert!(matches!(
            render(&expression, &ctx),
            Err(SearchError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_handmade_number_values_are_checked() {
        let catalog = Catalog::builtin();
        let ctx = RenderContext::new(&catalog);
        let expression = Expression::predicate(
            FieldKind::NumericNullable(NumericField::Cmc),
            Operator::Eq,
            Value::Number("1 OR 1=1".into()),
        );
        assert!(matches!(
            render(&expression, &ctx),
            Err(SearchError::InvalidValue(_))
        ));
    }
}
