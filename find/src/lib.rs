//! Compiler for the card search language: `c:rg t:creature -o:flying f:pd` in, a parenthesized
//! SQLite boolean fragment out.

mod builder;
pub mod catalog;
pub mod colors;
mod error;
pub mod mana;
mod names;
mod oracle;
mod parser;
pub mod registry;
pub mod seasons;
pub mod shortcuts;
mod sql;
mod tokenizer;
mod types;

pub use builder::{expand_shorthands, render, RenderContext, DEFAULT_CARD_ALIAS};
pub use catalog::{Catalog, CatalogHandle, NamedId};
pub use error::{SearchError, SyntaxError};
pub use names::unaccent;
pub use oracle::strip_reminder_text;
pub use parser::{parse, parse_with_warnings, Parsed};
pub use seasons::{format_ids, resolve_season, resolve_season_in, season_code, season_name, SeasonSpec};
pub use tokenizer::tokenize;
pub use types::{Expression, FieldKind, NumericField, Operator, TextField, Token, Value};

/// Compiles `query` against the process-wide catalog with the default `c` card alias.
/// Returns the WHERE fragment and any warnings about ignored syntax.
pub fn compile(query: &str) -> Result<(String, Vec<String>), SearchError> {
    let catalog = catalog::global().load();
    compile_with(query, &RenderContext::new(&catalog))
}

pub fn compile_with(
    query: &str,
    ctx: &RenderContext,
) -> Result<(String, Vec<String>), SearchError> {
    let tokens = tokenize(query)?;
    let parsed = parse_with_warnings(tokens)?;
    let fragment = render(&parsed.expression, ctx)?;
    tracing::debug!(query, fragment = %fragment, "Compiled search");
    Ok((fragment, parsed.warnings))
}
