use crate::builder::regex_for_validation;
use crate::colors::{ColorSetQuery, ColorTarget};
use crate::error::SearchError;
use crate::mana;
use crate::registry;
use crate::shortcuts;
use crate::types::{Expression, FieldKind, Operator, TextField, Token, Value};

/// Deepest parenthesis nesting accepted before the query is rejected.
const MAX_DEPTH: usize = 64;

/// Search terms plus negations accepted in one query. Longer queries build trees deep enough to
/// exhaust a worker thread's stack when rendered or dropped.
const MAX_TERMS: usize = 500;

/// Parse output: the expression plus non-fatal warnings about ignored syntax.
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed {
    pub expression: Expression,
    pub warnings: Vec<String>,
}

fn name_search(text: String) -> Expression {
    Expression::predicate(
        FieldKind::TextLike(TextField::Name),
        Operator::Colon,
        Value::PlainString(text),
    )
}

/// Joins two optional sides. A side is `None` when everything in it was ignored.
fn combine(
    left: Option<Expression>,
    right: Option<Expression>,
    join: fn(Expression, Expression) -> Expression,
) -> Option<Expression> {
    match (left, right) {
        (Some(l), Some(r)) => Some(join(l, r)),
        (Some(e), None) | (None, Some(e)) => Some(e),
        (None, None) => None,
    }
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
    terms: usize,
    warnings: Vec<String>,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            pos: 0,
            depth: 0,
            terms: 0,
            warnings: Vec::new(),
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    fn primary_ahead(&self) -> bool {
        matches!(
            self.peek(),
            Some(Token::LParen | Token::Criterion { .. } | Token::BareWord(_))
        )
    }

    fn term_ahead(&self) -> bool {
        self.primary_ahead() || matches!(self.peek(), Some(Token::Not))
    }

    fn parse(mut self) -> Result<Parsed, SearchError> {
        if self.tokens.is_empty() {
            return Err(SearchError::invalid_search("Empty search"));
        }

        let expression = self.parse_or()?;
        if self.peek().is_some() {
            return Err(SearchError::invalid_search(
                "Found ')' without a matching '('",
            ));
        }

        match expression {
            Some(expression) => Ok(Parsed {
                expression,
                warnings: self.warnings,
            }),
            None => Err(SearchError::invalid_search(
                "Nothing left to search for after ignoring unsupported syntax",
            )),
        }
    }

    // OrExpr := AndExpr ("OR" AndExpr)*
    fn parse_or(&mut self) -> Result<Option<Expression>, SearchError> {
        let mut left = self.parse_and()?;
        while matches!(self.peek(), Some(Token::Or)) {
            self.advance();
            if !self.term_ahead() {
                return Err(SearchError::invalid_search(
                    "OR needs a search term after it",
                ));
            }
            let right = self.parse_and()?;
            left = combine(left, right, Expression::or);
        }
        Ok(left)
    }

    // AndExpr := Term (("AND")? Term)*
    fn parse_and(&mut self) -> Result<Option<Expression>, SearchError> {
        if !self.term_ahead() {
            let msg = match self.peek() {
                Some(Token::Or) => "OR needs a search term before it",
                Some(Token::And) => "AND needs a search term before it",
                Some(Token::RParen) => "Found ')' without a matching '('",
                _ => "Expected a search term",
            };
            return Err(SearchError::invalid_search(msg));
        }

        let mut left = self.parse_term()?;
        loop {
            if matches!(self.peek(), Some(Token::And)) {
                self.advance();
                if !self.term_ahead() {
                    return Err(SearchError::invalid_search(
                        "AND needs a search term after it",
                    ));
                }
            } else if !self.term_ahead() {
                break;
            }
            let right = self.parse_term()?;
            left = combine(left, right, Expression::and);
        }
        Ok(left)
    }

    // Term := ("-" | "NOT")* Primary
    fn parse_term(&mut self) -> Result<Option<Expression>, SearchError> {
        let mut negations = 0;
        while matches!(self.peek(), Some(Token::Not)) {
            self.advance();
            negations += 1;
        }
        self.terms += 1 + negations;
        if self.terms > MAX_TERMS {
            return Err(SearchError::invalid_search(format!(
                "Too many search terms, the limit is {}",
                MAX_TERMS
            )));
        }
        if negations > 0 && !self.primary_ahead() {
            return Err(SearchError::invalid_search(
                "NOT needs a search term after it",
            ));
        }

        let mut expression = self.parse_primary()?;
        for _ in 0..negations {
            expression = expression.map(Expression::negate);
        }
        Ok(expression)
    }

    fn parse_primary(&mut self) -> Result<Option<Expression>, SearchError> {
        match self.advance() {
            Some(Token::LParen) => {
                if matches!(self.peek(), Some(Token::RParen)) {
                    return Err(SearchError::invalid_search("Empty parentheses"));
                }
                self.depth += 1;
                if self.depth > MAX_DEPTH {
                    return Err(SearchError::invalid_search("Too many nested parentheses"));
                }
                let inner = self.parse_or()?;
                self.depth -= 1;
                match self.advance() {
                    Some(Token::RParen) => Ok(inner),
                    _ => Err(SearchError::invalid_search("Missing ')' to close '('")),
                }
            }
            Some(Token::Criterion {
                key,
                operator,
                value,
            }) => self.parse_criterion(key, operator, value),
            Some(Token::BareWord(word)) => Ok(Some(name_search(word))),
            _ => Err(SearchError::invalid_search("Expected a search term")),
        }
    }

    fn parse_criterion(
        &mut self,
        key: String,
        operator: Operator,
        value: Value,
    ) -> Result<Option<Expression>, SearchError> {
        let kind = match registry::lookup(&key) {
            Some(kind) => kind,
            None if registry::is_unsupported(&key) => {
                let raw = format!("{}{}{}", key, operator, value);
                tracing::warn!(criterion = %raw, "Ignoring unsupported search syntax");
                self.warnings
                    .push(format!("Ignored unsupported Scryfall syntax '{}'", raw));
                return Ok(None);
            }
            None => {
                // Unknown keys degrade to a name search on the text as typed.
                let raw = format!("{}{}{}", key, operator, value.as_str());
                return Ok(Some(name_search(raw)));
            }
        };

        let kind = if value.is_regex() {
            kind.as_regex().ok_or_else(|| {
                SearchError::invalid_value(format!(
                    "'{}' does not support regular expressions",
                    key
                ))
            })?
        } else {
            kind
        };

        if !kind.accepts(operator) {
            return Err(SearchError::invalid_value(format!(
                "'{}' does not support the '{}' operator",
                key, operator
            )));
        }

        validate_value(&key, kind, operator, &value)?;
        Ok(Some(Expression::predicate(kind, operator, value)))
    }
}

/// Value-shape checks that need no catalog. Catalog lookups (formats, seasons, rarities) happen
/// when rendering.
fn validate_value(
    key: &str,
    kind: FieldKind,
    operator: Operator,
    value: &Value,
) -> Result<(), SearchError> {
    let text = value.as_str();
    match kind {
        FieldKind::ColorSet => {
            ColorSetQuery::parse(ColorTarget::Colors, operator, text)?;
        }
        FieldKind::ColorIdentitySet => {
            ColorSetQuery::parse(ColorTarget::Identity, operator, text)?;
        }
        FieldKind::NumericNullable(_) => {
            if !matches!(value, Value::Number(_)) && registry::numeric_field(text).is_none() {
                return Err(SearchError::invalid_value(format!(
                    "'{}' is not a number, try something like '{}>2'",
                    text, key
                )));
            }
        }
        FieldKind::RegexLike(_) => {
            regex_for_validation(text).map_err(|err| {
                SearchError::invalid_value(format!("Invalid regular expression /{}/: {}", text, err))
            })?;
        }
        FieldKind::ManaCost => {
            mana::parse_symbols(text)?;
        }
        FieldKind::BooleanShortcut => {
            if shortcuts::canonical_name(text).is_none() {
                return Err(SearchError::invalid_value(format!(
                    "Unknown shortcut 'is:{}'",
                    text
                )));
            }
        }
        FieldKind::Edition | FieldKind::Rarity | FieldKind::Legality => {
            if text.trim().is_empty() {
                return Err(SearchError::invalid_value(format!(
                    "'{}' needs a value",
                    key
                )));
            }
        }
        FieldKind::TextLike(_) | FieldKind::TypeLine => {}
    }
    Ok(())
}

pub fn parse(tokens: Vec<Token>) -> Result<Expression, SearchError> {
    parse_with_warnings(tokens).map(|parsed| parsed.expression)
}

pub fn parse_with_warnings(tokens: Vec<Token>) -> Result<Parsed, SearchError> {
    Parser::new(tokens).parse()
}
