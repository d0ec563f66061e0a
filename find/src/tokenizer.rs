use crate::error::SyntaxError;
use crate::types::{Operator, Token, Value};

fn is_quote(ch: char) -> bool {
    matches!(ch, '"' | '“' | '”')
}

fn ends_plain_value(ch: char) -> bool {
    ch.is_whitespace() || ch == '(' || ch == ')'
}

/// `-?digits(.digits)?`
pub(crate) fn is_number(s: &str) -> bool {
    let unsigned = s.strip_prefix('-').unwrap_or(s);
    let (whole, fraction) = match unsigned.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (unsigned, None),
    };
    let all_digits = |part: &str| !part.is_empty() && part.chars().all(|c| c.is_ascii_digit());
    all_digits(whole) && fraction.map_or(true, all_digits)
}

fn plain_value(raw: String) -> Value {
    if is_number(&raw) {
        Value::Number(raw)
    } else {
        Value::PlainString(raw)
    }
}

struct Tokenizer {
    input: Vec<char>,
    pos: usize,
}

impl Tokenizer {
    fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += 1;
        Some(ch)
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn read_while<F>(&mut self, predicate: F) -> String
    where
        F: Fn(char) -> bool,
    {
        let mut result = String::new();
        while let Some(ch) = self.peek() {
            if predicate(ch) {
                result.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        result
    }

    /// True when a term begins right at `idx` (no whitespace in between).
    fn term_starts_at(&self, idx: usize) -> bool {
        match self.input.get(idx) {
            Some(&ch) => !ch.is_whitespace() && ch != ')',
            None => false,
        }
    }

    fn tokenize(&mut self) -> Result<Vec<Token>, SyntaxError> {
        let mut tokens = Vec::new();

        loop {
            self.skip_whitespace();
            let ch = match self.peek() {
                Some(c) => c,
                None => break,
            };

            match ch {
                '(' => {
                    self.advance();
                    tokens.push(Token::LParen);
                }
                ')' => {
                    self.advance();
                    tokens.push(Token::RParen);
                }
                '-' if self.term_starts_at(self.pos + 1) => {
                    self.advance();
                    tokens.push(Token::Not);
                }
                _ if is_quote(ch) => {
                    let phrase = self.read_quoted()?;
                    tokens.push(Token::BareWord(phrase));
                }
                _ => {
                    let token = self.read_word()?;
                    tokens.push(token);
                }
            }
        }

        Ok(tokens)
    }

    fn read_word(&mut self) -> Result<Token, SyntaxError> {
        if let Some(criterion) = self.read_criterion()? {
            return Ok(criterion);
        }

        let word = self.read_while(|c| !ends_plain_value(c));
        // Connectives only count when they are the whole word, so "orgg" is a name search.
        let token = match word.to_ascii_uppercase().as_str() {
            "OR" => Token::Or,
            "AND" => Token::And,
            "NOT" => Token::Not,
            _ => Token::BareWord(word),
        };
        Ok(token)
    }

    /// Reads `key operator value`, rewinding and returning `None` if the text is not one.
    fn read_criterion(&mut self) -> Result<Option<Token>, SyntaxError> {
        let start = self.pos;
        let key = self.read_while(|c| c.is_ascii_alphabetic());
        if key.is_empty() {
            self.pos = start;
            return Ok(None);
        }

        let operator = match self.read_operator() {
            Some(op) => op,
            None => {
                self.pos = start;
                return Ok(None);
            }
        };

        let value = match self.peek() {
            Some(c) if is_quote(c) => Value::QuotedPhrase(self.read_quoted()?),
            Some('/') => Value::Regex(self.read_regex()?),
            Some(c) if !ends_plain_value(c) => plain_value(self.read_while(|c| !ends_plain_value(c))),
            _ => {
                self.pos = start;
                return Ok(None);
            }
        };

        Ok(Some(Token::Criterion {
            key,
            operator,
            value,
        }))
    }

    fn read_operator(&mut self) -> Option<Operator> {
        for op in Operator::ALL {
            let spelling: Vec<char> = op.as_str().chars().collect();
            let end = self.pos + spelling.len();
            if self.input.get(self.pos..end) == Some(spelling.as_slice()) {
                self.pos = end;
                return Some(op);
            }
        }
        None
    }

    /// Straight and curly quotes are interchangeable; a doubled quote is a literal quote.
    fn read_quoted(&mut self) -> Result<String, SyntaxError> {
        let start = self.pos;
        self.advance();

        let mut phrase = String::new();
        loop {
            match self.advance() {
                None => return Err(SyntaxError::new("Unterminated quoted phrase", start)),
                Some(c) if is_quote(c) => {
                    if self.peek().is_some_and(is_quote) {
                        self.advance();
                        phrase.push('"');
                    } else {
                        return Ok(phrase);
                    }
                }
                Some(c) => phrase.push(c),
            }
        }
    }

    /// Body of `/.../`. `\/` is a literal slash, other escapes pass through to the regex engine.
    fn read_regex(&mut self) -> Result<String, SyntaxError> {
        let start = self.pos;
        self.advance();

        let mut pattern = String::new();
        loop {
            match self.advance() {
                None => return Err(SyntaxError::new("Unterminated regular expression", start)),
                Some('/') => return Ok(pattern),
                Some('\\') => match self.advance() {
                    Some('/') => pattern.push('/'),
                    Some(c) => {
                        pattern.push('\\');
                        pattern.push(c);
                    }
                    None => {
                        return Err(SyntaxError::new("Unterminated regular expression", start))
                    }
                },
                Some(c) => pattern.push(c),
            }
        }
    }
}

pub fn tokenize(query: &str) -> Result<Vec<Token>, SyntaxError> {
    Tokenizer::new(query).tokenize()
}
