//! Mana cost symbol parser.
//!
//! Accepts costs with or without braces (`2WW`, `{2}{W}{W}`), hybrid (`W/U`, `2/W`), Phyrexian
//! (`W/P`, `G/U/P`), half (`HW`), snow (`S`) and variable (`X`, `Y`, `Z`) symbols.

use crate::error::SearchError;

#[derive(Debug, Clone, Copy, PartialEq)]
enum State {
    Start,
    Digit,
    Color,
    Slash,
    Half,
    Hybrid,
}

fn is_color(c: char) -> bool {
    matches!(c, 'W' | 'U' | 'B' | 'R' | 'G' | 'C' | 'S')
}

fn is_variable(c: char) -> bool {
    matches!(c, 'X' | 'Y' | 'Z')
}

struct ManaParser<'a> {
    cost: &'a str,
    symbols: Vec<String>,
    current: String,
}

impl<'a> ManaParser<'a> {
    fn new(cost: &'a str) -> Self {
        Self {
            cost,
            symbols: Vec::new(),
            current: String::new(),
        }
    }

    fn unexpected(&self, c: char, expected: &str) -> SearchError {
        SearchError::invalid_value(format!(
            "Invalid mana cost '{}': expected {}, found '{}'",
            self.cost, expected, c
        ))
    }

    fn finish_symbol(&mut self) {
        if !self.current.is_empty() {
            self.symbols.push(std::mem::take(&mut self.current));
        }
    }

    fn begin(&mut self, c: char) -> Result<State, SearchError> {
        self.finish_symbol();
        if c.is_ascii_digit() {
            self.current.push(c);
            Ok(State::Digit)
        } else if is_color(c) {
            self.current.push(c);
            Ok(State::Color)
        } else if is_variable(c) {
            self.symbols.push(c.to_string());
            Ok(State::Start)
        } else if c == 'H' {
            self.current.push(c);
            Ok(State::Half)
        } else {
            Err(self.unexpected(c, "a digit, color, X/Y/Z or H"))
        }
    }

    fn step(&mut self, state: State, c: char) -> Result<State, SearchError> {
        match state {
            State::Digit if c.is_ascii_digit() => {
                self.current.push(c);
                Ok(State::Digit)
            }
            State::Digit | State::Color | State::Hybrid if c == '/' => {
                self.current.push(c);
                Ok(State::Slash)
            }
            State::Slash if c == 'P' => {
                self.current.push(c);
                self.finish_symbol();
                Ok(State::Start)
            }
            State::Slash if is_color(c) => {
                self.current.push(c);
                Ok(State::Hybrid)
            }
            State::Slash => Err(self.unexpected(c, "a color or P after '/'")),
            State::Half if is_color(c) => {
                self.current.push(c);
                self.finish_symbol();
                Ok(State::Start)
            }
            State::Half => Err(self.unexpected(c, "a color after H")),
            State::Start | State::Digit | State::Color | State::Hybrid => self.begin(c),
        }
    }

    fn parse(mut self) -> Result<Vec<String>, SearchError> {
        let upper = self.cost.to_uppercase();
        let mut state = State::Start;
        for c in upper.chars().filter(|c| *c != '{' && *c != '}') {
            state = self.step(state, c)?;
        }
        if matches!(state, State::Slash | State::Half) {
            return Err(SearchError::invalid_value(format!(
                "Invalid mana cost '{}': incomplete symbol '{}'",
                self.cost, self.current
            )));
        }
        self.finish_symbol();
        if self.symbols.is_empty() {
            return Err(SearchError::invalid_value(format!(
                "Invalid mana cost '{}': no mana symbols",
                self.cost
            )));
        }
        Ok(self.symbols)
    }
}

/// Splits a cost into symbols without braces: `2WW` → `["2", "W", "W"]`.
pub fn parse_symbols(cost: &str) -> Result<Vec<String>, SearchError> {
    ManaParser::new(cost).parse()
}

/// `["2", "W", "W"]` → `{2}{W}{W}`
pub fn format_cost(symbols: &[String]) -> String {
    symbols.iter().map(|s| format!("{{{}}}", s)).collect()
}

/// Identical symbols grouped in first-seen order, so `UU` checks for `{U}{U}` and not `{U}` twice.
pub fn grouped_runs(symbols: &[String]) -> Vec<String> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for symbol in symbols {
        match counts.iter_mut().find(|(s, _)| *s == symbol.as_str()) {
            Some((_, n)) => *n += 1,
            None => counts.push((symbol.as_str(), 1)),
        }
    }
    counts
        .into_iter()
        .map(|(symbol, n)| format!("{{{}}}", symbol).repeat(n))
        .collect()
}
