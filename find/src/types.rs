/// Lexical and syntax tree types for the card search language

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Colon, // key:value
    Eq,    // key=value
    Bang,  // key!value
    Gt,    // key>value
    Lt,    // key<value
    Gte,   // key>=value
    Lte,   // key<=value
}

impl Operator {
    /// Longest spellings first so `<=` wins over `<`.
    pub(crate) const ALL: [Operator; 7] = [
        Operator::Lte,
        Operator::Gte,
        Operator::Colon,
        Operator::Bang,
        Operator::Lt,
        Operator::Gt,
        Operator::Eq,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Colon => ":",
            Operator::Eq => "=",
            Operator::Bang => "!",
            Operator::Gt => ">",
            Operator::Lt => "<",
            Operator::Gte => ">=",
            Operator::Lte => "<=",
        }
    }

    /// SQL comparison for ordered fields. `:` means equality and `!` inequality.
    pub fn sql_comparison(&self) -> &'static str {
        match self {
            Operator::Colon | Operator::Eq => "=",
            Operator::Bang => "<>",
            Operator::Gt => ">",
            Operator::Lt => "<",
            Operator::Gte => ">=",
            Operator::Lte => "<=",
        }
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    PlainString(String),
    QuotedPhrase(String),
    Regex(String),
    Number(String), // raw text as typed, e.g. "2" or "-1" or "2.5"
}

impl Value {
    pub fn as_str(&self) -> &str {
        match self {
            Value::PlainString(s) | Value::QuotedPhrase(s) | Value::Regex(s) | Value::Number(s) => s,
        }
    }

    pub fn is_regex(&self) -> bool {
        matches!(self, Value::Regex(_))
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::PlainString(s) | Value::Number(s) => f.write_str(s),
            Value::QuotedPhrase(s) => write!(f, "\"{}\"", s.replace('"', "\"\"")),
            Value::Regex(s) => write!(f, "/{}/", s.replace('/', "\\/")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    LParen,
    RParen,
    Or,
    And,
    Not,
    Criterion {
        key: String,
        operator: Operator,
        value: Value,
    },
    BareWord(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericField {
    Cmc,
    Power,
    Toughness,
    Loyalty,
}

impl NumericField {
    pub fn column(&self) -> &'static str {
        match self {
            NumericField::Cmc => "cmc",
            NumericField::Power => "power",
            NumericField::Toughness => "toughness",
            NumericField::Loyalty => "loyalty",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextField {
    Name,
    Oracle,
    FullOracle,
    TypeLine,
    ManaCost,
    Layout,
}

impl TextField {
    pub fn column(&self) -> &'static str {
        match self {
            TextField::Name => "name_ascii",
            TextField::Oracle => "search_text",
            TextField::FullOracle => "oracle_text",
            TextField::TypeLine => "type_line",
            TextField::ManaCost => "mana_cost",
            TextField::Layout => "layout",
        }
    }

    /// Fields where `~` stands for the card's own name.
    pub fn is_rules_text(&self) -> bool {
        matches!(self, TextField::Oracle | TextField::FullOracle)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    ColorSet,
    ColorIdentitySet,
    NumericNullable(NumericField),
    TextLike(TextField),
    RegexLike(TextField),
    TypeLine,
    Legality,
    BooleanShortcut,
    ManaCost,
    Edition,
    Rarity,
}

impl FieldKind {
    /// Operators this kind accepts.
    pub fn accepts(&self, operator: Operator) -> bool {
        use Operator::*;
        match self {
            FieldKind::TextLike(_) | FieldKind::TypeLine => matches!(operator, Colon | Eq | Bang),
            FieldKind::RegexLike(_) => matches!(operator, Colon | Eq),
            FieldKind::ManaCost => matches!(operator, Colon | Eq | Bang),
            FieldKind::Edition | FieldKind::Legality | FieldKind::BooleanShortcut => {
                matches!(operator, Colon | Eq)
            }
            FieldKind::ColorSet
            | FieldKind::ColorIdentitySet
            | FieldKind::NumericNullable(_)
            | FieldKind::Rarity => true,
        }
    }

    /// The regex variant of a text-ish kind, if it has one.
    pub fn as_regex(&self) -> Option<FieldKind> {
        match self {
            FieldKind::TextLike(field) | FieldKind::RegexLike(field) => {
                Some(FieldKind::RegexLike(*field))
            }
            FieldKind::TypeLine => Some(FieldKind::RegexLike(TextField::TypeLine)),
            FieldKind::ManaCost => Some(FieldKind::RegexLike(TextField::ManaCost)),
            _ => None,
        }
    }
}

/// Boolean expression over typed predicates. Parent owns children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expression {
    Predicate {
        kind: FieldKind,
        operator: Operator,
        value: Value,
    },
    And(Box<Expression>, Box<Expression>),
    Or(Box<Expression>, Box<Expression>),
    Not(Box<Expression>),
}

impl Expression {
    pub fn predicate(kind: FieldKind, operator: Operator, value: Value) -> Self {
        Expression::Predicate {
            kind,
            operator,
            value,
        }
    }

    pub fn and(left: Expression, right: Expression) -> Self {
        Expression::And(Box::new(left), Box::new(right))
    }

    pub fn or(left: Expression, right: Expression) -> Self {
        Expression::Or(Box::new(left), Box::new(right))
    }

    pub fn negate(inner: Expression) -> Self {
        Expression::Not(Box::new(inner))
    }
}
