/// Malformed token stream: unterminated quote or regex.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub message: String,
    /// Character offset into the query where the bad construct starts
    pub position: usize,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, position: usize) -> Self {
        Self {
            message: message.into(),
            position,
        }
    }
}

impl std::fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at character {}", self.message, self.position)
    }
}

impl std::error::Error for SyntaxError {}

/// Error types for tokenizing, parsing and rendering a search
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    Syntax(SyntaxError),
    InvalidSearch(String),
    InvalidValue(String),
    InvalidArgument(String),
}

impl SearchError {
    pub(crate) fn invalid_search(msg: impl Into<String>) -> Self {
        SearchError::InvalidSearch(msg.into())
    }

    pub(crate) fn invalid_value(msg: impl Into<String>) -> Self {
        SearchError::InvalidValue(msg.into())
    }
}

impl From<SyntaxError> for SearchError {
    fn from(err: SyntaxError) -> Self {
        SearchError::Syntax(err)
    }
}

impl std::fmt::Display for SearchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchError::Syntax(err) => write!(f, "Syntax error: {}", err),
            SearchError::InvalidSearch(msg) => write!(f, "Invalid search: {}", msg),
            SearchError::InvalidValue(msg) => write!(f, "Invalid value: {}", msg),
            SearchError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
        }
    }
}

impl std::error::Error for SearchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SearchError::Syntax(err) => Some(err),
            _ => None,
        }
    }
}
