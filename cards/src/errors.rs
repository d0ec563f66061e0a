use pd_find::SearchError;

/// Error types for the card store
#[derive(Debug)]
pub enum CardsError {
    Search(SearchError),
    Database(sqlx::Error),
    Io(std::io::Error),
    Json(serde_json::Error),
    Import(String),
}

impl From<SearchError> for CardsError {
    fn from(err: SearchError) -> Self {
        CardsError::Search(err)
    }
}

impl From<sqlx::Error> for CardsError {
    fn from(err: sqlx::Error) -> Self {
        CardsError::Database(err)
    }
}

impl From<std::io::Error> for CardsError {
    fn from(err: std::io::Error) -> Self {
        CardsError::Io(err)
    }
}

impl From<serde_json::Error> for CardsError {
    fn from(err: serde_json::Error) -> Self {
        CardsError::Json(err)
    }
}

impl std::fmt::Display for CardsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CardsError::Search(err) => write!(f, "{}", err),
            CardsError::Database(err) => write!(f, "Database error: {}", err),
            CardsError::Io(err) => write!(f, "IO error: {}", err),
            CardsError::Json(err) => write!(f, "JSON error: {}", err),
            CardsError::Import(msg) => write!(f, "Import error: {}", msg),
        }
    }
}

impl std::error::Error for CardsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CardsError::Search(err) => Some(err),
            CardsError::Database(err) => Some(err),
            CardsError::Io(err) => Some(err),
            CardsError::Json(err) => Some(err),
            CardsError::Import(_) => None,
        }
    }
}
