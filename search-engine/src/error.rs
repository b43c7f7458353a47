use record_store::StoreError;
use std::fmt;

/// Search request failures. Caller-input problems are detected before any
/// store call; store failures abort the request with no partial results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// A caller-supplied value failed a basic shape check (non-numeric
    /// price bound, unparsable date).
    MalformedQuery(String),
    /// A value parsed but is not acceptable (unknown business type,
    /// inverted range, bad card section).
    InvalidFilterValue(String),
    /// The record store failed mid-evaluation.
    Store(StoreError),
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchError::MalformedQuery(message) => write!(f, "malformed request: {message}"),
            SearchError::InvalidFilterValue(message) => {
                write!(f, "invalid filter value: {message}")
            }
            SearchError::Store(error) => error.fmt(f),
        }
    }
}

impl std::error::Error for SearchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SearchError::Store(error) => Some(error),
            _ => None,
        }
    }
}

impl From<StoreError> for SearchError {
    fn from(error: StoreError) -> Self {
        SearchError::Store(error)
    }
}
