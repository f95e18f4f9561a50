use thiserror::Error;

/// Main error type for query compilation
#[derive(Error, Debug)]
pub enum SearchqlError {
    /// The input does not match the query grammar
    #[error("Syntax error at position {position}: {message}")]
    Syntax { position: usize, message: String },

    /// The normalized term list re-serialized into text the grammar rejects
    #[error("Normalizer produced unparseable query {canonical:?}: {message}")]
    NormalizerContract { canonical: String, message: String },

    #[error("Query too long: {length} characters, maximum is {max}")]
    QueryTooLong { length: usize, max: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for query compilation
pub type Result<T> = std::result::Result<T, SearchqlError>;

impl SearchqlError {
    pub(crate) fn syntax(position: usize, message: impl Into<String>) -> Self {
        SearchqlError::Syntax {
            position,
            message: message.into(),
        }
    }

    /// Check if the caller can fix this error by changing the query text
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            SearchqlError::Syntax { .. } | SearchqlError::QueryTooLong { .. }
        )
    }

    /// Check if this error indicates a defect inside the compiler itself
    pub fn is_internal(&self) -> bool {
        matches!(self, SearchqlError::NormalizerContract { .. })
    }

    /// Compilation is deterministic, so retrying an unchanged input never helps
    pub fn is_retriable(&self) -> bool {
        false
    }
}
