use thiserror::Error;

/// Errors surfaced by the store, the service and ingestion.
///
/// `Validation` and `NotFound` are client errors; the rest are
/// infrastructure failures whose details stay in the logs.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoverageError {
    #[error("Invalid input: {message}")]
    Validation { message: String },

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: i64 },

    #[error("Store call '{operation}' timed out after {after_ms} ms")]
    Timeout { operation: String, after_ms: u64 },

    #[error("Database error: {0}")]
    Database(String),
}

impl CoverageError {
    pub fn validation(message: impl Into<String>) -> Self {
        CoverageError::Validation {
            message: message.into(),
        }
    }

    pub fn not_found(entity: &'static str, id: i64) -> Self {
        CoverageError::NotFound { entity, id }
    }

    /// True for errors the caller can correct (bad input, stale reference).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            CoverageError::Validation { .. } | CoverageError::NotFound { .. }
        )
    }

    /// Message safe to hand back to a caller.
    pub fn public_message(&self) -> String {
        if self.is_client_error() {
            self.to_string()
        } else {
            "Internal error".to_string()
        }
    }
}

impl From<rusqlite::Error> for CoverageError {
    fn from(e: rusqlite::Error) -> Self {
        CoverageError::Database(e.to_string())
    }
}
