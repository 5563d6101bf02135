//! Common error types for Carta

use std::fmt;
use thiserror::Error;

/// Common result type for Carta operations
pub type Result<T> = std::result::Result<T, Error>;

/// Deck store operation that failed, reported alongside storage errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOperation {
    Open,
    Schema,
    GetAll,
    Get,
    Save,
    Delete,
    Clear,
    Count,
    Reset,
}

impl StoreOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreOperation::Open => "open",
            StoreOperation::Schema => "schema",
            StoreOperation::GetAll => "get_all",
            StoreOperation::Get => "get",
            StoreOperation::Save => "save",
            StoreOperation::Delete => "delete",
            StoreOperation::Clear => "clear",
            StoreOperation::Count => "count",
            StoreOperation::Reset => "reset",
        }
    }
}

impl fmt::Display for StoreOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered list of rules a deck payload violated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(pub Vec<String>);

impl ValidationErrors {
    pub fn messages(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("; "))
    }
}

/// Common error types across Carta crates
#[derive(Error, Debug)]
pub enum Error {
    /// Deck payload failed structural validation
    #[error("Invalid deck: {0}")]
    Validation(ValidationErrors),

    /// Backing store failure, tagged with the operation that failed
    #[error("Storage error during {operation}: {source}")]
    Storage {
        operation: StoreOperation,
        #[source]
        source: sqlx::Error,
    },

    /// A stored deck whose card data could not be decoded
    #[error("Stored deck {id} is corrupt: {source}")]
    CorruptRecord {
        id: String,
        #[source]
        source: serde_json::Error,
    },

    /// The deck already has an active draw session
    #[error("\"{deck_name}\" is already in play")]
    DuplicateSession { deck_id: String, deck_name: String },

    /// Session position outside the registry
    #[error("No session at index {index} (registry has {len})")]
    SessionIndex { index: usize, len: usize },

    /// Payload text is not JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Wrap a sqlx error with the store operation that produced it
    pub fn storage(operation: StoreOperation, source: sqlx::Error) -> Self {
        Error::Storage { operation, source }
    }
}

/// Tag sqlx failures with the store operation that produced them
pub(crate) trait StorageResultExt<T> {
    fn during(self, operation: StoreOperation) -> Result<T>;
}

impl<T> StorageResultExt<T> for std::result::Result<T, sqlx::Error> {
    fn during(self, operation: StoreOperation) -> Result<T> {
        self.map_err(|source| Error::storage(operation, source))
    }
}
