use thiserror::Error;

/// Failures surfaced by ledger operations.
///
/// None of these are fatal; the REST layer turns each one into a status
/// message and the ledger stays usable.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// A required field was empty; nothing was changed
    #[error("{0}")]
    Validation(String),
    /// The key-value store could not be read or written
    #[error("Storage failure: {0}")]
    Persistence(String),
    /// The CSV input was unusable; nothing was imported
    #[error("Failed to parse CSV: {0}")]
    Parse(String),
    /// Email settings are incomplete
    #[error("Email settings incomplete, missing: {}", .0.join(", "))]
    Configuration(Vec<&'static str>),
}

/// Failure of a single receipt send
#[derive(Debug, Error)]
pub enum SendError {
    #[error("Email sender not initialized with a public key")]
    NotInitialized,
    #[error("Email request failed: {0}")]
    Http(String),
    #[error("Email provider rejected the request ({status}): {body}")]
    Rejected { status: u16, body: String },
}
