/// Errors produced by ledger client operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("record submission failed: {0}")]
    Submission(String),

    #[error("index query failed: {0}")]
    Query(String),

    #[error("record fetch failed: {0}")]
    Fetch(String),

    /// The node has nothing under the requested index or message ID.
    #[error("not found: {0}")]
    NotFound(String),

    #[error("malformed node response: {0}")]
    Decode(String),
}

pub type LedgerResult<T> = Result<T, LedgerError>;
