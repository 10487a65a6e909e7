use thiserror::Error;
use waybill_ledger::LedgerError;
use waybill_types::{PackageId, TypeError};

#[derive(Debug, Error)]
pub enum AuditError {
    #[error("failed to write audit record to the ledger: {0}")]
    WriteFailure(#[source] LedgerError),

    #[error("failed to read audit history from the ledger: {0}")]
    ReadFailure(#[source] LedgerError),

    #[error("serialization error: {0}")]
    Serialization(#[from] TypeError),
}

pub type AuditResult<T> = Result<T, AuditError>;

/// Why a fetched ledger record was left out of a history.
///
/// Skips are logged, never surfaced to callers.
#[derive(Debug, Error)]
pub enum SkipReason {
    #[error("fetch failed: {0}")]
    FetchFailed(LedgerError),

    #[error("message carries no payload")]
    NoPayload,

    #[error("payload type {0} is not indexation")]
    NotIndexation(u32),

    #[error("payload is not an audit record: {0}")]
    Malformed(TypeError),

    #[error("record belongs to {0}")]
    ForeignPackage(PackageId),
}
