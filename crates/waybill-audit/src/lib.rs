//! Audit trail service for Waybill.
//!
//! Translates package operations into ledger operations and owns the
//! indexing convention: every status update is written as one indexation
//! record under `AUDIT_TRAIL_` + the first 20 characters of the package ID,
//! and histories are rebuilt on every read by fetching, decoding, and
//! sorting those records.

pub mod error;
pub mod service;
pub mod tracking;

pub use error::{AuditError, AuditResult, SkipReason};
pub use service::{AuditTrailService, CREATED_STATUS, DEFAULT_INITIAL_LOCATION};
pub use tracking::{explorer_base_from_node, TrackingResult};

// Re-export key types
pub use waybill_types::{AuditRecord, HistoryEntry, IndexKey, MessageId, PackageId};
pub use waybill_ledger::{LedgerClient, LedgerError};
