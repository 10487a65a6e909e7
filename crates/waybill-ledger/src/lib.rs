//! Ledger client adapter for Waybill.
//!
//! The ledger is used purely as an append-only, publicly queryable log of
//! indexed data records. This crate provides:
//! - The `LedgerClient` trait boundary consumed by the audit trail service
//! - `InMemoryLedger` for tests, local demos, and embedding
//! - `HttpLedgerClient` speaking a node's REST API (hex-encoded indexation payloads)

pub mod error;
pub mod http;
pub mod memory;
pub mod payload;
pub mod traits;
pub mod wire;

pub use error::{LedgerError, LedgerResult};
pub use http::HttpLedgerClient;
pub use memory::InMemoryLedger;
pub use payload::{LedgerRecord, Payload, INDEXATION_PAYLOAD_TYPE};
pub use traits::LedgerClient;
