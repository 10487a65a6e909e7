//! Foundation types for Waybill.
//!
//! This crate provides the identifiers and records shared by every other
//! Waybill crate.
//!
//! # Key Types
//!
//! - [`PackageId`] — Time-based package identifier with a random suffix
//! - [`IndexKey`] — Ledger index under which a package's records are tagged
//! - [`AuditRecord`] — One immutable status/location snapshot for a package
//! - [`HistoryEntry`] — An audit record together with its ledger message ID
//! - [`MessageId`] — Identifier of a record on the ledger

pub mod error;
pub mod index;
pub mod package;
pub mod record;
pub mod timestamp;

pub use error::TypeError;
pub use index::{IndexKey, INDEXED_ID_CHARS, INDEX_PREFIX};
pub use package::PackageId;
pub use record::{AuditRecord, HistoryEntry, MessageId};
