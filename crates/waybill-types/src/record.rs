use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::package::PackageId;

/// Identifier of a record on the ledger.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(String);

impl MessageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short form (first 8 characters) for logs.
    pub fn short_id(&self) -> &str {
        let end = self.0.char_indices().nth(8).map_or(self.0.len(), |(i, _)| i);
        &self.0[..end]
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One immutable status/location snapshot for a package.
///
/// The JSON encoding of this struct is the payload written to the ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRecord {
    #[serde(with = "crate::timestamp::iso_millis")]
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "packageID")]
    pub package_id: PackageId,
    pub status: String,
    pub location: String,
}

impl AuditRecord {
    /// Build a record stamped with the current time.
    pub fn new(package_id: PackageId, status: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            timestamp: crate::timestamp::now_millis(),
            package_id,
            status: status.into(),
            location: location.into(),
        }
    }

    /// Canonical UTF-8 JSON bytes of this record.
    pub fn to_json_bytes(&self) -> Result<Vec<u8>, TypeError> {
        serde_json::to_vec(self).map_err(|e| TypeError::Serialization(e.to_string()))
    }

    /// Decode a record from ledger payload bytes.
    pub fn from_json_bytes(bytes: &[u8]) -> Result<Self, TypeError> {
        serde_json::from_slice(bytes).map_err(|e| TypeError::Deserialization(e.to_string()))
    }
}

/// An audit record as it appears in a reconstructed history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(rename = "messageId")]
    pub message_id: MessageId,
    #[serde(flatten)]
    pub record: AuditRecord,
}
