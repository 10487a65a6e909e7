use std::fmt;

use serde::{Deserialize, Serialize};

use crate::package::PackageId;

/// Fixed prefix of every audit-trail index.
pub const INDEX_PREFIX: &str = "AUDIT_TRAIL_";

/// Number of leading package ID characters folded into the index.
pub const INDEXED_ID_CHARS: usize = 20;

/// Ledger index under which all audit records of one package are tagged.
///
/// Derived as [`INDEX_PREFIX`] followed by the first [`INDEXED_ID_CHARS`]
/// characters of the package ID. Two IDs sharing those characters share an
/// index, so readers must still check the `packageID` inside each record.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IndexKey(String);

impl IndexKey {
    /// Derive the index key for a package.
    pub fn derive(package_id: &PackageId) -> Self {
        let head: String = package_id.as_str().chars().take(INDEXED_ID_CHARS).collect();
        Self(format!("{INDEX_PREFIX}{head}"))
    }

    /// Wrap a raw index string as read back from the ledger.
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Hex encoding of the UTF-8 index, as used on the node wire.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0.as_bytes())
    }
}

impl fmt::Debug for IndexKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IndexKey({})", self.0)
    }
}

impl fmt::Display for IndexKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
