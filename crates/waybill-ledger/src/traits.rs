use async_trait::async_trait;
use waybill_types::{IndexKey, MessageId};

use crate::error::LedgerResult;
use crate::payload::LedgerRecord;

/// Boundary to one ledger node.
///
/// Implementations own their connection and are shared read-only between
/// concurrent requests. Nothing here retries.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Write an immutable indexation record tagged with `index`.
    async fn submit_indexed(&self, index: &IndexKey, data: &[u8]) -> LedgerResult<MessageId>;

    /// All message IDs ever tagged with `index`.
    ///
    /// An index with nothing under it is reported either as an empty vector
    /// or as [`LedgerError::NotFound`](crate::LedgerError::NotFound).
    async fn find_by_index(&self, index: &IndexKey) -> LedgerResult<Vec<MessageId>>;

    /// Fetch one record's payload.
    async fn fetch_record(&self, id: &MessageId) -> LedgerResult<LedgerRecord>;

    /// Base URL of the node this client talks to.
    fn node_url(&self) -> &str;
}
