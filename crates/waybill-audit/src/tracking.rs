use serde::{Deserialize, Serialize};
use waybill_types::{AuditRecord, MessageId};

/// Outcome of writing one audit record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingResult {
    pub message_id: MessageId,
    pub data: AuditRecord,
    pub explorer_url: String,
}

/// Explorer base URL conventionally served next to a node: the first
/// `api` in the node URL becomes `explorer`.
pub fn explorer_base_from_node(node_url: &str) -> String {
    node_url
        .trim_end_matches('/')
        .replacen("api", "explorer", 1)
}

/// Human-viewable link to one message.
pub fn explorer_link(explorer_base: &str, message_id: &MessageId) -> String {
    format!("{}/message/{}", explorer_base.trim_end_matches('/'), message_id)
}
