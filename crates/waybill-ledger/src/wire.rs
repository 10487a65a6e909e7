//! JSON bodies of the node REST API (`/api/v1`).
//!
//! Index strings and data travel hex-encoded.

use serde::{Deserialize, Serialize};
use waybill_types::IndexKey;

use crate::error::{LedgerError, LedgerResult};
use crate::payload::{Payload, INDEXATION_PAYLOAD_TYPE};

pub const MESSAGES_PATH: &str = "/api/v1/messages";
pub const HEALTH_PATH: &str = "/health";

/// Every node response wraps its body in `{"data": ...}`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WirePayload {
    #[serde(rename = "type")]
    pub kind: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

impl WirePayload {
    pub fn indexation(index: &IndexKey, data: &[u8]) -> Self {
        Self {
            kind: INDEXATION_PAYLOAD_TYPE,
            index: Some(index.to_hex()),
            data: Some(hex::encode(data)),
        }
    }

    /// Decode into a domain payload, hex-decoding indexation fields.
    pub fn into_payload(self) -> LedgerResult<Payload> {
        if self.kind != INDEXATION_PAYLOAD_TYPE {
            return Ok(Payload::Other { kind: self.kind });
        }
        let index_hex = self
            .index
            .ok_or_else(|| LedgerError::Decode("indexation payload without index".into()))?;
        let index_bytes =
            hex::decode(&index_hex).map_err(|e| LedgerError::Decode(format!("index: {e}")))?;
        let data = match self.data {
            Some(data_hex) => {
                hex::decode(&data_hex).map_err(|e| LedgerError::Decode(format!("data: {e}")))?
            }
            None => Vec::new(),
        };
        Ok(Payload::Indexation {
            index: IndexKey::from_raw(String::from_utf8_lossy(&index_bytes).into_owned()),
            data,
        })
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SubmitMessageRequest {
    pub payload: WirePayload,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitMessageResponse {
    pub message_id: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagesByIndexResponse {
    pub index: String,
    #[serde(default)]
    pub max_results: u32,
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub message_ids: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    #[serde(default)]
    pub payload: Option<WirePayload>,
}
