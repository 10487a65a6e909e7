//! HTTP ledger client.
//!
//! Talks to one node's REST API over a single long-lived connection pool.
//! Records are plain indexation messages: no signing, no fees, no retry.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use waybill_types::{IndexKey, MessageId};

use crate::error::{LedgerError, LedgerResult};
use crate::payload::LedgerRecord;
use crate::traits::LedgerClient;
use crate::wire::{
    Envelope, MessageResponse, MessagesByIndexResponse, SubmitMessageRequest,
    SubmitMessageResponse, WirePayload, HEALTH_PATH, MESSAGES_PATH,
};

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Ledger client backed by a node's REST API.
pub struct HttpLedgerClient {
    base_url: String,
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpLedgerClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
            timeout,
        }
    }

    /// Probe the node's health endpoint.
    pub async fn health(&self) -> bool {
        let url = format!("{}{}", self.base_url, HEALTH_PATH);
        match self.client.get(&url).timeout(self.timeout).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                tracing::warn!(node = %self.base_url, error = %e, "node health probe failed");
                false
            }
        }
    }

    fn messages_url(&self) -> String {
        format!("{}{}", self.base_url, MESSAGES_PATH)
    }
}

async fn read_data<T: DeserializeOwned>(response: reqwest::Response) -> LedgerResult<T> {
    let body: Envelope<T> = response
        .json()
        .await
        .map_err(|e| LedgerError::Decode(format!("failed to parse node response: {e}")))?;
    Ok(body.data)
}

async fn status_error(response: reqwest::Response) -> String {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    format!("node responded with status {status}: {text}")
}

#[async_trait]
impl LedgerClient for HttpLedgerClient {
    async fn submit_indexed(&self, index: &IndexKey, data: &[u8]) -> LedgerResult<MessageId> {
        let body = SubmitMessageRequest {
            payload: WirePayload::indexation(index, data),
        };

        let response = self
            .client
            .post(self.messages_url())
            .json(&body)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| LedgerError::Submission(format!("HTTP request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(LedgerError::Submission(status_error(response).await));
        }

        let submitted: SubmitMessageResponse = read_data(response).await?;
        let id = MessageId::new(submitted.message_id);
        tracing::info!(index = %index, message_id = id.as_str(), "indexation message submitted");
        Ok(id)
    }

    async fn find_by_index(&self, index: &IndexKey) -> LedgerResult<Vec<MessageId>> {
        let response = self
            .client
            .get(self.messages_url())
            .query(&[("index", index.to_hex())])
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| LedgerError::Query(format!("HTTP request failed: {e}")))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(LedgerError::NotFound(index.to_string()));
        }
        if !response.status().is_success() {
            return Err(LedgerError::Query(status_error(response).await));
        }

        let found: MessagesByIndexResponse = read_data(response).await?;
        tracing::debug!(index = %index, count = found.message_ids.len(), "index lookup complete");
        Ok(found.message_ids.into_iter().map(MessageId::new).collect())
    }

    async fn fetch_record(&self, id: &MessageId) -> LedgerResult<LedgerRecord> {
        let url = format!("{}/{}", self.messages_url(), id);

        let response = self
            .client
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| LedgerError::Fetch(format!("HTTP request failed: {e}")))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(LedgerError::NotFound(id.to_string()));
        }
        if !response.status().is_success() {
            return Err(LedgerError::Fetch(status_error(response).await));
        }

        let message: MessageResponse = read_data(response).await?;
        let payload = message.payload.map(WirePayload::into_payload).transpose()?;
        Ok(LedgerRecord {
            id: id.clone(),
            payload,
        })
    }

    fn node_url(&self) -> &str {
        &self.base_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::net::SocketAddr;
    use std::sync::{Arc, Mutex};

    use axum::extract::{Path, Query, State};
    use axum::http::StatusCode;
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::{json, Value};

    use crate::payload::Payload;

    /// Minimal stand-in for a node: stores submitted payloads verbatim.
    #[derive(Clone, Default)]
    struct MockNode {
        messages: Arc<Mutex<Vec<(String, WirePayload)>>>,
        fail_queries: bool,
    }

    async fn post_message(
        State(node): State<MockNode>,
        Json(req): Json<SubmitMessageRequest>,
    ) -> Json<Value> {
        let mut messages = node.messages.lock().unwrap();
        let id = format!("{:064x}", messages.len() + 1);
        messages.push((id.clone(), req.payload));
        Json(json!({ "data": { "messageId": id } }))
    }

    async fn find_messages(
        State(node): State<MockNode>,
        Query(params): Query<HashMap<String, String>>,
    ) -> Result<Json<Value>, StatusCode> {
        if node.fail_queries {
            return Err(StatusCode::SERVICE_UNAVAILABLE);
        }
        let index = params.get("index").cloned().unwrap_or_default();
        let ids: Vec<String> = node
            .messages
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, p)| p.index.as_deref() == Some(index.as_str()))
            .map(|(id, _)| id.clone())
            .collect();
        if ids.is_empty() {
            return Err(StatusCode::NOT_FOUND);
        }
        Ok(Json(json!({
            "data": { "index": index, "maxResults": 1000, "count": ids.len(), "messageIds": ids }
        })))
    }

    async fn get_message(
        State(node): State<MockNode>,
        Path(id): Path<String>,
    ) -> Result<Json<Value>, StatusCode> {
        let messages = node.messages.lock().unwrap();
        let (_, payload) = messages
            .iter()
            .find(|(mid, _)| *mid == id)
            .ok_or(StatusCode::NOT_FOUND)?;
        Ok(Json(json!({
            "data": { "networkId": "1", "parentMessageIds": [], "payload": payload, "nonce": "0" }
        })))
    }

    async fn spawn_node(node: MockNode) -> SocketAddr {
        let app = Router::new()
            .route("/health", get(|| async { StatusCode::OK }))
            .route("/api/v1/messages", post(post_message).get(find_messages))
            .route("/api/v1/messages/:id", get(get_message))
            .with_state(node);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        addr
    }

    #[tokio::test]
    async fn submit_find_fetch_against_node() {
        let node = MockNode::default();
        let addr = spawn_node(node.clone()).await;
        let client = HttpLedgerClient::new(&format!("http://{addr}/"));
        assert_eq!(client.node_url(), format!("http://{addr}"));

        let index = IndexKey::from_raw("AUDIT_TRAIL_PKG-1");
        let id = client.submit_indexed(&index, br#"{"a":1}"#).await.unwrap();

        {
            let stored = node.messages.lock().unwrap();
            assert_eq!(stored[0].1.index.as_deref(), Some(index.to_hex().as_str()));
            assert_eq!(stored[0].1.data.as_deref(), Some(hex::encode(r#"{"a":1}"#).as_str()));
        }

        let ids = client.find_by_index(&index).await.unwrap();
        assert_eq!(ids, vec![id.clone()]);

        let record = client.fetch_record(&id).await.unwrap();
        assert_eq!(
            record.payload,
            Some(Payload::Indexation {
                index,
                data: br#"{"a":1}"#.to_vec(),
            })
        );
        assert!(client.health().await);
    }

    #[tokio::test]
    async fn unknown_index_and_message_are_not_found() {
        let addr = spawn_node(MockNode::default()).await;
        let client = HttpLedgerClient::new(&format!("http://{addr}"));

        let err = client
            .find_by_index(&IndexKey::from_raw("AUDIT_TRAIL_nothing"))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::NotFound(_)));

        let err = client.fetch_record(&MessageId::new("ff")).await.unwrap_err();
        assert!(matches!(err, LedgerError::NotFound(_)));
    }

    #[tokio::test]
    async fn node_errors_map_to_query_failures() {
        let addr = spawn_node(MockNode {
            fail_queries: true,
            ..MockNode::default()
        })
        .await;
        let client = HttpLedgerClient::new(&format!("http://{addr}"));
        let err = client
            .find_by_index(&IndexKey::from_raw("AUDIT_TRAIL_x"))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::Query(msg) if msg.contains("503")));
    }

    #[tokio::test]
    async fn unreachable_node_is_a_submission_failure() {
        let client = HttpLedgerClient::with_timeout("http://127.0.0.1:1", Duration::from_secs(2));
        let err = client
            .submit_indexed(&IndexKey::from_raw("k"), b"x")
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::Submission(_)));
        assert!(!client.health().await);
    }
}
