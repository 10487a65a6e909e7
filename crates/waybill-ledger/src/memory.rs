use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use async_trait::async_trait;
use rand::RngCore;
use waybill_types::{IndexKey, MessageId};

use crate::error::{LedgerError, LedgerResult};
use crate::payload::{LedgerRecord, Payload};
use crate::traits::LedgerClient;

/// In-memory ledger for tests, local demos, and embedding.
///
/// Messages get random 32-byte hex IDs. Index lookups return IDs in
/// insertion order; an index with nothing under it reports `NotFound`,
/// the way a node does.
pub struct InMemoryLedger {
    node_url: String,
    inner: RwLock<LedgerState>,
}

#[derive(Default)]
struct LedgerState {
    messages: HashMap<MessageId, LedgerRecord>,
    index: HashMap<IndexKey, Vec<MessageId>>,
    failures: InjectedFailures,
}

#[derive(Default)]
struct InjectedFailures {
    submit: Option<String>,
    query: Option<String>,
    fetch: HashSet<MessageId>,
}

impl InMemoryLedger {
    pub fn new(node_url: impl Into<String>) -> Self {
        Self {
            node_url: node_url.into(),
            inner: RwLock::new(LedgerState::default()),
        }
    }

    /// Append a message carrying an arbitrary payload (or none).
    ///
    /// With `index` set, the message is listed under that index whatever
    /// its payload, the way a node lists a message tagged with an index
    /// but carrying a transaction. Indexation payloads are always listed
    /// under their own index.
    pub fn submit_payload(
        &self,
        index: Option<&IndexKey>,
        payload: Option<Payload>,
    ) -> LedgerResult<MessageId> {
        let mut state = self
            .inner
            .write()
            .map_err(|_| LedgerError::Submission("ledger write lock poisoned".into()))?;
        Ok(Self::append(&mut state, index, payload))
    }

    /// Make every subsequent submission fail with `reason`.
    pub fn fail_submissions(&self, reason: impl Into<String>) {
        if let Ok(mut state) = self.inner.write() {
            state.failures.submit = Some(reason.into());
        }
    }

    /// Make every subsequent index lookup fail with `reason`.
    pub fn fail_queries(&self, reason: impl Into<String>) {
        if let Ok(mut state) = self.inner.write() {
            state.failures.query = Some(reason.into());
        }
    }

    /// Make fetches of one message fail.
    pub fn fail_fetch(&self, id: &MessageId) {
        if let Ok(mut state) = self.inner.write() {
            state.failures.fetch.insert(id.clone());
        }
    }

    pub fn clear_failures(&self) {
        if let Ok(mut state) = self.inner.write() {
            state.failures = InjectedFailures::default();
        }
    }

    pub fn message_count(&self) -> usize {
        self.inner.read().map(|s| s.messages.len()).unwrap_or(0)
    }

    fn append(state: &mut LedgerState, index: Option<&IndexKey>, payload: Option<Payload>) -> MessageId {
        let id = loop {
            let mut bytes = [0u8; 32];
            rand::thread_rng().fill_bytes(&mut bytes);
            let candidate = MessageId::new(hex::encode(bytes));
            if !state.messages.contains_key(&candidate) {
                break candidate;
            }
        };

        let listed_under = match (&payload, index) {
            (Some(Payload::Indexation { index, .. }), _) => Some(index),
            (_, Some(index)) => Some(index),
            _ => None,
        };
        if let Some(index) = listed_under {
            state.index.entry(index.clone()).or_default().push(id.clone());
        }
        state.messages.insert(
            id.clone(),
            LedgerRecord {
                id: id.clone(),
                payload,
            },
        );
        id
    }
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new("memory://ledger")
    }
}

#[async_trait]
impl LedgerClient for InMemoryLedger {
    async fn submit_indexed(&self, index: &IndexKey, data: &[u8]) -> LedgerResult<MessageId> {
        let mut state = self
            .inner
            .write()
            .map_err(|_| LedgerError::Submission("ledger write lock poisoned".into()))?;

        if let Some(reason) = &state.failures.submit {
            return Err(LedgerError::Submission(reason.clone()));
        }

        let id = Self::append(
            &mut state,
            None,
            Some(Payload::Indexation {
                index: index.clone(),
                data: data.to_vec(),
            }),
        );
        tracing::debug!(index = %index, message_id = id.short_id(), "in-memory indexation record stored");
        Ok(id)
    }

    async fn find_by_index(&self, index: &IndexKey) -> LedgerResult<Vec<MessageId>> {
        let state = self
            .inner
            .read()
            .map_err(|_| LedgerError::Query("ledger read lock poisoned".into()))?;

        if let Some(reason) = &state.failures.query {
            return Err(LedgerError::Query(reason.clone()));
        }

        state
            .index
            .get(index)
            .cloned()
            .ok_or_else(|| LedgerError::NotFound(index.to_string()))
    }

    async fn fetch_record(&self, id: &MessageId) -> LedgerResult<LedgerRecord> {
        let state = self
            .inner
            .read()
            .map_err(|_| LedgerError::Fetch("ledger read lock poisoned".into()))?;

        if state.failures.fetch.contains(id) {
            return Err(LedgerError::Fetch(format!("injected failure for {id}")));
        }

        state
            .messages
            .get(id)
            .cloned()
            .ok_or_else(|| LedgerError::NotFound(id.to_string()))
    }

    fn node_url(&self) -> &str {
        &self.node_url
    }
}
