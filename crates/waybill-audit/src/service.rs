use std::sync::Arc;

use waybill_ledger::{LedgerClient, LedgerError, LedgerRecord, Payload};
use waybill_types::{AuditRecord, HistoryEntry, IndexKey, PackageId};

use crate::error::{AuditError, AuditResult, SkipReason};
use crate::tracking::{explorer_base_from_node, explorer_link, TrackingResult};

/// Status written by [`AuditTrailService::create_package`].
pub const CREATED_STATUS: &str = "CREATED";

/// Location used when a package is created without one.
pub const DEFAULT_INITIAL_LOCATION: &str = "Warehouse 001";

/// Audit trail over a ledger client.
///
/// Holds no mutable state: every call is a function of its arguments and
/// the shared ledger handle, so one instance serves all requests.
pub struct AuditTrailService {
    ledger: Arc<dyn LedgerClient>,
    explorer_url: String,
}

impl AuditTrailService {
    pub fn new(ledger: Arc<dyn LedgerClient>) -> Self {
        let explorer_url = explorer_base_from_node(ledger.node_url());
        Self {
            ledger,
            explorer_url,
        }
    }

    /// Override the explorer base used for tracking links.
    pub fn with_explorer_url(mut self, explorer_url: impl Into<String>) -> Self {
        self.explorer_url = explorer_url.into();
        self
    }

    pub fn explorer_url(&self) -> &str {
        &self.explorer_url
    }

    pub fn ledger(&self) -> &Arc<dyn LedgerClient> {
        &self.ledger
    }

    /// Mint a new package ID. Nothing is written.
    pub fn create_package_id(&self) -> PackageId {
        PackageId::generate()
    }

    pub fn index_key(package_id: &PackageId) -> IndexKey {
        IndexKey::derive(package_id)
    }

    /// Append one status update to a package's audit trail.
    ///
    /// Every call writes a new record, identical arguments included.
    pub async fn record_update(
        &self,
        package_id: &PackageId,
        status: &str,
        location: &str,
    ) -> AuditResult<TrackingResult> {
        let record = AuditRecord::new(package_id.clone(), status, location);
        let bytes = record.to_json_bytes()?;
        let index = Self::index_key(package_id);

        let message_id = self
            .ledger
            .submit_indexed(&index, &bytes)
            .await
            .map_err(|e| {
                tracing::error!(package = %package_id, error = %e, "audit record submission failed");
                AuditError::WriteFailure(e)
            })?;

        tracing::info!(
            package = %package_id,
            status,
            message_id = message_id.as_str(),
            "audit record written"
        );

        let explorer_url = explorer_link(&self.explorer_url, &message_id);
        Ok(TrackingResult {
            message_id,
            data: record,
            explorer_url,
        })
    }

    /// Mint a package ID and write its initial `CREATED` record.
    pub async fn create_package(
        &self,
        initial_location: Option<&str>,
    ) -> AuditResult<(PackageId, TrackingResult)> {
        let package_id = self.create_package_id();
        let location = initial_location
            .filter(|l| !l.is_empty())
            .unwrap_or(DEFAULT_INITIAL_LOCATION);
        let tracking = self
            .record_update(&package_id, CREATED_STATUS, location)
            .await?;
        Ok((package_id, tracking))
    }

    /// Rebuild a package's history, oldest first.
    ///
    /// Records that cannot be fetched or decoded are skipped and logged.
    /// Ties on timestamp keep the order the ledger returned them in.
    pub async fn fetch_history(&self, package_id: &PackageId) -> AuditResult<Vec<HistoryEntry>> {
        let index = Self::index_key(package_id);

        let ids = match self.ledger.find_by_index(&index).await {
            Ok(ids) => ids,
            Err(LedgerError::NotFound(_)) => {
                tracing::debug!(package = %package_id, index = %index, "no records indexed");
                return Ok(Vec::new());
            }
            Err(e) => {
                tracing::error!(package = %package_id, error = %e, "index lookup failed");
                return Err(AuditError::ReadFailure(e));
            }
        };

        let mut history = Vec::with_capacity(ids.len());
        for id in ids {
            let decoded = match self.ledger.fetch_record(&id).await {
                Ok(record) => decode_entry(package_id, record),
                Err(e) => Err(SkipReason::FetchFailed(e)),
            };
            match decoded {
                Ok(entry) => history.push(entry),
                Err(reason) => {
                    tracing::warn!(
                        package = %package_id,
                        message_id = id.as_str(),
                        %reason,
                        "skipping ledger record"
                    );
                }
            }
        }

        history.sort_by(|a, b| a.record.timestamp.cmp(&b.record.timestamp));
        Ok(history)
    }
}

fn decode_entry(package_id: &PackageId, record: LedgerRecord) -> Result<HistoryEntry, SkipReason> {
    let data = match &record.payload {
        None => return Err(SkipReason::NoPayload),
        Some(Payload::Other { kind }) => return Err(SkipReason::NotIndexation(*kind)),
        Some(Payload::Indexation { data, .. }) => data,
    };

    let audit = AuditRecord::from_json_bytes(data).map_err(SkipReason::Malformed)?;
    if &audit.package_id != package_id {
        return Err(SkipReason::ForeignPackage(audit.package_id));
    }

    Ok(HistoryEntry {
        message_id: record.id,
        record: audit,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use waybill_ledger::InMemoryLedger;

    fn setup() -> (Arc<InMemoryLedger>, AuditTrailService) {
        let ledger = Arc::new(InMemoryLedger::new("https://api.testnet.example"));
        let service = AuditTrailService::new(ledger.clone());
        (ledger, service)
    }

    fn pkg(s: &str) -> PackageId {
        PackageId::parse(s).unwrap()
    }

    async fn plant(ledger: &InMemoryLedger, package_id: &str, ts: &str, status: &str) {
        let json = format!(
            r#"{{"timestamp":"{ts}","packageID":"{package_id}","status":"{status}","location":"Hub"}}"#
        );
        ledger
            .submit_indexed(&IndexKey::derive(&pkg(package_id)), json.as_bytes())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn update_then_history_contains_the_update() {
        let (_, service) = setup();
        let id = pkg("PKG-1");

        let result = service.record_update(&id, "SHIPPED", "Hub A").await.unwrap();
        assert_eq!(result.data.status, "SHIPPED");
        assert_eq!(result.data.location, "Hub A");
        assert_eq!(result.data.package_id, id);
        assert_eq!(
            result.explorer_url,
            format!("https://explorer.testnet.example/message/{}", result.message_id)
        );

        let history = service.fetch_history(&id).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].message_id, result.message_id);
        assert_eq!(history[0].record, result.data);
    }

    #[tokio::test]
    async fn repeated_updates_are_appended_not_deduplicated() {
        let (ledger, service) = setup();
        let id = service.create_package_id();

        for _ in 0..5 {
            service.record_update(&id, "IN_TRANSIT", "Hub B").await.unwrap();
        }
        assert_eq!(ledger.message_count(), 5);

        let history = service.fetch_history(&id).await.unwrap();
        assert_eq!(history.len(), 5);
        assert!(history
            .windows(2)
            .all(|w| w[0].record.timestamp <= w[1].record.timestamp));
    }

    #[tokio::test]
    async fn history_of_unknown_package_is_empty() {
        let (_, service) = setup();
        let history = service.fetch_history(&pkg("PKG-never-written")).await.unwrap();
        assert!(history.is_empty());
    }

    #[tokio::test]
    async fn history_is_sorted_by_timestamp_regardless_of_ledger_order() {
        let (ledger, service) = setup();
        plant(&ledger, "PKG-7", "2024-02-17T12:00:00.000Z", "DELIVERED").await;
        plant(&ledger, "PKG-7", "2024-02-17T10:00:00.000Z", "CREATED").await;
        plant(&ledger, "PKG-7", "2024-02-17T11:00:00.000Z", "SHIPPED").await;

        let statuses: Vec<String> = service
            .fetch_history(&pkg("PKG-7"))
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.record.status)
            .collect();
        assert_eq!(statuses, vec!["CREATED", "SHIPPED", "DELIVERED"]);
    }

    #[tokio::test]
    async fn equal_timestamps_keep_ledger_order() {
        let (ledger, service) = setup();
        plant(&ledger, "PKG-8", "2024-02-17T10:00:00.000Z", "FIRST").await;
        plant(&ledger, "PKG-8", "2024-02-17T10:00:00.000Z", "SECOND").await;

        let history = service.fetch_history(&pkg("PKG-8")).await.unwrap();
        assert_eq!(history[0].record.status, "FIRST");
        assert_eq!(history[1].record.status, "SECOND");
    }

    #[tokio::test]
    async fn malformed_and_foreign_payloads_are_skipped() {
        let (ledger, service) = setup();
        let id = pkg("PKG-9");
        let index = IndexKey::derive(&id);

        service.record_update(&id, "CREATED", "Warehouse 001").await.unwrap();
        ledger.submit_indexed(&index, b"{not json").await.unwrap();
        ledger.submit_indexed(&index, &[0xff, 0xfe]).await.unwrap();
        service.record_update(&id, "SHIPPED", "Hub A").await.unwrap();

        let history = service.fetch_history(&id).await.unwrap();
        let statuses: Vec<&str> = history.iter().map(|e| e.record.status.as_str()).collect();
        assert_eq!(statuses, vec!["CREATED", "SHIPPED"]);
    }

    #[tokio::test]
    async fn non_indexation_and_empty_payloads_are_skipped() {
        let (ledger, service) = setup();
        let id = pkg("PKG-11");
        let index = IndexKey::derive(&id);

        ledger
            .submit_payload(Some(&index), Some(Payload::Other { kind: 0 }))
            .unwrap();
        ledger.submit_payload(Some(&index), None).unwrap();
        let kept = service.record_update(&id, "CREATED", "Warehouse 001").await.unwrap();
        assert_eq!(ledger.find_by_index(&index).await.unwrap().len(), 3);

        let history = service.fetch_history(&id).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].message_id, kept.message_id);
        assert_eq!(history[0].record.status, "CREATED");
    }

    #[tokio::test]
    async fn records_of_a_colliding_package_are_filtered() {
        let (_, service) = setup();
        let a = pkg("PKG-1708164000123-aaaaaa");
        let b = pkg("PKG-1708164000123-aazzzz");
        assert_eq!(IndexKey::derive(&a), IndexKey::derive(&b));

        service.record_update(&a, "CREATED", "A").await.unwrap();
        service.record_update(&b, "CREATED", "B").await.unwrap();

        let history = service.fetch_history(&a).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].record.location, "A");
    }

    #[tokio::test]
    async fn individual_fetch_failures_are_skipped() {
        let (ledger, service) = setup();
        let id = pkg("PKG-10");
        let first = service.record_update(&id, "CREATED", "W").await.unwrap();
        service.record_update(&id, "SHIPPED", "H").await.unwrap();

        ledger.fail_fetch(&first.message_id);
        let history = service.fetch_history(&id).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].record.status, "SHIPPED");
    }

    #[tokio::test]
    async fn lookup_failure_is_a_read_failure() {
        let (ledger, service) = setup();
        ledger.fail_queries("connection reset");
        let err = service.fetch_history(&pkg("PKG-11")).await.unwrap_err();
        assert!(matches!(err, AuditError::ReadFailure(LedgerError::Query(_))));
    }

    #[tokio::test]
    async fn submission_failure_is_a_write_failure() {
        let (ledger, service) = setup();
        ledger.fail_submissions("node offline");
        let err = service
            .record_update(&pkg("PKG-12"), "SHIPPED", "Hub")
            .await
            .unwrap_err();
        assert!(matches!(err, AuditError::WriteFailure(LedgerError::Submission(_))));
        assert_eq!(ledger.message_count(), 0);
    }

    #[tokio::test]
    async fn create_package_writes_created_record() {
        let (_, service) = setup();
        let (id, tracking) = service.create_package(None).await.unwrap();
        assert_eq!(tracking.data.status, CREATED_STATUS);
        assert_eq!(tracking.data.location, DEFAULT_INITIAL_LOCATION);

        let (_, custom) = service.create_package(Some("Dock 4")).await.unwrap();
        assert_eq!(custom.data.location, "Dock 4");

        let history = service.fetch_history(&id).await.unwrap();
        assert_eq!(history.len(), 1);
    }

    #[tokio::test]
    async fn explorer_override() {
        let (_, service) = setup();
        let service = service.with_explorer_url("https://explorer.custom");
        let result = service.record_update(&pkg("PKG-13"), "X", "Y").await.unwrap();
        assert!(result.explorer_url.starts_with("https://explorer.custom/message/"));
    }
}
