use std::sync::Arc;

use waybill_audit::AuditTrailService;

/// Shared handler state: one audit service over one ledger connection.
#[derive(Clone)]
pub struct AppState {
    pub audit: Arc<AuditTrailService>,
}

impl AppState {
    pub fn new(audit: AuditTrailService) -> Self {
        Self {
            audit: Arc::new(audit),
        }
    }
}
