//! Request and response bodies.

use serde::{Deserialize, Serialize};
use waybill_audit::TrackingResult;
use waybill_types::{HistoryEntry, PackageId};

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePackageRequest {
    #[serde(default)]
    pub initial_location: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePackageResponse {
    pub message: String,
    #[serde(rename = "packageID")]
    pub package_id: PackageId,
    pub initial_tracking: TrackingResult,
    pub note: String,
}

/// Both fields are optional here so that missing ones become a 400 with
/// a readable message instead of an extractor rejection.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TrackRequest {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackResponse {
    pub message: String,
    #[serde(rename = "packageID")]
    pub package_id: PackageId,
    pub tracking_details: TrackingResult,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HistoryResponse {
    #[serde(rename = "packageID")]
    pub package_id: PackageId,
    pub history: Vec<HistoryEntry>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".into(),
            version: env!("CARGO_PKG_VERSION").into(),
        }
    }
}
