use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use waybill_types::PackageId;

use crate::dto::{
    CreatePackageRequest, CreatePackageResponse, HealthResponse, HistoryResponse, TrackRequest,
    TrackResponse,
};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

const CREATED_MESSAGE: &str = "Package and ID created successfully. Tracking started.";
const CREATED_NOTE: &str = "This ID is the key for querying the package's audit trail on the ledger.";
const TRACKED_MESSAGE: &str = "Status update recorded on the ledger audit trail.";
const MISSING_FIELDS: &str = "Missing status or location in request body.";

fn parse_package_id(raw: &str) -> ApiResult<PackageId> {
    PackageId::parse(raw).map_err(|e| ApiError::Validation(e.to_string()))
}

/// Health check handler.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::default())
}

/// `POST /api/package`: mint an ID and record its `CREATED` status.
///
/// The body is optional; anything unparseable is treated as empty.
pub async fn create_package(
    State(state): State<AppState>,
    body: Option<Json<CreatePackageRequest>>,
) -> ApiResult<(StatusCode, Json<CreatePackageResponse>)> {
    let req = body.map(|Json(req)| req).unwrap_or_default();

    let (package_id, initial_tracking) = state
        .audit
        .create_package(req.initial_location.as_deref())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatePackageResponse {
            message: CREATED_MESSAGE.into(),
            package_id,
            initial_tracking,
            note: CREATED_NOTE.into(),
        }),
    ))
}

/// `POST /api/package/track/:id`: append a status update.
pub async fn track_package(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<TrackRequest>, JsonRejection>,
) -> ApiResult<Json<TrackResponse>> {
    let Json(req) = body.map_err(|rejection| {
        tracing::debug!(error = %rejection, "unreadable track body");
        ApiError::Validation(MISSING_FIELDS.into())
    })?;

    let (status, location) = match (req.status, req.location) {
        (Some(s), Some(l)) if !s.is_empty() && !l.is_empty() => (s, l),
        _ => return Err(ApiError::Validation(MISSING_FIELDS.into())),
    };
    let package_id = parse_package_id(&id)?;

    let tracking_details = state
        .audit
        .record_update(&package_id, &status, &location)
        .await?;

    Ok(Json(TrackResponse {
        message: TRACKED_MESSAGE.into(),
        package_id,
        tracking_details,
    }))
}

/// `GET /api/package/history/:id`: the package's audit trail, oldest first.
pub async fn package_history(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<HistoryResponse>> {
    let package_id = parse_package_id(&id)?;
    let history = state.audit.fetch_history(&package_id).await?;
    Ok(Json(HistoryResponse {
        package_id,
        history,
    }))
}
