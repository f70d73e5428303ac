use axum::{Json, extract::{Query, State}};

use crate::{error::ApiError, state::AppState};
use meetra_services::analytics::reports::{HostReportParams, RecordReportParams};
use meetra_services::analytics::AnalyticsParams;

/// Comprehensive analytics: the four views plus the global summary and the
/// time-filter listing, gated by `analytics_type`.
pub async fn comprehensive(
    State(state): State<AppState>,
    Query(params): Query<AnalyticsParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let envelope = state.engine.run(&params).await?;
    Ok(Json(serde_json::json!({ "data": envelope })))
}

/// Per-record duration analysis for a user and/or meeting.
pub async fn duration(
    State(state): State<AppState>,
    Query(params): Query<RecordReportParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let records = state.engine.duration_analytics(&params).await?;
    Ok(Json(serde_json::json!({ "data": records })))
}

/// Attendance-focused listing with the advanced monitoring columns.
pub async fn attendance(
    State(state): State<AppState>,
    Query(params): Query<RecordReportParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let report = state
        .engine
        .attendance_analytics(&params, chrono::Utc::now())
        .await?;
    Ok(Json(serde_json::json!({ "data": report })))
}

/// Meeting-count analytics per host.
pub async fn host_meetings(
    State(state): State<AppState>,
    Query(params): Query<HostReportParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let counts = state
        .engine
        .host_meeting_counts(&params, chrono::Utc::now())
        .await?;
    Ok(Json(serde_json::json!({ "data": counts })))
}

/// Compact host dashboard rollup.
pub async fn host_overview(
    State(state): State<AppState>,
    Query(params): Query<HostReportParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let overview = state
        .engine
        .host_overview(&params, chrono::Utc::now())
        .await?;
    Ok(Json(serde_json::json!({ "data": overview })))
}
