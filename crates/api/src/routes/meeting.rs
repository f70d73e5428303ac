use axum::{Json, extract::{Path, State}};
use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::{error::ApiError, state::AppState};
use meetra_db::models::{MeetingType, MonitoringSession, ParticipantRole};

#[derive(Debug, Deserialize)]
pub struct CreateMeetingRequest {
    pub name: String,
    #[serde(default)]
    pub meeting_type: MeetingType,
    pub host_id: String,
    #[serde(default)]
    pub recording_enabled: bool,
    #[serde(default)]
    pub waiting_room_enabled: bool,
    pub scheduled_start: Option<chrono::DateTime<chrono::Utc>>,
    pub scheduled_end: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug, Serialize)]
pub struct MeetingResponse {
    pub id: String,
    pub name: String,
    pub meeting_type: String,
    pub status: String,
    pub host_id: String,
    pub join_link: String,
    pub recording_enabled: bool,
    pub waiting_room_enabled: bool,
}

pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateMeetingRequest>,
) -> Result<Json<MeetingResponse>, ApiError> {
    let host_id = ObjectId::parse_str(&body.host_id)
        .map_err(|_| ApiError::BadRequest("Invalid host_id".to_string()))?;

    let meeting = state
        .meetings
        .create(
            body.name,
            body.meeting_type,
            host_id,
            body.recording_enabled,
            body.waiting_room_enabled,
            body.scheduled_start.map(bson::DateTime::from_chrono),
            body.scheduled_end.map(bson::DateTime::from_chrono),
        )
        .await?;

    Ok(Json(to_response(meeting)))
}

pub async fn start(
    State(state): State<AppState>,
    Path(meeting_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = parse_meeting_id(&meeting_id)?;
    state.meetings.start(id).await?;
    Ok(Json(serde_json::json!({ "started": true })))
}

pub async fn end(
    State(state): State<AppState>,
    Path(meeting_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = parse_meeting_id(&meeting_id)?;
    state.meetings.end(id).await?;
    Ok(Json(serde_json::json!({ "ended": true })))
}

#[derive(Debug, Deserialize)]
pub struct JoinRequest {
    pub user_id: String,
    pub full_name: String,
    #[serde(default)]
    pub role: ParticipantRole,
}

pub async fn join(
    State(state): State<AppState>,
    Path(meeting_id): Path<String>,
    Json(body): Json<JoinRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = parse_meeting_id(&meeting_id)?;
    let user_id = ObjectId::parse_str(&body.user_id)
        .map_err(|_| ApiError::BadRequest("Invalid user_id".to_string()))?;

    let meeting = state.meetings.base.find_by_id(id).await?;
    let participant = state
        .participants
        .join(id, user_id, body.full_name, body.role, meeting.meeting_type)
        .await?;

    Ok(Json(serde_json::json!({
        "participant_id": participant.id.map(|p| p.to_hex()),
        "joined": true,
    })))
}

#[derive(Debug, Deserialize)]
pub struct LeaveRequest {
    pub user_id: String,
}

pub async fn leave(
    State(state): State<AppState>,
    Path(meeting_id): Path<String>,
    Json(body): Json<LeaveRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = parse_meeting_id(&meeting_id)?;
    let user_id = ObjectId::parse_str(&body.user_id)
        .map_err(|_| ApiError::BadRequest("Invalid user_id".to_string()))?;

    state.participants.leave(id, user_id).await?;
    Ok(Json(serde_json::json!({ "left": true })))
}

pub async fn participants(
    State(state): State<AppState>,
    Path(meeting_id): Path<String>,
) -> Result<Json<Vec<serde_json::Value>>, ApiError> {
    let id = parse_meeting_id(&meeting_id)?;
    let parts = state.participants.list_by_meeting(id).await?;
    let items: Vec<serde_json::Value> = parts
        .iter()
        .map(|p| {
            serde_json::json!({
                "id": p.id.map(|i| i.to_hex()),
                "user_id": p.user_id.to_hex(),
                "full_name": p.full_name,
                "role": p.role.as_str(),
                "total_duration_minutes": p.total_duration_minutes,
                "total_sessions": p.total_sessions,
                "is_currently_active": p.is_currently_active.unwrap_or(false),
            })
        })
        .collect();
    Ok(Json(items))
}

/// Telemetry snapshot posted by the monitoring client. Ids come from the
/// path; everything else is the raw session payload.
#[derive(Debug, Deserialize)]
pub struct MonitoringUpsertRequest {
    pub popup_count: Option<i64>,
    pub total_detections: Option<i64>,
    pub attendance_penalty: Option<f64>,
    pub break_used: Option<bool>,
    pub total_break_time_used: Option<i64>,
    pub break_count: Option<i64>,
    pub engagement_score: Option<f64>,
    pub attendance_percentage: Option<f64>,
    pub session_active: Option<bool>,
    pub focus_score: Option<f64>,
    pub violation_severity_score: Option<f64>,
    pub active_participation_time: Option<i64>,
    pub total_session_time: Option<i64>,
    pub last_violation_type: Option<String>,
    pub continuous_violation_time: Option<i64>,
    pub violations: Option<serde_json::Value>,
    pub detection_counts: Option<serde_json::Value>,
    pub violation_start_times: Option<serde_json::Value>,
}

pub async fn upsert_monitoring(
    State(state): State<AppState>,
    Path((meeting_id, user_id)): Path<(String, String)>,
    Json(body): Json<MonitoringUpsertRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let meeting_id = parse_meeting_id(&meeting_id)?;
    let user_id = ObjectId::parse_str(&user_id)
        .map_err(|_| ApiError::BadRequest("Invalid user_id".to_string()))?;

    let now = bson::DateTime::now();
    let session = MonitoringSession {
        id: None,
        meeting_id,
        user_id,
        popup_count: body.popup_count,
        total_detections: body.total_detections,
        attendance_penalty: body.attendance_penalty,
        break_used: body.break_used,
        total_break_time_used: body.total_break_time_used,
        break_count: body.break_count,
        engagement_score: body.engagement_score,
        attendance_percentage: body.attendance_percentage,
        session_active: body.session_active,
        focus_score: body.focus_score,
        violation_severity_score: body.violation_severity_score,
        active_participation_time: body.active_participation_time,
        total_session_time: body.total_session_time,
        last_violation_type: body.last_violation_type,
        continuous_violation_time: body.continuous_violation_time,
        violations: body.violations,
        detection_counts: body.detection_counts,
        violation_start_times: body.violation_start_times,
        created_at: now,
        updated_at: now,
    };

    let stored = state.monitoring.upsert(session).await?;
    Ok(Json(serde_json::json!({
        "id": stored.id.map(|i| i.to_hex()),
        "updated": true,
    })))
}

fn parse_meeting_id(raw: &str) -> Result<ObjectId, ApiError> {
    ObjectId::parse_str(raw).map_err(|_| ApiError::BadRequest("Invalid meeting_id".to_string()))
}

fn to_response(m: meetra_db::models::Meeting) -> MeetingResponse {
    MeetingResponse {
        id: m.id.map(|id| id.to_hex()).unwrap_or_default(),
        name: m.name,
        meeting_type: m.meeting_type.as_str().to_string(),
        status: m.status.as_str().to_string(),
        host_id: m.host_id.to_hex(),
        join_link: m.join_link,
        recording_enabled: m.recording_enabled,
        waiting_room_enabled: m.waiting_room_enabled,
    }
}
