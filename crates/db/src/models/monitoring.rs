use bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

/// Proctoring/engagement telemetry for a (meeting, user) pair.
///
/// Zero-or-one per participation record; absence means monitoring never ran
/// for that pair. Every counter is nullable and the `violations`,
/// `detection_counts` and `violation_start_times` columns hold free-form
/// JSON written by the monitoring client, so nothing here is trusted to be
/// well-formed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringSession {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub meeting_id: ObjectId,
    pub user_id: ObjectId,
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
    /// Itemized warnings/detections/removals; see
    /// `analytics::metrics::violations_count` for the tolerated shapes.
    pub violations: Option<serde_json::Value>,
    pub detection_counts: Option<serde_json::Value>,
    pub violation_start_times: Option<serde_json::Value>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl MonitoringSession {
    pub const COLLECTION: &'static str = "monitoring_sessions";
}
