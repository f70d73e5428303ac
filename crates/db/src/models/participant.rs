use bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

use super::MeetingType;

/// One attendance row per (meeting, user) pair.
///
/// Duration, session and attendance columns are nullable: the analytics
/// engine coalesces them rather than rejecting rows with gaps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeetingParticipant {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub meeting_id: ObjectId,
    pub user_id: ObjectId,
    pub full_name: String,
    #[serde(default)]
    pub role: ParticipantRole,
    /// Denormalized from the parent meeting; participant summaries group
    /// on it without re-joining.
    #[serde(default)]
    pub meeting_type: MeetingType,
    #[serde(default)]
    pub join_times: Vec<DateTime>,
    #[serde(default)]
    pub leave_times: Vec<DateTime>,
    pub total_duration_minutes: Option<f64>,
    pub total_sessions: Option<i32>,
    pub end_meeting_time: Option<DateTime>,
    pub is_currently_active: Option<bool>,
    /// Attendance share measured against the host's presence.
    pub host_based_attendance: Option<f64>,
    /// Attendance share computed from the participant's own sessions.
    pub participant_attendance: Option<f64>,
    pub overall_attendance: Option<f64>,
    pub last_seen_at: Option<DateTime>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ParticipantRole {
    #[default]
    Participant,
    Host,
}

impl ParticipantRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParticipantRole::Participant => "participant",
            ParticipantRole::Host => "host",
        }
    }
}

impl MeetingParticipant {
    pub const COLLECTION: &'static str = "meeting_participants";
}
