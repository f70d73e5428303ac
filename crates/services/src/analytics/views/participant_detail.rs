use serde::Serialize;
use serde_json::Value;

use crate::analytics::joiner::JoinedRecord;
use crate::analytics::metrics::violations_count;

use super::{iso, iso_at, paginate};

/// One row per participation record: duration analysis, stored attendance
/// fields, full monitoring detail and parent meeting metadata.
#[derive(Debug, Clone, Serialize)]
pub struct ParticipantDetail {
    pub participant_id: Option<String>,
    pub meeting_id: String,
    pub user_id: String,
    pub full_name: String,
    pub role: String,
    pub meeting_type: String,
    pub duration_analysis: DurationAnalysis,
    pub participant_attendance_data: AttendanceData,
    pub attendance_session: AttendanceSessionDetail,
    pub meeting_info: MeetingInfo,
}

#[derive(Debug, Clone, Serialize)]
pub struct DurationAnalysis {
    pub join_times: Vec<String>,
    pub leave_times: Vec<String>,
    pub total_duration_minutes: f64,
    pub total_sessions: i64,
    pub end_meeting_time: Option<String>,
    pub is_currently_active: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct AttendanceData {
    pub attendance_percentage_based_on_host: f64,
    pub participant_attendance: f64,
    pub overall_attendance: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AttendanceSessionDetail {
    pub popup_count: i64,
    pub detection_counts: Option<Value>,
    pub violation_start_times: Option<Value>,
    pub total_detections: i64,
    pub attendance_penalty: f64,
    pub break_used: bool,
    pub total_break_time_used: i64,
    pub engagement_score: f64,
    pub attendance_percentage: f64,
    pub session_active: bool,
    pub break_count: i64,
    pub focus_score: f64,
    pub violation_severity_score: f64,
    pub active_participation_time: i64,
    pub total_session_time: i64,
    pub violations_count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MeetingInfo {
    pub meeting_name: String,
    pub status: String,
    pub created_at: Option<String>,
    pub started_at: Option<String>,
    pub ended_at: Option<String>,
    pub host_id: String,
    pub join_link: String,
    pub is_recording_enabled: bool,
    pub waiting_room_enabled: bool,
}

pub fn build_participant_details(
    records: &[JoinedRecord],
    page: u32,
    page_size: u32,
) -> Vec<ParticipantDetail> {
    let details: Vec<ParticipantDetail> = records.iter().map(detail_row).collect();
    paginate(details, page, page_size)
}

fn detail_row(record: &JoinedRecord) -> ParticipantDetail {
    let p = &record.participation;
    let m = &record.meeting;
    let session = record.monitoring.as_ref();

    ParticipantDetail {
        participant_id: p.id.map(|id| id.to_hex()),
        meeting_id: p.meeting_id.to_hex(),
        user_id: p.user_id.to_hex(),
        full_name: p.full_name.clone(),
        role: p.role.as_str().to_string(),
        meeting_type: p.meeting_type.as_str().to_string(),
        duration_analysis: DurationAnalysis {
            join_times: p.join_times.iter().copied().map(iso_at).collect(),
            leave_times: p.leave_times.iter().copied().map(iso_at).collect(),
            total_duration_minutes: p.total_duration_minutes.unwrap_or(0.0),
            total_sessions: p.total_sessions.unwrap_or(0) as i64,
            end_meeting_time: iso(p.end_meeting_time),
            is_currently_active: p.is_currently_active.unwrap_or(false),
        },
        participant_attendance_data: AttendanceData {
            attendance_percentage_based_on_host: p.host_based_attendance.unwrap_or(0.0),
            participant_attendance: p.participant_attendance.unwrap_or(0.0),
            overall_attendance: p.overall_attendance.unwrap_or(0.0),
        },
        attendance_session: AttendanceSessionDetail {
            popup_count: session.and_then(|s| s.popup_count).unwrap_or(0),
            detection_counts: session.and_then(|s| s.detection_counts.clone()),
            violation_start_times: session.and_then(|s| s.violation_start_times.clone()),
            total_detections: session.and_then(|s| s.total_detections).unwrap_or(0),
            attendance_penalty: session.and_then(|s| s.attendance_penalty).unwrap_or(0.0),
            break_used: session.and_then(|s| s.break_used).unwrap_or(false),
            total_break_time_used: session
                .and_then(|s| s.total_break_time_used)
                .unwrap_or(0),
            engagement_score: session.and_then(|s| s.engagement_score).unwrap_or(0.0),
            attendance_percentage: session
                .and_then(|s| s.attendance_percentage)
                .unwrap_or(0.0),
            session_active: session.and_then(|s| s.session_active).unwrap_or(false),
            break_count: session.and_then(|s| s.break_count).unwrap_or(0),
            focus_score: session.and_then(|s| s.focus_score).unwrap_or(0.0),
            violation_severity_score: session
                .and_then(|s| s.violation_severity_score)
                .unwrap_or(0.0),
            active_participation_time: session
                .and_then(|s| s.active_participation_time)
                .unwrap_or(0),
            total_session_time: session.and_then(|s| s.total_session_time).unwrap_or(0),
            violations_count: violations_count(
                session.and_then(|s| s.violations.as_ref()),
                session.and_then(|s| s.popup_count),
            ),
        },
        meeting_info: MeetingInfo {
            meeting_name: m.name.clone(),
            status: m.status.as_str().to_string(),
            created_at: iso(m.created_at),
            started_at: iso(m.started_at),
            ended_at: iso(m.ended_at),
            host_id: m.host_id.to_hex(),
            join_link: m.join_link.clone(),
            is_recording_enabled: m.recording_enabled,
            waiting_room_enabled: m.waiting_room_enabled,
        },
    }
}
