use std::collections::HashSet;

use bson::oid::ObjectId;
use serde::Serialize;

use crate::analytics::joiner::HostedMeeting;
use crate::analytics::metrics::{round2, Mean};

use super::iso;

/// One row per meeting, aggregating its participation records and
/// telemetry. Input ordering (creation time descending) is preserved.
#[derive(Debug, Clone, Serialize)]
pub struct MeetingSummary {
    pub meeting_id: String,
    pub meeting_name: String,
    pub meeting_type: String,
    pub host_id: String,
    pub status: String,
    pub created_at: Option<String>,
    pub started_at: Option<String>,
    pub ended_at: Option<String>,
    pub join_link: String,
    pub is_recording_enabled: bool,
    pub waiting_room_enabled: bool,
    pub participant_analytics: ParticipantAnalytics,
    pub attendance_analytics: AttendanceAnalytics,
}

#[derive(Debug, Clone, Serialize)]
pub struct ParticipantAnalytics {
    pub total_participants: u64,
    pub currently_active_participants: u64,
    pub avg_participant_duration_minutes: f64,
    pub avg_participant_attendance: f64,
    pub total_meeting_duration_minutes: f64,
    pub longest_participant_duration_minutes: f64,
    pub shortest_participant_duration_minutes: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AttendanceAnalytics {
    pub avg_popup_count: f64,
    pub avg_total_detections: f64,
    pub avg_attendance_penalty: f64,
    pub avg_engagement_score: f64,
    pub total_breaks_in_meeting: u64,
}

pub fn build_meeting_summaries(meetings: &[HostedMeeting]) -> Vec<MeetingSummary> {
    meetings.iter().map(summary_row).collect()
}

fn summary_row(hosted: &HostedMeeting) -> MeetingSummary {
    let m = &hosted.meeting;

    let mut unique: HashSet<ObjectId> = HashSet::new();
    let mut active: HashSet<ObjectId> = HashSet::new();
    let mut durations = Mean::new();
    let mut attendance = Mean::new();
    let mut total_minutes = 0.0;
    let mut longest: Option<f64> = None;
    let mut shortest: Option<f64> = None;

    for p in &hosted.participants {
        unique.insert(p.user_id);
        if p.is_currently_active.unwrap_or(false) {
            active.insert(p.user_id);
        }
        durations.push(p.total_duration_minutes);
        attendance.push(p.participant_attendance);
        if let Some(minutes) = p.total_duration_minutes {
            total_minutes += minutes;
            longest = Some(longest.map_or(minutes, |v: f64| v.max(minutes)));
            shortest = Some(shortest.map_or(minutes, |v: f64| v.min(minutes)));
        }
    }

    let mut popup = Mean::new();
    let mut detections = Mean::new();
    let mut penalty = Mean::new();
    let mut engagement = Mean::new();
    let mut breaks = 0u64;
    for session in &hosted.monitoring {
        popup.push_int(session.popup_count);
        detections.push_int(session.total_detections);
        penalty.push(session.attendance_penalty);
        engagement.push(session.engagement_score);
        if session.break_used.unwrap_or(false) {
            breaks += 1;
        }
    }

    MeetingSummary {
        meeting_id: m.id.map(|id| id.to_hex()).unwrap_or_default(),
        meeting_name: m.name.clone(),
        meeting_type: m.meeting_type.as_str().to_string(),
        host_id: m.host_id.to_hex(),
        status: m.status.as_str().to_string(),
        created_at: iso(m.created_at),
        started_at: iso(m.started_at),
        ended_at: iso(m.ended_at),
        join_link: m.join_link.clone(),
        is_recording_enabled: m.recording_enabled,
        waiting_room_enabled: m.waiting_room_enabled,
        participant_analytics: ParticipantAnalytics {
            total_participants: unique.len() as u64,
            currently_active_participants: active.len() as u64,
            avg_participant_duration_minutes: durations.value(),
            avg_participant_attendance: attendance.value(),
            total_meeting_duration_minutes: round2(total_minutes),
            longest_participant_duration_minutes: round2(longest.unwrap_or(0.0)),
            shortest_participant_duration_minutes: round2(shortest.unwrap_or(0.0)),
        },
        attendance_analytics: AttendanceAnalytics {
            avg_popup_count: popup.value(),
            avg_total_detections: detections.value(),
            avg_attendance_penalty: penalty.value(),
            avg_engagement_score: engagement.value(),
            total_breaks_in_meeting: breaks,
        },
    }
}
