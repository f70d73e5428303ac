use std::collections::{BTreeMap, HashSet};

use bson::oid::ObjectId;
use serde::Serialize;

use meetra_db::models::MeetingType;

use crate::analytics::joiner::JoinedRecord;
use crate::analytics::metrics::{round2, Mean};

use super::iso;

/// Per-(participant, meeting-type) rollup of attendance history.
#[derive(Debug, Clone, Serialize)]
pub struct ParticipantSummary {
    pub user_id: String,
    pub full_name: String,
    pub meeting_participation: MeetingParticipation,
    pub meeting_type: String,
    pub activity_period: ActivityPeriod,
    pub attendance_analytics: AttendanceAnalytics,
}

#[derive(Debug, Clone, Serialize)]
pub struct MeetingParticipation {
    pub total_meetings_attended: u64,
    pub total_participation_time_minutes: f64,
    pub avg_meeting_duration_minutes: f64,
    pub avg_participant_attendance: f64,
    pub avg_overall_attendance: f64,
    pub active_meetings: u64,
    pub avg_sessions_per_meeting: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActivityPeriod {
    pub first_meeting_joined: Option<String>,
    pub last_meeting_joined: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AttendanceAnalytics {
    pub avg_popup_count: f64,
    pub avg_total_detections: f64,
    pub avg_attendance_penalty: f64,
    pub avg_break_time_used: f64,
    pub avg_engagement_score: f64,
    pub avg_focus_score: f64,
    pub total_breaks_taken: u64,
}

#[derive(Default)]
struct Group {
    full_name: String,
    meetings: HashSet<ObjectId>,
    active_meetings: HashSet<ObjectId>,
    duration_sum: f64,
    durations: Mean,
    participant_attendance: Mean,
    overall_attendance: Mean,
    sessions: Mean,
    first_joined: Option<bson::DateTime>,
    last_joined: Option<bson::DateTime>,
    popup: Mean,
    detections: Mean,
    penalty: Mean,
    break_time: Mean,
    engagement: Mean,
    focus: Mean,
    breaks_taken: u64,
}

/// Group joined rows by (participant, meeting-type). The caller restricts
/// the input to role=participant rows; ordering is meetings-attended
/// descending with the participant id as a stable tie-break.
pub fn build_participant_summaries(records: &[JoinedRecord]) -> Vec<ParticipantSummary> {
    let mut groups: BTreeMap<(ObjectId, MeetingType), Group> = BTreeMap::new();

    for record in records {
        let p = &record.participation;
        let group = groups
            .entry((p.user_id, p.meeting_type))
            .or_default();

        group.full_name = p.full_name.clone();
        group.meetings.insert(p.meeting_id);
        if p.is_currently_active.unwrap_or(false) {
            group.active_meetings.insert(p.meeting_id);
        }
        group.duration_sum += p.total_duration_minutes.unwrap_or(0.0);
        group.durations.push(p.total_duration_minutes);
        group.participant_attendance.push(p.participant_attendance);
        group.overall_attendance.push(p.overall_attendance);
        group.sessions.push(p.total_sessions.map(|s| s as f64));

        if let Some(created) = record.meeting.created_at {
            group.first_joined = Some(match group.first_joined {
                Some(current) if current <= created => current,
                _ => created,
            });
            group.last_joined = Some(match group.last_joined {
                Some(current) if current >= created => current,
                _ => created,
            });
        }

        if let Some(session) = &record.monitoring {
            group.popup.push_int(session.popup_count);
            group.detections.push_int(session.total_detections);
            group.penalty.push(session.attendance_penalty);
            group.break_time.push_int(session.total_break_time_used);
            group.engagement.push(session.engagement_score);
            group.focus.push(session.focus_score);
            if session.break_used.unwrap_or(false) {
                group.breaks_taken += 1;
            }
        }
    }

    let mut summaries: Vec<ParticipantSummary> = groups
        .into_iter()
        .map(|((user_id, meeting_type), group)| ParticipantSummary {
            user_id: user_id.to_hex(),
            full_name: group.full_name,
            meeting_participation: MeetingParticipation {
                total_meetings_attended: group.meetings.len() as u64,
                total_participation_time_minutes: round2(group.duration_sum),
                avg_meeting_duration_minutes: group.durations.value(),
                avg_participant_attendance: group.participant_attendance.value(),
                avg_overall_attendance: group.overall_attendance.value(),
                active_meetings: group.active_meetings.len() as u64,
                avg_sessions_per_meeting: group.sessions.value(),
            },
            meeting_type: meeting_type.as_str().to_string(),
            activity_period: ActivityPeriod {
                first_meeting_joined: iso(group.first_joined),
                last_meeting_joined: iso(group.last_joined),
            },
            attendance_analytics: AttendanceAnalytics {
                avg_popup_count: group.popup.value(),
                avg_total_detections: group.detections.value(),
                avg_attendance_penalty: group.penalty.value(),
                avg_break_time_used: group.break_time.value(),
                avg_engagement_score: group.engagement.value(),
                avg_focus_score: group.focus.value(),
                total_breaks_taken: group.breaks_taken,
            },
        })
        .collect();

    summaries.sort_by(|a, b| {
        b.meeting_participation
            .total_meetings_attended
            .cmp(&a.meeting_participation.total_meetings_attended)
            .then_with(|| a.user_id.cmp(&b.user_id))
            .then_with(|| a.meeting_type.cmp(&b.meeting_type))
    });
    summaries
}
