use std::collections::{BTreeMap, HashSet};

use bson::oid::ObjectId;
use serde::Serialize;

use meetra_db::models::{MeetingStatus, MeetingType};

use crate::analytics::joiner::HostedMeeting;
use crate::analytics::metrics::{completion_rate, round2, share_percentage, Mean};

use super::iso;

/// Per-(host, meeting-type) rollup of hosting history.
#[derive(Debug, Clone, Serialize)]
pub struct HostSummary {
    pub host_id: String,
    pub meeting_type: String,
    pub meeting_counts: MeetingCounts,
    pub participant_analytics: ParticipantAnalytics,
    pub activity_period: ActivityPeriod,
    pub attendance_monitoring: AttendanceMonitoring,
    pub meeting_features: MeetingFeatures,
}

#[derive(Debug, Clone, Serialize)]
pub struct MeetingCounts {
    pub total_meetings_hosted: u64,
    pub active_meetings: u64,
    pub ended_meetings: u64,
    pub scheduled_meetings: u64,
    pub completion_rate: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ParticipantAnalytics {
    pub total_unique_participants: u64,
    pub avg_meeting_duration_minutes: f64,
    pub avg_participant_attendance: f64,
    pub avg_overall_attendance: f64,
    pub total_hosting_time_minutes: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActivityPeriod {
    pub first_meeting_created: Option<String>,
    pub last_meeting_created: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AttendanceMonitoring {
    pub avg_popup_count: f64,
    pub avg_total_detections: f64,
    pub avg_attendance_penalty: f64,
    pub avg_engagement_score: f64,
    pub total_breaks_used: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MeetingFeatures {
    pub meetings_with_recording_enabled: u64,
    pub meetings_with_waiting_room: u64,
    pub recording_enabled_percentage: f64,
    pub waiting_room_enabled_percentage: f64,
}

#[derive(Default)]
struct Group {
    total: u64,
    active: u64,
    ended: u64,
    scheduled: u64,
    participants: HashSet<ObjectId>,
    durations: Mean,
    participant_attendance: Mean,
    overall_attendance: Mean,
    hosting_minutes: f64,
    first_created: Option<bson::DateTime>,
    last_created: Option<bson::DateTime>,
    popup: Mean,
    detections: Mean,
    penalty: Mean,
    engagement: Mean,
    breaks_used: u64,
    with_recording: u64,
    with_waiting_room: u64,
}

/// Group hosted meetings by (host, meeting-type), ordered by meetings
/// hosted descending with the host id as a stable tie-break.
pub fn build_host_summaries(meetings: &[HostedMeeting]) -> Vec<HostSummary> {
    let mut groups: BTreeMap<(ObjectId, MeetingType), Group> = BTreeMap::new();

    for hosted in meetings {
        let m = &hosted.meeting;
        let group = groups
            .entry((m.host_id, m.meeting_type))
            .or_default();

        group.total += 1;
        match m.status {
            MeetingStatus::Active => group.active += 1,
            MeetingStatus::Ended => group.ended += 1,
            MeetingStatus::Scheduled => group.scheduled += 1,
        }

        if m.recording_enabled {
            group.with_recording += 1;
        }
        if m.waiting_room_enabled {
            group.with_waiting_room += 1;
        }

        if let Some(created) = m.created_at {
            group.first_created = Some(match group.first_created {
                Some(current) if current <= created => current,
                _ => created,
            });
            group.last_created = Some(match group.last_created {
                Some(current) if current >= created => current,
                _ => created,
            });
        }

        for p in &hosted.participants {
            group.participants.insert(p.user_id);
            group.durations.push(p.total_duration_minutes);
            group.participant_attendance.push(p.participant_attendance);
            group.overall_attendance.push(p.overall_attendance);
            group.hosting_minutes += p.total_duration_minutes.unwrap_or(0.0);
        }

        for session in &hosted.monitoring {
            group.popup.push_int(session.popup_count);
            group.detections.push_int(session.total_detections);
            group.penalty.push(session.attendance_penalty);
            group.engagement.push(session.engagement_score);
            if session.break_used.unwrap_or(false) {
                group.breaks_used += 1;
            }
        }
    }

    let mut summaries: Vec<HostSummary> = groups
        .into_iter()
        .map(|((host_id, meeting_type), group)| HostSummary {
            host_id: host_id.to_hex(),
            meeting_type: meeting_type.as_str().to_string(),
            meeting_counts: MeetingCounts {
                total_meetings_hosted: group.total,
                active_meetings: group.active,
                ended_meetings: group.ended,
                scheduled_meetings: group.scheduled,
                completion_rate: completion_rate(group.ended, group.total),
            },
            participant_analytics: ParticipantAnalytics {
                total_unique_participants: group.participants.len() as u64,
                avg_meeting_duration_minutes: group.durations.value(),
                avg_participant_attendance: group.participant_attendance.value(),
                avg_overall_attendance: group.overall_attendance.value(),
                total_hosting_time_minutes: round2(group.hosting_minutes),
            },
            activity_period: ActivityPeriod {
                first_meeting_created: iso(group.first_created),
                last_meeting_created: iso(group.last_created),
            },
            attendance_monitoring: AttendanceMonitoring {
                avg_popup_count: group.popup.value(),
                avg_total_detections: group.detections.value(),
                avg_attendance_penalty: group.penalty.value(),
                avg_engagement_score: group.engagement.value(),
                total_breaks_used: group.breaks_used,
            },
            meeting_features: MeetingFeatures {
                meetings_with_recording_enabled: group.with_recording,
                meetings_with_waiting_room: group.with_waiting_room,
                recording_enabled_percentage: share_percentage(group.with_recording, group.total),
                waiting_room_enabled_percentage: share_percentage(group.with_waiting_room, group.total),
            },
        })
        .collect();

    summaries.sort_by(|a, b| {
        b.meeting_counts
            .total_meetings_hosted
            .cmp(&a.meeting_counts.total_meetings_hosted)
            .then_with(|| a.host_id.cmp(&b.host_id))
            .then_with(|| a.meeting_type.cmp(&b.meeting_type))
    });
    summaries
}
