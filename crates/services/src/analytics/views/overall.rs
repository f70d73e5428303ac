use std::collections::HashSet;

use bson::oid::ObjectId;
use serde::Serialize;

use meetra_db::models::MeetingStatus;

use crate::analytics::filter::DateWindow;
use crate::analytics::joiner::HostedMeeting;
use crate::analytics::metrics::{round2, Mean};

/// Single-row rollup across the whole filtered window. Every average here
/// reports 0 over an empty set — "no data" at the aggregate level is a
/// zero, never a null.
#[derive(Debug, Clone, Serialize)]
pub struct OverallSummary {
    pub total_meetings: u64,
    pub total_hosts: u64,
    pub total_participants: u64,
    pub avg_duration_minutes: f64,
    pub avg_participant_attendance: f64,
    pub avg_overall_attendance: f64,
    pub total_duration_hours: f64,
    pub ended_meetings: u64,
    pub active_meetings: u64,
    pub scheduled_meetings: u64,
    pub attendance_monitoring_summary: MonitoringSummary,
    pub date_range: DateRange,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonitoringSummary {
    pub overall_avg_popup_count: f64,
    pub overall_avg_detections: f64,
    pub overall_avg_penalty: f64,
    pub overall_avg_engagement: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DateRange {
    pub start: String,
    pub end: String,
}

pub fn build_overall_summary(
    meetings: &[HostedMeeting],
    window: &DateWindow,
) -> OverallSummary {
    let mut hosts: HashSet<ObjectId> = HashSet::new();
    let mut participants: HashSet<ObjectId> = HashSet::new();
    let mut durations = Mean::new();
    let mut participant_attendance = Mean::new();
    let mut overall_attendance = Mean::new();
    let mut total_minutes = 0.0;
    let (mut ended, mut active, mut scheduled) = (0u64, 0u64, 0u64);
    let mut popup = Mean::new();
    let mut detections = Mean::new();
    let mut penalty = Mean::new();
    let mut engagement = Mean::new();

    for hosted in meetings {
        hosts.insert(hosted.meeting.host_id);
        match hosted.meeting.status {
            MeetingStatus::Ended => ended += 1,
            MeetingStatus::Active => active += 1,
            MeetingStatus::Scheduled => scheduled += 1,
        }

        for p in &hosted.participants {
            participants.insert(p.user_id);
            durations.push(p.total_duration_minutes);
            participant_attendance.push(p.participant_attendance);
            overall_attendance.push(p.overall_attendance);
            total_minutes += p.total_duration_minutes.unwrap_or(0.0);
        }

        for session in &hosted.monitoring {
            popup.push_int(session.popup_count);
            detections.push_int(session.total_detections);
            penalty.push(session.attendance_penalty);
            engagement.push(session.engagement_score);
        }
    }

    OverallSummary {
        total_meetings: meetings.len() as u64,
        total_hosts: hosts.len() as u64,
        total_participants: participants.len() as u64,
        avg_duration_minutes: durations.value(),
        avg_participant_attendance: participant_attendance.value(),
        avg_overall_attendance: overall_attendance.value(),
        total_duration_hours: round2(total_minutes / 60.0),
        ended_meetings: ended,
        active_meetings: active,
        scheduled_meetings: scheduled,
        attendance_monitoring_summary: MonitoringSummary {
            overall_avg_popup_count: popup.value(),
            overall_avg_detections: detections.value(),
            overall_avg_penalty: penalty.value(),
            overall_avg_engagement: engagement.value(),
        },
        date_range: DateRange {
            start: window.start_label(),
            end: window.end_label(),
        },
    }
}
