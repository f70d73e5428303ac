use bson::oid::ObjectId;
use chrono::{DateTime, Utc};

use meetra_db::models::{
    CalendarMeeting, Meeting, MeetingParticipant, MeetingStatus, MeetingType,
    MonitoringSession, ParticipantRole, ScheduledMeeting,
};

/// Parse an RFC 3339 timestamp into a BSON datetime.
pub fn dt(raw: &str) -> bson::DateTime {
    let parsed: DateTime<Utc> = raw
        .parse()
        .unwrap_or_else(|_| panic!("invalid test timestamp: {raw}"));
    bson::DateTime::from_chrono(parsed)
}

pub fn meeting(
    id: ObjectId,
    name: &str,
    meeting_type: MeetingType,
    host_id: ObjectId,
    created_at: Option<&str>,
) -> Meeting {
    Meeting {
        id: Some(id),
        name: name.to_string(),
        meeting_type,
        host_id,
        status: MeetingStatus::Ended,
        created_at: created_at.map(dt),
        started_at: None,
        ended_at: None,
        join_link: format!("/join/{}", name),
        recording_enabled: false,
        waiting_room_enabled: false,
        updated_at: created_at.map(dt),
    }
}

pub fn started(mut m: Meeting, started_at: &str) -> Meeting {
    m.started_at = Some(dt(started_at));
    m.status = MeetingStatus::Active;
    m
}

pub fn ended(mut m: Meeting, started_at: &str, ended_at: &str) -> Meeting {
    m.started_at = Some(dt(started_at));
    m.ended_at = Some(dt(ended_at));
    m.status = MeetingStatus::Ended;
    m
}

pub fn scheduled_row(meeting_id: ObjectId, start_time: &str) -> ScheduledMeeting {
    ScheduledMeeting {
        id: meeting_id,
        start_time: Some(dt(start_time)),
        end_time: None,
        agenda: None,
    }
}

pub fn calendar_row(meeting_id: ObjectId, start_time: &str) -> CalendarMeeting {
    CalendarMeeting {
        id: meeting_id,
        start_time: Some(dt(start_time)),
        end_time: None,
        calendar_ref: None,
    }
}

pub fn participant(
    meeting: &Meeting,
    user_id: ObjectId,
    full_name: &str,
    role: ParticipantRole,
    duration_minutes: Option<f64>,
) -> MeetingParticipant {
    let created = meeting.created_at.unwrap_or_else(bson::DateTime::now);
    MeetingParticipant {
        id: Some(ObjectId::new()),
        meeting_id: meeting.id.expect("seeded meetings have ids"),
        user_id,
        full_name: full_name.to_string(),
        role,
        meeting_type: meeting.meeting_type,
        join_times: vec![created],
        leave_times: Vec::new(),
        total_duration_minutes: duration_minutes,
        total_sessions: Some(1),
        end_meeting_time: None,
        is_currently_active: Some(false),
        host_based_attendance: None,
        participant_attendance: None,
        overall_attendance: None,
        last_seen_at: Some(created),
        created_at: created,
        updated_at: created,
    }
}

pub fn with_attendance(
    mut p: MeetingParticipant,
    host_based: f64,
    participant: f64,
    overall: f64,
) -> MeetingParticipant {
    p.host_based_attendance = Some(host_based);
    p.participant_attendance = Some(participant);
    p.overall_attendance = Some(overall);
    p
}

pub fn monitoring(
    meeting_id: ObjectId,
    user_id: ObjectId,
    popup_count: Option<i64>,
    engagement_score: Option<f64>,
) -> MonitoringSession {
    let now = dt("2024-01-10T10:00:00Z");
    MonitoringSession {
        id: Some(ObjectId::new()),
        meeting_id,
        user_id,
        popup_count,
        total_detections: None,
        attendance_penalty: None,
        break_used: None,
        total_break_time_used: None,
        break_count: None,
        engagement_score,
        attendance_percentage: None,
        session_active: None,
        focus_score: None,
        violation_severity_score: None,
        active_participation_time: None,
        total_session_time: None,
        last_violation_type: None,
        continuous_violation_time: None,
        violations: None,
        detection_counts: None,
        violation_start_times: None,
        created_at: now,
        updated_at: now,
    }
}
