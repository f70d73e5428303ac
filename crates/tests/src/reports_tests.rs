use std::sync::Arc;

use bson::oid::ObjectId;
use chrono::{TimeZone, Utc};

use meetra_db::models::{MeetingType, ParticipantRole};
use meetra_services::analytics::reports::{HostReportParams, RecordReportParams};
use meetra_services::analytics::AnalyticsError;

use crate::fixtures::memory_source::{engine_over, MemorySource};
use crate::fixtures::seed::{ended, meeting, participant, started, with_attendance};

fn fixed_now() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap()
}

fn record_params() -> RecordReportParams {
    RecordReportParams {
        user_id: None,
        meeting_id: None,
        timeframe: "30days".to_string(),
        meeting_type: "all".to_string(),
    }
}

fn host_params() -> HostReportParams {
    HostReportParams {
        user_id: None,
        host_id: None,
        timeframe: "30days".to_string(),
        meeting_type: "all".to_string(),
    }
}

#[tokio::test]
async fn duration_report_requires_an_identity() {
    let engine = engine_over(Arc::new(MemorySource::new()));
    let err = engine.duration_analytics(&record_params()).await.unwrap_err();
    assert!(matches!(err, AnalyticsError::InvalidParameter(_)));
}

#[tokio::test]
async fn duration_report_computes_the_participation_share() {
    let user = ObjectId::new();
    let finished = ended(
        meeting(ObjectId::new(), "finished", MeetingType::Instant, ObjectId::new(), Some("2024-01-10T09:00:00Z")),
        "2024-01-10T09:00:00Z",
        "2024-01-10T10:00:00Z",
    );
    // Started but never ended: wall-clock duration unknown
    let open = started(
        meeting(ObjectId::new(), "open", MeetingType::Instant, ObjectId::new(), Some("2024-01-11T09:00:00Z")),
        "2024-01-11T09:00:00Z",
    );

    let source = MemorySource::new()
        .with_participant(participant(&finished, user, "Alice", ParticipantRole::Participant, Some(30.0)))
        .with_participant(participant(&open, user, "Alice", ParticipantRole::Participant, Some(30.0)))
        .with_meeting(finished)
        .with_meeting(open);
    let engine = engine_over(Arc::new(source));

    let mut params = record_params();
    params.user_id = Some(user.to_hex());
    let records = engine.duration_analytics(&params).await.unwrap();
    assert_eq!(records.len(), 2);

    // Newest meeting first
    assert_eq!(records[0].meeting_name, "open");
    assert_eq!(records[0].duration_analysis.meeting_total_duration_minutes, None);
    assert_eq!(records[0].duration_analysis.participation_percentage, None);

    assert_eq!(records[1].meeting_name, "finished");
    assert_eq!(records[1].duration_analysis.meeting_total_duration_minutes, Some(60.0));
    assert_eq!(records[1].duration_analysis.participation_percentage, Some(50.0));
}

#[tokio::test]
async fn host_meeting_counts_report_features_and_completion() {
    let host = ObjectId::new();
    let mut source = MemorySource::new();
    for i in 0..4 {
        let mut m = ended(
            meeting(ObjectId::new(), &format!("m{i}"), MeetingType::Instant, host, Some("2024-01-10T09:00:00Z")),
            "2024-01-10T09:05:00Z",
            "2024-01-10T09:35:00Z",
        );
        m.recording_enabled = i < 3;
        m.waiting_room_enabled = i == 0;
        source = source.with_meeting(m);
    }
    let engine = engine_over(Arc::new(source));

    let mut params = host_params();
    params.host_id = Some(host.to_hex());
    let counts = engine.host_meeting_counts(&params, fixed_now()).await.unwrap();
    assert_eq!(counts.len(), 1);

    let c = &counts[0];
    assert_eq!(c.meeting_counts.total_meetings_created, 4);
    assert_eq!(c.meeting_counts.completion_rate, 100.0);
    assert_eq!(c.duration_analytics.avg_actual_meeting_duration_minutes, 30.0);
    assert_eq!(c.duration_analytics.total_actual_hosted_duration_minutes, 120.0);
    assert_eq!(c.duration_analytics.total_actual_hosted_duration_hours, 2.0);
    assert_eq!(c.meeting_features.meetings_with_recording_enabled, 3);
    assert_eq!(c.meeting_features.recording_enabled_percentage, 75.0);
    assert_eq!(c.meeting_features.waiting_room_enabled_percentage, 25.0);
}

#[tokio::test]
async fn host_overview_requires_user_and_a_known_timeframe() {
    let engine = engine_over(Arc::new(MemorySource::new()));

    let err = engine.host_overview(&host_params(), fixed_now()).await.unwrap_err();
    assert!(matches!(err, AnalyticsError::InvalidParameter(_)));

    let mut bad_frame = host_params();
    bad_frame.user_id = Some(ObjectId::new().to_hex());
    bad_frame.timeframe = "fortnight".to_string();
    let err = engine.host_overview(&bad_frame, fixed_now()).await.unwrap_err();
    assert!(matches!(err, AnalyticsError::InvalidParameter(_)));
}

#[tokio::test]
async fn host_overview_rolls_up_status_and_participants() {
    let host = ObjectId::new();
    let alice = ObjectId::new();
    let m = ended(
        meeting(ObjectId::new(), "m", MeetingType::Instant, host, Some("2024-01-10T09:00:00Z")),
        "2024-01-10T09:05:00Z",
        "2024-01-10T10:05:00Z",
    );
    let source = MemorySource::new()
        .with_participant(with_attendance(
            participant(&m, alice, "Alice", ParticipantRole::Participant, Some(30.0)),
            80.0,
            75.0,
            78.0,
        ))
        .with_meeting(m);
    let engine = engine_over(Arc::new(source));

    let mut params = host_params();
    params.user_id = Some(host.to_hex());
    let overview = engine.host_overview(&params, fixed_now()).await.unwrap();

    assert_eq!(overview.total_meetings, 1);
    assert_eq!(overview.total_participants, 1);
    assert_eq!(overview.average_duration_minutes, 30.0);
    assert_eq!(overview.avg_participant_attendance, 75.0);
    assert_eq!(overview.meeting_status_breakdown.ended_meetings, 1);
    assert_eq!(overview.meeting_status_breakdown.active_meetings, 0);
}

#[tokio::test]
async fn attendance_report_lists_records_and_summarizes_the_window() {
    let host = ObjectId::new();
    let alice = ObjectId::new();
    let bob = ObjectId::new();
    let m = ended(
        meeting(ObjectId::new(), "m", MeetingType::Instant, host, Some("2024-01-10T09:00:00Z")),
        "2024-01-10T09:05:00Z",
        "2024-01-10T10:05:00Z",
    );
    let source = MemorySource::new()
        .with_participant(with_attendance(
            participant(&m, alice, "Alice", ParticipantRole::Participant, Some(30.0)),
            80.0,
            70.0,
            75.0,
        ))
        .with_participant(with_attendance(
            participant(&m, bob, "Bob", ParticipantRole::Participant, Some(40.0)),
            90.0,
            80.0,
            85.0,
        ))
        .with_meeting(m);
    let engine = engine_over(Arc::new(source));

    // Listing filtered to Alice; the summary still spans the whole window
    let mut params = record_params();
    params.user_id = Some(alice.to_hex());
    let report = engine.attendance_analytics(&params, fixed_now()).await.unwrap();

    assert_eq!(report.attendance_details.len(), 1);
    let detail = &report.attendance_details[0];
    assert_eq!(detail.full_name, "Alice");
    assert_eq!(detail.participant_attendance_metrics.participant_attendance, 70.0);
    // No monitoring row: advanced block coalesces to defaults
    assert_eq!(detail.advanced_monitoring.break_count, 0);
    assert_eq!(detail.advanced_monitoring.last_violation_type, None);

    assert_eq!(report.attendance_summary.total_participants, 2);
    assert_eq!(report.attendance_summary.avg_participant_attendance, 75.0);
    assert_eq!(report.attendance_summary.avg_attendance_based_on_host, 85.0);
    assert_eq!(report.filters_applied.timeframe, "30days");
}
