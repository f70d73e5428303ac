use bson::oid::ObjectId;

use meetra_db::models::MeetingType;
use meetra_services::analytics::temporal::effective_time;

use crate::fixtures::seed::{calendar_row, dt, meeting, scheduled_row, started};

#[test]
fn explicit_start_wins_over_everything() {
    let id = ObjectId::new();
    let m = started(
        meeting(id, "m", MeetingType::Scheduled, ObjectId::new(), Some("2024-01-10T09:00:00Z")),
        "2024-01-10T09:05:00Z",
    );
    let sched = scheduled_row(id, "2024-01-10T08:00:00Z");
    let cal = calendar_row(id, "2024-01-10T07:00:00Z");

    let resolved = effective_time(&m, Some(&sched), Some(&cal));
    assert_eq!(resolved, Some(dt("2024-01-10T09:05:00Z")));
}

#[test]
fn scheduled_meeting_falls_back_to_scheduled_start() {
    let id = ObjectId::new();
    let m = meeting(id, "m", MeetingType::Scheduled, ObjectId::new(), Some("2024-01-01T00:00:00Z"));
    let sched = scheduled_row(id, "2024-01-10T08:00:00Z");

    let resolved = effective_time(&m, Some(&sched), None);
    assert_eq!(resolved, Some(dt("2024-01-10T08:00:00Z")));
}

#[test]
fn calendar_meeting_falls_back_to_calendar_start() {
    let id = ObjectId::new();
    let m = meeting(id, "m", MeetingType::Calendar, ObjectId::new(), Some("2024-01-01T00:00:00Z"));
    let cal = calendar_row(id, "2024-01-12T11:00:00Z");

    let resolved = effective_time(&m, None, Some(&cal));
    assert_eq!(resolved, Some(dt("2024-01-12T11:00:00Z")));
}

#[test]
fn mismatched_schedule_row_is_skipped_by_the_coalesce_order() {
    // An instant meeting carrying a scheduling row: the row is present in
    // the join but contributes nothing, so resolution lands on created_at
    let id = ObjectId::new();
    let m = meeting(id, "m", MeetingType::Instant, ObjectId::new(), Some("2024-01-05T06:00:00Z"));
    let sched = scheduled_row(id, "2024-01-10T08:00:00Z");
    let cal = calendar_row(id, "2024-01-11T08:00:00Z");

    let resolved = effective_time(&m, Some(&sched), Some(&cal));
    assert_eq!(resolved, Some(dt("2024-01-05T06:00:00Z")));
}

#[test]
fn degrades_to_creation_timestamp() {
    let id = ObjectId::new();
    let m = meeting(id, "m", MeetingType::Scheduled, ObjectId::new(), Some("2024-01-03T12:00:00Z"));

    let resolved = effective_time(&m, None, None);
    assert_eq!(resolved, Some(dt("2024-01-03T12:00:00Z")));
}

#[test]
fn unresolvable_meeting_yields_none_without_panicking() {
    let id = ObjectId::new();
    let m = meeting(id, "m", MeetingType::Instant, ObjectId::new(), None);

    assert_eq!(effective_time(&m, None, None), None);
}
