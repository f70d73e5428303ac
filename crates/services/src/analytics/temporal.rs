use bson::DateTime;

use meetra_db::models::{CalendarMeeting, Meeting, MeetingType, ScheduledMeeting};

/// Resolve the canonical effective start time of a meeting.
///
/// Fallback order: explicit started timestamp, then the type-matched
/// scheduling row's start (scheduled meetings consult `scheduled_meetings`,
/// calendar meetings consult `calendar_meetings`), then the creation
/// timestamp. A scheduling row whose type does not match the meeting's tag
/// contributes nothing to the chain — it is skipped by the coalescing
/// order, not filtered out upstream. Returns `None` only when the creation
/// timestamp itself is missing; such meetings are excluded from
/// time-filtered views.
pub fn effective_time(
    meeting: &Meeting,
    scheduled: Option<&ScheduledMeeting>,
    calendar: Option<&CalendarMeeting>,
) -> Option<DateTime> {
    if let Some(started) = meeting.started_at {
        return Some(started);
    }

    if meeting.meeting_type == MeetingType::Scheduled {
        if let Some(start) = scheduled.and_then(|row| row.start_time) {
            return Some(start);
        }
    }

    if meeting.meeting_type == MeetingType::Calendar {
        if let Some(start) = calendar.and_then(|row| row.start_time) {
            return Some(start);
        }
    }

    meeting.created_at
}
