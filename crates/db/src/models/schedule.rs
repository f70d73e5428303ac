use bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

/// Scheduling row for a meeting created through the scheduler.
/// Shares its `_id` with the parent meeting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledMeeting {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub start_time: Option<DateTime>,
    pub end_time: Option<DateTime>,
    pub agenda: Option<String>,
}

/// Scheduling row for a meeting imported from a calendar.
/// Shares its `_id` with the parent meeting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarMeeting {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub start_time: Option<DateTime>,
    pub end_time: Option<DateTime>,
    pub calendar_ref: Option<String>,
}

impl ScheduledMeeting {
    pub const COLLECTION: &'static str = "scheduled_meetings";
}

impl CalendarMeeting {
    pub const COLLECTION: &'static str = "calendar_meetings";
}
