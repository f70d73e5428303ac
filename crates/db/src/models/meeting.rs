use bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meeting {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    #[serde(default)]
    pub meeting_type: MeetingType,
    pub host_id: ObjectId,
    #[serde(default)]
    pub status: MeetingStatus,
    /// Nullable in legacy rows; a meeting whose creation timestamp is also
    /// missing has no resolvable effective time and is excluded from
    /// time-filtered views.
    pub created_at: Option<DateTime>,
    pub started_at: Option<DateTime>,
    pub ended_at: Option<DateTime>,
    pub join_link: String,
    #[serde(default)]
    pub recording_enabled: bool,
    #[serde(default)]
    pub waiting_room_enabled: bool,
    pub updated_at: Option<DateTime>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MeetingType {
    #[default]
    Instant,
    Scheduled,
    Calendar,
}

impl MeetingType {
    /// Display tag used in meeting-time labels.
    pub fn display(&self) -> &'static str {
        match self {
            MeetingType::Instant => "Instant",
            MeetingType::Scheduled => "Scheduled",
            MeetingType::Calendar => "Calendar",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MeetingType::Instant => "instant",
            MeetingType::Scheduled => "scheduled",
            MeetingType::Calendar => "calendar",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "instant" => Some(MeetingType::Instant),
            "scheduled" => Some(MeetingType::Scheduled),
            "calendar" => Some(MeetingType::Calendar),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MeetingStatus {
    #[default]
    Scheduled,
    Active,
    Ended,
}

impl MeetingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MeetingStatus::Scheduled => "scheduled",
            MeetingStatus::Active => "active",
            MeetingStatus::Ended => "ended",
        }
    }
}

impl Meeting {
    pub const COLLECTION: &'static str = "meetings";
}
