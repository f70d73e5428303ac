use std::collections::{HashMap, HashSet};

use bson::oid::ObjectId;
use chrono::FixedOffset;
use serde::Serialize;

use crate::analytics::joiner::{HostedMeeting, JoinedRecord};

/// One selectable meeting time for the client-side time filter: the
/// resolved effective start, rendered in the reporting offset, with a
/// display label and a count of listed meetings sharing the same day.
#[derive(Debug, Clone, Serialize)]
pub struct MeetingTimeEntry {
    pub meeting_id: String,
    pub meeting_name: String,
    pub meeting_type: String,
    pub date: String,
    pub time: String,
    pub display_time: String,
    pub datetime_for_filter: String,
    pub label: String,
    pub role: String,
    pub same_day_count: u64,
}

/// Times where the identity attended as a plain participant, newest first.
pub fn build_participant_times(
    records: &[JoinedRecord],
    offset: FixedOffset,
) -> Vec<MeetingTimeEntry> {
    let mut ordered: Vec<&JoinedRecord> = records.iter().collect();
    ordered.sort_by_key(|r| std::cmp::Reverse(r.effective_time.timestamp_millis()));

    let mut entries: Vec<MeetingTimeEntry> = ordered
        .into_iter()
        .map(|record| {
            let local = record.effective_time.to_chrono().with_timezone(&offset);
            let display_time = local.format("%I:%M %p").to_string();
            let duration = match record.participation.total_duration_minutes {
                Some(minutes) if minutes != 0.0 => format!("{}m", minutes as i64),
                _ => "N/A".to_string(),
            };
            MeetingTimeEntry {
                meeting_id: record.participation.meeting_id.to_hex(),
                meeting_name: record.meeting.name.clone(),
                meeting_type: record.meeting.meeting_type.as_str().to_string(),
                date: local.format("%Y-%m-%d").to_string(),
                time: local.format("%H:%M").to_string(),
                display_time: display_time.clone(),
                datetime_for_filter: local.format("%Y-%m-%d %H:%M").to_string(),
                label: format!(
                    "{} - {} ({}) - {}",
                    display_time,
                    record.meeting.name,
                    record.meeting.meeting_type.display(),
                    duration
                ),
                role: "participant".to_string(),
                same_day_count: 0,
            }
        })
        .collect();

    fill_same_day_counts(&mut entries);
    entries
}

/// Times where the identity hosted, newest first. Hosted listings only
/// include meetings that actually started.
pub fn build_host_times(
    meetings: &[HostedMeeting],
    offset: FixedOffset,
) -> Vec<MeetingTimeEntry> {
    let mut ordered: Vec<&HostedMeeting> = meetings
        .iter()
        .filter(|hosted| hosted.meeting.started_at.is_some())
        .collect();
    ordered.sort_by_key(|h| std::cmp::Reverse(h.effective_time.timestamp_millis()));

    let mut entries: Vec<MeetingTimeEntry> = ordered
        .into_iter()
        .map(|hosted| {
            let local = hosted.effective_time.to_chrono().with_timezone(&offset);
            let display_time = local.format("%I:%M %p").to_string();
            let participant_count = hosted
                .participants
                .iter()
                .map(|p| p.user_id)
                .collect::<HashSet<ObjectId>>()
                .len();
            MeetingTimeEntry {
                meeting_id: hosted
                    .meeting
                    .id
                    .map(|id| id.to_hex())
                    .unwrap_or_default(),
                meeting_name: hosted.meeting.name.clone(),
                meeting_type: hosted.meeting.meeting_type.as_str().to_string(),
                date: local.format("%Y-%m-%d").to_string(),
                time: local.format("%H:%M").to_string(),
                display_time: display_time.clone(),
                datetime_for_filter: local.format("%Y-%m-%d %H:%M").to_string(),
                label: format!(
                    "{} - {} ({}) - {} participants",
                    display_time,
                    hosted.meeting.name,
                    hosted.meeting.meeting_type.display(),
                    participant_count
                ),
                role: "host".to_string(),
                same_day_count: 0,
            }
        })
        .collect();

    fill_same_day_counts(&mut entries);
    entries
}

fn fill_same_day_counts(entries: &mut [MeetingTimeEntry]) {
    let mut per_day: HashMap<String, u64> = HashMap::new();
    for entry in entries.iter() {
        *per_day.entry(entry.date.clone()).or_insert(0) += 1;
    }
    for entry in entries.iter_mut() {
        entry.same_day_count = per_day[&entry.date];
    }
}
