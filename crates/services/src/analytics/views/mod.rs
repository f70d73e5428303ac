mod host_summary;
mod meeting_summary;
mod overall;
mod participant_detail;
mod participant_summary;
mod times;

pub use host_summary::{build_host_summaries, HostSummary};
pub use meeting_summary::{build_meeting_summaries, MeetingSummary};
pub use overall::{build_overall_summary, OverallSummary};
pub use participant_detail::{build_participant_details, ParticipantDetail};
pub use participant_summary::{build_participant_summaries, ParticipantSummary};
pub use times::{build_host_times, build_participant_times, MeetingTimeEntry};

use chrono::SecondsFormat;

/// Canonical timestamp rendering for every view (UTC, millisecond
/// precision), so identical inputs always serialize identically.
pub fn iso(dt: Option<bson::DateTime>) -> Option<String> {
    dt.map(iso_at)
}

pub fn iso_at(dt: bson::DateTime) -> String {
    dt.to_chrono().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// LIMIT/OFFSET-style pagination: 1-indexed page, skip `(page-1)*size`,
/// return up to `size` rows. A page past the end is an empty list.
pub(crate) fn paginate<T>(items: Vec<T>, page: u32, size: u32) -> Vec<T> {
    let skip = (page.saturating_sub(1) as usize).saturating_mul(size as usize);
    items.into_iter().skip(skip).take(size as usize).collect()
}
