use std::collections::BTreeSet;

use bson::{doc, oid::ObjectId, Document};
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, TimeZone, Utc};
use serde::Deserialize;
use validator::Validate;

use meetra_db::models::{Meeting, MeetingParticipant, MeetingType, ParticipantRole};

use super::error::{AnalyticsError, AnalyticsResult};

/// Decoded query parameters for the comprehensive analytics endpoint.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AnalyticsParams {
    pub user_id: Option<String>,
    pub meeting_id: Option<String>,
    #[serde(default = "default_timeframe")]
    pub timeframe: String,
    #[serde(default = "default_meeting_type")]
    pub meeting_type: String,
    #[serde(default = "default_analytics_type")]
    pub analytics_type: String,
    #[validate(range(min = 1))]
    #[serde(default = "default_page")]
    pub page: u32,
    #[validate(range(min = 1, max = 500))]
    pub limit: Option<u32>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

fn default_timeframe() -> String {
    "30days".to_string()
}

fn default_meeting_type() -> String {
    "all".to_string()
}

fn default_analytics_type() -> String {
    "all".to_string()
}

fn default_page() -> u32 {
    1
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ViewKind {
    Participant,
    Host,
    Meeting,
}

/// The set of views a request asked for, replacing the implicit
/// presence-of-local-variable checks in older builds with an explicit
/// argument threaded through the façade.
#[derive(Debug, Clone)]
pub struct ViewSelection {
    kinds: BTreeSet<ViewKind>,
    label: String,
}

impl ViewSelection {
    pub fn parse(token: &str) -> AnalyticsResult<Self> {
        let kinds: BTreeSet<ViewKind> = match token {
            "all" => [ViewKind::Participant, ViewKind::Host, ViewKind::Meeting]
                .into_iter()
                .collect(),
            "participant" => [ViewKind::Participant].into_iter().collect(),
            "host" => [ViewKind::Host].into_iter().collect(),
            "meeting" => [ViewKind::Meeting].into_iter().collect(),
            other => {
                return Err(AnalyticsError::InvalidParameter(format!(
                    "Invalid analytics_type '{}': expected all, participant, host or meeting",
                    other
                )));
            }
        };
        Ok(Self {
            kinds,
            label: token.to_string(),
        })
    }

    pub fn contains(&self, kind: ViewKind) -> bool {
        self.kinds.contains(&kind)
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeetingTypeFilter {
    All,
    Only(MeetingType),
}

impl MeetingTypeFilter {
    pub fn parse(token: &str) -> AnalyticsResult<Self> {
        if token == "all" {
            return Ok(MeetingTypeFilter::All);
        }
        MeetingType::parse(token)
            .map(MeetingTypeFilter::Only)
            .ok_or_else(|| {
                AnalyticsError::InvalidParameter(format!(
                    "Invalid meeting_type '{}': expected all, instant, scheduled or calendar",
                    token
                ))
            })
    }

    pub fn admits(&self, meeting_type: MeetingType) -> bool {
        match self {
            MeetingTypeFilter::All => true,
            MeetingTypeFilter::Only(t) => *t == meeting_type,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timeframe {
    Days7,
    Days30,
    Days90,
    Year1,
}

impl Timeframe {
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "7days" => Some(Timeframe::Days7),
            "30days" => Some(Timeframe::Days30),
            "90days" => Some(Timeframe::Days90),
            "1year" => Some(Timeframe::Year1),
            _ => None,
        }
    }

    pub fn duration(&self) -> Duration {
        match self {
            Timeframe::Days7 => Duration::days(7),
            Timeframe::Days30 => Duration::days(30),
            Timeframe::Days90 => Duration::days(90),
            Timeframe::Year1 => Duration::days(365),
        }
    }
}

/// Inclusive reporting window, resolved to instants.
///
/// Explicit bounds are calendar dates widened to day boundaries in the
/// fixed reporting offset: start-of-day for the lower bound, 23:59:59.999999
/// for the upper. Without explicit bounds the window is the named timeframe
/// anchored to `now` (unknown timeframe tokens fall back to 30 days).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub offset: FixedOffset,
}

impl DateWindow {
    pub fn resolve(
        start_date: Option<&str>,
        end_date: Option<&str>,
        timeframe: &str,
        now: DateTime<Utc>,
        offset: FixedOffset,
    ) -> AnalyticsResult<Self> {
        let end = match end_date {
            Some(raw) => {
                let date = parse_day(raw)?;
                let local = date
                    .and_hms_micro_opt(23, 59, 59, 999_999)
                    .expect("valid end-of-day time");
                offset
                    .from_local_datetime(&local)
                    .single()
                    .expect("fixed offset is unambiguous")
                    .with_timezone(&Utc)
            }
            None => now,
        };

        let start = match start_date {
            Some(raw) => {
                let date = parse_day(raw)?;
                let local = date.and_hms_opt(0, 0, 0).expect("valid start-of-day time");
                offset
                    .from_local_datetime(&local)
                    .single()
                    .expect("fixed offset is unambiguous")
                    .with_timezone(&Utc)
            }
            None => {
                let frame = Timeframe::parse(timeframe).unwrap_or(Timeframe::Days30);
                end - frame.duration()
            }
        };

        Ok(Self { start, end, offset })
    }

    /// Window over a strict timeframe token only (no explicit bounds);
    /// rejects unknown tokens instead of defaulting.
    pub fn for_timeframe(
        timeframe: &str,
        now: DateTime<Utc>,
        offset: FixedOffset,
    ) -> AnalyticsResult<Self> {
        let frame = Timeframe::parse(timeframe).ok_or_else(|| {
            AnalyticsError::InvalidParameter(format!("Invalid timeframe '{}'", timeframe))
        })?;
        Ok(Self {
            start: now - frame.duration(),
            end: now,
            offset,
        })
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant <= self.end
    }

    pub fn start_label(&self) -> String {
        self.start.with_timezone(&self.offset).to_rfc3339()
    }

    pub fn end_label(&self) -> String {
        self.end.with_timezone(&self.offset).to_rfc3339()
    }
}

fn parse_day(raw: &str) -> AnalyticsResult<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
        AnalyticsError::InvalidParameter(format!(
            "Invalid date '{}': expected YYYY-MM-DD",
            raw
        ))
    })
}

/// How the joiner applies the window to a row's timestamps.
#[derive(Debug, Clone, Copy)]
pub enum TimeFilter {
    /// Resolved effective time must fall inside the window.
    EffectiveWithin(DateWindow),
    /// Meeting creation time must fall inside the window.
    CreatedWithin(DateWindow),
    /// No time restriction.
    Unbounded,
}

/// The immutable, request-scoped aggregation filter.
#[derive(Debug, Clone)]
pub struct AggregationFilter {
    pub user_id: Option<ObjectId>,
    pub meeting_id: Option<ObjectId>,
    pub meeting_type: MeetingTypeFilter,
    pub window: DateWindow,
    pub page: u32,
    pub page_size: u32,
    pub timeframe: String,
}

impl AggregationFilter {
    pub fn from_params(
        params: &AnalyticsParams,
        now: DateTime<Utc>,
        offset: FixedOffset,
        default_page_size: u32,
    ) -> AnalyticsResult<Self> {
        params
            .validate()
            .map_err(|e| AnalyticsError::InvalidParameter(e.to_string()))?;

        let user_id = parse_optional_id(params.user_id.as_deref(), "user_id")?;
        let meeting_id = parse_optional_id(params.meeting_id.as_deref(), "meeting_id")?;
        let meeting_type = MeetingTypeFilter::parse(&params.meeting_type)?;
        let window = DateWindow::resolve(
            params.start_date.as_deref(),
            params.end_date.as_deref(),
            &params.timeframe,
            now,
            offset,
        )?;

        Ok(Self {
            user_id,
            meeting_id,
            meeting_type,
            window,
            page: params.page,
            page_size: params.limit.unwrap_or(default_page_size),
            timeframe: params.timeframe.clone(),
        })
    }
}

pub fn parse_optional_id(
    raw: Option<&str>,
    field: &str,
) -> AnalyticsResult<Option<ObjectId>> {
    raw.map(|value| {
        ObjectId::parse_str(value)
            .map_err(|_| AnalyticsError::InvalidParameter(format!("Invalid {}", field)))
    })
    .transpose()
}

/// Composable row predicate shared by the storage prefilter and the
/// in-memory joiner, so both evaluate the same conditions.
#[derive(Debug, Clone, Default)]
pub struct RecordPredicate {
    user_id: Option<ObjectId>,
    host_id: Option<ObjectId>,
    meeting_id: Option<ObjectId>,
    role: Option<ParticipantRole>,
    meeting_type: Option<MeetingType>,
}

impl RecordPredicate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user(mut self, user_id: ObjectId) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn host(mut self, host_id: ObjectId) -> Self {
        self.host_id = Some(host_id);
        self
    }

    pub fn meeting(mut self, meeting_id: ObjectId) -> Self {
        self.meeting_id = Some(meeting_id);
        self
    }

    pub fn role(mut self, role: ParticipantRole) -> Self {
        self.role = Some(role);
        self
    }

    pub fn meeting_type(mut self, filter: MeetingTypeFilter) -> Self {
        if let MeetingTypeFilter::Only(t) = filter {
            self.meeting_type = Some(t);
        }
        self
    }

    /// Render as a filter over `meeting_participants`.
    pub fn to_participant_document(&self) -> Document {
        let mut filter = doc! {};
        if let Some(user_id) = self.user_id {
            filter.insert("user_id", user_id);
        }
        if let Some(meeting_id) = self.meeting_id {
            filter.insert("meeting_id", meeting_id);
        }
        if let Some(role) = self.role {
            filter.insert("role", role.as_str());
        }
        if let Some(t) = self.meeting_type {
            filter.insert("meeting_type", t.as_str());
        }
        filter
    }

    /// Render as a filter over `meetings`.
    pub fn to_meeting_document(&self) -> Document {
        let mut filter = doc! {};
        if let Some(host_id) = self.host_id {
            filter.insert("host_id", host_id);
        }
        if let Some(meeting_id) = self.meeting_id {
            filter.insert("_id", meeting_id);
        }
        if let Some(t) = self.meeting_type {
            filter.insert("meeting_type", t.as_str());
        }
        filter
    }

    pub fn matches_participant(&self, record: &MeetingParticipant) -> bool {
        if let Some(user_id) = self.user_id {
            if record.user_id != user_id {
                return false;
            }
        }
        if let Some(meeting_id) = self.meeting_id {
            if record.meeting_id != meeting_id {
                return false;
            }
        }
        if let Some(role) = self.role {
            if record.role != role {
                return false;
            }
        }
        if let Some(t) = self.meeting_type {
            if record.meeting_type != t {
                return false;
            }
        }
        true
    }

    pub fn matches_meeting(&self, meeting: &Meeting) -> bool {
        if let Some(host_id) = self.host_id {
            if meeting.host_id != host_id {
                return false;
            }
        }
        if let Some(meeting_id) = self.meeting_id {
            if meeting.id != Some(meeting_id) {
                return false;
            }
        }
        if let Some(t) = self.meeting_type {
            if meeting.meeting_type != t {
                return false;
            }
        }
        true
    }
}
