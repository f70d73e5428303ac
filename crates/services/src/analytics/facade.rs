use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Utc};
use serde::Serialize;
use tracing::debug;

use meetra_config::settings::AnalyticsSettings;
use meetra_db::models::ParticipantRole;

use super::error::AnalyticsResult;
use super::filter::{
    AggregationFilter, AnalyticsParams, RecordPredicate, TimeFilter, ViewKind, ViewSelection,
};
use super::joiner::RecordJoiner;
use super::source::AnalyticsSource;
use super::views::{
    build_host_summaries, build_host_times, build_meeting_summaries, build_overall_summary,
    build_participant_details, build_participant_summaries, build_participant_times,
    HostSummary, MeetingSummary, MeetingTimeEntry, OverallSummary, ParticipantDetail,
    ParticipantSummary,
};

/// Response envelope of the comprehensive analytics query. The overall
/// summary, time listing and filter echo are always present; per-view
/// sections appear only when their view was requested.
#[derive(Debug, Serialize)]
pub struct AnalyticsEnvelope {
    pub overall_summary: OverallSummary,
    pub available_meeting_times: Vec<MeetingTimeEntry>,
    pub filters_applied: FiltersApplied,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub participant_details: Option<Vec<ParticipantDetail>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub participant_summary: Option<Vec<ParticipantSummary>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host_analytics: Option<Vec<HostSummary>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meeting_analytics: Option<Vec<MeetingSummary>>,
}

#[derive(Debug, Serialize)]
pub struct FiltersApplied {
    pub user_id: Option<String>,
    pub meeting_id: Option<String>,
    pub analytics_type: String,
    pub meeting_type: String,
    pub timeframe: String,
    pub date_range: AppliedDateRange,
}

#[derive(Debug, Clone, Serialize)]
pub struct AppliedDateRange {
    pub start: String,
    pub end: String,
}

/// The query façade: one stateless read per call, no caching, no shared
/// state. Each requested view performs its own source queries and a view
/// that was not requested performs none.
pub struct AnalyticsEngine {
    source: Arc<dyn AnalyticsSource>,
    offset: FixedOffset,
    default_page_size: u32,
}

impl AnalyticsEngine {
    pub fn new(source: Arc<dyn AnalyticsSource>, settings: &AnalyticsSettings) -> Self {
        let offset = FixedOffset::east_opt(settings.reporting_utc_offset_minutes * 60)
            .expect("reporting offset within +/-24h");
        Self {
            source,
            offset,
            default_page_size: settings.default_page_size,
        }
    }

    pub fn reporting_offset(&self) -> FixedOffset {
        self.offset
    }

    pub fn source(&self) -> &dyn AnalyticsSource {
        self.source.as_ref()
    }

    pub async fn run(&self, params: &AnalyticsParams) -> AnalyticsResult<AnalyticsEnvelope> {
        self.run_at(params, Utc::now()).await
    }

    /// Comprehensive analytics against an explicit "now", so identical
    /// requests over an unchanged snapshot produce identical output.
    pub async fn run_at(
        &self,
        params: &AnalyticsParams,
        now: DateTime<Utc>,
    ) -> AnalyticsResult<AnalyticsEnvelope> {
        let selection = ViewSelection::parse(&params.analytics_type)?;
        let filter =
            AggregationFilter::from_params(params, now, self.offset, self.default_page_size)?;
        let joiner = RecordJoiner::new(self.source.as_ref());
        let in_window = TimeFilter::EffectiveWithin(filter.window);

        debug!(
            analytics_type = selection.label(),
            user_id = ?filter.user_id,
            meeting_id = ?filter.meeting_id,
            "Running comprehensive analytics"
        );

        let mut participant_details = None;
        let mut participant_summary = None;
        if selection.contains(ViewKind::Participant) {
            let mut detail_predicate =
                RecordPredicate::new().meeting_type(filter.meeting_type);
            if let Some(user_id) = filter.user_id {
                detail_predicate = detail_predicate.user(user_id);
            }
            if let Some(meeting_id) = filter.meeting_id {
                detail_predicate = detail_predicate.meeting(meeting_id);
            }
            let detail_rows = joiner
                .participant_records(&detail_predicate, in_window)
                .await?;
            participant_details = Some(build_participant_details(
                &detail_rows,
                filter.page,
                filter.page_size,
            ));

            let mut summary_predicate = RecordPredicate::new()
                .role(ParticipantRole::Participant)
                .meeting_type(filter.meeting_type);
            if let Some(user_id) = filter.user_id {
                summary_predicate = summary_predicate.user(user_id);
            }
            let summary_rows = joiner
                .participant_records(&summary_predicate, in_window)
                .await?;
            participant_summary = Some(build_participant_summaries(&summary_rows));
        }

        let mut host_analytics = None;
        if selection.contains(ViewKind::Host) {
            let mut predicate = RecordPredicate::new().meeting_type(filter.meeting_type);
            if let Some(user_id) = filter.user_id {
                predicate = predicate.host(user_id);
            }
            let hosted = joiner.hosted_meetings(&predicate, in_window).await?;
            host_analytics = Some(build_host_summaries(&hosted));
        }

        let mut meeting_analytics = None;
        if selection.contains(ViewKind::Meeting) {
            let mut predicate = RecordPredicate::new().meeting_type(filter.meeting_type);
            if let Some(meeting_id) = filter.meeting_id {
                predicate = predicate.meeting(meeting_id);
            }
            if let Some(user_id) = filter.user_id {
                predicate = predicate.host(user_id);
            }
            let hosted = joiner.hosted_meetings(&predicate, in_window).await?;
            meeting_analytics = Some(build_meeting_summaries(&hosted));
        }

        let available_meeting_times = self
            .available_meeting_times(&joiner, &selection, &filter)
            .await?;

        let window_meetings = joiner.meetings_in_window(in_window).await?;
        let overall_summary = build_overall_summary(&window_meetings, &filter.window);

        Ok(AnalyticsEnvelope {
            overall_summary,
            available_meeting_times,
            filters_applied: FiltersApplied {
                user_id: filter.user_id.map(|id| id.to_hex()),
                meeting_id: filter.meeting_id.map(|id| id.to_hex()),
                analytics_type: selection.label().to_string(),
                meeting_type: params.meeting_type.clone(),
                timeframe: filter.timeframe.clone(),
                date_range: AppliedDateRange {
                    start: filter.window.start_label(),
                    end: filter.window.end_label(),
                },
            },
            participant_details,
            participant_summary,
            host_analytics,
            meeting_analytics,
        })
    }

    /// The role-partitioned time-filter listing. A participant-facing
    /// selection lists the identity's attended meetings; otherwise a
    /// host-facing selection lists the meetings it hosted. Without an
    /// identity there is nothing to list.
    async fn available_meeting_times(
        &self,
        joiner: &RecordJoiner<'_>,
        selection: &ViewSelection,
        filter: &AggregationFilter,
    ) -> AnalyticsResult<Vec<MeetingTimeEntry>> {
        let Some(user_id) = filter.user_id else {
            return Ok(Vec::new());
        };
        let in_window = TimeFilter::EffectiveWithin(filter.window);

        if selection.contains(ViewKind::Participant) {
            let predicate = RecordPredicate::new()
                .user(user_id)
                .role(ParticipantRole::Participant);
            let rows = joiner.participant_records(&predicate, in_window).await?;
            return Ok(build_participant_times(&rows, self.offset));
        }

        if selection.contains(ViewKind::Host) {
            let predicate = RecordPredicate::new().host(user_id);
            let hosted = joiner.hosted_meetings(&predicate, in_window).await?;
            return Ok(build_host_times(&hosted, self.offset));
        }

        Ok(Vec::new())
    }
}
