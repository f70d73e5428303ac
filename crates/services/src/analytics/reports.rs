use std::collections::{BTreeMap, HashSet};

use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use meetra_db::models::{MeetingStatus, MeetingType};

use super::error::{AnalyticsError, AnalyticsResult};
use super::facade::{AnalyticsEngine, AppliedDateRange};
use super::filter::{
    parse_optional_id, DateWindow, MeetingTypeFilter, RecordPredicate, TimeFilter,
};
use super::joiner::RecordJoiner;
use super::metrics::{
    completion_rate, minutes_between, participation_percentage, round2, share_percentage,
    Mean,
};
use super::views::{iso, iso_at};

/// Parameters of the focused per-record reports (duration, attendance).
#[derive(Debug, Clone, Deserialize)]
pub struct RecordReportParams {
    pub user_id: Option<String>,
    pub meeting_id: Option<String>,
    #[serde(default = "default_timeframe")]
    pub timeframe: String,
    #[serde(default = "default_meeting_type")]
    pub meeting_type: String,
}

/// Parameters of the host-oriented reports.
#[derive(Debug, Clone, Deserialize)]
pub struct HostReportParams {
    pub user_id: Option<String>,
    pub host_id: Option<String>,
    #[serde(default = "default_timeframe")]
    pub timeframe: String,
    #[serde(default = "default_meeting_type")]
    pub meeting_type: String,
}

fn default_timeframe() -> String {
    "30days".to_string()
}

fn default_meeting_type() -> String {
    "all".to_string()
}

/// Per-record duration analysis: how long the identity stayed in each
/// meeting, with the participation share of the meeting's wall-clock
/// duration when that duration is known.
#[derive(Debug, Clone, Serialize)]
pub struct DurationRecord {
    pub user_id: String,
    pub full_name: String,
    pub meeting_id: String,
    pub meeting_name: String,
    pub duration_analysis: DurationAnalysis,
    pub participant_attendance_data: AttendanceData,
    pub participant_info: ParticipantInfo,
    pub attendance_monitoring: DurationMonitoring,
    pub meeting_details: MeetingDetails,
}

#[derive(Debug, Clone, Serialize)]
pub struct DurationAnalysis {
    pub join_times: Vec<String>,
    pub leave_times: Vec<String>,
    pub total_duration_minutes: f64,
    pub total_sessions: i64,
    pub is_currently_active: bool,
    pub end_meeting_time: Option<String>,
    pub meeting_total_duration_minutes: Option<f64>,
    /// `None` whenever the meeting's own duration is unknown — an
    /// undefined ratio is not a zero.
    pub participation_percentage: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AttendanceData {
    pub attendance_percentage_based_on_host: f64,
    pub participant_attendance: f64,
    pub overall_attendance: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ParticipantInfo {
    pub role: String,
    pub meeting_type: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DurationMonitoring {
    pub popup_count: i64,
    pub total_detections: i64,
    pub break_used: bool,
    pub total_break_time_used: i64,
    pub attendance_penalty: f64,
    pub engagement_score: f64,
    pub session_attendance_percentage: f64,
    pub focus_score: f64,
    pub break_count: i64,
    pub active_participation_time: i64,
    pub total_session_time: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MeetingDetails {
    pub started_at: Option<String>,
    pub ended_at: Option<String>,
    pub host_id: String,
    pub status: String,
    pub created_at: Option<String>,
}

/// Attendance-focused per-record listing with the advanced monitoring
/// columns, plus a window-wide summary block.
#[derive(Debug, Clone, Serialize)]
pub struct AttendanceReport {
    pub attendance_details: Vec<AttendanceRecord>,
    pub attendance_summary: AttendanceSummary,
    pub filters_applied: AttendanceFilters,
}

#[derive(Debug, Clone, Serialize)]
pub struct AttendanceRecord {
    pub user_id: String,
    pub full_name: String,
    pub meeting_id: String,
    pub meeting_name: String,
    pub meeting_type: String,
    pub role: String,
    pub participant_attendance_metrics: AttendanceMetrics,
    pub attendance_monitoring_details: MonitoringDetails,
    pub advanced_monitoring: AdvancedMonitoring,
    pub meeting_context: MeetingContext,
}

#[derive(Debug, Clone, Serialize)]
pub struct AttendanceMetrics {
    pub attendance_percentage_based_on_host: f64,
    pub participant_attendance: f64,
    pub overall_attendance: f64,
    pub total_duration_minutes: f64,
    pub total_sessions: i64,
    pub is_currently_active: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonitoringDetails {
    pub popup_count: i64,
    pub detection_counts: Option<Value>,
    pub violation_start_times: Option<Value>,
    pub total_detections: i64,
    pub attendance_penalty: f64,
    pub break_used: bool,
    pub total_break_time_used: i64,
    pub engagement_score: f64,
    pub session_attendance_percentage: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AdvancedMonitoring {
    pub session_active: bool,
    pub break_count: i64,
    pub focus_score: f64,
    pub violation_severity_score: f64,
    pub active_participation_time: i64,
    pub total_session_time: i64,
    pub last_violation_type: Option<String>,
    pub continuous_violation_time: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MeetingContext {
    pub created_at: Option<String>,
    pub started_at: Option<String>,
    pub ended_at: Option<String>,
    pub host_id: String,
    pub status: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AttendanceSummary {
    pub total_participants: u64,
    pub avg_participant_attendance: f64,
    pub avg_overall_attendance: f64,
    pub avg_attendance_based_on_host: f64,
    pub avg_penalty: f64,
    pub avg_engagement: f64,
    pub total_breaks_used: u64,
    pub avg_violations: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AttendanceFilters {
    pub user_id: Option<String>,
    pub meeting_id: Option<String>,
    pub meeting_type: String,
    pub timeframe: String,
    pub date_range: AppliedDateRange,
}

/// Per-(host, meeting-type) meeting-count report with wall-clock duration
/// aggregates and feature adoption.
#[derive(Debug, Clone, Serialize)]
pub struct HostMeetingCounts {
    pub host_id: String,
    pub meeting_type: String,
    pub meeting_counts: HostCountBlock,
    pub duration_analytics: HostDurationBlock,
    pub participant_analytics: HostParticipantBlock,
    pub attendance_monitoring: HostMonitoringBlock,
    pub activity_period: HostActivityBlock,
    pub meeting_features: HostFeatureBlock,
}

#[derive(Debug, Clone, Serialize)]
pub struct HostCountBlock {
    pub total_meetings_created: u64,
    pub ended_meetings: u64,
    pub active_meetings: u64,
    pub scheduled_meetings: u64,
    pub completion_rate: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct HostDurationBlock {
    pub avg_actual_meeting_duration_minutes: f64,
    pub total_actual_hosted_duration_minutes: f64,
    pub total_actual_hosted_duration_hours: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct HostParticipantBlock {
    pub total_unique_participants: u64,
    pub avg_participant_attendance: f64,
    pub avg_overall_attendance: f64,
    pub total_participant_duration_minutes: f64,
    pub total_participant_duration_hours: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct HostMonitoringBlock {
    pub avg_popup_count: f64,
    pub avg_total_detections: f64,
    pub avg_attendance_penalty: f64,
    pub avg_engagement_score: f64,
    pub total_breaks_across_meetings: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct HostActivityBlock {
    pub first_meeting_date: Option<String>,
    pub last_meeting_date: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HostFeatureBlock {
    pub meetings_with_recording_enabled: u64,
    pub meetings_with_waiting_room: u64,
    pub recording_enabled_percentage: f64,
    pub waiting_room_enabled_percentage: f64,
}

/// Compact host dashboard rollup.
#[derive(Debug, Clone, Serialize)]
pub struct HostOverview {
    pub total_meetings: u64,
    pub total_participants: u64,
    pub average_duration_minutes: f64,
    pub avg_participant_attendance: f64,
    pub avg_overall_attendance: f64,
    pub attendance_monitoring: OverviewMonitoring,
    pub meeting_status_breakdown: OverviewStatusBreakdown,
}

#[derive(Debug, Clone, Serialize)]
pub struct OverviewMonitoring {
    pub avg_popup_count: f64,
    pub avg_detections: f64,
    pub avg_penalty: f64,
    pub avg_break_time_minutes: f64,
    pub avg_engagement_score: f64,
    pub total_breaks_used: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct OverviewStatusBreakdown {
    pub active_meetings: u64,
    pub ended_meetings: u64,
    pub scheduled_meetings: u64,
}

impl AnalyticsEngine {
    /// Duration analysis for a user and/or meeting (at least one is
    /// required). No time window: the report covers the identity's whole
    /// history, newest meeting first.
    pub async fn duration_analytics(
        &self,
        params: &RecordReportParams,
    ) -> AnalyticsResult<Vec<DurationRecord>> {
        let user_id = parse_optional_id(params.user_id.as_deref(), "user_id")?;
        let meeting_id = parse_optional_id(params.meeting_id.as_deref(), "meeting_id")?;
        if user_id.is_none() && meeting_id.is_none() {
            return Err(AnalyticsError::InvalidParameter(
                "Either user_id or meeting_id is required".to_string(),
            ));
        }

        let mut predicate = RecordPredicate::new();
        if let Some(id) = user_id {
            predicate = predicate.user(id);
        }
        if let Some(id) = meeting_id {
            predicate = predicate.meeting(id);
        }

        let joiner = RecordJoiner::new(self.source());
        let rows = joiner
            .participant_records(&predicate, TimeFilter::Unbounded)
            .await?;

        Ok(rows
            .iter()
            .map(|record| {
                let p = &record.participation;
                let m = &record.meeting;
                let session = record.monitoring.as_ref();
                let participant_minutes = p.total_duration_minutes.unwrap_or(0.0);
                let meeting_total =
                    minutes_between(m.started_at, m.ended_at).map(round2);

                DurationRecord {
                    user_id: p.user_id.to_hex(),
                    full_name: p.full_name.clone(),
                    meeting_id: p.meeting_id.to_hex(),
                    meeting_name: m.name.clone(),
                    duration_analysis: DurationAnalysis {
                        join_times: p.join_times.iter().copied().map(iso_at).collect(),
                        leave_times: p.leave_times.iter().copied().map(iso_at).collect(),
                        total_duration_minutes: participant_minutes,
                        total_sessions: p.total_sessions.unwrap_or(0) as i64,
                        is_currently_active: p.is_currently_active.unwrap_or(false),
                        end_meeting_time: iso(p.end_meeting_time),
                        meeting_total_duration_minutes: meeting_total,
                        participation_percentage: participation_percentage(
                            participant_minutes,
                            meeting_total,
                        ),
                    },
                    participant_attendance_data: AttendanceData {
                        attendance_percentage_based_on_host: p
                            .host_based_attendance
                            .unwrap_or(0.0),
                        participant_attendance: p.participant_attendance.unwrap_or(0.0),
                        overall_attendance: p.overall_attendance.unwrap_or(0.0),
                    },
                    participant_info: ParticipantInfo {
                        role: p.role.as_str().to_string(),
                        meeting_type: p.meeting_type.as_str().to_string(),
                    },
                    attendance_monitoring: DurationMonitoring {
                        popup_count: session.and_then(|s| s.popup_count).unwrap_or(0),
                        total_detections: session
                            .and_then(|s| s.total_detections)
                            .unwrap_or(0),
                        break_used: session.and_then(|s| s.break_used).unwrap_or(false),
                        total_break_time_used: session
                            .and_then(|s| s.total_break_time_used)
                            .unwrap_or(0),
                        attendance_penalty: session
                            .and_then(|s| s.attendance_penalty)
                            .unwrap_or(0.0),
                        engagement_score: session
                            .and_then(|s| s.engagement_score)
                            .unwrap_or(0.0),
                        session_attendance_percentage: session
                            .and_then(|s| s.attendance_percentage)
                            .unwrap_or(0.0),
                        focus_score: session.and_then(|s| s.focus_score).unwrap_or(0.0),
                        break_count: session.and_then(|s| s.break_count).unwrap_or(0),
                        active_participation_time: session
                            .and_then(|s| s.active_participation_time)
                            .unwrap_or(0),
                        total_session_time: session
                            .and_then(|s| s.total_session_time)
                            .unwrap_or(0),
                    },
                    meeting_details: MeetingDetails {
                        started_at: iso(m.started_at),
                        ended_at: iso(m.ended_at),
                        host_id: m.host_id.to_hex(),
                        status: m.status.as_str().to_string(),
                        created_at: iso(m.created_at),
                    },
                }
            })
            .collect())
    }

    /// Attendance-focused listing over a creation-time window, with the
    /// window-wide summary block.
    pub async fn attendance_analytics(
        &self,
        params: &RecordReportParams,
        now: DateTime<Utc>,
    ) -> AnalyticsResult<AttendanceReport> {
        let user_id = parse_optional_id(params.user_id.as_deref(), "user_id")?;
        let meeting_id = parse_optional_id(params.meeting_id.as_deref(), "meeting_id")?;
        let type_filter = MeetingTypeFilter::parse(&params.meeting_type)?;
        let window = DateWindow::resolve(
            None,
            None,
            &params.timeframe,
            now,
            self.reporting_offset(),
        )?;
        let in_window = TimeFilter::CreatedWithin(window);

        let mut predicate = RecordPredicate::new().meeting_type(type_filter);
        if let Some(id) = user_id {
            predicate = predicate.user(id);
        }
        if let Some(id) = meeting_id {
            predicate = predicate.meeting(id);
        }

        let joiner = RecordJoiner::new(self.source());
        let rows = joiner.participant_records(&predicate, in_window).await?;

        let attendance_details = rows
            .iter()
            .map(|record| {
                let p = &record.participation;
                let m = &record.meeting;
                let session = record.monitoring.as_ref();
                AttendanceRecord {
                    user_id: p.user_id.to_hex(),
                    full_name: p.full_name.clone(),
                    meeting_id: p.meeting_id.to_hex(),
                    meeting_name: m.name.clone(),
                    meeting_type: p.meeting_type.as_str().to_string(),
                    role: p.role.as_str().to_string(),
                    participant_attendance_metrics: AttendanceMetrics {
                        attendance_percentage_based_on_host: p
                            .host_based_attendance
                            .unwrap_or(0.0),
                        participant_attendance: p.participant_attendance.unwrap_or(0.0),
                        overall_attendance: p.overall_attendance.unwrap_or(0.0),
                        total_duration_minutes: p.total_duration_minutes.unwrap_or(0.0),
                        total_sessions: p.total_sessions.unwrap_or(0) as i64,
                        is_currently_active: p.is_currently_active.unwrap_or(false),
                    },
                    attendance_monitoring_details: MonitoringDetails {
                        popup_count: session.and_then(|s| s.popup_count).unwrap_or(0),
                        detection_counts: session.and_then(|s| s.detection_counts.clone()),
                        violation_start_times: session
                            .and_then(|s| s.violation_start_times.clone()),
                        total_detections: session
                            .and_then(|s| s.total_detections)
                            .unwrap_or(0),
                        attendance_penalty: session
                            .and_then(|s| s.attendance_penalty)
                            .unwrap_or(0.0),
                        break_used: session.and_then(|s| s.break_used).unwrap_or(false),
                        total_break_time_used: session
                            .and_then(|s| s.total_break_time_used)
                            .unwrap_or(0),
                        engagement_score: session
                            .and_then(|s| s.engagement_score)
                            .unwrap_or(0.0),
                        session_attendance_percentage: session
                            .and_then(|s| s.attendance_percentage)
                            .unwrap_or(0.0),
                    },
                    advanced_monitoring: AdvancedMonitoring {
                        session_active: session
                            .and_then(|s| s.session_active)
                            .unwrap_or(false),
                        break_count: session.and_then(|s| s.break_count).unwrap_or(0),
                        focus_score: session.and_then(|s| s.focus_score).unwrap_or(0.0),
                        violation_severity_score: session
                            .and_then(|s| s.violation_severity_score)
                            .unwrap_or(0.0),
                        active_participation_time: session
                            .and_then(|s| s.active_participation_time)
                            .unwrap_or(0),
                        total_session_time: session
                            .and_then(|s| s.total_session_time)
                            .unwrap_or(0),
                        last_violation_type: session
                            .and_then(|s| s.last_violation_type.clone()),
                        continuous_violation_time: session
                            .and_then(|s| s.continuous_violation_time)
                            .unwrap_or(0),
                    },
                    meeting_context: MeetingContext {
                        created_at: iso(m.created_at),
                        started_at: iso(m.started_at),
                        ended_at: iso(m.ended_at),
                        host_id: m.host_id.to_hex(),
                        status: m.status.as_str().to_string(),
                    },
                }
            })
            .collect();

        // The summary covers every participant in the window, independent
        // of the identity filter on the listing above
        let window_meetings = joiner.meetings_in_window(in_window).await?;
        let mut participants: HashSet<ObjectId> = HashSet::new();
        let mut participant_attendance = Mean::new();
        let mut overall_attendance = Mean::new();
        let mut host_based = Mean::new();
        let mut penalty = Mean::new();
        let mut engagement = Mean::new();
        let mut violations = Mean::new();
        let mut breaks = 0u64;
        for hosted in &window_meetings {
            for p in &hosted.participants {
                participants.insert(p.user_id);
                participant_attendance.push(p.participant_attendance);
                overall_attendance.push(p.overall_attendance);
                host_based.push(p.host_based_attendance);
            }
            for session in &hosted.monitoring {
                penalty.push(session.attendance_penalty);
                engagement.push(session.engagement_score);
                violations.push_int(session.total_detections);
                if session.break_used.unwrap_or(false) {
                    breaks += 1;
                }
            }
        }

        Ok(AttendanceReport {
            attendance_details,
            attendance_summary: AttendanceSummary {
                total_participants: participants.len() as u64,
                avg_participant_attendance: participant_attendance.value(),
                avg_overall_attendance: overall_attendance.value(),
                avg_attendance_based_on_host: host_based.value(),
                avg_penalty: penalty.value(),
                avg_engagement: engagement.value(),
                total_breaks_used: breaks,
                avg_violations: violations.value(),
            },
            filters_applied: AttendanceFilters {
                user_id: user_id.map(|id| id.to_hex()),
                meeting_id: meeting_id.map(|id| id.to_hex()),
                meeting_type: params.meeting_type.clone(),
                timeframe: params.timeframe.clone(),
                date_range: AppliedDateRange {
                    start: window.start_label(),
                    end: window.end_label(),
                },
            },
        })
    }

    /// How many meetings each host created/ran/completed over a
    /// creation-time window, with wall-clock duration aggregates and
    /// feature adoption, ordered by meetings created descending.
    pub async fn host_meeting_counts(
        &self,
        params: &HostReportParams,
        now: DateTime<Utc>,
    ) -> AnalyticsResult<Vec<HostMeetingCounts>> {
        let host_id = parse_optional_id(
            params.host_id.as_deref().or(params.user_id.as_deref()),
            "host_id",
        )?;
        let type_filter = MeetingTypeFilter::parse(&params.meeting_type)?;
        let window = DateWindow::resolve(
            None,
            None,
            &params.timeframe,
            now,
            self.reporting_offset(),
        )?;

        let mut predicate = RecordPredicate::new().meeting_type(type_filter);
        if let Some(id) = host_id {
            predicate = predicate.host(id);
        }

        let joiner = RecordJoiner::new(self.source());
        let hosted = joiner
            .hosted_meetings(&predicate, TimeFilter::CreatedWithin(window))
            .await?;

        #[derive(Default)]
        struct Group {
            total: u64,
            ended: u64,
            active: u64,
            scheduled: u64,
            actual_durations: Mean,
            actual_total: f64,
            participants: HashSet<ObjectId>,
            participant_attendance: Mean,
            overall_attendance: Mean,
            participant_minutes: f64,
            popup: Mean,
            detections: Mean,
            penalty: Mean,
            engagement: Mean,
            breaks: u64,
            first_created: Option<bson::DateTime>,
            last_created: Option<bson::DateTime>,
            with_recording: u64,
            with_waiting_room: u64,
        }

        let mut groups: BTreeMap<(ObjectId, MeetingType), Group> = BTreeMap::new();
        for item in &hosted {
            let m = &item.meeting;
            let group = groups
                .entry((m.host_id, m.meeting_type))
                .or_default();
            group.total += 1;
            match m.status {
                MeetingStatus::Ended => group.ended += 1,
                MeetingStatus::Active => group.active += 1,
                MeetingStatus::Scheduled => group.scheduled += 1,
            }
            if let Some(actual) = minutes_between(m.started_at, m.ended_at) {
                group.actual_durations.push(Some(actual));
                group.actual_total += actual;
            }
            if m.recording_enabled {
                group.with_recording += 1;
            }
            if m.waiting_room_enabled {
                group.with_waiting_room += 1;
            }
            if let Some(created) = m.created_at {
                group.first_created = Some(match group.first_created {
                    Some(current) if current <= created => current,
                    _ => created,
                });
                group.last_created = Some(match group.last_created {
                    Some(current) if current >= created => current,
                    _ => created,
                });
            }
            for p in &item.participants {
                group.participants.insert(p.user_id);
                group.participant_attendance.push(p.participant_attendance);
                group.overall_attendance.push(p.overall_attendance);
                group.participant_minutes += p.total_duration_minutes.unwrap_or(0.0);
            }
            for session in &item.monitoring {
                group.popup.push_int(session.popup_count);
                group.detections.push_int(session.total_detections);
                group.penalty.push(session.attendance_penalty);
                group.engagement.push(session.engagement_score);
                if session.break_used.unwrap_or(false) {
                    group.breaks += 1;
                }
            }
        }

        let mut counts: Vec<HostMeetingCounts> = groups
            .into_iter()
            .map(|((host, meeting_type), group)| HostMeetingCounts {
                host_id: host.to_hex(),
                meeting_type: meeting_type.as_str().to_string(),
                meeting_counts: HostCountBlock {
                    total_meetings_created: group.total,
                    ended_meetings: group.ended,
                    active_meetings: group.active,
                    scheduled_meetings: group.scheduled,
                    completion_rate: completion_rate(group.ended, group.total),
                },
                duration_analytics: HostDurationBlock {
                    avg_actual_meeting_duration_minutes: group.actual_durations.value(),
                    total_actual_hosted_duration_minutes: round2(group.actual_total),
                    total_actual_hosted_duration_hours: round2(group.actual_total / 60.0),
                },
                participant_analytics: HostParticipantBlock {
                    total_unique_participants: group.participants.len() as u64,
                    avg_participant_attendance: group.participant_attendance.value(),
                    avg_overall_attendance: group.overall_attendance.value(),
                    total_participant_duration_minutes: round2(group.participant_minutes),
                    total_participant_duration_hours: round2(
                        group.participant_minutes / 60.0,
                    ),
                },
                attendance_monitoring: HostMonitoringBlock {
                    avg_popup_count: group.popup.value(),
                    avg_total_detections: group.detections.value(),
                    avg_attendance_penalty: group.penalty.value(),
                    avg_engagement_score: group.engagement.value(),
                    total_breaks_across_meetings: group.breaks,
                },
                activity_period: HostActivityBlock {
                    first_meeting_date: iso(group.first_created),
                    last_meeting_date: iso(group.last_created),
                },
                meeting_features: HostFeatureBlock {
                    meetings_with_recording_enabled: group.with_recording,
                    meetings_with_waiting_room: group.with_waiting_room,
                    recording_enabled_percentage: share_percentage(
                        group.with_recording,
                        group.total,
                    ),
                    waiting_room_enabled_percentage: share_percentage(
                        group.with_waiting_room,
                        group.total,
                    ),
                },
            })
            .collect();

        counts.sort_by(|a, b| {
            b.meeting_counts
                .total_meetings_created
                .cmp(&a.meeting_counts.total_meetings_created)
                .then_with(|| a.host_id.cmp(&b.host_id))
                .then_with(|| a.meeting_type.cmp(&b.meeting_type))
        });
        Ok(counts)
    }

    /// Compact dashboard rollup for one host. `user_id` is mandatory and
    /// the timeframe token is strict — an unknown token is a client error
    /// here, not a silent 30-day default.
    pub async fn host_overview(
        &self,
        params: &HostReportParams,
        now: DateTime<Utc>,
    ) -> AnalyticsResult<HostOverview> {
        let host_id = parse_optional_id(
            params.user_id.as_deref().or(params.host_id.as_deref()),
            "user_id",
        )?
        .ok_or_else(|| {
            AnalyticsError::InvalidParameter("user_id is required".to_string())
        })?;
        let type_filter = MeetingTypeFilter::parse(&params.meeting_type)?;
        let window =
            DateWindow::for_timeframe(&params.timeframe, now, self.reporting_offset())?;

        let predicate = RecordPredicate::new()
            .host(host_id)
            .meeting_type(type_filter);
        let joiner = RecordJoiner::new(self.source());
        let hosted = joiner
            .hosted_meetings(&predicate, TimeFilter::CreatedWithin(window))
            .await?;

        let mut participants: HashSet<ObjectId> = HashSet::new();
        let mut durations = Mean::new();
        let mut participant_attendance = Mean::new();
        let mut overall_attendance = Mean::new();
        let mut popup = Mean::new();
        let mut detections = Mean::new();
        let mut penalty = Mean::new();
        let mut break_time = Mean::new();
        let mut engagement = Mean::new();
        let mut breaks = 0u64;
        let (mut active, mut ended, mut scheduled) = (0u64, 0u64, 0u64);

        for item in &hosted {
            match item.meeting.status {
                MeetingStatus::Active => active += 1,
                MeetingStatus::Ended => ended += 1,
                MeetingStatus::Scheduled => scheduled += 1,
            }
            for p in &item.participants {
                participants.insert(p.user_id);
                durations.push(p.total_duration_minutes);
                participant_attendance.push(p.participant_attendance);
                overall_attendance.push(p.overall_attendance);
            }
            for session in &item.monitoring {
                popup.push_int(session.popup_count);
                detections.push_int(session.total_detections);
                penalty.push(session.attendance_penalty);
                break_time.push_int(session.total_break_time_used);
                engagement.push(session.engagement_score);
                if session.break_used.unwrap_or(false) {
                    breaks += 1;
                }
            }
        }

        Ok(HostOverview {
            total_meetings: hosted.len() as u64,
            total_participants: participants.len() as u64,
            average_duration_minutes: durations.value(),
            avg_participant_attendance: participant_attendance.value(),
            avg_overall_attendance: overall_attendance.value(),
            attendance_monitoring: OverviewMonitoring {
                avg_popup_count: popup.value(),
                avg_detections: detections.value(),
                avg_penalty: penalty.value(),
                avg_break_time_minutes: break_time.value(),
                avg_engagement_score: engagement.value(),
                total_breaks_used: breaks,
            },
            meeting_status_breakdown: OverviewStatusBreakdown {
                active_meetings: active,
                ended_meetings: ended,
                scheduled_meetings: scheduled,
            },
        })
    }
}
