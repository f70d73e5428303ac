use std::collections::{HashMap, HashSet};

use bson::oid::ObjectId;
use tracing::debug;

use meetra_db::models::{
    CalendarMeeting, Meeting, MeetingParticipant, MonitoringSession, ScheduledMeeting,
};

use super::error::{AnalyticsError, AnalyticsResult};
use super::filter::{RecordPredicate, TimeFilter};
use super::source::AnalyticsSource;
use super::temporal::effective_time;

/// One participation record joined with its parent meeting and optional
/// monitoring telemetry, annotated with the resolved effective time.
#[derive(Debug, Clone)]
pub struct JoinedRecord {
    pub participation: MeetingParticipant,
    pub meeting: Meeting,
    pub monitoring: Option<MonitoringSession>,
    pub effective_time: bson::DateTime,
}

/// One meeting joined with all of its participation records and monitoring
/// telemetry, for host- and meeting-grouped views.
#[derive(Debug, Clone)]
pub struct HostedMeeting {
    pub meeting: Meeting,
    pub participants: Vec<MeetingParticipant>,
    pub monitoring: Vec<MonitoringSession>,
    pub effective_time: bson::DateTime,
}

/// Type-specific scheduling rows keyed by meeting id. Both maps are always
/// populated; the temporal resolver consults only the one matching the
/// meeting's type tag.
struct ScheduleHints {
    scheduled: HashMap<ObjectId, ScheduledMeeting>,
    calendar: HashMap<ObjectId, CalendarMeeting>,
}

impl ScheduleHints {
    async fn fetch(
        source: &dyn AnalyticsSource,
        ids: &[ObjectId],
    ) -> AnalyticsResult<Self> {
        let (scheduled, calendar) = source
            .schedule_entries(ids)
            .await
            .map_err(|e| AnalyticsError::Source(e.to_string()))?;
        Ok(Self {
            scheduled: scheduled.into_iter().map(|row| (row.id, row)).collect(),
            calendar: calendar.into_iter().map(|row| (row.id, row)).collect(),
        })
    }

    fn resolve(&self, meeting: &Meeting) -> Option<bson::DateTime> {
        let id = meeting.id?;
        effective_time(
            meeting,
            self.scheduled.get(&id),
            self.calendar.get(&id),
        )
    }
}

/// Combines source rows into the joined shapes the views aggregate over.
///
/// Participation × meeting is an inner join (orphaned records are
/// excluded), monitoring and scheduling rows are left joins. Rows without
/// a resolvable effective time are excluded from time-filtered output.
pub struct RecordJoiner<'a> {
    source: &'a dyn AnalyticsSource,
}

impl<'a> RecordJoiner<'a> {
    pub fn new(source: &'a dyn AnalyticsSource) -> Self {
        Self { source }
    }

    /// Joined triples for participant-oriented views, ordered by meeting
    /// creation time descending.
    pub async fn participant_records(
        &self,
        predicate: &RecordPredicate,
        time_filter: TimeFilter,
    ) -> AnalyticsResult<Vec<JoinedRecord>> {
        let records = self
            .source
            .participation_records(predicate)
            .await
            .map_err(|e| AnalyticsError::Source(e.to_string()))?;

        let meeting_ids = distinct_ids(records.iter().map(|r| r.meeting_id));
        let meetings = self
            .source
            .meetings_by_ids(&meeting_ids)
            .await
            .map_err(|e| AnalyticsError::Source(e.to_string()))?;
        let meetings: HashMap<ObjectId, Meeting> = meetings
            .into_iter()
            .filter_map(|m| m.id.map(|id| (id, m)))
            .collect();

        let hints = ScheduleHints::fetch(self.source, &meeting_ids).await?;

        let sessions = self
            .source
            .monitoring_sessions(&meeting_ids)
            .await
            .map_err(|e| AnalyticsError::Source(e.to_string()))?;
        let mut sessions: HashMap<(ObjectId, ObjectId), MonitoringSession> = sessions
            .into_iter()
            .map(|s| ((s.meeting_id, s.user_id), s))
            .collect();

        let mut joined = Vec::with_capacity(records.len());
        for record in records {
            let Some(meeting) = meetings.get(&record.meeting_id) else {
                debug!(meeting_id = %record.meeting_id, "Participation record without parent meeting, skipping");
                continue;
            };
            let Some(effective) = hints.resolve(meeting) else {
                debug!(meeting_id = %record.meeting_id, "Meeting has no resolvable effective time, skipping");
                continue;
            };
            if !admits(&time_filter, meeting, effective) {
                continue;
            }
            let monitoring = sessions.remove(&(record.meeting_id, record.user_id));
            joined.push(JoinedRecord {
                monitoring,
                meeting: meeting.clone(),
                effective_time: effective,
                participation: record,
            });
        }

        sort_by_created_desc(&mut joined);
        Ok(joined)
    }

    /// Meetings with their participants and telemetry for host- and
    /// meeting-grouped views, ordered by creation time descending.
    pub async fn hosted_meetings(
        &self,
        predicate: &RecordPredicate,
        time_filter: TimeFilter,
    ) -> AnalyticsResult<Vec<HostedMeeting>> {
        let meetings = self
            .source
            .hosted_meetings(predicate)
            .await
            .map_err(|e| AnalyticsError::Source(e.to_string()))?;
        self.assemble_meetings(meetings, time_filter).await
    }

    /// The unrestricted window scan backing the global summary.
    pub async fn meetings_in_window(
        &self,
        time_filter: TimeFilter,
    ) -> AnalyticsResult<Vec<HostedMeeting>> {
        let window = match time_filter {
            TimeFilter::EffectiveWithin(w) | TimeFilter::CreatedWithin(w) => w,
            TimeFilter::Unbounded => {
                return Err(AnalyticsError::InvalidParameter(
                    "global summary requires a bounded window".to_string(),
                ));
            }
        };
        let meetings = self
            .source
            .window_meetings(&window)
            .await
            .map_err(|e| AnalyticsError::Source(e.to_string()))?;
        self.assemble_meetings(meetings, time_filter).await
    }

    async fn assemble_meetings(
        &self,
        meetings: Vec<Meeting>,
        time_filter: TimeFilter,
    ) -> AnalyticsResult<Vec<HostedMeeting>> {
        let meeting_ids = distinct_ids(meetings.iter().filter_map(|m| m.id));
        let hints = ScheduleHints::fetch(self.source, &meeting_ids).await?;

        let mut admitted = Vec::with_capacity(meetings.len());
        for meeting in meetings {
            let Some(effective) = hints.resolve(&meeting) else {
                debug!(name = %meeting.name, "Meeting has no resolvable effective time, skipping");
                continue;
            };
            if !admits(&time_filter, &meeting, effective) {
                continue;
            }
            admitted.push((meeting, effective));
        }

        let admitted_ids = distinct_ids(admitted.iter().filter_map(|(m, _)| m.id));
        let participants = self
            .source
            .participants_for_meetings(&admitted_ids)
            .await
            .map_err(|e| AnalyticsError::Source(e.to_string()))?;
        let sessions = self
            .source
            .monitoring_sessions(&admitted_ids)
            .await
            .map_err(|e| AnalyticsError::Source(e.to_string()))?;

        let mut participants_by_meeting: HashMap<ObjectId, Vec<MeetingParticipant>> =
            HashMap::new();
        for p in participants {
            participants_by_meeting
                .entry(p.meeting_id)
                .or_default()
                .push(p);
        }
        let mut sessions_by_meeting: HashMap<ObjectId, Vec<MonitoringSession>> =
            HashMap::new();
        for s in sessions {
            sessions_by_meeting.entry(s.meeting_id).or_default().push(s);
        }

        let mut hosted: Vec<HostedMeeting> = admitted
            .into_iter()
            .map(|(meeting, effective)| {
                let id = meeting.id.expect("admitted meetings have ids");
                HostedMeeting {
                    participants: participants_by_meeting.remove(&id).unwrap_or_default(),
                    monitoring: sessions_by_meeting.remove(&id).unwrap_or_default(),
                    effective_time: effective,
                    meeting,
                }
            })
            .collect();

        hosted.sort_by(|a, b| {
            let a_created = a.meeting.created_at.map(|d| d.timestamp_millis());
            let b_created = b.meeting.created_at.map(|d| d.timestamp_millis());
            b_created
                .cmp(&a_created)
                .then_with(|| a.meeting.id.cmp(&b.meeting.id))
        });
        Ok(hosted)
    }
}

fn admits(time_filter: &TimeFilter, meeting: &Meeting, effective: bson::DateTime) -> bool {
    match time_filter {
        TimeFilter::EffectiveWithin(window) => window.contains(effective.to_chrono()),
        TimeFilter::CreatedWithin(window) => meeting
            .created_at
            .map(|created| window.contains(created.to_chrono()))
            .unwrap_or(false),
        TimeFilter::Unbounded => true,
    }
}

fn distinct_ids(ids: impl Iterator<Item = ObjectId>) -> Vec<ObjectId> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for id in ids {
        if seen.insert(id) {
            out.push(id);
        }
    }
    out
}

fn sort_by_created_desc(records: &mut [JoinedRecord]) {
    records.sort_by(|a, b| {
        let a_created = a.meeting.created_at.map(|d| d.timestamp_millis());
        let b_created = b.meeting.created_at.map(|d| d.timestamp_millis());
        b_created
            .cmp(&a_created)
            .then_with(|| a.participation.id.cmp(&b.participation.id))
    });
}
