use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use bson::oid::ObjectId;

use meetra_db::models::{
    CalendarMeeting, Meeting, MeetingParticipant, MonitoringSession, ScheduledMeeting,
};
use meetra_services::analytics::filter::{DateWindow, RecordPredicate};
use meetra_services::analytics::source::{AnalyticsSource, SourceResult};
use meetra_services::analytics::AnalyticsEngine;
use meetra_config::settings::AnalyticsSettings;

/// Per-method call counters, so tests can assert which logical queries a
/// request actually executed.
#[derive(Debug, Default)]
pub struct SourceCounters {
    pub participation_records: AtomicUsize,
    pub meetings_by_ids: AtomicUsize,
    pub hosted_meetings: AtomicUsize,
    pub window_meetings: AtomicUsize,
    pub participants_for_meetings: AtomicUsize,
    pub schedule_entries: AtomicUsize,
    pub monitoring_sessions: AtomicUsize,
}

impl SourceCounters {
    pub fn hosted_meeting_calls(&self) -> usize {
        self.hosted_meetings.load(Ordering::SeqCst)
    }

    pub fn participation_record_calls(&self) -> usize {
        self.participation_records.load(Ordering::SeqCst)
    }
}

/// Seeded in-memory storage collaborator. Rows are fixed at construction;
/// every trait method filters them the way the Mongo source's prefilter
/// would and bumps its counter.
#[derive(Default)]
pub struct MemorySource {
    pub meetings: Vec<Meeting>,
    pub scheduled: Vec<ScheduledMeeting>,
    pub calendar: Vec<CalendarMeeting>,
    pub participants: Vec<MeetingParticipant>,
    pub monitoring: Vec<MonitoringSession>,
    pub counters: SourceCounters,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_meeting(mut self, meeting: Meeting) -> Self {
        self.meetings.push(meeting);
        self
    }

    pub fn with_scheduled(mut self, row: ScheduledMeeting) -> Self {
        self.scheduled.push(row);
        self
    }

    pub fn with_calendar(mut self, row: CalendarMeeting) -> Self {
        self.calendar.push(row);
        self
    }

    pub fn with_participant(mut self, participant: MeetingParticipant) -> Self {
        self.participants.push(participant);
        self
    }

    pub fn with_monitoring(mut self, session: MonitoringSession) -> Self {
        self.monitoring.push(session);
        self
    }
}

#[async_trait]
impl AnalyticsSource for MemorySource {
    async fn participation_records(
        &self,
        predicate: &RecordPredicate,
    ) -> SourceResult<Vec<MeetingParticipant>> {
        self.counters
            .participation_records
            .fetch_add(1, Ordering::SeqCst);
        Ok(self
            .participants
            .iter()
            .filter(|p| predicate.matches_participant(p))
            .cloned()
            .collect())
    }

    async fn meetings_by_ids(&self, ids: &[ObjectId]) -> SourceResult<Vec<Meeting>> {
        self.counters.meetings_by_ids.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .meetings
            .iter()
            .filter(|m| m.id.map(|id| ids.contains(&id)).unwrap_or(false))
            .cloned()
            .collect())
    }

    async fn hosted_meetings(
        &self,
        predicate: &RecordPredicate,
    ) -> SourceResult<Vec<Meeting>> {
        self.counters.hosted_meetings.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .meetings
            .iter()
            .filter(|m| predicate.matches_meeting(m))
            .cloned()
            .collect())
    }

    async fn window_meetings(&self, _window: &DateWindow) -> SourceResult<Vec<Meeting>> {
        self.counters.window_meetings.fetch_add(1, Ordering::SeqCst);
        // Superset semantics: the joiner re-checks the resolved time
        Ok(self.meetings.clone())
    }

    async fn participants_for_meetings(
        &self,
        ids: &[ObjectId],
    ) -> SourceResult<Vec<MeetingParticipant>> {
        self.counters
            .participants_for_meetings
            .fetch_add(1, Ordering::SeqCst);
        Ok(self
            .participants
            .iter()
            .filter(|p| ids.contains(&p.meeting_id))
            .cloned()
            .collect())
    }

    async fn schedule_entries(
        &self,
        ids: &[ObjectId],
    ) -> SourceResult<(Vec<ScheduledMeeting>, Vec<CalendarMeeting>)> {
        self.counters.schedule_entries.fetch_add(1, Ordering::SeqCst);
        let scheduled = self
            .scheduled
            .iter()
            .filter(|row| ids.contains(&row.id))
            .cloned()
            .collect();
        let calendar = self
            .calendar
            .iter()
            .filter(|row| ids.contains(&row.id))
            .cloned()
            .collect();
        Ok((scheduled, calendar))
    }

    async fn monitoring_sessions(
        &self,
        ids: &[ObjectId],
    ) -> SourceResult<Vec<MonitoringSession>> {
        self.counters
            .monitoring_sessions
            .fetch_add(1, Ordering::SeqCst);
        Ok(self
            .monitoring
            .iter()
            .filter(|s| ids.contains(&s.meeting_id))
            .cloned()
            .collect())
    }
}

/// Engine over a seeded source with the default reporting settings
/// (UTC+05:30, page size 100).
pub fn engine_over(source: Arc<MemorySource>) -> AnalyticsEngine {
    AnalyticsEngine::new(
        source,
        &AnalyticsSettings {
            reporting_utc_offset_minutes: 330,
            default_page_size: 100,
        },
    )
}
