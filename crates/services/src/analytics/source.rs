use async_trait::async_trait;
use bson::{doc, oid::ObjectId, Bson};
use mongodb::Database;
use thiserror::Error;

use meetra_db::models::{
    CalendarMeeting, Meeting, MeetingParticipant, MonitoringSession, ScheduledMeeting,
};

use crate::dao::base::DaoError;
use crate::dao::meeting::MeetingDao;
use crate::dao::monitoring::MonitoringDao;
use crate::dao::participant::ParticipantDao;

use super::filter::{DateWindow, RecordPredicate};

#[derive(Debug, Error)]
#[error("{0}")]
pub struct SourceError(pub String);

impl From<DaoError> for SourceError {
    fn from(err: DaoError) -> Self {
        SourceError(err.to_string())
    }
}

pub type SourceResult<T> = Result<T, SourceError>;

/// The storage collaborator seam.
///
/// Methods are split by orientation — participant-facing fetches, host
/// (meeting-grouped) fetches, the global window scan and the ancillary
/// lookups — so a façade that skips a view performs none of that view's
/// queries. The engine itself never touches a connection or cursor; each
/// method is one logical query against a snapshot.
#[async_trait]
pub trait AnalyticsSource: Send + Sync {
    /// Participation rows matching the predicate.
    async fn participation_records(
        &self,
        predicate: &RecordPredicate,
    ) -> SourceResult<Vec<MeetingParticipant>>;

    /// Parent meetings for a set of ids.
    async fn meetings_by_ids(&self, ids: &[ObjectId]) -> SourceResult<Vec<Meeting>>;

    /// Meetings matching a host-oriented predicate.
    async fn hosted_meetings(&self, predicate: &RecordPredicate)
        -> SourceResult<Vec<Meeting>>;

    /// Candidate meetings for a reporting window. Implementations may
    /// return a superset (e.g. prefiltered on stored timestamps only); the
    /// joiner re-checks the resolved effective time before counting a row.
    async fn window_meetings(&self, window: &DateWindow) -> SourceResult<Vec<Meeting>>;

    /// Participation rows belonging to a set of meetings.
    async fn participants_for_meetings(
        &self,
        ids: &[ObjectId],
    ) -> SourceResult<Vec<MeetingParticipant>>;

    /// Type-specific scheduling rows for a set of meetings. Rows are
    /// fetched for every meeting regardless of its type tag; the temporal
    /// resolver decides which ones count.
    async fn schedule_entries(
        &self,
        ids: &[ObjectId],
    ) -> SourceResult<(Vec<ScheduledMeeting>, Vec<CalendarMeeting>)>;

    /// Monitoring telemetry for a set of meetings.
    async fn monitoring_sessions(
        &self,
        ids: &[ObjectId],
    ) -> SourceResult<Vec<MonitoringSession>>;
}

/// MongoDB-backed source, delegating to the DAO layer.
pub struct MongoSource {
    meetings: MeetingDao,
    participants: ParticipantDao,
    monitoring: MonitoringDao,
}

impl MongoSource {
    pub fn new(db: &Database) -> Self {
        Self {
            meetings: MeetingDao::new(db),
            participants: ParticipantDao::new(db),
            monitoring: MonitoringDao::new(db),
        }
    }
}

fn id_list(ids: &[ObjectId]) -> Vec<Bson> {
    ids.iter().map(|id| Bson::ObjectId(*id)).collect()
}

#[async_trait]
impl AnalyticsSource for MongoSource {
    async fn participation_records(
        &self,
        predicate: &RecordPredicate,
    ) -> SourceResult<Vec<MeetingParticipant>> {
        Ok(self
            .participants
            .base
            .find_many(
                predicate.to_participant_document(),
                Some(doc! { "created_at": -1 }),
            )
            .await?)
    }

    async fn meetings_by_ids(&self, ids: &[ObjectId]) -> SourceResult<Vec<Meeting>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self
            .meetings
            .base
            .find_many(doc! { "_id": { "$in": id_list(ids) } }, None)
            .await?)
    }

    async fn hosted_meetings(
        &self,
        predicate: &RecordPredicate,
    ) -> SourceResult<Vec<Meeting>> {
        Ok(self
            .meetings
            .base
            .find_many(
                predicate.to_meeting_document(),
                Some(doc! { "created_at": -1 }),
            )
            .await?)
    }

    async fn window_meetings(&self, window: &DateWindow) -> SourceResult<Vec<Meeting>> {
        // Superset prefilter on the stored timestamps; meetings whose
        // effective time comes from a scheduling row are admitted by type
        // and settled by the temporal resolver.
        let start = bson::DateTime::from_chrono(window.start);
        let end = bson::DateTime::from_chrono(window.end);
        let filter = doc! {
            "$or": [
                { "started_at": { "$gte": start, "$lte": end } },
                { "created_at": { "$gte": start, "$lte": end } },
                { "meeting_type": { "$in": ["scheduled", "calendar"] } },
            ]
        };
        Ok(self
            .meetings
            .base
            .find_many(filter, Some(doc! { "created_at": -1 }))
            .await?)
    }

    async fn participants_for_meetings(
        &self,
        ids: &[ObjectId],
    ) -> SourceResult<Vec<MeetingParticipant>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self
            .participants
            .base
            .find_many(doc! { "meeting_id": { "$in": id_list(ids) } }, None)
            .await?)
    }

    async fn schedule_entries(
        &self,
        ids: &[ObjectId],
    ) -> SourceResult<(Vec<ScheduledMeeting>, Vec<CalendarMeeting>)> {
        if ids.is_empty() {
            return Ok((Vec::new(), Vec::new()));
        }
        let scheduled = self
            .meetings
            .scheduled
            .find_many(doc! { "_id": { "$in": id_list(ids) } }, None)
            .await?;
        let calendar = self
            .meetings
            .calendar
            .find_many(doc! { "_id": { "$in": id_list(ids) } }, None)
            .await?;
        Ok((scheduled, calendar))
    }

    async fn monitoring_sessions(
        &self,
        ids: &[ObjectId],
    ) -> SourceResult<Vec<MonitoringSession>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self.monitoring.list_for_meetings(ids).await?)
    }
}
