use bson::{doc, oid::ObjectId, DateTime};
use mongodb::Database;

use meetra_db::models::{MeetingParticipant, MeetingType, ParticipantRole};

use super::base::{BaseDao, DaoError, DaoResult};

pub struct ParticipantDao {
    pub base: BaseDao<MeetingParticipant>,
}

impl ParticipantDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, MeetingParticipant::COLLECTION),
        }
    }

    /// Record a join event. Creates the participation record on first join,
    /// appends to `join_times` and bumps the session count on re-joins.
    pub async fn join(
        &self,
        meeting_id: ObjectId,
        user_id: ObjectId,
        full_name: String,
        role: ParticipantRole,
        meeting_type: MeetingType,
    ) -> DaoResult<MeetingParticipant> {
        let now = DateTime::now();

        let existing = self
            .base
            .find_one(doc! { "meeting_id": meeting_id, "user_id": user_id })
            .await?;

        if let Some(record) = existing {
            let id = record.id.ok_or(DaoError::NotFound)?;
            self.base
                .update_by_id(
                    id,
                    doc! {
                        "$push": { "join_times": now },
                        "$inc": { "total_sessions": 1 },
                        "$set": {
                            "is_currently_active": true,
                            "last_seen_at": now,
                        },
                    },
                )
                .await?;
            return self.base.find_by_id(id).await;
        }

        let participant = MeetingParticipant {
            id: None,
            meeting_id,
            user_id,
            full_name,
            role,
            meeting_type,
            join_times: vec![now],
            leave_times: Vec::new(),
            total_duration_minutes: Some(0.0),
            total_sessions: Some(1),
            end_meeting_time: None,
            is_currently_active: Some(true),
            host_based_attendance: None,
            participant_attendance: None,
            overall_attendance: None,
            last_seen_at: Some(now),
            created_at: now,
            updated_at: now,
        };

        let id = self.base.insert_one(&participant).await?;
        self.base.find_by_id(id).await
    }

    /// Record a leave event: append to `leave_times`, accumulate the
    /// session's duration and mark the record inactive.
    pub async fn leave(&self, meeting_id: ObjectId, user_id: ObjectId) -> DaoResult<bool> {
        let now = DateTime::now();

        let record = self
            .base
            .find_one(doc! { "meeting_id": meeting_id, "user_id": user_id })
            .await?
            .ok_or(DaoError::NotFound)?;
        let id = record.id.ok_or(DaoError::NotFound)?;

        // Duration of the open session, if any join exists for it
        let session_minutes = record
            .join_times
            .last()
            .map(|joined| {
                let ms = now.timestamp_millis() - joined.timestamp_millis();
                (ms.max(0) as f64) / 60_000.0
            })
            .unwrap_or(0.0);

        self.base
            .update_by_id(
                id,
                doc! {
                    "$push": { "leave_times": now },
                    "$inc": { "total_duration_minutes": session_minutes },
                    "$set": {
                        "is_currently_active": false,
                        "last_seen_at": now,
                    },
                },
            )
            .await
    }

    /// Store the attendance percentages computed at meeting end.
    pub async fn set_attendance(
        &self,
        meeting_id: ObjectId,
        user_id: ObjectId,
        host_based: Option<f64>,
        participant: Option<f64>,
        overall: Option<f64>,
    ) -> DaoResult<bool> {
        self.base
            .update_one(
                doc! { "meeting_id": meeting_id, "user_id": user_id },
                doc! {
                    "$set": {
                        "host_based_attendance": host_based,
                        "participant_attendance": participant,
                        "overall_attendance": overall,
                        "end_meeting_time": DateTime::now(),
                    }
                },
            )
            .await
    }

    pub async fn list_by_meeting(
        &self,
        meeting_id: ObjectId,
    ) -> DaoResult<Vec<MeetingParticipant>> {
        self.base
            .find_many(
                doc! { "meeting_id": meeting_id },
                Some(doc! { "created_at": 1 }),
            )
            .await
    }
}
