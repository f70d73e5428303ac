use bson::{doc, oid::ObjectId, Bson, DateTime};
use mongodb::Database;

use meetra_db::models::MonitoringSession;

use super::base::{BaseDao, DaoResult};

pub struct MonitoringDao {
    pub base: BaseDao<MonitoringSession>,
}

impl MonitoringDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, MonitoringSession::COLLECTION),
        }
    }

    /// Upsert the telemetry for a (meeting, user) pair. The monitoring
    /// client posts full snapshots, so the latest write wins.
    pub async fn upsert(&self, session: MonitoringSession) -> DaoResult<MonitoringSession> {
        let meeting_id = session.meeting_id;
        let user_id = session.user_id;

        let existing = self
            .base
            .find_one(doc! { "meeting_id": meeting_id, "user_id": user_id })
            .await?;

        if let Some(current) = existing {
            let id = current.id.expect("stored session has an id");
            let mut replacement = session;
            replacement.id = Some(id);
            replacement.created_at = current.created_at;
            replacement.updated_at = DateTime::now();
            self.base
                .collection()
                .replace_one(doc! { "_id": id }, &replacement)
                .await?;
            return self.base.find_by_id(id).await;
        }

        let mut fresh = session;
        let now = DateTime::now();
        fresh.created_at = now;
        fresh.updated_at = now;
        let id = self.base.insert_one(&fresh).await?;
        self.base.find_by_id(id).await
    }

    pub async fn find_for(
        &self,
        meeting_id: ObjectId,
        user_id: ObjectId,
    ) -> DaoResult<Option<MonitoringSession>> {
        self.base
            .find_one(doc! { "meeting_id": meeting_id, "user_id": user_id })
            .await
    }

    pub async fn list_for_meetings(
        &self,
        meeting_ids: &[ObjectId],
    ) -> DaoResult<Vec<MonitoringSession>> {
        let ids: Vec<Bson> = meeting_ids.iter().map(|id| Bson::ObjectId(*id)).collect();
        self.base
            .find_many(doc! { "meeting_id": { "$in": ids } }, None)
            .await
    }
}
