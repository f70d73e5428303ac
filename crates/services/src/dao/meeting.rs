use bson::{doc, oid::ObjectId, DateTime};
use mongodb::Database;
use rand::Rng;

use meetra_db::models::{
    CalendarMeeting, Meeting, MeetingStatus, MeetingType, ScheduledMeeting,
};

use super::base::{BaseDao, DaoResult};

pub struct MeetingDao {
    pub base: BaseDao<Meeting>,
    pub scheduled: BaseDao<ScheduledMeeting>,
    pub calendar: BaseDao<CalendarMeeting>,
}

impl MeetingDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, Meeting::COLLECTION),
            scheduled: BaseDao::new(db, ScheduledMeeting::COLLECTION),
            calendar: BaseDao::new(db, CalendarMeeting::COLLECTION),
        }
    }

    pub async fn create(
        &self,
        name: String,
        meeting_type: MeetingType,
        host_id: ObjectId,
        recording_enabled: bool,
        waiting_room_enabled: bool,
        scheduled_start: Option<DateTime>,
        scheduled_end: Option<DateTime>,
    ) -> DaoResult<Meeting> {
        let join_code = generate_join_code();
        let now = DateTime::now();

        let meeting = Meeting {
            id: None,
            name,
            meeting_type,
            host_id,
            status: MeetingStatus::Scheduled,
            created_at: Some(now),
            started_at: None,
            ended_at: None,
            join_link: format!("/join/{}", join_code),
            recording_enabled,
            waiting_room_enabled,
            updated_at: Some(now),
        };

        let id = self.base.insert_one(&meeting).await?;

        // Type-specific scheduling row, keyed by the meeting's own id
        match meeting_type {
            MeetingType::Scheduled => {
                self.scheduled
                    .insert_one(&ScheduledMeeting {
                        id,
                        start_time: scheduled_start,
                        end_time: scheduled_end,
                        agenda: None,
                    })
                    .await?;
            }
            MeetingType::Calendar => {
                self.calendar
                    .insert_one(&CalendarMeeting {
                        id,
                        start_time: scheduled_start,
                        end_time: scheduled_end,
                        calendar_ref: None,
                    })
                    .await?;
            }
            MeetingType::Instant => {}
        }

        self.base.find_by_id(id).await
    }

    pub async fn start(&self, meeting_id: ObjectId) -> DaoResult<bool> {
        self.base
            .update_by_id(
                meeting_id,
                doc! {
                    "$set": {
                        "status": "active",
                        "started_at": DateTime::now(),
                    }
                },
            )
            .await
    }

    pub async fn end(&self, meeting_id: ObjectId) -> DaoResult<bool> {
        self.base
            .update_by_id(
                meeting_id,
                doc! {
                    "$set": {
                        "status": "ended",
                        "ended_at": DateTime::now(),
                    }
                },
            )
            .await
    }
}

fn generate_join_code() -> String {
    let mut rng = rand::rng();
    let parts: Vec<String> = (0..3)
        .map(|_| {
            let n: u32 = rng.random_range(100..999);
            n.to_string()
        })
        .collect();
    parts.join("-")
}
