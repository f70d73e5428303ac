use mongodb::Database;
use std::sync::Arc;

use meetra_config::Settings;
use meetra_services::analytics::{AnalyticsEngine, AnalyticsSource, MongoSource};
use meetra_services::dao::{
    meeting::MeetingDao, monitoring::MonitoringDao, participant::ParticipantDao,
};

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub settings: Settings,
    pub meetings: Arc<MeetingDao>,
    pub participants: Arc<ParticipantDao>,
    pub monitoring: Arc<MonitoringDao>,
    pub engine: Arc<AnalyticsEngine>,
}

impl AppState {
    pub fn new(db: Database, settings: Settings) -> Self {
        let source: Arc<dyn AnalyticsSource> = Arc::new(MongoSource::new(&db));
        Self::with_source(db, settings, source)
    }

    /// Build the state on top of an explicit analytics source. Production
    /// uses the Mongo-backed source; tests swap in a seeded in-memory one.
    pub fn with_source(
        db: Database,
        settings: Settings,
        source: Arc<dyn AnalyticsSource>,
    ) -> Self {
        let engine = Arc::new(AnalyticsEngine::new(source, &settings.analytics));
        Self {
            meetings: Arc::new(MeetingDao::new(&db)),
            participants: Arc::new(ParticipantDao::new(&db)),
            monitoring: Arc::new(MonitoringDao::new(&db)),
            engine,
            db,
            settings,
        }
    }
}
