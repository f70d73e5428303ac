use std::net::SocketAddr;
use std::sync::Arc;

use mongodb::{Client, options::ClientOptions};
use tokio::net::TcpListener;

use meetra_api::{build_router, state::AppState};
use meetra_config::Settings;
use meetra_services::analytics::AnalyticsSource;

use super::memory_source::MemorySource;

/// A running test server whose analytics routes are backed by a seeded
/// in-memory source. The Mongo handle is lazily connecting and never used
/// by the analytics routes, so these tests need no running database.
pub struct TestApp {
    pub addr: SocketAddr,
    pub base_url: String,
    pub client: reqwest::Client,
}

impl TestApp {
    pub async fn spawn_with_source(source: Arc<MemorySource>) -> Self {
        let mut settings = Settings::load().expect("default settings load");
        settings.database.name = format!("meetra_test_{}", uuid::Uuid::new_v4().simple());

        let client_options = ClientOptions::parse(&settings.database.url)
            .await
            .expect("Failed to parse MongoDB URL");
        let mongo_client =
            Client::with_options(client_options).expect("Failed to create MongoDB client");
        let db = mongo_client.database(&settings.database.name);

        let source: Arc<dyn AnalyticsSource> = source;
        let app_state = AppState::with_source(db, settings, source);
        let app = build_router(app_state);

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let base_url = format!("http://{}", addr);
        let client = reqwest::Client::new();

        Self {
            addr,
            base_url,
            client,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}
