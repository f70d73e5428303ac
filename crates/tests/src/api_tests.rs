use std::sync::Arc;

use bson::oid::ObjectId;
use serde_json::Value;

use meetra_db::models::{MeetingType, ParticipantRole};

use crate::fixtures::memory_source::MemorySource;
use crate::fixtures::seed::{ended, meeting, participant, with_attendance};
use crate::fixtures::test_app::TestApp;

fn seeded_source() -> (Arc<MemorySource>, ObjectId) {
    let host = ObjectId::new();
    let alice = ObjectId::new();
    let m = ended(
        meeting(ObjectId::new(), "Sprint Review", MeetingType::Instant, host, Some("2024-01-10T09:00:00Z")),
        "2024-01-10T09:05:00Z",
        "2024-01-10T10:05:00Z",
    );
    let source = MemorySource::new()
        .with_participant(with_attendance(
            participant(&m, alice, "Alice", ParticipantRole::Participant, Some(30.0)),
            80.0,
            75.0,
            78.0,
        ))
        .with_meeting(m);
    (Arc::new(source), alice)
}

#[tokio::test]
async fn health_endpoint_responds() {
    let (source, _) = seeded_source();
    let app = TestApp::spawn_with_source(source).await;

    let resp = app.client.get(app.url("/api/health")).send().await.unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn comprehensive_endpoint_wraps_the_envelope_in_data() {
    let (source, alice) = seeded_source();
    let app = TestApp::spawn_with_source(source).await;

    let resp = app
        .client
        .get(app.url("/api/analytics/comprehensive"))
        .query(&[
            ("user_id", alice.to_hex().as_str()),
            ("start_date", "2024-01-01"),
            ("end_date", "2024-01-31"),
        ])
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    let data = &json["data"];
    assert!(data.get("overall_summary").is_some());
    assert!(data.get("available_meeting_times").is_some());
    assert!(data.get("filters_applied").is_some());
    assert!(data.get("participant_details").is_some());
    assert!(data.get("participant_summary").is_some());
    assert!(data.get("host_analytics").is_some());
    assert!(data.get("meeting_analytics").is_some());
    assert_eq!(data["overall_summary"]["total_meetings"], 1);
}

#[tokio::test]
async fn requested_subset_omits_the_other_views() {
    let (source, alice) = seeded_source();
    let app = TestApp::spawn_with_source(source).await;

    let resp = app
        .client
        .get(app.url("/api/analytics/comprehensive"))
        .query(&[
            ("user_id", alice.to_hex().as_str()),
            ("analytics_type", "participant"),
            ("start_date", "2024-01-01"),
            ("end_date", "2024-01-31"),
        ])
        .send()
        .await
        .unwrap();

    let json: Value = resp.json().await.unwrap();
    let data = &json["data"];
    assert!(data.get("participant_details").is_some());
    assert!(data.get("host_analytics").is_none());
    assert!(data.get("meeting_analytics").is_none());
}

#[tokio::test]
async fn unparsable_date_is_a_bad_request() {
    let (source, _) = seeded_source();
    let app = TestApp::spawn_with_source(source).await;

    let resp = app
        .client
        .get(app.url("/api/analytics/comprehensive"))
        .query(&[("start_date", "31-01-2024")])
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 400);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["error"], "bad_request");
    assert!(json["message"].as_str().unwrap().contains("Invalid date"));
}

#[tokio::test]
async fn malformed_identity_is_a_bad_request() {
    let (source, _) = seeded_source();
    let app = TestApp::spawn_with_source(source).await;

    let resp = app
        .client
        .get(app.url("/api/analytics/comprehensive"))
        .query(&[("user_id", "not-an-id")])
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 400);
}

#[tokio::test]
async fn duration_endpoint_requires_an_identity() {
    let (source, _) = seeded_source();
    let app = TestApp::spawn_with_source(source).await;

    let resp = app
        .client
        .get(app.url("/api/analytics/duration"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 400);
    let json: Value = resp.json().await.unwrap();
    assert!(json["message"]
        .as_str()
        .unwrap()
        .contains("user_id or meeting_id"));
}

#[tokio::test]
async fn host_overview_rejects_unknown_timeframes() {
    let (source, _) = seeded_source();
    let app = TestApp::spawn_with_source(source).await;

    let resp = app
        .client
        .get(app.url("/api/analytics/host-overview"))
        .query(&[
            ("user_id", ObjectId::new().to_hex().as_str()),
            ("timeframe", "fortnight"),
        ])
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 400);
}
