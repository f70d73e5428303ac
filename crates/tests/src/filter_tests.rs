use bson::oid::ObjectId;
use chrono::{FixedOffset, TimeZone, Utc};

use meetra_db::models::{MeetingType, ParticipantRole};
use meetra_services::analytics::error::AnalyticsError;
use meetra_services::analytics::filter::{
    AggregationFilter, AnalyticsParams, DateWindow, MeetingTypeFilter, RecordPredicate,
    ViewKind, ViewSelection,
};

use crate::fixtures::seed::{meeting, participant};

fn ist() -> FixedOffset {
    FixedOffset::east_opt(330 * 60).unwrap()
}

fn params() -> AnalyticsParams {
    AnalyticsParams {
        user_id: None,
        meeting_id: None,
        timeframe: "30days".to_string(),
        meeting_type: "all".to_string(),
        analytics_type: "all".to_string(),
        page: 1,
        limit: None,
        start_date: None,
        end_date: None,
    }
}

#[test]
fn explicit_dates_widen_to_day_boundaries_in_the_reporting_offset() {
    let now = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
    let window =
        DateWindow::resolve(Some("2024-01-01"), Some("2024-01-31"), "30days", now, ist())
            .unwrap();

    // 2024-01-01T00:00:00+05:30 == 2023-12-31T18:30:00Z
    assert_eq!(
        window.start,
        Utc.with_ymd_and_hms(2023, 12, 31, 18, 30, 0).unwrap()
    );
    // End of day rounds up to 23:59:59.999999 local
    assert!(window.contains(Utc.with_ymd_and_hms(2024, 1, 31, 18, 29, 59).unwrap()));
    assert!(!window.contains(Utc.with_ymd_and_hms(2024, 1, 31, 18, 30, 0).unwrap()));
    // Inclusive lower bound
    assert!(window.contains(window.start));
}

#[test]
fn missing_bounds_use_the_named_timeframe_anchored_to_now() {
    let now = Utc.with_ymd_and_hms(2024, 2, 1, 12, 0, 0).unwrap();
    let window = DateWindow::resolve(None, None, "7days", now, ist()).unwrap();
    assert_eq!(window.end, now);
    assert_eq!(window.start, now - chrono::Duration::days(7));
}

#[test]
fn unknown_timeframe_token_defaults_to_thirty_days() {
    let now = Utc.with_ymd_and_hms(2024, 2, 1, 12, 0, 0).unwrap();
    let window = DateWindow::resolve(None, None, "fortnight", now, ist()).unwrap();
    assert_eq!(window.start, now - chrono::Duration::days(30));
}

#[test]
fn strict_timeframe_rejects_unknown_tokens() {
    let now = Utc::now();
    let err = DateWindow::for_timeframe("fortnight", now, ist()).unwrap_err();
    assert!(matches!(err, AnalyticsError::InvalidParameter(_)));
}

#[test]
fn unparsable_dates_are_client_errors() {
    let now = Utc::now();
    let err =
        DateWindow::resolve(Some("01/31/2024"), None, "30days", now, ist()).unwrap_err();
    assert!(matches!(err, AnalyticsError::InvalidParameter(_)));
}

#[test]
fn view_selection_expands_the_all_token() {
    let all = ViewSelection::parse("all").unwrap();
    assert!(all.contains(ViewKind::Participant));
    assert!(all.contains(ViewKind::Host));
    assert!(all.contains(ViewKind::Meeting));

    let participant = ViewSelection::parse("participant").unwrap();
    assert!(participant.contains(ViewKind::Participant));
    assert!(!participant.contains(ViewKind::Host));
    assert!(!participant.contains(ViewKind::Meeting));

    assert!(ViewSelection::parse("everything").is_err());
}

#[test]
fn meeting_type_filter_parses_and_admits() {
    assert!(MeetingTypeFilter::parse("all")
        .unwrap()
        .admits(MeetingType::Calendar));
    let only = MeetingTypeFilter::parse("instant").unwrap();
    assert!(only.admits(MeetingType::Instant));
    assert!(!only.admits(MeetingType::Scheduled));
    assert!(MeetingTypeFilter::parse("webinar").is_err());
}

#[test]
fn predicate_matches_and_documents_agree() {
    let user = ObjectId::new();
    let host = ObjectId::new();
    let m = meeting(ObjectId::new(), "m", MeetingType::Instant, host, Some("2024-01-10T09:00:00Z"));
    let row = participant(&m, user, "Alice", ParticipantRole::Participant, Some(30.0));

    let predicate = RecordPredicate::new()
        .user(user)
        .role(ParticipantRole::Participant)
        .meeting_type(MeetingTypeFilter::Only(MeetingType::Instant));

    assert!(predicate.matches_participant(&row));

    let doc = predicate.to_participant_document();
    assert_eq!(doc.get_object_id("user_id").unwrap(), user);
    assert_eq!(doc.get_str("role").unwrap(), "participant");
    assert_eq!(doc.get_str("meeting_type").unwrap(), "instant");

    let other_user = RecordPredicate::new().user(ObjectId::new());
    assert!(!other_user.matches_participant(&row));

    let host_predicate = RecordPredicate::new().host(host);
    assert!(host_predicate.matches_meeting(&m));
    assert_eq!(
        host_predicate.to_meeting_document().get_object_id("host_id").unwrap(),
        host
    );
}

#[test]
fn aggregation_filter_validates_pagination() {
    let now = Utc::now();
    let mut bad_page = params();
    bad_page.page = 0;
    let err = AggregationFilter::from_params(&bad_page, now, ist(), 100).unwrap_err();
    assert!(matches!(err, AnalyticsError::InvalidParameter(_)));

    let mut bad_limit = params();
    bad_limit.limit = Some(0);
    assert!(AggregationFilter::from_params(&bad_limit, now, ist(), 100).is_err());

    let mut ok = params();
    ok.limit = Some(25);
    let filter = AggregationFilter::from_params(&ok, now, ist(), 100).unwrap();
    assert_eq!(filter.page_size, 25);

    let defaulted = AggregationFilter::from_params(&params(), now, ist(), 100).unwrap();
    assert_eq!(defaulted.page_size, 100);
}

#[test]
fn malformed_ids_are_client_errors() {
    let now = Utc::now();
    let mut bad = params();
    bad.user_id = Some("not-an-object-id".to_string());
    let err = AggregationFilter::from_params(&bad, now, ist(), 100).unwrap_err();
    assert!(matches!(err, AnalyticsError::InvalidParameter(_)));
}
