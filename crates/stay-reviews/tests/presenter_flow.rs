//! End-to-end presenter flows over the API gateway and a scripted transport.

use std::rc::Rc;
use std::sync::Arc;

use serde_json::{json, Value};
use stay_core::{
    AccommodationCode, AccommodationType, RequestId, ReviewId, ReviewSort, ReviewsConfig,
};
use stay_data::{ApiClient, FetchError, MockTransport, ReviewGateway, ReviewQuery, ReviewSource};
use stay_observability::{CaptureSink, StructuredLogger};
use stay_reviews::{
    render_reviews, AuthState, FetchOutcome, HelpfulOutcome, ReviewLinks, ReviewListPresenter,
    Severity, ViewState,
};

fn logger(sink: &Arc<CaptureSink>) -> StructuredLogger {
    StructuredLogger::new(RequestId::from_string("flow-test")).with_sink(sink.clone())
}

fn gateway(sink: &Arc<CaptureSink>) -> ReviewGateway<MockTransport> {
    ReviewGateway::new(
        ApiClient::new("https://api.test", MockTransport::new()),
        logger(sink),
    )
}

fn record(id: &str, rating: Value, helpful: u32) -> Value {
    json!({
        "id": id,
        "userName": "Ana",
        "rating": rating,
        "title": format!("Stay {}", id),
        "comment": "Quiet room",
        "createdAt": "2024-05-01T10:00:00Z",
        "helpfulCount": helpful,
    })
}

fn page(records: Vec<Value>) -> Value {
    let total = records.len();
    json!({
        "content": records,
        "page": 1,
        "size": 10,
        "totalElements": total,
        "totalPages": 1,
    })
}

fn hotel() -> ReviewQuery {
    ReviewQuery::new(AccommodationType::Hotel, AccommodationCode::new("HTL-7"))
}

#[tokio::test]
async fn test_load_renders_summary_and_drops_bad_ratings() {
    let sink = Arc::new(CaptureSink::new());
    let gateway = gateway(&sink);
    gateway.client().transport().push_json(
        200,
        page(vec![
            record("a", json!(10), 0),
            record("b", json!(10), 0),
            record("c", json!(8), 0),
            record("d", json!(6), 0),
            record("bad", json!(42), 0),
        ]),
    );

    let mut presenter =
        ReviewListPresenter::new(gateway, AuthState::Anonymous, &ReviewsConfig::default(), logger(&sink));
    assert_eq!(presenter.load(hotel()).await, Some(FetchOutcome::Applied));

    let summary = presenter.summary().unwrap();
    assert_eq!(summary.total, 4);
    assert_eq!(summary.average, 8.5);
    assert_eq!(summary.histogram.count(10), 2);

    let requests = presenter.source().client().transport().requests();
    assert_eq!(
        requests[0].url,
        "https://api.test/reviews/hotel/HTL-7?page=1&limit=10&sortBy=newest"
    );

    let warned = sink
        .entries()
        .iter()
        .any(|e| e.message == "Dropping review with invalid rating");
    assert!(warned);

    let html = render_reviews(&presenter, &ReviewLinks::for_query(&hotel()));
    assert!(html.contains(r#"data-state="loaded""#));
    assert!(html.contains("8.5"));
    assert!(!html.contains(r#"data-review-id="bad""#));
}

#[tokio::test]
async fn test_sort_change_discards_previous_list() {
    let sink = Arc::new(CaptureSink::new());
    let gateway = gateway(&sink);
    let transport = gateway.client().transport();
    transport.push_json(200, page(vec![record("new-1", json!(9), 0), record("new-2", json!(7), 0)]));
    transport.push_json(200, page(vec![record("low-1", json!(3), 0)]));

    let mut presenter =
        ReviewListPresenter::new(gateway, AuthState::Anonymous, &ReviewsConfig::default(), logger(&sink));
    presenter.load(hotel()).await;
    presenter.change_sort(ReviewSort::RatingLow).await;

    let ids: Vec<&str> = presenter.visible_reviews().iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["low-1"]);
    assert_eq!(presenter.summary().unwrap().average, 3.0);

    let requests = presenter.source().client().transport().requests();
    assert!(requests[1].url.ends_with("sortBy=rating_low"));
}

#[tokio::test]
async fn test_late_response_for_old_params_is_ignored() {
    let sink = Arc::new(CaptureSink::new());
    let gateway = Rc::new(gateway(&sink));
    let transport = gateway.client().transport();
    transport.push_json(200, page(vec![record("old", json!(2), 0)]));
    transport.push_json(200, page(vec![record("fresh", json!(9), 0)]));

    let mut presenter = ReviewListPresenter::new(
        gateway.clone(),
        AuthState::Anonymous,
        &ReviewsConfig::default(),
        logger(&sink),
    );

    let first = presenter.set_params(hotel()).unwrap();
    let second = presenter.set_sort(ReviewSort::Helpful).unwrap();

    let old = gateway.fetch_page(first.query()).await;
    let fresh = gateway.fetch_page(second.query()).await;

    assert_eq!(presenter.complete_fetch(second, fresh), FetchOutcome::Applied);
    assert_eq!(presenter.complete_fetch(first, old), FetchOutcome::Stale);
    assert_eq!(presenter.visible_reviews()[0].id.as_str(), "fresh");
}

#[tokio::test]
async fn test_transport_failure_shows_error_state() {
    let sink = Arc::new(CaptureSink::new());
    let gateway = gateway(&sink);
    gateway
        .client()
        .transport()
        .push_error(FetchError::Transport("connection refused".to_string()));

    let mut presenter =
        ReviewListPresenter::new(gateway, AuthState::Anonymous, &ReviewsConfig::default(), logger(&sink));
    presenter.load(hotel()).await;

    assert!(matches!(presenter.state(), ViewState::Error { .. }));
    let notes = presenter.notifications();
    assert_eq!(notes[0].code, 1);

    let html = render_reviews(&presenter, &ReviewLinks::for_query(&hotel()));
    assert!(html.contains("reviews-error"));
}

#[tokio::test]
async fn test_helpful_requires_login_and_sends_nothing() {
    let sink = Arc::new(CaptureSink::new());
    let gateway = gateway(&sink);
    gateway
        .client()
        .transport()
        .push_json(200, page(vec![record("a", json!(8), 4)]));

    let mut presenter =
        ReviewListPresenter::new(gateway, AuthState::Anonymous, &ReviewsConfig::default(), logger(&sink));
    presenter.load(hotel()).await;

    let outcome = presenter.mark_helpful(&ReviewId::new("a")).await;
    assert_eq!(outcome, HelpfulOutcome::LoginRequired);
    assert_eq!(presenter.source().client().transport().request_count(), 1);
    assert_eq!(presenter.notifications()[0].severity, Severity::Warning);
}

#[tokio::test]
async fn test_helpful_marks_once_with_server_count() {
    let sink = Arc::new(CaptureSink::new());
    let gateway = gateway(&sink);
    let transport = gateway.client().transport();
    transport.push_json(200, page(vec![record("a", json!(8), 4)]));
    transport.push_json(200, json!({"reviewId": "a", "helpfulCount": 11}));

    let auth = AuthState::from_cookie_header(Some("token=jwt-123"), "token");
    let mut presenter =
        ReviewListPresenter::new(gateway, auth, &ReviewsConfig::default(), logger(&sink));
    presenter.load(hotel()).await;

    let id = ReviewId::new("a");
    assert_eq!(
        presenter.mark_helpful(&id).await,
        HelpfulOutcome::Marked { helpful_count: 11 }
    );
    assert_eq!(presenter.mark_helpful(&id).await, HelpfulOutcome::AlreadyMarked);

    let requests = presenter.source().client().transport().requests();
    assert_eq!(requests.len(), 2);
    let post = &requests[1];
    assert_eq!(post.method.as_str(), "POST");
    assert_eq!(post.url, "https://api.test/reviews/helpful");
    assert_eq!(post.header_value("authorization"), Some("Bearer jwt-123"));
    assert_eq!(
        post.json_body(),
        Some(json!({"reviewId": "a", "accommodationType": "hotel"}))
    );

    let html = render_reviews(&presenter, &ReviewLinks::for_query(&hotel()));
    assert!(html.contains("11 people found this helpful"));
    assert!(html.contains("disabled"));
    assert!(html.contains("notification--info"));
}
