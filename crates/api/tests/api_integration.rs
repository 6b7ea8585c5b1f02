//! Integration tests for the API server.

use std::sync::{Arc, OnceLock};

use axum::body::Body;
use axum::http::{Request, StatusCode};
use document_store::InMemoryDocumentStore;
use domain::collections;
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::{Value, json};
use tower::ServiceExt;
use usecases::InMemoryPublisher;

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

fn get_metrics_handle() -> PrometheusHandle {
    METRICS_HANDLE
        .get_or_init(|| {
            let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
            builder
                .install_recorder()
                .expect("failed to install Prometheus recorder")
        })
        .clone()
}

struct TestApp {
    app: axum::Router,
    store: InMemoryDocumentStore,
    publisher: InMemoryPublisher,
}

impl TestApp {
    async fn new() -> Self {
        let store = InMemoryDocumentStore::new();
        store
            .seed(collections::CONTINENT, [json!({"code": "AS", "name": "Asia"})])
            .await;
        store
            .seed(
                collections::COUNTRY,
                [json!({"id": 62, "code": "ID", "name": "Indonesia", "number": 360})],
            )
            .await;

        let publisher = InMemoryPublisher::new();
        let state = api::create_default_state(
            store.clone(),
            Arc::new(publisher.clone()),
            "concert-create-bank-ticket",
        );
        let app = api::create_app(state, get_metrics_handle());

        Self {
            app,
            store,
            publisher,
        }
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).unwrap_or(Value::Null)
        };
        (status, json)
    }

    async fn post(&self, uri: &str, user: Option<&str>, body: Value) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json");
        if let Some(user) = user {
            builder = builder.header("x-user-id", user);
        }
        self.send(builder.body(Body::from(body.to_string())).unwrap())
            .await
    }

    async fn get(&self, uri: &str, user: Option<&str>) -> (StatusCode, Value) {
        let mut builder = Request::builder().uri(uri);
        if let Some(user) = user {
            builder = builder.header("x-user-id", user);
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }
}

fn event_body(name: &str, tag: &str) -> Value {
    json!({
        "name": name,
        "dateTime": "2024-10-05 20:00",
        "continentCode": "AS",
        "continentName": "Asia",
        "country": {"id": 62, "name": "Indonesia", "city": "Bandung", "place": "Saparua"},
        "description": "Indie showcase",
        "tag": tag,
        "tickets": [
            {"ticketType": "Gold", "ticketPrice": 350000, "totalQuota": 50, "tag": tag},
            {"ticketType": "Bronze", "ticketPrice": 120000, "totalQuota": 400, "tag": tag}
        ]
    })
}

#[tokio::test]
async fn test_health_check() {
    let t = TestApp::new().await;

    let (status, json) = t.get("/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_create_event() {
    let t = TestApp::new().await;

    let (status, json) = t
        .post(
            "/api/event/v1/create-event",
            Some("organizer"),
            event_body("Indie Fest", "indie"),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["success"], true);
    assert_eq!(json["data"], "Success create event");
    assert_eq!(json["message"], "Create event success");
    assert_eq!(t.store.count(collections::EVENT).await, 1);
    assert_eq!(t.store.count(collections::TICKET).await, 2);
    assert_eq!(t.publisher.message_count(), 2);

    let stored = &t.store.documents(collections::EVENT).await[0];
    assert_eq!(stored["createdBy"], "organizer");
}

#[tokio::test]
async fn test_missing_user_header_is_unauthorized() {
    let t = TestApp::new().await;

    let (status, json) = t
        .post(
            "/api/event/v1/create-event",
            None,
            event_body("Anonymous", "anon"),
        )
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["success"], false);
    assert!(t.store.calls().await.is_empty());
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let t = TestApp::new().await;

    let (status, json) = t
        .post(
            "/api/event/v1/create-event",
            Some("organizer"),
            json!({"name": "Only a name"}),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
    assert!(json["error"].as_str().is_some());
}

#[tokio::test]
async fn test_duplicate_event_is_conflict() {
    let t = TestApp::new().await;
    let uri = "/api/event/v1/create-event";
    t.post(uri, Some("organizer"), event_body("Twice", "twice"))
        .await;

    let (status, json) = t
        .post(uri, Some("organizer"), event_body("Twice", "other"))
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["error"], "event already exists: Twice");
}

#[tokio::test]
async fn test_tag_of_other_user_is_conflict() {
    let t = TestApp::new().await;
    let uri = "/api/event/v1/create-event";
    t.post(uri, Some("organizer"), event_body("Mine", "mine"))
        .await;

    let (status, _) = t
        .post(uri, Some("intruder"), event_body("Theirs", "mine"))
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_wrong_date_format_is_bad_request() {
    let t = TestApp::new().await;
    let mut body = event_body("Bad Date", "bad-date");
    body["dateTime"] = json!("09-02-2024T15:04");

    let (status, json) = t
        .post("/api/event/v1/create-event", Some("organizer"), body)
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("09-02-2024T15:04"));
}

#[tokio::test]
async fn test_store_failure_is_internal_error() {
    let t = TestApp::new().await;
    t.store.fail_writes_to(collections::TICKET).await;

    let (status, json) = t
        .post(
            "/api/event/v1/create-event",
            Some("organizer"),
            event_body("Doomed", "doomed"),
        )
        .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["success"], false);
}

#[tokio::test]
async fn test_create_online_ticket_config() {
    let t = TestApp::new().await;
    let uri = "/api/event/v1/create-online-ticket-config";
    let body = json!({
        "tag": "online",
        "totalQuota": 1000,
        "countryList": [
            {"countryNumber": 360, "percentage": 40},
            {"countryNumber": 458, "percentage": 60}
        ]
    });

    let (status, json) = t.post(uri, Some("organizer"), body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"], "Success create online ticket config");
    assert_eq!(t.store.count(collections::ONLINE_TICKET_CONFIG).await, 1);
}

#[tokio::test]
async fn test_online_ticket_config_with_bad_percentages() {
    let t = TestApp::new().await;
    let body = json!({
        "tag": "online",
        "totalQuota": 1000,
        "countryList": [{"countryNumber": 360, "percentage": 99}]
    });

    let (status, json) = t
        .post(
            "/api/event/v1/create-online-ticket-config",
            Some("organizer"),
            body,
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "country percentages must total 100, got 99");
}

#[tokio::test]
async fn test_list_events() {
    let t = TestApp::new().await;
    for (name, tag) in [("Beta Night", "beta"), ("Alpha Night", "alpha"), ("Gamma Day", "gamma")] {
        t.post(
            "/api/event/v1/create-event",
            Some("organizer"),
            event_body(name, tag),
        )
        .await;
    }

    let (status, json) = t
        .get("/api/event/v1/list?page=1&size=2&search=night", Some("viewer"))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["message"], "Get event success");
    let data = json["data"].as_array().unwrap();
    assert_eq!(data.len(), 2);
    assert_eq!(data[0]["name"], "Alpha Night");
    assert_eq!(data[0]["country"]["city"], "Bandung");
    assert_eq!(data[0]["ticketIds"].as_array().unwrap().len(), 2);
    assert_eq!(json["meta"]["page"], 1);
    assert_eq!(json["meta"]["count"], 2);
    assert_eq!(json["meta"]["totalData"], 2);
    assert_eq!(json["meta"]["totalPage"], 1);
}

#[tokio::test]
async fn test_list_events_on_empty_store_is_not_found() {
    let t = TestApp::new().await;

    let (status, json) = t
        .get("/api/event/v1/list?page=1&size=1", Some("viewer"))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "event not found");
}

#[tokio::test]
async fn test_list_events_without_paging_is_bad_request() {
    let t = TestApp::new().await;

    let (status, _) = t.get("/api/event/v1/list?search=x", Some("viewer")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = t
        .get("/api/event/v1/list?page=0&size=10", Some("viewer"))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let t = TestApp::new().await;
    t.post(
        "/api/event/v1/create-event",
        Some("organizer"),
        event_body("Counted", "counted"),
    )
    .await;

    let response = t
        .app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.contains("events_created_total"));
}
