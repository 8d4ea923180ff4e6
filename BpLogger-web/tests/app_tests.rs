use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::Value;
use std::sync::Once;
use tower::ServiceExt;

use bp_logger_data::database::open_in_memory_pool;
use bp_logger_data::repository::EntryRepository;
use bp_logger_web::{create_application, AppState};

// Ensure tracing is initialized only once
static INIT: Once = Once::new();

fn initialize() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    });
}

fn test_app() -> Router {
    initialize();
    create_application(AppState::new(EntryRepository::in_memory(), "test"))
}

fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(Method::GET).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

fn post_form(uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

/// `name=value` part of the session cookie set by the response
fn session_cookie(response: &Response) -> String {
    let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
    set_cookie.split(';').next().unwrap().to_string()
}

async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn json(app: &Router, uri: &str) -> Value {
    let response = app.clone().oneshot(get(uri, None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    serde_json::from_str(&body_text(response).await).unwrap()
}

const FULL_ENTRY: &str = "name=Ada&dob=01%2F02%2F1960&comment=left+arm&sys1=128&dia1=84&sys2=124&dia2=80";
const MEASUREMENTS_ONLY: &str = "sys1=130&dia1=85&sys2=126&dia2=82";

#[tokio::test]
async fn test_index_shows_identity_fields_without_session() {
    let app = test_app();

    let response = app.oneshot(get("/", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(!response.headers().contains_key(header::SET_COOKIE));

    let page = body_text(response).await;
    assert!(page.contains("name=\"name\""));
    assert!(page.contains("No readings logged yet."));
}

#[tokio::test]
async fn test_cookieless_requests_do_not_accumulate_sessions() {
    initialize();
    let state = AppState::new(EntryRepository::in_memory(), "test");
    let app = create_application(state.clone());

    for i in 0..50 {
        app.clone().oneshot(get("/", None)).await.unwrap();
        app.clone()
            .oneshot(post_form(&format!("/delete/{}", i), "", None))
            .await
            .unwrap();
        app.clone()
            .oneshot(post_form("/download", "mode=all", None))
            .await
            .unwrap();
        app.clone().oneshot(get("/reset_user", None)).await.unwrap();
        app.clone().oneshot(post_form("/", "", None)).await.unwrap();
    }
    assert_eq!(state.sessions.len().await, 0);

    // a stored identity creates exactly one session and its cookie
    let response = app.clone().oneshot(post_form("/", FULL_ENTRY, None)).await.unwrap();
    let cookie = session_cookie(&response);
    assert!(cookie.starts_with("bp_session="));
    assert_eq!(state.sessions.len().await, 1);

    // a known session does not get a new cookie
    let again = app.clone().oneshot(get("/", Some(&cookie))).await.unwrap();
    assert!(!again.headers().contains_key(header::SET_COOKIE));

    app.oneshot(get("/reset_user", Some(&cookie))).await.unwrap();
    assert_eq!(state.sessions.len().await, 0);
}

#[tokio::test]
async fn test_create_entry_redirects_and_remembers_identity() {
    let app = test_app();

    let response = app.clone().oneshot(post_form("/", FULL_ENTRY, None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/");
    let cookie = session_cookie(&response);

    // identity now comes from the session
    let response = app
        .clone()
        .oneshot(post_form("/", MEASUREMENTS_ONLY, Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let page = body_text(app.clone().oneshot(get("/", Some(&cookie))).await.unwrap()).await;
    assert!(page.contains("Logging as <strong>Ada</strong>"));
    assert!(!page.contains("name=\"name\""));

    let readings = json(&app, "/api/v1/readings").await;
    let readings = readings.as_array().unwrap();
    assert_eq!(readings.len(), 2);
    assert!(readings.iter().all(|r| r["user_name"] == "Ada" && r["comment"] == "left arm"));
}

#[tokio::test]
async fn test_create_entry_without_identity_is_rejected() {
    let app = test_app();

    let response = app
        .clone()
        .oneshot(post_form("/", "name=Ada&sys1=1&dia1=2&sys2=3&dia2=4", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_text(response).await, "Error: Name and DOB required");

    assert_eq!(json(&app, "/api/v1/readings").await, Value::Array(vec![]));
}

#[tokio::test]
async fn test_malformed_measurement_still_remembers_identity() {
    let app = test_app();

    let response = app
        .clone()
        .oneshot(post_form("/", "name=Ada&dob=x&sys1=high&dia1=2&sys2=3&dia2=4", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let cookie = session_cookie(&response);
    assert_eq!(body_text(response).await, "Error: Invalid sys1 'high'");
    assert_eq!(json(&app, "/api/v1/readings").await, Value::Array(vec![]));

    let response = app
        .clone()
        .oneshot(post_form("/", MEASUREMENTS_ONLY, Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let readings = json(&app, "/api/v1/readings").await;
    assert_eq!(readings[0]["user_name"], "Ada");
}

#[tokio::test]
async fn test_reset_user_forgets_identity() {
    let app = test_app();

    let response = app.clone().oneshot(post_form("/", FULL_ENTRY, None)).await.unwrap();
    let cookie = session_cookie(&response);

    let response = app.clone().oneshot(get("/reset_user", Some(&cookie))).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let response = app
        .oneshot(post_form("/", MEASUREMENTS_ONLY, Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_edit_and_delete_entry() {
    let app = test_app();
    app.clone().oneshot(post_form("/", FULL_ENTRY, None)).await.unwrap();

    let readings = json(&app, "/api/v1/readings").await;
    let id = readings[0]["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(post_form(&format!("/edit/{}", id), "sys1=140&dia1=90&sys2=138&dia2=88", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let readings = json(&app, "/api/v1/readings").await;
    assert_eq!(readings[0]["systolic1"], 140);
    assert_eq!(readings[0]["diastolic2"], 88);

    let response = app
        .clone()
        .oneshot(post_form(&format!("/delete/{}", id), "", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(json(&app, "/api/v1/readings").await, Value::Array(vec![]));
}

#[tokio::test]
async fn test_edit_and_delete_missing_entry_is_404() {
    let app = test_app();

    let response = app
        .clone()
        .oneshot(post_form("/edit/999", "sys1=1&dia1=2&sys2=3&dia2=4", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.oneshot(post_form("/delete/999", "", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_blocks_api() {
    let app = test_app();
    assert_eq!(json(&app, "/api/v1/blocks").await, Value::Array(vec![]));

    app.clone().oneshot(post_form("/", FULL_ENTRY, None)).await.unwrap();

    let blocks = json(&app, "/api/v1/blocks").await;
    let blocks = blocks.as_array().unwrap();
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0]["is_complete"], false);
    assert!(blocks[0].get("totals").is_none());
    assert_eq!(blocks[0]["days_seen"].as_array().unwrap().len(), 1);
    assert_eq!(blocks[0]["entries"][0]["systolic1"], 128);
}

#[tokio::test]
async fn test_download_all_as_csv() {
    let app = test_app();
    app.clone().oneshot(post_form("/", FULL_ENTRY, None)).await.unwrap();

    let response = app.oneshot(post_form("/download", "mode=all", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/csv"));
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"bp_log.csv\""
    );

    let csv = body_text(response).await;
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "Date/Time,Name,DOB,Comment,Sys1,Dia1,Sys2,Dia2");
    assert_eq!(lines.len(), 2);
    assert!(lines[1].ends_with(",Ada,01/02/1960,left arm,128,84,124,80"));
}

#[tokio::test]
async fn test_download_range_outside_data_has_header_only() {
    let app = test_app();
    app.clone().oneshot(post_form("/", FULL_ENTRY, None)).await.unwrap();

    let response = app
        .oneshot(post_form(
            "/download",
            "mode=range&start_date=2001-01-01&end_date=2001-01-31",
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await.lines().count(), 1);
}

#[tokio::test]
async fn test_download_range_requires_both_dates() {
    let app = test_app();

    let response = app
        .oneshot(post_form("/download", "mode=range&end_date=2024-01-31", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_health_reports_in_memory_store_as_degraded() {
    let app = test_app();

    let response = app.oneshot(get("/health", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let health: Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(health["status"], "degraded");
    assert_eq!(health["components"]["database"]["status"], "degraded");
    assert_eq!(health["environment"], "test");
}

#[tokio::test]
async fn test_health_with_sqlite_is_ok() {
    initialize();
    let repository = EntryRepository::new(open_in_memory_pool().unwrap());
    let app = create_application(AppState::new(repository, "test"));

    let response = app.oneshot(get("/health", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let health: Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(health["status"], "ok");
    assert!(health["version"].is_string());
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = test_app();

    let doc = json(&app, "/api-docs/openapi.json").await;
    assert!(doc["paths"]["/api/v1/blocks"].is_object());
}
