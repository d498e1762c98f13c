//! Integration tests for the HTTP surface.
//!
//! Drives the full router with in-memory stores and mock intake
//! collaborators: auth round trips, the multipart company-details flow,
//! and error mapping.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use intake::testing::{MockBlobStore, MockExtractor, MockSummarizer};
use intake::{IntakePipeline, MemoryRecordStore, RecordStore};
use server_core::domains::auth::{JwtService, MemoryUserStore, UserStore};
use server_core::server::app::{build_app, AppState};
use tower::ServiceExt;

struct TestApp {
    router: Router,
    record_store: Arc<MemoryRecordStore>,
}

fn test_app() -> TestApp {
    let record_store = Arc::new(MemoryRecordStore::new());
    let users: Arc<dyn UserStore> = Arc::new(MemoryUserStore::new());
    let jwt = Arc::new(JwtService::new("test_secret_key", "test_issuer".to_string()));

    let pipeline = IntakePipeline::new(
        Arc::new(MockExtractor::new()),
        Arc::new(MockSummarizer::new()),
        Arc::new(MockBlobStore::new()),
        record_store.clone(),
    );

    let router = build_app(AppState {
        pipeline,
        record_store: record_store.clone() as Arc<dyn RecordStore>,
        users,
        jwt,
    });

    TestApp {
        router,
        record_store,
    }
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_request(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Sign up and log in a fresh user; returns the session cookie.
async fn login_user(app: &TestApp, email: &str) -> String {
    let response = app
        .router
        .clone()
        .oneshot(json_request(
            "/api/auth/signup",
            serde_json::json!({"email": email, "password": "hunter2hunter2"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .router
        .clone()
        .oneshot(json_request(
            "/api/auth/login",
            serde_json::json!({"email": email, "password": "hunter2hunter2"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("login should set the session cookie")
        .to_str()
        .unwrap();
    assert!(set_cookie.starts_with("authToken="));
    assert!(set_cookie.contains("HttpOnly"));

    set_cookie.split(';').next().unwrap().to_string()
}

/// Build a multipart body. Parts are (field_name, file_name, content); a
/// `None` file name makes a plain text field.
fn multipart_request(
    uri: &str,
    method: &str,
    cookie: &str,
    parts: &[(&str, Option<&str>, &str)],
) -> Request<Body> {
    let boundary = "test-boundary-7MA4YWxkTrZu0gW";
    let mut body = String::new();
    for (name, file_name, content) in parts {
        body.push_str(&format!("--{boundary}\r\n"));
        match file_name {
            Some(file_name) => {
                body.push_str(&format!(
                    "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n"
                ));
                body.push_str("Content-Type: application/octet-stream\r\n\r\n");
            }
            None => {
                body.push_str(&format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n"));
            }
        }
        body.push_str(content);
        body.push_str("\r\n");
    }
    body.push_str(&format!("--{boundary}--\r\n"));

    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::COOKIE, cookie)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap()
}

// ============================================================================
// Auth
// ============================================================================

#[tokio::test]
async fn test_signup_login_check_roundtrip() {
    let app = test_app();
    let cookie = login_user(&app, "alice@example.com").await;

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/auth/check")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["user"]["email"], "alice@example.com");
}

#[tokio::test]
async fn test_check_without_cookie_is_unauthorized() {
    let app = test_app();
    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/auth/check")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
}

#[tokio::test]
async fn test_duplicate_signup_conflicts() {
    let app = test_app();
    login_user(&app, "bob@example.com").await;

    let response = app
        .router
        .clone()
        .oneshot(json_request(
            "/api/auth/signup",
            serde_json::json!({"email": "bob@example.com", "password": "hunter2hunter2"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_login_with_wrong_password_is_unauthorized() {
    let app = test_app();
    login_user(&app, "carol@example.com").await;

    let response = app
        .router
        .clone()
        .oneshot(json_request(
            "/api/auth/login",
            serde_json::json!({"email": "carol@example.com", "password": "wrong-password"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_clears_the_cookie() {
    let app = test_app();
    let cookie = login_user(&app, "dave@example.com").await;

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/logout")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap();
    // Removal cookie: empty value, expired
    assert!(set_cookie.starts_with("authToken="));
    assert!(set_cookie.to_ascii_lowercase().contains("max-age=0") || set_cookie.contains("1970"));
}

// ============================================================================
// Company details
// ============================================================================

#[tokio::test]
async fn test_get_company_details_without_record_is_404() {
    let app = test_app();
    let cookie = login_user(&app, "erin@example.com").await;

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/company-details")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
}

#[tokio::test]
async fn test_multipart_create_then_get() {
    let app = test_app();
    let cookie = login_user(&app, "frank@example.com").await;

    let response = app
        .router
        .clone()
        .oneshot(multipart_request(
            "/api/company-details",
            "POST",
            &cookie,
            &[
                ("option", None, "2"),
                ("companyActivities", Some("activities.pdf"), "activities body"),
                ("constitution", Some("constitution.pdf"), "constitution body"),
            ],
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["constitution"]["option"], 2);
    assert!(json["data"]["companyActivities"]["description"]
        .as_str()
        .unwrap()
        .starts_with("summary:"));
    assert!(json["data"].get("intendedCompanyName").is_none());

    // The stored record comes back populated on GET
    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/company-details")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(
        json["data"]["companyActivities"]["file"]["fileName"],
        "activities.pdf"
    );
}

#[tokio::test]
async fn test_constitution_file_without_option_is_400() {
    let app = test_app();
    let cookie = login_user(&app, "grace@example.com").await;

    let response = app
        .router
        .clone()
        .oneshot(multipart_request(
            "/api/company-details",
            "POST",
            &cookie,
            &[
                ("companyActivities", Some("activities.pdf"), "activities body"),
                ("constitution", Some("constitution.pdf"), "constitution body"),
            ],
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
}

#[tokio::test]
async fn test_resubmission_updates_in_place() {
    let app = test_app();
    let cookie = login_user(&app, "heidi@example.com").await;

    let create = app
        .router
        .clone()
        .oneshot(multipart_request(
            "/api/company-details",
            "POST",
            &cookie,
            &[
                ("option", None, "2"),
                ("constitution", Some("constitution.pdf"), "constitution body"),
            ],
        ))
        .await
        .unwrap();
    assert_eq!(create.status(), StatusCode::CREATED);

    // Option-only resubmission: 200, option changed, document untouched
    let update = app
        .router
        .clone()
        .oneshot(multipart_request(
            "/api/company-details",
            "POST",
            &cookie,
            &[("option", None, "3")],
        ))
        .await
        .unwrap();
    assert_eq!(update.status(), StatusCode::OK);
    let json = body_json(update).await;
    assert_eq!(json["data"]["constitution"]["option"], 3);
    assert_eq!(
        json["data"]["constitution"]["file"]["fileName"],
        "constitution.pdf"
    );
}

#[tokio::test]
async fn test_put_by_id_checks_ownership() {
    let app = test_app();
    let owner_cookie = login_user(&app, "ivan@example.com").await;
    let other_cookie = login_user(&app, "judy@example.com").await;

    let create = app
        .router
        .clone()
        .oneshot(multipart_request(
            "/api/company-details",
            "POST",
            &owner_cookie,
            &[("companyActivities", Some("activities.pdf"), "body")],
        ))
        .await
        .unwrap();
    let record_id = body_json(create).await["data"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    // A different user may not touch the record
    let forbidden = app
        .router
        .clone()
        .oneshot(multipart_request(
            &format!("/api/company-details/{record_id}"),
            "PUT",
            &other_cookie,
            &[("option", None, "1")],
        ))
        .await
        .unwrap();
    assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);

    // The owner may
    let allowed = app
        .router
        .clone()
        .oneshot(multipart_request(
            &format!("/api/company-details/{record_id}"),
            "PUT",
            &owner_cookie,
            &[("option", None, "1")],
        ))
        .await
        .unwrap();
    assert_eq!(allowed.status(), StatusCode::OK);

    // Unknown ids are 404
    let missing = app
        .router
        .clone()
        .oneshot(multipart_request(
            &format!("/api/company-details/{}", uuid::Uuid::new_v4()),
            "PUT",
            &owner_cookie,
            &[("option", None, "1")],
        ))
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);

    assert_eq!(app.record_store.record_count(), 1);
}

#[tokio::test]
async fn test_unsupported_upload_is_stored_without_summary() {
    let app = test_app();
    let cookie = login_user(&app, "mallory@example.com").await;

    let response = app
        .router
        .clone()
        .oneshot(multipart_request(
            "/api/company-details",
            "POST",
            &cookie,
            &[("intendedCompanyName", Some("scan.png"), "png bytes")],
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    // File stored, but the slot has no AI-derived value
    assert!(json["data"].get("intendedCompanyName").is_none());
    assert_eq!(app.record_store.file_count(), 1);
}
