// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::Response,
    routing::{get, post},
    Json, Router,
};
use parking_lot::Mutex;
use plagiarism_portal::config::Config;
use plagiarism_portal::routes::create_router;
use plagiarism_portal::AppState;
use serde_json::{json, Value};
use std::sync::Arc;

/// Create a test app from the default test config.
#[allow(dead_code)]
pub fn create_test_app() -> (Router, Arc<AppState>) {
    create_test_app_with(Config::test_default())
}

/// Create a test app from a custom config.
#[allow(dead_code)]
pub fn create_test_app_with(config: Config) -> (Router, Arc<AppState>) {
    let state = Arc::new(AppState::new(config));
    (create_router(state.clone()), state)
}

/// Serve a router on an ephemeral local port and return its base URL.
#[allow(dead_code)]
pub async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

/// A request as seen by the fake detection service.
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: String,
}

#[allow(dead_code)]
#[derive(Clone)]
struct FakeDetection {
    status: StatusCode,
    captured: Arc<Mutex<Vec<CapturedRequest>>>,
}

#[allow(dead_code)]
async fn fake_check(
    State(fake): State<FakeDetection>,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, Json<Value>) {
    let header_str = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    fake.captured.lock().push(CapturedRequest {
        authorization: header_str(header::AUTHORIZATION),
        content_type: header_str(header::CONTENT_TYPE),
        body,
    });

    if fake.status.is_success() {
        (fake.status, Json(json!({"plagiarism_score": 0.12, "ai_score": 0.4})))
    } else {
        (fake.status, Json(json!({"detail": "boom"})))
    }
}

/// Start a fake detection service answering every check with `status`.
/// Returns the check endpoint URL and the captured requests.
#[allow(dead_code)]
pub async fn spawn_fake_detection(
    status: StatusCode,
) -> (String, Arc<Mutex<Vec<CapturedRequest>>>) {
    let captured = Arc::new(Mutex::new(Vec::new()));
    let router = Router::new()
        .route("/api/v1/check", post(fake_check))
        .with_state(FakeDetection {
            status,
            captured: captured.clone(),
        });
    let base = serve(router).await;
    (format!("{}/api/v1/check", base), captured)
}

/// Start a fake BaaS auth API that accepts exactly `valid_token`.
#[allow(dead_code)]
pub async fn spawn_fake_baas(valid_token: &'static str) -> String {
    let router = Router::new().route(
        "/auth/v1/user",
        get(move |headers: HeaderMap| async move {
            let expected = format!("Bearer {}", valid_token);
            let authorized = headers
                .get(header::AUTHORIZATION)
                .is_some_and(|v| v.as_bytes() == expected.as_bytes());
            let has_key = headers.get("apikey").is_some();
            if authorized && has_key {
                (StatusCode::OK, Json(json!({"id": "baas-user", "email": "ann@example.com"})))
            } else {
                (StatusCode::UNAUTHORIZED, Json(json!({"msg": "invalid JWT"})))
            }
        }),
    );
    serve(router).await
}

#[allow(dead_code)]
pub fn set_cookie_headers(response: &Response) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|value| value.to_str().unwrap().to_string())
        .collect()
}

#[allow(dead_code)]
pub fn find_cookie(headers: &[String], name: &str) -> String {
    headers
        .iter()
        .find(|value| value.starts_with(&format!("{name}=")))
        .cloned()
        .unwrap_or_else(|| panic!("missing Set-Cookie header for {name}: {headers:?}"))
}

/// `name=value` part of a `Set-Cookie` header.
#[allow(dead_code)]
pub fn cookie_pair(set_cookie: &str) -> String {
    set_cookie.split(';').next().unwrap().trim().to_string()
}

/// Build a `Cookie` request header from a response's `Set-Cookie` headers.
#[allow(dead_code)]
pub fn cookie_header_from(response: &Response) -> String {
    set_cookie_headers(response)
        .iter()
        .map(|c| cookie_pair(c))
        .collect::<Vec<_>>()
        .join("; ")
}

#[allow(dead_code)]
pub async fn body_string(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
