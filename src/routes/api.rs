// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! JSON API routes used by the dashboard.

use crate::error::{AppError, Result};
use crate::services::CheckRequest;
use crate::session::SessionStatus;
use crate::AppState;
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde_json::Value;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/session", get(get_session))
        .route("/api/check", post(check))
}

/// Sign-in state of both session sources.
async fn get_session(State(state): State<Arc<AppState>>, jar: CookieJar) -> Json<SessionStatus> {
    let sessions = state.sessions(jar);
    Json(sessions.status().await)
}

/// Forward a plagiarism check to the detection service.
async fn check(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(request): Json<CheckRequest>,
) -> Result<Json<Value>> {
    if request.text.trim().is_empty() {
        return Err(AppError::BadRequest("text must not be empty".to_string()));
    }

    let sessions = state.sessions(jar);
    let report = state
        .detection
        .check_plagiarism(&sessions, &request.text, request.check_ai_content)
        .await?;

    Ok(Json(report))
}
