// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Server-rendered pages carrying session-aware links.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use std::sync::Arc;

use crate::services::callback::DASHBOARD_PATH;
use crate::services::navigation::{escape_html, LinkVariant, SmartLink};
use crate::AppState;

const AUTH_FAILED: &str = "auth_failed";

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(landing))
        .route("/login", get(login))
        .route("/dashboard", get(dashboard))
}

fn page(title: &str, body: &str) -> Html<String> {
    Html(format!(
        "<!doctype html>\n<html lang=\"en\"><head><meta charset=\"utf-8\"><title>{}</title></head><body>{}</body></html>\n",
        escape_html(title),
        body
    ))
}

/// Landing page. Calls to action point at the dashboard once signed in.
async fn landing(State(state): State<Arc<AppState>>, jar: CookieJar) -> Html<String> {
    let sessions = state.sessions(jar);

    let mut links = [
        SmartLink::new("Get started", "/signup", DASHBOARD_PATH),
        SmartLink::new("Sign in", "/login", DASHBOARD_PATH).with_variant(LinkVariant::Secondary),
    ];
    for link in &mut links {
        link.resolve(|| sessions.is_authenticated());
    }

    let actions: String = links.iter().map(SmartLink::render).collect();
    page(
        "Plagiarism Checker",
        &format!(
            "<main><h1>Check your writing for plagiarism and AI content</h1><nav class=\"cta\">{actions}</nav></main>"
        ),
    )
}

#[derive(Debug, Default, Deserialize)]
struct LoginParams {
    #[serde(default)]
    error: Option<String>,
}

async fn login(params: std::result::Result<Query<LoginParams>, QueryRejection>) -> Html<String> {
    let params = params.map(|Query(p)| p).unwrap_or_default();

    let banner = if params.error.as_deref() == Some(AUTH_FAILED) {
        "<p class=\"alert alert-error\" role=\"alert\">Sign-in failed. Please try again.</p>"
    } else {
        ""
    };

    page(
        "Sign in",
        &format!("<main><h1>Sign in</h1>{banner}<a class=\"btn btn-ghost\" href=\"/\">Back home</a></main>"),
    )
}

/// Dashboard shell; signed-out visitors are sent to sign in.
async fn dashboard(State(state): State<Arc<AppState>>, jar: CookieJar) -> Response {
    let sessions = state.sessions(jar);
    let Some(record) = sessions.persisted_session() else {
        return Redirect::to("/login").into_response();
    };

    let name = record.display_name().unwrap_or("there");
    page(
        "Dashboard",
        &format!(
            "<main><h1>Welcome, {}</h1><section id=\"checker\"></section></main>",
            escape_html(name)
        ),
    )
    .into_response()
}
