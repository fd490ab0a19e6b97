// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Sign-in callback and sign-out routes.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Router,
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;

use crate::services::callback::{
    interstitial_page, CallbackHandler, CallbackParams, CALLBACK_SCRIPT, CALLBACK_SCRIPT_PATH,
    SIGN_IN_FAILED_PATH,
};
use crate::session::CookieSessionStore;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/callback", get(auth_callback))
        .route(CALLBACK_SCRIPT_PATH, get(callback_script))
        .route("/auth/logout", post(logout))
}

/// Identity provider redirect target.
///
/// Cookies are committed with the signing-in interstitial, which then
/// replaces the callback URL in history with the chosen destination.
async fn auth_callback(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    params: std::result::Result<Query<CallbackParams>, QueryRejection>,
) -> Response {
    // Unparseable query strings are treated like missing credentials.
    let params = match params {
        Ok(Query(params)) => params,
        Err(e) => {
            tracing::warn!(error = %e, "Unparseable callback query");
            CallbackParams::default()
        }
    };

    let mut store = CookieSessionStore::new(jar, state.config.secure_cookies());
    let mut handler = CallbackHandler::new();
    let indicator = handler.render().unwrap_or_default();

    let target = handler
        .on_params_available(&params, &mut store)
        .map(|nav| nav.target.clone())
        .unwrap_or_else(|| SIGN_IN_FAILED_PATH.to_string());

    (
        [(header::CACHE_CONTROL, "no-store")],
        store.into_jar(),
        Html(interstitial_page(indicator, &target)),
    )
        .into_response()
}

async fn callback_script() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/javascript; charset=utf-8")],
        CALLBACK_SCRIPT,
    )
}

/// Sign out: clear the persisted session.
///
/// The BaaS session is owned by its SDK and signed out client-side.
async fn logout(State(state): State<Arc<AppState>>, jar: CookieJar) -> impl IntoResponse {
    let mut sessions = state.sessions(jar);
    sessions.sign_out();
    (StatusCode::NO_CONTENT, sessions.into_store().into_jar())
}
