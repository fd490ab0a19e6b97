// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Plagiarism Portal: session and authorization layer for the
//! plagiarism-detection dashboard.
//!
//! This crate terminates the identity provider's sign-in redirect, keeps
//! the browser-scoped session, decides where session-aware links point,
//! and forwards plagiarism checks to the detection service with a bearer
//! token taken from the configured session source.

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod session;

use axum_extra::extract::cookie::CookieJar;
use config::Config;
use services::DetectionClient;
use session::{BaasAuthClient, BaasRequestSession, CookieSessionStore, SessionFacade};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub detection: DetectionClient,
    /// `None` when no BaaS is configured.
    pub baas: Option<BaasAuthClient>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        // One connection pool for both upstreams.
        let http = reqwest::Client::new();
        let detection =
            DetectionClient::new(config.detection_api_url.clone()).with_http_client(http.clone());
        let baas = match (&config.baas_url, &config.baas_anon_key) {
            (Some(url), Some(key)) => Some(
                BaasAuthClient::new(url.clone(), key.clone(), config.baas_session_cookie.clone())
                    .with_http_client(http),
            ),
            _ => None,
        };
        Self {
            config,
            detection,
            baas,
        }
    }

    /// Session facade for one request's cookies.
    pub fn sessions(
        &self,
        jar: CookieJar,
    ) -> SessionFacade<CookieSessionStore, BaasRequestSession<'_>> {
        let remote = BaasRequestSession::from_optional(self.baas.as_ref(), &jar);
        let store = CookieSessionStore::new(jar, self.config.secure_cookies());
        SessionFacade::new(store, remote, self.config.token_precedence)
    }
}
