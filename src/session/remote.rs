// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Remote session provider (backend-as-a-service auth client).
//!
//! The BaaS keeps its own session, independent of the persisted store the
//! sign-in callback writes. Obtaining it is asynchronous: the session
//! cookie the BaaS SDK sets is verified against the provider's user
//! endpoint before its token is trusted.

use crate::models::RemoteSession;
use anyhow::Context;
use async_trait::async_trait;
use axum_extra::extract::cookie::CookieJar;
use serde_json::Value;

/// Source of the current remote session.
#[async_trait]
pub trait RemoteSessionProvider: Send + Sync {
    /// Current session, `None` when signed out of the BaaS.
    async fn current_session(&self) -> anyhow::Result<Option<RemoteSession>>;
}

/// HTTP client for the BaaS auth API.
#[derive(Clone)]
pub struct BaasAuthClient {
    http: reqwest::Client,
    base_url: String,
    anon_key: String,
    session_cookie: String,
}

impl BaasAuthClient {
    pub fn new(
        base_url: impl Into<String>,
        anon_key: impl Into<String>,
        session_cookie: impl Into<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
            session_cookie: session_cookie.into(),
        }
    }

    /// Use a custom HTTP client (for connection pool reuse or testing).
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http = client;
        self
    }

    /// Bind the client to one request's cookies.
    pub fn session_for(&self, jar: &CookieJar) -> BaasRequestSession<'_> {
        let cookie_token = jar
            .get(&self.session_cookie)
            .and_then(|c| extract_access_token(c.value()));
        BaasRequestSession {
            client: Some(self),
            cookie_token,
        }
    }

    /// Verify an access token with the BaaS and return the session it
    /// belongs to.
    ///
    /// A rejected token (401/403) is a signed-out session, not an error.
    pub async fn fetch_session(&self, access_token: &str) -> anyhow::Result<Option<RemoteSession>> {
        let url = format!("{}/auth/v1/user", self.base_url);

        let response = self
            .http
            .get(&url)
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await
            .context("BaaS user request failed")?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            tracing::debug!(status = status.as_u16(), "BaaS rejected session token");
            return Ok(None);
        }
        if !status.is_success() {
            anyhow::bail!("BaaS user request returned HTTP {}", status);
        }

        let user: Value = response
            .json()
            .await
            .context("BaaS user response was not JSON")?;

        Ok(Some(RemoteSession {
            access_token: Some(access_token.to_string()),
            user: Some(user),
        }))
    }
}

/// [`BaasAuthClient`] bound to a single request's cookies.
pub struct BaasRequestSession<'a> {
    client: Option<&'a BaasAuthClient>,
    cookie_token: Option<String>,
}

impl<'a> BaasRequestSession<'a> {
    /// Session for a request when no BaaS is configured.
    pub fn disabled() -> Self {
        Self {
            client: None,
            cookie_token: None,
        }
    }

    pub fn from_optional(client: Option<&'a BaasAuthClient>, jar: &CookieJar) -> Self {
        client.map_or_else(Self::disabled, |c| c.session_for(jar))
    }
}

#[async_trait]
impl<'a> RemoteSessionProvider for BaasRequestSession<'a> {
    async fn current_session(&self) -> anyhow::Result<Option<RemoteSession>> {
        match (self.client, self.cookie_token.as_deref()) {
            (Some(client), Some(token)) => client.fetch_session(token).await,
            _ => Ok(None),
        }
    }
}

/// Provider that never has a session.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRemoteSession;

#[async_trait]
impl RemoteSessionProvider for NoRemoteSession {
    async fn current_session(&self) -> anyhow::Result<Option<RemoteSession>> {
        Ok(None)
    }
}

/// Fixed provider for tests and offline hosts.
#[derive(Debug, Clone, Default)]
pub struct StaticRemoteSession {
    session: Option<RemoteSession>,
    fail: bool,
}

impl StaticRemoteSession {
    pub fn new(session: Option<RemoteSession>) -> Self {
        Self {
            session,
            fail: false,
        }
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self::new(Some(RemoteSession::with_token(token)))
    }

    /// Provider whose lookups always fail.
    pub fn failing() -> Self {
        Self {
            session: None,
            fail: true,
        }
    }
}

#[async_trait]
impl RemoteSessionProvider for StaticRemoteSession {
    async fn current_session(&self) -> anyhow::Result<Option<RemoteSession>> {
        if self.fail {
            anyhow::bail!("remote session provider unavailable");
        }
        Ok(self.session.clone())
    }
}

/// The SDK cookie holds either the bare token or a JSON session object.
fn extract_access_token(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if raw.starts_with('{') {
        return serde_json::from_str::<Value>(raw)
            .ok()?
            .get("access_token")?
            .as_str()
            .filter(|t| !t.is_empty())
            .map(str::to_string);
    }
    Some(raw.to_string())
}
