// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Plagiarism-detection service client.
//!
//! Handles:
//! - Request construction with an optional bearer token
//! - Single-attempt execution (no retry, no client-imposed timeout)
//! - Collapsing every failure into one generic error

use crate::error::AppError;
use crate::session::AuthorizationSource;
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use serde_json::Value;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

fn default_check_ai_content() -> bool {
    true
}

/// Body sent to the detection service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct CheckRequest {
    pub text: String,
    #[serde(default = "default_check_ai_content")]
    pub check_ai_content: bool,
}

impl CheckRequest {
    pub fn new(text: impl Into<String>, check_ai_content: bool) -> Self {
        Self {
            text: text.into(),
            check_ai_content,
        }
    }
}

/// Detection service client.
#[derive(Clone)]
pub struct DetectionClient {
    http: reqwest::Client,
    endpoint: String,
}

impl DetectionClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    /// Use a custom HTTP client (for connection pool reuse or testing).
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http = client;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Build the check request, attaching `Authorization: Bearer` only
    /// when a token is supplied.
    pub fn build_request(
        &self,
        bearer: Option<&str>,
        body: &CheckRequest,
    ) -> Result<reqwest::Request, AppError> {
        let mut builder = self
            .http
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .json(body);
        if let Some(token) = bearer {
            builder = builder.bearer_auth(token);
        }

        // The request never left: a bad configured endpoint, not an
        // upstream failure.
        builder.build().map_err(|e| {
            AppError::Internal(anyhow::Error::new(e).context("Failed to build detection request"))
        })
    }

    /// Run a plagiarism check.
    ///
    /// The bearer token is taken from `auth` before the body is sent.
    /// Returns the service's JSON on 2xx; a transport error, any other
    /// status or an unreadable body is [`AppError::DetectionRequest`].
    pub async fn check_plagiarism(
        &self,
        auth: &dyn AuthorizationSource,
        text: &str,
        check_ai_content: bool,
    ) -> Result<Value, AppError> {
        let token = auth.authorization_token().await;
        let body = CheckRequest::new(text, check_ai_content);
        let request = self.build_request(token.as_deref(), &body)?;

        tracing::debug!(
            authorized = token.is_some(),
            check_ai_content,
            text_len = text.len(),
            "Sending detection request"
        );

        let response = self.http.execute(request).await.map_err(|e| {
            tracing::warn!(error = %e, "Detection request transport error");
            AppError::DetectionRequest
        })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "Detection service returned error status");
            return Err(AppError::DetectionRequest);
        }

        response.json::<Value>().await.map_err(|e| {
            tracing::warn!(error = %e, "Detection response was not JSON");
            AppError::DetectionRequest
        })
    }
}
