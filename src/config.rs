// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.

use crate::session::TokenPrecedence;
use std::env;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Public URL of the site (CORS origin, cookie `Secure` flag)
    pub frontend_url: String,
    /// Server port
    pub port: u16,
    /// Plagiarism-detection endpoint (POST, JSON)
    pub detection_api_url: String,
    /// BaaS base URL; the remote session provider is disabled when unset
    pub baas_url: Option<String>,
    /// BaaS public (anon) API key
    pub baas_anon_key: Option<String>,
    /// Cookie the BaaS SDK keeps its session in
    pub baas_session_cookie: String,
    /// Which session source supplies outbound bearer tokens
    pub token_precedence: TokenPrecedence,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let token_precedence = match env::var("SESSION_TOKEN_PRECEDENCE") {
            Ok(v) => v.parse().map_err(ConfigError::Invalid)?,
            Err(_) => TokenPrecedence::default(),
        };

        Ok(Self {
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            detection_api_url: env::var("DETECTION_API_URL")
                .unwrap_or_else(|_| "http://localhost:8000/api/v1/check".to_string()),
            baas_url: non_empty_var("BAAS_URL"),
            baas_anon_key: non_empty_var("BAAS_ANON_KEY").map(|v| v.trim().to_string()),
            baas_session_cookie: env::var("BAAS_SESSION_COOKIE")
                .unwrap_or_else(|_| "sb-access-token".to_string()),
            token_precedence,
        })
    }

    /// Default config for testing only.
    pub fn test_default() -> Self {
        Self {
            frontend_url: "http://localhost:3000".to_string(),
            port: 8080,
            detection_api_url: "http://127.0.0.1:9/api/v1/check".to_string(),
            baas_url: None,
            baas_anon_key: None,
            baas_session_cookie: "sb-access-token".to_string(),
            token_precedence: TokenPrecedence::RemoteOnly,
        }
    }

    /// Session cookies carry `Secure` when the site is served over HTTPS.
    pub fn secure_cookies(&self) -> bool {
        self.frontend_url.starts_with("https://")
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
