// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session models shared by the persisted store and the remote provider.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Signed-in browser session as held by the persisted store.
///
/// Both fields are always present; a record is never committed or
/// returned with only one of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Opaque bearer credential from the identity provider.
    pub access_token: String,
    /// Identity record decoded from the redirect payload.
    pub user: Value,
}

impl SessionRecord {
    pub fn new(access_token: impl Into<String>, user: Value) -> Self {
        Self {
            access_token: access_token.into(),
            user,
        }
    }

    /// Best-effort display name for page greetings.
    pub fn display_name(&self) -> Option<&str> {
        ["name", "full_name", "email"]
            .iter()
            .find_map(|key| self.user.get(key).and_then(Value::as_str))
    }
}

/// Session yielded on demand by the backend-as-a-service auth client.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RemoteSession {
    pub access_token: Option<String>,
    #[serde(default)]
    pub user: Option<Value>,
}

impl RemoteSession {
    pub fn with_token(access_token: impl Into<String>) -> Self {
        Self {
            access_token: Some(access_token.into()),
            user: None,
        }
    }

    /// Access token, treating an empty string as absent.
    pub fn token(&self) -> Option<&str> {
        self.access_token.as_deref().filter(|t| !t.is_empty())
    }
}
