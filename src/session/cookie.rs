// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Browser-scoped persisted session store backed by cookies.
//!
//! The record is split across two cookies, one per field, that are always
//! added or removed in the same response. Reads require both cookies, so a
//! browser that dropped one of them reads as signed out.

use super::SessionStore;
use crate::models::SessionRecord;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};

/// Cookie holding the access token.
pub const ACCESS_TOKEN_COOKIE: &str = "pp_access_token";
/// Cookie holding the base64url-encoded user JSON.
pub const USER_COOKIE: &str = "pp_user";

/// Browsers silently drop cookies larger than this (name + value).
const MAX_COOKIE_BYTES: usize = 4096;
const SESSION_MAX_AGE_DAYS: i64 = 30;

/// Session store over the request's cookie jar.
///
/// Writes accumulate in the jar; return [`CookieSessionStore::into_jar`]
/// from the handler to emit the `Set-Cookie` headers.
#[derive(Debug, Clone)]
pub struct CookieSessionStore {
    jar: CookieJar,
    secure: bool,
}

impl CookieSessionStore {
    pub fn new(jar: CookieJar, secure: bool) -> Self {
        Self { jar, secure }
    }

    pub fn into_jar(self) -> CookieJar {
        self.jar
    }

    fn session_cookie(&self, name: &'static str, value: String) -> Cookie<'static> {
        Cookie::build((name, value))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure)
            .max_age(time::Duration::days(SESSION_MAX_AGE_DAYS))
            .build()
    }

    fn removal_cookie(&self, name: &'static str) -> Cookie<'static> {
        Cookie::build((name, ""))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure)
            .build()
    }
}

impl SessionStore for CookieSessionStore {
    fn get(&self) -> Option<SessionRecord> {
        let token = self.jar.get(ACCESS_TOKEN_COOKIE)?.value().to_string();
        if token.is_empty() {
            return None;
        }

        let encoded_user = self.jar.get(USER_COOKIE)?;
        match decode_user(encoded_user.value()) {
            Some(user) => Some(SessionRecord::new(token, user)),
            None => {
                tracing::debug!("Ignoring undecodable session user cookie");
                None
            }
        }
    }

    fn set(&mut self, record: SessionRecord) {
        let encoded_user = match serde_json::to_vec(&record.user) {
            Ok(bytes) => URL_SAFE_NO_PAD.encode(bytes),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to serialize session user, skipping write");
                return;
            }
        };

        let token_cookie = self.session_cookie(ACCESS_TOKEN_COOKIE, record.access_token);
        let user_cookie = self.session_cookie(USER_COOKIE, encoded_user);

        // Measured as sent: name=value after percent-encoding.
        let token_bytes = encoded_len(&token_cookie);
        let user_bytes = encoded_len(&user_cookie);
        if token_bytes > MAX_COOKIE_BYTES || user_bytes > MAX_COOKIE_BYTES {
            tracing::warn!(
                token_bytes,
                user_bytes,
                "Session record exceeds cookie size limit, skipping write"
            );
            return;
        }

        self.jar = std::mem::take(&mut self.jar)
            .add(token_cookie)
            .add(user_cookie);
    }

    fn clear(&mut self) {
        let token_removal = self.removal_cookie(ACCESS_TOKEN_COOKIE);
        let user_removal = self.removal_cookie(USER_COOKIE);
        self.jar = std::mem::take(&mut self.jar)
            .remove(token_removal)
            .remove(user_removal);
    }
}

fn encoded_len(cookie: &Cookie<'_>) -> usize {
    cookie.stripped().encoded().to_string().len()
}

fn decode_user(encoded: &str) -> Option<serde_json::Value> {
    let bytes = URL_SAFE_NO_PAD.decode(encoded).ok()?;
    serde_json::from_slice(&bytes)
        .ok()
        .filter(|user: &serde_json::Value| !user.is_null())
}
