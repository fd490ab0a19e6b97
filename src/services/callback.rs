// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Sign-in callback: terminal step of the identity provider's redirect flow.
//!
//! The provider redirects back with `token` and a percent-encoded JSON
//! `user`. A complete pair is committed to the persisted session store and
//! the browser is sent to the dashboard; anything else goes back to the
//! sign-in page with an error flag. Either way exactly one navigation is
//! produced, and it replaces the callback URL in history.

use crate::models::SessionRecord;
use crate::services::navigation::escape_html;
use crate::session::SessionStore;
use serde::Deserialize;
use serde_json::Value;

/// Landing page after a successful sign-in.
pub const DASHBOARD_PATH: &str = "/dashboard";
/// Sign-in page with the failure flag the page renders a banner for.
pub const SIGN_IN_FAILED_PATH: &str = "/login?error=auth_failed";

/// Shown between mount and the navigation decision.
pub const INTERSTITIAL_HTML: &str =
    "<p class=\"spinner\" role=\"status\">Signing in&hellip;</p>";

/// Same-origin script that performs the replacing navigation. Inline
/// script would be blocked by the page CSP.
pub const CALLBACK_SCRIPT_PATH: &str = "/auth/callback.js";
pub const CALLBACK_SCRIPT: &str = "(function () {
  var link = document.getElementById(\"continue\");
  if (link) {
    window.location.replace(link.getAttribute(\"href\"));
  }
})();
";

/// Interstitial page that replaces itself with `target` once loaded.
///
/// Without script, the `noscript` refresh moves on instead, and the
/// continue link is left for clients that do neither.
pub fn interstitial_page(indicator: &str, target: &str) -> String {
    let target = escape_html(target);
    format!(
        "<!doctype html>\n<html lang=\"en\"><head><meta charset=\"utf-8\"><title>Signing in</title>\
<noscript><meta http-equiv=\"refresh\" content=\"0; url={target}\"></noscript>\
<script src=\"{CALLBACK_SCRIPT_PATH}\" defer></script></head>\
<body><main class=\"callback\">{indicator}<a id=\"continue\" href=\"{target}\">Continue</a></main></body></html>\n"
    )
}

/// Redirect parameters from the identity provider.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallbackParams {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<String>,
}

/// Why a callback could not complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackFailure {
    MissingToken,
    MissingUser,
    MalformedUser,
}

impl CallbackFailure {
    pub fn as_str(&self) -> &'static str {
        match self {
            CallbackFailure::MissingToken => "missing_token",
            CallbackFailure::MissingUser => "missing_user",
            CallbackFailure::MalformedUser => "malformed_user",
        }
    }
}

/// Navigation decided by the handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub target: String,
    /// Replace the current history entry instead of pushing one.
    pub replace: bool,
}

impl Navigation {
    pub fn replace(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            replace: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackPhase {
    /// Parameters not yet processed; the interstitial is showing.
    SigningIn,
    /// Terminal. No further store writes or navigations happen.
    Navigated(Navigation),
}

/// One mounted callback view.
#[derive(Debug)]
pub struct CallbackHandler {
    phase: CallbackPhase,
}

impl Default for CallbackHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl CallbackHandler {
    pub fn new() -> Self {
        Self {
            phase: CallbackPhase::SigningIn,
        }
    }

    pub fn phase(&self) -> &CallbackPhase {
        &self.phase
    }

    /// Markup for the current phase. Only the signing-in phase renders
    /// anything; once navigated the view is being replaced.
    pub fn render(&self) -> Option<&'static str> {
        match self.phase {
            CallbackPhase::SigningIn => Some(INTERSTITIAL_HTML),
            CallbackPhase::Navigated(_) => None,
        }
    }

    /// React to the redirect parameters becoming available.
    ///
    /// Runs once per handler: later calls return `None` and touch neither
    /// the store nor the navigation state.
    pub fn on_params_available<S: SessionStore>(
        &mut self,
        params: &CallbackParams,
        store: &mut S,
    ) -> Option<&Navigation> {
        if !matches!(self.phase, CallbackPhase::SigningIn) {
            return None;
        }

        let navigation = match read_credentials(params) {
            Ok(record) => {
                store.set(record);
                tracing::info!("Sign-in callback completed, session stored");
                Navigation::replace(DASHBOARD_PATH)
            }
            Err(failure) => {
                tracing::warn!(reason = failure.as_str(), "Sign-in callback failed");
                Navigation::replace(SIGN_IN_FAILED_PATH)
            }
        };

        self.phase = CallbackPhase::Navigated(navigation);
        match &self.phase {
            CallbackPhase::Navigated(nav) => Some(nav),
            CallbackPhase::SigningIn => None,
        }
    }
}

/// Build a session record from the redirect parameters.
pub fn read_credentials(params: &CallbackParams) -> Result<SessionRecord, CallbackFailure> {
    let token = params
        .token
        .as_deref()
        .filter(|t| !t.is_empty())
        .ok_or(CallbackFailure::MissingToken)?;
    let raw_user = params
        .user
        .as_deref()
        .filter(|u| !u.is_empty())
        .ok_or(CallbackFailure::MissingUser)?;
    let user = decode_user(raw_user).ok_or(CallbackFailure::MalformedUser)?;

    Ok(SessionRecord::new(token, user))
}

/// The query layer has already decoded `user` once. Some providers encode
/// the JSON a second time, so a single extra decode is tried only when the
/// value does not parse as it stands.
fn decode_user(raw: &str) -> Option<Value> {
    let user = match serde_json::from_str::<Value>(raw) {
        Ok(user) => user,
        Err(_) => {
            let json = urlencoding::decode(raw).ok()?;
            serde_json::from_str::<Value>(&json).ok()?
        }
    };
    Some(user).filter(|user| !user.is_null())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemorySessionStore;
    use serde_json::json;

    fn params(token: Option<&str>, user: Option<&str>) -> CallbackParams {
        CallbackParams {
            token: token.map(str::to_string),
            user: user.map(str::to_string),
        }
    }

    #[test]
    fn test_read_credentials_decodes_user() {
        let record = read_credentials(&params(Some("xyz789"), Some(r#"{"id":1,"name":"Ann"}"#)))
            .expect("valid credentials");
        assert_eq!(record.access_token, "xyz789");
        assert_eq!(record.user, json!({"id": 1, "name": "Ann"}));
    }

    #[test]
    fn test_read_credentials_decodes_double_encoded_user() {
        let record = read_credentials(&params(Some("t"), Some("%7B%22id%22%3A2%7D"))).unwrap();
        assert_eq!(record.user, json!({"id": 2}));
    }

    #[test]
    fn test_read_credentials_keeps_percent_sequences_in_json() {
        let record = read_credentials(&params(
            Some("t"),
            Some(r#"{"id":1,"avatar_url":"https://cdn.example.com/a%20b.png"}"#),
        ))
        .unwrap();
        assert_eq!(
            record.user["avatar_url"],
            json!("https://cdn.example.com/a%20b.png")
        );

        let record = read_credentials(&params(Some("t"), Some(r#"{"id":2,"name":"x%22y"}"#))).unwrap();
        assert_eq!(record.user, json!({"id": 2, "name": "x%22y"}));
    }

    #[test]
    fn test_read_credentials_failures() {
        assert_eq!(
            read_credentials(&params(None, Some("{}"))),
            Err(CallbackFailure::MissingToken)
        );
        assert_eq!(
            read_credentials(&params(Some(""), Some("{}"))),
            Err(CallbackFailure::MissingToken)
        );
        assert_eq!(
            read_credentials(&params(Some("t"), None)),
            Err(CallbackFailure::MissingUser)
        );
        assert_eq!(
            read_credentials(&params(Some("t"), Some(""))),
            Err(CallbackFailure::MissingUser)
        );
        assert_eq!(
            read_credentials(&params(Some("t"), Some("{not json"))),
            Err(CallbackFailure::MalformedUser)
        );
        assert_eq!(
            read_credentials(&params(Some("t"), Some("null"))),
            Err(CallbackFailure::MalformedUser)
        );
        assert_eq!(
            read_credentials(&params(Some("t"), Some("%FF%FE"))),
            Err(CallbackFailure::MalformedUser)
        );
    }

    #[test]
    fn test_handler_renders_interstitial_until_navigated() {
        let mut handler = CallbackHandler::new();
        assert_eq!(handler.render(), Some(INTERSTITIAL_HTML));
        assert!(INTERSTITIAL_HTML.contains("Signing in"));

        let mut store = MemorySessionStore::new();
        handler.on_params_available(&CallbackParams::default(), &mut store);
        assert_eq!(handler.render(), None);
    }

    #[test]
    fn test_interstitial_page_navigates_to_target() {
        let page = interstitial_page(INTERSTITIAL_HTML, "/login?error=auth_failed&retry=1");

        assert!(page.contains("Signing in&hellip;"));
        assert!(page.contains(r#"<a id="continue" href="/login?error=auth_failed&amp;retry=1">"#));
        assert!(page.contains(r#"content="0; url=/login?error=auth_failed&amp;retry=1""#));
        assert!(page.contains(r#"<script src="/auth/callback.js" defer>"#));
        assert!(CALLBACK_SCRIPT.contains("location.replace"));
    }

    #[test]
    fn test_handler_runs_once() {
        let mut handler = CallbackHandler::new();
        let mut store = MemorySessionStore::new();
        let good = params(Some("abc"), Some(r#"{"id":1}"#));

        let nav = handler.on_params_available(&good, &mut store).cloned();
        assert_eq!(nav, Some(Navigation::replace(DASHBOARD_PATH)));
        assert!(nav.unwrap().replace);

        assert!(handler.on_params_available(&good, &mut store).is_none());
        assert_eq!(store.write_count(), 1);
        assert_eq!(
            handler.phase(),
            &CallbackPhase::Navigated(Navigation::replace(DASHBOARD_PATH))
        );
    }

    #[test]
    fn test_handler_failure_leaves_store_untouched() {
        let mut handler = CallbackHandler::new();
        let mut store = MemorySessionStore::new();

        let nav = handler
            .on_params_available(&params(Some("abc"), Some("not-json")), &mut store)
            .cloned();

        assert_eq!(nav, Some(Navigation::replace(SIGN_IN_FAILED_PATH)));
        assert_eq!(store.write_count(), 0);
        assert!(store.get().is_none());
    }
}
