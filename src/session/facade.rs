// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session facade: the single read path over both session sources.
//!
//! Navigation decisions read the persisted store only. Outbound requests
//! take their bearer token from whichever source [`TokenPrecedence`]
//! selects. Disagreement between the two sources is logged, never fatal.

use super::{RemoteSessionProvider, SessionStore};
use crate::models::{RemoteSession, SessionRecord};
use async_trait::async_trait;
use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Which session source supplies the bearer token for outbound requests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TokenPrecedence {
    /// Only the remote session; the persisted store is never consulted.
    #[default]
    RemoteOnly,
    /// Remote session, falling back to the persisted store.
    PreferRemote,
    /// Persisted store, falling back to the remote session.
    PreferPersisted,
    /// Only the persisted store.
    PersistedOnly,
}

impl TokenPrecedence {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenPrecedence::RemoteOnly => "remote-only",
            TokenPrecedence::PreferRemote => "prefer-remote",
            TokenPrecedence::PreferPersisted => "prefer-persisted",
            TokenPrecedence::PersistedOnly => "persisted-only",
        }
    }
}

impl std::fmt::Display for TokenPrecedence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TokenPrecedence {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "remote-only" => Ok(TokenPrecedence::RemoteOnly),
            "prefer-remote" => Ok(TokenPrecedence::PreferRemote),
            "prefer-persisted" => Ok(TokenPrecedence::PreferPersisted),
            "persisted-only" => Ok(TokenPrecedence::PersistedOnly),
            other => Err(format!("unknown token precedence: {other}")),
        }
    }
}

/// Anything that can supply an optional bearer token.
#[async_trait]
pub trait AuthorizationSource: Send + Sync {
    async fn authorization_token(&self) -> Option<String>;
}

/// Snapshot of both session sources.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SessionStatus {
    pub authenticated: bool,
    pub remote_authenticated: bool,
    /// `None` unless both sources hold a token.
    pub sources_agree: Option<bool>,
}

/// Facade over the persisted store and the remote provider.
pub struct SessionFacade<S, R> {
    store: S,
    remote: R,
    precedence: TokenPrecedence,
}

impl<S: SessionStore, R: RemoteSessionProvider> SessionFacade<S, R> {
    pub fn new(store: S, remote: R, precedence: TokenPrecedence) -> Self {
        Self {
            store,
            remote,
            precedence,
        }
    }

    pub fn precedence(&self) -> TokenPrecedence {
        self.precedence
    }

    /// Whether a persisted session record exists.
    pub fn is_authenticated(&self) -> bool {
        self.store.is_present()
    }

    /// The persisted record, for views that show the signed-in user.
    pub fn persisted_session(&self) -> Option<SessionRecord> {
        self.store.get()
    }

    /// Remote session with provider failures absorbed as "signed out".
    pub async fn remote_session(&self) -> Option<RemoteSession> {
        match self.remote.current_session().await {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!(error = %e, "Remote session lookup failed, treating as signed out");
                None
            }
        }
    }

    async fn remote_token(&self) -> Option<String> {
        self.remote_session()
            .await
            .and_then(|s| s.token().map(str::to_string))
    }

    fn persisted_token(&self) -> Option<String> {
        self.store.get().map(|r| r.access_token)
    }

    /// Bearer token for outbound requests under the configured precedence.
    pub async fn authorization_token(&self) -> Option<String> {
        match self.precedence {
            TokenPrecedence::RemoteOnly => {
                let remote = self.remote_token().await;
                self.note_divergence(remote.as_deref(), self.persisted_token().as_deref());
                remote
            }
            TokenPrecedence::PreferRemote => {
                let remote = self.remote_token().await;
                let persisted = self.persisted_token();
                self.note_divergence(remote.as_deref(), persisted.as_deref());
                remote.or(persisted)
            }
            TokenPrecedence::PreferPersisted => match self.persisted_token() {
                Some(token) => Some(token),
                None => self.remote_token().await,
            },
            TokenPrecedence::PersistedOnly => self.persisted_token(),
        }
    }

    /// Presence of both sources and whether their tokens match.
    pub async fn status(&self) -> SessionStatus {
        let persisted = self.persisted_token();
        let remote = self.remote_token().await;
        let sources_agree = match (&persisted, &remote) {
            (Some(p), Some(r)) => Some(p == r),
            _ => None,
        };
        SessionStatus {
            authenticated: persisted.is_some(),
            remote_authenticated: remote.is_some(),
            sources_agree,
        }
    }

    /// Drop the persisted session (sign-out).
    pub fn sign_out(&mut self) {
        self.store.clear();
        tracing::info!("Persisted session cleared");
    }

    pub fn into_store(self) -> S {
        self.store
    }

    fn note_divergence(&self, remote: Option<&str>, persisted: Option<&str>) {
        if let (Some(r), Some(p)) = (remote, persisted) {
            if r != p {
                tracing::warn!(
                    precedence = %self.precedence,
                    "Persisted and remote session tokens disagree"
                );
            }
        }
    }
}

#[async_trait]
impl<S, R> AuthorizationSource for SessionFacade<S, R>
where
    S: SessionStore + Send + Sync,
    R: RemoteSessionProvider,
{
    async fn authorization_token(&self) -> Option<String> {
        SessionFacade::authorization_token(self).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{MemorySessionStore, StaticRemoteSession};
    use serde_json::json;

    fn persisted(token: &str) -> MemorySessionStore {
        MemorySessionStore::with_record(SessionRecord::new(token, json!({"id": 1})))
    }

    #[test]
    fn test_precedence_parse() {
        assert_eq!("remote-only".parse(), Ok(TokenPrecedence::RemoteOnly));
        assert_eq!(" Prefer-Remote ".parse(), Ok(TokenPrecedence::PreferRemote));
        assert_eq!(
            "prefer-persisted".parse(),
            Ok(TokenPrecedence::PreferPersisted)
        );
        assert_eq!("persisted-only".parse(), Ok(TokenPrecedence::PersistedOnly));
        assert!("local".parse::<TokenPrecedence>().is_err());
        assert_eq!(TokenPrecedence::default(), TokenPrecedence::RemoteOnly);
    }

    #[tokio::test]
    async fn test_remote_only_ignores_persisted_token() {
        let facade = SessionFacade::new(
            persisted("local"),
            StaticRemoteSession::default(),
            TokenPrecedence::RemoteOnly,
        );
        assert!(facade.is_authenticated());
        assert_eq!(facade.authorization_token().await, None);
    }

    #[tokio::test]
    async fn test_remote_only_uses_remote_token() {
        let facade = SessionFacade::new(
            persisted("local"),
            StaticRemoteSession::with_token("remote"),
            TokenPrecedence::RemoteOnly,
        );
        assert_eq!(facade.authorization_token().await.as_deref(), Some("remote"));
    }

    #[tokio::test]
    async fn test_prefer_remote_falls_back_to_persisted() {
        let facade = SessionFacade::new(
            persisted("local"),
            StaticRemoteSession::default(),
            TokenPrecedence::PreferRemote,
        );
        assert_eq!(facade.authorization_token().await.as_deref(), Some("local"));
    }

    #[tokio::test]
    async fn test_prefer_persisted_wins_on_divergence() {
        let facade = SessionFacade::new(
            persisted("local"),
            StaticRemoteSession::with_token("remote"),
            TokenPrecedence::PreferPersisted,
        );
        assert_eq!(facade.authorization_token().await.as_deref(), Some("local"));
    }

    #[tokio::test]
    async fn test_persisted_only_ignores_remote() {
        let facade = SessionFacade::new(
            MemorySessionStore::new(),
            StaticRemoteSession::with_token("remote"),
            TokenPrecedence::PersistedOnly,
        );
        assert_eq!(facade.authorization_token().await, None);
    }

    #[tokio::test]
    async fn test_failing_remote_is_absorbed() {
        let facade = SessionFacade::new(
            persisted("local"),
            StaticRemoteSession::failing(),
            TokenPrecedence::PreferRemote,
        );
        assert_eq!(facade.authorization_token().await.as_deref(), Some("local"));
    }

    #[tokio::test]
    async fn test_status_reports_disagreement() {
        let facade = SessionFacade::new(
            persisted("local"),
            StaticRemoteSession::with_token("remote"),
            TokenPrecedence::RemoteOnly,
        );
        let status = facade.status().await;
        assert!(status.authenticated);
        assert!(status.remote_authenticated);
        assert_eq!(status.sources_agree, Some(false));

        let facade = SessionFacade::new(
            MemorySessionStore::new(),
            StaticRemoteSession::with_token("remote"),
            TokenPrecedence::RemoteOnly,
        );
        let status = facade.status().await;
        assert!(!status.authenticated);
        assert_eq!(status.sources_agree, None);
    }

    #[test]
    fn test_sign_out_clears_store() {
        let store = persisted("local");
        let mut facade = SessionFacade::new(
            store.clone(),
            StaticRemoteSession::default(),
            TokenPrecedence::RemoteOnly,
        );
        facade.sign_out();
        assert!(!facade.is_authenticated());
        assert!(store.get().is_none());
    }
}
