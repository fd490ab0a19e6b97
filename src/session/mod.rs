// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session sources: the persisted browser store, the remote BaaS session,
//! and the facade that reconciles them.

pub mod cookie;
pub mod facade;
pub mod memory;
pub mod remote;

pub use cookie::{CookieSessionStore, ACCESS_TOKEN_COOKIE, USER_COOKIE};
pub use facade::{AuthorizationSource, SessionFacade, SessionStatus, TokenPrecedence};
pub use memory::MemorySessionStore;
pub use remote::{
    BaasAuthClient, BaasRequestSession, NoRemoteSession, RemoteSessionProvider,
    StaticRemoteSession,
};

use crate::models::SessionRecord;

/// Durable, browser-scoped store holding at most one [`SessionRecord`].
///
/// Implementations must commit both fields of a record together and must
/// never hand back a partial record. An unavailable medium reads as "no
/// session" and silently drops writes.
pub trait SessionStore {
    fn get(&self) -> Option<SessionRecord>;

    fn set(&mut self, record: SessionRecord);

    fn clear(&mut self);

    /// Presence check for callers that only need to branch on sign-in state.
    fn is_present(&self) -> bool {
        self.get().is_some()
    }
}
