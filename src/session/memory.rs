// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory session store, used in tests and non-browser hosts.

use super::SessionStore;
use crate::models::SessionRecord;
use parking_lot::RwLock;
use std::sync::Arc;

/// Shared in-memory store. Clones observe the same record.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    inner: Arc<RwLock<Option<SessionRecord>>>,
    writes: Arc<RwLock<usize>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a signed-in session.
    pub fn with_record(record: SessionRecord) -> Self {
        let store = Self::new();
        *store.inner.write() = Some(record);
        store
    }

    /// Number of `set` calls observed, for asserting write counts.
    pub fn write_count(&self) -> usize {
        *self.writes.read()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self) -> Option<SessionRecord> {
        self.inner.read().clone()
    }

    fn set(&mut self, record: SessionRecord) {
        // Single lock covers both fields.
        *self.inner.write() = Some(record);
        *self.writes.write() += 1;
    }

    fn clear(&mut self) {
        *self.inner.write() = None;
    }
}
