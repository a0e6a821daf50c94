//! Session registry: one transcript per session identifier.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use super::SessionMemory;

/// Thread-safe map from session identifier to its [`SessionMemory`].
///
/// Cloning yields another handle to the same registry. Entries are never
/// removed; a transcript lives as long as the registry does.
#[derive(Debug, Clone, Default)]
pub struct SessionRegistry {
    inner: Arc<RwLock<HashMap<String, SessionMemory>>>,
}

impl SessionRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the transcript for `session_id`, creating an empty one on first use.
    ///
    /// Every call with the same identifier returns a handle to the same
    /// transcript, including when callers race on a new identifier.
    #[must_use]
    pub fn get_or_create(&self, session_id: &str) -> SessionMemory {
        if let Some(memory) = self.inner.read().get(session_id) {
            return memory.clone();
        }

        // Re-check under the write lock: another caller may have won the race.
        let mut guard = self.inner.write();
        guard
            .entry(session_id.to_string())
            .or_insert_with(|| {
                tracing::debug!(name: "session.created", session_id = %session_id, "Created session");
                SessionMemory::new(session_id)
            })
            .clone()
    }

    /// Get a transcript without creating it.
    #[must_use]
    pub fn get(&self, session_id: &str) -> Option<SessionMemory> {
        self.inner.read().get(session_id).cloned()
    }

    /// Number of sessions seen so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// List all session IDs, sorted.
    #[must_use]
    pub fn list_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.inner.read().keys().cloned().collect();
        ids.sort();
        ids
    }
}
