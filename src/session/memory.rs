//! Append-only transcript of a single conversation.

use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::{Mutex, MutexGuard};

use crate::llm::{Message, Role};

/// Ordered transcript of one session.
///
/// Cloning yields another handle to the same transcript. Insertion order is
/// preserved and replayed verbatim as conversational context; any sequence
/// of appends is accepted.
#[derive(Debug, Clone)]
pub struct SessionMemory {
    inner: Arc<MemoryInner>,
}

#[derive(Debug)]
struct MemoryInner {
    id: String,
    messages: RwLock<Vec<Message>>,
    /// Held for the duration of a conversation turn.
    turn: Mutex<()>,
}

impl SessionMemory {
    pub(crate) fn new(id: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(MemoryInner {
                id: id.into(),
                messages: RwLock::new(Vec::new()),
                turn: Mutex::new(()),
            }),
        }
    }

    /// Session identifier this transcript belongs to.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.inner.id
    }

    /// Add one message to the end of the transcript.
    pub fn append(&self, role: Role, content: impl Into<String>) {
        self.inner.messages.write().push(Message::new(role, content));
    }

    /// Snapshot of the transcript in insertion order.
    ///
    /// The returned vector is a copy; later appends do not show up in it.
    #[must_use]
    pub fn history(&self) -> Vec<Message> {
        self.inner.messages.read().clone()
    }

    /// Number of messages recorded so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.messages.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether two handles refer to the same transcript.
    #[must_use]
    pub fn same_instance(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.inner, &b.inner)
    }

    /// Record a completed turn. Both messages land under one lock so no
    /// other append can fall between them.
    pub(crate) fn append_turn(&self, user_text: &str, reply: &str) {
        let mut guard = self.inner.messages.write();
        guard.push(Message::user(user_text));
        guard.push(Message::assistant(reply));
    }

    /// Wait for exclusive use of this session for one turn.
    pub(crate) async fn lock_turn(&self) -> MutexGuard<'_, ()> {
        self.inner.turn.lock().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_preserves_order() {
        let memory = SessionMemory::new("s1");
        assert!(memory.is_empty());

        memory.append(Role::User, "Hello");
        memory.append(Role::Assistant, "Hi there!");
        memory.append(Role::Assistant, "Anything else?");

        let history = memory.history();
        assert_eq!(
            history,
            vec![
                Message::user("Hello"),
                Message::assistant("Hi there!"),
                Message::assistant("Anything else?"),
            ]
        );
    }

    #[test]
    fn test_history_is_a_snapshot() {
        let memory = SessionMemory::new("s1");
        memory.append(Role::User, "first");

        let snapshot = memory.history();
        memory.append(Role::Assistant, "second");

        assert_eq!(snapshot.len(), 1);
        assert_eq!(memory.history().len(), 2);
        // Reading again yields the same content.
        assert_eq!(snapshot, memory.history()[..1]);
    }

    #[test]
    fn test_clones_share_transcript() {
        let a = SessionMemory::new("s1");
        let b = a.clone();

        b.append(Role::User, "shared");

        assert!(SessionMemory::same_instance(&a, &b));
        assert_eq!(a.len(), 1);
        assert!(!SessionMemory::same_instance(&a, &SessionMemory::new("s1")));
    }

    #[test]
    fn test_append_turn_records_pair() {
        let memory = SessionMemory::new("s1");
        memory.append_turn("Book appointment", "Sure, when?");

        assert_eq!(
            memory.history(),
            vec![Message::user("Book appointment"), Message::assistant("Sure, when?")]
        );
    }
}
