//! Conversation turns: prompt assembly, the completion call, and the
//! transcript update that follows it.

use std::sync::Arc;

use crate::error::{ChatError, Result};
use crate::llm::{CompletionClient, Message};
use crate::session::SessionRegistry;

/// Runs one turn of a conversation at a time per session.
///
/// Each turn replays the session's full transcript to the model behind a
/// fixed system instruction, then records the user message and the reply.
/// A failed completion leaves the transcript exactly as it was.
#[derive(Clone)]
pub struct ConversationRunner {
    registry: SessionRegistry,
    client: Arc<dyn CompletionClient>,
    system_instruction: String,
}

impl std::fmt::Debug for ConversationRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConversationRunner")
            .field("registry", &self.registry)
            .field("system_instruction", &self.system_instruction)
            .finish_non_exhaustive()
    }
}

impl ConversationRunner {
    pub fn new(
        registry: SessionRegistry,
        client: Arc<dyn CompletionClient>,
        system_instruction: impl Into<String>,
    ) -> Self {
        Self {
            registry,
            client,
            system_instruction: system_instruction.into(),
        }
    }

    /// The registry this runner reads and writes.
    #[must_use]
    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    #[must_use]
    pub fn system_instruction(&self) -> &str {
        &self.system_instruction
    }

    /// Send `user_text` to the model in the context of `session_id`.
    ///
    /// Turns on the same session run one after another; turns on different
    /// sessions run independently. On success the transcript grows by
    /// exactly two messages (user, then assistant).
    ///
    /// # Errors
    ///
    /// [`ChatError::InvalidInput`] for an empty session id or text, and
    /// [`ChatError::Upstream`] with the completion client's error when the
    /// model call fails.
    pub async fn invoke(&self, session_id: &str, user_text: &str) -> Result<String> {
        if session_id.is_empty() {
            return Err(ChatError::InvalidInput("session id must not be empty".into()));
        }
        if user_text.is_empty() {
            return Err(ChatError::InvalidInput("message must not be empty".into()));
        }

        let memory = self.registry.get_or_create(session_id);
        let _turn = memory.lock_turn().await;

        let mut prompt = memory.history();
        prompt.push(Message::user(user_text));

        tracing::debug!(
            session_id = %session_id,
            prompt_messages = prompt.len(),
            "Invoking completion"
        );

        let reply = match self
            .client
            .complete(&self.system_instruction, &prompt)
            .await
        {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!(
                    name: "chat.turn.failed",
                    session_id = %session_id,
                    error = %e,
                    "Completion failed, transcript unchanged"
                );
                return Err(ChatError::Upstream(e));
            }
        };

        memory.append_turn(user_text, &reply);

        tracing::info!(
            name: "chat.turn.completed",
            session_id = %session_id,
            message_count = memory.len(),
            reply_length = reply.len(),
            "Turn completed"
        );

        Ok(reply)
    }
}
