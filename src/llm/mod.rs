//! Model-inference client and the message types it exchanges.
//!
//! The conversation core only knows the [`CompletionClient`] trait: a single
//! blocking-style call that maps a system instruction plus an ordered
//! transcript to reply text. [`ChatCompletionsClient`] is the production
//! implementation for OpenAI-compatible `/v1/chat/completions` endpoints
//! (Groq by default).
//!
//! # Example
//!
//! ```rust,ignore
//! use healthchat::llm::{ChatCompletionsClient, LlmSettings, Provider};
//!
//! let settings = LlmSettings {
//!     base_url: "https://api.groq.com/openai".to_string(),
//!     api_key: Some("gsk_...".to_string()),
//!     model: "llama3-70b-8192".to_string(),
//!     provider: Provider::Groq,
//! };
//! let client = ChatCompletionsClient::new(settings);
//! ```

pub mod chat_completions;
pub mod provider;

pub use chat_completions::ChatCompletionsClient;
pub use provider::Provider;

/// LLM connection and model settings.
#[derive(Debug, Clone)]
pub struct LlmSettings {
    /// Base URL for the LLM API (e.g., `https://api.groq.com/openai`).
    pub base_url: String,
    /// Optional API key for authentication.
    pub api_key: Option<String>,
    /// Model identifier (e.g., `llama3-70b-8192`).
    pub model: String,
    /// Provider type (auto-detected from `base_url`).
    pub provider: Provider,
}

/// Role of a message author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Text typed by the person using the chat.
    User,
    /// Reply produced by the model.
    Assistant,
}

impl Role {
    /// Wire name used by chat-completions style APIs.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single transcript entry.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Message {
    /// Role of the message author.
    pub role: Role,
    /// Text of the message.
    pub content: String,
}

impl Message {
    /// Create a message with the given role.
    #[must_use]
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Create a user message.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Create an assistant message.
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// The external completion call.
///
/// Implementations may be slow and may fail; callers get the error back
/// unchanged and decide what to do with it.
#[async_trait::async_trait]
pub trait CompletionClient: Send + Sync {
    /// Produce the model's reply to `messages`, preceded by `system_instruction`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be read.
    async fn complete(
        &self,
        system_instruction: &str,
        messages: &[Message],
    ) -> anyhow::Result<String>;
}
