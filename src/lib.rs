//! Healthcare chat
//!
//! A small chat web front-end that forwards user text to a hosted LLM and
//! keeps a per-session transcript so the model sees prior turns.
//!
//! # Architecture
//!
//! - **Server**: Axum HTTP server with a server-rendered chat page and JSON API
//! - **Conversation**: one turn at a time per session, full transcript replayed
//! - **LLM**: OpenAI-compatible Chat Completions client (Groq by default)
//!
//! # Modules
//!
//! - [`session`]: session transcripts and the registry that owns them
//! - [`runner`]: prompt assembly and transcript update per turn
//! - [`llm`]: message types, the completion trait, and its HTTP client
//! - [`config`]: layered configuration (defaults, file, env, CLI)

// Allow pedantic clippy warnings that don't add value for this codebase
#![allow(clippy::missing_fields_in_debug)]
#![allow(clippy::unused_async)]

pub mod config;
pub mod error;
pub mod llm;
pub mod runner;
pub mod server;
pub mod session;
pub mod telemetry;
pub mod ui;

use crate::config::AppConfig;

use llm::CompletionClient;
use runner::ConversationRunner;
use session::SessionRegistry;
use std::sync::Arc;

/// Application state shared across all handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Runs conversation turns against the completion client.
    pub runner: ConversationRunner,
    /// Session registry (the same one the runner writes to).
    pub sessions: SessionRegistry,
    /// Global Configuration
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Wire a fresh session registry and runner around `client`.
    pub fn new(config: Arc<AppConfig>, client: Arc<dyn CompletionClient>) -> Self {
        let sessions = SessionRegistry::new();
        let runner = ConversationRunner::new(
            sessions.clone(),
            client,
            config.chat.system_instruction.clone(),
        );
        Self {
            runner,
            sessions,
            config,
        }
    }
}
