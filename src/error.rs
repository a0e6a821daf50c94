//! Error types for conversation turns.

use thiserror::Error;

/// Why a conversation turn did not produce a reply.
#[derive(Error, Debug)]
pub enum ChatError {
    /// Empty session id or empty message text.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The completion call failed. Carries the upstream error untouched.
    #[error(transparent)]
    Upstream(#[from] anyhow::Error),
}

/// Result type alias for conversation operations.
pub type Result<T> = std::result::Result<T, ChatError>;
