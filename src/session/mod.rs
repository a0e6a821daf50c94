//! Session transcripts and the registry that owns them.
//!
//! Sessions are identified by opaque strings and hold the ordered list of
//! user and assistant messages exchanged so far. Nothing is persisted; a
//! transcript lives as long as the registry that created it.
//!
//! # Architecture
//!
//! - [`SessionMemory`]: append-only transcript of one session
//! - [`SessionRegistry`]: thread-safe map from session id to transcript
//!
//! # Example
//!
//! ```rust
//! use healthchat::llm::Role;
//! use healthchat::session::SessionRegistry;
//!
//! let registry = SessionRegistry::new();
//! let memory = registry.get_or_create("streamlit-session");
//! memory.append(Role::User, "Hello!");
//!
//! assert_eq!(registry.get_or_create("streamlit-session").history().len(), 1);
//! ```

mod memory;
mod registry;

pub use memory::SessionMemory;
pub use registry::SessionRegistry;
