//! Pagemend Gemini - completion service client
//!
//! Implements the [`pagemend_core::Completer`] seam against the Gemini
//! `generateContent` API, with round-robin key rotation and failure
//! blacklisting so a flaky or rate-limited key does not take the
//! pipeline down.

pub mod client;
pub mod error;
pub mod keys;

pub use client::{GeminiCompleter, DEFAULT_ENDPOINT, DEFAULT_MAX_RETRIES};
pub use error::{Error, Result};
pub use keys::{KeyRing, DEFAULT_BLACKLIST_WINDOW};
