//! Service abstractions the pipeline depends on
//!
//! The pipeline never talks to a network directly. Free-form text
//! generation and best-practice retrieval are injected behind these
//! traits so every deterministic stage is testable offline.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::Result;

/// Trait for text-completion services
///
/// The contract is prompt in, text out, with no schema guarantee on
/// the output. Callers must defensively parse the reply.
#[async_trait]
pub trait Completer: Send + Sync {
    /// Get the name of this completion service
    fn name(&self) -> &'static str;

    /// Complete a prompt, returning the raw reply text
    async fn complete(&self, prompt: &str) -> Result<String>;
}

/// One ranked result from a similarity search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snippet {
    /// The retrieved text chunk
    pub content: String,
}

impl Snippet {
    /// Create a snippet from its content
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

/// Trait for best-practice retrieval services
#[async_trait]
pub trait KnowledgeBase: Send + Sync {
    /// Get the name of this knowledge base
    fn name(&self) -> &'static str;

    /// Return the top-k snippets most similar to the query
    async fn similarity_search(&self, query: &str, k: usize) -> Result<Vec<Snippet>>;
}

/// Completer that always returns the same reply
///
/// Useful in tests and offline runs where no completion service is
/// reachable.
#[derive(Debug, Clone, Default)]
pub struct StaticCompleter {
    reply: String,
}

impl StaticCompleter {
    /// Create a completer that replies with the given text
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
        }
    }
}

#[async_trait]
impl Completer for StaticCompleter {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn complete(&self, _prompt: &str) -> Result<String> {
        Ok(self.reply.clone())
    }
}
