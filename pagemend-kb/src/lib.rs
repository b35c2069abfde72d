//! Pagemend KB - deterministic best-practice retrieval
//!
//! Splits a plain-text corpus into overlapping character chunks and
//! ranks them by term overlap with the query. Entirely in-process and
//! reproducible: the same corpus and query always return the same
//! snippets, which keeps pipeline runs testable offline.

use std::collections::HashSet;
use std::path::Path;

use async_trait::async_trait;
use tracing::debug;

use pagemend_core::{KnowledgeBase, Snippet};

/// Chunk length, in characters
pub const DEFAULT_CHUNK_SIZE: usize = 1000;

/// Characters shared between adjacent chunks
pub const DEFAULT_CHUNK_OVERLAP: usize = 200;

/// Guidance document bundled with the crate
const EMBEDDED_CORPUS: &str = include_str!("corpus/best_practices.md");

/// Errors building an index
#[derive(Debug, thiserror::Error)]
pub enum KbError {
    #[error("failed to read corpus file: {0}")]
    Io(#[from] std::io::Error),

    #[error("corpus is empty")]
    EmptyCorpus,
}

/// One indexed chunk with its precomputed term set
#[derive(Debug, Clone)]
struct Chunk {
    text: String,
    terms: HashSet<String>,
}

/// In-memory knowledge base ranked by term overlap
///
/// The index is immutable once built. Ties in score keep corpus order,
/// so results are stable across runs.
#[derive(Debug, Clone)]
pub struct TermIndex {
    chunks: Vec<Chunk>,
}

impl TermIndex {
    /// Build an index over the bundled best-practices document
    pub fn embedded() -> Self {
        Self {
            chunks: build_chunks(EMBEDDED_CORPUS, DEFAULT_CHUNK_SIZE, DEFAULT_CHUNK_OVERLAP),
        }
    }

    /// Build an index over the given corpus text
    pub fn from_corpus(
        corpus: &str,
        chunk_size: usize,
        chunk_overlap: usize,
    ) -> Result<Self, KbError> {
        if corpus.trim().is_empty() {
            return Err(KbError::EmptyCorpus);
        }
        let chunks = build_chunks(corpus, chunk_size, chunk_overlap);
        debug!(chunks = chunks.len(), chunk_size, chunk_overlap, "indexed corpus");
        Ok(Self { chunks })
    }

    /// Build an index over a corpus file
    pub fn from_file(
        path: impl AsRef<Path>,
        chunk_size: usize,
        chunk_overlap: usize,
    ) -> Result<Self, KbError> {
        let corpus = std::fs::read_to_string(path)?;
        Self::from_corpus(&corpus, chunk_size, chunk_overlap)
    }

    /// Number of indexed chunks
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Whether the index holds no chunks
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}

impl Default for TermIndex {
    fn default() -> Self {
        Self::embedded()
    }
}

#[async_trait]
impl KnowledgeBase for TermIndex {
    fn name(&self) -> &'static str {
        "term-index"
    }

    async fn similarity_search(&self, query: &str, k: usize) -> pagemend_core::Result<Vec<Snippet>> {
        let query_terms = terms_of(query);
        let mut scored: Vec<(usize, &Chunk)> = self
            .chunks
            .iter()
            .map(|chunk| (overlap(&query_terms, &chunk.terms), chunk))
            .filter(|(score, _)| *score > 0)
            .collect();
        // Stable sort: equally scored chunks keep corpus order.
        scored.sort_by(|a, b| b.0.cmp(&a.0));

        debug!(query, matches = scored.len(), k, "term overlap search");
        Ok(scored
            .into_iter()
            .take(k)
            .map(|(_, chunk)| Snippet::new(chunk.text.clone()))
            .collect())
    }
}

/// Split text into overlapping character chunks and index their terms
fn build_chunks(text: &str, chunk_size: usize, chunk_overlap: usize) -> Vec<Chunk> {
    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        return Vec::new();
    }
    // An overlap at or above the chunk size would never advance.
    let step = chunk_size.saturating_sub(chunk_overlap).max(1);

    let mut chunks = Vec::new();
    let mut start = 0;
    while start < chars.len() {
        let end = (start + chunk_size).min(chars.len());
        let text: String = chars[start..end].iter().collect();
        let terms = terms_of(&text);
        chunks.push(Chunk { text, terms });
        if end == chars.len() {
            break;
        }
        start += step;
    }
    chunks
}

/// Lowercased alphanumeric terms of a text
fn terms_of(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|term| !term.is_empty())
        .map(|term| term.to_lowercase())
        .collect()
}

/// How many query terms appear in the chunk
fn overlap(query_terms: &HashSet<String>, chunk_terms: &HashSet<String>) -> usize {
    query_terms
        .iter()
        .filter(|term| chunk_terms.contains(*term))
        .count()
}
