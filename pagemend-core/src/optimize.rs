//! Optimization
//!
//! Queries the best-practices knowledge base once per artifact
//! category and stages suggestion edits citing the retrieved
//! snippets. Suggestion bodies are placeholder comments; they show up
//! in diff views as review material and patch application skips them
//! unless the placeholder text is literally present.

use tracing::debug;

use crate::completer::KnowledgeBase;
use crate::types::{ArtifactSet, Edit, Suggestion, TargetKind};
use crate::Result;

/// Canned implementation edit for a category, citing a snippet
fn implementation_for(category: TargetKind, citation: &str) -> Edit {
    match category {
        TargetKind::Markup => Edit::new(
            category,
            "<!-- Original HTML -->",
            "<!-- Optimized HTML following best practice -->",
            citation,
        ),
        TargetKind::Style => Edit::new(
            category,
            "/* Original CSS */",
            "/* Optimized CSS following best practice */",
            citation,
        ),
        TargetKind::Script => Edit::new(
            category,
            "// Original JavaScript",
            "// Optimized JavaScript following best practice",
            citation,
        ),
    }
}

/// Stage optimization suggestions for the artifact set
///
/// For each non-empty artifact body, the knowledge base is asked for
/// `<category> optimization best practices`; of the top-k snippets
/// only those mentioning the category keyword produce a suggestion.
/// The synthesized fixes are context only; they do not change what
/// is queried.
pub async fn optimize(
    artifacts: &ArtifactSet,
    fixes: &[Edit],
    knowledge: &dyn KnowledgeBase,
    top_k: usize,
) -> Result<Vec<Suggestion>> {
    debug!(
        fix_count = fixes.len(),
        knowledge = knowledge.name(),
        "staging optimization suggestions"
    );

    let mut suggestions = Vec::new();

    for &category in TargetKind::all() {
        if artifacts.get(category).is_empty() {
            continue;
        }

        let query = format!("{} optimization best practices", category.keyword());
        let snippets = knowledge.similarity_search(&query, top_k).await?;

        for snippet in snippets {
            if !snippet.content.contains(category.keyword()) {
                continue;
            }
            let edit = implementation_for(category, &snippet.content);
            suggestions.push(Suggestion::new(edit, category, snippet.content));
        }
    }

    debug!(count = suggestions.len(), "optimization suggestions staged");
    Ok(suggestions)
}
