//! The bug-fixing pipeline
//!
//! Runs the six stages strictly in sequence: validate_layout,
//! heal_content, generate_fixes, optimize_code, get_approval,
//! process_approval. Stage failures in the fallback-bearing stages are
//! absorbed locally; a knowledge-base failure aborts the run.

pub mod stage;
pub mod state;

pub use stage::PipelineStage;
pub use state::{PipelineState, StageTransition};

use std::sync::Arc;

use tracing::{error, info};

use crate::analyze::{find_content_issues, find_layout_issues, find_script_issues};
use crate::approval;
use crate::completer::{Completer, KnowledgeBase};
use crate::fix::generate_fixes;
use crate::optimize::optimize;
use crate::patch;
use crate::report::Report;
use crate::types::ArtifactSet;
use crate::Result;

/// Default number of snippets requested per optimizer query
pub const DEFAULT_TOP_K: usize = 3;

/// The pipeline runner
///
/// Holds the injected collaborators; per-run state lives in
/// [`PipelineState`] and is owned by [`Pipeline::run`] alone. Without a
/// completer the fix stage degrades to its canned templates, so offline
/// runs still produce a full report.
pub struct Pipeline {
    knowledge: Arc<dyn KnowledgeBase>,
    completer: Option<Arc<dyn Completer>>,
    top_k: usize,
}

impl Pipeline {
    /// Create a pipeline over the given knowledge base
    pub fn new(knowledge: Arc<dyn KnowledgeBase>) -> Self {
        Self {
            knowledge,
            completer: None,
            top_k: DEFAULT_TOP_K,
        }
    }

    /// Attach a completion service for fix synthesis
    pub fn with_completer(mut self, completer: Arc<dyn Completer>) -> Self {
        self.completer = Some(completer);
        self
    }

    /// Override the number of snippets requested per optimizer query
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Run the full pipeline over the given artifacts
    ///
    /// Always yields a pending report; recording the approval decision
    /// and applying edits for real is the caller's job.
    pub async fn run(&self, input: ArtifactSet) -> Result<Report> {
        let mut state = PipelineState::new(input);

        // validate_layout
        state.layout_issues = find_layout_issues(&state.input.markup, &state.input.style);
        info!(issues = state.layout_issues.len(), "layout validation complete");
        state.advance(Some(format!("{} layout issues", state.layout_issues.len())));

        // heal_content
        let mut content_issues = find_content_issues(&state.input.markup);
        content_issues.extend(find_script_issues(&state.input.script));
        state.content_issues = content_issues;
        info!(issues = state.content_issues.len(), "content check complete");
        state.advance(Some(format!(
            "{} content issues",
            state.content_issues.len()
        )));

        // generate_fixes
        let issues = state.all_issues();
        state.fixes = generate_fixes(&issues, self.completer.as_deref()).await;
        info!(fixes = state.fixes.len(), "fix generation complete");
        state.advance(Some(format!("{} fixes", state.fixes.len())));

        // optimize_code
        state.suggestions = match optimize(
            &state.input,
            &state.fixes,
            self.knowledge.as_ref(),
            self.top_k,
        )
        .await
        {
            Ok(suggestions) => suggestions,
            Err(err) => {
                error!(error = %err, "optimization failed, aborting run");
                state.record_failure(err.to_string());
                return Err(err);
            }
        };
        info!(
            suggestions = state.suggestions.len(),
            "optimization complete"
        );
        state.advance(Some(format!("{} suggestions", state.suggestions.len())));

        // get_approval
        state.changes = approval::stage(
            state.all_issues(),
            state.fixes.clone(),
            state.suggestions.clone(),
        );
        state.advance(Some(format!("{} edits staged", state.changes.edit_count())));

        // process_approval
        let fixed = patch::apply_all(&state.input, &state.changes);
        state.advance(None);
        let changes = std::mem::take(&mut state.changes);
        Ok(Report::new(changes, fixed))
    }
}
