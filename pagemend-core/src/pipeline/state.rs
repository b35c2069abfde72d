//! Accumulated state for one pipeline run
//!
//! Each stage reads the accumulated state and appends its own field; no
//! stage mutates another stage's output. The state is owned by the
//! runner and never aliased.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::stage::PipelineStage;
use crate::types::{ArtifactSet, ChangeSet, Edit, Issue, Suggestion};

/// A recorded stage transition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageTransition {
    pub from: PipelineStage,
    pub to: PipelineStage,
    pub success: bool,
    pub message: Option<String>,
    pub at: DateTime<Utc>,
}

/// State threaded through the pipeline stages
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineState {
    /// Current stage
    pub stage: PipelineStage,
    /// The original artifact bodies under analysis
    pub input: ArtifactSet,
    /// Output of validate_layout
    pub layout_issues: Vec<Issue>,
    /// Output of heal_content (content and script issues)
    pub content_issues: Vec<Issue>,
    /// Output of generate_fixes
    pub fixes: Vec<Edit>,
    /// Output of optimize_code
    pub suggestions: Vec<Suggestion>,
    /// Output of get_approval
    pub changes: ChangeSet,
    /// Stage transition history
    pub history: Vec<StageTransition>,
}

impl PipelineState {
    /// Create a fresh state for the given input
    pub fn new(input: ArtifactSet) -> Self {
        Self {
            input,
            ..Self::default()
        }
    }

    /// Advance to the next stage, recording the transition
    ///
    /// Returns None from the terminal stage.
    pub fn advance(&mut self, message: Option<String>) -> Option<PipelineStage> {
        let from = self.stage;
        let to = from.next()?;

        tracing::info!(from = from.name(), to = to.name(), "pipeline stage transition");

        self.history.push(StageTransition {
            from,
            to,
            success: true,
            message,
            at: Utc::now(),
        });
        self.stage = to;
        Some(to)
    }

    /// Record a failed transition without leaving the current stage
    pub fn record_failure(&mut self, message: impl Into<String>) {
        self.history.push(StageTransition {
            from: self.stage,
            to: self.stage,
            success: false,
            message: Some(message.into()),
            at: Utc::now(),
        });
    }

    /// All issues found so far, layout first
    pub fn all_issues(&self) -> Vec<Issue> {
        let mut issues = self.layout_issues.clone();
        issues.extend(self.content_issues.iter().cloned());
        issues
    }

    /// Check if the run reached the terminal stage
    pub fn is_complete(&self) -> bool {
        self.stage.is_terminal()
    }
}
