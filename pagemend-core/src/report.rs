//! Final structured output of a pipeline run
//!
//! The report is what both the HTTP handler and the CLI hand to the
//! approver: the pending change set flattened into a wire-friendly
//! shape, plus a preview of the fixed artifact bodies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::approval::{build_dashboard, build_diff_views, Dashboard, DiffView};
use crate::types::{ApprovalStatus, ChangeSet, Edit, FixedArtifacts, Issue, Suggestion};

/// Everything one run proposes, in the shape consumers expect
///
/// The fixed bodies are a preview. Patch application is deterministic,
/// so applying the same edits after acceptance yields exactly these
/// strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Approval state of the run's change set
    pub status: ApprovalStatus,
    /// Human-readable status line
    pub message: String,
    /// Changes grouped by impact tier
    pub dashboard: Dashboard,
    /// One before/after view per proposed edit
    pub diff_views: Vec<DiffView>,
    /// All issues found by the analyzers
    pub issues: Vec<Issue>,
    /// Edits synthesized from the issues
    pub fixes: Vec<Edit>,
    /// Best-practice suggestions from the optimizer
    pub optimizations: Vec<Suggestion>,
    /// Fixed artifact bodies, flattened to html_fixed/css_fixed/js_fixed
    #[serde(flatten)]
    pub fixed: FixedArtifacts,
    /// When the run finished
    pub generated_at: DateTime<Utc>,
}

impl Report {
    /// Assemble a report from a staged change set and the patched bodies
    pub fn new(changes: ChangeSet, fixed: FixedArtifacts) -> Self {
        let dashboard = build_dashboard(&changes);
        let diff_views = build_diff_views(&changes);
        Self {
            status: changes.status,
            message: message_for(changes.status).to_string(),
            dashboard,
            diff_views,
            issues: changes.issues,
            fixes: changes.fixes,
            optimizations: changes.suggestions,
            fixed,
            generated_at: Utc::now(),
        }
    }

    /// Whether the change set still awaits a decision
    pub fn is_pending(&self) -> bool {
        self.status == ApprovalStatus::Pending
    }

    /// Record the approval decision, keeping the message in step
    pub fn set_status(&mut self, status: ApprovalStatus) {
        self.status = status;
        self.message = message_for(status).to_string();
    }
}

/// Status line shown to the approver for each approval state
pub fn message_for(status: ApprovalStatus) -> &'static str {
    match status {
        ApprovalStatus::Pending => "Changes require user approval",
        ApprovalStatus::Accepted => "Changes approved and applied",
        ApprovalStatus::Rejected => "Changes rejected, nothing applied",
    }
}
