//! Approval staging for proposed changes
//!
//! This module assembles everything a human approver needs to decide on a
//! run's output: a dashboard summarizing changes by impact tier, a diff
//! view per proposed edit, and the pending change set itself. No approval
//! logic lives here. The external approver supplies the accept/reject
//! decision out of band and the pipeline never blocks on it.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::{ChangeSet, Edit, Impact, Issue, Suggestion, TargetKind};

/// One dashboard row summarizing a proposed change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSummary {
    /// Which artifact body the change touches
    #[serde(rename = "type")]
    pub target: TargetKind,
    /// Why the change is proposed
    pub description: String,
    /// Fixed impact tier for this change's origin
    pub impact: Impact,
}

/// Review dashboard grouping proposed changes by impact tier
///
/// Tier assignment is fixed, not computed: style fixes are layout
/// changes (medium), markup and script fixes are content changes (low),
/// and optimizer suggestions are always high.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dashboard {
    /// Style-level fixes, medium impact
    pub layout_changes: Vec<ChangeSummary>,
    /// Markup and script fixes, low impact
    pub content_changes: Vec<ChangeSummary>,
    /// Best-practice suggestions, high impact
    pub optimizations: Vec<ChangeSummary>,
}

impl Dashboard {
    /// Total number of summarized changes across all tiers
    pub fn total(&self) -> usize {
        self.layout_changes.len() + self.content_changes.len() + self.optimizations.len()
    }

    /// Whether the dashboard has no changes at all
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// A side-by-side view of one proposed edit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffView {
    /// Which artifact body the edit applies to
    #[serde(rename = "type")]
    pub target: TargetKind,
    /// Text as it stands
    pub before: String,
    /// Text as proposed
    pub after: String,
    /// Why the change is proposed
    pub explanation: String,
}

impl DiffView {
    fn from_edit(edit: &Edit) -> Self {
        Self {
            target: edit.target,
            before: edit.before.clone(),
            after: edit.after.clone(),
            explanation: edit.explanation.clone(),
        }
    }
}

/// Bundle a run's findings into a pending change set
///
/// Always yields `ApprovalStatus::Pending`; moving to a terminal state
/// is the approver's job, recorded via [`ChangeSet::decide`].
pub fn stage(issues: Vec<Issue>, fixes: Vec<Edit>, suggestions: Vec<Suggestion>) -> ChangeSet {
    debug!(
        issues = issues.len(),
        fixes = fixes.len(),
        suggestions = suggestions.len(),
        "staging change set for approval"
    );
    ChangeSet::new(issues, fixes, suggestions)
}

/// Build the review dashboard for a change set
pub fn build_dashboard(changes: &ChangeSet) -> Dashboard {
    let mut dashboard = Dashboard::default();

    for fix in &changes.fixes {
        let summary = ChangeSummary {
            target: fix.target,
            description: fix.explanation.clone(),
            impact: impact_for_fix(fix.target),
        };
        match fix.target {
            TargetKind::Style => dashboard.layout_changes.push(summary),
            TargetKind::Markup | TargetKind::Script => dashboard.content_changes.push(summary),
        }
    }

    for suggestion in &changes.suggestions {
        dashboard.optimizations.push(ChangeSummary {
            target: suggestion.category,
            description: suggestion.citation.clone(),
            impact: Impact::High,
        });
    }

    dashboard
}

/// Build one diff view per proposed edit, in apply order
pub fn build_diff_views(changes: &ChangeSet) -> Vec<DiffView> {
    changes.edits_in_order().map(DiffView::from_edit).collect()
}

/// Fixed impact tier for a synthesized fix
fn impact_for_fix(target: TargetKind) -> Impact {
    match target {
        TargetKind::Style => Impact::Medium,
        TargetKind::Markup | TargetKind::Script => Impact::Low,
    }
}

/// Render the dashboard and diff views as a terminal-friendly summary
pub fn render_summary(dashboard: &Dashboard, diff_views: &[DiffView]) -> String {
    let mut out = String::new();

    out.push_str("Proposed changes\n");
    out.push_str("================\n\n");

    if dashboard.is_empty() {
        out.push_str("No changes proposed.\n");
        return out;
    }

    render_tier(
        &mut out,
        "Layout changes",
        Impact::Medium,
        &dashboard.layout_changes,
    );
    render_tier(
        &mut out,
        "Content changes",
        Impact::Low,
        &dashboard.content_changes,
    );
    render_tier(
        &mut out,
        "Optimization suggestions",
        Impact::High,
        &dashboard.optimizations,
    );

    if !diff_views.is_empty() {
        out.push_str("Diff views\n");
        out.push_str("----------\n\n");
        for (index, view) in diff_views.iter().enumerate() {
            out.push_str(&format!("{}. [{}] {}\n", index + 1, view.target, view.explanation));
            out.push_str("   before:\n");
            out.push_str(&indent(&view.before, "     "));
            out.push_str("   after:\n");
            out.push_str(&indent(&view.after, "     "));
            out.push('\n');
        }
    }

    out
}

fn render_tier(out: &mut String, label: &str, impact: Impact, rows: &[ChangeSummary]) {
    out.push_str(&format!("{} ({} impact): {}\n", label, impact, rows.len()));
    for row in rows {
        out.push_str(&format!("  - [{}] {}\n", row.target, row.description));
    }
    out.push('\n');
}

fn indent(text: &str, pad: &str) -> String {
    let mut out = String::new();
    for line in text.lines() {
        out.push_str(pad);
        out.push_str(line);
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ApprovalStatus;

    fn style_fix() -> Edit {
        Edit::new(
            TargetKind::Style,
            "position: absolute;",
            "position: relative;\nz-index: 1;",
            "Changed absolute positioning to relative to prevent overlap",
        )
    }

    fn markup_fix() -> Edit {
        Edit::new(
            TargetKind::Markup,
            "Lorem ipsum dolor sit amet",
            "Welcome to our website!",
            "Replace placeholder text with meaningful content",
        )
    }

    fn script_fix() -> Edit {
        Edit::new(
            TargetKind::Script,
            "if (obj.property)",
            "if (obj && obj.property)",
            "Added null check to prevent runtime errors",
        )
    }

    fn css_suggestion() -> Suggestion {
        Suggestion::new(
            Edit::new(
                TargetKind::Style,
                "/* Original CSS */",
                "/* Optimized CSS following best practice */",
                "Applied CSS best practice",
            ),
            TargetKind::Style,
            "CSS optimization best practices: prefer relative units",
        )
    }

    #[test]
    fn test_stage_is_pending() {
        let changes = stage(vec![], vec![style_fix()], vec![css_suggestion()]);
        assert_eq!(changes.status, ApprovalStatus::Pending);
        assert_eq!(changes.fixes.len(), 1);
        assert_eq!(changes.suggestions.len(), 1);
    }

    #[test]
    fn test_dashboard_tier_assignment() {
        let changes = stage(
            vec![],
            vec![style_fix(), markup_fix(), script_fix()],
            vec![css_suggestion()],
        );
        let dashboard = build_dashboard(&changes);

        assert_eq!(dashboard.layout_changes.len(), 1);
        assert_eq!(dashboard.layout_changes[0].impact, Impact::Medium);
        assert_eq!(dashboard.layout_changes[0].target, TargetKind::Style);

        assert_eq!(dashboard.content_changes.len(), 2);
        assert!(dashboard
            .content_changes
            .iter()
            .all(|row| row.impact == Impact::Low));

        assert_eq!(dashboard.optimizations.len(), 1);
        assert_eq!(dashboard.optimizations[0].impact, Impact::High);
    }

    #[test]
    fn test_dashboard_descriptions_from_explanations() {
        let changes = stage(vec![], vec![markup_fix()], vec![css_suggestion()]);
        let dashboard = build_dashboard(&changes);

        assert_eq!(
            dashboard.content_changes[0].description,
            "Replace placeholder text with meaningful content"
        );
        // Optimization rows carry the backing snippet, not the edit text.
        assert!(dashboard.optimizations[0]
            .description
            .contains("best practices"));
    }

    #[test]
    fn test_dashboard_empty() {
        let dashboard = build_dashboard(&ChangeSet::default());
        assert!(dashboard.is_empty());
        assert_eq!(dashboard.total(), 0);
    }

    #[test]
    fn test_diff_views_in_apply_order() {
        let changes = stage(vec![], vec![markup_fix(), style_fix()], vec![css_suggestion()]);
        let views = build_diff_views(&changes);

        assert_eq!(views.len(), 3);
        assert_eq!(views[0].target, TargetKind::Markup);
        assert_eq!(views[1].target, TargetKind::Style);
        // Suggestions come after all synthesized fixes.
        assert_eq!(views[2].before, "/* Original CSS */");
    }

    #[test]
    fn test_diff_view_carries_edit_fields() {
        let changes = stage(vec![], vec![style_fix()], vec![]);
        let views = build_diff_views(&changes);

        assert_eq!(views[0].before, "position: absolute;");
        assert!(views[0].after.contains("position: relative;"));
        assert!(views[0].explanation.contains("overlap"));
    }

    #[test]
    fn test_render_summary_groups_by_tier() {
        let changes = stage(
            vec![],
            vec![style_fix(), markup_fix()],
            vec![css_suggestion()],
        );
        let dashboard = build_dashboard(&changes);
        let views = build_diff_views(&changes);
        let summary = render_summary(&dashboard, &views);

        assert!(summary.contains("Layout changes (medium impact): 1"));
        assert!(summary.contains("Content changes (low impact): 1"));
        assert!(summary.contains("Optimization suggestions (high impact): 1"));
    }

    #[test]
    fn test_render_summary_numbers_diff_entries() {
        let changes = stage(vec![], vec![style_fix(), markup_fix()], vec![]);
        let dashboard = build_dashboard(&changes);
        let views = build_diff_views(&changes);
        let summary = render_summary(&dashboard, &views);

        assert!(summary.contains("1. [style]"));
        assert!(summary.contains("2. [markup]"));
        assert!(summary.contains("   before:\n"));
        assert!(summary.contains("     position: absolute;"));
    }

    #[test]
    fn test_render_summary_no_changes() {
        let summary = render_summary(&Dashboard::default(), &[]);
        assert!(summary.contains("No changes proposed."));
    }

    #[test]
    fn test_dashboard_serializes_wire_shape() {
        let changes = stage(vec![], vec![style_fix()], vec![]);
        let dashboard = build_dashboard(&changes);
        let json = serde_json::to_value(&dashboard).unwrap();

        let row = &json["layout_changes"][0];
        assert_eq!(row["type"], "style");
        assert_eq!(row["impact"], "medium");
        assert!(row["description"].is_string());
    }

    #[test]
    fn test_diff_view_serializes_wire_shape() {
        let changes = stage(vec![], vec![markup_fix()], vec![]);
        let views = build_diff_views(&changes);
        let json = serde_json::to_value(&views).unwrap();

        assert_eq!(json[0]["type"], "markup");
        assert_eq!(json[0]["before"], "Lorem ipsum dolor sit amet");
        assert!(json[0]["explanation"].is_string());
    }
}
