//! Canned fix templates
//!
//! The deterministic floor of fix synthesis: a fixed mapping from
//! issue kind to a literal before/after edit. This is a best-effort
//! pattern substitution, not a code-aware rewriter; the `before`
//! text is a template, not the snippet from the issue location.

use crate::types::{Edit, Issue, IssueKind, TargetKind};

/// The canned edit for an issue kind, if one exists
///
/// Kinds without a repair template (broken links, event checks,
/// z-index findings) produce no edit.
pub fn template_for(kind: IssueKind) -> Option<Edit> {
    match kind {
        IssueKind::Placeholder => Some(Edit::new(
            TargetKind::Markup,
            "Lorem ipsum dolor sit amet",
            "Welcome to our website! This is where you can add your main content.",
            "Replace placeholder text with meaningful content",
        )),
        IssueKind::MissingImage => Some(Edit::new(
            TargetKind::Markup,
            r##"<img src="#" alt="">"##,
            r#"<img src="https://via.placeholder.com/300x200" alt="Sample image">"#,
            "Add proper image source and descriptive alt text",
        )),
        IssueKind::Positioning => Some(Edit::new(
            TargetKind::Style,
            "position: absolute;",
            "position: relative;\nz-index: 1;",
            "Changed to relative positioning to prevent overlap",
        )),
        IssueKind::Responsive => Some(Edit::new(
            TargetKind::Style,
            "width: 300px;",
            "width: 100%;\nmax-width: 300px;",
            "Made width responsive with max-width constraint",
        )),
        IssueKind::SyntaxError => Some(Edit::new(
            TargetKind::Script,
            "function() { console.log('error'",
            "function() { console.log('error'); }",
            "Fixed missing closing bracket and semicolon",
        )),
        IssueKind::PotentialNull => Some(Edit::new(
            TargetKind::Script,
            "if (obj.property)",
            "if (obj && obj.property)",
            "Added null check for obj",
        )),
        IssueKind::BrokenLink | IssueKind::EventCheck | IssueKind::ZIndex => None,
    }
}

/// Map a list of issues through the template table
///
/// One edit per templated issue, in issue order. Issues without a
/// template are skipped silently.
pub fn canned_fixes(issues: &[Issue]) -> Vec<Edit> {
    issues
        .iter()
        .filter_map(|issue| template_for(issue.kind))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_template() {
        let edit = template_for(IssueKind::Placeholder).unwrap();
        assert_eq!(edit.target, TargetKind::Markup);
        assert_eq!(edit.before, "Lorem ipsum dolor sit amet");
        assert!(edit.after.starts_with("Welcome to our website!"));
    }

    #[test]
    fn test_positioning_template_switches_to_relative() {
        let edit = template_for(IssueKind::Positioning).unwrap();
        assert_eq!(edit.target, TargetKind::Style);
        assert!(edit.after.contains("position: relative;"));
    }

    #[test]
    fn test_syntax_error_template_targets_script() {
        let edit = template_for(IssueKind::SyntaxError).unwrap();
        assert_eq!(edit.target, TargetKind::Script);
        assert!(edit.after.ends_with("); }"));
    }

    #[test]
    fn test_untemplated_kinds_produce_nothing() {
        assert!(template_for(IssueKind::BrokenLink).is_none());
        assert!(template_for(IssueKind::EventCheck).is_none());
        assert!(template_for(IssueKind::ZIndex).is_none());
    }

    #[test]
    fn test_every_template_is_applicable() {
        for kind in IssueKind::all() {
            if let Some(edit) = template_for(*kind) {
                assert!(edit.is_applicable(), "{} template", kind);
            }
        }
    }

    #[test]
    fn test_canned_fixes_keep_issue_order() {
        let issues = vec![
            Issue::new(IssueKind::EventCheck, "handler"),
            Issue::new(IssueKind::Placeholder, "lorem"),
            Issue::new(IssueKind::Positioning, "absolute"),
        ];
        let fixes = canned_fixes(&issues);
        assert_eq!(fixes.len(), 2);
        assert_eq!(fixes[0].target, TargetKind::Markup);
        assert_eq!(fixes[1].target, TargetKind::Style);
    }
}
