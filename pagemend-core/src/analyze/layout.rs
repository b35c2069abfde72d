//! Layout inspector
//!
//! Scans markup inline styles and style-sheet rules for positioning,
//! fixed-width, and z-index hazards. Detection is pattern-based and
//! intentionally coarse: every match becomes an issue, guarded or not.

use regex::Regex;

use super::scan::scan_tags;
use crate::types::{Issue, IssueKind};

const POSITION_PATTERN: &str = r"position:\s*(absolute|relative|fixed)";
const FIXED_WIDTH_PATTERN: &str = r"width:\s*\d+px";

/// One selector/body pair from a style sheet
#[derive(Debug, Clone, PartialEq, Eq)]
struct StyleRule {
    selector: String,
    body: String,
}

/// Split a style sheet into rules
///
/// Block at-rules like `@media` come back as a single rule whose body
/// is the whole block; that is precise enough for substring checks.
fn split_rules(style: &str) -> Vec<StyleRule> {
    let mut rules = Vec::new();
    let mut selector = String::new();
    let mut body = String::new();
    let mut depth = 0usize;

    for c in style.chars() {
        match c {
            '{' => {
                if depth > 0 {
                    body.push(c);
                }
                depth += 1;
            }
            '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    rules.push(StyleRule {
                        selector: selector.trim().to_string(),
                        body: std::mem::take(&mut body),
                    });
                    selector.clear();
                } else {
                    body.push(c);
                }
            }
            _ => {
                if depth == 0 {
                    selector.push(c);
                } else {
                    body.push(c);
                }
            }
        }
    }

    rules
}

/// Find layout issues in the markup and style bodies
///
/// Empty inputs produce no issues for that half; this function never
/// fails.
pub fn find_layout_issues(markup: &str, style: &str) -> Vec<Issue> {
    let mut issues = Vec::new();

    if !markup.is_empty() {
        let tags = scan_tags(markup);

        if let Ok(position_re) = Regex::new(POSITION_PATTERN) {
            for tag in &tags {
                let Some(inline) = tag.attribute("style") else {
                    continue;
                };
                if position_re.is_match(inline) {
                    issues.push(
                        Issue::new(
                            IssueKind::Positioning,
                            format!("Potential overlap with positioned element: {}", tag.name),
                        )
                        .with_location(format!("line {}", tag.line)),
                    );
                }
            }
        }

        if let Ok(width_re) = Regex::new(FIXED_WIDTH_PATTERN) {
            for tag in &tags {
                let Some(inline) = tag.attribute("style") else {
                    continue;
                };
                if width_re.is_match(inline) {
                    issues.push(
                        Issue::new(IssueKind::Responsive, "Fixed width may cause responsive issues")
                            .with_location(format!("line {}", tag.line)),
                    );
                }
            }
        }
    }

    if !style.is_empty() {
        let rules = split_rules(style);
        let position_re = Regex::new(POSITION_PATTERN);
        let width_re = Regex::new(FIXED_WIDTH_PATTERN);

        for rule in &rules {
            if let Ok(ref re) = position_re {
                if re.is_match(&rule.body) {
                    issues.push(
                        Issue::new(
                            IssueKind::Positioning,
                            "Absolute positioning may cause overlap issues",
                        )
                        .with_location(rule.selector.clone()),
                    );
                }
            }

            if let Ok(ref re) = width_re {
                if re.is_match(&rule.body) {
                    issues.push(
                        Issue::new(IssueKind::Responsive, "Fixed width may cause responsive issues")
                            .with_location(rule.selector.clone()),
                    );
                }
            }

            if rule.body.contains("z-index") {
                issues.push(
                    Issue::new(IssueKind::ZIndex, "Potential z-index stacking context issue")
                        .with_location(rule.selector.clone()),
                );
            }
        }
    }

    issues
}
