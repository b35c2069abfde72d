//! Content inspector
//!
//! Scans the markup for placeholder text, dead image sources, broken
//! links, and inline event handlers. Event handlers are reported as
//! informational issues, not defects.

use regex::Regex;

use super::scan::{line_of_offset, scan_tags};
use crate::types::{Issue, IssueKind};

const LOREM_PATTERN: &str = r"(?i)lorem ipsum";

/// Find content issues in the markup body
///
/// Empty markup produces no issues; this function never fails.
pub fn find_content_issues(markup: &str) -> Vec<Issue> {
    let mut issues = Vec::new();

    if markup.is_empty() {
        return issues;
    }

    if let Ok(lorem_re) = Regex::new(LOREM_PATTERN) {
        for m in lorem_re.find_iter(markup) {
            issues.push(
                Issue::new(IssueKind::Placeholder, "Lorem ipsum placeholder text found")
                    .with_location(format!("line {}", line_of_offset(markup, m.start()))),
            );
        }
    }

    for tag in scan_tags(markup) {
        match tag.name.as_str() {
            "img" => {
                let src = tag.attribute("src");
                if src.is_none_or(|s| s.is_empty() || s.starts_with('#')) {
                    issues.push(
                        Issue::new(IssueKind::MissingImage, "Missing or invalid image source")
                            .with_location(format!("line {}", tag.line)),
                    );
                }
            }
            "a" => {
                let href = tag.attribute("href");
                if href.is_none_or(|h| {
                    h.is_empty() || h == "#" || h.starts_with("javascript:void(0)")
                }) {
                    issues.push(
                        Issue::new(IssueKind::BrokenLink, "Empty or JavaScript void link found")
                            .with_location(format!("line {}", tag.line)),
                    );
                }
            }
            _ => {}
        }

        if tag.has_event_handler() {
            issues.push(
                Issue::new(
                    IssueKind::EventCheck,
                    format!("Event handler found on {}, verify functionality", tag.name),
                )
                .with_location(format!("line {}", tag.line)),
            );
        }
    }

    issues
}
