//! Issue finding
//!
//! Three independent inspectors scan the artifact bodies for a fixed
//! catalogue of defect patterns. Inspectors never fail and never
//! deduplicate: overlapping findings from different inspectors are
//! all kept.

mod content;
mod layout;
mod scan;
mod script;

pub use content::find_content_issues;
pub use layout::find_layout_issues;
pub use scan::{line_of_offset, scan_tags, Tag};
pub use script::{find_script_issues, validate_script, ScriptError};

use crate::types::{ArtifactSet, Issue};

/// Run every inspector over the artifact set
///
/// Issues come back in inspector order: layout, then content, then
/// script.
pub fn find_issues(artifacts: &ArtifactSet) -> Vec<Issue> {
    let mut issues = find_layout_issues(&artifacts.markup, &artifacts.style);
    issues.extend(find_content_issues(&artifacts.markup));
    issues.extend(find_script_issues(&artifacts.script));
    issues
}
