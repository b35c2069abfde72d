//! Patch application
//!
//! The deterministic heart of the pipeline: edits are exact substring
//! replacements applied in list order against a single artifact body.
//! An edit whose `before` is no longer present is skipped silently;
//! an earlier edit may legitimately have rewritten that text already.

use tracing::debug;

use crate::types::{ArtifactSet, ChangeSet, Edit, FixedArtifacts, TargetKind};

/// Apply accepted edits to one artifact body
///
/// For each edit that targets `target`, is applicable, and whose
/// `before` occurs in the current text, every occurrence of `before`
/// is replaced with `after` before moving to the next edit. The
/// original is never mutated; the fixed body is returned as a new
/// value.
///
/// Applying the same edit list twice is safe: the second pass finds
/// no `before` strings and returns its input unchanged.
pub fn apply<'a>(
    original: &str,
    edits: impl IntoIterator<Item = &'a Edit>,
    target: TargetKind,
) -> String {
    let mut text = original.to_string();

    for edit in edits {
        if edit.target != target {
            continue;
        }
        if !edit.is_applicable() {
            debug!(target_kind = %target, "skipping edit with empty before/after");
            continue;
        }
        if !text.contains(&edit.before) {
            debug!(target_kind = %target, before = %edit.before, "edit no longer matches, skipping");
            continue;
        }
        text = text.replace(&edit.before, &edit.after);
    }

    text
}

/// Apply a change set to every artifact body
///
/// Synthesized fixes run before optimizer suggestions, in the order
/// they were accumulated.
pub fn apply_all(artifacts: &ArtifactSet, changes: &ChangeSet) -> FixedArtifacts {
    FixedArtifacts {
        markup: apply(
            &artifacts.markup,
            changes.edits_in_order(),
            TargetKind::Markup,
        ),
        style: apply(&artifacts.style, changes.edits_in_order(), TargetKind::Style),
        script: apply(
            &artifacts.script,
            changes.edits_in_order(),
            TargetKind::Script,
        ),
    }
}
