//! Completion-reply parsing
//!
//! Replies carry no schema guarantee, so recovery runs in tiers: a
//! strict JSON pass first, then a line-scraping pass over free text.
//! The synthesis stage falls back to canned templates when both
//! yield nothing.

use serde::Deserialize;

use crate::types::{Edit, TargetKind};
use crate::{Error, Result};

/// Wire shape of one fix entry in a structured reply
#[derive(Debug, Deserialize)]
struct WireFix {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    before: String,
    #[serde(default)]
    after: String,
    #[serde(default)]
    explanation: String,
}

/// Wire shape of a structured reply
#[derive(Debug, Deserialize)]
struct WireReply {
    fixes: Vec<WireFix>,
}

/// Map a fix-type marker to its target
fn target_for_marker(marker: &str) -> Option<TargetKind> {
    match marker {
        "html_fix" => Some(TargetKind::Markup),
        "css_fix" => Some(TargetKind::Style),
        "js_fix" => Some(TargetKind::Script),
        _ => None,
    }
}

/// Strict tier: extract and parse the JSON object in a reply
///
/// The object may be wrapped in prose; everything between the first
/// `{` and the last `}` is taken as the candidate document. Entries
/// with an unrecognized type are dropped silently, so a well-formed
/// reply can legitimately produce an empty list.
pub fn parse_structured(reply: &str) -> Result<Vec<Edit>> {
    let (Some(start), Some(end)) = (reply.find('{'), reply.rfind('}')) else {
        return Err(Error::Other("reply contains no JSON object".to_string()));
    };
    if end < start {
        return Err(Error::Other("reply contains no JSON object".to_string()));
    }

    let wire: WireReply = serde_json::from_str(&reply[start..=end])?;

    Ok(wire
        .fixes
        .into_iter()
        .filter_map(|fix| {
            let target = target_for_marker(&fix.kind)?;
            Some(Edit::new(target, fix.before, fix.after, fix.explanation))
        })
        .collect())
}

#[derive(Debug, Default)]
struct PartialFix {
    target: TargetKind,
    before: Option<String>,
    after: Option<String>,
    explanation: Option<String>,
}

impl PartialFix {
    fn has_content(&self) -> bool {
        self.before.is_some() || self.after.is_some() || self.explanation.is_some()
    }

    fn into_edit(self) -> Edit {
        Edit::new(
            self.target,
            self.before.unwrap_or_default(),
            self.after.unwrap_or_default(),
            self.explanation.unwrap_or_default(),
        )
    }
}

/// Slice out what follows a marker, matched case-insensitively
fn after_marker<'a>(line: &'a str, lowered: &str, marker: &str) -> Option<&'a str> {
    let idx = lowered.find(marker)?;
    Some(line[idx + marker.len()..].trim())
}

/// Scraping tier: recover fixes from free text
///
/// Scans line by line for fix-type markers and before/after/
/// explanation prefixes. Field lines before the first marker are
/// discarded; a trailing entry is only kept when it carries more
/// than its marker. Entries may come back with empty before/after
/// fields, which patch application treats as no-ops.
pub fn scrape_text(reply: &str) -> Vec<Edit> {
    let mut edits = Vec::new();
    let mut current: Option<PartialFix> = None;

    for line in reply.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        // ASCII lowering keeps byte offsets aligned with the original
        let lowered = line.to_ascii_lowercase();

        let marker = if lowered.contains("html_fix") || lowered.contains("html fix") {
            Some(TargetKind::Markup)
        } else if lowered.contains("css_fix") || lowered.contains("css fix") {
            Some(TargetKind::Style)
        } else if lowered.contains("js_fix") || lowered.contains("javascript fix") {
            Some(TargetKind::Script)
        } else {
            None
        };

        if let Some(target) = marker {
            if let Some(previous) = current.take() {
                edits.push(previous.into_edit());
            }
            current = Some(PartialFix {
                target,
                ..Default::default()
            });
            continue;
        }

        let Some(fix) = current.as_mut() else {
            continue;
        };
        if let Some(value) = after_marker(line, &lowered, "before:") {
            fix.before = Some(value.to_string());
        } else if let Some(value) = after_marker(line, &lowered, "after:") {
            fix.after = Some(value.to_string());
        } else if let Some(value) = after_marker(line, &lowered, "explanation:") {
            fix.explanation = Some(value.to_string());
        }
    }

    if let Some(last) = current {
        if last.has_content() {
            edits.push(last.into_edit());
        }
    }

    edits
}
