//! Fix synthesis
//!
//! Turns analyzer issues into proposed edits. A completion service,
//! when configured, enriches the result; its reply is recovered
//! through the parse tiers in `parse`. Whatever happens, synthesis
//! degrades to the canned templates rather than failing.

mod parse;
mod templates;

pub use parse::{parse_structured, scrape_text};
pub use templates::{canned_fixes, template_for};

use tracing::{debug, warn};

use crate::completer::Completer;
use crate::prompts;
use crate::types::{Edit, Issue};

/// Synthesize edits for the given issues
///
/// With a completer the reply replaces the canned result outright,
/// even when it parses to an empty list; a degraded or unreachable
/// service falls back to the templates. This stage never fails.
pub async fn generate_fixes(issues: &[Issue], completer: Option<&dyn Completer>) -> Vec<Edit> {
    let Some(completer) = completer else {
        debug!("no completion service configured, using canned fixes");
        return canned_fixes(issues);
    };

    let prompt = prompts::fix_generation_prompt(issues);
    let reply = match completer.complete(&prompt).await {
        Ok(reply) => reply,
        Err(e) => {
            warn!(error = %e, "fix generation call failed, using canned fixes");
            return canned_fixes(issues);
        }
    };

    match parse_structured(&reply) {
        Ok(edits) => {
            debug!(count = edits.len(), "parsed structured fixes from reply");
            edits
        }
        Err(e) => {
            debug!(error = %e, "structured parse failed, scraping reply text");
            let scraped = scrape_text(&reply);
            if scraped.is_empty() {
                debug!("scrape recovered nothing, using canned fixes");
                canned_fixes(issues)
            } else {
                debug!(count = scraped.len(), "recovered fixes from reply text");
                scraped
            }
        }
    }
}
