//! Prompt templates
//!
//! This module provides the embedded prompt template for fix
//! generation. Templates use `{{VARIABLE}}` placeholders that can be
//! rendered with context.

use std::collections::HashMap;

use crate::types::Issue;

/// Embedded fix-generation prompt template
const FIX_GENERATION_PROMPT: &str = include_str!("prompts/fix_generation.md");

/// Get the raw fix-generation template
pub fn fix_generation_template() -> &'static str {
    FIX_GENERATION_PROMPT
}

/// Context for rendering a prompt template
#[derive(Debug, Clone, Default)]
pub struct PromptContext {
    /// Variable substitutions
    variables: HashMap<String, String>,
}

impl PromptContext {
    /// Create a new empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a variable value
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.variables.insert(key.into(), value.into());
        self
    }

    /// Set a variable value (builder pattern)
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// Set the layout issue listing
    pub fn with_layout_issues(self, issues: &[&Issue]) -> Self {
        self.with("LAYOUT_ISSUES", format_issues(issues))
    }

    /// Set the content issue listing
    pub fn with_content_issues(self, issues: &[&Issue]) -> Self {
        self.with("CONTENT_ISSUES", format_issues(issues))
    }
}

/// Format issues as a bulleted listing for prompt interpolation
fn format_issues(issues: &[&Issue]) -> String {
    if issues.is_empty() {
        return "(none)".to_string();
    }
    issues
        .iter()
        .map(|issue| match &issue.location {
            Some(location) => format!("- {} ({}): {}", issue.kind, location, issue.description),
            None => format!("- {}: {}", issue.kind, issue.description),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Build the fix-generation prompt for a set of issues
pub fn fix_generation_prompt(issues: &[Issue]) -> String {
    let (layout, content): (Vec<&Issue>, Vec<&Issue>) =
        issues.iter().partition(|issue| issue.kind.is_layout());

    let context = PromptContext::new()
        .with_layout_issues(&layout)
        .with_content_issues(&content);

    render_template(FIX_GENERATION_PROMPT, &context)
}

/// Render a template string with variable substitution
pub fn render_template(template: &str, context: &PromptContext) -> String {
    let mut result = template.to_string();

    for (key, value) in &context.variables {
        let placeholder = format!("{{{{{}}}}}", key);
        result = result.replace(&placeholder, value);
    }

    // Remove any remaining unset placeholders (simple pattern matching)
    // Replace {{UPPERCASE_NAME}} with "(not specified)"
    loop {
        let start = result.find("{{");
        let end = result.find("}}");

        match (start, end) {
            (Some(s), Some(e)) if s < e => {
                let placeholder = &result[s..=e + 1];
                // Check if it's an uppercase placeholder
                let inside = &result[s + 2..e];
                if inside.chars().all(|c| c.is_ascii_uppercase() || c == '_') {
                    result = result.replacen(placeholder, "(not specified)", 1);
                } else {
                    break;
                }
            }
            _ => break,
        }
    }

    result
}
