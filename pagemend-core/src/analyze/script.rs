//! Script inspector
//!
//! A lexical validator stands in for a full ECMAScript parser: it
//! understands strings, template literals, and comments, and checks
//! that brackets balance. It is a pass/fail oracle with a line
//! number, which is all the pipeline needs from parsing.
//!
//! The null check is a plain token scan. It flags guarded and
//! unguarded uses alike; the noise is intended.

use crate::types::{Issue, IssueKind};

/// A validation failure with the offending line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptError {
    /// 1-based line number
    pub line: usize,
    /// Parser-style message, prefixed with the line
    pub message: String,
}

impl ScriptError {
    fn new(line: usize, detail: impl AsRef<str>) -> Self {
        Self {
            line,
            message: format!("Line {}: {}", line, detail.as_ref()),
        }
    }
}

/// Lexically validate a script body
///
/// Regex literals are not modeled; a `/` is read as division. That
/// can misread pathological scripts but holds for the inputs this
/// pipeline sees.
pub fn validate_script(script: &str) -> Result<(), ScriptError> {
    let mut stack: Vec<(char, usize)> = Vec::new();
    let mut chars = script.chars().peekable();
    let mut line = 1;

    while let Some(c) = chars.next() {
        match c {
            '\n' => line += 1,
            '/' => match chars.peek() {
                Some('/') => {
                    // Line comment
                    for c in chars.by_ref() {
                        if c == '\n' {
                            line += 1;
                            break;
                        }
                    }
                }
                Some('*') => {
                    // Block comment
                    let start = line;
                    chars.next();
                    let mut closed = false;
                    let mut prev = ' ';
                    for c in chars.by_ref() {
                        if c == '\n' {
                            line += 1;
                        }
                        if prev == '*' && c == '/' {
                            closed = true;
                            break;
                        }
                        prev = c;
                    }
                    if !closed {
                        return Err(ScriptError::new(start, "Unterminated comment"));
                    }
                }
                _ => {}
            },
            '\'' | '"' => {
                let start = line;
                let mut terminated = false;
                while let Some(s) = chars.next() {
                    match s {
                        '\\' => {
                            chars.next();
                        }
                        '\n' => {
                            return Err(ScriptError::new(start, "Unterminated string literal"));
                        }
                        _ if s == c => {
                            terminated = true;
                            break;
                        }
                        _ => {}
                    }
                }
                if !terminated {
                    return Err(ScriptError::new(start, "Unterminated string literal"));
                }
            }
            '`' => {
                // Template literals may span lines; interpolation
                // interiors are not re-lexed
                let start = line;
                let mut terminated = false;
                while let Some(s) = chars.next() {
                    match s {
                        '\\' => {
                            chars.next();
                        }
                        '\n' => line += 1,
                        '`' => {
                            terminated = true;
                            break;
                        }
                        _ => {}
                    }
                }
                if !terminated {
                    return Err(ScriptError::new(start, "Unterminated template literal"));
                }
            }
            '(' | '[' | '{' => stack.push((c, line)),
            ')' | ']' | '}' => {
                let expected = match c {
                    ')' => '(',
                    ']' => '[',
                    _ => '{',
                };
                match stack.pop() {
                    Some((open, _)) if open == expected => {}
                    _ => {
                        return Err(ScriptError::new(line, format!("Unexpected token {}", c)));
                    }
                }
            }
            _ => {}
        }
    }

    if let Some((_, open_line)) = stack.pop() {
        return Err(ScriptError::new(open_line, "Unexpected end of input"));
    }

    Ok(())
}

/// Find script issues in the script body
///
/// Empty input produces no issues; a validation failure becomes an
/// issue rather than an error.
pub fn find_script_issues(script: &str) -> Vec<Issue> {
    let mut issues = Vec::new();

    if script.is_empty() {
        return issues;
    }

    if let Err(e) = validate_script(script) {
        issues.push(
            Issue::new(IssueKind::SyntaxError, e.message.clone())
                .with_location(format!("line {}", e.line)),
        );
    }

    if script.contains("null") || script.contains("undefined") {
        issues.push(Issue::new(
            IssueKind::PotentialNull,
            "Potential null/undefined references found",
        ));
    }

    issues
}
