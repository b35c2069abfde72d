//! Lightweight markup tag scanner
//!
//! The inspectors only need tag names, attributes, and line numbers,
//! so a full DOM parse is avoided. Comments, doctypes, processing
//! instructions, and closing tags are skipped.

/// One opening tag found in the markup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    /// Lowercased tag name
    pub name: String,
    /// Attribute name/value pairs; bare attributes carry an empty value
    pub attributes: Vec<(String, String)>,
    /// 1-based line of the opening `<`
    pub line: usize,
}

impl Tag {
    /// Look up an attribute value by name, case-insensitively
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(attr, _)| attr.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Whether any attribute name starts with `on`
    pub fn has_event_handler(&self) -> bool {
        self.attributes
            .iter()
            .any(|(attr, _)| attr.to_ascii_lowercase().starts_with("on"))
    }
}

/// 1-based line number of a byte offset in the text
pub fn line_of_offset(text: &str, offset: usize) -> usize {
    text[..offset.min(text.len())]
        .bytes()
        .filter(|&b| b == b'\n')
        .count()
        + 1
}

/// Scan markup for opening tags
pub fn scan_tags(markup: &str) -> Vec<Tag> {
    let chars: Vec<char> = markup.chars().collect();
    let mut tags = Vec::new();
    let mut line = 1;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c == '\n' {
            line += 1;
            i += 1;
            continue;
        }
        if c != '<' {
            i += 1;
            continue;
        }

        // Comment: skip to -->
        if chars[i..].starts_with(&['<', '!', '-', '-']) {
            i += 4;
            while i < chars.len() && !chars[i..].starts_with(&['-', '-', '>']) {
                if chars[i] == '\n' {
                    line += 1;
                }
                i += 1;
            }
            i = (i + 3).min(chars.len());
            continue;
        }

        // Doctype, processing instruction, or closing tag: skip to >
        let next = chars.get(i + 1).copied();
        if matches!(next, Some('!') | Some('?') | Some('/')) {
            while i < chars.len() && chars[i] != '>' {
                if chars[i] == '\n' {
                    line += 1;
                }
                i += 1;
            }
            i += 1;
            continue;
        }

        // Not a tag start after all
        if !next.is_some_and(|c| c.is_ascii_alphabetic()) {
            i += 1;
            continue;
        }

        let tag_line = line;
        i += 1;
        let mut name = String::new();
        while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '-') {
            name.push(chars[i].to_ascii_lowercase());
            i += 1;
        }

        let mut attributes = Vec::new();
        loop {
            // Skip whitespace and the self-closing slash
            while i < chars.len() && (chars[i].is_whitespace() || chars[i] == '/') {
                if chars[i] == '\n' {
                    line += 1;
                }
                i += 1;
            }
            if i >= chars.len() || chars[i] == '>' {
                i += 1;
                break;
            }

            let mut attr_name = String::new();
            while i < chars.len()
                && !chars[i].is_whitespace()
                && chars[i] != '='
                && chars[i] != '>'
                && chars[i] != '/'
            {
                attr_name.push(chars[i].to_ascii_lowercase());
                i += 1;
            }

            // Skip whitespace around a possible =
            while i < chars.len() && chars[i].is_whitespace() {
                if chars[i] == '\n' {
                    line += 1;
                }
                i += 1;
            }

            let mut value = String::new();
            if i < chars.len() && chars[i] == '=' {
                i += 1;
                while i < chars.len() && chars[i].is_whitespace() {
                    if chars[i] == '\n' {
                        line += 1;
                    }
                    i += 1;
                }
                if i < chars.len() && (chars[i] == '"' || chars[i] == '\'') {
                    let quote = chars[i];
                    i += 1;
                    while i < chars.len() && chars[i] != quote {
                        if chars[i] == '\n' {
                            line += 1;
                        }
                        value.push(chars[i]);
                        i += 1;
                    }
                    i += 1;
                } else {
                    while i < chars.len()
                        && !chars[i].is_whitespace()
                        && chars[i] != '>'
                        && chars[i] != '/'
                    {
                        value.push(chars[i]);
                        i += 1;
                    }
                }
            }

            if !attr_name.is_empty() {
                attributes.push((attr_name, value));
            }
        }

        if !name.is_empty() {
            tags.push(Tag {
                name,
                attributes,
                line: tag_line,
            });
        }
    }

    tags
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_simple_tag() {
        let tags = scan_tags(r##"<img src="#" alt="">"##);
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].name, "img");
        assert_eq!(tags[0].attribute("src"), Some("#"));
        assert_eq!(tags[0].attribute("alt"), Some(""));
        assert_eq!(tags[0].line, 1);
    }

    #[test]
    fn test_scan_skips_closing_tags_and_comments() {
        let markup = "<!-- <img src=\"x\"> -->\n<div>text</div>";
        let tags = scan_tags(markup);
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].name, "div");
        assert_eq!(tags[0].line, 2);
    }

    #[test]
    fn test_scan_tracks_lines() {
        let markup = "<html>\n<body>\n  <a href=\"#\">x</a>\n</body>\n</html>";
        let tags = scan_tags(markup);
        let anchor = tags.iter().find(|t| t.name == "a").unwrap();
        assert_eq!(anchor.line, 3);
    }

    #[test]
    fn test_scan_bare_and_unquoted_attributes() {
        let tags = scan_tags("<input disabled type=text>");
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].attribute("disabled"), Some(""));
        assert_eq!(tags[0].attribute("type"), Some("text"));
    }

    #[test]
    fn test_event_handler_detection() {
        let tags = scan_tags(r#"<button onclick="handleClick()">Click me</button>"#);
        assert!(tags[0].has_event_handler());

        let tags = scan_tags(r#"<button class="big">Click me</button>"#);
        assert!(!tags[0].has_event_handler());
    }

    #[test]
    fn test_attribute_lookup_is_case_insensitive() {
        let tags = scan_tags(r#"<IMG SRC="pic.png">"#);
        assert_eq!(tags[0].name, "img");
        assert_eq!(tags[0].attribute("src"), Some("pic.png"));
    }

    #[test]
    fn test_line_of_offset() {
        let text = "a\nbb\nccc";
        assert_eq!(line_of_offset(text, 0), 1);
        assert_eq!(line_of_offset(text, 2), 2);
        assert_eq!(line_of_offset(text, 5), 3);
    }

    #[test]
    fn test_scan_empty_markup() {
        assert!(scan_tags("").is_empty());
    }
}
