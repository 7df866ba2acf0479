//! Placeholder parser for `{{variable}}` syntax.
//!
//! Scans strings for placeholder references and reports their byte spans so
//! the engine can splice replacements without re-scanning.

use std::ops::Range;

/// A parsed `{{name}}` placeholder in a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    /// The variable name, with surrounding whitespace trimmed.
    pub name: String,
    /// Byte range of the full `{{...}}` token in the original string.
    pub span: Range<usize>,
}

impl Placeholder {
    /// Creates a placeholder reference.
    #[must_use]
    pub fn new(name: impl Into<String>, span: Range<usize>) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }
}

/// Extracts every `{{name}}` placeholder from the input, in order.
///
/// Names are whitespace-tolerant: `{{ key }}` parses as `key`. Empty or
/// whitespace-only braces are not placeholders, and an unclosed `{{` ends
/// the scan.
#[must_use]
pub fn parse_placeholders(input: &str) -> Vec<Placeholder> {
    let mut placeholders = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some((i, ch)) = chars.next() {
        if ch != '{' {
            continue;
        }
        let Some(&(_, '{')) = chars.peek() else {
            continue;
        };
        chars.next();

        let start = i;
        let mut name = String::new();
        let mut closed = false;

        while let Some((_, ch)) = chars.next() {
            if ch == '}'
                && let Some(&(end_idx, '}')) = chars.peek()
            {
                chars.next();
                let trimmed = name.trim();
                if !trimmed.is_empty() {
                    placeholders.push(Placeholder::new(trimmed, start..end_idx + 1));
                }
                closed = true;
                break;
            }
            name.push(ch);
        }

        if !closed {
            break;
        }
    }

    placeholders
}

/// Returns true when the input contains anything that could be a placeholder.
#[must_use]
pub fn has_placeholders(input: &str) -> bool {
    input.contains("{{") && input.contains("}}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_single_placeholder() {
        let refs = parse_placeholders("{{name}}");
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].name, "name");
        assert_eq!(refs[0].span, 0..8);
    }

    #[test]
    fn test_parse_with_whitespace() {
        let refs = parse_placeholders("{{  baseUrl }}");
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].name, "baseUrl");
    }

    #[test]
    fn test_parse_multiple_in_url() {
        let refs = parse_placeholders("https://{{host}}:{{port}}/{{path}}");
        let names: Vec<_> = refs.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["host", "port", "path"]);
    }

    #[test]
    fn test_adjacent_placeholders() {
        let refs = parse_placeholders("{{a}}{{b}}{{c}}");
        assert_eq!(refs.len(), 3);
    }

    #[test]
    fn test_empty_and_whitespace_braces_are_not_placeholders() {
        assert!(parse_placeholders("{{}}").is_empty());
        assert!(parse_placeholders("{{   }}").is_empty());
    }

    #[test]
    fn test_unclosed_braces_end_the_scan() {
        assert!(parse_placeholders("{{name").is_empty());
        let refs = parse_placeholders("{{a}} then {{broken");
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].name, "a");
    }

    #[test]
    fn test_single_braces_are_ignored() {
        assert!(parse_placeholders("/users/{id}").is_empty());
    }

    #[test]
    fn test_spans_cover_the_full_token() {
        let input = "call {{ id }} now";
        let refs = parse_placeholders(input);
        assert_eq!(&input[refs[0].span.clone()], "{{ id }}");
    }

    #[test]
    fn test_placeholder_in_json_body() {
        let refs = parse_placeholders(r#"{"user": "{{userId}}"}"#);
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].name, "userId");
    }

    #[test]
    fn test_has_placeholders() {
        assert!(has_placeholders("{{x}}"));
        assert!(!has_placeholders("plain"));
        assert!(!has_placeholders("{{half"));
    }
}
