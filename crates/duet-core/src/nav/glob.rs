//! Shell-style glob filters for directory listings.
//!
//! Patterns are compiled once into an anchored [`regex::Regex`] and matched
//! against whole entry names. Supported syntax: `*`, `?`, `[abc]`,
//! `[a-z]` and negated classes `[!abc]` / `[^abc]`. Matching is
//! case-sensitive.

use std::fmt;

use regex::Regex;

use crate::error::{CoreError, CoreResult};

/// A compiled glob pattern.
#[derive(Debug, Clone)]
pub struct GlobPattern {
    source: String,
    regex: Regex,
}

impl GlobPattern {
    /// Compiles `pattern`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidGlob`] for an empty pattern or an
    /// unterminated `[` class.
    pub fn new(pattern: &str) -> CoreResult<Self> {
        if pattern.is_empty() {
            return Err(CoreError::InvalidGlob(pattern.to_string()));
        }
        let translated = glob_to_regex(pattern)?;
        let regex =
            Regex::new(&translated).map_err(|_| CoreError::InvalidGlob(pattern.to_string()))?;
        Ok(Self {
            source: pattern.to_string(),
            regex,
        })
    }

    /// Interprets user input from the find dialog.
    ///
    /// Blank input and a lone `*` mean "no filter" and yield `Ok(None)`.
    pub fn parse_filter(input: &str) -> CoreResult<Option<Self>> {
        let trimmed = input.trim();
        if trimmed.is_empty() || trimmed == "*" {
            return Ok(None);
        }
        Self::new(trimmed).map(Some)
    }

    /// Returns `true` if `name` matches the whole pattern.
    pub fn matches(&self, name: &str) -> bool {
        self.regex.is_match(name)
    }

    /// Returns the pattern as typed.
    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl PartialEq for GlobPattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for GlobPattern {}

impl fmt::Display for GlobPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Translates a glob into an anchored regular expression.
fn glob_to_regex(pattern: &str) -> CoreResult<String> {
    let mut out = String::with_capacity(pattern.len() * 2 + 2);
    out.push('^');

    let mut chars = pattern.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '*' => out.push_str(".*"),
            '?' => out.push('.'),
            '[' => {
                let mut class = String::from("[");
                if matches!(chars.peek(), Some('!') | Some('^')) {
                    chars.next();
                    class.push('^');
                }
                // A `]` right after the opening bracket is a literal member.
                if chars.peek() == Some(&']') {
                    chars.next();
                    class.push_str("\\]");
                }
                let mut closed = false;
                for member in chars.by_ref() {
                    match member {
                        ']' => {
                            closed = true;
                            break;
                        }
                        '\\' | '[' | '&' | '~' => {
                            class.push('\\');
                            class.push(member);
                        }
                        _ => class.push(member),
                    }
                }
                if !closed {
                    return Err(CoreError::InvalidGlob(pattern.to_string()));
                }
                class.push(']');
                out.push_str(&class);
            }
            _ => out.push_str(&regex::escape(c.encode_utf8(&mut [0u8; 4]))),
        }
    }

    out.push('$');
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn star_matches_any_suffix() {
        let glob = GlobPattern::new("*.txt").unwrap();
        assert!(glob.matches("a.txt"));
        assert!(glob.matches(".txt"));
        assert!(!glob.matches("a.txt.bak"));
        assert!(!glob.matches("a.rs"));
    }

    #[test]
    fn question_mark_matches_single_char() {
        let glob = GlobPattern::new("file?.log").unwrap();
        assert!(glob.matches("file1.log"));
        assert!(!glob.matches("file12.log"));
        assert!(!glob.matches("file.log"));
    }

    #[test]
    fn dot_is_literal() {
        let glob = GlobPattern::new("a.b").unwrap();
        assert!(glob.matches("a.b"));
        assert!(!glob.matches("axb"));
    }

    #[test]
    fn character_class_and_range() {
        let glob = GlobPattern::new("[ab]*").unwrap();
        assert!(glob.matches("apple"));
        assert!(glob.matches("banana"));
        assert!(!glob.matches("cherry"));

        let range = GlobPattern::new("img[0-9].png").unwrap();
        assert!(range.matches("img3.png"));
        assert!(!range.matches("imgx.png"));
    }

    #[test]
    fn negated_class() {
        let glob = GlobPattern::new("[!.]*").unwrap();
        assert!(glob.matches("visible"));
        assert!(!glob.matches(".hidden"));
    }

    #[test]
    fn matching_is_case_sensitive() {
        let glob = GlobPattern::new("*.TXT").unwrap();
        assert!(glob.matches("A.TXT"));
        assert!(!glob.matches("a.txt"));
    }

    #[test]
    fn regex_metacharacters_are_escaped() {
        let glob = GlobPattern::new("(draft)+v1$").unwrap();
        assert!(glob.matches("(draft)+v1$"));
        assert!(!glob.matches("draftv1"));
    }

    #[test]
    fn unterminated_class_is_rejected() {
        let err = GlobPattern::new("[abc").unwrap_err();
        assert!(matches!(err, CoreError::InvalidGlob(_)));
    }

    #[test]
    fn empty_pattern_is_rejected() {
        assert!(GlobPattern::new("").is_err());
    }

    #[test]
    fn parse_filter_treats_blank_and_star_as_none() {
        assert!(GlobPattern::parse_filter("").unwrap().is_none());
        assert!(GlobPattern::parse_filter("   ").unwrap().is_none());
        assert!(GlobPattern::parse_filter("*").unwrap().is_none());
        assert!(GlobPattern::parse_filter(" *.rs ").unwrap().is_some());
    }

    #[test]
    fn display_shows_source() {
        let glob = GlobPattern::new("*.md").unwrap();
        assert_eq!(glob.to_string(), "*.md");
        assert_eq!(glob.as_str(), "*.md");
    }

    #[test]
    fn patterns_compare_by_source() {
        assert_eq!(GlobPattern::new("*.md").unwrap(), GlobPattern::new("*.md").unwrap());
        assert_ne!(GlobPattern::new("*.md").unwrap(), GlobPattern::new("*.rs").unwrap());
    }
}
