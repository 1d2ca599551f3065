//! Splitting a stylesheet into top-level rules.

use std::fmt;

use indexmap::IndexSet;

use crate::selectors::extract_classes;
use crate::whitelist::Whitelist;

/// One top-level rule of a stylesheet: a selector list and its braced body.
///
/// At-rules with nested blocks (`@media`, `@supports`, `@keyframes`) are a
/// single rule. The text is kept verbatim and never reformatted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    text: String,
    classes: IndexSet<String>,
}

impl Rule {
    /// Create a rule from its raw text, extracting the classes of its selector
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let classes = extract_classes(&text);
        Self { text, classes }
    }

    /// Raw rule text, exactly as found in the stylesheet
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Classes referenced by the selector, in order of first appearance
    pub fn classes(&self) -> &IndexSet<String> {
        &self.classes
    }

    /// Whether the selector references no class at all
    pub fn is_classless(&self) -> bool {
        self.classes.is_empty()
    }

    /// A rule matches when it has no classes or shares one with the whitelist
    pub fn matches_whitelist(&self, whitelist: &Whitelist) -> bool {
        self.is_classless() || self.classes.iter().any(|class| whitelist.contains(class))
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Split stylesheet text into top-level rules, in source order.
///
/// Each rule starts at the first non-whitespace character after the previous
/// rule and ends at the brace that brings the nesting depth back to zero.
/// Braces inside comments are not counted, so the splitter also works on text
/// that still carries comments. Top-level `@` statements ending in `;`
/// (`@charset`, `@import`) become rules of their own.
///
/// Malformed input degrades instead of failing: an unmatched `}` discards the
/// pending text before it, and text whose block never closes is dropped.
pub fn split_rules(css: &str) -> Vec<Rule> {
    let bytes = css.as_bytes();
    let mut rules = Vec::new();
    let mut bracket_level = 0usize;
    let mut in_comment = false;
    let mut start: Option<usize> = None;
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i];
        let next = bytes.get(i + 1).copied();

        if start.is_none() && !c.is_ascii_whitespace() {
            start = Some(i);
        }

        if in_comment {
            if c == b'*' && next == Some(b'/') {
                in_comment = false;
                i += 2;
                continue;
            }
        } else if c == b'/' && next == Some(b'*') {
            in_comment = true;
            i += 2;
            continue;
        } else {
            match c {
                b'{' => bracket_level += 1,
                b'}' if bracket_level > 0 => {
                    bracket_level -= 1;
                    if bracket_level == 0 {
                        if let Some(s) = start.take() {
                            rules.push(Rule::new(&css[s..=i]));
                        }
                    }
                }
                b'}' => start = None,
                b';' if bracket_level == 0 => {
                    if let Some(s) = start.filter(|&s| bytes[s] == b'@') {
                        rules.push(Rule::new(&css[s..=i]));
                        start = None;
                    }
                }
                _ => {}
            }
        }

        i += 1;
    }

    if let Some(s) = start {
        log::debug!("dropping {} bytes of unterminated trailing css", css.len() - s);
    }

    rules
}
