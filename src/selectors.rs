use std::sync::OnceLock;

use indexmap::IndexSet;
use regex::Regex;

use crate::comments::strip_comments;

/// `.name` or `.\name`; the escape is not part of the captured class
fn class_selector_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\.\\?([\w\-]+)").expect("class selector pattern is valid"))
}

/// Extract the class names referenced by the selector of a rule.
///
/// Only the text before the first `{` is inspected. Text without a block
/// and at-rule preludes (`@media (min-width: 37.5em)`) have no class
/// selectors of their own and yield an empty set.
pub fn extract_classes(rule_text: &str) -> IndexSet<String> {
    let uncommented;
    let text = if rule_text.contains("/*") {
        uncommented = strip_comments(rule_text);
        uncommented.as_str()
    } else {
        rule_text
    };

    let selector = match text.find('{') {
        Some(pos) => &text[..pos],
        None => return IndexSet::new(),
    };

    if selector.trim_start().starts_with('@') {
        return IndexSet::new();
    }

    class_selector_regex()
        .captures_iter(selector)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classes(text: &str) -> Vec<String> {
        extract_classes(text).into_iter().collect()
    }

    #[test]
    fn test_simple_selectors() {
        assert_eq!(classes(".btn{color:red}"), vec!["btn"]);
        assert_eq!(classes(".btn-primary , .btn_secondary > a { x:y }"), vec!["btn-primary", "btn_secondary"]);
        assert_eq!(classes("div.card .title:hover::after{}"), vec!["card", "title"]);
    }

    #[test]
    fn test_escaped_class_drops_escape() {
        assert_eq!(classes(".foo\\:hover{color:green}"), vec!["foo"]);
        assert_eq!(classes(".\\32xl{}"), vec!["32xl"]);
        assert_eq!(classes(".md\\:p-4{padding:1rem}"), vec!["md"]);
    }

    #[test]
    fn test_duplicates_collapse() {
        assert_eq!(classes(".a .b, .a:focus, .b .a{}"), vec!["a", "b"]);
    }

    #[test]
    fn test_body_is_not_inspected() {
        assert_eq!(classes("p{margin:.5em;background:url(x.png)}"), Vec::<String>::new());
        assert_eq!(classes(".a{width:1.5rem}"), vec!["a"]);
    }

    #[test]
    fn test_classless_selectors() {
        assert!(extract_classes("body, h1 > a[href] {}").is_empty());
        assert!(extract_classes("#main:not(:first-child){}").is_empty());
        assert!(extract_classes("*,::before,::after{box-sizing:border-box}").is_empty());
    }

    #[test]
    fn test_at_rule_preludes_have_no_classes() {
        assert!(extract_classes("@media (min-width:600px){.a{color:red}}").is_empty());
        assert!(extract_classes("@media (min-width: 37.5em){.a{}}").is_empty());
        assert!(extract_classes("@import url(theme.css);").is_empty());
    }

    #[test]
    fn test_comments_in_selector_are_skipped() {
        assert_eq!(classes("/* .ghost */ .real{}"), vec!["real"]);
    }
}
