use std::sync::OnceLock;

use indexmap::IndexSet;
use regex::Regex;

fn class_attribute_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"class="([\w\- :]+)""#).expect("class attribute pattern is valid"))
}

/// Extract the class tokens used by `class="..."` attributes in an HTML fragment.
///
/// A `:` separates tokens just like a space, so `hover:bg-red` contributes
/// both `hover` and `bg-red`. Attribute values holding any other character
/// are skipped entirely.
pub fn extract_html_classes(html: &str) -> IndexSet<String> {
    let mut classes = IndexSet::new();

    for caps in class_attribute_regex().captures_iter(html) {
        if let Some(value) = caps.get(1) {
            let value = value.as_str().replace(':', " ");
            classes.extend(value.split_whitespace().map(str::to_string));
        }
    }

    classes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classes(html: &str) -> Vec<String> {
        extract_html_classes(html).into_iter().collect()
    }

    #[test]
    fn test_pseudo_state_is_a_token_boundary() {
        assert_eq!(classes(r#"<div class="foo bar:hover">"#), vec!["foo", "bar", "hover"]);
    }

    #[test]
    fn test_multiple_elements_and_duplicates() {
        let html = r#"
            <section class="slide  dark">
              <p class="text-lg font-bold">Hi</p>
              <span class="dark">x</span>
            </section>
        "#;
        assert_eq!(classes(html), vec!["slide", "dark", "text-lg", "font-bold"]);
    }

    #[test]
    fn test_unsupported_values_are_skipped() {
        assert!(extract_html_classes(r#"<div class="w-1/2">"#).is_empty());
        assert!(extract_html_classes(r#"<div class='single'>"#).is_empty());
        assert!(extract_html_classes(r#"<div class="">"#).is_empty());
    }

    #[test]
    fn test_no_markup() {
        assert!(extract_html_classes("plain text, class=nothing").is_empty());
    }
}
