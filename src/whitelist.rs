use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::html::extract_html_classes;

/// Set of class names known to be used by the generated output.
///
/// The whitelist is owned by the caller: documents are folded into it one at
/// a time and it is then handed to the purge by reference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Whitelist {
    classes: IndexSet<String>,
}

impl Whitelist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a class, returning whether it was new
    pub fn insert(&mut self, class: impl Into<String>) -> bool {
        self.classes.insert(class.into())
    }

    pub fn contains(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    /// Add every class used by the `class="..."` attributes of an HTML fragment
    pub fn add_html(&mut self, html: &str) -> usize {
        let before = self.classes.len();
        self.classes.extend(extract_html_classes(html));
        self.classes.len() - before
    }

    /// Union with another whitelist
    pub fn merge(&mut self, other: Whitelist) {
        self.classes.extend(other.classes);
    }

    pub fn is_subset(&self, other: &Whitelist) -> bool {
        self.classes.is_subset(&other.classes)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.classes.iter().map(String::as_str)
    }

    /// Class names sorted alphabetically
    pub fn sorted(&self) -> Vec<&str> {
        let mut classes: Vec<&str> = self.iter().collect();
        classes.sort_unstable();
        classes
    }
}

impl FromIterator<String> for Whitelist {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            classes: iter.into_iter().collect(),
        }
    }
}

impl<'a> FromIterator<&'a str> for Whitelist {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        iter.into_iter().map(str::to_string).collect()
    }
}

impl Extend<String> for Whitelist {
    fn extend<I: IntoIterator<Item = String>>(&mut self, iter: I) {
        self.classes.extend(iter);
    }
}

impl<'a> Extend<&'a str> for Whitelist {
    fn extend<I: IntoIterator<Item = &'a str>>(&mut self, iter: I) {
        self.classes.extend(iter.into_iter().map(str::to_string));
    }
}
