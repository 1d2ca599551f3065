use std::path::Path;

use log::debug;

use crate::comments::{filter_comments, FilteredCss};
use crate::errors::{PurgeError, Result};
use crate::rules::{split_rules, Rule};
use crate::whitelist::Whitelist;

/// Options applied when writing a purged stylesheet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PurgeOptions {
    /// Re-emit the banner comment on top of the output
    pub keep_banner: bool,
}

impl Default for PurgeOptions {
    fn default() -> Self {
        Self { keep_banner: true }
    }
}

/// Keep the rules that have no class or share a class with the whitelist.
///
/// The filter is stable: retained rules come out in input order.
pub fn purge<'a>(rules: &'a [Rule], whitelist: &Whitelist) -> Vec<&'a Rule> {
    rules
        .iter()
        .filter(|rule| rule.matches_whitelist(whitelist))
        .collect()
}

/// Write rules back as stylesheet text.
///
/// A non-empty banner is emitted first as `/* banner */ `. Every rule is
/// terminated by a newline. An empty banner emits no comment.
pub fn serialize<'a, I>(retained: I, banner: &str) -> String
where
    I: IntoIterator<Item = &'a Rule>,
{
    let mut output = String::new();

    if !banner.is_empty() {
        output.push_str("/* ");
        output.push_str(banner);
        output.push_str(" */ ");
    }

    for rule in retained {
        output.push_str(rule.text());
        output.push('\n');
    }

    output
}

/// A stylesheet split into rules, ready to be purged against whitelists
#[derive(Debug, Clone, Default)]
pub struct CssPurge {
    rules: Vec<Rule>,
    banner: String,
}

impl CssPurge {
    /// Parse a whole stylesheet
    pub fn parse(css: &str) -> Self {
        let FilteredCss { clean, banner } = filter_comments(css);
        let rules = split_rules(&clean);

        debug!(
            "parsed {} rules from {} bytes of css (banner: {})",
            rules.len(),
            css.len(),
            if banner.is_empty() { "none" } else { "kept" }
        );

        Self { rules, banner }
    }

    /// Read and parse a stylesheet file
    pub fn from_file(path: &Path) -> Result<Self> {
        let css = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => PurgeError::InputNotFound {
                path: path.display().to_string(),
            },
            _ => PurgeError::Io(e),
        })?;

        Ok(Self::parse(&css))
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Trimmed text of the first comment of the stylesheet
    pub fn banner(&self) -> &str {
        &self.banner
    }

    /// Rules surviving the whitelist, in stylesheet order
    pub fn filter_rules(&self, whitelist: &Whitelist) -> Vec<&Rule> {
        purge(&self.rules, whitelist)
    }

    /// Produce the purged stylesheet, banner included
    pub fn purge(&self, whitelist: &Whitelist) -> String {
        self.purge_with(whitelist, PurgeOptions::default())
    }

    pub fn purge_with(&self, whitelist: &Whitelist, options: PurgeOptions) -> String {
        let retained = self.filter_rules(whitelist);
        debug!("retained {} of {} rules", retained.len(), self.rules.len());

        let banner = if options.keep_banner { self.banner.as_str() } else { "" };
        serialize(retained, banner)
    }

    /// Purge and write the result to `path`, creating parent directories
    pub fn purge_to_file(&self, whitelist: &Whitelist, path: &Path) -> Result<()> {
        self.purge_to_file_with(whitelist, path, PurgeOptions::default())
    }

    pub fn purge_to_file_with(&self, whitelist: &Whitelist, path: &Path, options: PurgeOptions) -> Result<()> {
        let css = self.purge_with(whitelist, options);

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        crate::write_atomic(path, &css).map_err(|e| PurgeError::OutputError {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn whitelist(classes: &[&str]) -> Whitelist {
        classes.iter().copied().collect()
    }

    #[test]
    fn test_banner_is_reattached() {
        let purge = CssPurge::parse("/* MIT License */\n.a{color:red}");
        assert_eq!(purge.purge(&whitelist(&["a"])), "/* MIT License */ .a{color:red}\n");
    }

    #[test]
    fn test_unused_rules_are_dropped() {
        let purge = CssPurge::parse(".used{color:red}\n.unused{color:blue}");
        assert_eq!(purge.purge(&whitelist(&["used"])), ".used{color:red}\n");
    }

    #[test]
    fn test_escaped_class_matching() {
        let purge = CssPurge::parse(".foo\\:hover{color:green}");
        assert_eq!(purge.purge(&whitelist(&["foo"])), ".foo\\:hover{color:green}\n");
        assert_eq!(purge.purge(&whitelist(&["hover"])), "");
    }

    #[test]
    fn test_nested_at_rule_retained_whole() {
        let css = "@media (min-width:600px){.a{color:red}}";
        let purge = CssPurge::parse(css);
        assert_eq!(purge.rules().len(), 1);
        assert_eq!(purge.purge(&whitelist(&["a"])), format!("{}\n", css));
    }

    #[test]
    fn test_classless_rules_survive_empty_whitelist() {
        let css = "html{line-height:1.15}\n#app > a[href]{color:inherit}\n.btn{padding:0}\n@keyframes spin{to{transform:rotate(360deg)}}";
        let purge = CssPurge::parse(css);
        let output = purge.purge(&Whitelist::new());
        assert_eq!(
            output,
            "html{line-height:1.15}\n#app > a[href]{color:inherit}\n@keyframes spin{to{transform:rotate(360deg)}}\n"
        );
    }

    #[test]
    fn test_any_shared_class_keeps_the_rule() {
        let purge = CssPurge::parse(".a .b, .c{x:y}");
        assert_eq!(purge.filter_rules(&whitelist(&["c"])).len(), 1);
        assert!(purge.filter_rules(&whitelist(&["d"])).is_empty());
    }

    #[test]
    fn test_purge_is_monotonic_in_whitelist() {
        let css = ".a{}.b{}.c{}p{}.a.b{}.c .d{}@media print{.e{}}.e{}";
        let purge = CssPurge::parse(css);
        let whitelists = [
            whitelist(&[]),
            whitelist(&["a"]),
            whitelist(&["a", "c"]),
            whitelist(&["a", "c", "e"]),
            whitelist(&["a", "b", "c", "d", "e"]),
        ];

        for pair in whitelists.windows(2) {
            let smaller = purge.filter_rules(&pair[0]);
            let larger = purge.filter_rules(&pair[1]);
            let mut remaining = larger.iter();
            for rule in &smaller {
                assert!(
                    remaining.any(|candidate| std::ptr::eq(*candidate, *rule)),
                    "{:?} kept with {:?} but not with {:?}",
                    rule.text(),
                    pair[0],
                    pair[1]
                );
            }
        }
    }

    #[test]
    fn test_banner_can_be_dropped() {
        let purge = CssPurge::parse("/* license */.a{}");
        let output = purge.purge_with(&whitelist(&["a"]), PurgeOptions { keep_banner: false });
        assert_eq!(output, ".a{}\n");
    }

    #[test]
    fn test_only_banner_when_nothing_survives() {
        let purge = CssPurge::parse("/* license */.a{}");
        assert_eq!(purge.purge(&Whitelist::new()), "/* license */ ");
    }

    #[test]
    fn test_serialize_preserves_order() {
        let rules = vec![Rule::new(".z{}"), Rule::new(".a{}"), Rule::new("p{}")];
        assert_eq!(serialize(&rules, ""), ".z{}\n.a{}\np{}\n");
    }

    #[test]
    fn test_from_file_missing_input() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing.css");
        let err = CssPurge::from_file(&missing).unwrap_err();
        assert!(matches!(err, PurgeError::InputNotFound { .. }));
        assert!(err.to_string().contains("missing.css"));
    }

    #[test]
    fn test_purge_to_file_roundtrip() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("in.css");
        let output = dir.path().join("out/nested/purged.css");
        std::fs::write(&input, "/* hdr */\n.keep{a:b}\n.drop{c:d}\n").unwrap();

        let purge = CssPurge::from_file(&input).unwrap();
        purge.purge_to_file(&whitelist(&["keep"]), &output).unwrap();

        assert_eq!(std::fs::read_to_string(&output).unwrap(), "/* hdr */ .keep{a:b}\n");
    }
}
