use serde::{Deserialize, Serialize};
use std::path::Path;
use crate::errors::{PurgeError, Result};
use crate::whitelist::Whitelist;

/// Purge configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PurgeConfig {
    /// Classes that are always whitelisted
    pub safelist: Vec<String>,

    /// HTML file patterns to scan for used classes
    pub content: Vec<String>,

    /// Patterns excluded from the content scan
    pub exclude: Vec<String>,

    /// Banner handling
    pub banner: BannerConfig,

    /// Input file restrictions
    pub security: SecurityConfig,
}

/// Configuration for the banner comment
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BannerConfig {
    /// Re-emit the first comment of the stylesheet on top of the output
    pub keep: bool,
}

impl Default for BannerConfig {
    fn default() -> Self {
        Self { keep: true }
    }
}

/// Restrictions on the files read while scanning content
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Maximum file size in bytes (default: 10MB)
    pub max_file_size: u64,

    /// Allow symbolic links
    pub allow_symlinks: bool,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_file_size: 10 * 1024 * 1024,
            allow_symlinks: false,
        }
    }
}

impl PurgeConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| PurgeError::ConfigError {
                message: format!("Failed to read config file {}: {}", path.display(), e),
            })?;

        Ok(serde_yaml::from_str(&content)?)
    }

    /// Load configuration from a JSON file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| PurgeError::ConfigError {
                message: format!("Failed to read config file {}: {}", path.display(), e),
            })?;

        Ok(serde_json::from_str(&content)?)
    }

    /// Load configuration from a file (auto-detect format)
    pub fn from_file(path: &Path) -> Result<Self> {
        match path.extension().and_then(|s| s.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_file(path),
            Some("json") => Self::from_json_file(path),
            _ => Err(PurgeError::ConfigError {
                message: format!(
                    "Unsupported config file format: {}. Use .yaml, .yml, or .json",
                    path.display()
                ),
            }),
        }
    }

    /// Merge with another configuration, usually the command line over a file.
    ///
    /// Class and exclude lists are combined, non-empty `content` in `other`
    /// replaces ours, and the banner is kept only if both sides keep it.
    /// Security settings have no command line form and stay as in `self`.
    pub fn merge(mut self, other: Self) -> Self {
        for class in other.safelist {
            if !self.safelist.contains(&class) {
                self.safelist.push(class);
            }
        }

        // Patterns given by `other` replace ours
        if !other.content.is_empty() {
            self.content = other.content;
        }

        for pattern in other.exclude {
            if !self.exclude.contains(&pattern) {
                self.exclude.push(pattern);
            }
        }

        self.banner.keep &= other.banner.keep;
        self
    }

    /// Whitelist seeded with the safelisted classes
    pub fn safelist(&self) -> Whitelist {
        self.safelist.iter().map(String::as_str).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = PurgeConfig::default();
        assert!(config.safelist.is_empty());
        assert!(config.content.is_empty());
        assert!(config.banner.keep);
        assert!(!config.security.allow_symlinks);
    }

    #[test]
    fn test_yaml_config_loading() {
        let yaml_content = r##"
safelist:
  - "slide"
  - "fragment"
content:
  - "./out/**/*.html"
banner:
  keep: false
"##;

        let mut file = NamedTempFile::with_suffix(".yaml").unwrap();
        file.write_all(yaml_content.as_bytes()).unwrap();

        let config = PurgeConfig::from_yaml_file(file.path()).unwrap();
        assert_eq!(config.safelist, vec!["slide", "fragment"]);
        assert_eq!(config.content, vec!["./out/**/*.html"]);
        assert!(!config.banner.keep);
        assert_eq!(config.security.max_file_size, 10 * 1024 * 1024);
    }

    #[test]
    fn test_json_config_loading() {
        let json_content = r##"{
  "safelist": ["reveal"],
  "security": { "max_file_size": 1024, "allow_symlinks": true }
}"##;

        let mut file = NamedTempFile::with_suffix(".json").unwrap();
        file.write_all(json_content.as_bytes()).unwrap();

        let config = PurgeConfig::from_file(file.path()).unwrap();
        assert_eq!(config.safelist, vec!["reveal"]);
        assert_eq!(config.security.max_file_size, 1024);
        assert!(config.security.allow_symlinks);
        assert!(config.banner.keep);
    }

    #[test]
    fn test_unsupported_extension() {
        let file = NamedTempFile::with_suffix(".toml").unwrap();
        let err = PurgeConfig::from_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("Unsupported config file format"));
    }

    #[test]
    fn test_invalid_yaml_is_a_yaml_error() {
        let mut file = NamedTempFile::with_suffix(".yml").unwrap();
        file.write_all(b"safelist: [unclosed").unwrap();
        let err = PurgeConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, PurgeError::Yaml(_)));
        assert!(err.to_string().starts_with("YAML parsing error"));
    }

    #[test]
    fn test_safelist_only_config_has_no_content() {
        let mut file = NamedTempFile::with_suffix(".yaml").unwrap();
        file.write_all(b"safelist:\n  - keep\n").unwrap();

        let config = PurgeConfig::from_file(file.path()).unwrap();
        assert_eq!(config.safelist, vec!["keep"]);
        assert!(config.content.is_empty());
    }

    #[test]
    fn test_config_merge() {
        let mut base = PurgeConfig::default();
        base.safelist = vec!["a".to_string()];

        let mut other = PurgeConfig::default();
        other.safelist = vec!["a".to_string(), "b".to_string()];
        other.content = vec!["./site/*.html".to_string()];
        other.banner.keep = false;

        let merged = base.merge(other);
        assert_eq!(merged.safelist, vec!["a", "b"]);
        assert_eq!(merged.content, vec!["./site/*.html"]);
        assert!(!merged.banner.keep);
        assert_eq!(merged.safelist().len(), 2);
    }

    #[test]
    fn test_merge_keeps_file_settings_the_cli_leaves_unset() {
        let mut file = PurgeConfig::default();
        file.content = vec!["./_build/**/*.html".to_string()];
        file.exclude = vec!["./_build/genindex.html".to_string()];
        file.banner.keep = false;
        file.security.max_file_size = 1024;
        file.security.allow_symlinks = true;

        let mut cli = PurgeConfig::default();
        cli.exclude = vec!["./_build/search.html".to_string()];

        let merged = file.merge(cli);
        assert_eq!(merged.content, vec!["./_build/**/*.html"]);
        assert_eq!(merged.exclude, vec!["./_build/genindex.html", "./_build/search.html"]);
        assert!(!merged.banner.keep);
        assert_eq!(merged.security.max_file_size, 1024);
        assert!(merged.security.allow_symlinks);
    }
}
