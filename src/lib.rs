pub mod args;
pub mod comments;
pub mod config;
pub mod errors;
pub mod html;
pub mod purge;
pub mod report;
pub mod rules;
#[cfg(feature = "cli")]
pub mod runner;
pub mod scanner;
pub mod selectors;
pub mod whitelist;

pub use args::{ClassesArgs, Cli, Commands, PipeArgs, PurgeArgs};
pub use comments::{filter_comments, strip_comments, FilteredCss};
pub use config::{BannerConfig, PurgeConfig, SecurityConfig};
pub use errors::{PurgeError, Result};
pub use html::extract_html_classes;
pub use purge::{purge, serialize, CssPurge, PurgeOptions};
pub use report::{PurgeReport, PurgeStatistics};
pub use rules::{split_rules, Rule};
#[cfg(feature = "cli")]
pub use runner::{collect_classes, handle_pipe_command, load_whitelist_file, run_purge, PurgeOutcome};
pub use scanner::{collect_files, collect_whitelist_from_files, ContentFile};
pub use selectors::extract_classes;
pub use whitelist::Whitelist;

use std::path::Path;

/// Write file atomically by writing to temp file then renaming
pub(crate) fn write_atomic(path: &Path, content: &str) -> std::io::Result<()> {
    use std::fs;
    use std::io::Write;

    let mut temp_name = path.file_name().unwrap_or_default().to_os_string();
    temp_name.push(".tmp");
    let temp_path = path.with_file_name(temp_name);

    let mut file = fs::File::create(&temp_path)?;
    file.write_all(content.as_bytes())?;
    file.sync_all()?;

    fs::rename(&temp_path, path)?;

    Ok(())
}
