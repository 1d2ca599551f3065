use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::PurgeConfig;

/// CSS purge CLI - Drops stylesheet rules whose classes are never used
#[derive(Parser, Debug)]
#[command(name = "css-purge-cli")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Purge a stylesheet against the classes used by generated HTML
    Purge(PurgeArgs),
    /// Print the classes used by generated HTML
    Classes(ClassesArgs),
    /// Purge CSS read from stdin and write the result to stdout
    Pipe(PipeArgs),
}

/// Arguments for the purge command
#[derive(Parser, Debug, Clone)]
pub struct PurgeArgs {
    /// Stylesheet to purge
    #[arg(
        short = 'i',
        long = "input",
        value_name = "PATH",
        required = true,
        help = "Stylesheet to purge"
    )]
    pub input: PathBuf,

    /// Output stylesheet path
    #[arg(
        short = 'o',
        long = "output",
        value_name = "PATH",
        required = true,
        help = "Path where the purged stylesheet will be written"
    )]
    pub output: PathBuf,

    /// HTML file patterns (glob patterns supported)
    #[arg(
        long = "html",
        value_name = "PATTERN",
        num_args = 1..,
        help = "HTML file patterns to scan for used classes"
    )]
    pub html: Vec<String>,

    /// Exclude patterns (glob patterns to exclude)
    #[arg(
        short = 'e',
        long = "exclude",
        value_name = "PATTERN",
        num_args = 0..,
        help = "Patterns to exclude from scanning"
    )]
    pub exclude: Vec<String>,

    /// Extra whitelisted classes
    #[arg(
        short = 'k',
        long = "class",
        value_name = "NAME",
        num_args = 1..,
        help = "Class names to keep regardless of the HTML scan"
    )]
    pub classes: Vec<String>,

    /// Whitelist file
    #[arg(
        short = 'w',
        long = "whitelist",
        value_name = "PATH",
        help = "File listing classes to keep (JSON array, or one class per line)"
    )]
    pub whitelist: Option<PathBuf>,

    /// Configuration file path
    #[arg(
        short = 'c',
        long = "config",
        value_name = "PATH",
        help = "Path to configuration file (YAML or JSON format)"
    )]
    pub config: Option<PathBuf>,

    /// Report file path (JSON)
    #[arg(
        short = 'r',
        long = "report",
        value_name = "PATH",
        help = "Path where a JSON purge report will be written"
    )]
    pub report: Option<PathBuf>,

    /// Drop the banner comment
    #[arg(
        long = "no-banner",
        default_value_t = false,
        help = "Do not copy the leading comment of the stylesheet to the output"
    )]
    pub no_banner: bool,

    /// Purge with an empty whitelist
    #[arg(
        long = "allow-empty",
        default_value_t = false,
        help = "Allow a purge without any whitelist source, dropping every class rule"
    )]
    pub allow_empty: bool,

    /// Dry run (don't write output files)
    #[arg(
        long = "dry-run",
        default_value_t = false,
        help = "Perform the purge but don't write output files"
    )]
    pub dry_run: bool,

    /// Verbose output
    #[arg(
        short = 'v',
        long = "verbose",
        default_value_t = false,
        help = "Enable verbose output"
    )]
    pub verbose: bool,

    /// Number of parallel threads to use
    #[arg(
        short = 'j',
        long = "jobs",
        value_name = "NUM",
        help = "Number of parallel threads to use (defaults to number of CPU cores)"
    )]
    pub jobs: Option<usize>,
}

/// Arguments for the classes command
#[derive(Parser, Debug, Clone)]
pub struct ClassesArgs {
    /// HTML file patterns (glob patterns supported)
    #[arg(
        long = "html",
        value_name = "PATTERN",
        required = true,
        num_args = 1..,
        help = "HTML file patterns to scan for used classes"
    )]
    pub html: Vec<String>,

    /// Exclude patterns (glob patterns to exclude)
    #[arg(
        short = 'e',
        long = "exclude",
        value_name = "PATTERN",
        num_args = 0..,
        help = "Patterns to exclude from scanning"
    )]
    pub exclude: Vec<String>,

    /// Print JSON instead of one class per line
    #[arg(long = "json", default_value_t = false, help = "Print the classes as a JSON array")]
    pub json: bool,

    /// Verbose output
    #[arg(
        short = 'v',
        long = "verbose",
        default_value_t = false,
        help = "Enable verbose output"
    )]
    pub verbose: bool,

    /// Number of parallel threads to use
    #[arg(
        short = 'j',
        long = "jobs",
        value_name = "NUM",
        help = "Number of parallel threads to use (defaults to number of CPU cores)"
    )]
    pub jobs: Option<usize>,
}

/// Arguments for the pipe command
#[derive(Parser, Debug, Clone)]
pub struct PipeArgs {
    /// Whitelisted classes
    #[arg(
        short = 'k',
        long = "class",
        value_name = "NAME",
        num_args = 1..,
        help = "Class names to keep"
    )]
    pub classes: Vec<String>,

    /// Whitelist file
    #[arg(
        short = 'w',
        long = "whitelist",
        value_name = "PATH",
        help = "File listing classes to keep (JSON array, or one class per line)"
    )]
    pub whitelist: Option<PathBuf>,

    /// Drop the banner comment
    #[arg(
        long = "no-banner",
        default_value_t = false,
        help = "Do not copy the leading comment of the stylesheet to the output"
    )]
    pub no_banner: bool,
}

impl PurgeArgs {
    /// Validate that the arguments are consistent
    pub fn validate(&self) -> Result<(), String> {
        if self.input == self.output {
            return Err("Input and output stylesheet paths must be different".to_string());
        }

        if let Some(report) = &self.report {
            if report == &self.output || report == &self.input {
                return Err("Report path must differ from the stylesheet paths".to_string());
            }
        }

        if let Some(jobs) = self.jobs {
            if jobs == 0 {
                return Err("Number of jobs must be at least 1".to_string());
            }
        }

        let has_source = !self.html.is_empty()
            || !self.classes.is_empty()
            || self.whitelist.is_some()
            || self.config.is_some();
        if !has_source && !self.allow_empty {
            return Err(
                "No whitelist source given: pass --html, --class, --whitelist or --config, \
                 or --allow-empty to drop every class rule"
                    .to_string(),
            );
        }

        Ok(())
    }

    /// Configuration set on the command line, to be merged over a config file
    pub fn to_config(&self) -> PurgeConfig {
        let mut config = PurgeConfig {
            safelist: self.classes.clone(),
            content: self.html.clone(),
            exclude: self.exclude.clone(),
            ..PurgeConfig::default()
        };
        config.banner.keep = !self.no_banner;
        config
    }
}

impl ClassesArgs {
    pub fn validate(&self) -> Result<(), String> {
        if self.jobs == Some(0) {
            return Err("Number of jobs must be at least 1".to_string());
        }
        Ok(())
    }
}
