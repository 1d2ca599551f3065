//! Command implementations behind the CLI.

use std::path::{Path, PathBuf};
use std::time::Instant;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use log::{debug, info};

use crate::args::{ClassesArgs, PipeArgs, PurgeArgs};
use crate::config::{PurgeConfig, SecurityConfig};
use crate::errors::{PurgeError, Result};
use crate::purge::{CssPurge, PurgeOptions};
use crate::report::PurgeReport;
use crate::scanner::{collect_files, collect_whitelist_from_files};
use crate::whitelist::Whitelist;

/// Result of the purge command
#[derive(Debug)]
pub struct PurgeOutcome {
    pub css_content: String,
    pub report: PurgeReport,
    pub whitelist: Whitelist,
    pub html_files_scanned: usize,
}

/// Purge a stylesheet file against the configured whitelist sources
pub async fn run_purge(args: PurgeArgs) -> Result<PurgeOutcome> {
    let start_time = Instant::now();

    args.validate().map_err(PurgeError::InvalidInput)?;

    let file_config = match &args.config {
        Some(path) => PurgeConfig::from_file(path)?,
        None => PurgeConfig::default(),
    };
    let config = file_config.merge(args.to_config());

    let mut whitelist = config.safelist();
    if let Some(path) = &args.whitelist {
        whitelist.merge(load_whitelist_file(path).await?);
    }

    let mut html_files_scanned = 0;
    if !config.content.is_empty() {
        let paths = discover(&config.content, &config.exclude, &config.security)?;
        whitelist.merge(scan_with_progress(&paths, args.jobs, args.verbose)?);
        html_files_scanned = paths.len();
    }

    info!("Whitelist holds {} classes", whitelist.len());

    let css = read_stylesheet(&args.input).await?;
    let purge = CssPurge::parse(&css);
    let options = PurgeOptions {
        keep_banner: config.banner.keep,
    };
    let css_content = purge.purge_with(&whitelist, options);

    let report = PurgeReport::new(&purge, &whitelist, css.len(), &css_content)
        .with_paths(args.input.display().to_string(), args.output.display().to_string())
        .with_processing_time(start_time.elapsed().as_millis() as u64);

    info!(
        "Kept {} of {} rules ({} -> {} bytes)",
        report.statistics.rules_retained,
        report.statistics.rules_total,
        report.statistics.input_size_bytes,
        report.statistics.output_size_bytes
    );

    if !args.dry_run {
        write_output(&args.output, &css_content)?;
        if let Some(report_path) = &args.report {
            write_output(report_path, &report.to_pretty_json()?)?;
        }
    } else {
        debug!("dry run, nothing written");
    }

    Ok(PurgeOutcome {
        css_content,
        report,
        whitelist,
        html_files_scanned,
    })
}

/// Collect the classes used by the HTML files matching the given patterns
pub async fn collect_classes(args: ClassesArgs) -> Result<Whitelist> {
    args.validate().map_err(PurgeError::InvalidInput)?;

    let paths = discover(&args.html, &args.exclude, &SecurityConfig::default())?;
    scan_with_progress(&paths, args.jobs, args.verbose)
}

/// Handle pipe command - read CSS from stdin, write purged CSS to stdout
pub async fn handle_pipe_command(args: PipeArgs) -> Result<()> {
    use tokio::io::{self, AsyncReadExt, AsyncWriteExt};

    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .await
        .map_err(|e| PurgeError::InputError(format!("Failed to read from stdin: {}", e)))?;

    let mut whitelist: Whitelist = args.classes.iter().map(String::as_str).collect();
    if let Some(path) = &args.whitelist {
        whitelist.merge(load_whitelist_file(path).await?);
    }

    let options = PurgeOptions {
        keep_banner: !args.no_banner,
    };
    let css_content = CssPurge::parse(&input).purge_with(&whitelist, options);

    let mut stdout = io::stdout();
    stdout
        .write_all(css_content.as_bytes())
        .await
        .map_err(|e| PurgeError::OutputError {
            path: "stdout".to_string(),
            message: e.to_string(),
        })?;

    stdout.flush().await.map_err(|e| PurgeError::OutputError {
        path: "stdout".to_string(),
        message: e.to_string(),
    })?;

    Ok(())
}

/// Load a whitelist from a JSON array, or from whitespace separated names
pub async fn load_whitelist_file(path: &Path) -> Result<Whitelist> {
    let content = tokio::fs::read_to_string(path).await.map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => PurgeError::InputNotFound {
            path: path.display().to_string(),
        },
        _ => PurgeError::Io(e),
    })?;

    if path.extension().and_then(|s| s.to_str()) == Some("json") {
        return Ok(serde_json::from_str(&content)?);
    }

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.starts_with('#'))
        .flat_map(str::split_whitespace)
        .collect())
}

async fn read_stylesheet(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path).await.map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => PurgeError::InputNotFound {
            path: path.display().to_string(),
        },
        _ => PurgeError::InputError(format!("Failed to read {}: {}", path.display(), e)),
    })
}

fn write_output(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| PurgeError::OutputError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
    }

    crate::write_atomic(path, content).map_err(|e| PurgeError::OutputError {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

/// Resolve content patterns to the files to scan; finding none is an error
fn discover(patterns: &[String], exclude: &[String], security: &SecurityConfig) -> Result<Vec<PathBuf>> {
    let files = collect_files(patterns, exclude, security)?;
    if files.is_empty() {
        return Err(PurgeError::NoFilesFound);
    }

    let total_bytes: u64 = files.iter().map(|f| f.size).sum();
    info!("Found {} HTML files to scan ({} bytes)", files.len(), total_bytes);

    Ok(files.into_iter().map(|f| f.path).collect())
}

/// Scan HTML files, showing a progress bar unless verbose logging is on
fn scan_with_progress(paths: &[PathBuf], jobs: Option<usize>, verbose: bool) -> Result<Whitelist> {
    let progress_bar = ProgressBar::new(paths.len() as u64);
    if verbose {
        progress_bar.set_draw_target(ProgressDrawTarget::hidden());
    }
    progress_bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({msg})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▉▊▋▌▍▎▏  "),
    );
    progress_bar.set_message("Scanning HTML...");

    let whitelist = collect_whitelist_from_files(paths, jobs, |path| {
        progress_bar.inc(1);
        progress_bar.set_message(format!(
            "Scanned: {}",
            path.file_name().unwrap_or_default().to_string_lossy()
        ));
    })?;

    progress_bar.finish_with_message(format!("✓ {} classes", whitelist.len()));
    Ok(whitelist)
}
