//! Discovery of generated HTML files and whitelist collection over them.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexSet;
use log::{debug, warn};
use rayon::prelude::*;

use crate::config::SecurityConfig;
use crate::errors::{PurgeError, Result};
use crate::html::extract_html_classes;
use crate::whitelist::Whitelist;

/// A content file selected for scanning
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentFile {
    pub path: PathBuf,
    pub size: u64,
}

/// Collect files matching the given patterns with security checks.
///
/// Directories and excluded paths are skipped, every file is listed once, and
/// files failing the security checks are skipped with a warning.
pub fn collect_files(
    patterns: &[String],
    exclude_patterns: &[String],
    security: &SecurityConfig,
) -> Result<Vec<ContentFile>> {
    let (files, skipped_count) = select_files(patterns, exclude_patterns, security)?;

    if skipped_count > 0 {
        warn!("Skipped {} files due to security constraints", skipped_count);
    }

    Ok(files)
}

/// Selected files and the number of distinct files rejected by the checks
fn select_files(
    patterns: &[String],
    exclude_patterns: &[String],
    security: &SecurityConfig,
) -> Result<(Vec<ContentFile>, usize)> {
    let exclude = exclude_patterns
        .iter()
        .map(|pattern| glob::Pattern::new(pattern))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let mut files = Vec::new();
    let mut seen = HashSet::new();
    let mut skipped_count = 0;

    for pattern in patterns {
        for entry in glob::glob(pattern)? {
            let path = entry?;

            if exclude.iter().any(|p| p.matches_path(&path)) || path.is_dir() {
                continue;
            }

            if !seen.insert(path.clone()) {
                continue;
            }

            let size = match validate_input_file(&path, security) {
                Ok(size) => size,
                Err(e) => {
                    warn!("Skipping file - {}", e);
                    skipped_count += 1;
                    continue;
                }
            };

            files.push(ContentFile { path, size });
        }
    }

    Ok((files, skipped_count))
}

/// Check that a file is safe to read, returning its size
fn validate_input_file(path: &Path, security: &SecurityConfig) -> Result<u64> {
    if !security.allow_symlinks && path.is_symlink() {
        return Err(PurgeError::SecurityError(format!(
            "Symbolic link not allowed: {}",
            path.display()
        )));
    }

    let metadata = fs::metadata(path).map_err(|e| {
        PurgeError::SecurityError(format!(
            "Cannot read file metadata for '{}': {}",
            path.display(),
            e
        ))
    })?;

    if metadata.len() > security.max_file_size {
        return Err(PurgeError::SecurityError(format!(
            "File '{}' exceeds maximum size limit ({} bytes > {} bytes)",
            path.display(),
            metadata.len(),
            security.max_file_size
        )));
    }

    Ok(metadata.len())
}

/// Read one HTML file and extract the classes it uses
pub fn extract_classes_from_file(path: &Path) -> Result<IndexSet<String>> {
    let html = fs::read_to_string(path)
        .map_err(|e| PurgeError::InputError(format!("Failed to read {}: {}", path.display(), e)))?;
    Ok(extract_html_classes(&html))
}

/// Build a whitelist from many HTML files in parallel.
///
/// `on_file` is called once per file after it has been scanned. The merge
/// keeps the order of `files`, so the result does not depend on scheduling.
pub fn collect_whitelist_from_files<F>(files: &[PathBuf], jobs: Option<usize>, on_file: F) -> Result<Whitelist>
where
    F: Fn(&Path) + Sync + Send,
{
    let scan = || {
        files
            .par_iter()
            .map(|path| {
                let classes = extract_classes_from_file(path);
                on_file(path);
                classes
            })
            .collect::<Result<Vec<_>>>()
    };

    let per_file = match jobs {
        Some(num_jobs) => rayon::ThreadPoolBuilder::new()
            .num_threads(num_jobs)
            .build()
            .map_err(|e| PurgeError::InvalidInput(format!("Failed to start {} worker threads: {}", num_jobs, e)))?
            .install(scan)?,
        None => scan()?,
    };

    let mut whitelist = Whitelist::new();
    for classes in per_file {
        whitelist.extend(classes);
    }

    debug!("collected {} classes from {} files", whitelist.len(), files.len());
    Ok(whitelist)
}
