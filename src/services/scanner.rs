use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use thiserror::Error;

/// Errors raised while discovering package files.
///
/// A scan failure is fatal to a run: if the source directory cannot be
/// listed, no further files can be discovered, so the orchestrator aborts
/// rather than report a misleading partial summary.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("cannot list source directory {dir}: {source}")]
    ReadDir {
        dir: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Find package files with one extension, directly inside `source_dir`.
///
/// Matching is case-insensitive on the `"." + extension` suffix, one
/// directory level deep (no recursion). Only regular files match: a
/// directory that happens to be named like a package is skipped. Results
/// are sorted by name so invocation order is reproducible even though the
/// platform's directory-listing order is not.
pub fn scan_extension(source_dir: &Utf8Path, extension: &str) -> Result<Vec<String>, ScanError> {
    let suffix = format!(".{}", extension.to_lowercase());

    let entries = fs::read_dir(source_dir.as_std_path()).map_err(|source| ScanError::ReadDir {
        dir: source_dir.to_path_buf(),
        source,
    })?;

    let mut matches = Vec::new();

    for entry in entries {
        let entry = entry.map_err(|source| ScanError::ReadDir {
            dir: source_dir.to_path_buf(),
            source,
        })?;

        let Ok(name) = entry.file_name().into_string() else {
            tracing::warn!("Skipping non-UTF-8 entry in {}", source_dir);
            continue;
        };

        if !name.to_lowercase().ends_with(&suffix) {
            continue;
        }

        match entry.file_type() {
            Ok(file_type) if file_type.is_file() => matches.push(name),
            Ok(_) => tracing::debug!("Skipping non-file entry {} in {}", name, source_dir),
            Err(err) => {
                tracing::warn!("Cannot stat {} in {}: {}", name, source_dir, err);
            }
        }
    }

    matches.sort();
    Ok(matches)
}

/// Find package files for a whole extension set, in extension order.
///
/// All matches for `extensions[0]` come before any match for
/// `extensions[1]`, and so on, mirroring the order conversions are run in.
pub fn scan(source_dir: &Utf8Path, extensions: &[&str]) -> Result<Vec<String>, ScanError> {
    let mut all_matches = Vec::new();

    for extension in extensions {
        all_matches.extend(scan_extension(source_dir, extension)?);
    }

    Ok(all_matches)
}
