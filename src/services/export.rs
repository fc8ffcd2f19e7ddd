use camino::Utf8PathBuf;
use std::fs;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;

use crate::models::{ExportRequest, ExporterSettings, RunSummary};
use crate::services::converter::{ConvertError, ConverterInvoker};
use crate::services::run_log::RunLog;
use crate::services::scanner::{self, ScanError};

/// Fatal run-level errors.
///
/// Pre-flight failures abort before the run log is touched; a scan failure
/// aborts mid-run since no further files can be discovered. Per-file
/// conversion failures are never fatal and never appear here, they are only
/// visible in the run log and the final processed count.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("source directory is not set")]
    EmptySourceDir,

    #[error("output directory is not set")]
    EmptyOutputDir,

    #[error("source directory does not exist: {0}")]
    SourceDirNotFound(Utf8PathBuf),

    #[error("converter executable missing, expected at: {0}")]
    ConverterNotFound(Utf8PathBuf),

    #[error("failed to create output directory {dir}: {source}")]
    CreateOutputDir {
        dir: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Scan(#[from] ScanError),
}

/// Handle for aborting a run between file conversions.
///
/// Cancellation is checked before each invocation, never during one: an
/// in-flight converter process cannot be cleanly interrupted, so a cancelled
/// run finishes the current file, writes a cancelled banner, and returns the
/// summary accumulated so far. A token cancelled before `run` is entered
/// takes effect immediately (no file is attempted). The caller owns the
/// token's lifecycle: it stays cancelled until [`reset`](Self::reset).
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Clear a previous cancellation so the token (and any service holding
    /// it) can be used for another run.
    pub fn reset(&self) {
        self.cancelled.store(false, Ordering::SeqCst);
    }
}

/// Top-level driver of a batch export run.
///
/// Owns the run log and the converter invoker; the presentation layer only
/// supplies an [`ExportRequest`] and consumes the returned [`RunSummary`]
/// (plus the run log on disk). One service handles one run at a time.
pub struct ExportService {
    invoker: ConverterInvoker,
    run_log: RunLog,
    cancel: CancelToken,
}

impl ExportService {
    pub fn new(settings: ExporterSettings) -> Self {
        Self {
            invoker: ConverterInvoker::new(settings.converter_path, settings.conversion_timeout),
            run_log: RunLog::new(settings.run_log_path),
            cancel: CancelToken::new(),
        }
    }

    pub fn run_log(&self) -> &RunLog {
        &self.run_log
    }

    /// Clone a handle the presentation layer can use to abort the run.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Pre-flight validation, callable by the presentation layer before
    /// committing the user to a run.
    ///
    /// Read-only and idempotent: no log mutation, no directory creation,
    /// nothing tallied. Checks paths are non-empty, the converter binary is
    /// where it is expected, and the source directory exists.
    pub fn validate(&self, request: &ExportRequest) -> Result<(), ExportError> {
        if request.source_dir.as_str().is_empty() {
            return Err(ExportError::EmptySourceDir);
        }
        if request.output_dir.as_str().is_empty() {
            return Err(ExportError::EmptyOutputDir);
        }
        if !self.invoker.converter_path().exists() {
            return Err(ExportError::ConverterNotFound(
                self.invoker.converter_path().to_path_buf(),
            ));
        }
        if !request.source_dir.is_dir() {
            return Err(ExportError::SourceDirNotFound(request.source_dir.clone()));
        }
        Ok(())
    }

    /// Execute one complete export run.
    ///
    /// Validates, ensures the output directory exists, clears the run log,
    /// then walks the kind's extensions in order, converting each matching
    /// file in scan order. `files_processed` counts exit-code-0 conversions
    /// only; failed files are recorded in the run log and skipped, never
    /// retried.
    ///
    /// If the converter binary goes missing mid-run the run keeps attempting
    /// the remaining files (each gets its own run-log entry) but the error
    /// is surfaced through `tracing` only once per run.
    pub async fn run(&self, request: ExportRequest) -> Result<RunSummary, ExportError> {
        self.validate(&request)?;

        fs::create_dir_all(request.output_dir.as_std_path()).map_err(|source| {
            ExportError::CreateOutputDir {
                dir: request.output_dir.clone(),
                source,
            }
        })?;

        let profile = request.kind.profile();

        self.run_log.clear();
        self.run_log.append(&format!("=== {} START ===", profile.label));
        self.run_log.append(&format!("SOURCE: {}", request.source_dir));
        self.run_log.append(&format!("OUTPUT: {}", request.output_dir));

        tracing::info!(
            "Starting {}: {} -> {}",
            profile.label,
            request.source_dir,
            request.output_dir
        );

        let mut files_processed = 0usize;
        let mut converter_missing_reported = false;
        let mut cancelled = false;

        'extensions: for extension in profile.extensions {
            self.run_log.append(&format!("Looking for .{} files...", extension));

            let files = match scanner::scan_extension(&request.source_dir, extension) {
                Ok(files) => files,
                Err(err) => {
                    self.run_log.append(&format!("FATAL: {}", err));
                    return Err(err.into());
                }
            };

            for file_name in files {
                if self.cancel.is_cancelled() {
                    tracing::warn!("Export cancelled before converting {}", file_name);
                    cancelled = true;
                    break 'extensions;
                }

                let result = self
                    .invoker
                    .convert(
                        &request.source_dir,
                        &request.output_dir,
                        &file_name,
                        profile.format_flag,
                        &self.run_log,
                    )
                    .await;

                match result {
                    Ok(outcome) if outcome.succeeded => {
                        files_processed += 1;
                        self.run_log.append(&format!("OK: {}", file_name));
                    }
                    Ok(outcome) => {
                        self.run_log.append(&format!(
                            "FAILED: {} (exit code {})",
                            file_name, outcome.exit_code
                        ));
                    }
                    Err(err @ ConvertError::ConverterNotFound(_)) => {
                        if !converter_missing_reported {
                            tracing::error!("{}", err);
                            converter_missing_reported = true;
                        }
                        self.run_log.append(&format!("FAILED: {}", file_name));
                    }
                    Err(err) => {
                        tracing::warn!("Conversion of {} failed: {}", file_name, err);
                        self.run_log.append(&format!("FAILED: {}", file_name));
                    }
                }
            }
        }

        if cancelled {
            self.run_log
                .append(&format!("=== EXPORT CANCELLED ({} files) ===", files_processed));
        } else {
            self.run_log
                .append(&format!("=== EXPORT COMPLETE ({} files) ===", files_processed));
        }

        tracing::info!("{} finished, {} files processed", profile.label, files_processed);

        Ok(RunSummary {
            kind: request.kind,
            source_dir: request.source_dir,
            output_dir: request.output_dir,
            files_processed,
        })
    }
}
