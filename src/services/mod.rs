//! Services module - Pure business logic for batch asset export.
//!
//! This module contains the whole export core: scanning a source directory
//! for package files, driving one external UModel process per file, keeping
//! the user-facing run log, and tallying the run summary. The services are
//! **framework-agnostic** and have no dependencies on the presentation
//! layer, making them testable and reusable.
//!
//! # Components
//!
//! - [`ExportService`]: The top-level orchestrator. Validates a request,
//!   clears the run log, walks extensions → matching files → conversions,
//!   and returns the final [`crate::models::RunSummary`].
//! - [`ConverterInvoker`]: Builds and executes one converter invocation per
//!   package file, capturing stdout/stderr and the exit status.
//! - [`scanner`]: Single-level, case-insensitive extension matching with
//!   sorted, reproducible ordering.
//! - [`RunLog`]: Append-only timestamped log file, truncated at run start;
//!   best-effort by design so logging problems never block an export.
//!
//! # Control flow
//!
//! Orchestrator → scanner (per extension) → invoker (per file) → run log
//! (continuously). Data flows downward only; the orchestrator reports back
//! to the caller solely through the returned summary and raised errors.
//!
//! # Usage Example
//!
//! ```ignore
//! use umex::models::{ExportKind, ExportRequest, ExporterSettings};
//! use umex::services::ExportService;
//!
//! let service = ExportService::new(ExporterSettings::default());
//! let request = ExportRequest {
//!     source_dir: "packages".into(),
//!     output_dir: "exported".into(),
//!     kind: ExportKind::Textures,
//! };
//!
//! service.validate(&request)?;
//! let summary = service.run(request).await?;
//! println!("processed {} files", summary.files_processed);
//! ```

pub mod converter;
pub mod export;
pub mod run_log;
pub mod scanner;

pub use converter::{ConvertError, ConverterInvoker};
pub use export::{CancelToken, ExportError, ExportService};
pub use run_log::RunLog;
pub use scanner::{ScanError, scan, scan_extension};
