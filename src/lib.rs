// umex - Mass exporter for Unreal Engine package files via UModel
//
// This is the library crate containing the export core and data structures.
// The binary crate (main.rs) provides the CLI entry point.

pub mod logging;
pub mod models;
pub mod services;

// Re-export commonly used types for convenience
pub use models::{ExportKind, ExportRequest, ExporterSettings, RunSummary};
pub use services::{ExportError, ExportService};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
