//! Data models for the umex export core.
//!
//! This module contains the plain data structures shared between the services
//! layer and the presentation layer:
//! - [`ExportRequest`]: One user-initiated run (source, output, kind)
//! - [`ExportKind`] / [`KindProfile`]: The static kind → extensions/format table
//! - [`ConversionOutcome`]: Result of a single converter invocation
//! - [`RunSummary`]: Final report handed back to the presentation layer
//! - [`ExporterSettings`]: In-process runtime knobs (converter path, run-log path, timeout)
//!
//! # Architecture Note
//!
//! The models carry no behavior beyond lookups and formatting. Everything here
//! is owned by value: the orchestrator owns the [`ExportRequest`] for the run's
//! lifetime, outcomes are transient, and the summary is handed off on
//! completion. There is no persisted configuration.

pub mod export;
pub mod settings;

pub use export::{ConversionOutcome, ExportKind, ExportRequest, KindProfile, RunSummary};
pub use settings::{
    DEFAULT_CONVERSION_TIMEOUT, DEFAULT_CONVERTER_BIN, DEFAULT_RUN_LOG, ExporterSettings,
};
