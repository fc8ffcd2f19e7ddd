//! umex - Mass exporter for Unreal Engine package files via UModel
//!
//! CLI entry point. This is the presentation layer: it collects the source
//! directory, output directory, and asset kind, hands them to the export
//! service, and reports the completion notice. All process/state/failure
//! handling lives in the library's services layer.
//!
//! # Execution Flow
//!
//! 1. Parse arguments (clap)
//! 2. Initialize diagnostic logging → logs/umex.<date>
//! 3. Create the tokio runtime for subprocess execution
//! 4. Pre-flight validation (fails fast, before anything is touched)
//! 5. Run the export, with Ctrl-C wired to the cancel token
//! 6. Print the summary (human-readable or JSON)

use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use clap::Parser;
use std::time::Duration;

use umex::models::{ExportKind, ExportRequest, ExporterSettings};
use umex::services::ExportService;
use umex::{APP_NAME, VERSION};

#[derive(Parser, Debug)]
#[command(name = "umex", version, about = "Batch-export Unreal package files via UModel")]
struct Cli {
    /// Directory containing the package files to export
    #[arg(short, long)]
    source: Utf8PathBuf,

    /// Directory the exported assets are written into (created if absent)
    #[arg(short, long)]
    out: Utf8PathBuf,

    /// Asset kind to export: textures (*.utx, *.upk → PNG) or meshes (*.usx, *.unr → OBJ)
    #[arg(short, long)]
    kind: ExportKind,

    /// Override the converter executable location
    #[arg(long)]
    converter: Option<Utf8PathBuf>,

    /// Override the run-log file location
    #[arg(long)]
    log_file: Option<Utf8PathBuf>,

    /// Per-file conversion timeout in seconds
    #[arg(long, default_value_t = 300)]
    timeout: u64,

    /// Print the run summary as JSON
    #[arg(long)]
    json: bool,

    /// Enable debug-level diagnostic logging
    #[arg(long)]
    debug: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Keep stdout clean for the JSON summary when requested
    let _log_guard = umex::logging::setup_logging("logs", APP_NAME, cli.debug, !cli.json)?;

    tracing::info!("Starting {} v{}", APP_NAME, VERSION);

    let mut settings = ExporterSettings::default();
    if let Some(converter) = cli.converter {
        settings.converter_path = converter;
    }
    if let Some(log_file) = cli.log_file {
        settings.run_log_path = log_file;
    }
    settings.conversion_timeout = Duration::from_secs(cli.timeout);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .worker_threads(2)
        .thread_name("umex-worker")
        .build()
        .context("Failed to create async runtime")?;

    let service = ExportService::new(settings);
    let request = ExportRequest {
        source_dir: cli.source,
        output_dir: cli.out,
        kind: cli.kind,
    };

    service
        .validate(&request)
        .context("Pre-flight validation failed")?;

    // A long run can only be aborted between files; Ctrl-C requests that
    let cancel = service.cancel_token();
    runtime.spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Ctrl-C received, cancelling after the current file");
            cancel.cancel();
        }
    });

    let run_log_path = service.run_log().path().to_path_buf();
    let summary = runtime.block_on(service.run(request))?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("Finished exporting.");
        println!("Files processed: {}", summary.files_processed);
        println!(
            "Check {} and {} for details.",
            summary.output_dir, run_log_path
        );
    }

    runtime.shutdown_timeout(Duration::from_secs(5));
    Ok(())
}
