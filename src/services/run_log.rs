use camino::{Utf8Path, Utf8PathBuf};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::sync::Mutex;

/// User-facing run log: an append-only text file of timestamped lines.
///
/// This is the artifact the user is pointed at after a run ("check the log
/// for details"), distinct from the developer-facing `tracing` output. It is
/// truncated at the start of every run; prior content is discarded, not
/// archived.
///
/// Logging is strictly best-effort: a log file that cannot be written or
/// cleared must never block or fail the export itself, so all I/O errors are
/// swallowed after a `tracing` warning. Writes are serialized through an
/// internal mutex so concurrent callers cannot interleave partial lines.
#[derive(Debug)]
pub struct RunLog {
    path: Utf8PathBuf,
    write_lock: Mutex<()>,
}

impl RunLog {
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Path of the underlying log file.
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Discard all prior log content.
    ///
    /// Tolerates the file being absent or undeletable; a cleanup problem
    /// must not stop a run from starting.
    pub fn clear(&self) {
        // A poisoned lock only means another writer panicked; keep logging
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Err(err) = fs::remove_file(&self.path) {
            if err.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!("Could not clear run log {}: {}", self.path, err);
            }
        }
    }

    /// Append one timestamped line.
    ///
    /// Format: `[YYYY-MM-DD HH:MM:SS] <message>`. The message may itself
    /// contain newlines (captured converter output is logged as a block).
    pub fn append(&self, message: &str) {
        let line = format!(
            "{} {}",
            chrono::Local::now().format("[%Y-%m-%d %H:%M:%S]"),
            message
        );

        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let result = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.path.as_std_path())
            .and_then(|mut file| writeln!(file, "{}", line));

        if let Err(err) = result {
            tracing::warn!("Could not append to run log {}: {}", self.path, err);
        }
    }
}
