use camino::Utf8PathBuf;
use std::time::Duration;

/// Relative path to the bundled UModel executable.
#[cfg(windows)]
pub const DEFAULT_CONVERTER_BIN: &str = "umodel/umodel.exe";
#[cfg(not(windows))]
pub const DEFAULT_CONVERTER_BIN: &str = "umodel/umodel";

/// Relative path of the user-facing run log.
pub const DEFAULT_RUN_LOG: &str = "umodel_export_log.txt";

/// Upper bound on a single conversion before it is abandoned.
pub const DEFAULT_CONVERSION_TIMEOUT: Duration = Duration::from_secs(300);

/// Runtime knobs for the export service.
///
/// There is no persisted configuration: these start from the defaults above
/// and are only ever overridden in-process (CLI flags, tests). The static
/// extension/format table lives in [`crate::models::KindProfile`].
#[derive(Debug, Clone)]
pub struct ExporterSettings {
    /// Path to the external converter executable
    pub converter_path: Utf8PathBuf,

    /// Path of the run log, truncated at the start of each run
    pub run_log_path: Utf8PathBuf,

    /// Per-invocation timeout for the converter process
    pub conversion_timeout: Duration,
}

impl Default for ExporterSettings {
    fn default() -> Self {
        Self {
            converter_path: Utf8PathBuf::from(DEFAULT_CONVERTER_BIN),
            run_log_path: Utf8PathBuf::from(DEFAULT_RUN_LOG),
            conversion_timeout: DEFAULT_CONVERSION_TIMEOUT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_defaults() {
        let settings = ExporterSettings::default();
        assert_eq!(settings.run_log_path, Utf8PathBuf::from("umodel_export_log.txt"));
        assert_eq!(settings.conversion_timeout, Duration::from_secs(300));
        assert!(settings.converter_path.as_str().starts_with("umodel/"));
    }
}
