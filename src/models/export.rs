use camino::Utf8PathBuf;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// The user-selected export category.
///
/// Each kind maps to a fixed set of package-file extensions and an output
/// format flag for the converter, see [`KindProfile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportKind {
    Textures,
    Meshes,
}

/// Static per-kind configuration: which extensions to scan for, which format
/// flag to pass to the converter, and the human-readable run label.
#[derive(Debug, Clone, Copy)]
pub struct KindProfile {
    /// Lowercase package-file extensions, scanned in this order
    pub extensions: &'static [&'static str],

    /// Value for the converter's `-export` flag
    pub format_flag: &'static str,

    /// Label used in run-log banners and completion notices
    pub label: &'static str,
}

const TEXTURES_PROFILE: KindProfile = KindProfile {
    extensions: &["utx", "upk"],
    format_flag: "png-export",
    label: "Texture Export",
};

const MESHES_PROFILE: KindProfile = KindProfile {
    extensions: &["usx", "unr"],
    format_flag: "obj-export",
    label: "Mesh/Map Export",
};

impl ExportKind {
    /// Resolve this kind to its static profile.
    pub fn profile(self) -> &'static KindProfile {
        match self {
            ExportKind::Textures => &TEXTURES_PROFILE,
            ExportKind::Meshes => &MESHES_PROFILE,
        }
    }
}

impl fmt::Display for ExportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportKind::Textures => write!(f, "textures"),
            ExportKind::Meshes => write!(f, "meshes"),
        }
    }
}

impl FromStr for ExportKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "textures" => Ok(ExportKind::Textures),
            "meshes" => Ok(ExportKind::Meshes),
            other => Err(format!(
                "unknown export kind '{}' (expected 'textures' or 'meshes')",
                other
            )),
        }
    }
}

/// One user-initiated export run, as supplied by the presentation layer.
///
/// Both paths must be non-empty and the source directory must exist at
/// validation time; the output directory is created at run start if absent.
/// Immutable for the duration of the run.
#[derive(Debug, Clone)]
pub struct ExportRequest {
    pub source_dir: Utf8PathBuf,
    pub output_dir: Utf8PathBuf,
    pub kind: ExportKind,
}

/// Result of a single converter invocation.
///
/// Produced once per package file by the invoker, consumed by the run log
/// and the orchestrator's tally; not retained after the run.
#[derive(Debug, Clone)]
pub struct ConversionOutcome {
    pub file_name: String,
    pub succeeded: bool,
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

/// Final report of a completed export run.
///
/// `files_processed` counts only conversions that exited with status 0; a
/// lower-than-expected count is the run-level signal of partial failure, the
/// run log has the per-file detail.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub kind: ExportKind,
    pub source_dir: Utf8PathBuf,
    pub output_dir: Utf8PathBuf,
    pub files_processed: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_textures_profile() {
        let profile = ExportKind::Textures.profile();
        assert_eq!(profile.extensions, &["utx", "upk"]);
        assert_eq!(profile.format_flag, "png-export");
        assert_eq!(profile.label, "Texture Export");
    }

    #[test]
    fn test_meshes_profile() {
        let profile = ExportKind::Meshes.profile();
        assert_eq!(profile.extensions, &["usx", "unr"]);
        assert_eq!(profile.format_flag, "obj-export");
        assert_eq!(profile.label, "Mesh/Map Export");
    }

    #[test]
    fn test_kind_from_str() {
        assert_eq!("textures".parse::<ExportKind>().unwrap(), ExportKind::Textures);
        assert_eq!("Meshes".parse::<ExportKind>().unwrap(), ExportKind::Meshes);
        assert!("sounds".parse::<ExportKind>().is_err());
    }

    #[test]
    fn test_kind_display_round_trip() {
        for kind in [ExportKind::Textures, ExportKind::Meshes] {
            assert_eq!(kind.to_string().parse::<ExportKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_summary_serializes() {
        let summary = RunSummary {
            kind: ExportKind::Textures,
            source_dir: Utf8PathBuf::from("/packages"),
            output_dir: Utf8PathBuf::from("/exported"),
            files_processed: 2,
        };

        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("\"kind\":\"textures\""));
        assert!(json.contains("\"files_processed\":2"));
    }
}
