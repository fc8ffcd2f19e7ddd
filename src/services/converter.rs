use camino::{Utf8Path, Utf8PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::process::Command;
use tokio::time::timeout;

use crate::models::ConversionOutcome;
use crate::services::run_log::RunLog;

/// Errors that can occur while invoking the external converter.
///
/// None of these are fatal to a run: the orchestrator records the failed
/// file and moves on to the next one.
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("converter executable missing, expected at: {0}")]
    ConverterNotFound(Utf8PathBuf),

    #[error("failed to spawn converter process: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("converter timed out after {0:?}")]
    Timeout(Duration),
}

/// Drives one external UModel invocation per package file.
///
/// The call boundary is deliberately narrow: one synchronous-feeling async
/// call per file that returns an owned [`ConversionOutcome`] (captured
/// streams plus exit status), so tests can substitute any executable for the
/// real converter. Suspension happens only while waiting for the child
/// process to exit.
#[derive(Debug, Clone)]
pub struct ConverterInvoker {
    converter_path: Utf8PathBuf,
    conversion_timeout: Duration,
}

impl ConverterInvoker {
    pub fn new(converter_path: impl Into<Utf8PathBuf>, conversion_timeout: Duration) -> Self {
        Self {
            converter_path: converter_path.into(),
            conversion_timeout,
        }
    }

    pub fn converter_path(&self) -> &Utf8Path {
        &self.converter_path
    }

    /// Build the converter argv for one package file.
    ///
    /// Must stay argument-compatible with the external tool:
    /// `-export <format_flag> -path=<source> -out=<output> <package>`.
    pub fn build_command(
        &self,
        source_dir: &Utf8Path,
        output_dir: &Utf8Path,
        package_name: &str,
        format_flag: &str,
    ) -> Vec<String> {
        vec![
            "-export".to_string(),
            format_flag.to_string(),
            format!("-path={}", source_dir),
            format!("-out={}", output_dir),
            package_name.to_string(),
        ]
    }

    /// Run the converter over one package file, capturing its output.
    ///
    /// The attempt is always written to the run log (command line, then any
    /// non-empty stdout/stderr) before control returns, whether it succeeded
    /// or not. Success is exit status 0, nothing else.
    pub async fn convert(
        &self,
        source_dir: &Utf8Path,
        output_dir: &Utf8Path,
        package_name: &str,
        format_flag: &str,
        run_log: &RunLog,
    ) -> Result<ConversionOutcome, ConvertError> {
        let args = self.build_command(source_dir, output_dir, package_name, format_flag);
        run_log.append(&format!(
            "Running: {} {}",
            self.converter_path,
            args.join(" ")
        ));

        if !self.converter_path.exists() {
            run_log.append(&format!(
                "FATAL: converter executable missing, expected at: {}",
                self.converter_path
            ));
            return Err(ConvertError::ConverterNotFound(self.converter_path.clone()));
        }

        let mut command = Command::new(self.converter_path.as_std_path());
        command
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        // Don't flash a console window per invocation on Windows
        #[cfg(windows)]
        {
            const CREATE_NO_WINDOW: u32 = 0x0800_0000;
            command.creation_flags(CREATE_NO_WINDOW);
        }

        let start = Instant::now();

        let output = match timeout(self.conversion_timeout, command.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(err)) => {
                let convert_err = if err.kind() == std::io::ErrorKind::NotFound {
                    ConvertError::ConverterNotFound(self.converter_path.clone())
                } else {
                    ConvertError::Spawn(err)
                };
                run_log.append(&format!("EXCEPTION during converter call: {}", convert_err));
                return Err(convert_err);
            }
            Err(_) => {
                run_log.append(&format!(
                    "EXCEPTION during converter call: timed out after {:?}",
                    self.conversion_timeout
                ));
                return Err(ConvertError::Timeout(self.conversion_timeout));
            }
        };

        let exit_code = output.status.code().unwrap_or(-1);
        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

        if !stdout.is_empty() {
            run_log.append(&format!("UMODEL OUTPUT:\n{}", stdout));
        }
        if !stderr.is_empty() {
            run_log.append(&format!("UMODEL ERRORS:\n{}", stderr));
        }

        tracing::debug!(
            "Converter finished for {} in {:.2}s with exit code {}",
            package_name,
            start.elapsed().as_secs_f32(),
            exit_code
        );

        Ok(ConversionOutcome {
            file_name: package_name.to_string(),
            succeeded: exit_code == 0,
            stdout,
            stderr,
            exit_code,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_build_command_shape() {
        let invoker = ConverterInvoker::new("umodel/umodel", Duration::from_secs(30));

        let args = invoker.build_command(
            Utf8Path::new("/packages"),
            Utf8Path::new("/exported"),
            "Castle.utx",
            "png-export",
        );

        assert_eq!(
            args,
            vec![
                "-export",
                "png-export",
                "-path=/packages",
                "-out=/exported",
                "Castle.utx",
            ]
        );
    }

    #[test]
    fn test_build_command_preserves_spaces_in_names() {
        let invoker = ConverterInvoker::new("umodel/umodel", Duration::from_secs(30));

        let args = invoker.build_command(
            Utf8Path::new("/my packages"),
            Utf8Path::new("/out"),
            "Old Castle.usx",
            "obj-export",
        );

        // argv elements, no shell quoting needed
        assert_eq!(args[2], "-path=/my packages");
        assert_eq!(args[4], "Old Castle.usx");
    }

    #[cfg(unix)]
    fn fake_converter(dir: &TempDir, body: &str) -> Utf8PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.path().join("umodel");
        fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        let mut perms = fs::metadata(&path).unwrap().permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&path, perms).unwrap();
        Utf8PathBuf::try_from(path).unwrap()
    }

    #[cfg(unix)]
    fn temp_run_log(dir: &TempDir) -> RunLog {
        RunLog::new(Utf8PathBuf::try_from(dir.path().join("run.log")).unwrap())
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_convert_success_captures_stdout() {
        let temp_dir = TempDir::new().unwrap();
        let converter = fake_converter(&temp_dir, "echo exporting stuff; exit 0");
        let run_log = temp_run_log(&temp_dir);

        let invoker = ConverterInvoker::new(converter, Duration::from_secs(30));
        let outcome = invoker
            .convert(
                Utf8Path::new("/packages"),
                Utf8Path::new("/out"),
                "foo.utx",
                "png-export",
                &run_log,
            )
            .await
            .unwrap();

        assert!(outcome.succeeded);
        assert_eq!(outcome.exit_code, 0);
        assert_eq!(outcome.file_name, "foo.utx");
        assert!(outcome.stdout.contains("exporting stuff"));

        let log = fs::read_to_string(run_log.path()).unwrap();
        assert!(log.contains("Running:"));
        assert!(log.contains("-export png-export"));
        assert!(log.contains("UMODEL OUTPUT:"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_convert_nonzero_exit_is_failed_outcome() {
        let temp_dir = TempDir::new().unwrap();
        let converter = fake_converter(&temp_dir, "echo broken package >&2; exit 3");
        let run_log = temp_run_log(&temp_dir);

        let invoker = ConverterInvoker::new(converter, Duration::from_secs(30));
        let outcome = invoker
            .convert(
                Utf8Path::new("/packages"),
                Utf8Path::new("/out"),
                "bar.upk",
                "png-export",
                &run_log,
            )
            .await
            .unwrap();

        assert!(!outcome.succeeded);
        assert_eq!(outcome.exit_code, 3);
        assert!(outcome.stderr.contains("broken package"));

        let log = fs::read_to_string(run_log.path()).unwrap();
        assert!(log.contains("UMODEL ERRORS:"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_convert_timeout_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let converter = fake_converter(&temp_dir, "sleep 5\nexit 0");
        let run_log = temp_run_log(&temp_dir);

        let invoker = ConverterInvoker::new(converter, Duration::from_millis(200));
        let result = invoker
            .convert(
                Utf8Path::new("/packages"),
                Utf8Path::new("/out"),
                "slow.utx",
                "png-export",
                &run_log,
            )
            .await;

        assert!(matches!(result, Err(ConvertError::Timeout(_))));

        let log = fs::read_to_string(run_log.path()).unwrap();
        assert!(log.contains("Running:"));
        assert!(log.contains("timed out"));
    }

    #[tokio::test]
    async fn test_convert_missing_binary() {
        let temp_dir = TempDir::new().unwrap();
        let missing = Utf8PathBuf::try_from(temp_dir.path().join("nope/umodel")).unwrap();
        let run_log = RunLog::new(Utf8PathBuf::try_from(temp_dir.path().join("run.log")).unwrap());

        let invoker = ConverterInvoker::new(missing, Duration::from_secs(30));
        let result = invoker
            .convert(
                Utf8Path::new("/packages"),
                Utf8Path::new("/out"),
                "foo.utx",
                "png-export",
                &run_log,
            )
            .await;

        assert!(matches!(result, Err(ConvertError::ConverterNotFound(_))));

        // The attempt is still logged
        let log = fs::read_to_string(run_log.path()).unwrap();
        assert!(log.contains("Running:"));
        assert!(log.contains("FATAL: converter executable missing"));
    }
}
