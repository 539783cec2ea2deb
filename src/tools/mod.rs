//! External conversion programs.
//!
//! Both pipelines finish by handing files to third-party converters. Each
//! invocation runs to completion as an owned child process with its output
//! captured; a program that runs and fails is reported through
//! [`ToolOutcome`] rather than as an error, since one bad file shouldn't stop
//! the rest from converting. A program that can't be started at all is an
//! error.

mod kcc;
mod kindlegen;

pub use kcc::{display_name, Kcc};
pub use kindlegen::{ConversionReport, Kindlegen};

use anyhow::{Context, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

/// What happened when an external program ran.
#[derive(Debug, Clone)]
pub struct ToolOutcome {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutcome {
    pub fn success(&self) -> bool {
        self.status.success()
    }

    /// One-line description of a failure, for summaries.
    pub fn diagnostic(&self) -> String {
        let last_line = |s: &str| {
            s.lines()
                .map(str::trim)
                .rfind(|l| !l.is_empty())
                .map(ToString::to_string)
        };
        let detail = last_line(&self.stderr)
            .or_else(|| last_line(&self.stdout))
            .unwrap_or_else(|| "no output".to_string());
        format!("{} ({detail})", self.status)
    }
}

/// A program on disk or on `PATH`, run with explicit arguments.
#[derive(Debug, Clone)]
pub struct ExternalTool {
    pub program: PathBuf,
}

impl ExternalTool {
    pub fn new<P: Into<PathBuf>>(program: P) -> ExternalTool {
        ExternalTool {
            program: program.into(),
        }
    }

    /// Run the program to completion and capture its output.
    ///
    /// There is no timeout: a program that hangs blocks the run.
    pub fn run(&self, args: &[OsString]) -> Result<ToolOutcome> {
        log::debug!("Running {} {:?}", self.program.display(), args);
        let output = Command::new(&self.program)
            .args(args)
            .output()
            .with_context(|| format!("Failed to start {}", self.program.display()))?;

        let outcome = ToolOutcome {
            status: output.status,
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        };

        for line in outcome.stdout.lines().filter(|l| !l.trim().is_empty()) {
            log::debug!("{}: {line}", self.name());
        }
        if !outcome.success() {
            log::warn!(
                "{} exited with {}",
                self.program.display(),
                outcome.status
            );
            for line in outcome.stderr.lines().filter(|l| !l.trim().is_empty()) {
                log::warn!("{}: {line}", self.name());
            }
        }

        Ok(outcome)
    }

    fn name(&self) -> String {
        self.program
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| self.program.display().to_string())
    }
}

/// Convert a path into a command argument.
pub(crate) fn arg<P: AsRef<Path>>(path: P) -> OsString {
    path.as_ref().as_os_str().to_os_string()
}

#[cfg(all(test, unix))]
mod test {
    use super::*;

    #[test]
    fn successful_program_reports_success() {
        let outcome = ExternalTool::new("true").run(&[]).expect("can run true");
        assert!(outcome.success());
    }

    #[test]
    fn failing_program_is_an_outcome_not_an_error() {
        let outcome = ExternalTool::new("sh")
            .run(&[
                OsString::from("-c"),
                OsString::from("echo working; echo broken >&2; exit 3"),
            ])
            .expect("can run sh");
        assert!(!outcome.success());
        assert_eq!(outcome.status.code(), Some(3));
        assert_eq!(outcome.stdout.trim(), "working");
        assert!(outcome.diagnostic().contains("broken"));
    }

    #[test]
    fn missing_program_is_an_error() {
        let err = ExternalTool::new("/definitely/not/a/real/program")
            .run(&[])
            .expect_err("missing program can't start");
        assert!(format!("{err:#}").contains("Failed to start"));
    }
}
