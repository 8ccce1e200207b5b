//! Running external programs and capturing their output.

use std::fmt::Write;

use miette::miette;
use miette::Context;
use miette::IntoDiagnostic;
use tracing::instrument;

use crate::clonable_command::ClonableCommand;
use crate::command_ext::CommandExt;

/// Runs commands to completion and captures their standard output.
pub trait Runner {
    /// Run the command once, blocking until it exits, and return its stdout.
    ///
    /// Fails if the command can't be started, exits unsuccessfully, or prints something that isn't
    /// UTF-8.
    fn stdout(&self, command: &ClonableCommand) -> miette::Result<String>;
}

/// A [`Runner`] which runs commands as child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl Runner for SystemRunner {
    #[instrument(level = "debug", skip_all, fields(command = %command))]
    fn stdout(&self, command: &ClonableCommand) -> miette::Result<String> {
        let mut std_command = command.as_std();
        let command_formatted = std_command.display();
        let output = std_command
            .output()
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to execute `{command_formatted}`"))?;

        let status = output.status;
        if !status.success() {
            let mut message = format!("`{command_formatted}` failed: {status}");

            let stderr = String::from_utf8_lossy(&output.stderr);
            let stderr = stderr.trim();
            if !stderr.is_empty() {
                write!(message, "\n\nStderr: {stderr}").expect("Writing to a `String` never fails");
            }

            return Err(miette!("{message}"));
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        let stderr = stderr.trim();
        if !stderr.is_empty() {
            tracing::debug!("`{command_formatted}` printed to stderr:\n{stderr}");
        }

        String::from_utf8(output.stdout)
            .into_diagnostic()
            .wrap_err_with(|| format!("`{command_formatted}` printed invalid UTF-8"))
    }
}

#[cfg(all(test, unix))]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_stdout() {
        let command = ClonableCommand::new("sh")
            .args(["-c", "printf '%s\\n' \"$GREETING\""])
            .env("GREETING", "hello");
        assert_eq!(SystemRunner.stdout(&command).unwrap(), "hello\n");
    }

    #[test]
    fn test_stdout_current_dir() {
        let dir = tempfile::tempdir().unwrap();
        let dir_path = dir.path().canonicalize().unwrap();
        let command = ClonableCommand::new("pwd").current_dir(
            camino::Utf8PathBuf::from_path_buf(dir_path.clone()).unwrap(),
        );
        assert_eq!(
            SystemRunner.stdout(&command).unwrap().trim(),
            dir_path.to_str().unwrap()
        );
    }

    #[test]
    fn test_stdout_failure() {
        let command = ClonableCommand::new("sh").args(["-c", "echo oh no >&2; exit 3"]);
        let err = SystemRunner.stdout(&command).unwrap_err().to_string();
        assert!(err.contains("failed: exit status: 3"), "{err}");
        assert!(err.contains("Stderr: oh no"), "{err}");
    }

    #[test]
    fn test_stdout_missing_program() {
        let command = ClonableCommand::new("pls-docs-this-program-does-not-exist");
        let err = SystemRunner.stdout(&command).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to execute `pls-docs-this-program-does-not-exist`"
        );
    }
}
