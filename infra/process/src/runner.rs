use crate::command::{CommandOutput, CommandSpec};
use crate::error::{ProcessError, ProcessErrorExt};
use std::fmt::Debug;
use std::process::{Command, Stdio};
use tracing::{debug, instrument};

/// Seam between the launcher and the operating system.
///
/// Everything the launcher does to the outside world goes through one of these
/// two methods, so orchestration can be replayed against a fake in tests.
pub trait CommandRunner: Debug {
    /// Runs the command with stdout/stderr captured.
    ///
    /// # Errors
    /// [`ProcessError::Spawn`] if the program cannot be started.
    fn output(&self, spec: &CommandSpec) -> Result<CommandOutput, ProcessError>;

    /// Runs the command with stdio inherited from the launcher.
    ///
    /// # Errors
    /// [`ProcessError::Spawn`] if the program cannot be started.
    fn stream(&self, spec: &CommandSpec) -> Result<CommandOutput, ProcessError>;

    /// Streams the command and fails on a non-zero exit.
    ///
    /// # Errors
    /// [`ProcessError::Spawn`] or [`ProcessError::Failed`].
    fn check(&self, spec: &CommandSpec) -> Result<(), ProcessError> {
        let output = self.stream(spec)?;
        ensure_success(spec, output).map(drop)
    }

    /// Captures the command's stdout and fails on a non-zero exit.
    ///
    /// # Errors
    /// [`ProcessError::Spawn`] or [`ProcessError::Failed`].
    fn check_output(&self, spec: &CommandSpec) -> Result<String, ProcessError> {
        let output = self.output(spec)?;
        ensure_success(spec, output).map(|out| out.stdout)
    }
}

/// Converts an unsuccessful [`CommandOutput`] into [`ProcessError::Failed`].
///
/// # Errors
/// [`ProcessError::Failed`] when the exit code is not zero.
pub fn ensure_success(
    spec: &CommandSpec,
    output: CommandOutput,
) -> Result<CommandOutput, ProcessError> {
    if output.success() {
        return Ok(output);
    }
    Err(ProcessError::Failed {
        command: spec.command_line(),
        code: output.code,
        stderr: output.stderr,
        context: None,
    })
}

/// [`CommandRunner`] backed by [`std::process::Command`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl SystemRunner {
    fn command(spec: &CommandSpec) -> Command {
        let mut cmd = Command::new(spec.program());
        cmd.args(spec.arguments());
        if let Some(dir) = spec.cwd() {
            cmd.current_dir(dir);
        }
        cmd
    }
}

impl CommandRunner for SystemRunner {
    #[instrument(level = "debug", skip_all, fields(command = %spec))]
    fn output(&self, spec: &CommandSpec) -> Result<CommandOutput, ProcessError> {
        let output = Self::command(spec)
            .stdin(Stdio::null())
            .output()
            .context(format!("`{}`. Is it installed and in your PATH?", spec.program()))?;

        let result = CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        debug!(code = ?result.code, "Process finished");
        Ok(result)
    }

    #[instrument(level = "debug", skip_all, fields(command = %spec))]
    fn stream(&self, spec: &CommandSpec) -> Result<CommandOutput, ProcessError> {
        let status = Self::command(spec)
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .context(format!("`{}`. Is it installed and in your PATH?", spec.program()))?;

        debug!(code = ?status.code(), "Process finished");
        Ok(CommandOutput { code: status.code(), ..CommandOutput::default() })
    }
}
