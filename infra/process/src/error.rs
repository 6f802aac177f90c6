use std::borrow::Cow;

/// Errors raised while running external tools.
#[fritz_derive::fritz_error]
pub enum ProcessError {
    /// The program could not be started (usually: not installed or not on `PATH`).
    #[error("Failed to spawn process{}: {source}", format_context(.context))]
    Spawn { source: std::io::Error, context: Option<Cow<'static, str>> },

    /// The program ran and exited unsuccessfully.
    #[error("Command `{command}` failed with {}{}{}", exit_label(.code), format_context(.context), stderr_tail(.stderr))]
    Failed {
        command: String,
        code: Option<i32>,
        stderr: String,
        context: Option<Cow<'static, str>>,
    },

    /// Tool output did not match the expected grammar.
    #[error("Unexpected output{}: {message}", format_context(.context))]
    Malformed { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Anything else.
    #[error("Internal process error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl ProcessError {
    /// Exit code of a failed command, if the process exited normally.
    #[must_use]
    pub const fn exit_code(&self) -> Option<i32> {
        match self {
            Self::Failed { code, .. } => *code,
            _ => None,
        }
    }
}

fn exit_label(code: &Option<i32>) -> Cow<'static, str> {
    code.map_or(Cow::Borrowed("a signal"), |c| Cow::Owned(format!("exit code {c}")))
}

fn stderr_tail(stderr: &str) -> Cow<'_, str> {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        return Cow::Borrowed("");
    }
    let last = trimmed.lines().last().unwrap_or(trimmed);
    Cow::Owned(format!(": {last}"))
}
