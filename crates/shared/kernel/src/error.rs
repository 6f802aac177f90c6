use fritz_process::ProcessError;
use std::borrow::Cow;

/// Errors raised by the launcher core.
#[fritz_derive::fritz_error]
pub enum KernelError {
    /// Something the user must fix before the launcher can proceed.
    #[error("Missing prerequisite{}: {message}", format_context(.context))]
    Prerequisite { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The unified config lacks a value the launcher needs.
    #[error("Invalid configuration{}: {message}", format_context(.context))]
    Config { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A readiness poll or retried step ran out of attempts.
    #[error("Timed out waiting for {what} after {attempts} attempts{}", format_context(.context))]
    Timeout { what: Cow<'static, str>, attempts: u32, context: Option<Cow<'static, str>> },

    /// A token could not be produced or read back.
    #[error("Token error{}: {message}", format_context(.context))]
    Token { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("JWT error{}: {source}", format_context(.context))]
    Jwt { source: jsonwebtoken::errors::Error, context: Option<Cow<'static, str>> },

    #[error("{source}{}", format_context(.context))]
    Process { source: ProcessError, context: Option<Cow<'static, str>> },

    #[error("YAML error{}: {source}", format_context(.context))]
    Yaml { source: serde_yaml::Error, context: Option<Cow<'static, str>> },

    #[error("IO error{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("HTTP error{}: {source}", format_context(.context))]
    Http { source: reqwest::Error, context: Option<Cow<'static, str>> },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl KernelError {
    pub fn prerequisite(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Prerequisite { message: message.into(), context: None }
    }

    pub fn config(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Config { message: message.into(), context: None }
    }

    pub fn token(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Token { message: message.into(), context: None }
    }

    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}
