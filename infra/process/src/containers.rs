//! Container listing grammar.
//!
//! `docker ps -a --format` is asked for [`PS_FORMAT`], which yields one
//! container per line:
//!
//! ```text
//! line   := NAME TAB STATUS
//! NAME   := non-empty text without TAB
//! STATUS := free text, e.g. "Up 3 minutes" or "Exited (0) 2 hours ago"
//! ```
//!
//! Blank lines are skipped; a non-blank line without a TAB is malformed.

use crate::error::ProcessError;

/// Go template handed to `docker ps --format`.
pub const PS_FORMAT: &str = "{{.Names}}\t{{.Status}}";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerState {
    pub name: String,
    pub status: String,
}

impl ContainerState {
    /// Docker reports running containers as `Up <duration>` (possibly followed
    /// by a health suffix).
    #[must_use]
    pub fn is_up(&self) -> bool {
        self.status == "Up" || self.status.starts_with("Up ")
    }
}

/// Parses `docker ps` output produced with [`PS_FORMAT`].
///
/// # Errors
/// [`ProcessError::Malformed`] for a line that does not follow the grammar.
pub fn parse_ps(output: &str) -> Result<Vec<ContainerState>, ProcessError> {
    output
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            let Some((name, status)) = line.split_once('\t') else {
                return Err(ProcessError::Malformed {
                    message: format!("expected `NAME<TAB>STATUS`, got {line:?}").into(),
                    context: Some("docker ps".into()),
                });
            };
            let name = name.trim();
            if name.is_empty() {
                return Err(ProcessError::Malformed {
                    message: format!("empty container name in {line:?}").into(),
                    context: Some("docker ps".into()),
                });
            }
            Ok(ContainerState { name: name.to_owned(), status: status.trim().to_owned() })
        })
        .collect()
}

/// Names from `expected` that are not listed as up in `states`.
#[must_use]
pub fn missing_containers<'a>(states: &[ContainerState], expected: &'a [String]) -> Vec<&'a str> {
    expected
        .iter()
        .filter(|name| !states.iter().any(|state| &state.name == *name && state.is_up()))
        .map(String::as_str)
        .collect()
}
