//! Checks that required host tools are installed and recent enough.

use crate::error::KernelError;
use fritz_domain::config::DependencySpec;
use fritz_process::{CommandRunner, CommandSpec};
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;
use tracing::{debug, info};

static VERSION: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(\d+)\.(\d+)(?:\.(\d+))?").ok());

/// `MAJOR.MINOR[.PATCH]`, ordered numerically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl Version {
    /// First version number found in `text`, e.g. `Docker version 24.0.7, build afdd53b`.
    #[must_use]
    pub fn find(text: &str) -> Option<Self> {
        let caps = VERSION.as_ref()?.captures(text)?;
        let part = |i: usize| caps.get(i).map_or(Some(0), |m| m.as_str().parse().ok());
        Some(Self { major: part(1)?, minor: part(2)?, patch: part(3)? })
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Why a dependency failed the check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DependencyProblem {
    Missing,
    Unparseable(String),
    TooOld { found: Version, required: Version },
}

impl fmt::Display for DependencyProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => f.write_str("not installed"),
            Self::Unparseable(output) => write!(f, "could not read a version from {output:?}"),
            Self::TooOld { found, required } => write!(f, "found {found}, need {required}+"),
        }
    }
}

/// Verifies one dependency.
///
/// # Errors
/// The problem found, if any.
pub fn check_dependency(
    runner: &dyn CommandRunner,
    dependency: &DependencySpec,
) -> Result<Version, DependencyProblem> {
    let Some((program, args)) = dependency.command.split_first() else {
        return Err(DependencyProblem::Missing);
    };
    let required = Version::find(&dependency.min_version)
        .ok_or_else(|| DependencyProblem::Unparseable(dependency.min_version.clone()))?;

    let output = runner
        .output(&CommandSpec::new(program.as_str()).args(args.iter().map(String::as_str)))
        .map_err(|_| DependencyProblem::Missing)?;
    if !output.success() {
        return Err(DependencyProblem::Missing);
    }

    let text = format!("{}{}", output.stdout, output.stderr);
    let found = Version::find(&text).ok_or_else(|| DependencyProblem::Unparseable(text.trim().to_owned()))?;
    if found < required {
        return Err(DependencyProblem::TooOld { found, required });
    }
    debug!(dependency = %dependency.name, version = %found, "Dependency ok");
    Ok(found)
}

/// Verifies every dependency and reports all failures at once.
///
/// # Errors
/// [`KernelError::Prerequisite`] listing each failed dependency.
pub fn check_dependencies(
    runner: &dyn CommandRunner,
    dependencies: &[DependencySpec],
) -> Result<(), KernelError> {
    let failures: Vec<String> = dependencies
        .iter()
        .filter_map(|dep| check_dependency(runner, dep).err().map(|problem| format!("{}: {problem}", dep.name)))
        .collect();

    if failures.is_empty() {
        info!(count = dependencies.len(), "All dependencies satisfied");
        return Ok(());
    }
    Err(KernelError::prerequisite(format!("unmet dependencies: {}", failures.join("; "))))
}
