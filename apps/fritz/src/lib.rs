//! # Fritz
//!
//! Launcher for a SkyPortal + Kowalski deployment: splits `fritz.yaml` into the
//! per-service configs, exchanges API tokens between the two services and
//! drives `git`, `docker` and `docker compose` through the lifecycle verbs.
//!
//! ```no_run
//! use clap::Parser;
//! use fritz::models::args::Cli;
//!
//! let cli = Cli::parse_from(["fritz", "-C", "/srv/fritz", "run", "--init", "--yes"]);
//! let outcome = fritz::launch(&cli)?;
//! assert_eq!(outcome, fritz::Outcome::Success);
//! # Ok::<(), anyhow::Error>(())
//! ```
#![allow(clippy::print_stdout, clippy::print_stderr)]

pub mod handlers;
pub mod models;
pub mod services;

use crate::handlers::{build, develop, doc, prune, run, stop, testing, update};
use crate::models::args::{Cli, Verb};
use crate::services::launcher::Launcher;
use crate::services::prompt::StdinPrompt;
use anyhow::{Context, Result};
use fritz_kernel::Project;
use fritz_kernel::config::SettingsLoader;
use fritz_kernel::domain::config::LauncherSettings;
use fritz_kernel::health::ReqwestProbe;
use fritz_logger::{Logger, verbosity_level};
use fritz_process::SystemRunner;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;
use tracing::info;

const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Whether a verb's checks passed. Failures here are expected results
/// (a red test suite, lint findings), not errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure,
}

impl Outcome {
    /// Failure wins.
    #[must_use]
    pub const fn and(self, other: Self) -> Self {
        match (self, other) {
            (Self::Success, Self::Success) => Self::Success,
            _ => Self::Failure,
        }
    }

    #[must_use]
    pub fn exit_code(self) -> ExitCode {
        match self {
            Self::Success => ExitCode::SUCCESS,
            Self::Failure => ExitCode::FAILURE,
        }
    }
}

/// Dispatches the parsed verb to its handler.
///
/// # Errors
/// Returns the handler's error.
pub fn dispatch(command: &Verb, launcher: &Launcher<'_>) -> Result<Outcome> {
    info!(verb = command.as_ref(), root = %launcher.project().root().display(), "Running verb");

    match command {
        Verb::Run(args) => run::run(launcher, args)?,
        Verb::Build(args) => build::build(launcher, args)?,
        Verb::Stop(args) => stop::stop(launcher, args)?,
        Verb::Update(args) => update::update(launcher, &args.source, args.init)?,
        Verb::Test(args) => return testing::run_tests(launcher, args),
        Verb::Develop => develop::develop(launcher)?,
        Verb::Lint => return develop::lint(launcher),
        Verb::Prune(args) => prune::prune(launcher, args)?,
        Verb::Doc(args) => doc::doc(launcher, args)?,
    }

    Ok(Outcome::Success)
}

/// Resolves the project root to an absolute path.
///
/// # Errors
/// Returns an error if the current directory cannot be determined.
pub fn project_root(cli: &Cli) -> Result<PathBuf> {
    std::path::absolute(&cli.root)
        .with_context(|| format!("Failed to resolve project root {}", cli.root.display()))
}

/// Loads `launcher.toml` (or `--settings`) with `FRITZ__*` overrides.
///
/// # Errors
/// Returns an error if the settings are malformed or an explicit file is missing.
pub fn load_settings(cli: &Cli, root: &Path) -> Result<LauncherSettings> {
    SettingsLoader::new(root)
        .file(cli.settings.as_ref())
        .load()
        .context("Critical: Launcher settings are malformed")
}

/// Installs the global logger: stderr always, rolling files when `paths.log_dir` is set.
///
/// # Errors
/// Returns an error if the subscriber cannot be installed.
pub fn init_logging(cli: &Cli, project: &Project) -> Result<Logger> {
    let builder = Logger::builder().name(env!("CARGO_PKG_NAME")).level(verbosity_level(cli.verbose));
    let logger = match &project.settings().paths.log_dir {
        Some(dir) => builder.path(project.path(dir)).init()?,
        None => builder.init()?,
    };
    Ok(logger)
}

/// Runs the CLI against the real system.
///
/// # Errors
/// Returns an error if settings cannot be loaded or the verb fails.
pub fn launch(cli: &Cli) -> Result<Outcome> {
    let root = project_root(cli)?;
    let settings = load_settings(cli, &root)?;
    let project = Project::new(root, settings);
    let _log = init_logging(cli, &project)?;

    let probe = ReqwestProbe::new(HTTP_TIMEOUT);
    let launcher = Launcher::new(project, &SystemRunner, &probe, &StdinPrompt);
    dispatch(&cli.command, &launcher)
}
