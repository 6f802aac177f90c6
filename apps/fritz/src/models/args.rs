//! # CLI Argument Definitions
//!
//! One subcommand per lifecycle verb; flags shared by `run` and `build` live in
//! [`LaunchArgs`].

use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;
use strum_macros::AsRefStr;

/// The main CLI structure parsing command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "fritz")]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(arg_required_else_help = true)]
#[command(about = "Build, launch and test a SkyPortal + Kowalski deployment")]
pub struct Cli {
    /// Project root containing fritz.yaml and the submodules
    #[arg(short = 'C', long = "root", global = true, default_value = ".")]
    pub root: PathBuf,

    /// Launcher settings file, relative to the current directory (default: launcher.toml in the project root, optional)
    #[arg(long, global = true)]
    pub settings: Option<PathBuf>,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Verb,
}

#[derive(Debug, Subcommand, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum Verb {
    /// Build everything and start the deployment
    Run(LaunchArgs),
    /// Build the container images
    Build(LaunchArgs),
    /// Stop the deployment
    Stop(StopArgs),
    /// Pull the latest changes and update submodules
    Update(UpdateArgs),
    /// Run the SkyPortal and Kowalski test suites against a running deployment
    Test(TestArgs),
    /// Install the pre-commit hooks
    Develop,
    /// Run the linters on all files
    Lint,
    /// Remove unused docker images, containers, networks and volumes
    Prune(ConfirmArgs),
    /// Build the documentation
    Doc(ConfirmArgs),
}

/// Flags shared by `run` and `build`.
#[derive(Debug, Clone, Default, Args)]
pub struct LaunchArgs {
    /// First-time setup: load seed data and exchange tokens
    #[arg(long)]
    pub init: bool,

    /// Expose SkyPortal through traefik
    #[arg(long)]
    pub traefik: bool,

    /// Leave Kowalski out
    #[arg(long)]
    pub no_kowalski: bool,

    /// Pull the latest changes first
    #[arg(long)]
    pub update: bool,

    #[command(flatten)]
    pub source: SourceArgs,

    /// Do not touch the git submodules
    #[arg(long)]
    pub skip_submodules: bool,

    /// Answer yes to every question
    #[arg(short, long)]
    pub yes: bool,
}

/// Where `update` pulls from.
#[derive(Debug, Clone, Args)]
pub struct SourceArgs {
    /// Remote to pull from
    #[arg(long, default_value = "origin")]
    pub repo: String,

    /// Branch to pull
    #[arg(long, default_value = "main")]
    pub branch: String,
}

impl Default for SourceArgs {
    fn default() -> Self {
        Self { repo: "origin".to_owned(), branch: "main".to_owned() }
    }
}

#[derive(Debug, Clone, Default, Args)]
pub struct StopArgs {
    /// Leave Kowalski running
    #[arg(long)]
    pub no_kowalski: bool,
}

#[derive(Debug, Clone, Default, Args)]
pub struct UpdateArgs {
    /// Initialize submodules recursively
    #[arg(long)]
    pub init: bool,

    #[command(flatten)]
    pub source: SourceArgs,
}

#[derive(Debug, Clone, Default, Args)]
pub struct TestArgs {
    /// Only test SkyPortal
    #[arg(long)]
    pub no_kowalski: bool,
}

#[derive(Debug, Clone, Default, Args)]
pub struct ConfirmArgs {
    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}
