//! # Process
//!
//! Everything the launcher runs on the host goes through [`CommandRunner`].
//! [`SystemRunner`] is the real implementation; typed helpers build the
//! invocations for `docker` ([`Docker`]), `docker compose` ([`DockerCompose`])
//! and `git` ([`Git`]).
//!
//! With the `testing` feature, [`ScriptedRunner`] replays canned outputs and
//! records every invocation.
//!
//! ```rust,no_run
//! use fritz_process::{Docker, SystemRunner};
//!
//! let docker = Docker::new(&SystemRunner);
//! for container in docker.containers()? {
//!     println!("{} up={}", container.name, container.is_up());
//! }
//! # Ok::<(), fritz_process::ProcessError>(())
//! ```

mod command;
pub mod containers;
mod docker;
mod error;
mod git;
mod runner;
#[cfg(any(test, feature = "testing"))]
mod scripted;

pub use crate::command::{CommandOutput, CommandSpec};
pub use crate::containers::{ContainerState, missing_containers, parse_ps};
pub use crate::docker::{Docker, DockerCompose};
pub use crate::error::{ProcessError, ProcessErrorExt};
pub use crate::git::Git;
pub use crate::runner::{CommandRunner, SystemRunner, ensure_success};
#[cfg(any(test, feature = "testing"))]
pub use crate::scripted::ScriptedRunner;
