//! Launcher core shared by the `fritz` binary.
//! Keep this crate free of terminal I/O; every external effect goes through
//! a [`fritz_process::CommandRunner`] or an [`health::HttpProbe`].
//!
//! ## Settings loading
//! ```rust
//! use fritz_domain::config::LauncherSettings;
//! use fritz_kernel::config::SettingsLoader;
//!
//! let settings: LauncherSettings = SettingsLoader::new(".").load().unwrap_or_default();
//! assert_eq!(settings.kowalski.api_port, 4000);
//! ```
pub mod compose;
pub mod config;
pub mod deps;
mod error;
pub mod health;
mod project;
pub mod readiness;
pub mod retry;
pub mod split;
pub mod token;
pub mod unified;

pub use crate::error::{KernelError, KernelErrorExt};
pub use crate::project::Project;
pub use fritz_domain as domain;
