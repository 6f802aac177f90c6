//! Names shared across the launcher.

use strum_macros::{Display, EnumIter};

/// Top-level key of the web application section in `fritz.yaml`.
pub const SKYPORTAL: &str = "skyportal";
/// Top-level key of the ingestion service section in `fritz.yaml`.
pub const KOWALSKI: &str = "kowalski";
/// SkyPortal's second consumer of the Kowalski token.
pub const GLORIA: &str = "gloria";

/// Default launcher settings file, looked up in the project root.
pub const SETTINGS_FILE: &str = "launcher.toml";
/// Prefix for environment overrides, e.g. `FRITZ__NETWORK=fritz_dev`.
pub const ENV_PREFIX: &str = "FRITZ";

/// Length of a SkyPortal API token (a hyphenated UUID).
pub const TOKEN_LENGTH: usize = 36;

/// The two orchestrated services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum Subsystem {
    SkyPortal,
    Kowalski,
}

impl Subsystem {
    /// Key of the subsystem's section in the unified config.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::SkyPortal => SKYPORTAL,
            Self::Kowalski => KOWALSKI,
        }
    }
}
