use config::{Config, Environment, File, Map};
use fritz_domain::constants::{ENV_PREFIX, SETTINGS_FILE};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Custom error type for settings loading.
#[fritz_derive::fritz_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// Layered settings loader.
///
/// Sources, lowest priority first:
/// 1. **Defaults**: `T::default()`, so every layer above may be partial.
/// 2. **File**: an explicit path (must exist) or `launcher.toml` in the project root (optional).
/// 3. **Environment**: variables prefixed with `FRITZ__`; nested keys use double underscores
///    (e.g. `FRITZ__RETRY__HEALTH__ATTEMPTS` maps to `retry.health.attempts`).
///
/// ```rust
/// use fritz_kernel::config::SettingsLoader;
/// use fritz_domain::config::LauncherSettings;
///
/// let settings: LauncherSettings = SettingsLoader::new("/nonexistent").load().unwrap();
/// assert_eq!(settings.network, "fritz_net");
/// ```
#[derive(Debug, Clone)]
pub struct SettingsLoader {
    root: PathBuf,
    file: Option<PathBuf>,
    env: Option<Map<String, String>>,
}

impl SettingsLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into(), file: None, env: None }
    }

    /// Uses `file` instead of the default `launcher.toml`; the file becomes mandatory.
    /// A relative `file` is resolved against the current directory, not the root.
    #[must_use]
    pub fn file(mut self, file: Option<impl AsRef<Path>>) -> Self {
        self.file = file.map(|f| f.as_ref().to_path_buf());
        self
    }

    /// Reads overrides from `vars` instead of the process environment.
    #[must_use]
    pub fn env_source(mut self, vars: Map<String, String>) -> Self {
        self.env = Some(vars);
        self
    }

    /// Builds and deserializes the layered settings.
    ///
    /// # Errors
    /// Fails if an explicit file is missing, a layer cannot be parsed or the
    /// result does not match `T`.
    pub fn load<T>(&self) -> Result<T, ConfigError>
    where
        T: Serialize + DeserializeOwned + Default,
    {
        let (path, required) = self
            .file
            .clone()
            .map_or_else(|| (self.root.join(SETTINGS_FILE), false), |path| (path, true));

        let defaults = Config::try_from(&T::default()).context("Failed to serialize defaults")?;

        let builder = Config::builder()
            .add_source(defaults)
            .add_source(File::from(path.as_path()).required(required))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true)
                    .source(self.env.clone()),
            );

        if path.exists() {
            info!("Loading settings from {}", path.display());
        } else {
            debug!("No settings file at {}, using defaults", path.display());
        }

        let settings = builder
            .build()
            .context("Failed to build settings")?
            .try_deserialize::<T>()
            .context("Failed to deserialize settings")?;

        Ok(settings)
    }
}
