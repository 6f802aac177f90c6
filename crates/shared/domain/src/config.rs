use serde::{Deserialize, Serialize};
use std::ops::{Deref, DerefMut};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Everything the launcher can be told through `launcher.toml` / `FRITZ__*`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LauncherSettingsInner {
    pub paths: PathSettings,
    pub skyportal: SkyPortalSettings,
    pub kowalski: KowalskiSettings,
    /// Docker network shared by both compose projects.
    pub network: String,
    pub retry: RetrySettings,
    pub dependencies: Vec<DependencySpec>,
}

/// Thin Arc-wrapped settings for inexpensive cloning into handlers.
#[derive(Default, Debug, Clone, Deserialize, Serialize)]
pub struct LauncherSettings {
    #[serde(flatten, default)]
    inner: Arc<LauncherSettingsInner>,
}

impl Deref for LauncherSettings {
    type Target = LauncherSettingsInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for LauncherSettings {
    fn deref_mut(&mut self) -> &mut LauncherSettingsInner {
        Arc::make_mut(&mut self.inner)
    }
}

/// Files the launcher reads and writes, relative to the project root.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PathSettings {
    pub unified_config: PathBuf,
    pub defaults_config: PathBuf,
    pub compose_template: PathBuf,
    pub compose_file: PathBuf,
    pub traefik_override: PathBuf,
    pub docs_dir: PathBuf,
    pub log_dir: Option<PathBuf>,
}

/// Web application (subsystem A).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SkyPortalSettings {
    /// Submodule checkout.
    pub dir: PathBuf,
    /// Where SkyPortal expects its config.
    pub config_path: PathBuf,
    pub web_container: String,
    /// Token file inside the web container.
    pub token_file: String,
    /// Marker of the token line inside `token_file`.
    pub token_marker: String,
    /// Database hostname as seen from inside the compose network.
    pub database_host: String,
    /// Process that shows up in `ps -ef` once the app is serving.
    pub entry_process: String,
    /// Shell script that resets the database and loads seed data.
    pub seed_command: String,
    /// Shell script running the test suite inside the web container.
    pub test_command: String,
    pub health_url: String,
    pub container_port: u16,
}

/// Ingestion service (subsystem B).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct KowalskiSettings {
    /// Submodule checkout.
    pub dir: PathBuf,
    /// Where Kowalski expects its config.
    pub config_path: PathBuf,
    /// Compose file, relative to `dir`.
    pub compose_file: PathBuf,
    pub api_container: String,
    pub ingester_container: String,
    /// Port the API listens on inside its container.
    pub api_port: u16,
    /// Shell script running the test suite inside the API container.
    pub test_command: String,
}

/// Fixed-budget retry policies.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetrySettings {
    pub seed_data: RetryPolicySettings,
    pub containers: RetryPolicySettings,
    pub web_process: RetryPolicySettings,
    pub health: RetryPolicySettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct RetryPolicySettings {
    pub attempts: u32,
    pub delay_secs: u64,
}

impl RetryPolicySettings {
    #[must_use]
    pub const fn new(attempts: u32, delay_secs: u64) -> Self {
        Self { attempts, delay_secs }
    }

    #[must_use]
    pub const fn delay(&self) -> Duration {
        Duration::from_secs(self.delay_secs)
    }
}

/// A required system tool.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DependencySpec {
    pub name: String,
    /// Full argv that prints the version, e.g. `["git", "--version"]`.
    pub command: Vec<String>,
    pub min_version: String,
}

impl DependencySpec {
    #[must_use]
    pub fn new(name: &str, command: &[&str], min_version: &str) -> Self {
        Self {
            name: name.to_owned(),
            command: command.iter().map(|&arg| arg.to_owned()).collect(),
            min_version: min_version.to_owned(),
        }
    }
}

// --- Default ---

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            unified_config: PathBuf::from("fritz.yaml"),
            defaults_config: PathBuf::from("fritz.defaults.yaml"),
            compose_template: PathBuf::from("docker-compose.defaults.yaml"),
            compose_file: PathBuf::from("docker-compose.yaml"),
            traefik_override: PathBuf::from("docker-compose.traefik.yaml"),
            docs_dir: PathBuf::from("doc"),
            log_dir: None,
        }
    }
}

impl Default for SkyPortalSettings {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("skyportal"),
            config_path: PathBuf::from("skyportal/config.yaml"),
            web_container: "skyportal_web_1".to_owned(),
            token_file: "/skyportal/.tokens.yaml".to_owned(),
            token_marker: "INITIAL_ADMIN".to_owned(),
            database_host: "db".to_owned(),
            entry_process: "app.py".to_owned(),
            seed_command: "source /skyportal_env/bin/activate; \
                           make db_clear && make db_init && make prepare_seed_data && make load_seed_data"
                .to_owned(),
            test_command: "source /skyportal_env/bin/activate; python -m pytest -s extensions/tests"
                .to_owned(),
            health_url: "http://localhost:5000/api/sysinfo".to_owned(),
            container_port: 5000,
        }
    }
}

impl Default for KowalskiSettings {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("kowalski"),
            config_path: PathBuf::from("kowalski/config.yaml"),
            compose_file: PathBuf::from("docker-compose.yaml"),
            api_container: "kowalski_api_1".to_owned(),
            ingester_container: "kowalski_ingester_1".to_owned(),
            api_port: 4000,
            test_command: "python -m pytest -s test_ingester.py test_api.py".to_owned(),
        }
    }
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            seed_data: RetryPolicySettings::new(3, 15),
            containers: RetryPolicySettings::new(10, 3),
            web_process: RetryPolicySettings::new(10, 10),
            health: RetryPolicySettings::new(10, 10),
        }
    }
}

impl Default for LauncherSettingsInner {
    fn default() -> Self {
        Self {
            paths: PathSettings::default(),
            skyportal: SkyPortalSettings::default(),
            kowalski: KowalskiSettings::default(),
            network: "fritz_net".to_owned(),
            retry: RetrySettings::default(),
            dependencies: default_dependencies(),
        }
    }
}

/// Tools checked before any side effect.
#[must_use]
pub fn default_dependencies() -> Vec<DependencySpec> {
    vec![
        DependencySpec::new("git", &["git", "--version"], "2.0"),
        DependencySpec::new("docker", &["docker", "--version"], "18.6"),
        DependencySpec::new("docker compose", &["docker", "compose", "version"], "2.0"),
    ]
}
