//! Splits the unified `fritz.yaml` into per-subsystem config files.
//!
//! Before splitting, connection settings that only make sense inside the
//! compose network are forced, and a fresh Kowalski JWT is written into
//! SkyPortal's section. The merged document is written back so the user sees
//! exactly what was handed to each subsystem.

use crate::error::{KernelError, KernelErrorExt};
use crate::project::Project;
use crate::token::{KowalskiAuth, generate_kowalski_token};
use crate::unified::{UnifiedConfig, write_yaml};
use chrono::{DateTime, Utc};
use fritz_domain::constants::{GLORIA, KOWALSKI, SKYPORTAL, Subsystem};
use serde_yaml::{Mapping, Value};
use strum::IntoEnumIterator;
use tracing::info;

/// Result of a split: the two documents as written plus the token used.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitOutcome {
    /// Written verbatim to SkyPortal's config path.
    pub skyportal: Mapping,
    /// Written to Kowalski's config path, wrapped as `{kowalski: ...}`.
    pub kowalski: Mapping,
    pub kowalski_token: String,
}

#[derive(Debug, Clone, Copy)]
pub struct ConfigSplitter<'p> {
    project: &'p Project,
}

impl<'p> ConfigSplitter<'p> {
    pub const fn new(project: &'p Project) -> Self {
        Self { project }
    }

    /// Forces the in-network connection settings and installs `token`.
    pub fn apply_overrides(&self, config: &mut UnifiedConfig, token: &str) {
        let settings = self.project.settings();
        let skyportal = &settings.skyportal;
        let kowalski = &settings.kowalski;

        config.set(&[SKYPORTAL, "database", "host"], skyportal.database_host.as_str());
        config.set(&[SKYPORTAL, "app", KOWALSKI, "host"], kowalski.api_container.as_str());
        config.set(&[SKYPORTAL, "app", KOWALSKI, "port"], kowalski.api_port);
        config.set(&[SKYPORTAL, "app", KOWALSKI, "token"], token);
        config.set(&[SKYPORTAL, "app", GLORIA, "token"], token);

        config.set(&[KOWALSKI, "server", "port"], kowalski.api_port);
        config.set(&[KOWALSKI, SKYPORTAL, "host"], skyportal.web_container.as_str());
        config.set(&[KOWALSKI, SKYPORTAL, "port"], skyportal.container_port);
    }

    /// Applies overrides and token, then separates the two sections.
    ///
    /// # Errors
    /// Fails if either section is missing or token generation fails.
    pub fn split(&self, config: &mut UnifiedConfig, now: DateTime<Utc>) -> Result<SplitOutcome, KernelError> {
        for subsystem in Subsystem::iter() {
            config.section(subsystem).context(format!("{subsystem} config"))?;
        }

        let auth = KowalskiAuth::from_config(config)?;
        let kowalski_token = generate_kowalski_token(&auth, now)?;
        self.apply_overrides(config, &kowalski_token);

        let skyportal = config.section(Subsystem::SkyPortal)?.clone();
        let mut kowalski = Mapping::new();
        kowalski.insert(
            Value::from(KOWALSKI),
            Value::Mapping(config.section(Subsystem::Kowalski)?.clone()),
        );

        Ok(SplitOutcome { skyportal, kowalski, kowalski_token })
    }

    /// Loads `fritz.yaml`, splits it and writes all three files.
    ///
    /// # Errors
    /// Fails on any read, parse, generation or write failure.
    pub fn propagate(&self) -> Result<SplitOutcome, KernelError> {
        let mut config = UnifiedConfig::load(&self.project.unified_config())?;
        self.propagate_config(&mut config)
    }

    /// Stores SkyPortal's admin token for Kowalski, then re-propagates.
    ///
    /// # Errors
    /// Same as [`Self::propagate`].
    pub fn store_skyportal_token(&self, token: &str) -> Result<SplitOutcome, KernelError> {
        let mut config = UnifiedConfig::load(&self.project.unified_config())?;
        config.set(&[KOWALSKI, SKYPORTAL, "token"], token);
        self.propagate_config(&mut config)
    }

    fn propagate_config(&self, config: &mut UnifiedConfig) -> Result<SplitOutcome, KernelError> {
        let outcome = self.split(config, Utc::now())?;

        write_yaml(&self.project.skyportal_config(), &outcome.skyportal)?;
        write_yaml(&self.project.kowalski_config(), &outcome.kowalski)?;
        config.save(&self.project.unified_config())?;

        info!(
            skyportal = %self.project.skyportal_config().display(),
            kowalski = %self.project.kowalski_config().display(),
            "Propagated fritz config"
        );
        Ok(outcome)
    }
}
