use crate::services::prompt::Prompt;
use anyhow::{Context, Result};
use fritz_kernel::domain::config::LauncherSettings;
use fritz_kernel::health::HttpProbe;
use fritz_kernel::split::ConfigSplitter;
use fritz_kernel::{KernelError, Project};
use fritz_process::{CommandRunner, Docker, DockerCompose, Git};
use std::fs;
use tracing::info;

/// Everything a verb handler needs: where the project lives and how to reach
/// the outside world.
#[derive(Debug)]
pub struct Launcher<'a> {
    project: Project,
    runner: &'a dyn CommandRunner,
    probe: &'a dyn HttpProbe,
    prompt: &'a dyn Prompt,
}

impl<'a> Launcher<'a> {
    pub fn new(
        project: Project,
        runner: &'a dyn CommandRunner,
        probe: &'a dyn HttpProbe,
        prompt: &'a dyn Prompt,
    ) -> Self {
        Self { project, runner, probe, prompt }
    }

    #[must_use]
    pub const fn project(&self) -> &Project {
        &self.project
    }

    #[must_use]
    pub const fn settings(&self) -> &LauncherSettings {
        self.project.settings()
    }

    #[must_use]
    pub fn runner(&self) -> &'a dyn CommandRunner {
        self.runner
    }

    #[must_use]
    pub fn probe(&self) -> &'a dyn HttpProbe {
        self.probe
    }

    #[must_use]
    pub const fn docker(&self) -> Docker<'a> {
        Docker::new(self.runner)
    }

    #[must_use]
    pub fn git(&self) -> Git<'a> {
        Git::new(self.runner, self.project.root())
    }

    /// The rendered SkyPortal compose file, optionally layered with the traefik override.
    #[must_use]
    pub fn skyportal_compose(&self, traefik: bool) -> DockerCompose<'a> {
        let compose =
            DockerCompose::new(self.runner, self.project.compose_file()).in_dir(self.project.root());
        if traefik { compose.with_override(self.project.traefik_override()) } else { compose }
    }

    /// Kowalski's own compose file inside its checkout.
    #[must_use]
    pub fn kowalski_compose(&self) -> DockerCompose<'a> {
        DockerCompose::new(self.runner, self.settings().kowalski.compose_file.clone())
            .in_dir(self.project.kowalski_dir())
    }

    #[must_use]
    pub const fn splitter(&self) -> ConfigSplitter<'_> {
        ConfigSplitter::new(&self.project)
    }

    /// `assume_yes` short-circuits the question.
    ///
    /// # Errors
    /// Fails if the answer cannot be read.
    pub fn confirm(&self, question: &str, assume_yes: bool) -> Result<bool> {
        if assume_yes {
            return Ok(true);
        }
        self.prompt.confirm(question)
    }

    /// Makes sure `fritz.yaml` exists, offering to create it from the defaults.
    ///
    /// # Errors
    /// A prerequisite error if the file is missing and cannot or may not be created.
    pub fn ensure_unified_config(&self, assume_yes: bool) -> Result<()> {
        let target = self.project.unified_config();
        if target.exists() {
            return Ok(());
        }

        let defaults = self.project.defaults_config();
        if !defaults.exists() {
            return Err(KernelError::prerequisite(format!(
                "neither {} nor {} exists",
                target.display(),
                defaults.display()
            ))
            .into());
        }

        let question =
            format!("{} not found. Initialize it from {}?", target.display(), defaults.display());
        if !self.confirm(&question, assume_yes)? {
            return Err(KernelError::prerequisite(format!(
                "{} is required; copy {} and edit it",
                target.display(),
                defaults.display()
            ))
            .into());
        }

        fs::copy(&defaults, &target)
            .with_context(|| format!("Failed to copy {} to {}", defaults.display(), target.display()))?;
        info!(path = %target.display(), "Initialized unified config from defaults");
        println!("📝 Created {} from defaults", target.display());
        Ok(())
    }
}
