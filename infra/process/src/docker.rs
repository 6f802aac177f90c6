use crate::command::CommandSpec;
use crate::containers::{ContainerState, PS_FORMAT, parse_ps};
use crate::error::{ProcessError, ProcessErrorExt};
use crate::runner::{CommandRunner, ensure_success};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Thin wrapper over the `docker` CLI.
#[derive(Debug, Clone, Copy)]
pub struct Docker<'r> {
    runner: &'r dyn CommandRunner,
}

impl<'r> Docker<'r> {
    pub const fn new(runner: &'r dyn CommandRunner) -> Self {
        Self { runner }
    }

    fn docker() -> CommandSpec {
        CommandSpec::new("docker")
    }

    /// All containers, running or not.
    ///
    /// # Errors
    /// Fails if `docker ps` fails or prints something outside the expected grammar.
    pub fn containers(&self) -> Result<Vec<ContainerState>, ProcessError> {
        let spec = Self::docker().args(["ps", "-a", "--format", PS_FORMAT]);
        let stdout = self.runner.check_output(&spec)?;
        parse_ps(&stdout)
    }

    /// Runs `command` inside `container`, streaming its output.
    ///
    /// # Errors
    /// Fails if the command cannot be started or exits non-zero.
    pub fn exec(&self, container: &str, command: &[&str]) -> Result<(), ProcessError> {
        let spec = Self::exec_spec(container, command);
        self.runner.check(&spec).context(format!("in container {container}"))
    }

    /// Runs `command` inside `container` and returns its stdout.
    ///
    /// # Errors
    /// Fails if the command cannot be started or exits non-zero.
    pub fn exec_output(&self, container: &str, command: &[&str]) -> Result<String, ProcessError> {
        let spec = Self::exec_spec(container, command);
        self.runner.check_output(&spec).context(format!("in container {container}"))
    }

    /// Runs `script` through `/bin/bash -c` inside `container`, streaming output.
    ///
    /// # Errors
    /// Fails if the script cannot be started or exits non-zero.
    pub fn exec_shell(&self, container: &str, script: &str) -> Result<(), ProcessError> {
        self.exec(container, &["/bin/bash", "-c", script])
    }

    fn exec_spec(container: &str, command: &[&str]) -> CommandSpec {
        Self::docker().args(["exec", "-i", container]).args(command.iter().copied())
    }

    /// Creates a bridge network. An already existing network is not an error.
    ///
    /// # Errors
    /// Fails for any other `docker network create` failure.
    pub fn ensure_network(&self, name: &str) -> Result<(), ProcessError> {
        let spec = Self::docker().args(["network", "create", name]);
        let output = self.runner.output(&spec)?;
        if !output.success() && output.stderr.contains("already exists") {
            debug!(network = name, "Network already exists");
            return Ok(());
        }
        ensure_success(&spec, output)?;
        info!(network = name, "Created docker network");
        Ok(())
    }

    /// Removes unused images, containers and networks, then unused volumes.
    ///
    /// # Errors
    /// Fails if either prune command fails.
    pub fn prune(&self) -> Result<(), ProcessError> {
        self.runner.check(&Self::docker().args(["system", "prune", "-af"]))?;
        self.runner.check(&Self::docker().args(["volume", "prune", "-f"]))
    }
}

/// `docker compose` bound to one or more compose files and a project dir.
#[derive(Debug, Clone)]
pub struct DockerCompose<'r> {
    runner: &'r dyn CommandRunner,
    files: Vec<PathBuf>,
    project_dir: Option<PathBuf>,
}

impl<'r> DockerCompose<'r> {
    /// Compose helper for a single compose file.
    pub fn new(runner: &'r dyn CommandRunner, file: impl Into<PathBuf>) -> Self {
        Self { runner, files: vec![file.into()], project_dir: None }
    }

    /// Layers an override compose file on top of the base one (`-f a -f b`).
    #[must_use]
    pub fn with_override(mut self, file: impl Into<PathBuf>) -> Self {
        self.files.push(file.into());
        self
    }

    /// Runs compose from `dir`; relative paths inside the compose file resolve against it.
    #[must_use]
    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.project_dir = Some(dir.into());
        self
    }

    fn resolve(&self, file: &Path) -> PathBuf {
        match &self.project_dir {
            Some(dir) if file.is_relative() => dir.join(file),
            _ => file.to_path_buf(),
        }
    }

    /// Runs `docker compose -f <file>... <args>`.
    ///
    /// # Errors
    /// Fails if a compose file is missing or the command fails.
    pub fn run(&self, args: &[&str]) -> Result<(), ProcessError> {
        for file in &self.files {
            let resolved = self.resolve(file);
            if !resolved.exists() {
                return Err(ProcessError::Internal {
                    message: format!("Docker compose file not found at: {}", resolved.display())
                        .into(),
                    context: None,
                });
            }
        }

        let mut spec = CommandSpec::new("docker").arg("compose");
        for file in &self.files {
            spec = spec.arg("-f").arg(file.to_string_lossy());
        }
        spec = spec.args(args.iter().copied());
        if let Some(dir) = &self.project_dir {
            spec = spec.current_dir(dir);
        }

        self.runner.check(&spec)
    }

    /// Builds the images of every service.
    ///
    /// # Errors
    /// Returns an error if the compose command fails.
    pub fn build(&self) -> Result<(), ProcessError> {
        self.run(&["build"])
    }

    /// Starts the services detached.
    ///
    /// # Errors
    /// Returns an error if the compose command fails.
    pub fn up(&self) -> Result<(), ProcessError> {
        self.run(&["up", "-d"])
    }

    /// Stops and removes the services.
    ///
    /// # Errors
    /// Returns an error if the compose command fails.
    pub fn down(&self) -> Result<(), ProcessError> {
        self.run(&["down"])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::SystemRunner;

    #[test]
    fn docker_compose_file_missing_is_reported() {
        let compose = DockerCompose::new(&SystemRunner, "non-existent.yml");
        let err = compose.run(&["config"]).unwrap_err();
        assert!(err.to_string().contains("not found"), "expected missing file error, got: {err}");
    }

    #[test]
    fn relative_files_resolve_against_project_dir() {
        let compose = DockerCompose::new(&SystemRunner, "docker-compose.yaml").in_dir("/srv/kowalski");
        assert_eq!(
            compose.resolve(Path::new("docker-compose.yaml")),
            PathBuf::from("/srv/kowalski/docker-compose.yaml")
        );
        assert_eq!(compose.resolve(Path::new("/abs.yaml")), PathBuf::from("/abs.yaml"));
    }
}
