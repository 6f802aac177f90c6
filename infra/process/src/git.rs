use crate::command::CommandSpec;
use crate::error::ProcessError;
use crate::runner::CommandRunner;
use std::path::PathBuf;

/// The handful of `git` operations the launcher needs.
#[derive(Debug, Clone)]
pub struct Git<'r> {
    runner: &'r dyn CommandRunner,
    root: PathBuf,
}

impl<'r> Git<'r> {
    pub fn new(runner: &'r dyn CommandRunner, root: impl Into<PathBuf>) -> Self {
        Self { runner, root: root.into() }
    }

    fn git(&self) -> CommandSpec {
        CommandSpec::new("git").current_dir(&self.root)
    }

    /// `git submodule update [--init --recursive]`.
    ///
    /// # Errors
    /// Returns an error if git fails.
    pub fn update_submodules(&self, init: bool) -> Result<(), ProcessError> {
        let mut spec = self.git().args(["submodule", "update"]);
        if init {
            spec = spec.args(["--init", "--recursive"]);
        }
        self.runner.check(&spec)
    }

    /// `git pull <repo> <branch>`.
    ///
    /// # Errors
    /// Returns an error if git fails.
    pub fn pull(&self, repo: &str, branch: &str) -> Result<(), ProcessError> {
        self.runner.check(&self.git().args(["pull", repo, branch]))
    }
}
