use fritz_domain::config::LauncherSettings;
use std::path::{Path, PathBuf};

/// Project root plus the settings that describe its layout.
///
/// Passed by reference through every step; nothing in the launcher keeps
/// global state.
#[derive(Debug, Clone)]
pub struct Project {
    root: PathBuf,
    settings: LauncherSettings,
}

impl Project {
    pub fn new(root: impl Into<PathBuf>, settings: LauncherSettings) -> Self {
        Self { root: root.into(), settings }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub const fn settings(&self) -> &LauncherSettings {
        &self.settings
    }

    /// Resolves `relative` against the project root.
    #[must_use]
    pub fn path(&self, relative: &Path) -> PathBuf {
        self.root.join(relative)
    }

    #[must_use]
    pub fn unified_config(&self) -> PathBuf {
        self.path(&self.settings.paths.unified_config)
    }

    #[must_use]
    pub fn defaults_config(&self) -> PathBuf {
        self.path(&self.settings.paths.defaults_config)
    }

    #[must_use]
    pub fn compose_template(&self) -> PathBuf {
        self.path(&self.settings.paths.compose_template)
    }

    #[must_use]
    pub fn compose_file(&self) -> PathBuf {
        self.path(&self.settings.paths.compose_file)
    }

    #[must_use]
    pub fn traefik_override(&self) -> PathBuf {
        self.path(&self.settings.paths.traefik_override)
    }

    #[must_use]
    pub fn docs_dir(&self) -> PathBuf {
        self.path(&self.settings.paths.docs_dir)
    }

    #[must_use]
    pub fn skyportal_dir(&self) -> PathBuf {
        self.path(&self.settings.skyportal.dir)
    }

    #[must_use]
    pub fn skyportal_config(&self) -> PathBuf {
        self.path(&self.settings.skyportal.config_path)
    }

    #[must_use]
    pub fn kowalski_dir(&self) -> PathBuf {
        self.path(&self.settings.kowalski.dir)
    }

    #[must_use]
    pub fn kowalski_config(&self) -> PathBuf {
        self.path(&self.settings.kowalski.config_path)
    }

    /// Containers `fritz test` waits for.
    #[must_use]
    pub fn expected_containers(&self) -> Vec<String> {
        vec![
            self.settings.kowalski.ingester_container.clone(),
            self.settings.kowalski.api_container.clone(),
            self.settings.skyportal.web_container.clone(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_resolve_against_root() {
        let project = Project::new("/srv/fritz", LauncherSettings::default());
        assert_eq!(project.unified_config(), PathBuf::from("/srv/fritz/fritz.yaml"));
        assert_eq!(project.kowalski_config(), PathBuf::from("/srv/fritz/kowalski/config.yaml"));
        assert_eq!(project.expected_containers().len(), 3);
    }
}
