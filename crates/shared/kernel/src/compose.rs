//! Renders the SkyPortal compose file from its template.
//!
//! Only string values below `services.<name>.{volumes,ports,labels}` are
//! rewritten; everything else is copied through.

use crate::error::{KernelError, KernelErrorExt};
use crate::project::Project;
use crate::unified::UnifiedConfig;
use fritz_domain::constants::SKYPORTAL;
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::PathBuf;
use tracing::info;

const PATCHED_KEYS: [&str; 3] = ["volumes", "ports", "labels"];

/// Values substituted into the compose template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposeVars {
    /// `${FRITZ_ROOT}`: absolute project root.
    pub root: String,
    /// `${FRITZ_HOST}`: public host name.
    pub host: String,
    /// `${FRITZ_PORT}`: public port.
    pub port: String,
}

impl ComposeVars {
    /// Host and port come from `skyportal.server` in the unified config,
    /// falling back to `localhost:5000`.
    #[must_use]
    pub fn from_config(project: &Project, config: &UnifiedConfig) -> Self {
        let host = config
            .get(&[SKYPORTAL, "server", "host"])
            .and_then(scalar_text)
            .unwrap_or_else(|| "localhost".to_owned());
        let port = config
            .get(&[SKYPORTAL, "server", "port"])
            .and_then(scalar_text)
            .unwrap_or_else(|| project.settings().skyportal.container_port.to_string());
        Self { root: project.root().display().to_string(), host, port }
    }

    fn substitute(&self, text: &str) -> String {
        text.replace("${FRITZ_ROOT}", &self.root)
            .replace("${FRITZ_HOST}", &self.host)
            .replace("${FRITZ_PORT}", &self.port)
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

/// Substitutes placeholders in a compose document.
///
/// # Errors
/// Fails on invalid YAML.
pub fn render_compose(template: &str, vars: &ComposeVars) -> Result<String, KernelError> {
    let mut doc: Value = serde_yaml::from_str(template).context("parsing compose template")?;

    if let Some(services) = doc.get_mut("services").and_then(Value::as_mapping_mut) {
        for service in services.values_mut().filter_map(Value::as_mapping_mut) {
            patch_service(service, vars);
        }
    }

    serde_yaml::to_string(&doc).context("serializing compose file")
}

fn patch_service(service: &mut Mapping, vars: &ComposeVars) {
    for key in PATCHED_KEYS {
        if let Some(value) = service.get_mut(key) {
            substitute_strings(value, vars);
        }
    }
}

fn substitute_strings(value: &mut Value, vars: &ComposeVars) {
    match value {
        Value::String(text) => *text = vars.substitute(text),
        Value::Sequence(items) => items.iter_mut().for_each(|item| substitute_strings(item, vars)),
        Value::Mapping(map) => map.values_mut().for_each(|item| substitute_strings(item, vars)),
        _ => {}
    }
}

/// Renders the project's compose template into its compose file.
///
/// # Errors
/// [`KernelError::Prerequisite`] if the template is missing; IO/YAML errors otherwise.
pub fn write_compose(project: &Project, config: &UnifiedConfig) -> Result<PathBuf, KernelError> {
    let template_path = project.compose_template();
    if !template_path.exists() {
        return Err(KernelError::prerequisite(format!(
            "compose template not found at {}",
            template_path.display()
        )));
    }

    let template = fs::read_to_string(&template_path)
        .context(format!("reading {}", template_path.display()))?;
    let rendered = render_compose(&template, &ComposeVars::from_config(project, config))?;

    let target = project.compose_file();
    fs::write(&target, rendered).context(format!("writing {}", target.display()))?;
    info!(path = %target.display(), "Rendered compose file");
    Ok(target)
}
