//! The user-edited `fritz.yaml`, kept as an untyped YAML tree so keys the
//! launcher does not know about survive a load/save cycle.

use crate::error::{KernelError, KernelErrorExt};
use fritz_domain::constants::Subsystem;
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnifiedConfig {
    doc: Mapping,
}

impl UnifiedConfig {
    /// Parses a document whose top level must be a mapping.
    ///
    /// # Errors
    /// Fails on invalid YAML or a non-mapping top level.
    pub fn from_yaml_str(text: &str) -> Result<Self, KernelError> {
        match serde_yaml::from_str::<Value>(text)? {
            Value::Mapping(doc) => Ok(Self { doc }),
            Value::Null => Ok(Self::default()),
            _ => Err(KernelError::config("top level of the unified config must be a mapping")),
        }
    }

    /// # Errors
    /// Fails if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, KernelError> {
        let text = fs::read_to_string(path).context(format!("reading {}", path.display()))?;
        Self::from_yaml_str(&text).context(format!("parsing {}", path.display()))
    }

    /// # Errors
    /// Fails if the document cannot be serialized or written.
    pub fn save(&self, path: &Path) -> Result<(), KernelError> {
        write_yaml(path, &self.doc)
    }

    /// Value at a dotted path, e.g. `["kowalski", "server", "port"]`.
    #[must_use]
    pub fn get(&self, path: &[&str]) -> Option<&Value> {
        let (first, rest) = path.split_first()?;
        rest.iter().try_fold(self.doc.get(*first)?, |node, key| node.get(*key))
    }

    /// String at `path`, or a [`KernelError::Config`] naming the missing key.
    ///
    /// # Errors
    /// Fails if the key is absent or not a string.
    pub fn get_str(&self, path: &[&str]) -> Result<&str, KernelError> {
        self.get(path)
            .and_then(Value::as_str)
            .ok_or_else(|| KernelError::config(format!("`{}` must be a string", path.join("."))))
    }

    /// Sets `path`, creating intermediate mappings as needed.
    ///
    /// A non-mapping value in the way is replaced by a mapping.
    pub fn set(&mut self, path: &[&str], value: impl Into<Value>) {
        let Some((last, parents)) = path.split_last() else {
            return;
        };
        let mut node = &mut self.doc;
        for key in parents {
            let entry = node.entry(Value::from(*key)).or_insert_with(|| Value::Mapping(Mapping::new()));
            if !entry.is_mapping() {
                *entry = Value::Mapping(Mapping::new());
            }
            let Value::Mapping(next) = entry else {
                return;
            };
            node = next;
        }
        node.insert(Value::from(*last), value.into());
    }

    /// The section owned by `subsystem`.
    ///
    /// # Errors
    /// Fails if the section is missing or is not a mapping.
    pub fn section(&self, subsystem: Subsystem) -> Result<&Mapping, KernelError> {
        self.doc.get(subsystem.key()).and_then(Value::as_mapping).ok_or_else(|| {
            KernelError::config(format!("`{}` section is missing", subsystem.key()))
        })
    }
}

pub(crate) fn write_yaml(path: &Path, doc: &Mapping) -> Result<(), KernelError> {
    let text = serde_yaml::to_string(doc).context(format!("serializing {}", path.display()))?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).context(format!("creating {}", parent.display()))?;
    }
    fs::write(path, text).context(format!("writing {}", path.display()))
}
