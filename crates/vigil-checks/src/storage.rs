//! Storage check - writes, reads, and deletes a probe file
//!
//! Declared under the `storage` config key. Entry options:
//! `operations` (subset of write/read/delete, default all three) and `path`
//! (probe file name, default `monitor.txt`), plus the shared
//! suite/ttl/label/id options.

use crate::directory::DirectoryBuilder;
use crate::kind::{self, CheckKind};
use crate::normalize::EntryOptions;
use serde::Deserialize;
use serde_yaml::Value;
use std::sync::Arc;
use vigil_core::{Check, Error, Outcome, Resources, Result, Storage};

pub const CONFIG_KEY: &str = "storage";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Write,
    Read,
    Delete,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Write => "write",
            Operation::Read => "read",
            Operation::Delete => "delete",
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct StorageEntry {
    #[serde(default = "default_operations")]
    operations: Vec<Operation>,
    #[serde(default = "default_path")]
    path: String,
}

fn default_operations() -> Vec<Operation> {
    vec![Operation::Write, Operation::Read, Operation::Delete]
}

fn default_path() -> String {
    String::from("monitor.txt")
}

impl Default for StorageEntry {
    fn default() -> Self {
        Self {
            operations: default_operations(),
            path: default_path(),
        }
    }
}

/// Probes one named storage backend by performing the configured operations
/// against a probe file
pub struct StorageCheck {
    storage: Arc<dyn Storage>,
    name: String,
    operations: Vec<Operation>,
    path: String,
}

impl StorageCheck {
    pub fn new(
        storage: Arc<dyn Storage>,
        name: impl Into<String>,
        operations: Vec<Operation>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            storage,
            name: name.into(),
            operations,
            path: path.into(),
        }
    }
}

impl Check for StorageCheck {
    fn identity(&self) -> String {
        format!("storage \"{}\"", self.name)
    }

    fn run(&self) -> Outcome {
        let mut successful = Vec::new();
        let mut failed = Vec::new();

        for operation in &self.operations {
            let result = match operation {
                Operation::Write => self.storage.write(&self.path, b"test"),
                Operation::Read => self.storage.read(&self.path).map(|_| ()),
                Operation::Delete => self.storage.delete(&self.path),
            };
            match result {
                Ok(()) => successful.push(operation.as_str()),
                Err(_) => failed.push(operation.as_str()),
            }
        }

        if !failed.is_empty() {
            return Outcome::failure(format!("failed operations: {}", failed.join(", ")));
        }

        Outcome::success(format!("successfull operations: {}", successful.join(", ")))
    }
}

pub fn kind() -> CheckKind {
    CheckKind {
        config_key: CONFIG_KEY,
        config_info: Some("fails if it cannot write/read/delete a file"),
        load,
        process: Some(process),
    }
}

fn load(
    entries: &[(String, EntryOptions)],
    resources: &Resources,
    builder: &mut DirectoryBuilder,
) -> Result<()> {
    for (name, options) in entries {
        let entry: StorageEntry = if options.extra.is_empty() {
            StorageEntry::default()
        } else {
            serde_yaml::from_value(Value::Mapping(options.extra.clone())).map_err(|e| {
                Error::InvalidCheckConfig {
                    kind: String::from(CONFIG_KEY),
                    message: format!("entry '{name}': {e}"),
                }
            })?
        };

        let storage = resources.storage(name)?;
        let check = StorageCheck::new(storage, name, entry.operations, entry.path);
        builder.insert(kind::wrap(Box::new(check), name, options))?;
    }
    Ok(())
}

fn process(
    template: &EntryOptions,
    resources: &Resources,
    builder: &mut DirectoryBuilder,
) -> Result<()> {
    let names = resources.storage_names();
    if names.is_empty() {
        return Err(Error::MissingIntegration {
            kind: String::from("storages"),
            hint: String::from("is the storage integration installed/enabled?"),
        });
    }

    let entries: Vec<_> = names
        .into_iter()
        .map(|name| (name.to_string(), template.clone()))
        .collect();
    load(&entries, resources, builder)
}
