//! Database connection check - pings a named connection
//!
//! Declared under the `database` config key.

use crate::directory::DirectoryBuilder;
use crate::kind::{self, CheckKind};
use crate::normalize::EntryOptions;
use std::sync::Arc;
use vigil_core::{Check, Connection, Error, Outcome, Resources, Result};

pub const CONFIG_KEY: &str = "database";

/// Probes one named database connection with a ping
pub struct ConnectionCheck {
    connection: Arc<dyn Connection>,
    name: String,
}

impl ConnectionCheck {
    pub fn new(connection: Arc<dyn Connection>, name: impl Into<String>) -> Self {
        Self {
            connection,
            name: name.into(),
        }
    }
}

impl Check for ConnectionCheck {
    fn identity(&self) -> String {
        format!("database connection \"{}\"", self.name)
    }

    fn run(&self) -> Outcome {
        match self.connection.ping() {
            Ok(()) => Outcome::success("ok"),
            Err(e) => Outcome::failure(e.to_string()),
        }
    }
}

pub fn kind() -> CheckKind {
    CheckKind {
        config_key: CONFIG_KEY,
        config_info: Some("fails if the connection cannot be pinged"),
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
        if !options.extra.is_empty() {
            return Err(Error::InvalidCheckConfig {
                kind: String::from(CONFIG_KEY),
                message: format!("entry '{name}' has unknown options"),
            });
        }
        let connection = resources.connection(name)?;
        let check = ConnectionCheck::new(connection, name);
        builder.insert(kind::wrap(Box::new(check), name, options))?;
    }
    Ok(())
}

fn process(
    template: &EntryOptions,
    resources: &Resources,
    builder: &mut DirectoryBuilder,
) -> Result<()> {
    let names = resources.connection_names();
    if names.is_empty() {
        return Err(Error::MissingIntegration {
            kind: String::from("database connections"),
            hint: String::from("is the database integration installed/enabled?"),
        });
    }

    let entries: Vec<_> = names
        .into_iter()
        .map(|name| (name.to_string(), template.clone()))
        .collect();
    load(&entries, resources, builder)
}
