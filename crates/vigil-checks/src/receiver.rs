//! Receiver check - verifies a message receiver can report its queue depth
//!
//! Declared under the `receiver` config key. A receiver without the count
//! capability yields a skip, not a failure; a receiver that has the
//! capability but cannot exercise it (broken connection) yields a failure.

use crate::directory::DirectoryBuilder;
use crate::kind::{self, CheckKind};
use crate::normalize::EntryOptions;
use std::sync::Arc;
use vigil_core::{Check, Error, Outcome, Receiver, Resources, Result};

pub const CONFIG_KEY: &str = "receiver";

/// Probes one named message receiver by requesting its message count
pub struct ReceiverCheck {
    receiver: Arc<dyn Receiver>,
    name: String,
}

impl ReceiverCheck {
    pub fn new(receiver: Arc<dyn Receiver>, name: impl Into<String>) -> Self {
        Self {
            receiver,
            name: name.into(),
        }
    }
}

impl Check for ReceiverCheck {
    fn identity(&self) -> String {
        format!("receiver \"{}\"", self.name)
    }

    fn run(&self) -> Outcome {
        match self.receiver.message_count() {
            None => Outcome::skip("Not a MessageCountAwareInterface."),
            Some(Ok(_)) => Outcome::success("ok"),
            Some(Err(_)) => Outcome::failure("failed"),
        }
    }
}

pub fn kind() -> CheckKind {
    CheckKind {
        config_key: CONFIG_KEY,
        config_info: Some("fails if the receiver cannot report its message count"),
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
        let receiver = resources.receiver(name)?;
        let check = ReceiverCheck::new(receiver, name);
        builder.insert(kind::wrap(Box::new(check), name, options))?;
    }
    Ok(())
}

fn process(
    template: &EntryOptions,
    resources: &Resources,
    builder: &mut DirectoryBuilder,
) -> Result<()> {
    let names = resources.receiver_names();
    if names.is_empty() {
        return Err(Error::MissingIntegration {
            kind: String::from("receivers"),
            hint: String::from("is the messaging integration installed/enabled?"),
        });
    }

    let entries: Vec<_> = names
        .into_iter()
        .map(|name| (name.to_string(), template.clone()))
        .collect();
    load(&entries, resources, builder)
}
