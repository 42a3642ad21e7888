//! Resource contracts and the runtime resource inventory
//!
//! External subsystems register their live resources (storage backends,
//! message receivers, database connections) here before the check directory
//! is built. The expansion engine consults the inventory in two ways: it
//! resolves a named resource to its live instance (a configuration/wiring
//! bug if absent), and it lists every name of a kind when expanding a
//! wildcard declaration.

use crate::error::{Error, Result};
use std::sync::Arc;

/// A storage backend that supports write/read/delete of a file-like object
pub trait Storage: Send + Sync {
    fn write(&self, path: &str, contents: &[u8]) -> Result<()>;

    fn read(&self, path: &str) -> Result<Vec<u8>>;

    fn delete(&self, path: &str) -> Result<()>;
}

/// A message receiver that may be able to report its queue depth
pub trait Receiver: Send + Sync {
    /// Returns `None` when this receiver cannot report a message count;
    /// the corresponding check result is a skip, not a failure.
    fn message_count(&self) -> Option<Result<u64>>;
}

/// A database connection that can be pinged
pub trait Connection: Send + Sync {
    fn ping(&self) -> Result<()>;
}

/// A mail transport usable for failure reports
pub trait MailTransport: Send + Sync {
    fn send(&self, recipient: &str, subject: &str, body: &str) -> Result<()>;
}

/// Inventory of named resources available for checks.
///
/// Per kind, registration order is preserved so that wildcard expansion and
/// directory ordering are reproducible for a given startup sequence. The
/// inventory is populated once during process wiring and is read-only from
/// the engine's perspective.
#[derive(Default)]
pub struct Resources {
    storages: Vec<(String, Arc<dyn Storage>)>,
    receivers: Vec<(String, Arc<dyn Receiver>)>,
    connections: Vec<(String, Arc<dyn Connection>)>,
    mail_transport: Option<Arc<dyn MailTransport>>,
}

impl Resources {
    pub fn new() -> Self {
        Self::default()
    }

    // === Storages ===

    pub fn add_storage(&mut self, name: impl Into<String>, storage: Arc<dyn Storage>) {
        self.storages.push((name.into(), storage));
    }

    pub fn storage(&self, name: &str) -> Result<Arc<dyn Storage>> {
        self.storages
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, s)| s.clone())
            .ok_or_else(|| Error::UnknownResource {
                kind: String::from("storage"),
                name: name.to_string(),
            })
    }

    pub fn storage_names(&self) -> Vec<&str> {
        self.storages.iter().map(|(n, _)| n.as_str()).collect()
    }

    // === Receivers ===

    pub fn add_receiver(&mut self, name: impl Into<String>, receiver: Arc<dyn Receiver>) {
        self.receivers.push((name.into(), receiver));
    }

    pub fn receiver(&self, name: &str) -> Result<Arc<dyn Receiver>> {
        self.receivers
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, r)| r.clone())
            .ok_or_else(|| Error::UnknownResource {
                kind: String::from("receiver"),
                name: name.to_string(),
            })
    }

    pub fn receiver_names(&self) -> Vec<&str> {
        self.receivers.iter().map(|(n, _)| n.as_str()).collect()
    }

    // === Database connections ===

    pub fn add_connection(&mut self, name: impl Into<String>, connection: Arc<dyn Connection>) {
        self.connections.push((name.into(), connection));
    }

    pub fn connection(&self, name: &str) -> Result<Arc<dyn Connection>> {
        self.connections
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, c)| c.clone())
            .ok_or_else(|| Error::UnknownResource {
                kind: String::from("connection"),
                name: name.to_string(),
            })
    }

    pub fn connection_names(&self) -> Vec<&str> {
        self.connections.iter().map(|(n, _)| n.as_str()).collect()
    }

    // === Mail transport ===

    pub fn set_mail_transport(&mut self, transport: Arc<dyn MailTransport>) {
        self.mail_transport = Some(transport);
    }

    /// Whether a mail transport is registered.
    ///
    /// Mail is an optional integration: callers probe for it with this
    /// query instead of resolving and catching the failure.
    pub fn has_mail_transport(&self) -> bool {
        self.mail_transport.is_some()
    }

    pub fn mail_transport(&self) -> Result<Arc<dyn MailTransport>> {
        self.mail_transport
            .clone()
            .ok_or_else(|| Error::MissingIntegration {
                kind: String::from("mail transport"),
                hint: String::from("register a mail transport to enable mail reporting"),
            })
    }
}

impl std::fmt::Debug for Resources {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resources")
            .field("storages", &self.storage_names())
            .field("receivers", &self.receiver_names())
            .field("connections", &self.connection_names())
            .field("mail_transport", &self.mail_transport.as_ref().map(|_| "..."))
            .finish()
    }
}
