//! Check kind registry
//!
//! Each probe type is described by a [`CheckKind`] record: its configuration
//! key, a short description, a loader that turns normalized entries into
//! registered checks, and (for kinds that can enumerate their resources) a
//! wildcard expansion hook. The registry is populated once at process start
//! and consulted by kind name during the build.

use crate::directory::DirectoryBuilder;
use crate::normalize::EntryOptions;
use std::time::Duration;
use vigil_core::{Check, CheckContext, Resources};

/// Registers one concrete check per entry into the directory being built.
///
/// Resolving a named resource that does not exist is a build-time fatal
/// error, never a runtime check failure.
pub type LoadFn =
    fn(&[(String, EntryOptions)], &Resources, &mut DirectoryBuilder) -> vigil_core::Result<()>;

/// Expands a deferred wildcard declaration against the resource inventory.
///
/// Runs strictly after every resource-producing subsystem has registered.
/// Finding zero resources of the kind is a build-time fatal error: an "all"
/// declaration over nothing almost always means a missing integration, not
/// an intentionally empty suite.
pub type ProcessFn = fn(&EntryOptions, &Resources, &mut DirectoryBuilder) -> vigil_core::Result<()>;

/// Descriptor for one probe type
pub struct CheckKind {
    /// Key identifying this kind in the `checks` configuration section
    pub config_key: &'static str,
    /// Short human description of what the check does
    pub config_info: Option<&'static str>,
    pub load: LoadFn,
    /// Absent for kinds that cannot enumerate their resources; wildcard
    /// declarations for such kinds are rejected
    pub process: Option<ProcessFn>,
}

/// Ordered registry of the available check kinds.
///
/// Registration order is the tie-break for deferred wildcard expansion, so
/// directory ordering stays reproducible for a given configuration.
pub struct KindRegistry {
    kinds: Vec<CheckKind>,
}

impl KindRegistry {
    pub fn new() -> Self {
        Self { kinds: Vec::new() }
    }

    /// Registry with the built-in kinds: `storage`, `receiver`, `database`
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(crate::storage::kind());
        registry.register(crate::receiver::kind());
        registry.register(crate::database::kind());
        registry
    }

    pub fn register(&mut self, kind: CheckKind) {
        debug_assert!(
            self.get(kind.config_key).is_none(),
            "check kind '{}' registered twice",
            kind.config_key
        );
        self.kinds.push(kind);
    }

    pub fn get(&self, config_key: &str) -> Option<&CheckKind> {
        self.kinds.iter().find(|k| k.config_key == config_key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CheckKind> {
        self.kinds.iter()
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

impl Default for KindRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Wrap a resolved check in its execution context, applying the entry's
/// options: `id` defaults to the resource name, `label` to the check's
/// identity, `suite` to `"default"`.
pub(crate) fn wrap(check: Box<dyn Check>, name: &str, options: &EntryOptions) -> CheckContext {
    let id = options.id.clone().unwrap_or_else(|| name.to_string());
    let mut context = CheckContext::new(check, id)
        .with_suite(options.suite.clone())
        .with_ttl(Duration::from_secs(options.ttl));
    if let Some(label) = &options.label {
        context = context.with_label(label.clone());
    }
    context
}
