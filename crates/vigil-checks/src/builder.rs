//! Two-phase directory build
//!
//! Phase 1 walks the declared check kinds in configuration order: concrete
//! entries are resolved and registered immediately; a declaration that is
//! exactly the wildcard sentinel is stashed in [`DeferredExpansions`].
//! Phase 2 runs only after phase 1 has finished for every kind (and thus
//! after every resource-producing subsystem has registered), handing each
//! deferred template to its kind's expansion hook.

use crate::directory::{CheckDirectory, DirectoryBuilder};
use crate::kind::KindRegistry;
use crate::normalize::{self, EntryOptions};
use serde_yaml::Mapping;
use tracing::{debug, info};
use vigil_core::{Error, Resources, Result};

/// Wildcard declarations waiting for phase 2, in deferral order.
///
/// Owned by the build and passed explicitly from phase 1 to phase 2; there
/// is no ambient stash between the phases.
#[derive(Default)]
struct DeferredExpansions {
    entries: Vec<(&'static str, EntryOptions)>,
}

/// Build the check directory from the `checks` configuration section.
///
/// `checks` maps a kind's config key to its declaration in any accepted
/// shorthand. All build-time errors are fatal; there are no partial builds.
pub fn build_directory(
    checks: &Mapping,
    kinds: &KindRegistry,
    resources: &Resources,
) -> Result<CheckDirectory> {
    let mut builder = DirectoryBuilder::new();
    let mut deferred = DeferredExpansions::default();

    // phase 1: direct registrations, wildcards deferred
    for (key, declaration) in checks {
        let key = key
            .as_str()
            .ok_or_else(|| Error::Configuration(String::from("check kind keys must be strings")))?;
        let kind = kinds
            .get(key)
            .ok_or_else(|| Error::UnknownCheckKind(key.to_string()))?;

        let normalized = normalize::normalize(key, declaration)?;
        if let Some(template) = normalized.wildcard() {
            if kind.process.is_none() {
                return Err(Error::WildcardUnsupported(key.to_string()));
            }
            debug!(kind = key, "deferring wildcard expansion");
            deferred.entries.push((kind.config_key, template.clone()));
        } else if !normalized.is_empty() {
            debug!(kind = key, entries = normalized.entries().len(), "registering checks");
            (kind.load)(normalized.entries(), resources, &mut builder)?;
        }
    }

    // phase 2: expand wildcards against the now-complete resource inventory
    for (key, template) in deferred.entries {
        let kind = kinds
            .get(key)
            .ok_or_else(|| Error::UnknownCheckKind(key.to_string()))?;
        let process = kind
            .process
            .ok_or_else(|| Error::WildcardUnsupported(key.to_string()))?;
        debug!(kind = key, "expanding wildcard");
        process(&template, resources, &mut builder)?;
    }

    let directory = builder.finish();
    info!(checks = directory.len(), "check directory built");
    Ok(directory)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;
    use vigil_core::{Receiver, Storage};

    struct NullStorage;

    impl Storage for NullStorage {
        fn write(&self, _path: &str, _contents: &[u8]) -> Result<()> {
            Ok(())
        }

        fn read(&self, _path: &str) -> Result<Vec<u8>> {
            Ok(Vec::new())
        }

        fn delete(&self, _path: &str) -> Result<()> {
            Ok(())
        }
    }

    struct NullReceiver;

    impl Receiver for NullReceiver {
        fn message_count(&self) -> Option<Result<u64>> {
            Some(Ok(0))
        }
    }

    fn resources_with_storages(names: &[&str]) -> Resources {
        let mut resources = Resources::new();
        for name in names {
            resources.add_storage(*name, Arc::new(NullStorage));
        }
        resources
    }

    fn checks(yaml: &str) -> Mapping {
        serde_yaml::from_str(yaml).unwrap()
    }

    fn build(yaml: &str, resources: &Resources) -> Result<CheckDirectory> {
        build_directory(&checks(yaml), &KindRegistry::builtin(), resources)
    }

    fn ids(directory: &CheckDirectory, suite: &str) -> Vec<String> {
        directory
            .suite(suite)
            .unwrap_or_default()
            .iter()
            .map(|c| c.id().to_string())
            .collect()
    }

    #[test]
    fn test_direct_registration() {
        let resources = resources_with_storages(&["uploads", "archive"]);
        let directory = build("storage: [uploads, archive]", &resources).unwrap();

        assert_eq!(ids(&directory, "default"), vec!["uploads", "archive"]);
    }

    #[test]
    fn test_wildcard_expands_every_resource() {
        let resources = resources_with_storages(&["a", "b", "c"]);
        let directory = build("storage: true", &resources).unwrap();

        assert_eq!(directory.len(), 3);
        assert_eq!(ids(&directory, "default"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_wildcard_template_applies_to_every_resource() {
        let resources = resources_with_storages(&["a", "b", "c"]);
        let directory = build("storage: { suite: nightly, ttl: 300 }", &resources).unwrap();

        let contexts = directory.suite("nightly").unwrap();
        assert_eq!(contexts.len(), 3);
        for (context, name) in contexts.iter().zip(["a", "b", "c"]) {
            assert_eq!(context.id(), name);
            assert_eq!(context.suite(), "nightly");
            assert_eq!(context.ttl(), Duration::from_secs(300));
        }
    }

    #[test]
    fn test_wildcard_with_zero_resources_fails_the_build() {
        let err = build("storage: true", &Resources::new()).unwrap_err();
        assert!(matches!(err, Error::MissingIntegration { .. }));
        assert!(err.to_string().contains("storages"));
    }

    #[test]
    fn test_all_shorthands_resolve_the_same_checks() {
        let shorthands = [
            "storage: [uploads]",
            "storage: uploads",
            "storage: true",
            "storage: { suite: default }",
        ];
        for yaml in shorthands {
            let resources = resources_with_storages(&["uploads"]);
            let directory = build(yaml, &resources).unwrap();
            assert_eq!(ids(&directory, "default"), vec!["uploads"], "for {yaml}");
        }
    }

    #[test]
    fn test_unknown_resource_reference_is_fatal() {
        let resources = resources_with_storages(&["uploads"]);
        let err = build("storage: [archive]", &resources).unwrap_err();
        assert!(matches!(err, Error::UnknownResource { .. }));
    }

    #[test]
    fn test_unknown_check_kind_is_fatal() {
        let err = build("filesystem: true", &Resources::new()).unwrap_err();
        assert!(matches!(err, Error::UnknownCheckKind(ref k) if k == "filesystem"));
    }

    #[test]
    fn test_duplicate_id_across_entries_is_fatal() {
        let resources = resources_with_storages(&["uploads", "archive"]);
        let err = build(
            "storage: { uploads: { id: default }, archive: { id: default } }",
            &resources,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            Error::DuplicateId { ref id, ref suite } if id == "default" && suite == "default"
        ));
    }

    #[test]
    fn test_disabled_kind_registers_nothing() {
        let resources = resources_with_storages(&["uploads"]);
        let directory = build("storage: false", &resources).unwrap();
        assert!(directory.is_empty());
    }

    #[test]
    fn test_phase_two_runs_after_all_direct_registrations() {
        // wildcard declared first; explicit receiver entries declared second
        // still land before the expanded storage checks run into id clashes
        let mut resources = resources_with_storages(&["uploads"]);
        resources.add_receiver("async", Arc::new(NullReceiver));

        let directory = build(
            "{ storage: true, receiver: [async] }",
            &resources,
        )
        .unwrap();

        // direct registrations first, expansions appended after
        assert_eq!(ids(&directory, "default"), vec!["async", "uploads"]);
    }

    #[test]
    fn test_multiple_wildcards_expand_in_declaration_order() {
        let mut resources = resources_with_storages(&["uploads"]);
        resources.add_receiver("async", Arc::new(NullReceiver));

        let directory = build("{ storage: true, receiver: true }", &resources).unwrap();
        assert_eq!(ids(&directory, "default"), vec!["uploads", "async"]);

        let directory = build("{ receiver: true, storage: true }", &resources).unwrap();
        assert_eq!(ids(&directory, "default"), vec!["async", "uploads"]);
    }

    #[test]
    fn test_ambiguous_wildcard_surfaces_from_normalization() {
        let resources = resources_with_storages(&["uploads"]);
        let err = build("storage: { __ALL__: ~, uploads: ~ }", &resources).unwrap_err();
        assert!(matches!(err, Error::AmbiguousWildcard { .. }));
    }

    #[test]
    fn test_mixed_suites_and_labels() {
        let mut resources = resources_with_storages(&["uploads"]);
        resources.add_receiver("async", Arc::new(NullReceiver));

        let directory = build(
            r#"
            storage:
              uploads: { suite: critical, label: "Uploads bucket" }
            receiver: [async]
            "#,
            &resources,
        )
        .unwrap();

        assert_eq!(directory.suites().collect::<Vec<_>>(), vec!["critical", "default"]);
        let uploads = &directory.suite("critical").unwrap()[0];
        assert_eq!(uploads.label(), "Uploads bucket");
        let receiver = &directory.suite("default").unwrap()[0];
        assert_eq!(receiver.label(), "receiver \"async\"");
    }
}
