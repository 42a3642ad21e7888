//! Check directory - the final collection of resolved, context-wrapped checks

use crate::report::CheckReport;
use std::sync::Arc;
use vigil_core::{CheckContext, Error, Result};

/// Accumulates contexts during the two build phases.
///
/// Suites and the contexts within them keep insertion order; a duplicate id
/// within a suite is a configuration error.
#[derive(Default)]
pub struct DirectoryBuilder {
    suites: Vec<(String, Vec<Arc<CheckContext>>)>,
}

impl DirectoryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, context: CheckContext) -> Result<()> {
        let index = match self
            .suites
            .iter()
            .position(|(name, _)| name == context.suite())
        {
            Some(index) => index,
            None => {
                self.suites.push((context.suite().to_string(), Vec::new()));
                self.suites.len() - 1
            }
        };
        let suite = &mut self.suites[index].1;

        if suite.iter().any(|existing| existing.id() == context.id()) {
            return Err(Error::DuplicateId {
                id: context.id().to_string(),
                suite: context.suite().to_string(),
            });
        }

        suite.push(Arc::new(context));
        Ok(())
    }

    /// Freeze the directory; no further mutation once execution begins
    pub fn finish(self) -> CheckDirectory {
        CheckDirectory {
            suites: self.suites,
        }
    }
}

/// Immutable mapping from suite name to its ordered check contexts
pub struct CheckDirectory {
    suites: Vec<(String, Vec<Arc<CheckContext>>)>,
}

impl CheckDirectory {
    /// Suite names in first-registration order
    pub fn suites(&self) -> impl Iterator<Item = &str> {
        self.suites.iter().map(|(name, _)| name.as_str())
    }

    pub fn suite(&self, name: &str) -> Option<&[Arc<CheckContext>]> {
        self.suites
            .iter()
            .find(|(suite, _)| suite == name)
            .map(|(_, contexts)| contexts.as_slice())
    }

    /// Total number of contexts across all suites
    pub fn len(&self) -> usize {
        self.suites.iter().map(|(_, contexts)| contexts.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.suites.iter().all(|(_, contexts)| contexts.is_empty())
    }

    /// Run every context in `suite`, in order
    pub fn run_suite(&self, name: &str) -> Option<Vec<CheckReport>> {
        self.suite(name)
            .map(|contexts| contexts.iter().map(|c| CheckReport::capture(c)).collect())
    }

    /// Run every context in every suite, suites in registration order
    pub fn run_all(&self) -> Vec<CheckReport> {
        self.suites
            .iter()
            .flat_map(|(_, contexts)| contexts.iter())
            .map(|c| CheckReport::capture(c))
            .collect()
    }
}

impl std::fmt::Debug for CheckDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut dbg = f.debug_map();
        for (suite, contexts) in &self.suites {
            let ids: Vec<_> = contexts.iter().map(|c| c.id()).collect();
            dbg.entry(suite, &ids);
        }
        dbg.finish()
    }
}
