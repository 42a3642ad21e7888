//! Check trait and the caching context wrapper

use crate::outcome::Outcome;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// The trait that all health-check probes implement
///
/// A probe must not return an error or panic for its expected failure modes:
/// "the resource is unhealthy" is [`Outcome::failure`], not an abort. Panics
/// are contained by [`CheckContext`] as a last resort.
pub trait Check: Send + Sync {
    /// Stable human-readable name, used in reports and logs
    /// (e.g. `storage "uploads"`)
    fn identity(&self) -> String;

    /// Execute the probe against its bound resource
    fn run(&self) -> Outcome;
}

struct CachedOutcome {
    outcome: Outcome,
    at: Instant,
}

/// Execution wrapper around one concrete [`Check`].
///
/// The context is the unit actually stored in the check directory and
/// executed: it adds a stable id, a display label, suite membership, and a
/// TTL-based cache of the last outcome. The cache slot is guarded by its own
/// mutex, so concurrent `run()` calls on the same context never observe a
/// half-updated result; there is no locking across contexts.
pub struct CheckContext {
    check: Box<dyn Check>,
    id: String,
    suite: String,
    label: String,
    ttl: Duration,
    cache: Mutex<Option<CachedOutcome>>,
}

impl CheckContext {
    /// Default suite for contexts that don't declare one
    pub const DEFAULT_SUITE: &'static str = "default";

    /// Create a context wrapping `check`, with suite `"default"`, no TTL,
    /// and the check's identity as label
    pub fn new(check: Box<dyn Check>, id: impl Into<String>) -> Self {
        let label = check.identity();
        Self {
            check,
            id: id.into(),
            suite: String::from(Self::DEFAULT_SUITE),
            label,
            ttl: Duration::ZERO,
            cache: Mutex::new(None),
        }
    }

    pub fn with_suite(mut self, suite: impl Into<String>) -> Self {
        self.suite = suite.into();
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Cache outcomes for `ttl`; zero means every `run()` executes the probe
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn suite(&self) -> &str {
        &self.suite
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Run the wrapped check, serving the cached outcome while it is fresh.
    ///
    /// A panic in the wrapped probe is converted to [`Outcome::failure`] so
    /// one misbehaving check cannot abort a batch execution.
    pub fn run(&self) -> Outcome {
        self.run_at(Instant::now())
    }

    pub(crate) fn run_at(&self, now: Instant) -> Outcome {
        let mut slot = self.cache.lock().unwrap_or_else(|e| e.into_inner());

        if !self.ttl.is_zero() {
            if let Some(cached) = slot.as_ref() {
                if now.duration_since(cached.at) < self.ttl {
                    return cached.outcome.clone();
                }
            }
        }

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.check.run()))
            .unwrap_or_else(|payload| {
                Outcome::failure(format!(
                    "check '{}' aborted unexpectedly: {}",
                    self.id,
                    panic_message(payload.as_ref())
                ))
            });

        *slot = Some(CachedOutcome {
            outcome: outcome.clone(),
            at: now,
        });

        outcome
    }
}

impl std::fmt::Debug for CheckContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckContext")
            .field("id", &self.id)
            .field("suite", &self.suite)
            .field("label", &self.label)
            .field("ttl", &self.ttl)
            .finish()
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        "unknown panic"
    }
}
