//! Configuration normalization
//!
//! A check kind may be declared in several shorthand forms:
//!
//! ```yaml
//! storage: [uploads, archive]      # list of resource names
//! storage: uploads                 # single name
//! storage: true                    # every storage (wildcard)
//! storage: ~                       # same as true
//! storage: { suite: nightly }      # every storage, with shared options
//! storage:                         # canonical form
//!   uploads: { ttl: 60, suite: critical }
//! ```
//!
//! All forms reduce to an ordered list of `(resource name, options)` entries.
//! A wildcard declaration becomes a single entry keyed by the reserved
//! sentinel name; it is expanded against the live resource inventory later,
//! once every resource-producing subsystem has registered.

use serde_yaml::{Mapping, Value};
use vigil_core::{Error, Result};

/// Reserved resource name meaning "every resource of this kind"
pub const WILDCARD: &str = "__ALL__";

/// Per-resource options shared by every check kind.
///
/// Probe-specific keys (e.g. `operations`, `path` for storage checks) are
/// collected in `extra` and interpreted by the kind's loader.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryOptions {
    /// Suite this check is grouped into
    pub suite: String,
    /// Outcome cache TTL in seconds; 0 runs the probe on every invocation
    pub ttl: u64,
    /// Display name override; defaults to the check's identity
    pub label: Option<String>,
    /// Stable id override; defaults to the resource name
    pub id: Option<String>,
    /// Probe-specific keys, passed through to the kind's loader
    pub extra: Mapping,
}

impl Default for EntryOptions {
    fn default() -> Self {
        Self {
            suite: String::from("default"),
            ttl: 0,
            label: None,
            id: None,
            extra: Mapping::new(),
        }
    }
}

/// Canonical form of one kind's declaration: ordered resource-name entries
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedConfig {
    entries: Vec<(String, EntryOptions)>,
}

impl NormalizedConfig {
    pub fn entries(&self) -> &[(String, EntryOptions)] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the wildcard template when this config is exactly the
    /// sentinel entry
    pub fn wildcard(&self) -> Option<&EntryOptions> {
        match self.entries.as_slice() {
            [(name, options)] if name == WILDCARD => Some(options),
            _ => None,
        }
    }

    fn single(name: impl Into<String>, options: EntryOptions) -> Self {
        Self {
            entries: vec![(name.into(), options)],
        }
    }
}

/// Reduce any accepted shorthand for `kind` to the canonical entry list.
///
/// `false` and an empty list disable the kind (empty config). The wildcard
/// sentinel may never coexist with named entries; that combination is
/// rejected rather than silently picking a side.
pub fn normalize(kind: &str, value: &Value) -> Result<NormalizedConfig> {
    match value {
        Value::Null | Value::Bool(true) => {
            Ok(NormalizedConfig::single(WILDCARD, EntryOptions::default()))
        }
        Value::Bool(false) => Ok(NormalizedConfig::default()),
        Value::String(name) => Ok(NormalizedConfig::single(name, EntryOptions::default())),
        Value::Sequence(names) => normalize_list(kind, names),
        Value::Mapping(map) => normalize_mapping(kind, map),
        other => Err(invalid(
            kind,
            format!("unsupported declaration type: {}", type_name(other)),
        )),
    }
}

fn normalize_list(kind: &str, names: &[Value]) -> Result<NormalizedConfig> {
    let mut entries = Vec::with_capacity(names.len());
    for value in names {
        let name = value
            .as_str()
            .ok_or_else(|| invalid(kind, "list entries must be resource names"))?;
        entries.push((name.to_string(), EntryOptions::default()));
    }
    let normalized = NormalizedConfig { entries };
    reject_mixed_wildcard(kind, &normalized)?;
    Ok(normalized)
}

fn normalize_mapping(kind: &str, map: &Mapping) -> Result<NormalizedConfig> {
    // options mapping applying to every resource of the kind
    if map.contains_key(&Value::from("suite")) {
        return Ok(NormalizedConfig::single(WILDCARD, parse_options(kind, map)?));
    }

    let mut entries = Vec::with_capacity(map.len());
    for (key, value) in map {
        let name = key
            .as_str()
            .ok_or_else(|| invalid(kind, "resource names must be strings"))?;
        let options = match value {
            Value::Null => EntryOptions::default(),
            Value::Mapping(record) => parse_options(kind, record)?,
            _ => {
                return Err(invalid(
                    kind,
                    format!("entry '{name}' must be an options mapping"),
                ))
            }
        };
        entries.push((name.to_string(), options));
    }
    let normalized = NormalizedConfig { entries };
    reject_mixed_wildcard(kind, &normalized)?;
    Ok(normalized)
}

fn reject_mixed_wildcard(kind: &str, config: &NormalizedConfig) -> Result<()> {
    let has_wildcard = config.entries.iter().any(|(name, _)| name == WILDCARD);
    if has_wildcard && config.entries.len() > 1 {
        return Err(Error::AmbiguousWildcard {
            kind: kind.to_string(),
        });
    }
    Ok(())
}

fn parse_options(kind: &str, record: &Mapping) -> Result<EntryOptions> {
    let mut options = EntryOptions::default();
    for (key, value) in record {
        let key = key
            .as_str()
            .ok_or_else(|| invalid(kind, "option keys must be strings"))?;
        match key {
            "suite" => {
                options.suite = value
                    .as_str()
                    .ok_or_else(|| invalid(kind, "'suite' must be a string"))?
                    .to_string();
            }
            "ttl" => {
                options.ttl = value
                    .as_u64()
                    .ok_or_else(|| invalid(kind, "'ttl' must be a non-negative integer"))?;
            }
            "label" => {
                options.label = Some(
                    value
                        .as_str()
                        .ok_or_else(|| invalid(kind, "'label' must be a string"))?
                        .to_string(),
                );
            }
            "id" => {
                options.id = Some(
                    value
                        .as_str()
                        .ok_or_else(|| invalid(kind, "'id' must be a string"))?
                        .to_string(),
                );
            }
            _ => {
                options
                    .extra
                    .insert(Value::from(key), value.clone());
            }
        }
    }
    Ok(options)
}

fn invalid(kind: &str, message: impl Into<String>) -> Error {
    Error::InvalidCheckConfig {
        kind: kind.to_string(),
        message: message.into(),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "list",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}
