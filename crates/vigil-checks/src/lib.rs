//! Vigil Checks - check registration and wildcard expansion engine
//!
//! Turns declarative check configuration into a frozen [`CheckDirectory`]:
//! - `normalize`: reduces the accepted configuration shorthands to one
//!   canonical per-resource entry list
//! - `kind`: the registry of available probe types
//! - `builder`: the two-phase build (direct registrations, then deferred
//!   wildcard expansion against the resource inventory)
//! - `directory` / `report`: the execution and reporting boundary
//! - `storage` / `receiver` / `database`: the built-in probe kinds

pub mod builder;
pub mod database;
pub mod directory;
pub mod kind;
pub mod normalize;
pub mod receiver;
pub mod report;
pub mod storage;

pub use builder::build_directory;
pub use directory::{CheckDirectory, DirectoryBuilder};
pub use kind::{CheckKind, KindRegistry};
pub use normalize::{normalize, EntryOptions, NormalizedConfig, WILDCARD};
pub use report::{
    build_reporters, CheckReport, LogReporter, MailReporter, MailReportingOptions, Reporter,
};
