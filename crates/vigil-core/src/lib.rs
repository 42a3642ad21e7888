//! Vigil Core - Foundation types, traits, and error handling
//!
//! This crate provides the core abstractions used throughout the vigil engine:
//! - `Outcome`/`Status`: the immutable result of a single check execution
//! - `Check`: the trait that every probe implements
//! - `CheckContext`: the caching/labeling wrapper that is actually executed
//! - `Resources`: the runtime inventory of named resources checks bind to
//! - `Error`/`Result`: build-time error taxonomy

pub mod check;
pub mod error;
pub mod outcome;
pub mod resource;

// Re-export commonly used types at crate root
pub use check::{Check, CheckContext};
pub use error::{Error, Result};
pub use outcome::{Outcome, Status};
pub use resource::{Connection, MailTransport, Receiver, Resources, Storage};
