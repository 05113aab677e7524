#![forbid(unsafe_code)]
//! waypoint-core: the pipeline manifest data model.
//!
//! Everything here is pure: the manifest/step/output records, typed step ids,
//! period labels, the static dependency table, and the forbidden-file guard.
//! Persistence lives in `waypoint-io`; the lookup/registration API in
//! `waypoint-store`.

pub mod clock;
pub mod config;
pub mod deps;
pub mod error;
pub mod guard;
pub mod id;
mod lenient;
pub mod model;
pub mod period;
pub mod prelude;

pub use error::{Error, Result};

/// Crate version, reported by `waypoint --version`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
