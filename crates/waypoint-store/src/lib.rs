#![forbid(unsafe_code)]
//! waypoint-store: the API pipeline steps call.
//!
//! A step registers what it produced with [`ManifestStore::register_output`]
//! and finds what it needs with [`ManifestStore::get_input`] (declared,
//! mandatory inputs) or [`ManifestStore::get_latest_output`] (best-effort
//! discovery by key prefix and period). One store instance is created per
//! pipeline process and passed to each step; every mutation rewrites the
//! backing JSON file.

pub mod preflight;
pub mod resolve;
pub mod store;
pub mod summary;

pub use preflight::{DependencyCheck, DependencyReport};
pub use store::ManifestStore;
pub use summary::{ManifestSummary, StepSummary};
