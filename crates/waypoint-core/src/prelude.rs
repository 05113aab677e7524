//! Convenient re-exports for downstream crates.

pub use crate::config::ManifestConfig;
pub use crate::deps::{Dependency, SourceRef};
pub use crate::error::{Error, Result};
pub use crate::id::StepId;
pub use crate::model::{Manifest, Metadata, OutputEntry, StepRecord};
pub use crate::period::{Half, PeriodLabel};
