#![forbid(unsafe_code)]
//! waypoint: a JSON-backed manifest that records where each pipeline step's
//! outputs landed, so later steps can find them without globbing.
//!
//! ```no_run
//! use waypoint::prelude::*;
//!
//! let mut store = ManifestStore::open(&ManifestConfig::from_env());
//! store.register_output("step17", "augmented_recommendations", "output/recs_202509A.csv", None)?;
//! let path = store.get_input("step18", "augmented_recommendations")?;
//! println!("step18 reads {path}");
//! # Ok::<(), waypoint::Error>(())
//! ```

pub use waypoint_core as core;
pub use waypoint_io as io;
pub use waypoint_store as store;

pub use waypoint_core::{Error, Result};
pub use waypoint_store::ManifestStore;

pub mod prelude {
    pub use waypoint_core::prelude::*;
    pub use waypoint_io::{FsStorage, MemoryStorage, Storage};
    pub use waypoint_store::{DependencyCheck, ManifestStore, ManifestSummary};
}
