#![forbid(unsafe_code)]
//! waypoint-io: where the manifest and the artifacts it points at live.
//!
//! - `storage`: the `Storage` trait plus the local filesystem backend.
//! - `memory_storage`: an in-memory backend for tests and benchmarks.
//! - `persist`: whole-file load/save of the manifest JSON.

pub mod memory_storage;
pub mod persist;
pub mod storage;

pub use memory_storage::MemoryStorage;
pub use persist::{load, save};
pub use storage::{FsStorage, Storage};
