//! Storage abstraction used for both the manifest file and the artifacts it
//! references.
//!
//! - `fs`: local filesystem (default).
//! - `MemoryStorage` (crate root): in-process map for tests.

mod fs;
pub use fs::FsStorage;

use waypoint_core::error::Result;

/// Minimal file interface the manifest needs.
///
/// Paths are the strings recorded in the manifest, relative paths resolve
/// against the process working directory for the filesystem backend.
pub trait Storage: Send + Sync {
    /// Replace the contents of `path`. Creates parent directories; readers
    /// never observe a half-written file.
    fn write(&self, path: &str, bytes: &[u8]) -> Result<()>;

    /// Read the whole file.
    fn read(&self, path: &str) -> Result<Vec<u8>>;

    /// Delete a path. Idempotent (no error if path doesn't exist).
    fn delete(&self, path: &str) -> Result<()>;

    /// Whether a regular file exists at `path` right now.
    fn exists(&self, path: &str) -> bool;

    /// Size in bytes.
    fn size(&self, path: &str) -> Result<u64>;

    /// Size if the file exists, `None` otherwise.
    fn stat(&self, path: &str) -> Option<u64> {
        if self.exists(path) {
            self.size(path).ok()
        } else {
            None
        }
    }
}

