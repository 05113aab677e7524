use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use waypoint_core::error::{Error, Result};

use super::Storage;

/// Local filesystem storage (rooted at the host filesystem).
#[derive(Debug, Clone, Default)]
pub struct FsStorage;

impl FsStorage {
    pub fn new() -> Self {
        Self
    }
}

/// Sibling staging file: `manifest.json` -> `manifest.json.tmp`.
fn staging_path(p: &Path) -> PathBuf {
    let mut name = p.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    p.with_file_name(name)
}

impl Storage for FsStorage {
    fn write(&self, path: &str, bytes: &[u8]) -> Result<()> {
        let p = Path::new(path);
        if let Some(parent) = p.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| Error::Storage(format!("mkparent: {e}")))?;
            }
        }

        let tmp = staging_path(p);
        let staged = (|| -> std::io::Result<()> {
            let mut f = File::create(&tmp)?;
            f.write_all(bytes)?;
            f.flush()?;
            f.sync_all()
        })();
        if let Err(e) = staged {
            let _ = fs::remove_file(&tmp);
            return Err(Error::Storage(format!("write {}: {e}", tmp.display())));
        }

        fs::rename(&tmp, p).map_err(|e| {
            let _ = fs::remove_file(&tmp);
            Error::Storage(format!("rename {} -> {}: {e}", tmp.display(), p.display()))
        })
    }

    fn read(&self, path: &str) -> Result<Vec<u8>> {
        fs::read(Path::new(path)).map_err(|e| Error::Storage(format!("read {path}: {e}")))
    }

    fn delete(&self, path: &str) -> Result<()> {
        let p = Path::new(path);
        if p.exists() {
            fs::remove_file(p).map_err(|e| Error::Storage(format!("delete {path}: {e}")))?;
        }
        Ok(())
    }

    fn exists(&self, path: &str) -> bool {
        Path::new(path).is_file()
    }

    fn size(&self, path: &str) -> Result<u64> {
        let meta = fs::metadata(Path::new(path))
            .map_err(|e| Error::Storage(format!("size {path}: {e}")))?;
        Ok(meta.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_creates_parents_and_leaves_no_staging_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/manifest.json");
        let path = path.to_str().unwrap();

        let storage = FsStorage::new();
        storage.write(path, b"{}").unwrap();

        assert_eq!(storage.read(path).unwrap(), b"{}");
        assert!(!Path::new(&format!("{path}.tmp")).exists());
    }

    #[test]
    fn write_replaces_existing_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("m.json");
        let path = path.to_str().unwrap();

        let storage = FsStorage::new();
        storage.write(path, b"first version, longer").unwrap();
        storage.write(path, b"second").unwrap();
        assert_eq!(storage.read(path).unwrap(), b"second");
        assert_eq!(storage.size(path).unwrap(), 6);
    }

    #[test]
    fn stat_and_delete() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.csv");
        let path = path.to_str().unwrap();

        let storage = FsStorage::new();
        assert_eq!(storage.stat(path), None);
        storage.write(path, b"id\n1\n").unwrap();
        assert_eq!(storage.stat(path), Some(5));

        storage.delete(path).unwrap();
        assert!(!storage.exists(path));
        // idempotent
        storage.delete(path).unwrap();
    }

    #[test]
    fn directories_are_not_files() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FsStorage::new();
        assert!(!storage.exists(dir.path().to_str().unwrap()));
    }
}
