//! Whole-file manifest persistence.
//!
//! Loading never fails: a missing, unreadable or unparseable file yields a
//! fresh empty manifest (history is lost, the pipeline keeps running). Saving
//! always rewrites the full document.

use tracing::{debug, error};

use waypoint_core::error::Result;
use waypoint_core::model::Manifest;

use crate::storage::Storage;

/// Load the manifest at `path`, or start an empty one.
pub fn load(storage: &dyn Storage, path: &str) -> Manifest {
    if !storage.exists(path) {
        debug!(path, "no manifest on disk, starting fresh");
        return Manifest::new();
    }

    let bytes = match storage.read(path) {
        Ok(b) => b,
        Err(e) => {
            error!(path, error = %e, "could not read manifest, starting fresh");
            return Manifest::new();
        }
    };

    match serde_json::from_slice::<Manifest>(&bytes) {
        Ok(m) => {
            debug!(path, steps = m.steps.len(), "loaded manifest");
            m
        }
        Err(e) => {
            error!(path, error = %e, "could not parse manifest, starting fresh");
            Manifest::new()
        }
    }
}

/// Stamp `last_updated` and write the full manifest to `path`.
pub fn save(storage: &dyn Storage, manifest: &mut Manifest, path: &str) -> Result<()> {
    manifest.touch();
    let bytes = to_json(manifest)?;
    storage.write(path, &bytes)?;
    debug!(path, outputs = manifest.total_outputs(), "saved manifest");
    Ok(())
}

/// Canonical on-disk encoding (pretty, 2-space indent, sorted keys).
pub fn to_json(manifest: &Manifest) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec_pretty(manifest)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory_storage::MemoryStorage;
    use waypoint_core::model::{Metadata, OutputEntry};

    const PATH: &str = "output/pipeline_manifest.json";

    #[test]
    fn absent_file_gives_empty_manifest() {
        let storage = MemoryStorage::new();
        let m = load(&storage, PATH);
        assert!(m.steps.is_empty());
        assert!(!m.created.is_empty());
        assert_eq!(m.current_session.len(), 15);
    }

    #[test]
    fn corrupt_file_gives_empty_manifest() {
        let storage = MemoryStorage::new();
        storage.insert(PATH, "{ not json");
        let m = load(&storage, PATH);
        assert!(m.steps.is_empty());
        // the corrupt file is left alone until the next save
        assert!(storage.contains(PATH));
    }

    #[test]
    fn wrong_shape_gives_empty_manifest() {
        let storage = MemoryStorage::new();
        storage.insert(PATH, r#"{"steps": ["step1"]}"#);
        assert!(load(&storage, PATH).steps.is_empty());
    }

    #[test]
    fn save_then_load() {
        let storage = MemoryStorage::new();
        let mut m = Manifest::new();
        m.insert_output("step1", "spu_sales", OutputEntry::new("out/spu.csv", Some(10), Metadata::new()));
        save(&storage, &mut m, PATH).unwrap();

        let loaded = load(&storage, PATH);
        assert_eq!(loaded, m);
    }

    #[test]
    fn resave_is_stable_except_last_updated() {
        let storage = MemoryStorage::new();
        let mut m = Manifest::new();
        m.insert_output("step2", "b", OutputEntry::new("b.csv", None, Metadata::new()));
        m.insert_output("step1", "a", OutputEntry::new("a.csv", Some(3), Metadata::new()));
        save(&storage, &mut m, PATH).unwrap();
        let first = storage.get(PATH).unwrap();

        let mut reloaded = load(&storage, PATH);
        reloaded.last_updated = m.last_updated.clone();
        assert_eq!(to_json(&reloaded).unwrap(), first);
    }

    #[test]
    fn pretty_two_space_indent() {
        let m = Manifest::new();
        let text = String::from_utf8(to_json(&m).unwrap()).unwrap();
        assert!(text.starts_with("{\n  \"created\""));
    }
}
