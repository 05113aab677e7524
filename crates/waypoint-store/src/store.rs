//! The manifest store: an in-memory manifest bound to its backing file.
//!
//! Mutation discipline is whole-file: every registration updates memory and
//! rewrites the full JSON document. There is no locking; processes that
//! register concurrently against the same file race and the last writer wins.

use serde_json::Value;
use tracing::{error, info, warn};

use waypoint_core::config::ManifestConfig;
use waypoint_core::error::Result;
use waypoint_core::guard;
use waypoint_core::model::{Manifest, Metadata, OutputEntry, PERIOD_LABEL_KEY};
use waypoint_core::period::PeriodLabel;
use waypoint_io::{persist, FsStorage, Storage};

pub struct ManifestStore {
    pub(crate) storage: Box<dyn Storage>,
    pub(crate) path: String,
    pub(crate) manifest: Manifest,
}

impl ManifestStore {
    /// Open the manifest named by `config` on the local filesystem.
    pub fn open(config: &ManifestConfig) -> Self {
        Self::with_storage(Box::new(FsStorage::new()), config.manifest_path_str())
    }

    /// Open the manifest at `path` on an arbitrary backend. Artifact paths are
    /// checked against the same backend.
    pub fn with_storage(storage: Box<dyn Storage>, path: impl Into<String>) -> Self {
        let path = path.into();
        let manifest = persist::load(storage.as_ref(), &path);
        Self {
            storage,
            path,
            manifest,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Record that `step` produced `output_key` at `file_path` and persist.
    ///
    /// Existence and size are snapshotted now. Re-registering the same key
    /// replaces the previous entry. Forbidden combined files are rejected
    /// before anything is touched.
    pub fn register_output(
        &mut self,
        step: &str,
        output_key: &str,
        file_path: &str,
        metadata: Option<Metadata>,
    ) -> Result<()> {
        if let Err(e) = guard::ensure_allowed(file_path) {
            error!(step, output_key, path = file_path, "refusing to register forbidden combined file");
            return Err(e);
        }

        let entry = self.snapshot(file_path, metadata.unwrap_or_default());
        let exists = entry.exists;
        let size_mb = entry.size_mb;
        self.commit(vec![(step, output_key.to_string(), entry)])?;

        info!(step, output_key, path = file_path, exists, size_mb, "registered output");
        Ok(())
    }

    /// Register one artifact under both `output_key` and its period-qualified
    /// form (`<output_key>_<period>`), with `metadata.period_label` set.
    /// Both keys are written in a single save.
    pub fn register_period_output(
        &mut self,
        step: &str,
        output_key: &str,
        period: &PeriodLabel,
        file_path: &str,
        metadata: Option<Metadata>,
    ) -> Result<()> {
        if let Err(e) = guard::ensure_allowed(file_path) {
            error!(step, output_key, path = file_path, "refusing to register forbidden combined file");
            return Err(e);
        }

        let mut metadata = metadata.unwrap_or_default();
        metadata.insert(PERIOD_LABEL_KEY.to_string(), Value::String(period.to_string()));

        let entry = self.snapshot(file_path, metadata);
        let qualified = period.qualify(output_key);
        self.commit(vec![
            (step, output_key.to_string(), entry.clone()),
            (step, qualified.clone(), entry),
        ])?;

        info!(step, output_key, qualified_key = %qualified, path = file_path, "registered period output");
        Ok(())
    }

    /// Re-read the backing file, discarding in-memory state.
    pub fn reload(&mut self) {
        self.manifest = persist::load(self.storage.as_ref(), &self.path);
    }

    /// Start over. Deletes the backing file when `delete_file` is set
    /// (failures are logged, never returned), then rebinds to `manifest_path`
    /// (or the current path) and loads whatever is there.
    pub fn reset(&mut self, delete_file: bool, manifest_path: Option<&str>) {
        let path = manifest_path
            .map(str::to_string)
            .unwrap_or_else(|| self.path.clone());

        if delete_file && self.storage.exists(&path) {
            match self.storage.delete(&path) {
                Ok(()) => info!(path = %path, "deleted manifest file"),
                Err(e) => error!(path = %path, error = %e, "could not delete manifest file"),
            }
        }

        self.manifest = persist::load(self.storage.as_ref(), &path);
        self.path = path;
        info!(path = %self.path, session = %self.manifest.current_session, "manifest reset");
    }

    fn snapshot(&self, file_path: &str, metadata: Metadata) -> OutputEntry {
        OutputEntry::new(file_path, self.storage.stat(file_path), metadata)
    }

    /// Apply entries and save. On a failed save the in-memory manifest is
    /// restored so memory and disk don't diverge.
    fn commit(&mut self, entries: Vec<(&str, String, OutputEntry)>) -> Result<()> {
        let before = self.manifest.clone();
        for (step, key, entry) in entries {
            self.manifest.insert_output(step, &key, entry);
        }
        if let Err(e) = persist::save(self.storage.as_ref(), &mut self.manifest, &self.path) {
            warn!(path = %self.path, error = %e, "manifest save failed, registration rolled back");
            self.manifest = before;
            return Err(e);
        }
        Ok(())
    }
}
