//! Dependency resolution.
//!
//! Two lookup styles:
//! - `get_input`: mandatory inputs declared in the static dependency table.
//!   Fails with a precise reason so operators can tell "never ran" from
//!   "ran but didn't register this" from "registered but deleted since".
//! - `get_latest_output`: optional inputs discovered by key prefix and/or
//!   period label. Absence is `None`; callers are expected to have a fallback.

use tracing::{debug, warn};

use waypoint_core::deps;
use waypoint_core::error::{Error, Result};
use waypoint_core::guard;
use waypoint_core::id::StepId;
use waypoint_core::model::OutputEntry;

use crate::store::ManifestStore;

impl ManifestStore {
    /// Resolve the file backing `step.input_type`.
    ///
    /// On success the path exists on disk at the time of return, is not a
    /// forbidden combined file, and is the most recent registration of the
    /// producing step's output.
    pub fn get_input(&self, step: &str, input_type: &str) -> Result<String> {
        let result = self.resolve_input(step, input_type);
        match &result {
            Ok(path) => debug!(step, input_type, path = %path, "resolved input"),
            Err(Error::ForbiddenPath { path }) => warn!(
                step,
                input_type,
                path = %path,
                "manifest points at a forbidden combined file, skipping"
            ),
            Err(e) => warn!(step, input_type, "{e}"),
        }
        result
    }

    fn resolve_input(&self, step: &str, input_type: &str) -> Result<String> {
        let undeclared = || Error::DependencyNotDeclared {
            step: step.to_string(),
            input: input_type.to_string(),
        };
        let consumer: StepId = step.parse().map_err(|_| undeclared())?;
        let dep = deps::lookup(consumer, input_type).ok_or_else(undeclared)?;

        let producer = dep.producer.to_string();
        let record = self
            .manifest
            .step(&producer)
            .ok_or_else(|| Error::SourceStepMissing {
                step: step.to_string(),
                input: input_type.to_string(),
                producer: producer.clone(),
            })?;
        if record.outputs.is_empty() {
            return Err(Error::SourceStepHasNoOutputs { producer });
        }
        let entry = record
            .outputs
            .get(dep.output)
            .ok_or_else(|| Error::SourceOutputMissing {
                producer: producer.clone(),
                output: dep.output.to_string(),
            })?;

        let path = entry.file_path.as_str();
        guard::ensure_allowed(path)?;
        // The stored `exists` flag is only a registration-time hint.
        if !self.storage.exists(path) {
            return Err(Error::FileDeleted {
                path: path.to_string(),
            });
        }
        Ok(path.to_string())
    }

    /// Most recently created output of `step` whose key starts with
    /// `key_prefix` and whose key, or `metadata.period_label`, ends with
    /// `period_label`. Either filter may be omitted.
    pub fn get_latest_output(
        &self,
        step: &str,
        key_prefix: Option<&str>,
        period_label: Option<&str>,
    ) -> Option<String> {
        let record = self.manifest.step(step)?;

        let mut latest: Option<&OutputEntry> = None;
        for (key, entry) in &record.outputs {
            if let Some(prefix) = key_prefix {
                if !key.starts_with(prefix) {
                    continue;
                }
            }
            if let Some(period) = period_label {
                if !entry.matches_period(key, period) {
                    continue;
                }
            }
            if entry.file_path.is_empty() {
                continue;
            }
            // strictly greater: ties keep the first match in key order
            if latest.map_or(true, |best| entry.created > best.created) {
                latest = Some(entry);
            }
        }

        match latest {
            Some(entry) => {
                debug!(step, ?key_prefix, ?period_label, path = %entry.file_path, "latest output");
                Some(entry.file_path.clone())
            }
            None => {
                debug!(step, ?key_prefix, ?period_label, "no matching output");
                None
            }
        }
    }

    /// Output keys registered for `step`, sorted; empty if the step is unknown.
    pub fn list_available_outputs(&self, step: &str) -> Vec<String> {
        self.manifest
            .step(step)
            .map(|s| s.outputs.keys().cloned().collect())
            .unwrap_or_default()
    }
}
