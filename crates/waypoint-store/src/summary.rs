//! Read-only overview for operators.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::store::ManifestStore;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ManifestSummary {
    pub manifest_path: String,
    pub created: String,
    pub last_updated: String,
    pub current_session: String,
    pub steps_completed: usize,
    pub total_outputs: usize,
    pub steps: BTreeMap<String, StepSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepSummary {
    pub outputs: Vec<String>,
    pub output_count: usize,
    /// Greatest `created` among the step's outputs.
    pub latest_output: Option<String>,
}

impl ManifestStore {
    pub fn get_manifest_summary(&self) -> ManifestSummary {
        let steps: BTreeMap<String, StepSummary> = self
            .manifest
            .steps
            .iter()
            .map(|(name, record)| {
                let latest_output = record
                    .outputs
                    .values()
                    .map(|e| e.created.as_str())
                    .filter(|c| !c.is_empty())
                    .max()
                    .map(str::to_string);
                let summary = StepSummary {
                    outputs: record.outputs.keys().cloned().collect(),
                    output_count: record.outputs.len(),
                    latest_output,
                };
                (name.clone(), summary)
            })
            .collect();

        ManifestSummary {
            manifest_path: self.path.clone(),
            created: self.manifest.created.clone(),
            last_updated: self.manifest.last_updated.clone(),
            current_session: self.manifest.current_session.clone(),
            steps_completed: steps.len(),
            total_outputs: steps.values().map(|s| s.output_count).sum(),
            steps,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use waypoint_io::MemoryStorage;

    #[test]
    fn counts_steps_and_outputs() {
        let mut store = ManifestStore::with_storage(Box::new(MemoryStorage::new()), "m.json");
        store.register_output("step1", "spu_sales", "a.csv", None).unwrap();
        store.register_output("step1", "store_config", "b.csv", None).unwrap();
        store.register_output("step6", "clustering_results", "c.csv", None).unwrap();

        let s = store.get_manifest_summary();
        assert_eq!(s.steps_completed, 2);
        assert_eq!(s.total_outputs, 3);
        assert_eq!(s.steps["step1"].outputs, vec!["spu_sales", "store_config"]);
        assert_eq!(s.manifest_path, "m.json");

        let step1 = &store.manifest().steps["step1"];
        let newest = step1.outputs.values().map(|e| e.created.clone()).max();
        assert_eq!(s.steps["step1"].latest_output, newest);
    }

    #[test]
    fn empty_manifest() {
        let store = ManifestStore::with_storage(Box::new(MemoryStorage::new()), "m.json");
        let s = store.get_manifest_summary();
        assert_eq!(s.steps_completed, 0);
        assert_eq!(s.total_outputs, 0);
        assert!(s.steps.is_empty());
    }
}
