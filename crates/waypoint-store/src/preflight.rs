//! Preflight: resolve declared dependencies ahead of a run.
//!
//! Unlike `get_input`, this never stops at the first failure; it reports the
//! outcome of every edge so an operator sees the whole broken frontier at once.

use serde::Serialize;

use waypoint_core::deps::{self, Dependency, DEPENDENCIES};
use waypoint_core::error::Error;
use waypoint_core::id::StepId;

use crate::store::ManifestStore;

#[derive(Debug)]
pub struct DependencyCheck {
    pub dependency: &'static Dependency,
    pub outcome: Result<String, Error>,
}

impl DependencyCheck {
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Serializable view for `--json` style output.
#[derive(Debug, Clone, Serialize)]
pub struct DependencyReport {
    pub consumer: String,
    pub input: String,
    pub source: String,
    pub path: Option<String>,
    pub error: Option<String>,
}

impl From<&DependencyCheck> for DependencyReport {
    fn from(check: &DependencyCheck) -> Self {
        let d = check.dependency;
        let (path, error) = match &check.outcome {
            Ok(p) => (Some(p.clone()), None),
            Err(e) => (None, Some(e.to_string())),
        };
        Self {
            consumer: d.consumer.to_string(),
            input: d.input.to_string(),
            source: d.source().to_string(),
            path,
            error,
        }
    }
}

impl ManifestStore {
    /// Check every declared dependency, or only those consumed by `step`.
    pub fn check_dependencies(&self, step: Option<StepId>) -> Vec<DependencyCheck> {
        let edges: Vec<&'static Dependency> = match step {
            Some(s) => deps::inputs_of(s).collect(),
            None => DEPENDENCIES.iter().collect(),
        };
        edges
            .into_iter()
            .map(|dependency| DependencyCheck {
                dependency,
                outcome: self.get_input(&dependency.consumer.to_string(), dependency.input),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use waypoint_io::MemoryStorage;

    #[test]
    fn reports_each_edge_of_a_step() {
        let mem = MemoryStorage::new();
        let mut store = ManifestStore::with_storage(Box::new(mem.clone()), "m.json");
        mem.insert("out/ffm.csv", "x");
        store.register_output("step14", "fast_fish_format", "out/ffm.csv", None).unwrap();

        let checks = store.check_dependencies(Some(StepId::new(17)));
        assert_eq!(checks.len(), 3);
        let ok: Vec<_> = checks.iter().filter(|c| c.is_ok()).collect();
        assert_eq!(ok.len(), 1);
        assert_eq!(ok[0].dependency.input, "fast_fish_format");

        let report = DependencyReport::from(&checks[1]);
        assert_eq!(report.consumer, "step17");
        assert!(report.error.is_some());
    }

    #[test]
    fn full_table_on_empty_manifest_all_fail() {
        let store = ManifestStore::with_storage(Box::new(MemoryStorage::new()), "m.json");
        let checks = store.check_dependencies(None);
        assert_eq!(checks.len(), DEPENDENCIES.len());
        assert!(checks.iter().all(|c| matches!(c.outcome, Err(Error::SourceStepMissing { .. }))));
    }

    #[test]
    fn step_without_inputs_has_nothing_to_check() {
        let store = ManifestStore::with_storage(Box::new(MemoryStorage::new()), "m.json");
        assert!(store.check_dependencies(Some(StepId::new(1))).is_empty());
    }
}
