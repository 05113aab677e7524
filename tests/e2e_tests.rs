//! End-to-end: a producer/consumer pair across process-like reopen and reset


use std::fs;
use std::path::Path;

use serde_json::json;
use test_data_gen::{manifest_path, temp_run_dir, write_artifact};
use waypoint::prelude::*;

#[test]
fn test_register_resolve_delete_reset() {
    let dir = temp_run_dir();
    let path = manifest_path(dir.path());
    let config = ManifestConfig {
        manifest_path: path.clone().into(),
        ..ManifestConfig::default()
    };
    let recs = write_artifact(dir.path(), "output/recs_202509A.csv", 2048);

    // producer
    {
        let mut store = ManifestStore::open(&config);
        let mut meta = Metadata::new();
        meta.insert("target_yyyymm".into(), json!("202509"));
        meta.insert("target_period".into(), json!("A"));
        store
            .register_output("step17", "augmented_recommendations", &recs, Some(meta))
            .unwrap();
    }

    // consumer in a later "process"
    let mut store = ManifestStore::open(&config);
    assert_eq!(store.get_input("step18", "augmented_recommendations").unwrap(), recs);
    assert_eq!(
        store.get_input("step18", "clustering_results").unwrap_err().to_string(),
        "no dependency declared for step18.clustering_results"
    );

    fs::remove_file(&recs).unwrap();
    let err = store.get_input("step18", "augmented_recommendations").unwrap_err();
    assert_eq!(err.to_string(), format!("file does not exist: {recs}"));

    let before = fs::read(&path).unwrap();
    let err = store
        .register_output(
            "step17",
            "augmented_recommendations",
            "output/store_config_2025Q2_combined.csv",
            None,
        )
        .unwrap_err();
    assert!(matches!(err, Error::ForbiddenPath { .. }));
    assert_eq!(fs::read(&path).unwrap(), before);

    store.reset(true, None);
    assert!(!Path::new(&path).exists());
    let summary = store.get_manifest_summary();
    assert_eq!(summary.steps_completed, 0);
    assert_eq!(summary.total_outputs, 0);
    assert!(matches!(
        store.get_input("step18", "augmented_recommendations"),
        Err(Error::SourceStepMissing { .. })
    ));
}

#[test]
fn test_pipeline_chain_in_memory() {
    let mem = MemoryStorage::new();
    let mut store = ManifestStore::with_storage(Box::new(mem.clone()), "output/pipeline_manifest.json");

    for (step, key) in [
        ("step13", "consolidated_rules"),
        ("step14", "fast_fish_format"),
        ("step15", "historical_reference"),
        ("step6", "clustering_results"),
    ] {
        let file = format!("output/{key}_202509A.csv");
        mem.insert(file.clone(), "col\n1\n");
        store.register_output(step, key, &file, None).unwrap();
    }

    let checks = store.check_dependencies(Some(StepId::new(17)));
    assert_eq!(checks.len(), 3);
    assert!(checks.iter().all(DependencyCheck::is_ok));

    let file = "output/recs_202509A.csv";
    mem.insert(file, "store,spu\n");
    let period: PeriodLabel = "202509A".parse().unwrap();
    store
        .register_period_output("step17", "augmented_recommendations", &period, file, None)
        .unwrap();
    assert_eq!(store.get_input("step18", "augmented_recommendations").unwrap(), file);

    // reopening over the same backend sees the same state
    let reopened = ManifestStore::with_storage(Box::new(mem.clone()), "output/pipeline_manifest.json");
    let summary = reopened.get_manifest_summary();
    assert_eq!(summary.steps_completed, 5);
    assert_eq!(summary.total_outputs, 6);
    assert_eq!(summary.steps["step17"].output_count, 2);
}

#[test]
fn test_reset_to_new_location() {
    let dir = temp_run_dir();
    let first = manifest_path(dir.path());
    let second = dir.path().join("rerun/manifest.json").to_string_lossy().into_owned();

    let mut store = ManifestStore::with_storage(Box::new(FsStorage::new()), first.clone());
    store.register_output("step1", "store_config", "out/cfg.csv", None).unwrap();

    store.reset(false, Some(second.as_str()));
    assert_eq!(store.path(), second);
    assert!(Path::new(&first).exists());
    assert_eq!(store.get_manifest_summary().steps_completed, 0);

    store.register_output("step2", "store_coordinates", "out/coords.csv", None).unwrap();
    assert!(Path::new(&second).exists());

    // keep_file reset reloads from disk
    store.reset(false, Some(first.as_str()));
    assert_eq!(store.list_available_outputs("step1"), vec!["store_config"]);
}
