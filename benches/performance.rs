use criterion::{criterion_group, criterion_main, Criterion};
use waypoint::prelude::*;

const PATH: &str = "output/pipeline_manifest.json";

/// Manifest with `steps` steps of `per_step` period-qualified outputs each,
/// every file present in memory.
fn populated_store(steps: u16, per_step: usize) -> ManifestStore {
    let mem = MemoryStorage::new();
    let mut store = ManifestStore::with_storage(Box::new(mem.clone()), PATH);
    for step in 1..=steps {
        let name = StepId::new(step).to_string();
        for i in 0..per_step {
            let file = format!("output/{name}_out{i}_202509A.csv");
            mem.insert(file.clone(), vec![0u8; 128]);
            store
                .register_output(&name, &format!("out{i}_202509A"), &file, None)
                .unwrap();
        }
    }
    store
}

fn bench_register(c: &mut Criterion) {
    let mut store = populated_store(36, 5);
    c.bench_function("register_output_180_entries", |b| {
        b.iter(|| {
            store
                .register_output("step36", "unified_delivery_csv", "output/delivery.csv", None)
                .unwrap();
        })
    });
}

fn bench_lookup(c: &mut Criterion) {
    let store = populated_store(36, 5);
    c.bench_function("get_latest_output_prefix_period", |b| {
        b.iter(|| {
            let _ = store.get_latest_output("step36", Some("out"), Some("202509A"));
        })
    });
    c.bench_function("get_input_missing_output", |b| {
        b.iter(|| {
            let _ = store.get_input("step18", "augmented_recommendations");
        })
    });
}

criterion_group!(manifest, bench_register, bench_lookup);
criterion_main!(manifest);
