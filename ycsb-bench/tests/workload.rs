use std::time::Duration;

use ycsb_bench::config::Config;
use ycsb_bench::dataset::{Dataset, DatasetShape};
use ycsb_bench::driver::{LookupOptions, run_lookups, run_scan};
use ycsb_bench::load::load;
use ycsb_bench::random::{DEFAULT_SEED, Random32};
use ycsb_bench::store::{self, InMemoryStore, SqliteStore, Storage, Store};
use ycsb_bench::zipf::ZipfSampler;
use ycsb_bench::{BenchError, error::ConfigError};

const SEED: u32 = 314_159_265;

const SHAPE: DatasetShape = DatasetShape {
    record_count: 1000,
    field_count: 10,
    field_length: 100,
};

fn loaded_sqlite(dataset: &Dataset) -> SqliteStore {
    let mut store = SqliteStore::in_memory().unwrap();
    load(&mut store, dataset, 1000).unwrap();
    store
}

#[test]
fn default_seed_matches_reference() {
    assert_eq!(DEFAULT_SEED, SEED);
}

#[test]
fn point_lookups_against_sqlite() {
    ycsb_test::tracing::init();

    let dataset = Dataset::generate(SHAPE, &mut Random32::new(SEED)).unwrap();
    let mut store = loaded_sqlite(&dataset);

    let sampler = ZipfSampler::new(SHAPE.record_count, 0.99).unwrap();
    let keys = sampler.generate_lookup_keys(&mut Random32::new(SEED), 10_000);
    assert!(keys.iter().all(|&key| key < 1000));

    let report = run_lookups(
        &mut store,
        &dataset,
        &keys,
        &mut Random32::new(SEED),
        LookupOptions::default(),
    )
    .unwrap();

    assert_eq!(report.lookups, 10_000);
    assert!(report.elapsed > Duration::ZERO);
    assert!(report.ops_per_second() > 0.0);
}

#[test]
fn full_scan_against_sqlite() {
    let dataset = Dataset::generate(SHAPE, &mut Random32::new(SEED)).unwrap();
    let mut store = loaded_sqlite(&dataset);

    let report = run_scan(&mut store, &SHAPE).unwrap();

    assert_eq!(report.records, 1000);
    assert_eq!(report.fields, 1000 * 10);
    assert_eq!(report.bytes, 1000 * 10 * 100);
    assert!(report.megabytes_per_second() > 0.0);
}

#[test]
fn regenerated_dataset_verifies_against_loaded_store() {
    // the oracle used for verification is built independently of the one that was loaded
    let loaded = Dataset::generate(SHAPE, &mut Random32::new(SEED)).unwrap();
    let mut store = loaded_sqlite(&loaded);
    drop(loaded);

    let oracle = Dataset::generate(SHAPE, &mut Random32::new(SEED)).unwrap();
    let keys: Vec<u64> = (0..1000).collect();
    run_lookups(
        &mut store,
        &oracle,
        &keys,
        &mut Random32::new(SEED),
        LookupOptions::default(),
    )
    .unwrap();

    // an oracle from another seed disagrees on the very first lookup
    let other = Dataset::generate(SHAPE, &mut Random32::new(SEED + 1)).unwrap();
    let err = run_lookups(
        &mut store,
        &other,
        &keys,
        &mut Random32::new(SEED),
        LookupOptions::default(),
    )
    .unwrap_err();
    let BenchError::Verification(mismatch) = err else {
        panic!("expected a verification failure, got {err:?}");
    };
    assert_eq!(mismatch.index, 0);
    assert_eq!(mismatch.key, 0);
}

#[test]
fn stores_agree() {
    let dataset = Dataset::generate(SHAPE, &mut Random32::new(SEED)).unwrap();

    let mut memory = InMemoryStore::new();
    load(&mut memory, &dataset, 333).unwrap();
    let mut sqlite = loaded_sqlite(&dataset);

    let mut from_memory = Vec::new();
    let mut from_sqlite = Vec::new();
    for key in (0..1000).step_by(37) {
        for field in 0..10 {
            assert!(memory.read_field(key, field, &mut from_memory).unwrap());
            assert!(sqlite.read_field(key, field, &mut from_sqlite).unwrap());
            assert_eq!(from_memory, from_sqlite);
        }
    }
}

#[test]
fn complete_run_with_configured_store() {
    ycsb_test::tracing::init();

    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        record_count: 1000,
        transactions: 10_000,
        batch_size: 250,
        latencies: true,
        store: Storage::Sqlite {
            path: Some(dir.path().join("ycsb.sqlite3")),
        },
        ..Default::default()
    };

    let mut store = store::open(&config.store).unwrap();
    let report = ycsb_bench::run(store.as_mut(), &config).unwrap();

    assert_eq!(report.shape, SHAPE);
    assert_eq!(report.load.records, 1000);
    assert_eq!(report.load.batches, 4);
    assert_eq!(report.lookup.lookups, 10_000);
    assert_eq!(report.lookup.latencies.as_ref().unwrap().count(), 10_000);
    assert_eq!(report.scan.bytes, 1_000_000);
}

#[test]
fn zero_seed_is_rejected_before_loading() {
    let config = Config {
        seed: 0,
        record_count: 1000,
        store: Storage::Memory,
        ..Default::default()
    };

    let mut store = InMemoryStore::new();
    let err = ycsb_bench::run(&mut store, &config).unwrap_err();
    assert!(matches!(err, BenchError::Config(ConfigError::ZeroSeed)));
    assert!(store.is_empty());
}
