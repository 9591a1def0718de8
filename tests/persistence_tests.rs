//! Tests for FileStore persistence
//!
//! These tests verify:
//! - Load protocol: binary first, mirror fallback, empty start
//! - Save writes both files in full
//! - Save/load round trip for 0, 1 and 50 records
//! - Disk-space preflight (refusal, failing query)
//! - Write failures surface as IO errors

use std::path::{Path, PathBuf};

use clientstore::config::{Config, SyncStrategy};
use clientstore::persist::mirror::{self, MIRROR_HEADER};
use clientstore::persist::{preflight, FileStore, FileSystem, LoadSource, MemFs, OsFs, Persistence};
use clientstore::record::{encode_all, RECORD_SIZE};
use clientstore::{ClientData, ErrorKind, Record, StoreError};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_store() -> (TempDir, Config, FileStore) {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::builder()
        .data_dir(temp_dir.path())
        .sync_strategy(SyncStrategy::EveryWrite)
        .build();
    let store = FileStore::open(&config).unwrap();
    (temp_dir, config, store)
}

fn mem_config() -> Config {
    Config::builder().data_dir("/data").build()
}

fn setup_mem_store() -> (MemFs, FileStore<MemFs>) {
    let fs = MemFs::new();
    let store = FileStore::with_fs(&mem_config(), fs.clone()).unwrap();
    (fs, store)
}

fn records(count: i32) -> Vec<Record> {
    (1..=count)
        .map(|i| {
            let mut data = ClientData::new(&format!("Client {}", i), &format!("{:011}", i));
            data.birth_year = 1950 + (i % 50) as i16;
            data.credit_limit = i as f32 * 12.5;
            data.into_record(i)
        })
        .collect()
}

fn mirror_path(dir: &Path) -> PathBuf {
    dir.join("clientes.csv")
}

fn binary_path(dir: &Path) -> PathBuf {
    dir.join("clientes.dat")
}

// =============================================================================
// Open / Load Tests
// =============================================================================

#[test]
fn test_open_creates_directory() {
    let temp_dir = TempDir::new().unwrap();
    let data_dir = temp_dir.path().join("nested").join("store");
    let config = Config::builder().data_dir(&data_dir).build();

    let _store = FileStore::open(&config).unwrap();

    assert!(data_dir.is_dir());
}

#[test]
fn test_open_rejects_colliding_file_names() {
    let config = Config::builder()
        .data_dir("/data")
        .binary_file("same.txt")
        .mirror_file("same.txt")
        .build();

    let result = FileStore::with_fs(&config, MemFs::new());

    assert!(matches!(result, Err(StoreError::Config(_))));
}

#[test]
fn test_load_without_files_is_empty() {
    let (_temp, _config, mut store) = setup_temp_store();

    let loaded = store.load().unwrap();

    assert!(loaded.records.is_empty());
    assert_eq!(loaded.source, LoadSource::Empty);
}

#[test]
fn test_load_prefers_binary_over_mirror() {
    let (fs, mut store) = setup_mem_store();
    let dir = Path::new("/data");
    fs.insert_file(binary_path(dir), encode_all(&records(2)).to_vec());
    fs.insert_file(mirror_path(dir), mirror::render(&records(5)));

    let loaded = store.load().unwrap();

    assert_eq!(loaded.source, LoadSource::Binary);
    assert_eq!(loaded.records, records(2));
}

#[test]
fn test_load_falls_back_to_mirror() {
    let (fs, mut store) = setup_mem_store();
    fs.insert_file(mirror_path(Path::new("/data")), mirror::render(&records(3)));

    let loaded = store.load().unwrap();

    assert_eq!(loaded.source, LoadSource::Mirror);
    assert_eq!(loaded.records, records(3));
}

#[test]
fn test_load_torn_binary_is_corruption() {
    let (fs, mut store) = setup_mem_store();
    let mut data = encode_all(&records(2)).to_vec();
    data.truncate(RECORD_SIZE + 100);
    fs.insert_file(binary_path(Path::new("/data")), data);

    let result = store.load();

    assert!(matches!(result, Err(StoreError::Corruption(_))));
}

#[test]
fn test_load_bad_mirror_is_parse_error() {
    let (fs, mut store) = setup_mem_store();
    let text = format!("{}\n1;Ana;;abc;111;F;F;S;1.00;A\n", MIRROR_HEADER);
    fs.insert_file(mirror_path(Path::new("/data")), text);

    let err = store.load().unwrap_err();

    assert!(matches!(err, StoreError::MirrorParse { .. }));
    assert_eq!(err.kind(), ErrorKind::Corruption);
}

// =============================================================================
// Save Tests
// =============================================================================

#[test]
fn test_save_writes_both_files() {
    let (temp, _config, mut store) = setup_temp_store();

    store.save(&records(4)).unwrap();

    let binary = std::fs::read(binary_path(temp.path())).unwrap();
    assert_eq!(binary.len(), 4 * RECORD_SIZE);

    let text = std::fs::read_to_string(mirror_path(temp.path())).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 5);
    assert_eq!(lines[0], MIRROR_HEADER);
    assert!(lines[1].starts_with("1;Client 1;"));
}

#[test]
fn test_save_leaves_no_staging_files() {
    let (temp, _config, mut store) = setup_temp_store();

    store.save(&records(2)).unwrap();
    store.save(&records(1)).unwrap();

    let mut names: Vec<String> = std::fs::read_dir(temp.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names, vec!["clientes.csv", "clientes.dat"]);
}

#[test]
fn test_save_rewrites_in_full() {
    let (temp, _config, mut store) = setup_temp_store();

    store.save(&records(10)).unwrap();
    store.save(&records(3)).unwrap();

    let binary = std::fs::read(binary_path(temp.path())).unwrap();
    assert_eq!(binary.len(), 3 * RECORD_SIZE);
}

#[test]
fn test_round_trip_0_1_50_records() {
    for count in [0, 1, 50] {
        let (_temp, config, mut store) = setup_temp_store();
        let original = records(count);

        store.save(&original).unwrap();
        let loaded = FileStore::open(&config).unwrap().load().unwrap();

        assert_eq!(loaded.source, LoadSource::Binary, "count {}", count);
        assert_eq!(loaded.records, original, "count {}", count);
    }
}

// =============================================================================
// Preflight Tests
// =============================================================================

#[test]
fn test_estimate_adds_binary_mirror_and_margin() {
    assert_eq!(preflight::estimate(0, 0, 0), 0);
    assert_eq!(preflight::estimate(10, 500, 1000), 10 * RECORD_SIZE as u64 + 1500);
}

#[test]
fn test_insufficient_space_touches_no_file() {
    let (fs, mut store) = setup_mem_store();
    fs.set_available_space(1024);

    let err = store.save(&records(5)).unwrap_err();

    match err {
        StoreError::InsufficientSpace {
            required,
            available,
        } => {
            assert_eq!(available, 1024);
            assert!(required > 5 * RECORD_SIZE as u64);
        }
        other => panic!("expected InsufficientSpace, got {:?}", other),
    }
    assert_eq!(fs.write_count(), 0);
    assert!(!fs.exists(&binary_path(Path::new("/data"))));
}

#[test]
fn test_exact_space_is_enough() {
    let (fs, mut store) = setup_mem_store();
    let data = records(2);
    let required = preflight::estimate(2, mirror::render(&data).len(), mem_config().space_margin);
    fs.set_available_space(required);

    store.save(&data).unwrap();

    assert_eq!(fs.write_count(), 2);
}

#[test]
fn test_failing_space_query_does_not_block_save() {
    let (fs, mut store) = setup_mem_store();
    fs.fail_space_query(true);

    store.save(&records(2)).unwrap();

    assert_eq!(fs.write_count(), 2);
}

#[test]
fn test_os_fs_reports_free_space() {
    let temp_dir = TempDir::new().unwrap();
    let fs = OsFs::new(SyncStrategy::OsBuffered);

    assert!(fs.available_space(temp_dir.path()).unwrap() > 0);
}

#[test]
fn test_os_fs_durable_write_replaces_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("clientes.dat");
    let fs = OsFs::new(SyncStrategy::EveryWrite);

    fs.write_file(&path, b"first").unwrap();
    fs.write_file(&path, b"second").unwrap();

    assert_eq!(std::fs::read(&path).unwrap(), b"second");
    assert!(!temp_dir.path().join("clientes.dat.tmp").exists());
}

#[test]
fn test_save_keeps_non_utf8_bytes_on_disk() {
    let (temp, config, mut store) = setup_temp_store();
    let mut record = records(1).remove(0);
    record.address = clientstore::record::Address::from_bytes(b"Pra\xe7a da S\xe9");

    store.save(std::slice::from_ref(&record)).unwrap();

    let text = std::fs::read(mirror_path(temp.path())).unwrap();
    assert!(text.windows(12).any(|w| w == b"Pra\xe7a da S\xe9"));
    let loaded = FileStore::open(&config).unwrap().load().unwrap();
    assert_eq!(loaded.records, vec![record]);
}

// =============================================================================
// Write Failure Tests
// =============================================================================

#[test]
fn test_binary_write_failure_is_io_error() {
    let (fs, mut store) = setup_mem_store();
    fs.fail_writes_to(binary_path(Path::new("/data")));

    let err = store.save(&records(1)).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Io);
    assert!(!fs.exists(&mirror_path(Path::new("/data"))));
}

#[test]
fn test_mirror_write_failure_is_io_error() {
    let (fs, mut store) = setup_mem_store();
    fs.fail_writes_to(mirror_path(Path::new("/data")));

    let err = store.save(&records(1)).unwrap_err();

    assert!(matches!(err, StoreError::Io(_)));
}
