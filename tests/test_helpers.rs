// ==========================================
// Integration test helpers
// ==========================================
// Shared by every test binary; not every binary uses every helper.
#![allow(dead_code)]

use salesbook::{ImportConfig, SqliteSalesStore, WorkbookImporter};
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};

/// Fresh on-disk database in a temp directory. The TempDir guard must
/// outlive the store.
pub fn create_test_store() -> (TempDir, SqliteSalesStore) {
    let dir = TempDir::new().expect("create temp dir");
    let db_path = dir.path().join("test.db");
    let store = SqliteSalesStore::open(&db_path).expect("open test store");
    (dir, store)
}

pub fn create_test_importer() -> (TempDir, WorkbookImporter<SqliteSalesStore>) {
    let (dir, store) = create_test_store();
    (dir, WorkbookImporter::new(store, ImportConfig::default()))
}

/// Write a CSV fixture to a temp file with a .csv suffix.
pub fn write_csv_fixture(content: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".csv")
        .tempfile()
        .expect("create temp csv");
    file.write_all(content.as_bytes()).expect("write fixture");
    file
}
