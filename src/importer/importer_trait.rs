// ==========================================
// Salesbook - spreadsheet importer trait
// ==========================================

use crate::domain::import::{FileReport, RawSheet};
use crate::importer::error::ImportResult;
use async_trait::async_trait;
use std::path::Path;

#[async_trait]
pub trait SpreadsheetImporter {
    /// Parse and import one file, all sheets. Sheet-level failures are
    /// recorded in the report; only file-level problems are errors.
    async fn import_file(&self, path: &Path) -> ImportResult<FileReport>;

    /// Import already-parsed sheets under a fresh batch id.
    async fn import_sheets(&self, source: &str, sheets: Vec<RawSheet>) -> ImportResult<FileReport>;

    /// Import every supported file in a directory, one at a time.
    async fn import_directory(&self, dir: &Path) -> ImportResult<Vec<FileReport>>;
}
