// ==========================================
// Salesbook - import pipeline
// ==========================================
// parse -> classify -> extract -> resolve -> persist
// ==========================================

pub mod classifier;
pub mod entity_resolver;
pub mod error;
pub mod extractor;
pub mod file_parser;
pub mod importer_trait;
pub mod normalizer;
pub mod orchestrator;

pub use classifier::SheetClassifier;
pub use entity_resolver::{EntityResolver, SENTINEL_ID};
pub use error::{ImportError, ImportResult};
pub use extractor::{Row, RowExtractor};
pub use file_parser::{CsvParser, ExcelParser, FileParser, UniversalFileParser};
pub use importer_trait::SpreadsheetImporter;
pub use orchestrator::WorkbookImporter;
