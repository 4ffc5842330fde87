// ==========================================
// Salesbook - core library
// ==========================================
// Spreadsheet ingestion for small-business sales and distribution
// records. Stack: Rust + SQLite.
// ==========================================

// ==========================================
// Module declarations
// ==========================================

// Domain layer - entities and types
pub mod domain;

// Storage layer - data access
pub mod repository;

// Import layer - external data
pub mod importer;

// Configuration
pub mod config;

// Database infrastructure (connection init / PRAGMA in one place)
pub mod db;

// Logging
pub mod logging;

// Outbound notifications
pub mod notify;

// ==========================================
// Re-export core types
// ==========================================

// Domain types
pub use domain::types::{PaymentMethod, PaymentStatus, SaleType, SheetKind};

// Domain entities
pub use domain::{
    Customer, Distributor, NewDistributor, NewSaleItem, Payment, Product, Sale,
};

// Import structures
pub use domain::{CellValue, FileReport, RawSheet, RowOutcome, SheetReport};

// Import pipeline
pub use importer::{
    ImportError, ImportResult, SheetClassifier, SpreadsheetImporter, UniversalFileParser,
    WorkbookImporter,
};

// Storage
pub use repository::{RepositoryError, SalesStore, SqliteSalesStore};

// Configuration
pub use config::ImportConfig;

// ==========================================
// Version info
// ==========================================
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const APP_NAME: &str = "Salesbook";
