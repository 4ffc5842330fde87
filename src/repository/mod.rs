// ==========================================
// Salesbook - storage layer
// ==========================================

pub mod error;
pub mod sales_store;
pub mod sqlite_store;

pub use error::{RepoResult, RepositoryError};
pub use sales_store::SalesStore;
pub use sqlite_store::SqliteSalesStore;
