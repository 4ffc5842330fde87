// ==========================================
// Salesbook - import error types
// ==========================================

use crate::repository::error::RepositoryError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("excel parse error: {0}")]
    ExcelParse(String),

    #[error("csv parse error: {0}")]
    CsvParse(String),

    #[error("file read error: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("store error: {0}")]
    Store(#[from] RepositoryError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::ExcelParse(err.to_string())
    }
}

impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParse(err.to_string())
    }
}

pub type ImportResult<T> = Result<T, ImportError>;
