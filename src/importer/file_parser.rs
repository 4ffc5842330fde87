// ==========================================
// Salesbook - spreadsheet file parsing
// ==========================================
// Turns Excel workbooks and CSV files into uniform RawSheet grids.
// Headers are the first row, trimmed and upper-cased; everything
// below is data.
// ==========================================

use crate::domain::import::{CellValue, RawSheet};
use crate::importer::error::{ImportError, ImportResult};
use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;
use tracing::{debug, info, warn};

/// File format parsing boundary. Implementations are synchronous;
/// parsing happens before any store access.
pub trait FileParser {
    /// Parse every sheet in the file.
    fn parse(&self, path: &Path) -> ImportResult<Vec<RawSheet>>;
}

// ==========================================
// Excel
// ==========================================
pub struct ExcelParser;

impl FileParser for ExcelParser {
    fn parse(&self, path: &Path) -> ImportResult<Vec<RawSheet>> {
        let mut workbook = open_workbook_auto(path)?;
        let sheet_names = workbook.sheet_names().to_owned();
        let mut sheets = Vec::with_capacity(sheet_names.len());

        for name in sheet_names {
            // A single unreadable sheet must not discard the rest of
            // the workbook.
            let range = match workbook.worksheet_range(&name) {
                Ok(range) => range,
                Err(e) => {
                    warn!("sheet '{}' unreadable: {}", name, e);
                    sheets.push(RawSheet::failed(&name, e.to_string()));
                    continue;
                }
            };
            let mut rows = range.rows();

            let headers: Vec<String> = match rows.next() {
                Some(first) => first
                    .iter()
                    .map(|c| cell_from_excel(c).as_text().trim().to_uppercase())
                    .collect(),
                None => {
                    debug!("sheet '{}' is empty, keeping with no rows", name);
                    Vec::new()
                }
            };

            let data: Vec<Vec<CellValue>> = rows
                .map(|r| r.iter().map(cell_from_excel).collect())
                .collect();

            debug!("parsed sheet '{}': {} data rows", name, data.len());
            sheets.push(RawSheet::new(name.clone(), headers, data));
        }

        info!("parsed {} sheet(s) from {}", sheets.len(), path.display());
        Ok(sheets)
    }
}

fn cell_from_excel(data: &Data) -> CellValue {
    match data {
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::String(s) => {
            if s.trim().is_empty() {
                CellValue::Blank
            } else {
                CellValue::Text(s.clone())
            }
        }
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Bool(b) => CellValue::Text(b.to_string()),
        Data::Empty | Data::Error(_) => CellValue::Blank,
    }
}

// ==========================================
// CSV
// ==========================================
// A CSV file is one sheet named after the file stem. Ragged rows are
// accepted; blank cells map to Blank.
pub struct CsvParser;

impl FileParser for CsvParser {
    fn parse(&self, path: &Path) -> ImportResult<Vec<RawSheet>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(path)?;

        let mut headers = Vec::new();
        let mut rows = Vec::new();
        for (idx, record) in reader.records().enumerate() {
            let record = record?;
            if idx == 0 {
                headers = record
                    .iter()
                    .map(|c| c.trim().to_uppercase())
                    .collect();
            } else {
                rows.push(record.iter().map(cell_from_csv).collect());
            }
        }

        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Sheet1".to_string());
        debug!("parsed csv '{}': {} data rows", name, rows.len());
        Ok(vec![RawSheet::new(name, headers, rows)])
    }
}

fn cell_from_csv(field: &str) -> CellValue {
    let trimmed = field.trim();
    if trimmed.is_empty() {
        CellValue::Blank
    } else {
        CellValue::Text(trimmed.to_string())
    }
}

// ==========================================
// Format dispatch
// ==========================================
pub struct UniversalFileParser;

impl UniversalFileParser {
    pub fn new() -> Self {
        Self
    }
}

impl Default for UniversalFileParser {
    fn default() -> Self {
        Self::new()
    }
}

impl FileParser for UniversalFileParser {
    fn parse(&self, path: &Path) -> ImportResult<Vec<RawSheet>> {
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.to_path_buf()));
        }
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "xlsx" | "xls" | "xlsm" | "xlsb" => ExcelParser.parse(path),
            "csv" => CsvParser.parse(path),
            other => Err(ImportError::UnsupportedFormat(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".csv")
            .tempfile()
            .unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_csv_headers_uppercased() {
        let file = write_csv("invoice,customer,amount\nINV001,Ram,500\n");
        let sheets = UniversalFileParser.parse(file.path()).unwrap();
        assert_eq!(sheets.len(), 1);
        assert_eq!(sheets[0].headers, vec!["INVOICE", "CUSTOMER", "AMOUNT"]);
        assert_eq!(sheets[0].rows.len(), 1);
        assert_eq!(sheets[0].rows[0][0], CellValue::Text("INV001".to_string()));
    }

    #[test]
    fn test_csv_blank_cells() {
        let file = write_csv("a,b\n,x\n");
        let sheets = UniversalFileParser.parse(file.path()).unwrap();
        assert_eq!(sheets[0].rows[0][0], CellValue::Blank);
    }

    #[test]
    fn test_csv_ragged_rows_accepted() {
        let file = write_csv("a,b,c\n1,2\n1,2,3,4\n");
        let sheets = UniversalFileParser.parse(file.path()).unwrap();
        assert_eq!(sheets[0].rows[0].len(), 2);
        assert_eq!(sheets[0].rows[1].len(), 4);
    }

    #[test]
    fn test_missing_file() {
        let err = UniversalFileParser
            .parse(Path::new("/nonexistent/file.csv"))
            .unwrap_err();
        assert!(matches!(err, ImportError::FileNotFound(_)));
    }

    #[test]
    fn test_unsupported_extension() {
        let file = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
        let err = UniversalFileParser.parse(file.path()).unwrap_err();
        assert!(matches!(err, ImportError::UnsupportedFormat(_)));
    }
}
