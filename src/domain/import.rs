// ==========================================
// Salesbook - transient import structures
// ==========================================
// Raw sheets and candidate records live only for the duration of one
// file import; nothing here is persisted.
// ==========================================

use crate::domain::types::SheetKind;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// Raw cell value
// ==========================================
// The file parsers map calamine / csv cells into this enum so the
// normalizers carry no parser dependency. Numbers are kept numeric
// because Excel serial dates arrive as floats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Blank,
}

impl CellValue {
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Blank => true,
            CellValue::Text(s) => s.trim().is_empty(),
            CellValue::Number(_) => false,
        }
    }

    /// Cell content as trimmed text; numbers render without a trailing
    /// ".0" so invoice and mobile columns read naturally.
    pub fn as_text(&self) -> String {
        match self {
            CellValue::Text(s) => s.trim().to_string(),
            CellValue::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    format!("{}", n)
                }
            }
            CellValue::Blank => String::new(),
        }
    }
}

// ==========================================
// Raw sheet
// ==========================================
// Ordered rows under cleaned (trimmed, upper-cased) column labels.
// A sheet the parser could not read still appears here with its
// failure recorded, so the file's other sheets keep processing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawSheet {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
    pub failure: Option<String>,
}

impl RawSheet {
    pub fn new(name: impl Into<String>, headers: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Self {
            name: name.into(),
            headers,
            rows,
            failure: None,
        }
    }

    /// A sheet that failed to parse; carries no data.
    pub fn failed(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            headers: Vec::new(),
            rows: Vec::new(),
            failure: Some(reason.into()),
        }
    }
}

// ==========================================
// Candidate records (one per sheet kind)
// ==========================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRow {
    pub invoice_no: Option<String>,
    pub customer_name: String,
    pub product_raw: String,
    pub quantity: i64,
    pub amount: f64,
    pub sale_date: Option<NaiveDate>,
    pub reference: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerRow {
    pub code: Option<String>,
    pub name: String,
    pub mobile: String,
    pub village: String,
    pub taluka: String,
    pub district: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributorRow {
    pub name: String,
    pub village: String,
    pub taluka: String,
    pub district: String,
    pub mantri_name: String,
    pub mantri_mobile: String,
    pub sabhasad_count: i64,
    pub contact_in_group: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRow {
    pub invoice_no: String,
    pub amount: f64,
    pub payment_date: Option<NaiveDate>,
    /// None when the sheet names no method; the configured default
    /// applies at persistence.
    pub payment_method: Option<String>,
    /// Bank retrieval reference, when the sheet carries one.
    pub rrn: Option<String>,
}

// ==========================================
// Row outcome
// ==========================================
// Explicit result tag per row so the orchestrator branches on data,
// not on caught exceptions.
#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome<T> {
    Record(T),
    Skip,
    Reject { reason: String },
}

// ==========================================
// Import accounting
// ==========================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetReport {
    pub sheet: String,
    pub kind: SheetKind,
    pub processed: usize,
    pub skipped: usize,
    pub rejected: usize,
    /// (row index, reason) for every rejected row.
    pub rejections: Vec<(usize, String)>,
    /// Set when the sheet failed as a whole (corrupt structure etc.).
    pub failure: Option<String>,
}

impl SheetReport {
    pub fn new(sheet: &str, kind: SheetKind) -> Self {
        Self {
            sheet: sheet.to_string(),
            kind,
            processed: 0,
            skipped: 0,
            rejected: 0,
            rejections: Vec::new(),
            failure: None,
        }
    }

    pub fn reject(&mut self, row_index: usize, reason: String) {
        self.rejected += 1;
        self.rejections.push((row_index, reason));
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileReport {
    pub batch_id: String,
    pub file: String,
    pub sheets: Vec<SheetReport>,
    /// Sheets with at least one persisted or resolved row.
    pub processed_sheets: usize,
    pub total_sheets: usize,
    /// Set when the file could not be opened or parsed at all.
    pub failure: Option<String>,
}

impl FileReport {
    /// A file that failed before any sheet was read.
    pub fn failed(batch_id: String, file: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            batch_id,
            file: file.into(),
            sheets: Vec::new(),
            processed_sheets: 0,
            total_sheets: 0,
            failure: Some(reason.into()),
        }
    }

    pub fn succeeded(&self) -> bool {
        self.failure.is_none() && self.processed_sheets > 0
    }

    pub fn total_processed(&self) -> usize {
        self.sheets.iter().map(|s| s.processed).sum()
    }

    pub fn total_rejected(&self) -> usize {
        self.sheets.iter().map(|s| s.rejected).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_value_as_text() {
        assert_eq!(CellValue::Text("  Ram Patel ".into()).as_text(), "Ram Patel");
        assert_eq!(CellValue::Number(9876543210.0).as_text(), "9876543210");
        assert_eq!(CellValue::Number(2.5).as_text(), "2.5");
        assert_eq!(CellValue::Blank.as_text(), "");
    }

    #[test]
    fn test_cell_value_is_blank() {
        assert!(CellValue::Blank.is_blank());
        assert!(CellValue::Text("   ".into()).is_blank());
        assert!(!CellValue::Number(0.0).is_blank());
    }

    #[test]
    fn test_file_report_json_shape() {
        let mut sheet = SheetReport::new("Sales", SheetKind::Sales);
        sheet.processed = 2;
        sheet.reject(4, "invalid quantity: 0".to_string());
        let report = FileReport {
            batch_id: "b-1".to_string(),
            file: "ledger.xlsx".to_string(),
            sheets: vec![sheet],
            processed_sheets: 1,
            total_sheets: 1,
            failure: None,
        };

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["file"], "ledger.xlsx");
        assert_eq!(json["sheets"][0]["kind"], "Sales");
        assert_eq!(json["sheets"][0]["rejected"], 1);
        assert!(json["failure"].is_null());
    }

    #[test]
    fn test_failed_file_report() {
        let report = FileReport::failed("b-2".to_string(), "broken.xlsx", "invalid zip");
        assert!(!report.succeeded());
        assert_eq!(report.total_sheets, 0);
        assert_eq!(report.failure.as_deref(), Some("invalid zip"));
    }
}
