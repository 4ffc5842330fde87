// ==========================================
// Salesbook - row extractor
// ==========================================
// Pulls typed candidate records out of classified sheet rows using
// flexible column-name matching with positional fallback. Rows come
// back as an explicit outcome: record, skip, or reject-with-reason.
// ==========================================

use crate::domain::import::{
    CellValue, CustomerRow, DistributorRow, PaymentRow, RowOutcome, SalesRow,
};
use crate::importer::normalizer::{
    clean_name, parse_date, safe_f64, safe_i64, standardize_location,
};

/// First-cell tokens that mark a repeated header row inside the data.
const HEADER_TOKENS: [&str; 11] = [
    "DATE", "VILLAGE", "TALUKA", "DISTRICT", "MANTRI", "SABHASAD", "CONTACT", "TOTAL", "SR",
    "NO.", "NAME",
];

// ==========================================
// Row accessor
// ==========================================
// Name-or-position field lookup in one place instead of scattered
// per-column probing (canonical name substring first, positional
// fallback second).
pub struct Row<'a> {
    headers: &'a [String],
    cells: &'a [CellValue],
}

impl<'a> Row<'a> {
    pub fn new(headers: &'a [String], cells: &'a [CellValue]) -> Self {
        Self { headers, cells }
    }

    /// Look a field up by header substring (any of `names`, matched
    /// against the upper-cased headers), falling back to `position`.
    pub fn field(&self, names: &[&str], position: usize) -> CellValue {
        for (idx, header) in self.headers.iter().enumerate() {
            if names.iter().any(|n| header.contains(n)) {
                if let Some(cell) = self.cells.get(idx) {
                    if !cell.is_blank() {
                        return cell.clone();
                    }
                }
            }
        }
        match self.cells.get(position) {
            Some(cell) if !cell.is_blank() => cell.clone(),
            _ => CellValue::Blank,
        }
    }

    /// Positional access only, no header matching.
    pub fn at(&self, position: usize) -> CellValue {
        self.cells.get(position).cloned().unwrap_or(CellValue::Blank)
    }

    fn first_cell_blank(&self) -> bool {
        self.cells.first().map(|c| c.is_blank()).unwrap_or(true)
    }

    fn is_empty_row(&self) -> bool {
        self.cells.iter().all(|c| c.is_blank())
    }

    /// Repeated header rows show a header token in the first cell.
    fn is_header_repeat(&self) -> bool {
        let first = self.at(0).as_text().to_uppercase();
        if first.is_empty() {
            return false;
        }
        HEADER_TOKENS.iter().any(|t| first.contains(t))
    }

    /// Skip policy for sheets keyed by their first column (code, sr
    /// no, invoice): blank first cell or repeated header.
    pub fn should_skip(&self) -> bool {
        self.first_cell_blank() || self.is_header_repeat()
    }

    /// Skip policy for sales sheets: a blank invoice cell is data (the
    /// invoice gets generated), so only fully blank and repeated
    /// header rows are skipped.
    pub fn should_skip_lenient(&self) -> bool {
        self.is_empty_row() || self.is_header_repeat()
    }
}

// ==========================================
// Row extractor
// ==========================================
pub struct RowExtractor;

impl RowExtractor {
    /// Sales row: invoice / customer / product / quantity / amount.
    /// Validation gates reject rows that cannot become a Sale; product
    /// resolution happens later, against the store.
    pub fn extract_sales(row: &Row<'_>, row_index: usize) -> RowOutcome<SalesRow> {
        if row.should_skip_lenient() {
            return RowOutcome::Skip;
        }

        let invoice_no = clean_name(&row.field(&["INVOICE"], 0));
        let customer_name = clean_name(&row.field(&["CUSTOMER", "NAME"], 1));
        let product_raw = row.field(&["PRODUCT", "PACKING"], 2);
        let quantity = safe_i64(&row.field(&["QUANTITY", "QTY", "QTN"], 3));
        let amount = safe_f64(&row.field(&["AMOUNT", "AMT"], 4));
        let sale_date = parse_date(&row.field(&["DATE"], usize::MAX)).date();
        let reference = clean_name(&row.field(&["REF"], usize::MAX));

        let customer_name = match customer_name {
            Some(name) => name,
            None => {
                return RowOutcome::Reject {
                    reason: "missing customer name".to_string(),
                }
            }
        };
        if quantity <= 0 {
            return RowOutcome::Reject {
                reason: format!("invalid quantity: {}", quantity),
            };
        }
        if amount <= 0.0 {
            return RowOutcome::Reject {
                reason: format!("invalid amount: {}", amount),
            };
        }
        let product_raw = match clean_name(&product_raw) {
            Some(p) => p,
            None => {
                return RowOutcome::Reject {
                    reason: "missing product".to_string(),
                }
            }
        };

        RowOutcome::Record(SalesRow {
            invoice_no,
            customer_name,
            product_raw,
            quantity,
            amount,
            sale_date,
            reference,
        })
    }

    /// Customer row: code / name / mobile / village / taluka / district.
    /// A "Name (Village)" cell is split when the village column is blank.
    pub fn extract_customer(row: &Row<'_>, _row_index: usize) -> RowOutcome<CustomerRow> {
        if row.should_skip() {
            return RowOutcome::Skip;
        }

        let code = clean_name(&row.field(&["CODE"], 0));
        let name = clean_name(&row.field(&["NAME", "CUSTOMER"], 1));
        let mobile = clean_name(&row.field(&["MOBILE", "PHONE"], 2)).unwrap_or_default();
        let mut village = standardize_location(&row.field(&["VILLAGE"], 3)).unwrap_or_default();
        let taluka = standardize_location(&row.field(&["TALUKA"], 4)).unwrap_or_default();
        let district = standardize_location(&row.field(&["DISTRICT"], 5)).unwrap_or_default();

        let mut name = match name {
            Some(n) => n,
            None => {
                return RowOutcome::Reject {
                    reason: "missing customer name".to_string(),
                }
            }
        };

        if village.is_empty() {
            if let Some((base, paren)) = name.split_once('(') {
                let split_village = paren.trim_end_matches(')').trim().to_string();
                if !split_village.is_empty() {
                    name = base.trim().to_string();
                    village = split_village.to_uppercase();
                }
            }
        }

        if name.is_empty() {
            return RowOutcome::Reject {
                reason: "missing customer name".to_string(),
            };
        }

        RowOutcome::Record(CustomerRow {
            code,
            name,
            mobile,
            village,
            taluka,
            district,
        })
    }

    /// Distributor row; name derives from "{village} - {taluka}" when no
    /// explicit name column exists.
    pub fn extract_distributor(row: &Row<'_>, _row_index: usize) -> RowOutcome<DistributorRow> {
        if row.should_skip() {
            return RowOutcome::Skip;
        }

        let explicit_name = clean_name(&row.field(&["DISTRIBUTOR"], usize::MAX));
        let village = standardize_location(&row.field(&["VILLAGE"], 1)).unwrap_or_default();
        let taluka = standardize_location(&row.field(&["TALUKA"], 2)).unwrap_or_default();
        let district = standardize_location(&row.field(&["DISTRICT"], 3)).unwrap_or_default();
        let mantri_name = clean_name(&row.field(&["MANTRI"], 4)).unwrap_or_default();
        let mantri_mobile = clean_name(&row.field(&["MOBILE"], 5)).unwrap_or_default();
        let sabhasad_count = safe_i64(&row.field(&["SABHASAD"], 6));
        let contact_in_group = safe_i64(&row.field(&["CONTACT"], 7));

        if village.is_empty() && taluka.is_empty() {
            return RowOutcome::Reject {
                reason: "missing village and taluka".to_string(),
            };
        }

        let name = explicit_name.unwrap_or_else(|| match (village.is_empty(), taluka.is_empty()) {
            (false, false) => format!("{} - {}", village, taluka),
            (false, true) => village.clone(),
            _ => taluka.clone(),
        });

        RowOutcome::Record(DistributorRow {
            name,
            village,
            taluka,
            district,
            mantri_name,
            mantri_mobile,
            sabhasad_count: sabhasad_count.max(0),
            contact_in_group: contact_in_group.max(0),
        })
    }

    /// Payment row: invoice / amount / date / method. The referenced
    /// sale must already exist; that check happens against the store.
    pub fn extract_payment(row: &Row<'_>, _row_index: usize) -> RowOutcome<PaymentRow> {
        if row.should_skip() {
            return RowOutcome::Skip;
        }

        let invoice_no = clean_name(&row.field(&["INVOICE"], 0));
        let amount = safe_f64(&row.field(&["AMOUNT", "AMT"], 1));
        let payment_date = parse_date(&row.field(&["DATE"], 2)).date();
        let payment_method = clean_name(&row.field(&["METHOD"], 3));
        let rrn = clean_name(&row.field(&["RRN", "UTR"], usize::MAX));

        let invoice_no = match invoice_no {
            Some(inv) => inv,
            None => {
                return RowOutcome::Reject {
                    reason: "missing invoice number".to_string(),
                }
            }
        };
        if amount <= 0.0 {
            return RowOutcome::Reject {
                reason: format!("invalid payment amount: {}", amount),
            };
        }

        RowOutcome::Record(PaymentRow {
            invoice_no,
            amount,
            payment_date,
            payment_method,
            rrn,
        })
    }
}
