// ==========================================
// Salesbook - field normalizers
// ==========================================
// Pure cell-value normalization: dates, numbers, names, locations,
// product codes. Every function accepts any cell and returns a
// canonical value or an explicit unavailable sentinel; none raises.
// ==========================================

use crate::domain::import::CellValue;
use chrono::{Duration, NaiveDate};

/// Raw tokens treated as "no value" throughout the pipeline.
const PLACEHOLDERS: [&str; 3] = ["-", "_", "NOT_AVAILABLE"];

/// Known non-Latin locality spellings mapped to canonical names.
const LOCALITY_TABLE: [(&str, &str); 9] = [
    ("રામપુરા", "RAMPURA"),
    ("શેખડી", "SHEKHADI"),
    ("સિંહોલ", "SINHOL"),
    ("વણાદરા", "VANADARA"),
    ("માવલી", "MAVLI"),
    ("સિમરડા", "SIMRADA"),
    ("બિલપડ", "BILPAD"),
    ("વાઘોડિયા", "VAGHODIA"),
    ("સાકરિયા", "SAKARIYA"),
];

/// Known packing descriptions mapped to canonical product codes.
/// Matched by substring against the upper-cased raw value.
const PRODUCT_TABLE: [(&str, &str); 10] = [
    ("1 LTR PLASTIC JAR", "1L_PLASTIC_JAR"),
    ("2 LTR PLASTIC JAR", "2L_PLASTIC_JAR"),
    ("5 LTR PLASTIC JAR", "5L_PLASTIC_JAR"),
    ("10 LTR PLASTIC JAR", "10L_PLASTIC_JAR"),
    ("5 LTR STEEL BARNI", "5L_STEEL_BARNI"),
    ("10 LTR STEEL BARNI", "10L_STEEL_BARNI"),
    ("20 LTR STEEL BARNI", "20L_STEEL_BARNI"),
    ("20 LTR PLASTIC CAN", "20L_PLASTIC_CAN"),
    ("1 LTR PET BOTTLE", "1L_PET_BOTTLE"),
    ("20 LTR CARBO", "20L_CARBO"),
];

/// String date formats tried in order; first match wins.
const DATE_FORMATS: [&str; 5] = [
    "%Y-%m-%d %H:%M:%S",
    "%d/%m/%Y",
    "%Y-%m-%d",
    "%d-%m-%Y",
    "%d/%m/%Y %H:%M:%S",
];

pub fn is_placeholder(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty() || PLACEHOLDERS.contains(&trimmed)
}

// ==========================================
// Date parsing
// ==========================================

/// Distinguishes "no date given" from "a date was given but unreadable";
/// payment-status derivation needs the difference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateOutcome {
    Date(NaiveDate),
    Unavailable,
    Invalid,
}

impl DateOutcome {
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            DateOutcome::Date(d) => Some(*d),
            _ => None,
        }
    }
}

/// Parse a cell as a date: numeric values are spreadsheet serial dates
/// (epoch 1899-12-30), strings run through the fixed format list.
pub fn parse_date(value: &CellValue) -> DateOutcome {
    match value {
        CellValue::Blank => DateOutcome::Unavailable,
        CellValue::Number(serial) => serial_to_date(*serial),
        CellValue::Text(s) => {
            let trimmed = s.trim();
            if is_placeholder(trimmed) {
                return DateOutcome::Unavailable;
            }
            // Numeric strings are serials too (CSV sources lose the type).
            if let Ok(serial) = trimmed.parse::<f64>() {
                return serial_to_date(serial);
            }
            for fmt in DATE_FORMATS {
                if let Ok(d) = NaiveDate::parse_from_str(trimmed, fmt) {
                    return DateOutcome::Date(d);
                }
                if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(trimmed, fmt) {
                    return DateOutcome::Date(dt.date());
                }
            }
            DateOutcome::Invalid
        }
    }
}

fn serial_to_date(serial: f64) -> DateOutcome {
    if !serial.is_finite() || serial < 0.0 || serial > 2_958_465.0 {
        // 2958465 = 9999-12-31 in serial form
        return DateOutcome::Invalid;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30).expect("valid epoch");
    match epoch.checked_add_signed(Duration::days(serial as i64)) {
        Some(d) => DateOutcome::Date(d),
        None => DateOutcome::Invalid,
    }
}

// ==========================================
// Numeric parsing
// ==========================================

/// Blank / placeholder / unparseable cells become 0.0; never fails.
pub fn safe_f64(value: &CellValue) -> f64 {
    let parsed = match value {
        CellValue::Blank => 0.0,
        CellValue::Number(n) => *n,
        CellValue::Text(s) => {
            let trimmed = s.trim();
            if is_placeholder(trimmed) {
                0.0
            } else {
                trimmed.parse::<f64>().unwrap_or(0.0)
            }
        }
    };
    if parsed.is_finite() {
        parsed
    } else {
        0.0
    }
}

pub fn safe_i64(value: &CellValue) -> i64 {
    safe_f64(value) as i64
}

/// Division that clears inf/NaN from zero denominators.
pub fn safe_div(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        return 0.0;
    }
    let result = numerator / denominator;
    if result.is_finite() {
        result
    } else {
        0.0
    }
}

// ==========================================
// Name cleaning
// ==========================================

/// Collapse internal whitespace and strip; placeholders map to None.
pub fn clean_name(value: &CellValue) -> Option<String> {
    let text = value.as_text();
    if is_placeholder(&text) {
        return None;
    }
    Some(text.split_whitespace().collect::<Vec<_>>().join(" "))
}

// ==========================================
// Location standardization
// ==========================================

/// Known non-Latin spellings map to canonical names; anything else is
/// upper-cased and passed through. No translation failure is fatal.
pub fn standardize_location(value: &CellValue) -> Option<String> {
    let cleaned = clean_name(value)?;
    for (native, canonical) in LOCALITY_TABLE {
        if cleaned.contains(native) {
            return Some(canonical.to_string());
        }
    }
    Some(cleaned.to_uppercase())
}

// ==========================================
// Product code standardization
// ==========================================

/// Convert any packing description to a canonical product code. A miss
/// returns an UNKNOWN_-tagged code that deliberately fails the product
/// lookup downstream.
pub fn standardize_product(value: &CellValue) -> String {
    let cleaned = match clean_name(value) {
        Some(c) => c,
        None => return "UNKNOWN_PRODUCT".to_string(),
    };
    let upper = cleaned.to_uppercase();

    for (phrase, code) in PRODUCT_TABLE {
        if upper.contains(phrase) {
            return code.to_string();
        }
    }

    // Fuzzy rules keyed on capacity + material keywords.
    if upper.contains("1 LTR") || upper.contains("1L") {
        if upper.contains("PET") || upper.contains("BOTTLE") {
            return "1L_PET_BOTTLE".to_string();
        }
        if upper.contains("PLASTIC") || upper.contains("JAR") {
            return "1L_PLASTIC_JAR".to_string();
        }
    } else if upper.contains("2 LTR") || upper.contains("2L") {
        return "2L_PLASTIC_JAR".to_string();
    } else if upper.contains("5 LTR") || upper.contains("5L") {
        if upper.contains("STEEL") || upper.contains("BARNI") {
            return "5L_STEEL_BARNI".to_string();
        }
        return "5L_PLASTIC_JAR".to_string();
    } else if upper.contains("10 LTR") || upper.contains("10L") {
        if upper.contains("STEEL") || upper.contains("BARNI") {
            return "10L_STEEL_BARNI".to_string();
        }
        return "10L_PLASTIC_JAR".to_string();
    } else if upper.contains("20 LTR") || upper.contains("20L") {
        if upper.contains("STEEL") || upper.contains("BARNI") {
            return "20L_STEEL_BARNI".to_string();
        }
        if upper.contains("CARBO") {
            return "20L_CARBO".to_string();
        }
        if upper.contains("PLASTIC") || upper.contains("CAN") {
            return "20L_PLASTIC_CAN".to_string();
        }
    }

    format!("UNKNOWN_{}", upper.replace(' ', "_"))
}
