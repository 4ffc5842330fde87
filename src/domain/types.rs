// ==========================================
// Salesbook - domain type definitions
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// Sheet kind
// ==========================================
// Determined per sheet by the classifier, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SheetKind {
    Sales,
    Customer,
    Distributor,
    Payment,
    Unknown,
}

impl fmt::Display for SheetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SheetKind::Sales => write!(f, "SALES"),
            SheetKind::Customer => write!(f, "CUSTOMER"),
            SheetKind::Distributor => write!(f, "DISTRIBUTOR"),
            SheetKind::Payment => write!(f, "PAYMENT"),
            SheetKind::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

// ==========================================
// Payment status
// ==========================================
// Always recomputed from payments vs sale total, never hand-set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    Pending,
    Partial,
    Paid,
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentStatus::Pending => write!(f, "Pending"),
            PaymentStatus::Partial => write!(f, "Partial"),
            PaymentStatus::Paid => write!(f, "Paid"),
        }
    }
}

impl PaymentStatus {
    /// Derive status from the paid sum against the sale total.
    pub fn from_amounts(total_paid: f64, sale_total: f64) -> Self {
        if total_paid >= sale_total && sale_total > 0.0 {
            PaymentStatus::Paid
        } else if total_paid > 0.0 {
            PaymentStatus::Partial
        } else {
            PaymentStatus::Pending
        }
    }
}

// ==========================================
// Payment method
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    GPay,
    Cash,
    Cheque,
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentMethod::GPay => write!(f, "GPay"),
            PaymentMethod::Cash => write!(f, "Cash"),
            PaymentMethod::Cheque => write!(f, "Cheque"),
        }
    }
}

impl PaymentMethod {
    /// Parse a free-form method cell; anything unrecognised falls back to Cash.
    pub fn parse_or_cash(raw: &str) -> Self {
        match raw.trim().to_uppercase().as_str() {
            "GPAY" | "G-PAY" | "UPI" => PaymentMethod::GPay,
            "CHEQUE" | "CHQ" | "CHECK" => PaymentMethod::Cheque,
            _ => PaymentMethod::Cash,
        }
    }
}

// ==========================================
// Sale type
// ==========================================
// A single-unit or DEMO-referenced row is a demo sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SaleType {
    Demo,
    Bulk,
}

impl fmt::Display for SaleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaleType::Demo => write!(f, "DEMO_SALE"),
            SaleType::Bulk => write!(f, "BULK_SALE"),
        }
    }
}
