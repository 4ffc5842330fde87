// ==========================================
// Salesbook - sheet classifier
// ==========================================
// Scores a sheet's cleaned column headers against per-kind keyword
// sets and picks the best match. Sales and Payment sheets share many
// headers; the highest score wins and a fixed precedence
// Payment > Sales > Distributor > Customer breaks ties.
// ==========================================

use crate::domain::types::SheetKind;
use tracing::debug;

const SALES_KEYWORDS: [&str; 12] = [
    "INVOICE", "SALE", "AMOUNT", "PRODUCT", "QUANTITY", "RATE", "TOTAL", "PRICE", "BILL",
    "PAYMENT", "ITEM", "QTY",
];

const CUSTOMER_KEYWORDS: [&str; 9] = [
    "CUSTOMER", "NAME", "MOBILE", "PHONE", "VILLAGE", "TALUKA", "DISTRICT", "CODE", "CONTACT",
];

const DISTRIBUTOR_KEYWORDS: [&str; 9] = [
    "DISTRIBUTOR", "MANTRI", "SABHASAD", "CONTACT_IN_GROUP", "VILLAGE", "TALUKA", "DISTRICT",
    "LEADER", "TEAM",
];

const PAYMENT_KEYWORDS: [&str; 9] = [
    "PAYMENT", "PAID", "AMOUNT", "INVOICE", "DATE", "METHOD", "CASH", "BANK", "REFERENCE",
];

/// Minimum keyword hits per kind. Distributor is deliberately
/// permissive because distributor sheets vary widely in layout.
const SALES_THRESHOLD: usize = 2;
const CUSTOMER_THRESHOLD: usize = 2;
const DISTRIBUTOR_THRESHOLD: usize = 1;
const PAYMENT_THRESHOLD: usize = 2;

pub struct SheetClassifier;

impl SheetClassifier {
    /// Classify a header list; returns the kind and its keyword score.
    /// Headers are expected trimmed and upper-cased by the parser.
    pub fn classify(headers: &[String]) -> (SheetKind, usize) {
        let sales = Self::score(headers, &SALES_KEYWORDS);
        let customer = Self::score(headers, &CUSTOMER_KEYWORDS);
        let distributor = Self::score(headers, &DISTRIBUTOR_KEYWORDS);
        let payment = Self::score(headers, &PAYMENT_KEYWORDS);

        debug!(
            sales, customer, distributor, payment,
            "sheet classification scores"
        );

        // Candidates clearing their threshold, in precedence order so
        // that max_by_key keeps the later (higher-precedence) entry on
        // equal scores.
        let candidates = [
            (SheetKind::Customer, customer, CUSTOMER_THRESHOLD),
            (SheetKind::Distributor, distributor, DISTRIBUTOR_THRESHOLD),
            (SheetKind::Sales, sales, SALES_THRESHOLD),
            (SheetKind::Payment, payment, PAYMENT_THRESHOLD),
        ];

        candidates
            .into_iter()
            .filter(|(_, score, threshold)| score >= threshold)
            .max_by_key(|(_, score, _)| *score)
            .map(|(kind, score, _)| (kind, score))
            .unwrap_or((SheetKind::Unknown, 0))
    }

    /// Count keywords with at least one substring match among headers.
    fn score(headers: &[String], keywords: &[&str]) -> usize {
        keywords
            .iter()
            .filter(|kw| headers.iter().any(|h| h.contains(*kw)))
            .count()
    }
}
