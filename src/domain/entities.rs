// ==========================================
// Salesbook - persistent entities
// ==========================================
// Imported data is written by the ingestion layer and read by the
// surrounding application; the ingestion layer never deletes.
// ==========================================

use crate::domain::types::PaymentStatus;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// Customer
// ==========================================
// Identity: non-empty mobile, or (name, village); a generated customer
// code when both are unknown. Find-or-create, never duplicated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub customer_id: i64,
    pub customer_code: Option<String>,
    pub name: String,
    pub mobile: String,
    pub village: String,
    pub taluka: String,
    pub district: String,
    pub status: String,
}

// ==========================================
// Distributor
// ==========================================
// Identity: (name, village, taluka). contact_in_group is persisted as
// imported even when it exceeds sabhasad_count; downstream analytics
// must tolerate that.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Distributor {
    pub distributor_id: i64,
    pub name: String,
    pub village: String,
    pub taluka: String,
    pub district: String,
    pub mantri_name: String,
    pub mantri_mobile: String,
    pub sabhasad_count: i64,
    pub contact_in_group: i64,
    pub status: String,
}

/// Field bundle for distributor insertion.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewDistributor {
    pub name: String,
    pub village: String,
    pub taluka: String,
    pub district: String,
    pub mantri_name: String,
    pub mantri_mobile: String,
    pub sabhasad_count: i64,
    pub contact_in_group: i64,
}

// ==========================================
// Product
// ==========================================
// Static reference set seeded at initialization; ingestion only looks
// products up by canonical name, it never creates them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub product_id: i64,
    pub product_name: String,
    pub packing_type: String,
    pub capacity_ltr: f64,
    pub category: String,
    pub standard_rate: f64,
}

// ==========================================
// Sale
// ==========================================
// total_amount and payment_status are derived from children and
// recomputed by the store after every mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sale {
    pub sale_id: i64,
    pub invoice_no: String,
    pub customer_id: i64,
    pub sale_date: NaiveDate,
    pub total_amount: f64,
    pub total_liters: f64,
    pub payment_status: PaymentStatus,
    pub notes: String,
}

/// One line of a sale as handed to the store; amount = quantity * rate
/// is computed at insertion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSaleItem {
    pub product_id: i64,
    pub quantity: i64,
    pub rate: f64,
    pub liters: f64,
}

// ==========================================
// Payment
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub payment_id: i64,
    pub sale_id: i64,
    pub payment_date: NaiveDate,
    pub payment_method: String,
    pub amount: f64,
    pub rrn: String,
    pub reference: String,
    pub status: String,
}
