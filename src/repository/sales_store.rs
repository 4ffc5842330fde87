// ==========================================
// Salesbook - sales store trait
// ==========================================
// Storage boundary for the ingestion pipeline. Implementations must
// keep the derived sale fields (total_amount, payment_status)
// consistent after every mutation.
// ==========================================

use crate::domain::entities::{Customer, Distributor, NewDistributor, NewSaleItem, Product, Sale};
use crate::repository::error::RepoResult;
use async_trait::async_trait;
use chrono::NaiveDate;

#[async_trait]
pub trait SalesStore: Send + Sync {
    // ------------------------------------------
    // Customers
    // ------------------------------------------

    /// Find by mobile when present, otherwise by (name, village).
    async fn find_customer(
        &self,
        mobile: &str,
        name: &str,
        village: &str,
    ) -> RepoResult<Option<Customer>>;

    /// Insert and return the new row id. Fails with UniqueViolation on
    /// a customer_code collision.
    async fn insert_customer(
        &self,
        customer_code: &str,
        name: &str,
        mobile: &str,
        village: &str,
        taluka: &str,
        district: &str,
    ) -> RepoResult<i64>;

    // ------------------------------------------
    // Distributors
    // ------------------------------------------

    async fn find_distributor(
        &self,
        name: &str,
        village: &str,
        taluka: &str,
    ) -> RepoResult<Option<Distributor>>;

    async fn insert_distributor(&self, distributor: &NewDistributor) -> RepoResult<i64>;

    // ------------------------------------------
    // Products
    // ------------------------------------------

    /// Exact match against the canonical product name.
    async fn find_product_id_by_name(&self, product_name: &str) -> RepoResult<Option<i64>>;

    async fn get_product(&self, product_id: i64) -> RepoResult<Option<Product>>;

    // ------------------------------------------
    // Sales
    // ------------------------------------------

    async fn find_sale_by_invoice(&self, invoice_no: &str) -> RepoResult<Option<Sale>>;

    /// Insert a sale with its items in one transaction and return the
    /// sale id. Derived totals are computed from the items.
    async fn insert_sale(
        &self,
        invoice_no: &str,
        customer_id: i64,
        sale_date: NaiveDate,
        items: &[NewSaleItem],
        notes: &str,
    ) -> RepoResult<i64>;

    /// Latest invoice number matching a LIKE pattern, by serial order.
    async fn last_invoice_like(&self, pattern: &str) -> RepoResult<Option<String>>;

    // ------------------------------------------
    // Payments
    // ------------------------------------------

    /// Record a payment against a sale and recompute its payment
    /// status from the payment total.
    async fn insert_payment(
        &self,
        sale_id: i64,
        payment_date: NaiveDate,
        payment_method: &str,
        amount: f64,
        rrn: &str,
        reference: &str,
    ) -> RepoResult<i64>;

    // ------------------------------------------
    // Outbound messages
    // ------------------------------------------

    /// Append to the outbound message log.
    async fn insert_message_log(
        &self,
        customer_id: i64,
        phone: &str,
        message: &str,
        status: &str,
    ) -> RepoResult<i64>;
}
