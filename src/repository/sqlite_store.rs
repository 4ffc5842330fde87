// ==========================================
// Salesbook - SQLite store
// ==========================================
// SalesStore over a shared rusqlite connection. The mutex is held
// only across synchronous work, never across an await point.
// ==========================================

use crate::db;
use crate::domain::entities::{Customer, Distributor, NewDistributor, NewSaleItem, Product, Sale};
use crate::domain::types::PaymentStatus;
use crate::repository::error::{RepoResult, RepositoryError};
use crate::repository::sales_store::SalesStore;
use async_trait::async_trait;
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub struct SqliteSalesStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteSalesStore {
    /// Open (creating if needed), build the schema, and seed the
    /// product catalog.
    pub fn open(path: &Path) -> RepoResult<Self> {
        let conn = db::open_sqlite_connection(path)
            .map_err(|e| RepositoryError::Connection(e.to_string()))?;
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> RepoResult<Self> {
        let conn = Connection::open_in_memory()?;
        db::configure_sqlite_connection(&conn)
            .map_err(|e| RepositoryError::Connection(e.to_string()))?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> RepoResult<Self> {
        db::init_schema(&conn).map_err(|e| RepositoryError::Connection(e.to_string()))?;
        db::seed_products(&conn).map_err(|e| RepositoryError::Connection(e.to_string()))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn lock(&self) -> RepoResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| RepositoryError::Connection("connection mutex poisoned".to_string()))
    }
}

fn map_customer(row: &Row<'_>) -> rusqlite::Result<Customer> {
    Ok(Customer {
        customer_id: row.get(0)?,
        customer_code: row.get(1)?,
        name: row.get(2)?,
        mobile: row.get(3)?,
        village: row.get(4)?,
        taluka: row.get(5)?,
        district: row.get(6)?,
        status: row.get(7)?,
    })
}

const CUSTOMER_COLS: &str =
    "customer_id, customer_code, name, mobile, village, taluka, district, status";

fn map_distributor(row: &Row<'_>) -> rusqlite::Result<Distributor> {
    Ok(Distributor {
        distributor_id: row.get(0)?,
        name: row.get(1)?,
        village: row.get(2)?,
        taluka: row.get(3)?,
        district: row.get(4)?,
        mantri_name: row.get(5)?,
        mantri_mobile: row.get(6)?,
        sabhasad_count: row.get(7)?,
        contact_in_group: row.get(8)?,
        status: row.get(9)?,
    })
}

fn map_product(row: &Row<'_>) -> rusqlite::Result<Product> {
    Ok(Product {
        product_id: row.get(0)?,
        product_name: row.get(1)?,
        packing_type: row.get(2)?,
        capacity_ltr: row.get(3)?,
        category: row.get(4)?,
        standard_rate: row.get(5)?,
    })
}

fn parse_status(raw: &str) -> PaymentStatus {
    match raw {
        "Paid" => PaymentStatus::Paid,
        "Partial" => PaymentStatus::Partial,
        _ => PaymentStatus::Pending,
    }
}

fn map_sale(row: &Row<'_>) -> rusqlite::Result<Sale> {
    let date_text: String = row.get(3)?;
    let status_text: String = row.get(6)?;
    Ok(Sale {
        sale_id: row.get(0)?,
        invoice_no: row.get(1)?,
        customer_id: row.get(2)?,
        sale_date: NaiveDate::parse_from_str(&date_text, "%Y-%m-%d").map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e))
        })?,
        total_amount: row.get(4)?,
        total_liters: row.get(5)?,
        payment_status: parse_status(&status_text),
        notes: row.get(7)?,
    })
}

const SALE_COLS: &str =
    "sale_id, invoice_no, customer_id, sale_date, total_amount, total_liters, payment_status, notes";

/// Recompute a sale's payment status from its payment total. Runs
/// inside the caller's lock.
fn refresh_payment_status(conn: &Connection, sale_id: i64) -> rusqlite::Result<()> {
    let total_paid: f64 = conn.query_row(
        "SELECT COALESCE(SUM(amount), 0) FROM payments WHERE sale_id = ?1",
        params![sale_id],
        |r| r.get(0),
    )?;
    let sale_total: f64 = conn.query_row(
        "SELECT total_amount FROM sales WHERE sale_id = ?1",
        params![sale_id],
        |r| r.get(0),
    )?;
    let status = PaymentStatus::from_amounts(total_paid, sale_total);
    conn.execute(
        "UPDATE sales SET payment_status = ?1 WHERE sale_id = ?2",
        params![status.to_string(), sale_id],
    )?;
    Ok(())
}

#[async_trait]
impl SalesStore for SqliteSalesStore {
    async fn find_customer(
        &self,
        mobile: &str,
        name: &str,
        village: &str,
    ) -> RepoResult<Option<Customer>> {
        let conn = self.lock()?;
        if !mobile.trim().is_empty() {
            let found = conn
                .query_row(
                    &format!("SELECT {} FROM customers WHERE mobile = ?1", CUSTOMER_COLS),
                    params![mobile.trim()],
                    map_customer,
                )
                .optional()?;
            if found.is_some() {
                return Ok(found);
            }
        }
        let found = conn
            .query_row(
                &format!(
                    "SELECT {} FROM customers WHERE name = ?1 AND village = ?2",
                    CUSTOMER_COLS
                ),
                params![name, village],
                map_customer,
            )
            .optional()?;
        Ok(found)
    }

    async fn insert_customer(
        &self,
        customer_code: &str,
        name: &str,
        mobile: &str,
        village: &str,
        taluka: &str,
        district: &str,
    ) -> RepoResult<i64> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO customers (customer_code, name, mobile, village, taluka, district) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![customer_code, name, mobile, village, taluka, district],
        )?;
        Ok(conn.last_insert_rowid())
    }

    async fn find_distributor(
        &self,
        name: &str,
        village: &str,
        taluka: &str,
    ) -> RepoResult<Option<Distributor>> {
        let conn = self.lock()?;
        let found = conn
            .query_row(
                "SELECT distributor_id, name, village, taluka, district, mantri_name, \
                 mantri_mobile, sabhasad_count, contact_in_group, status \
                 FROM distributors WHERE name = ?1 AND village = ?2 AND taluka = ?3",
                params![name, village, taluka],
                map_distributor,
            )
            .optional()?;
        Ok(found)
    }

    async fn insert_distributor(&self, distributor: &NewDistributor) -> RepoResult<i64> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO distributors \
             (name, village, taluka, district, mantri_name, mantri_mobile, \
              sabhasad_count, contact_in_group) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                distributor.name,
                distributor.village,
                distributor.taluka,
                distributor.district,
                distributor.mantri_name,
                distributor.mantri_mobile,
                distributor.sabhasad_count,
                distributor.contact_in_group,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    async fn find_product_id_by_name(&self, product_name: &str) -> RepoResult<Option<i64>> {
        let conn = self.lock()?;
        let found = conn
            .query_row(
                "SELECT product_id FROM products WHERE product_name = ?1",
                params![product_name],
                |r| r.get(0),
            )
            .optional()?;
        Ok(found)
    }

    async fn get_product(&self, product_id: i64) -> RepoResult<Option<Product>> {
        let conn = self.lock()?;
        let found = conn
            .query_row(
                "SELECT product_id, product_name, packing_type, capacity_ltr, category, \
                 standard_rate FROM products WHERE product_id = ?1",
                params![product_id],
                map_product,
            )
            .optional()?;
        Ok(found)
    }

    async fn find_sale_by_invoice(&self, invoice_no: &str) -> RepoResult<Option<Sale>> {
        let conn = self.lock()?;
        let found = conn
            .query_row(
                &format!("SELECT {} FROM sales WHERE invoice_no = ?1", SALE_COLS),
                params![invoice_no],
                map_sale,
            )
            .optional()?;
        Ok(found)
    }

    async fn insert_sale(
        &self,
        invoice_no: &str,
        customer_id: i64,
        sale_date: NaiveDate,
        items: &[NewSaleItem],
        notes: &str,
    ) -> RepoResult<i64> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        let total_amount: f64 = items.iter().map(|i| i.quantity as f64 * i.rate).sum();
        let total_liters: f64 = items.iter().map(|i| i.liters).sum();
        tx.execute(
            "INSERT INTO sales (invoice_no, customer_id, sale_date, total_amount, \
             total_liters, notes) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                invoice_no,
                customer_id,
                sale_date.format("%Y-%m-%d").to_string(),
                total_amount,
                total_liters,
                notes,
            ],
        )?;
        let sale_id = tx.last_insert_rowid();

        for item in items {
            tx.execute(
                "INSERT INTO sale_items (sale_id, product_id, quantity, rate, amount, liters) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    sale_id,
                    item.product_id,
                    item.quantity,
                    item.rate,
                    item.quantity as f64 * item.rate,
                    item.liters,
                ],
            )?;
        }

        tx.commit()?;
        Ok(sale_id)
    }

    async fn last_invoice_like(&self, pattern: &str) -> RepoResult<Option<String>> {
        let conn = self.lock()?;
        // Serials vary in digit count past 999, so plain lexicographic
        // order would rank INVCL0125999 above INVCL01251000. Length
        // first keeps the comparison numeric for a fixed prefix.
        let found = conn
            .query_row(
                "SELECT invoice_no FROM sales WHERE invoice_no LIKE ?1 \
                 ORDER BY LENGTH(invoice_no) DESC, invoice_no DESC LIMIT 1",
                params![pattern],
                |r| r.get(0),
            )
            .optional()?;
        Ok(found)
    }

    async fn insert_payment(
        &self,
        sale_id: i64,
        payment_date: NaiveDate,
        payment_method: &str,
        amount: f64,
        rrn: &str,
        reference: &str,
    ) -> RepoResult<i64> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        tx.execute(
            "INSERT INTO payments (sale_id, payment_date, payment_method, amount, rrn, reference) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                sale_id,
                payment_date.format("%Y-%m-%d").to_string(),
                payment_method,
                amount,
                rrn,
                reference,
            ],
        )?;
        let payment_id = tx.last_insert_rowid();
        refresh_payment_status(&tx, sale_id)?;
        tx.commit()?;
        Ok(payment_id)
    }

    async fn insert_message_log(
        &self,
        customer_id: i64,
        phone: &str,
        message: &str,
        status: &str,
    ) -> RepoResult<i64> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO message_logs (customer_id, phone, message, status) \
             VALUES (?1, ?2, ?3, ?4)",
            params![customer_id, phone, message, status],
        )?;
        Ok(conn.last_insert_rowid())
    }
}
