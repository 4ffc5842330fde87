// ==========================================
// Salesbook - SQLite setup
// ==========================================
// Connection configuration, schema creation, and the seeded product
// catalog. Schema creation is idempotent.
// ==========================================

use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use tracing::info;

pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5000;

/// product_name, packing_type, capacity_ltr, category, standard_rate.
/// product_name is the canonical code produced by product
/// standardization, so lookups need no further mapping.
const DEFAULT_PRODUCTS: [(&str, &str, f64, &str, f64); 10] = [
    ("1L_PLASTIC_JAR", "PLASTIC", 1.0, "JAR", 95.0),
    ("2L_PLASTIC_JAR", "PLASTIC", 2.0, "JAR", 185.0),
    ("5L_PLASTIC_JAR", "PLASTIC", 5.0, "JAR", 460.0),
    ("10L_PLASTIC_JAR", "PLASTIC", 10.0, "JAR", 880.0),
    ("5L_STEEL_BARNI", "STEEL", 5.0, "BARNI", 680.0),
    ("10L_STEEL_BARNI", "STEEL", 10.0, "BARNI", 1300.0),
    ("20L_STEEL_BARNI", "STEEL", 20.0, "BARNI", 2950.0),
    ("20L_PLASTIC_CAN", "PLASTIC", 20.0, "CAN", 2400.0),
    ("1L_PET_BOTTLE", "PET", 1.0, "BOTTLE", 85.0),
    ("20L_CARBO", "PLASTIC", 20.0, "CARBO", 2100.0),
];

/// Default database location under the user data directory.
pub fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("salesbook")
        .join("salesbook.db")
}

pub fn configure_sqlite_connection(conn: &Connection) -> Result<()> {
    conn.pragma_update(None, "foreign_keys", "ON")
        .context("enable foreign keys")?;
    conn.busy_timeout(std::time::Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))
        .context("set busy timeout")?;
    Ok(())
}

pub fn open_sqlite_connection(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create database directory {}", parent.display()))?;
        }
    }
    let conn = Connection::open(path)
        .with_context(|| format!("open database {}", path.display()))?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS customers (
            customer_id     INTEGER PRIMARY KEY AUTOINCREMENT,
            customer_code   TEXT UNIQUE,
            name            TEXT NOT NULL,
            mobile          TEXT DEFAULT '',
            village         TEXT DEFAULT '',
            taluka          TEXT DEFAULT '',
            district        TEXT DEFAULT '',
            status          TEXT DEFAULT 'Active',
            created_at      TEXT DEFAULT CURRENT_TIMESTAMP
        );
        CREATE INDEX IF NOT EXISTS idx_customers_mobile ON customers(mobile);
        CREATE INDEX IF NOT EXISTS idx_customers_name_village ON customers(name, village);

        CREATE TABLE IF NOT EXISTS distributors (
            distributor_id   INTEGER PRIMARY KEY AUTOINCREMENT,
            name             TEXT NOT NULL,
            village          TEXT DEFAULT '',
            taluka           TEXT DEFAULT '',
            district         TEXT DEFAULT '',
            mantri_name      TEXT DEFAULT '',
            mantri_mobile    TEXT DEFAULT '',
            sabhasad_count   INTEGER DEFAULT 0,
            contact_in_group INTEGER DEFAULT 0,
            status           TEXT DEFAULT 'Active',
            created_at       TEXT DEFAULT CURRENT_TIMESTAMP,
            UNIQUE(name, village, taluka)
        );

        CREATE TABLE IF NOT EXISTS products (
            product_id    INTEGER PRIMARY KEY AUTOINCREMENT,
            product_name  TEXT NOT NULL UNIQUE,
            packing_type  TEXT DEFAULT '',
            capacity_ltr  REAL DEFAULT 0,
            category      TEXT DEFAULT '',
            standard_rate REAL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS sales (
            sale_id        INTEGER PRIMARY KEY AUTOINCREMENT,
            invoice_no     TEXT NOT NULL UNIQUE,
            customer_id    INTEGER NOT NULL REFERENCES customers(customer_id),
            sale_date      TEXT NOT NULL,
            total_amount   REAL DEFAULT 0,
            total_liters   REAL DEFAULT 0,
            payment_status TEXT DEFAULT 'Pending',
            notes          TEXT DEFAULT '',
            created_at     TEXT DEFAULT CURRENT_TIMESTAMP
        );
        CREATE INDEX IF NOT EXISTS idx_sales_customer ON sales(customer_id);

        CREATE TABLE IF NOT EXISTS sale_items (
            item_id    INTEGER PRIMARY KEY AUTOINCREMENT,
            sale_id    INTEGER NOT NULL REFERENCES sales(sale_id),
            product_id INTEGER NOT NULL REFERENCES products(product_id),
            quantity   INTEGER NOT NULL,
            rate       REAL NOT NULL,
            amount     REAL NOT NULL,
            liters     REAL DEFAULT 0
        );
        CREATE INDEX IF NOT EXISTS idx_sale_items_sale ON sale_items(sale_id);

        CREATE TABLE IF NOT EXISTS payments (
            payment_id     INTEGER PRIMARY KEY AUTOINCREMENT,
            sale_id        INTEGER NOT NULL REFERENCES sales(sale_id),
            payment_date   TEXT NOT NULL,
            payment_method TEXT DEFAULT 'Cash',
            amount         REAL NOT NULL,
            rrn            TEXT DEFAULT '',
            reference      TEXT DEFAULT '',
            status         TEXT DEFAULT 'Completed',
            created_at     TEXT DEFAULT CURRENT_TIMESTAMP
        );
        CREATE INDEX IF NOT EXISTS idx_payments_sale ON payments(sale_id);

        CREATE TABLE IF NOT EXISTS message_logs (
            log_id      INTEGER PRIMARY KEY AUTOINCREMENT,
            customer_id INTEGER DEFAULT 0,
            phone       TEXT DEFAULT '',
            message     TEXT DEFAULT '',
            status      TEXT DEFAULT '',
            sent_at     TEXT DEFAULT CURRENT_TIMESTAMP
        );
        "#,
    )
    .context("create schema")?;
    Ok(())
}

/// Insert the product catalog; existing rows are left untouched.
pub fn seed_products(conn: &Connection) -> Result<()> {
    let mut stmt = conn.prepare(
        "INSERT OR IGNORE INTO products \
         (product_name, packing_type, capacity_ltr, category, standard_rate) \
         VALUES (?1, ?2, ?3, ?4, ?5)",
    )?;
    for (name, packing, capacity, category, rate) in DEFAULT_PRODUCTS {
        stmt.execute(rusqlite::params![name, packing, capacity, category, rate])?;
    }
    info!("product catalog seeded ({} products)", DEFAULT_PRODUCTS.len());
    Ok(())
}
