// ==========================================
// Salesbook - entity resolver
// ==========================================
// Find-or-create for customers and distributors, plus invoice number
// generation. Resolution never duplicates: identity keys are checked
// against the store before any insert.
// ==========================================

use crate::config::ImportConfig;
use crate::domain::entities::NewDistributor;
use crate::domain::import::{CustomerRow, DistributorRow};
use crate::repository::error::{RepoResult, RepositoryError};
use crate::repository::sales_store::SalesStore;
use chrono::{Datelike, Local};
use rand::Rng;
use tracing::{debug, warn};

/// Returned when customer code generation exhausts its retries. The
/// caller rejects the row; it is never a real row id.
pub const SENTINEL_ID: i64 = -1;

pub struct EntityResolver<'a, S: SalesStore> {
    store: &'a S,
    config: &'a ImportConfig,
}

impl<'a, S: SalesStore> EntityResolver<'a, S> {
    pub fn new(store: &'a S, config: &'a ImportConfig) -> Self {
        Self { store, config }
    }

    // ------------------------------------------
    // Customers
    // ------------------------------------------

    /// Resolve a customer to a row id, creating one if no match exists.
    /// Identity: mobile when present, otherwise (name, village).
    /// Returns SENTINEL_ID when code generation keeps colliding.
    pub async fn resolve_customer(&self, row: &CustomerRow) -> RepoResult<i64> {
        if let Some(existing) = self
            .store
            .find_customer(&row.mobile, &row.name, &row.village)
            .await?
        {
            debug!("customer matched: {} -> {}", row.name, existing.customer_id);
            return Ok(existing.customer_id);
        }

        let mut wide = false;
        for attempt in 0..self.config.customer_code_attempts {
            let code = row
                .code
                .clone()
                .filter(|_| attempt == 0)
                .unwrap_or_else(|| generate_customer_code(wide));
            match self
                .store
                .insert_customer(
                    &code,
                    &row.name,
                    &row.mobile,
                    &row.village,
                    &row.taluka,
                    &row.district,
                )
                .await
            {
                Ok(id) => {
                    debug!("customer created: {} ({})", row.name, code);
                    return Ok(id);
                }
                Err(RepositoryError::UniqueViolation(_)) => {
                    // Widen the random suffix after the first collision.
                    wide = true;
                    continue;
                }
                Err(err) => return Err(err),
            }
        }

        warn!(
            "customer code generation exhausted for '{}', row skipped",
            row.name
        );
        Ok(SENTINEL_ID)
    }

    // ------------------------------------------
    // Distributors
    // ------------------------------------------

    /// Find-or-create on (name, village, taluka).
    pub async fn resolve_distributor(&self, row: &DistributorRow) -> RepoResult<i64> {
        if let Some(existing) = self
            .store
            .find_distributor(&row.name, &row.village, &row.taluka)
            .await?
        {
            return Ok(existing.distributor_id);
        }

        let new = NewDistributor {
            name: row.name.clone(),
            village: row.village.clone(),
            taluka: row.taluka.clone(),
            district: row.district.clone(),
            mantri_name: row.mantri_name.clone(),
            mantri_mobile: row.mantri_mobile.clone(),
            sabhasad_count: row.sabhasad_count,
            contact_in_group: row.contact_in_group,
        };
        let id = self.store.insert_distributor(&new).await?;
        debug!("distributor created: {} -> {}", row.name, id);
        Ok(id)
    }

    // ------------------------------------------
    // Invoice numbers
    // ------------------------------------------

    /// Next invoice number in the current month bucket:
    /// `<prefix><MM><YY><serial:03>`. An unparseable latest invoice
    /// falls back to a timestamp suffix, which still sorts after every
    /// serial number in the bucket.
    pub async fn generate_invoice_number(&self) -> RepoResult<String> {
        let now = Local::now();
        let bucket = format!(
            "{}{:02}{:02}",
            self.config.invoice_prefix,
            now.month(),
            now.year() % 100
        );
        let latest = self.store.last_invoice_like(&format!("{}%", bucket)).await?;

        let serial = match latest {
            None => 1,
            Some(inv) => match inv.get(bucket.len()..).unwrap_or("").parse::<u32>() {
                Ok(n) => n + 1,
                Err(_) => {
                    warn!("unparseable invoice '{}', using timestamp suffix", inv);
                    return Ok(format!("{}{}", bucket, now.format("%H%M%S")));
                }
            },
        };
        Ok(format!("{}{:03}", bucket, serial))
    }
}

/// CUST + timestamp + random suffix. The suffix widens from 3 to 4
/// digits after a collision.
fn generate_customer_code(wide: bool) -> String {
    let mut rng = rand::rng();
    let suffix: u32 = if wide {
        rng.random_range(1000..10000)
    } else {
        rng.random_range(100..1000)
    };
    format!("CUST{}{}", Local::now().format("%Y%m%d%H%M%S"), suffix)
}
