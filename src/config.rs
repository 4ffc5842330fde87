// ==========================================
// Salesbook - import configuration
// ==========================================

use crate::domain::types::PaymentMethod;
use serde::{Deserialize, Serialize};

/// Tunables for the import pipeline. Defaults match the production
/// ledgers this tool was built around.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportConfig {
    /// Prefix for generated invoice numbers, e.g. "INVCL" ->
    /// INVCL0125042.
    pub invoice_prefix: String,
    /// Method recorded for payment rows that name none.
    pub default_payment_method: PaymentMethod,
    /// Customer code generation attempts before giving up on a row.
    pub customer_code_attempts: u32,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            invoice_prefix: "INVCL".to_string(),
            default_payment_method: PaymentMethod::Cash,
            customer_code_attempts: 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ImportConfig::default();
        assert_eq!(config.invoice_prefix, "INVCL");
        assert_eq!(config.customer_code_attempts, 5);
    }
}
