// ==========================================
// Salesbook - import orchestrator
// ==========================================
// Drives one file import end to end: parse, classify each sheet,
// extract rows, resolve entities, persist. A bad row rejects and the
// sheet continues; a bad sheet records its failure and the file
// continues.
// ==========================================

use crate::config::ImportConfig;
use crate::domain::entities::NewSaleItem;
use crate::domain::import::{CellValue, CustomerRow, FileReport, RawSheet, RowOutcome, SheetReport};
use crate::domain::types::{PaymentMethod, SaleType, SheetKind};
use crate::importer::classifier::SheetClassifier;
use crate::importer::entity_resolver::{EntityResolver, SENTINEL_ID};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::extractor::{Row, RowExtractor};
use crate::importer::file_parser::{FileParser, UniversalFileParser};
use crate::importer::importer_trait::SpreadsheetImporter;
use crate::importer::normalizer::{safe_div, standardize_product};
use crate::repository::error::RepositoryError;
use crate::repository::sales_store::SalesStore;
use async_trait::async_trait;
use chrono::Local;
use std::path::Path;
use tracing::{info, warn};
use uuid::Uuid;

const SUPPORTED_EXTENSIONS: [&str; 5] = ["xlsx", "xls", "xlsm", "xlsb", "csv"];

pub struct WorkbookImporter<S: SalesStore> {
    store: S,
    config: ImportConfig,
}

impl<S: SalesStore> WorkbookImporter<S> {
    pub fn new(store: S, config: ImportConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // ------------------------------------------
    // Per-kind sheet processing
    // ------------------------------------------

    async fn process_sheet(&self, sheet: &RawSheet, kind: SheetKind) -> SheetReport {
        let mut report = SheetReport::new(&sheet.name, kind);
        if let Some(reason) = &sheet.failure {
            report.failure = Some(reason.clone());
            return report;
        }
        if sheet.headers.is_empty() {
            report.failure = Some("empty sheet".to_string());
            return report;
        }

        for (offset, cells) in sheet.rows.iter().enumerate() {
            // Row 1 is the header; data starts at 2.
            let row_index = offset + 2;
            let row = Row::new(&sheet.headers, cells);
            let result = match kind {
                SheetKind::Sales => self.process_sales_row(&row, row_index, &mut report).await,
                SheetKind::Payment => self.process_payment_row(&row, row_index, &mut report).await,
                SheetKind::Distributor => {
                    self.process_distributor_row(&row, row_index, &mut report).await
                }
                // Unknown sheets get the permissive customer treatment.
                SheetKind::Customer | SheetKind::Unknown => {
                    self.process_customer_row(&row, row_index, &mut report).await
                }
            };
            if let Err(err) = result {
                warn!("sheet '{}' row {}: {}", sheet.name, row_index, err);
                report.reject(row_index, err.to_string());
            }
        }

        info!(
            "sheet '{}' [{}]: {} processed, {} skipped, {} rejected",
            sheet.name, kind, report.processed, report.skipped, report.rejected
        );
        report
    }

    async fn process_sales_row(
        &self,
        row: &Row<'_>,
        row_index: usize,
        report: &mut SheetReport,
    ) -> Result<(), RepositoryError> {
        let record = match RowExtractor::extract_sales(row, row_index) {
            RowOutcome::Record(r) => r,
            RowOutcome::Skip => {
                report.skipped += 1;
                return Ok(());
            }
            RowOutcome::Reject { reason } => {
                report.reject(row_index, reason);
                return Ok(());
            }
        };

        let resolver = EntityResolver::new(&self.store, &self.config);

        let canonical = standardize_product(&CellValue::Text(record.product_raw.clone()));
        let product_id = match self.store.find_product_id_by_name(&canonical).await? {
            Some(id) => id,
            None => {
                report.reject(row_index, format!("product not found: {}", canonical));
                return Ok(());
            }
        };

        let customer_row = CustomerRow {
            code: None,
            name: record.customer_name.clone(),
            mobile: String::new(),
            village: String::new(),
            taluka: String::new(),
            district: String::new(),
        };
        let customer_id = resolver.resolve_customer(&customer_row).await?;
        if customer_id == SENTINEL_ID {
            report.reject(row_index, "customer code allocation failed".to_string());
            return Ok(());
        }

        let invoice_no = match &record.invoice_no {
            Some(inv) => inv.clone(),
            None => resolver.generate_invoice_number().await?,
        };

        // Re-importing a known invoice resolves to the existing sale.
        if self.store.find_sale_by_invoice(&invoice_no).await?.is_some() {
            report.processed += 1;
            return Ok(());
        }

        let product = self
            .store
            .get_product(product_id)
            .await?
            .ok_or_else(|| RepositoryError::Data(format!("product {} vanished", product_id)))?;
        let rate = safe_div(record.amount, record.quantity as f64);
        let liters = record.quantity as f64 * product.capacity_ltr;

        let is_demo = record.quantity == 1
            || record
                .reference
                .as_deref()
                .map(|r| r.eq_ignore_ascii_case("DEMO"))
                .unwrap_or(false);
        let sale_type = if is_demo { SaleType::Demo } else { SaleType::Bulk };

        let sale_date = record
            .sale_date
            .unwrap_or_else(|| Local::now().date_naive());
        let items = [NewSaleItem {
            product_id,
            quantity: record.quantity,
            rate,
            liters,
        }];
        self.store
            .insert_sale(
                &invoice_no,
                customer_id,
                sale_date,
                &items,
                &sale_type.to_string(),
            )
            .await?;
        report.processed += 1;
        Ok(())
    }

    async fn process_customer_row(
        &self,
        row: &Row<'_>,
        row_index: usize,
        report: &mut SheetReport,
    ) -> Result<(), RepositoryError> {
        let record = match RowExtractor::extract_customer(row, row_index) {
            RowOutcome::Record(r) => r,
            RowOutcome::Skip => {
                report.skipped += 1;
                return Ok(());
            }
            RowOutcome::Reject { reason } => {
                report.reject(row_index, reason);
                return Ok(());
            }
        };

        let resolver = EntityResolver::new(&self.store, &self.config);
        let customer_id = resolver.resolve_customer(&record).await?;
        if customer_id == SENTINEL_ID {
            report.reject(row_index, "customer code allocation failed".to_string());
        } else {
            report.processed += 1;
        }
        Ok(())
    }

    async fn process_distributor_row(
        &self,
        row: &Row<'_>,
        row_index: usize,
        report: &mut SheetReport,
    ) -> Result<(), RepositoryError> {
        let record = match RowExtractor::extract_distributor(row, row_index) {
            RowOutcome::Record(r) => r,
            RowOutcome::Skip => {
                report.skipped += 1;
                return Ok(());
            }
            RowOutcome::Reject { reason } => {
                report.reject(row_index, reason);
                return Ok(());
            }
        };

        let resolver = EntityResolver::new(&self.store, &self.config);
        resolver.resolve_distributor(&record).await?;
        report.processed += 1;
        Ok(())
    }

    async fn process_payment_row(
        &self,
        row: &Row<'_>,
        row_index: usize,
        report: &mut SheetReport,
    ) -> Result<(), RepositoryError> {
        let record = match RowExtractor::extract_payment(row, row_index) {
            RowOutcome::Record(r) => r,
            RowOutcome::Skip => {
                report.skipped += 1;
                return Ok(());
            }
            RowOutcome::Reject { reason } => {
                report.reject(row_index, reason);
                return Ok(());
            }
        };

        let sale = match self.store.find_sale_by_invoice(&record.invoice_no).await? {
            Some(sale) => sale,
            None => {
                report.reject(
                    row_index,
                    format!("unknown invoice: {}", record.invoice_no),
                );
                return Ok(());
            }
        };

        let method = record
            .payment_method
            .as_deref()
            .map(PaymentMethod::parse_or_cash)
            .unwrap_or(self.config.default_payment_method);
        let payment_date = record
            .payment_date
            .unwrap_or_else(|| Local::now().date_naive());
        self.store
            .insert_payment(
                sale.sale_id,
                payment_date,
                &method.to_string(),
                record.amount,
                record.rrn.as_deref().unwrap_or(""),
                &record.invoice_no,
            )
            .await?;
        report.processed += 1;
        Ok(())
    }
}

#[async_trait]
impl<S: SalesStore> SpreadsheetImporter for WorkbookImporter<S> {
    async fn import_file(&self, path: &Path) -> ImportResult<FileReport> {
        info!("importing file: {}", path.display());
        let sheets = UniversalFileParser.parse(path)?;
        let source = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        self.import_sheets(&source, sheets).await
    }

    async fn import_sheets(&self, source: &str, sheets: Vec<RawSheet>) -> ImportResult<FileReport> {
        let batch_id = Uuid::new_v4().to_string();
        let total_sheets = sheets.len();
        info!("batch {} started: {} ({} sheets)", batch_id, source, total_sheets);

        let mut reports = Vec::with_capacity(total_sheets);
        for sheet in &sheets {
            let (kind, score) = SheetClassifier::classify(&sheet.headers);
            info!("sheet '{}' classified as {} (score {})", sheet.name, kind, score);
            reports.push(self.process_sheet(sheet, kind).await);
        }

        let processed_sheets = reports.iter().filter(|r| r.processed > 0).count();
        let report = FileReport {
            batch_id,
            file: source.to_string(),
            sheets: reports,
            processed_sheets,
            total_sheets,
            failure: None,
        };
        info!(
            "batch {} finished: {} rows processed, {} rejected",
            report.batch_id,
            report.total_processed(),
            report.total_rejected()
        );
        Ok(report)
    }

    async fn import_directory(&self, dir: &Path) -> ImportResult<Vec<FileReport>> {
        if !dir.is_dir() {
            return Err(ImportError::FileNotFound(dir.to_path_buf()));
        }
        let mut paths: Vec<_> = std::fs::read_dir(dir)?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| {
                p.extension()
                    .map(|ext| {
                        let ext = ext.to_string_lossy().to_lowercase();
                        SUPPORTED_EXTENSIONS.contains(&ext.as_str())
                    })
                    .unwrap_or(false)
            })
            .collect();
        paths.sort();

        // One file at a time: the store serializes writers anyway and
        // order keeps generated invoice serials stable. A file that
        // fails to open is recorded and the batch moves on.
        let mut reports = Vec::with_capacity(paths.len());
        for path in paths {
            match self.import_file(&path).await {
                Ok(report) => reports.push(report),
                Err(err) => {
                    warn!("file {} failed: {}", path.display(), err);
                    reports.push(FileReport::failed(
                        Uuid::new_v4().to_string(),
                        path.display().to_string(),
                        err.to_string(),
                    ));
                }
            }
        }
        Ok(reports)
    }
}
