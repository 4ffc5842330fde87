// ==========================================
// Salesbook - CLI entry point
// ==========================================
// Imports one spreadsheet file or every supported file in a directory
// into the sales database, then prints a per-sheet summary.
// ==========================================

use anyhow::{bail, Context, Result};
use salesbook::db::default_db_path;
use salesbook::{
    FileReport, ImportConfig, SpreadsheetImporter, SqliteSalesStore, WorkbookImporter,
};
use std::path::PathBuf;

#[tokio::main]
async fn main() -> Result<()> {
    salesbook::logging::init();

    tracing::info!("==================================================");
    tracing::info!("{} v{}", salesbook::APP_NAME, salesbook::VERSION);
    tracing::info!("==================================================");

    let mut json_output = false;
    let mut positional = Vec::new();
    for arg in std::env::args().skip(1) {
        if arg == "--json" {
            json_output = true;
        } else {
            positional.push(arg);
        }
    }
    let mut positional = positional.into_iter();
    let input = match positional.next() {
        Some(path) => PathBuf::from(path),
        None => {
            eprintln!("usage: salesbook [--json] <file-or-directory> [database]");
            eprintln!("  file: .xlsx / .xls / .xlsm / .xlsb / .csv");
            std::process::exit(2);
        }
    };
    let db_path = positional
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(default_db_path);

    tracing::info!("using database: {}", db_path.display());
    let store = SqliteSalesStore::open(&db_path)
        .with_context(|| format!("open store at {}", db_path.display()))?;
    let importer = WorkbookImporter::new(store, ImportConfig::default());

    let reports = if input.is_dir() {
        importer.import_directory(&input).await?
    } else if input.is_file() {
        vec![importer.import_file(&input).await?]
    } else {
        bail!("no such file or directory: {}", input.display());
    };

    if json_output {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for report in &reports {
            print_report(report);
        }
    }
    let failed = reports.iter().filter(|r| !r.succeeded()).count();
    if failed > 0 {
        bail!("{} file(s) imported no rows", failed);
    }
    Ok(())
}

fn print_report(report: &FileReport) {
    println!(
        "{} (batch {}): {}/{} sheets, {} rows processed, {} rejected",
        report.file,
        report.batch_id,
        report.processed_sheets,
        report.total_sheets,
        report.total_processed(),
        report.total_rejected()
    );
    for sheet in &report.sheets {
        println!(
            "  [{}] {}: {} processed, {} skipped, {} rejected",
            sheet.kind, sheet.sheet, sheet.processed, sheet.skipped, sheet.rejected
        );
        for (row, reason) in &sheet.rejections {
            println!("    row {}: {}", row, reason);
        }
        if let Some(failure) = &sheet.failure {
            println!("    sheet failed: {}", failure);
        }
    }
    if let Some(failure) = &report.failure {
        println!("  file failed: {}", failure);
    }
}
