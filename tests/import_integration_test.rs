// ==========================================
// Import pipeline integration tests
// ==========================================
// End-to-end: CSV file -> classified sheets -> resolved entities ->
// SQLite rows.
// ==========================================

mod test_helpers;

use salesbook::domain::import::{CellValue, RawSheet};
use salesbook::logging;
use salesbook::{SalesStore, SheetKind, SpreadsheetImporter};
use test_helpers::{create_test_importer, write_csv_fixture};

const SALES_CSV: &str = "\
Invoice,Customer Name,Product,Qty,Amount
INV001,Ram Patel,5 LTR STEEL BARNI,2,1360
INV002,Suresh Bhai,10 LTR PLASTIC JAR,1,880
";

#[tokio::test]
async fn test_import_sales_csv_basic() {
    logging::init_test();
    let (_dir, importer) = create_test_importer();
    let file = write_csv_fixture(SALES_CSV);

    let report = importer.import_file(file.path()).await.expect("import");
    assert!(report.succeeded());
    assert_eq!(report.total_sheets, 1);
    assert_eq!(report.sheets[0].kind, SheetKind::Sales);
    assert_eq!(report.total_processed(), 2);
    assert_eq!(report.total_rejected(), 0);

    let sale = importer
        .store()
        .find_sale_by_invoice("INV001")
        .await
        .unwrap()
        .expect("sale persisted");
    assert_eq!(sale.total_amount, 1360.0);
    // 2 x 5L barni
    assert_eq!(sale.total_liters, 10.0);
    assert_eq!(sale.notes, "BULK_SALE");

    // qty 1 is tagged as a demo sale
    let demo = importer
        .store()
        .find_sale_by_invoice("INV002")
        .await
        .unwrap()
        .expect("demo sale persisted");
    assert_eq!(demo.notes, "DEMO_SALE");
}

#[tokio::test]
async fn test_reimport_is_idempotent() {
    logging::init_test();
    let (_dir, importer) = create_test_importer();
    let file = write_csv_fixture(SALES_CSV);

    let first = importer.import_file(file.path()).await.unwrap();
    let second = importer.import_file(file.path()).await.unwrap();

    // Second run resolves to existing sales: counted processed, no
    // duplicates created.
    assert_eq!(first.total_processed(), 2);
    assert_eq!(second.total_processed(), 2);
    assert_eq!(second.total_rejected(), 0);

    let customer = importer
        .store()
        .find_customer("", "Ram Patel", "")
        .await
        .unwrap()
        .expect("customer exists");
    // Same identity key both runs; a duplicate would have a new id and
    // leave this lookup ambiguous.
    assert!(customer.customer_id > 0);
}

#[tokio::test]
async fn test_rejected_row_does_not_abort_sheet() {
    logging::init_test();
    let (_dir, importer) = create_test_importer();
    let csv = "\
Invoice,Customer Name,Product,Qty,Amount
INV010,Ram Patel,5 LTR STEEL BARNI,0,500
INV011,Ram Patel,Mystery Jar XL,2,500
INV012,Suresh Bhai,20 LTR CARBO,3,6300
";
    let file = write_csv_fixture(csv);

    let report = importer.import_file(file.path()).await.unwrap();
    let sheet = &report.sheets[0];
    assert_eq!(sheet.processed, 1);
    assert_eq!(sheet.rejected, 2);
    assert!(sheet
        .rejections
        .iter()
        .any(|(_, reason)| reason.contains("invalid quantity")));
    assert!(sheet
        .rejections
        .iter()
        .any(|(_, reason)| reason.contains("UNKNOWN_MYSTERY_JAR_XL")));

    // The valid row after the rejects still landed.
    assert!(importer
        .store()
        .find_sale_by_invoice("INV012")
        .await
        .unwrap()
        .is_some());
}

#[tokio::test]
async fn test_blank_invoice_gets_generated_number() {
    logging::init_test();
    let (_dir, importer) = create_test_importer();
    let csv = "\
Invoice,Customer Name,Product,Qty,Amount
,Ram Patel,5 LTR STEEL BARNI,2,1360
,Suresh Bhai,5 LTR STEEL BARNI,3,2040
";
    let file = write_csv_fixture(csv);

    let report = importer.import_file(file.path()).await.unwrap();
    assert_eq!(report.total_processed(), 2);

    let latest = importer
        .store()
        .last_invoice_like("INVCL%")
        .await
        .unwrap()
        .expect("generated invoice exists");
    assert!(latest.starts_with("INVCL"));
    // Second generated invoice in the month bucket carries serial 002.
    assert!(latest.ends_with("002"), "got {}", latest);
}

#[tokio::test]
async fn test_import_customer_csv_with_paren_village() {
    logging::init_test();
    let (_dir, importer) = create_test_importer();
    let csv = "\
Code,Name,Mobile,Village,Taluka,District
C001,Suresh Bhai (Rampura),9876543210,,,
C002,Kiran Patel,9876500000,Bhaniyara,Vaghodia,Vadodara
";
    let file = write_csv_fixture(csv);

    let report = importer.import_file(file.path()).await.unwrap();
    assert_eq!(report.sheets[0].kind, SheetKind::Customer);
    assert_eq!(report.total_processed(), 2);

    let customer = importer
        .store()
        .find_customer("9876543210", "", "")
        .await
        .unwrap()
        .expect("customer persisted");
    assert_eq!(customer.name, "Suresh Bhai");
    assert_eq!(customer.village, "RAMPURA");
}

#[tokio::test]
async fn test_duplicate_mobile_resolves_to_existing_customer() {
    logging::init_test();
    let (_dir, importer) = create_test_importer();
    let csv = "\
Code,Name,Mobile,Village,Taluka,District
C001,Ram Patel,9876543210,Rampura,Vaghodia,Vadodara
";
    let file = write_csv_fixture(csv);
    importer.import_file(file.path()).await.unwrap();

    // Same mobile, different spelling: must match, not duplicate.
    let csv2 = "\
Code,Name,Mobile,Village,Taluka,District
C009,RAM PATEL,9876543210,Rampura,Vaghodia,Vadodara
";
    let file2 = write_csv_fixture(csv2);
    let report = importer.import_file(file2.path()).await.unwrap();
    assert_eq!(report.total_processed(), 1);

    let found = importer
        .store()
        .find_customer("9876543210", "", "")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.name, "Ram Patel");
}

#[tokio::test]
async fn test_import_distributor_csv_derived_name() {
    logging::init_test();
    let (_dir, importer) = create_test_importer();
    let csv = "\
Village,Taluka,Mantri,Sabhasad,Contact In Group
Rampura,Vaghodia,Kiran Bhai,40,25
";
    let file = write_csv_fixture(csv);

    let report = importer.import_file(file.path()).await.unwrap();
    assert_eq!(report.sheets[0].kind, SheetKind::Distributor);
    assert_eq!(report.total_processed(), 1);

    let distributor = importer
        .store()
        .find_distributor("RAMPURA - VAGHODIA", "RAMPURA", "VAGHODIA")
        .await
        .unwrap()
        .expect("distributor persisted");
    assert_eq!(distributor.sabhasad_count, 40);
    assert_eq!(distributor.contact_in_group, 25);
}

#[tokio::test]
async fn test_import_payments_updates_status() {
    logging::init_test();
    let (_dir, importer) = create_test_importer();
    let sales = write_csv_fixture(SALES_CSV);
    importer.import_file(sales.path()).await.unwrap();

    let csv = "\
Invoice,Amount,Date,Method
INV001,500,2025-01-20,GPay
INV001,860,2025-01-25,
INV999,100,2025-01-20,Cash
";
    let file = write_csv_fixture(csv);
    let report = importer.import_file(file.path()).await.unwrap();
    assert_eq!(report.sheets[0].kind, SheetKind::Payment);
    assert_eq!(report.sheets[0].processed, 2);
    assert_eq!(report.sheets[0].rejected, 1);
    assert!(report.sheets[0]
        .rejections
        .iter()
        .any(|(_, reason)| reason.contains("INV999")));

    let sale = importer
        .store()
        .find_sale_by_invoice("INV001")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(sale.payment_status.to_string(), "Paid");
}

#[tokio::test]
async fn test_import_sheets_multi_sheet_batch() {
    logging::init_test();
    let (_dir, importer) = create_test_importer();

    let text = |s: &str| CellValue::Text(s.to_string());
    let sheets = vec![
        RawSheet::new(
            "Customers",
            vec![
                "CODE".into(),
                "NAME".into(),
                "MOBILE".into(),
                "VILLAGE".into(),
                "TALUKA".into(),
                "DISTRICT".into(),
            ],
            vec![vec![
                text("C001"),
                text("Ram Patel"),
                text("9876543210"),
                text("Rampura"),
                text("Vaghodia"),
                text("Vadodara"),
            ]],
        ),
        RawSheet::new(
            "Sales",
            vec![
                "INVOICE".into(),
                "CUSTOMER NAME".into(),
                "PRODUCT".into(),
                "QTY".into(),
                "AMOUNT".into(),
            ],
            vec![vec![
                text("INV100"),
                text("Ram Patel"),
                text("20 LTR STEEL BARNI"),
                CellValue::Number(2.0),
                CellValue::Number(5900.0),
            ]],
        ),
        RawSheet::new("Empty", vec![], vec![]),
    ];

    let report = importer
        .import_sheets("workbook.xlsx", sheets)
        .await
        .unwrap();
    assert_eq!(report.total_sheets, 3);
    assert_eq!(report.processed_sheets, 2);
    assert!(report.sheets[2].failure.is_some());

    let sale = importer
        .store()
        .find_sale_by_invoice("INV100")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(sale.total_liters, 40.0);
}

#[tokio::test]
async fn test_unknown_sheet_falls_back_to_customer_extraction() {
    logging::init_test();
    let (_dir, importer) = create_test_importer();
    let sheets = vec![RawSheet::new(
        "Weird",
        vec!["ALPHA".into(), "BETA".into()],
        vec![vec![
            CellValue::Text("Ram Patel".into()),
            CellValue::Text("x".into()),
        ]],
    )];

    let report = importer.import_sheets("weird.csv", sheets).await.unwrap();
    assert_eq!(report.sheets[0].kind, SheetKind::Unknown);
    // Permissive fallback still lands a customer row.
    assert_eq!(report.sheets[0].processed, 1);
}

#[tokio::test]
async fn test_import_directory_sequential() {
    logging::init_test();
    let (_dir, importer) = create_test_importer();

    let dir = tempfile::TempDir::new().unwrap();
    std::fs::write(dir.path().join("a_sales.csv"), SALES_CSV).unwrap();
    std::fs::write(
        dir.path().join("b_customers.csv"),
        "Code,Name,Mobile,Village,Taluka,District\nC001,Ram Patel,9876543210,Rampura,Vaghodia,Vadodara\n",
    )
    .unwrap();
    std::fs::write(dir.path().join("notes.txt"), "ignore me").unwrap();

    let reports = importer.import_directory(dir.path()).await.unwrap();
    assert_eq!(reports.len(), 2);
    assert!(reports.iter().all(|r| r.succeeded()));
}

#[tokio::test]
async fn test_corrupt_file_does_not_abort_directory_batch() {
    logging::init_test();
    let (_dir, importer) = create_test_importer();

    let dir = tempfile::TempDir::new().unwrap();
    // Not a zip archive: the workbook open itself fails.
    std::fs::write(dir.path().join("a_corrupt.xlsx"), b"this is not a workbook").unwrap();
    std::fs::write(dir.path().join("b_sales.csv"), SALES_CSV).unwrap();

    let reports = importer.import_directory(dir.path()).await.unwrap();
    assert_eq!(reports.len(), 2);

    let corrupt = &reports[0];
    assert!(corrupt.file.ends_with("a_corrupt.xlsx"));
    assert!(!corrupt.succeeded());
    assert!(corrupt.failure.is_some());

    // The valid file after the corrupt one still imported.
    let valid = &reports[1];
    assert!(valid.succeeded());
    assert!(importer
        .store()
        .find_sale_by_invoice("INV001")
        .await
        .unwrap()
        .is_some());
}

#[tokio::test]
async fn test_unreadable_sheet_does_not_abort_workbook() {
    logging::init_test();
    let (_dir, importer) = create_test_importer();

    let sheets = vec![
        RawSheet::failed("Broken", "sheet structure unreadable"),
        RawSheet::new(
            "Sales",
            vec![
                "INVOICE".into(),
                "CUSTOMER NAME".into(),
                "PRODUCT".into(),
                "QTY".into(),
                "AMOUNT".into(),
            ],
            vec![vec![
                CellValue::Text("INV200".into()),
                CellValue::Text("Ram Patel".into()),
                CellValue::Text("5 LTR STEEL BARNI".into()),
                CellValue::Number(2.0),
                CellValue::Number(1360.0),
            ]],
        ),
    ];

    let report = importer
        .import_sheets("workbook.xlsx", sheets)
        .await
        .unwrap();
    assert_eq!(report.total_sheets, 2);
    assert_eq!(
        report.sheets[0].failure.as_deref(),
        Some("sheet structure unreadable")
    );
    // The sheet after the failed one still landed its rows.
    assert_eq!(report.sheets[1].processed, 1);
    assert!(importer
        .store()
        .find_sale_by_invoice("INV200")
        .await
        .unwrap()
        .is_some());
}

#[tokio::test]
async fn test_configured_default_payment_method() {
    use salesbook::{ImportConfig, PaymentMethod, SqliteSalesStore, WorkbookImporter};

    logging::init_test();
    let dir = tempfile::TempDir::new().unwrap();
    let store = SqliteSalesStore::open(&dir.path().join("test.db")).unwrap();
    let config = ImportConfig {
        default_payment_method: PaymentMethod::Cheque,
        ..ImportConfig::default()
    };
    let importer = WorkbookImporter::new(store, config);

    let sales = write_csv_fixture(SALES_CSV);
    importer.import_file(sales.path()).await.unwrap();

    // No method column value: the configured default applies.
    let payments = write_csv_fixture("Invoice,Amount,Date,Method\nINV001,500,2025-01-20,\n");
    let report = importer.import_file(payments.path()).await.unwrap();
    assert_eq!(report.total_processed(), 1);

    let conn = rusqlite::Connection::open(dir.path().join("test.db")).unwrap();
    let method: String = conn
        .query_row("SELECT payment_method FROM payments", [], |r| r.get(0))
        .unwrap();
    assert_eq!(method, "Cheque");
}
