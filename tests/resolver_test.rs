// ==========================================
// Entity resolver integration tests
// ==========================================

mod test_helpers;

use chrono::{Datelike, Local};
use salesbook::domain::import::{CustomerRow, DistributorRow};
use salesbook::importer::EntityResolver;
use salesbook::{ImportConfig, SalesStore};
use test_helpers::create_test_store;

fn customer_row(name: &str, mobile: &str, village: &str) -> CustomerRow {
    CustomerRow {
        code: None,
        name: name.to_string(),
        mobile: mobile.to_string(),
        village: village.to_string(),
        taluka: String::new(),
        district: String::new(),
    }
}

#[tokio::test]
async fn test_resolve_customer_find_or_create() {
    let (_dir, store) = create_test_store();
    let config = ImportConfig::default();
    let resolver = EntityResolver::new(&store, &config);

    let row = customer_row("Ram Patel", "9876543210", "RAMPURA");
    let first = resolver.resolve_customer(&row).await.unwrap();
    let second = resolver.resolve_customer(&row).await.unwrap();
    assert_eq!(first, second);

    // Mobile matches even when name spelling drifts.
    let drifted = customer_row("RAM  PATEL", "9876543210", "");
    let third = resolver.resolve_customer(&drifted).await.unwrap();
    assert_eq!(first, third);
}

#[tokio::test]
async fn test_resolve_customer_generates_code() {
    let (_dir, store) = create_test_store();
    let config = ImportConfig::default();
    let resolver = EntityResolver::new(&store, &config);

    let id = resolver
        .resolve_customer(&customer_row("Suresh Bhai", "", "RAMPURA"))
        .await
        .unwrap();
    let found = store
        .find_customer("", "Suresh Bhai", "RAMPURA")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.customer_id, id);
    assert!(found.customer_code.unwrap().starts_with("CUST"));
}

#[tokio::test]
async fn test_resolve_distributor_find_or_create() {
    let (_dir, store) = create_test_store();
    let config = ImportConfig::default();
    let resolver = EntityResolver::new(&store, &config);

    let row = DistributorRow {
        name: "RAMPURA - VAGHODIA".to_string(),
        village: "RAMPURA".to_string(),
        taluka: "VAGHODIA".to_string(),
        district: "VADODARA".to_string(),
        mantri_name: "Kiran Bhai".to_string(),
        mantri_mobile: String::new(),
        sabhasad_count: 40,
        contact_in_group: 25,
    };
    let first = resolver.resolve_distributor(&row).await.unwrap();
    let second = resolver.resolve_distributor(&row).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_invoice_serials_are_monotonic() {
    let (_dir, store) = create_test_store();
    let config = ImportConfig::default();
    let resolver = EntityResolver::new(&store, &config);

    let customer_id = store
        .insert_customer("CUST1", "Ram", "", "", "", "")
        .await
        .unwrap();
    let today = Local::now().date_naive();

    let first = resolver.generate_invoice_number().await.unwrap();
    assert!(first.ends_with("001"), "got {}", first);
    store
        .insert_sale(&first, customer_id, today, &[], "")
        .await
        .unwrap();

    let second = resolver.generate_invoice_number().await.unwrap();
    assert!(second.ends_with("002"), "got {}", second);

    // A manually inserted higher serial moves the sequence forward.
    let now = Local::now();
    let bucket = format!("INVCL{:02}{:02}", now.month(), now.year() % 100);
    store
        .insert_sale(&format!("{}017", bucket), customer_id, today, &[], "")
        .await
        .unwrap();
    let third = resolver.generate_invoice_number().await.unwrap();
    assert_eq!(third, format!("{}018", bucket));
}
