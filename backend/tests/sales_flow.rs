use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use sales_tracker::{Backend, BackendConfig, SaleChange, SaleServiceError, WeekBoundary};
use shared::{CreateSaleRequest, DeleteSaleRequest, SaleField};
use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Wednesday afternoon, UTC-4
fn now() -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339("2024-06-12T15:00:00-04:00").unwrap()
}

fn dec(value: &str) -> Decimal {
    Decimal::from_str(value).unwrap()
}

fn request(customer: &str, product: &str, amount: &str, date: Option<&str>) -> CreateSaleRequest {
    CreateSaleRequest {
        customer_name: customer.to_string(),
        product: product.to_string(),
        amount: amount.to_string(),
        date: date.map(str::to_string),
    }
}

fn open_backend(dir: &TempDir) -> Backend {
    sales_tracker::logging::init_test_logging();
    Backend::open(dir.path()).unwrap()
}

fn seed_scenario(backend: &Backend) {
    backend
        .create_sale_at(request("Bob", "Widget", "10.00", None), &now())
        .unwrap();
    backend
        .create_sale_at(request("Ann", "Gadget", "$5", None), &now())
        .unwrap();
    backend
        .create_sale_at(request("Sam", "Widget", "3.00", Some("2024-06-04")), &now())
        .unwrap();
}

#[test]
fn test_today_summary_scenario() {
    let dir = TempDir::new().unwrap();
    let backend = open_backend(&dir);
    seed_scenario(&backend);

    let today = backend.today_summary(&now()).unwrap();

    assert_eq!(today.total, dec("15.00"));
    assert_eq!(today.sale_count, 2);
    assert_eq!(
        today.by_product,
        BTreeMap::from([
            ("Gadget".to_string(), dec("5.00")),
            ("Widget".to_string(), dec("10.00")),
        ])
    );

    let week = backend.week_summary(&now()).unwrap();
    assert_eq!(week.total, dec("15.00"));
    assert_eq!(week.by_weekday, BTreeMap::from([(3, dec("15.00"))]));
}

#[test]
fn test_sales_survive_reopen() {
    let dir = TempDir::new().unwrap();
    {
        let backend = open_backend(&dir);
        seed_scenario(&backend);
    }

    let backend = open_backend(&dir);
    let sales = backend.list_sales().unwrap().sales;

    let customers: Vec<_> = sales.iter().map(|s| s.customer_name.as_str()).collect();
    assert_eq!(customers, vec!["Bob", "Ann", "Sam"]);
    assert_eq!(sales[1].amount.to_string(), "5.00");
    assert_eq!(sales[2].date, "2024-06-04T00:00:00-04:00");
}

#[test]
fn test_delete_and_key_reuse_across_reopen() {
    let dir = TempDir::new().unwrap();
    let backend = open_backend(&dir);
    seed_scenario(&backend);
    let last_key = backend.list_sales().unwrap().sales[2].key;

    let response = backend.delete_sale(DeleteSaleRequest { key: last_key }).unwrap();
    assert!(response.deleted);
    assert!(!backend.delete_sale(DeleteSaleRequest { key: last_key }).unwrap().deleted);
    drop(backend);

    let backend = open_backend(&dir);
    let created = backend
        .create_sale_at(request("Dee", "Bolt", "1", None), &now())
        .unwrap();

    assert!(created.sale.key > last_key);
    assert_eq!(backend.list_sales().unwrap().sales.len(), 3);
}

#[test]
fn test_invalid_request_reports_field_errors() {
    let dir = TempDir::new().unwrap();
    let backend = open_backend(&dir);

    let err = backend
        .create_sale_at(request(" ", "", "twelve", Some("2030-01-01")), &now())
        .unwrap_err();

    let SaleServiceError::Validation(validation) = err else {
        panic!("expected a validation error");
    };
    let form_errors = validation.to_form_errors();
    assert_eq!(form_errors.errors.len(), 4);
    assert!(form_errors.message_for(SaleField::Date).is_some());
    assert!(backend.list_sales().unwrap().sales.is_empty());
}

#[test]
fn test_change_notifications_reach_subscribers() {
    let dir = TempDir::new().unwrap();
    let backend = open_backend(&dir);
    let changes = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&changes);
    backend.on_change(move |change| {
        let label = match change {
            SaleChange::Added(stored) => format!("added {}", stored.sale.customer_name),
            SaleChange::Deleted(key) => format!("deleted {}", key),
        };
        sink.lock().unwrap().push(label);
    });

    let created = backend
        .create_sale_at(request("Bob", "Widget", "10", None), &now())
        .unwrap();
    backend
        .delete_sale(DeleteSaleRequest { key: created.sale.key })
        .unwrap();

    assert_eq!(
        *changes.lock().unwrap(),
        vec!["added Bob".to_string(), "deleted sale#0".to_string()]
    );
}

#[test]
fn test_chart_data_and_export() {
    let dir = TempDir::new().unwrap();
    let backend = open_backend(&dir);
    seed_scenario(&backend);

    let slices = backend.product_slices(&now()).unwrap();
    assert_eq!(slices.len(), 2);
    assert_eq!(slices[0].product, "Gadget");
    assert_eq!(slices[0].color_index, 0);
    assert_eq!(slices[1].color_index, 1);

    let bars = backend.weekday_bars(&now()).unwrap();
    assert_eq!(bars.len(), 7);
    assert_eq!(bars[2].amount, dec("15.00"));

    let export_dir = dir.path().join("exports");
    let path = backend.export_sales_to(Some(&export_dir), &now()).unwrap();
    let content = std::fs::read_to_string(path).unwrap();
    let lines: Vec<_> = content.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[1].contains("Sam"));
}

#[test]
fn test_config_file_changes_week_window() {
    let dir = TempDir::new().unwrap();
    let mut config = BackendConfig::load(dir.path()).unwrap();
    config.week_boundary = WeekBoundary::IncludePreviousDay;
    config.save().unwrap();

    let backend = open_backend(&dir);
    assert_eq!(backend.config().week_boundary, WeekBoundary::IncludePreviousDay);
    backend
        .create_sale_at(request("Sam", "Widget", "3", Some("2024-06-09")), &now())
        .unwrap();

    let week = backend.week_summary(&now()).unwrap();
    assert_eq!(week.total, dec("3"));
    assert_eq!(week.by_weekday.get(&7), Some(&dec("3")));
}

#[test]
fn test_dtos_serialize_for_the_presentation_layer() {
    let dir = TempDir::new().unwrap();
    let backend = open_backend(&dir);
    seed_scenario(&backend);

    let today = backend.today_summary(&now()).unwrap();
    let json = serde_json::to_value(&today).unwrap();

    assert_eq!(json["sale_count"], 2);
    assert_eq!(json["day"], "2024-06-12");
}
