use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A recorded sale as handed to the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sale {
    /// Storage-assigned handle, never reused within a box
    pub key: u64,
    pub customer_name: String,
    pub product: String,
    /// Exact decimal amount (negative values are refunds)
    pub amount: Decimal,
    /// Human-readable timestamp with timezone (RFC 3339)
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateSaleRequest {
    pub customer_name: String,
    pub product: String,
    /// Raw amount as typed by the user, e.g. "$1,250.50"
    pub amount: String,
    /// Optional date override (RFC 3339) - uses current time if not provided
    pub date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateSaleResponse {
    pub sale: Sale,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteSaleRequest {
    pub key: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteSaleResponse {
    pub deleted: bool,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleListResponse {
    pub sales: Vec<Sale>,
}

/// Form fields of the add-sale form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SaleField {
    CustomerName,
    Product,
    Amount,
    Date,
}

impl fmt::Display for SaleField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SaleField::CustomerName => "customer name",
            SaleField::Product => "product",
            SaleField::Amount => "amount",
            SaleField::Date => "date",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: SaleField,
    pub message: String,
}

/// Validation outcome for the add-sale form, one message per failing field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleFormErrors {
    pub errors: Vec<FieldError>,
}

impl SaleFormErrors {
    pub fn message_for(&self, field: SaleField) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }
}

/// Totals for a single calendar day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TodaySummary {
    pub day: NaiveDate,
    pub total: Decimal,
    pub sale_count: usize,
    pub by_product: BTreeMap<String, Decimal>,
}

/// Totals for the current week, keyed by weekday (1 = Monday .. 7 = Sunday)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekSummary {
    pub week_start: NaiveDate,
    pub total: Decimal,
    pub sale_count: usize,
    pub by_weekday: BTreeMap<u32, Decimal>,
}

/// One slice of the per-product pie chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSlice {
    pub product: String,
    pub amount: Decimal,
    /// Share of the total in percent (0.0 when the total is zero)
    pub share_percent: f64,
    /// Index into the presentation layer's color palette
    pub color_index: usize,
}

/// One bar of the weekday distribution chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekdayBar {
    pub weekday: u32,
    pub label: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportSalesResponse {
    pub csv_content: String,
    pub filename: String,
    pub sale_count: usize,
}
