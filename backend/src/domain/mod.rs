//! # Domain Layer
//!
//! Business logic of the sales tracker, independent of how sales are stored
//! or shown:
//!
//! - `models`: the `Sale` entity, its store handle and entry errors
//! - `validation`: raw add-sale form input to a `Sale` or per-field errors
//! - `aggregation`: pure today/week filters, sums and groupings
//! - `sale_service`: the record/list/delete/summary interface with change
//!   notification
//! - `chart_data`: palette assignment and weekday bars for charts
//! - `export_service`: CSV export of all sales

pub mod aggregation;
pub mod chart_data;
pub mod commands;
pub mod export_service;
pub mod models;
pub mod notifier;
pub mod sale_service;
pub mod validation;

pub use aggregation::WeekBoundary;
pub use chart_data::ChartDataService;
pub use commands::{CreateSaleCommand, SaleListQuery};
pub use export_service::ExportService;
pub use notifier::{ChangeNotifier, SaleChange, SubscriptionId};
pub use sale_service::{SaleService, SaleServiceError};
pub use validation::{SaleEntryConfig, SaleEntryValidator, SaleFormValidation};
