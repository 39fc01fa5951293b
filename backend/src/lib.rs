//! # Sales Tracker Backend
//!
//! Synchronous core of a single-screen sales recording app. The presentation
//! layer talks to [`Backend`], which owns the configuration, the CSV sale box
//! and the domain services, and answers with DTOs from the `shared` crate.
//!
//! - `domain`: validation, aggregation, sale service, chart data, export
//! - `storage`: the record store traits with CSV and in-memory boxes
//! - `config`: `config.yaml` in the data directory
//! - `logging`: `env_logger` setup for embedding binaries

use anyhow::Result;
use chrono::{DateTime, TimeZone};
use log::info;
use shared::{
    CreateSaleRequest, CreateSaleResponse, DeleteSaleRequest, DeleteSaleResponse,
    ExportSalesResponse, ProductSlice, SaleListResponse, TodaySummary, WeekSummary, WeekdayBar,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub mod config;
pub mod domain;
pub mod logging;
pub mod mappers;
pub mod storage;

pub use config::BackendConfig;
pub use domain::{SaleChange, SaleServiceError, SubscriptionId, WeekBoundary};
pub use storage::csv::CsvConnection;

use domain::models::SaleKey;
use domain::{ChartDataService, ExportService, SaleListQuery, SaleService};
use mappers::SaleMapper;

/// Main backend struct that orchestrates all services
pub struct Backend {
    config: BackendConfig,
    pub sale_service: SaleService<CsvConnection>,
    pub chart_data_service: ChartDataService,
    pub export_service: ExportService,
}

impl Backend {
    /// Open the backend on the default data directory
    pub fn new() -> Result<Self> {
        Self::with_config(BackendConfig::load_default()?)
    }

    /// Open the backend on `data_directory`, reading its `config.yaml`
    pub fn open<P: AsRef<Path>>(data_directory: P) -> Result<Self> {
        Self::with_config(BackendConfig::load(data_directory)?)
    }

    pub fn with_config(config: BackendConfig) -> Result<Self> {
        let csv_conn = Arc::new(CsvConnection::new(&config.data_directory)?);
        csv_conn.ensure_box_file_exists()?;

        let sale_service =
            SaleService::with_settings(csv_conn, config.entry_config(), config.week_boundary);
        let chart_data_service = ChartDataService::with_palette_size(config.chart_palette_size);
        let export_service = ExportService::new();

        info!(
            "Sales backend ready in {} (week boundary {:?})",
            config.data_directory.display(),
            config.week_boundary
        );

        Ok(Backend {
            config,
            sale_service,
            chart_data_service,
            export_service,
        })
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    /// Every sale in insertion order
    pub fn list_sales(&self) -> Result<SaleListResponse> {
        Ok(SaleMapper::to_list_dto(self.sale_service.list_all()?))
    }

    /// Most recent sales first
    pub fn recent_sales(&self, limit: usize) -> Result<SaleListResponse> {
        let query = SaleListQuery {
            after: None,
            limit: Some(limit),
        };
        Ok(SaleMapper::to_list_dto(self.sale_service.recent(query)?))
    }

    /// Record a sale dated now unless the request carries a date
    pub fn create_sale(
        &self,
        request: CreateSaleRequest,
    ) -> Result<CreateSaleResponse, SaleServiceError> {
        let stored = self
            .sale_service
            .add(SaleMapper::to_create_command(request))?;
        Ok(self.create_response(stored))
    }

    /// Record a sale validated against the reference instant `now`
    pub fn create_sale_at<Tz: TimeZone>(
        &self,
        request: CreateSaleRequest,
        now: &DateTime<Tz>,
    ) -> Result<CreateSaleResponse, SaleServiceError> {
        let stored = self
            .sale_service
            .add_at(SaleMapper::to_create_command(request), now)?;
        Ok(self.create_response(stored))
    }

    fn create_response(&self, stored: domain::models::StoredSale) -> CreateSaleResponse {
        let success_message = format!(
            "Recorded {} for {} ({}{})",
            stored.sale.product, stored.sale.customer_name, self.config.currency_symbol, stored.sale.amount
        );
        CreateSaleResponse {
            sale: SaleMapper::to_dto(stored),
            success_message,
        }
    }

    pub fn delete_sale(&self, request: DeleteSaleRequest) -> Result<DeleteSaleResponse> {
        let deleted = self.sale_service.delete(SaleKey(request.key))?;
        let success_message = if deleted {
            "Sale deleted".to_string()
        } else {
            "Sale was already gone".to_string()
        };
        Ok(DeleteSaleResponse {
            deleted,
            success_message,
        })
    }

    pub fn today_summary<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Result<TodaySummary> {
        self.sale_service.today_summary(now)
    }

    pub fn week_summary<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Result<WeekSummary> {
        self.sale_service.week_summary(now)
    }

    /// Pie slices of today's sales by product
    pub fn product_slices<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Result<Vec<ProductSlice>> {
        let today = self.sale_service.today_summary(now)?;
        Ok(self.chart_data_service.product_slices(&today.by_product))
    }

    /// Monday..Sunday bars of this week's sales
    pub fn weekday_bars<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Result<Vec<WeekdayBar>> {
        let week = self.sale_service.week_summary(now)?;
        Ok(self.chart_data_service.weekday_bars(&week.by_weekday))
    }

    pub fn export_sales<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Result<ExportSalesResponse> {
        let sales = self.sale_service.list_all()?;
        self.export_service.export_sales_csv(&sales, now)
    }

    /// Export into `directory`, or the Documents folder when `None`
    pub fn export_sales_to<Tz: TimeZone>(
        &self,
        directory: Option<&Path>,
        now: &DateTime<Tz>,
    ) -> Result<PathBuf> {
        let export = self.export_sales(now)?;
        self.export_service.export_to_directory(&export, directory)
    }

    pub fn on_change<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&SaleChange) + Send + Sync + 'static,
    {
        self.sale_service.on_change(listener)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.sale_service.unsubscribe(id)
    }
}
