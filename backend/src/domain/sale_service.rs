//! Sale service domain logic for the sales tracker.
//!
//! Wires entry validation, the record store and change notification
//! together. Reads are answered straight from the store; the aggregation
//! functions build summaries from a fresh snapshot on every call.
use anyhow::Result;
use chrono::{DateTime, Local, TimeZone};
use log::{info, warn};
use shared::{TodaySummary, WeekSummary};
use std::sync::Arc;

use super::aggregation::{self, WeekBoundary};
use super::commands::{CreateSaleCommand, SaleListQuery};
use super::models::{SaleKey, StoredSale};
use super::notifier::{ChangeNotifier, SaleChange, SubscriptionId};
use super::validation::{SaleEntryConfig, SaleEntryValidator, SaleFormValidation};
use crate::storage::{Connection, SaleStorage};

#[derive(Debug, thiserror::Error)]
pub enum SaleServiceError {
    #[error("Sale was not recorded: {}", .0.summary())]
    Validation(SaleFormValidation),
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

pub struct SaleService<C: Connection> {
    sale_repository: C::SaleRepository,
    validator: SaleEntryValidator,
    notifier: ChangeNotifier,
    week_boundary: WeekBoundary,
}

impl<C: Connection> SaleService<C> {
    pub fn new(connection: Arc<C>) -> Self {
        Self::with_settings(connection, SaleEntryConfig::default(), WeekBoundary::default())
    }

    pub fn with_settings(
        connection: Arc<C>,
        entry_config: SaleEntryConfig,
        week_boundary: WeekBoundary,
    ) -> Self {
        Self {
            sale_repository: connection.create_sale_repository(),
            validator: SaleEntryValidator::with_config(entry_config),
            notifier: ChangeNotifier::new(),
            week_boundary,
        }
    }

    pub fn week_boundary(&self) -> WeekBoundary {
        self.week_boundary
    }

    pub fn entry_config(&self) -> &SaleEntryConfig {
        self.validator.config()
    }

    /// Every stored sale in insertion order
    pub fn list_all(&self) -> Result<Vec<StoredSale>> {
        self.sale_repository.list_sales()
    }

    pub fn get(&self, key: SaleKey) -> Result<Option<StoredSale>> {
        self.sale_repository.get_sale(key)
    }

    /// Sales newest first (by insertion), optionally paged by key cursor
    pub fn recent(&self, query: SaleListQuery) -> Result<Vec<StoredSale>> {
        let mut sales = self.sale_repository.list_sales()?;
        sales.reverse();

        let sales = sales
            .into_iter()
            .skip_while(|s| query.after.is_some_and(|after| s.key >= after))
            .take(query.limit.unwrap_or(usize::MAX));

        Ok(sales.collect())
    }

    /// Validate and record a sale, dating it against the local clock
    pub fn add(&self, command: CreateSaleCommand) -> Result<StoredSale, SaleServiceError> {
        self.add_at(command, &Local::now())
    }

    /// Validate and record a sale against the reference instant `now`
    pub fn add_at<Tz: TimeZone>(
        &self,
        command: CreateSaleCommand,
        now: &DateTime<Tz>,
    ) -> Result<StoredSale, SaleServiceError> {
        let validation = self.validator.validate(
            &command.customer_name,
            &command.product,
            &command.amount,
            command.date.as_deref(),
            now,
        );

        let sale = match validation.sale.clone() {
            Some(sale) if validation.is_valid() => sale,
            _ => {
                warn!("Rejected sale entry: {}", validation.summary());
                return Err(SaleServiceError::Validation(validation));
            }
        };

        let key = self.sale_repository.append_sale(&sale)?;
        let stored = StoredSale { key, sale };
        info!(
            "Recorded {}: {} bought {} for {}",
            key, stored.sale.customer_name, stored.sale.product, stored.sale.amount
        );

        self.notifier.notify(&SaleChange::Added(stored.clone()));
        Ok(stored)
    }

    /// Delete a sale. Returns false (and notifies nobody) for unknown keys.
    pub fn delete(&self, key: SaleKey) -> Result<bool> {
        let deleted = self.sale_repository.delete_sale(key)?;
        if deleted {
            info!("Deleted {}", key);
            self.notifier.notify(&SaleChange::Deleted(key));
        } else {
            warn!("Delete requested for unknown {}", key);
        }
        Ok(deleted)
    }

    pub fn today_summary<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Result<TodaySummary> {
        let sales = self.sale_repository.list_sales()?;
        Ok(aggregation::today_summary(&sales, now))
    }

    pub fn week_summary<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Result<WeekSummary> {
        let sales = self.sale_repository.list_sales()?;
        Ok(aggregation::week_summary(&sales, now, self.week_boundary))
    }

    /// Register a callback run after every successful add or delete
    pub fn on_change<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&SaleChange) + Send + Sync + 'static,
    {
        self.notifier.subscribe(listener)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.notifier.unsubscribe(id)
    }
}
