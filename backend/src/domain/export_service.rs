//! Export service domain logic for the sales tracker.
//!
//! Builds a CSV document of every stored sale, oldest first, and optionally
//! writes it into a directory (the user's Documents folder by default).

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, TimeZone};
use csv::Writer;
use log::{error, info};
use shared::ExportSalesResponse;
use std::fs;
use std::path::{Path, PathBuf};

use super::models::StoredSale;

const EXPORT_HEADER: [&str; 5] = ["sale_number", "date", "customer_name", "product", "amount"];

#[derive(Clone, Default)]
pub struct ExportService {}

impl ExportService {
    pub fn new() -> Self {
        Self {}
    }

    /// Render `sales` as CSV. Rows are sorted chronologically and numbered
    /// from 1; the file name carries the date of `now`.
    pub fn export_sales_csv<Tz: TimeZone>(
        &self,
        sales: &[StoredSale],
        now: &DateTime<Tz>,
    ) -> Result<ExportSalesResponse> {
        let mut ordered: Vec<&StoredSale> = sales.iter().collect();
        // Stable sort keeps insertion order for equal timestamps
        ordered.sort_by_key(|s| s.sale.date);

        let mut csv_writer = Writer::from_writer(Vec::new());
        csv_writer.write_record(EXPORT_HEADER)?;
        for (index, stored) in ordered.iter().enumerate() {
            csv_writer.write_record([
                (index + 1).to_string(),
                stored.sale.date.format("%Y/%m/%d").to_string(),
                stored.sale.customer_name.clone(),
                stored.sale.product.clone(),
                stored.sale.amount.to_string(),
            ])?;
        }

        let bytes = csv_writer
            .into_inner()
            .map_err(|e| anyhow!("Failed to finish CSV export: {}", e))?;
        let csv_content = String::from_utf8(bytes).context("CSV export is not valid UTF-8")?;

        let response = ExportSalesResponse {
            csv_content,
            filename: format!("sales_export_{}.csv", now.date_naive().format("%Y%m%d")),
            sale_count: ordered.len(),
        };

        info!(
            "📄 EXPORT: Generated {} sales ({} bytes) as {}",
            response.sale_count,
            response.csv_content.len(),
            response.filename
        );
        Ok(response)
    }

    /// Write an export into `directory`, or into the default export
    /// directory when none is given. Returns the full path written.
    pub fn export_to_directory(
        &self,
        export: &ExportSalesResponse,
        directory: Option<&Path>,
    ) -> Result<PathBuf> {
        let export_dir = match directory {
            Some(dir) => dir.to_path_buf(),
            None => default_export_directory()
                .ok_or_else(|| anyhow!("Could not determine default export directory"))?,
        };

        fs::create_dir_all(&export_dir).with_context(|| {
            format!("Failed to create export directory {}", export_dir.display())
        })?;

        let file_path = export_dir.join(&export.filename);
        if let Err(e) = fs::write(&file_path, &export.csv_content) {
            error!("❌ EXPORT: Failed to write {:?}: {}", file_path, e);
            return Err(e).context(format!("Failed to write {}", file_path.display()));
        }

        info!(
            "✅ EXPORT: Wrote {} sales to {}",
            export.sale_count,
            file_path.display()
        );
        Ok(file_path)
    }
}

/// Documents folder, falling back to the home directory
pub fn default_export_directory() -> Option<PathBuf> {
    dirs::document_dir().or_else(dirs::home_dir)
}
