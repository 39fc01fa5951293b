use anyhow::{anyhow, bail, Context, Result};
use chrono::DateTime;
use csv::{Reader, StringRecord, Writer, WriterBuilder};
use log::{debug, info};
use rust_decimal::Decimal;
use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter};
use std::str::FromStr;

use super::box_metadata::BoxMetadataRepository;
use super::connection::CsvConnection;
use crate::domain::models::{Sale, SaleKey, StoredSale};
use crate::storage::traits::SaleStorage;

const HEADER: [&str; 5] = ["key", "customer_name", "product", "amount", "date"];

/// CSV-based sale repository
#[derive(Clone, Debug)]
pub struct SaleRepository {
    connection: CsvConnection,
    metadata: BoxMetadataRepository,
}

impl SaleRepository {
    /// Create a new CSV sale repository
    pub fn new(connection: CsvConnection) -> Self {
        let metadata = BoxMetadataRepository::new(connection.clone());
        Self {
            connection,
            metadata,
        }
    }

    /// Read all sales from the box file in insertion order
    fn read_sales(&self) -> Result<Vec<StoredSale>> {
        self.connection.ensure_box_file_exists()?;

        let file_path = self.connection.get_box_file_path();
        let file = File::open(&file_path)
            .with_context(|| format!("Failed to open {}", file_path.display()))?;
        let mut csv_reader = Reader::from_reader(BufReader::new(file));

        let headers = csv_reader
            .headers()
            .with_context(|| format!("Failed to read header of {}", file_path.display()))?;
        if headers.iter().ne(HEADER) {
            bail!(
                "Unexpected header in {}: expected '{}', found '{}'",
                file_path.display(),
                HEADER.join(","),
                headers.iter().collect::<Vec<_>>().join(",")
            );
        }

        let mut sales = Vec::new();
        for (index, result) in csv_reader.records().enumerate() {
            let record = result?;
            // Header is line 1
            let line = index + 2;
            let sale = Self::parse_record(&record)
                .with_context(|| format!("Bad sale record at {}:{}", file_path.display(), line))?;
            sales.push(sale);
        }

        Ok(sales)
    }

    fn parse_record(record: &StringRecord) -> Result<StoredSale> {
        let field = |index: usize| {
            record
                .get(index)
                .ok_or_else(|| anyhow!("missing column '{}'", HEADER[index]))
        };

        let key = field(0)?
            .parse::<u64>()
            .with_context(|| format!("invalid key '{}'", field(0).unwrap_or_default()))?;
        let amount = Decimal::from_str(field(3)?)
            .with_context(|| format!("invalid amount '{}'", field(3).unwrap_or_default()))?;
        let date = DateTime::parse_from_rfc3339(field(4)?)
            .with_context(|| format!("invalid date '{}'", field(4).unwrap_or_default()))?;

        Ok(StoredSale {
            key: SaleKey(key),
            sale: Sale {
                customer_name: field(1)?.to_string(),
                product: field(2)?.to_string(),
                amount,
                date,
            },
        })
    }

    fn record_fields(stored: &StoredSale) -> [String; 5] {
        [
            stored.key.0.to_string(),
            stored.sale.customer_name.clone(),
            stored.sale.product.clone(),
            stored.sale.amount.to_string(),
            stored.sale.date.to_rfc3339(),
        ]
    }

    /// Rewrite the whole box file through a temp file and rename
    fn write_sales(&self, sales: &[StoredSale]) -> Result<()> {
        let file_path = self.connection.get_box_file_path();
        let temp_path = file_path.with_extension("csv.tmp");

        {
            let file = File::create(&temp_path)
                .with_context(|| format!("Failed to create {}", temp_path.display()))?;
            let mut csv_writer = Writer::from_writer(BufWriter::new(file));
            csv_writer.write_record(HEADER)?;
            for stored in sales {
                csv_writer.write_record(Self::record_fields(stored))?;
            }
            csv_writer.flush()?;
        }

        fs::rename(&temp_path, &file_path)
            .with_context(|| format!("Failed to replace {}", file_path.display()))?;
        Ok(())
    }
}

impl SaleStorage for SaleRepository {
    fn append_sale(&self, sale: &Sale) -> Result<SaleKey> {
        let existing = self.read_sales()?;
        let floor = existing.iter().map(|s| s.key.0 + 1).max().unwrap_or(0);

        // Key is reserved before the row is written so a crash in between
        // leaves a gap rather than a reused key.
        let key = SaleKey(self.metadata.reserve_key(floor)?);
        let stored = StoredSale {
            key,
            sale: sale.clone(),
        };

        let file_path = self.connection.get_box_file_path();
        let file = OpenOptions::new()
            .append(true)
            .open(&file_path)
            .with_context(|| format!("Failed to open {} for append", file_path.display()))?;
        let mut csv_writer = WriterBuilder::new()
            .has_headers(false)
            .from_writer(BufWriter::new(file));
        csv_writer.write_record(Self::record_fields(&stored))?;
        csv_writer.flush()?;

        info!(
            "Stored {} for {} ({} {})",
            key, sale.customer_name, sale.product, sale.amount
        );
        Ok(key)
    }

    fn get_sale(&self, key: SaleKey) -> Result<Option<StoredSale>> {
        Ok(self.read_sales()?.into_iter().find(|s| s.key == key))
    }

    fn list_sales(&self) -> Result<Vec<StoredSale>> {
        let sales = self.read_sales()?;
        debug!(
            "Read {} sales from box '{}'",
            sales.len(),
            self.connection.box_name()
        );
        Ok(sales)
    }

    fn delete_sale(&self, key: SaleKey) -> Result<bool> {
        let mut sales = self.read_sales()?;
        let before = sales.len();
        sales.retain(|s| s.key != key);

        if sales.len() == before {
            return Ok(false);
        }

        self.write_sales(&sales)?;
        info!("Deleted {} from box '{}'", key, self.connection.box_name());
        Ok(true)
    }
}
