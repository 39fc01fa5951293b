//! # CSV Storage Module
//!
//! File-based sale box. Each box lives in the data directory as two files:
//!
//! - `<box_name>.csv` holds one row per sale in insertion order
//! - `<box_name>.meta.yaml` holds the next key to hand out
//!
//! ## File Format
//!
//! ```csv
//! key,customer_name,product,amount,date
//! 0,Bob,Widget,10.00,2024-06-12T09:00:00+00:00
//! 2,Ann,Gadget,2.50,2024-06-10T09:00:00-04:00
//! ```
//!
//! Amounts are written as exact decimal strings and dates as RFC 3339 with
//! their original offset. Appends add a single row; deletes rewrite the file
//! through a temp file and rename.

pub mod box_metadata;
pub mod connection;
pub mod sale_repository;

#[cfg(test)]
pub mod test_utils;

pub use box_metadata::{BoxMetadata, BoxMetadataRepository};
pub use connection::CsvConnection;
pub use sale_repository::SaleRepository;
