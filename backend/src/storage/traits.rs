//! # Storage Traits
//!
//! This module defines the storage abstraction traits that allow different
//! storage backends to be used interchangeably in the domain layer.

use anyhow::Result;

use crate::domain::models::{Sale, SaleKey, StoredSale};

/// Trait defining the interface for the sale record store
///
/// A store behaves like an append-only box with deletion: it assigns each
/// appended sale a fresh `SaleKey` and enumerates records in insertion order.
/// Keys are never reused, even after the record holding them is deleted.
pub trait SaleStorage: Send + Sync {
    /// Append a sale and return the key the store assigned to it
    fn append_sale(&self, sale: &Sale) -> Result<SaleKey>;

    /// Retrieve a specific sale by key
    fn get_sale(&self, key: SaleKey) -> Result<Option<StoredSale>>;

    /// List every stored sale in insertion order
    fn list_sales(&self) -> Result<Vec<StoredSale>>;

    /// Delete a single sale
    /// Returns true if the sale was found and deleted, false otherwise
    fn delete_sale(&self, key: SaleKey) -> Result<bool>;

    /// Number of stored sales
    fn count_sales(&self) -> Result<usize> {
        Ok(self.list_sales()?.len())
    }
}

/// Trait defining the interface for storage connections
///
/// This trait abstracts away the specific connection type (CSV files, memory)
/// and provides factory methods for creating repositories.
pub trait Connection: Send + Sync + Clone {
    /// The type of SaleStorage this connection creates
    type SaleRepository: SaleStorage;

    /// Create a new sale repository for this connection
    fn create_sale_repository(&self) -> Self::SaleRepository;
}
