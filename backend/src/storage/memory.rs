//! In-memory sale box.
//!
//! Used for ephemeral sessions and for unit tests of the domain services.
//! Repositories created from the same `MemoryConnection` share one box.

use anyhow::Result;
use log::debug;
use std::sync::{Arc, Mutex, MutexGuard};

use super::traits::{Connection, SaleStorage};
use crate::domain::models::{Sale, SaleKey, StoredSale};

#[derive(Debug, Default)]
struct MemoryBox {
    next_key: u64,
    sales: Vec<StoredSale>,
}

#[derive(Clone, Default)]
pub struct MemoryConnection {
    sale_box: Arc<Mutex<MemoryBox>>,
}

impl MemoryConnection {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Connection for MemoryConnection {
    type SaleRepository = MemorySaleRepository;

    fn create_sale_repository(&self) -> Self::SaleRepository {
        MemorySaleRepository {
            sale_box: Arc::clone(&self.sale_box),
        }
    }
}

#[derive(Clone)]
pub struct MemorySaleRepository {
    sale_box: Arc<Mutex<MemoryBox>>,
}

impl MemorySaleRepository {
    fn lock(&self) -> MutexGuard<'_, MemoryBox> {
        self.sale_box.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SaleStorage for MemorySaleRepository {
    fn append_sale(&self, sale: &Sale) -> Result<SaleKey> {
        let mut sale_box = self.lock();
        let key = SaleKey(sale_box.next_key);
        sale_box.next_key += 1;
        sale_box.sales.push(StoredSale {
            key,
            sale: sale.clone(),
        });
        debug!("Appended {} to memory box", key);
        Ok(key)
    }

    fn get_sale(&self, key: SaleKey) -> Result<Option<StoredSale>> {
        Ok(self.lock().sales.iter().find(|s| s.key == key).cloned())
    }

    fn list_sales(&self) -> Result<Vec<StoredSale>> {
        Ok(self.lock().sales.clone())
    }

    fn delete_sale(&self, key: SaleKey) -> Result<bool> {
        let mut sale_box = self.lock();
        let before = sale_box.sales.len();
        sale_box.sales.retain(|s| s.key != key);
        Ok(sale_box.sales.len() < before)
    }

    fn count_sales(&self) -> Result<usize> {
        Ok(self.lock().sales.len())
    }
}
