pub mod sale;

pub use sale::{Sale, SaleKey, SaleValidationError, StoredSale};
