//! # Storage Layer
//!
//! Record store implementations behind the [`SaleStorage`] and
//! [`Connection`] traits. The domain layer only sees the traits, so the CSV
//! box and the in-memory box are interchangeable.

pub mod csv;
pub mod memory;
pub mod traits;

pub use self::csv::CsvConnection;
pub use memory::{MemoryConnection, MemorySaleRepository};
pub use traits::{Connection, SaleStorage};
