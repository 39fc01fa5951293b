//! Domain-level command and query types
//! These structs are used by services inside the domain layer. The `Backend`
//! facade maps the public DTOs defined in the `shared` crate to these
//! internal types.

use chrono::{DateTime, FixedOffset};

use super::models::SaleKey;

/// Input for recording a new sale, exactly as typed into the form.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateSaleCommand {
    pub customer_name: String,
    pub product: String,
    pub amount: String,
    /// RFC 3339 or YYYY-MM-DD; `None` records the sale at entry time
    pub date: Option<String>,
}

impl CreateSaleCommand {
    pub fn new(
        customer_name: impl Into<String>,
        product: impl Into<String>,
        amount: impl Into<String>,
    ) -> Self {
        Self {
            customer_name: customer_name.into(),
            product: product.into(),
            amount: amount.into(),
            date: None,
        }
    }

    pub fn with_date(mut self, date: DateTime<FixedOffset>) -> Self {
        self.date = Some(date.to_rfc3339());
        self
    }
}

/// Query parameters for listing sales newest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SaleListQuery {
    /// Cursor for pagination - sale key to start after
    pub after: Option<SaleKey>,
    pub limit: Option<usize>,
}
