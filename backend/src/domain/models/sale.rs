//! Domain model for a sale.
use chrono::{DateTime, FixedOffset, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::SaleField;
use std::fmt;

/// Handle assigned by the record store when a sale is appended.
///
/// Keys increase monotonically and are never handed out twice within a box,
/// so two sales with identical fields remain distinct records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SaleKey(pub u64);

impl fmt::Display for SaleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sale#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sale {
    pub customer_name: String,
    pub product: String,
    pub amount: Decimal,
    pub date: DateTime<FixedOffset>,
}

impl AsRef<Sale> for Sale {
    fn as_ref(&self) -> &Sale {
        self
    }
}

/// A sale together with the handle the store assigned to it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredSale {
    pub key: SaleKey,
    pub sale: Sale,
}

impl AsRef<Sale> for StoredSale {
    fn as_ref(&self) -> &Sale {
        &self.sale
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SaleValidationError {
    #[error("Please enter a customer name")]
    EmptyCustomerName,
    #[error("Customer name is too long ({0} characters). Maximum is {1}.")]
    CustomerNameTooLong(usize, usize),
    #[error("Please enter a product")]
    EmptyProduct,
    #[error("Product name is too long ({0} characters). Maximum is {1}.")]
    ProductTooLong(usize, usize),
    #[error("Please enter an amount")]
    EmptyAmount,
    #[error("Please enter a valid amount (like 5 or 5.00): {0}")]
    InvalidAmount(String),
    #[error("Amount cannot be larger than {0}")]
    AmountTooLarge(Decimal),
    #[error("Could not read date '{0}'")]
    InvalidDate(String),
    #[error("Date cannot be before {0}")]
    DateTooEarly(NaiveDate),
    #[error("Date cannot be in the future")]
    DateInFuture,
}

impl SaleValidationError {
    /// The form field this error belongs to
    pub fn field(&self) -> SaleField {
        match self {
            SaleValidationError::EmptyCustomerName
            | SaleValidationError::CustomerNameTooLong(..) => SaleField::CustomerName,
            SaleValidationError::EmptyProduct | SaleValidationError::ProductTooLong(..) => {
                SaleField::Product
            }
            SaleValidationError::EmptyAmount
            | SaleValidationError::InvalidAmount(_)
            | SaleValidationError::AmountTooLarge(_) => SaleField::Amount,
            SaleValidationError::InvalidDate(_)
            | SaleValidationError::DateTooEarly(_)
            | SaleValidationError::DateInFuture => SaleField::Date,
        }
    }
}
