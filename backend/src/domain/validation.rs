//! Add-sale form validation.
//!
//! This module turns raw form input into a `Sale` or a list of per-field
//! errors. It is the only failure path of the domain: when validation fails
//! no `Sale` is built and the store is never touched. The UI should only
//! handle presentation concerns, while parsing and bounds checks live here.

use chrono::{DateTime, FixedOffset, NaiveDate, Offset, TimeZone};
use rust_decimal::Decimal;
use shared::{FieldError, SaleField, SaleFormErrors};
use std::str::FromStr;

use super::aggregation::start_of_day;
use super::models::{Sale, SaleValidationError};

/// Tunables for the add-sale form
#[derive(Debug, Clone, PartialEq)]
pub struct SaleEntryConfig {
    /// Symbol stripped from amount input before parsing
    pub currency_symbol: String,
    pub max_text_length: usize,
    /// Largest accepted absolute amount
    pub max_amount: Decimal,
    /// Earliest date the form accepts (start of day, local calendar)
    pub earliest_date: NaiveDate,
}

impl Default for SaleEntryConfig {
    fn default() -> Self {
        Self {
            currency_symbol: "$".to_string(),
            max_text_length: 256,
            max_amount: Decimal::new(1_000_000_000_000, 0),
            earliest_date: NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or(NaiveDate::MIN),
        }
    }
}

/// Result of validating the add-sale form
#[derive(Debug, Clone, PartialEq)]
pub struct SaleFormValidation {
    pub errors: Vec<SaleValidationError>,
    /// The sale built from the input, present only when there are no errors
    pub sale: Option<Sale>,
}

impl SaleFormValidation {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn error_for(&self, field: SaleField) -> Option<&SaleValidationError> {
        self.errors.iter().find(|e| e.field() == field)
    }

    /// All messages joined for logs and error displays
    pub fn summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| format!("{}: {}", e.field(), e))
            .collect::<Vec<_>>()
            .join("; ")
    }

    pub fn to_form_errors(&self) -> SaleFormErrors {
        SaleFormErrors {
            errors: self
                .errors
                .iter()
                .map(|e| FieldError {
                    field: e.field(),
                    message: e.to_string(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SaleEntryValidator {
    config: SaleEntryConfig,
}

impl SaleEntryValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SaleEntryConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SaleEntryConfig {
        &self.config
    }

    /// Validate raw form input against the reference instant `now`.
    ///
    /// `date_input` accepts RFC 3339 or a plain `YYYY-MM-DD` (start of that
    /// day in `now`'s zone); `None` means "now".
    pub fn validate<Tz: TimeZone>(
        &self,
        customer_name: &str,
        product: &str,
        amount_input: &str,
        date_input: Option<&str>,
        now: &DateTime<Tz>,
    ) -> SaleFormValidation {
        let mut errors = Vec::new();

        let customer_name = customer_name.trim();
        if customer_name.is_empty() {
            errors.push(SaleValidationError::EmptyCustomerName);
        } else if customer_name.chars().count() > self.config.max_text_length {
            errors.push(SaleValidationError::CustomerNameTooLong(
                customer_name.chars().count(),
                self.config.max_text_length,
            ));
        }

        let product = product.trim();
        if product.is_empty() {
            errors.push(SaleValidationError::EmptyProduct);
        } else if product.chars().count() > self.config.max_text_length {
            errors.push(SaleValidationError::ProductTooLong(
                product.chars().count(),
                self.config.max_text_length,
            ));
        }

        let amount = if amount_input.trim().is_empty() {
            errors.push(SaleValidationError::EmptyAmount);
            None
        } else {
            match self.clean_and_parse_amount(amount_input) {
                Ok(amount) if amount.abs() > self.config.max_amount => {
                    errors.push(SaleValidationError::AmountTooLarge(self.config.max_amount));
                    None
                }
                Ok(amount) => Some(amount),
                Err(message) => {
                    errors.push(SaleValidationError::InvalidAmount(message));
                    None
                }
            }
        };

        let date = match self.resolve_date(date_input, now) {
            Ok(date) => Some(date),
            Err(error) => {
                errors.push(error);
                None
            }
        };

        let sale = match (amount, date) {
            (Some(amount), Some(date)) if errors.is_empty() => Some(Sale {
                customer_name: customer_name.to_string(),
                product: product.to_string(),
                amount,
                date,
            }),
            _ => None,
        };

        SaleFormValidation { errors, sale }
    }

    /// Clean and parse amount input string
    pub fn clean_and_parse_amount(&self, amount_input: &str) -> Result<Decimal, String> {
        let cleaned = amount_input
            .trim()
            .replace(&self.config.currency_symbol, "")
            .replace(',', "")
            .replace(' ', "");

        if cleaned.is_empty() {
            return Err("Empty amount after cleaning".to_string());
        }

        Decimal::from_str(&cleaned)
            .or_else(|_| Decimal::from_scientific(&cleaned))
            .map(|mut amount| {
                // "10" reads back as "10.00"
                if amount.scale() < 2 {
                    amount.rescale(2);
                }
                amount
            })
            .map_err(|e| format!("Invalid number format: {}", e))
    }

    fn resolve_date<Tz: TimeZone>(
        &self,
        date_input: Option<&str>,
        now: &DateTime<Tz>,
    ) -> Result<DateTime<FixedOffset>, SaleValidationError> {
        let now_fixed = now.with_timezone(&now.offset().fix());

        let date = match date_input.map(str::trim).filter(|d| !d.is_empty()) {
            None => return Ok(now_fixed),
            Some(raw) => self.parse_date_input(raw, now)?,
        };

        let earliest = start_of_day(&now.timezone(), self.config.earliest_date);
        let earliest = earliest.with_timezone(&earliest.offset().fix());
        if date < earliest {
            return Err(SaleValidationError::DateTooEarly(self.config.earliest_date));
        }
        if date > now_fixed {
            return Err(SaleValidationError::DateInFuture);
        }
        Ok(date)
    }

    fn parse_date_input<Tz: TimeZone>(
        &self,
        raw: &str,
        now: &DateTime<Tz>,
    ) -> Result<DateTime<FixedOffset>, SaleValidationError> {
        if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
            return Ok(date);
        }
        if let Ok(day) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            let local = start_of_day(&now.timezone(), day);
            return Ok(local.with_timezone(&local.offset().fix()));
        }
        Err(SaleValidationError::InvalidDate(raw.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn now() -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339("2024-06-12T15:00:00Z").unwrap()
    }

    fn dec(value: &str) -> Decimal {
        Decimal::from_str(value).unwrap()
    }

    #[test]
    fn test_valid_form_builds_sale() {
        let validator = SaleEntryValidator::new();
        let result = validator.validate("  Bob ", "Widget", "$1,250.5", None, &now());

        assert!(result.is_valid());
        let sale = result.sale.unwrap();
        assert_eq!(sale.customer_name, "Bob");
        assert_eq!(sale.product, "Widget");
        assert_eq!(sale.amount, dec("1250.50"));
        assert_eq!(sale.amount.to_string(), "1250.50");
        assert_eq!(sale.date, now());
    }

    #[test]
    fn test_empty_customer_name_is_rejected() {
        let validator = SaleEntryValidator::new();
        let result = validator.validate("", "Widget", "10", None, &now());

        assert!(!result.is_valid());
        assert!(result.sale.is_none());
        assert_eq!(
            result.error_for(SaleField::CustomerName),
            Some(&SaleValidationError::EmptyCustomerName)
        );
        assert!(result.error_for(SaleField::Amount).is_none());
    }

    #[test]
    fn test_non_numeric_amount_is_rejected() {
        let validator = SaleEntryValidator::new();
        let result = validator.validate("Bob", "Widget", "abc", None, &now());

        assert!(matches!(
            result.error_for(SaleField::Amount),
            Some(SaleValidationError::InvalidAmount(_))
        ));
        assert!(result.sale.is_none());
    }

    #[test]
    fn test_all_field_errors_are_collected() {
        let validator = SaleEntryValidator::new();
        let result = validator.validate(" ", "", "", Some("yesterday"), &now());

        let fields: Vec<SaleField> = result.errors.iter().map(|e| e.field()).collect();
        assert_eq!(
            fields,
            vec![SaleField::CustomerName, SaleField::Product, SaleField::Amount, SaleField::Date]
        );

        let form_errors = result.to_form_errors();
        assert_eq!(form_errors.message_for(SaleField::Product), Some("Please enter a product"));
    }

    #[test]
    fn test_negative_and_scientific_amounts_parse() {
        let validator = SaleEntryValidator::new();
        assert_eq!(validator.clean_and_parse_amount("-4.25").unwrap(), dec("-4.25"));
        assert_eq!(validator.clean_and_parse_amount("1e2").unwrap(), dec("100"));
        assert!(validator.clean_and_parse_amount("$").is_err());
    }

    #[test]
    fn test_date_bounds() {
        let validator = SaleEntryValidator::new();

        let too_early = validator.validate("Bob", "Widget", "1", Some("1999-12-31"), &now());
        assert!(matches!(
            too_early.error_for(SaleField::Date),
            Some(SaleValidationError::DateTooEarly(_))
        ));

        let future = validator.validate("Bob", "Widget", "1", Some("2024-06-13T00:00:00Z"), &now());
        assert_eq!(
            future.error_for(SaleField::Date),
            Some(&SaleValidationError::DateInFuture)
        );

        let first_day = validator.validate("Bob", "Widget", "1", Some("2000-01-01"), &now());
        assert!(first_day.is_valid());
    }

    #[test]
    fn test_date_only_input_starts_at_local_midnight() {
        let validator = SaleEntryValidator::new();
        let result = validator.validate("Bob", "Widget", "1", Some("2024-06-11"), &Utc::now());

        let sale = result.sale.unwrap();
        assert_eq!(sale.date.to_rfc3339(), "2024-06-11T00:00:00+00:00");
    }

    #[test]
    fn test_amount_magnitude_is_bounded() {
        let validator = SaleEntryValidator::new();

        let huge = validator.validate("Bob", "Widget", "79228162514264337593543950335", None, &now());
        assert_eq!(
            huge.error_for(SaleField::Amount),
            Some(&SaleValidationError::AmountTooLarge(dec("1000000000000")))
        );
        assert!(huge.sale.is_none());

        let refund = validator.validate("Bob", "Widget", "-1000000000000.01", None, &now());
        assert!(refund.error_for(SaleField::Amount).is_some());

        let at_limit = validator.validate("Bob", "Widget", "$1,000,000,000,000", None, &now());
        assert!(at_limit.is_valid());
    }

    #[test]
    fn test_text_length_limit() {
        let validator = SaleEntryValidator::with_config(SaleEntryConfig {
            max_text_length: 5,
            ..SaleEntryConfig::default()
        });

        let result = validator.validate("Bartholomew", "Widget", "1", None, &now());
        assert_eq!(
            result.error_for(SaleField::CustomerName),
            Some(&SaleValidationError::CustomerNameTooLong(11, 5))
        );
        assert_eq!(
            result.error_for(SaleField::Product),
            Some(&SaleValidationError::ProductTooLong(6, 5))
        );
    }
}
