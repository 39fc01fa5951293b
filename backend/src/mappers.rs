//! Conversions between domain models and the DTOs in the `shared` crate.

use anyhow::{Context, Result};
use chrono::DateTime;
use shared::{CreateSaleRequest, Sale as SharedSale, SaleListResponse};

use crate::domain::commands::CreateSaleCommand;
use crate::domain::models::{Sale as DomainSale, SaleKey, StoredSale};

/// Mapper to convert between shared Sale DTOs and domain sale models.
pub struct SaleMapper;

impl SaleMapper {
    /// Converts a stored domain sale to a shared Sale DTO.
    pub fn to_dto(domain: StoredSale) -> SharedSale {
        SharedSale {
            key: domain.key.0,
            customer_name: domain.sale.customer_name,
            product: domain.sale.product,
            amount: domain.sale.amount,
            date: domain.sale.date.to_rfc3339(),
        }
    }

    /// Converts a shared Sale DTO back to a stored domain sale.
    pub fn to_domain(dto: SharedSale) -> Result<StoredSale> {
        let date = DateTime::parse_from_rfc3339(&dto.date)
            .with_context(|| format!("Failed to parse date '{}' from shared DTO", dto.date))?;

        Ok(StoredSale {
            key: SaleKey(dto.key),
            sale: DomainSale {
                customer_name: dto.customer_name,
                product: dto.product,
                amount: dto.amount,
                date,
            },
        })
    }

    pub fn to_list_dto(domain_sales: Vec<StoredSale>) -> SaleListResponse {
        SaleListResponse {
            sales: domain_sales.into_iter().map(Self::to_dto).collect(),
        }
    }

    pub fn to_create_command(request: CreateSaleRequest) -> CreateSaleCommand {
        CreateSaleCommand {
            customer_name: request.customer_name,
            product: request.product,
            amount: request.amount,
            date: request.date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_dto_keeps_key_and_offset() {
        let stored = StoredSale {
            key: SaleKey(7),
            sale: DomainSale {
                customer_name: "Bob".to_string(),
                product: "Widget".to_string(),
                amount: Decimal::new(1000, 2),
                date: DateTime::parse_from_rfc3339("2024-06-12T09:00:00-04:00").unwrap(),
            },
        };

        let dto = SaleMapper::to_dto(stored.clone());
        assert_eq!(dto.key, 7);
        assert_eq!(dto.date, "2024-06-12T09:00:00-04:00");
        assert_eq!(SaleMapper::to_domain(dto).unwrap(), stored);
    }

    #[test]
    fn test_bad_dto_date_is_an_error() {
        let dto = SharedSale {
            key: 1,
            customer_name: "Bob".to_string(),
            product: "Widget".to_string(),
            amount: Decimal::ONE,
            date: "yesterday".to_string(),
        };
        assert!(SaleMapper::to_domain(dto).is_err());
    }
}
