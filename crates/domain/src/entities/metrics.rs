use crate::error::DomainError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Pool-level figures published by the off-chain aggregation service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolMetrics {
    /// Lowercase pool address.
    pub pool_address: String,
    pub total_value_usd: Decimal,
    pub total_supply: Decimal,
}

impl PoolMetrics {
    pub fn new(pool_address: impl Into<String>, total_value_usd: Decimal, total_supply: Decimal) -> Self {
        Self {
            pool_address: pool_address.into().to_lowercase(),
            total_value_usd,
            total_supply,
        }
    }

    /// Parses the string figures the service returns.
    ///
    /// # Errors
    /// Returns `InvalidDecimal` if either figure is not a number.
    pub fn parse(
        pool_address: impl Into<String>,
        total_value_usd: &str,
        total_supply: &str,
    ) -> Result<Self, DomainError> {
        Ok(Self::new(
            pool_address,
            parse_decimal(total_value_usd)?,
            parse_decimal(total_supply)?,
        ))
    }
}

/// Parses plain or scientific decimal notation.
///
/// # Errors
/// Returns `InvalidDecimal` when neither notation matches.
pub fn parse_decimal(value: &str) -> Result<Decimal, DomainError> {
    let value = value.trim();
    Decimal::from_str(value)
        .or_else(|_| Decimal::from_scientific(value))
        .map_err(|_| DomainError::InvalidDecimal(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_metrics() {
        let m = PoolMetrics::parse("0xABCD", "1000.50", "100").unwrap();
        assert_eq!(m.pool_address, "0xabcd");
        assert_eq!(m.total_value_usd, dec!(1000.50));
        assert_eq!(m.total_supply, dec!(100));
    }

    #[test]
    fn test_parse_scientific() {
        assert_eq!(parse_decimal("1.5e3").unwrap(), dec!(1500));
    }

    #[test]
    fn test_parse_garbage() {
        assert_eq!(
            parse_decimal("n/a"),
            Err(DomainError::InvalidDecimal("n/a".to_string()))
        );
    }
}
