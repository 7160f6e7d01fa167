//! LP token valuation.
//!
//! A pool's LP price is its total value locked divided by its LP supply. The
//! value of a holding is that price times the number of LP tokens held.

use crate::entities::PoolMetrics;
use rust_decimal::Decimal;

/// USD price of one whole LP token.
///
/// `supply_decimals` is the number of decimals the metrics service uses for
/// `total_supply`: 0 when it publishes whole tokens, 18 when it publishes raw
/// units. Missing metrics, a non-positive supply or an out-of-range divisor
/// price the token at zero.
pub fn lp_token_price(metrics: Option<&PoolMetrics>, supply_decimals: u32) -> Decimal {
    let Some(metrics) = metrics else {
        return Decimal::ZERO;
    };
    if metrics.total_supply <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    let Ok(unit) = Decimal::try_from_i128_with_scale(1, supply_decimals) else {
        return Decimal::ZERO;
    };
    let supply = match metrics.total_supply.checked_mul(unit) {
        Some(s) if !s.is_zero() => s,
        _ => return Decimal::ZERO,
    };
    metrics
        .total_value_usd
        .checked_div(supply)
        .unwrap_or(Decimal::ZERO)
}

/// USD value of `lp_amount` LP tokens, or `None` if it overflows `Decimal`.
pub fn position_value_usd(lp_amount: Decimal, lp_price: Decimal) -> Option<Decimal> {
    lp_amount.checked_mul(lp_price)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_lp_price_whole_token_supply() {
        let m = PoolMetrics::new("0xpool", dec!(1000), dec!(100));
        let price = lp_token_price(Some(&m), 0);
        assert_eq!(price, dec!(10));
        assert_eq!(position_value_usd(dec!(15), price), Some(dec!(150)));
    }

    #[test]
    fn test_lp_price_raw_unit_supply() {
        // 100 LP published as 100e18 raw units
        let m = PoolMetrics::new("0xpool", dec!(1000), dec!(100000000000000000000));
        assert_eq!(lp_token_price(Some(&m), 18), dec!(10));
    }

    #[test]
    fn test_zero_supply_prices_at_zero() {
        let m = PoolMetrics::new("0xpool", dec!(1000000), Decimal::ZERO);
        assert_eq!(lp_token_price(Some(&m), 0), Decimal::ZERO);
        assert_eq!(lp_token_price(Some(&m), 18), Decimal::ZERO);
    }

    #[test]
    fn test_missing_metrics_prices_at_zero() {
        assert_eq!(lp_token_price(None, 0), Decimal::ZERO);
    }

    #[test]
    fn test_overflowing_value_is_none() {
        assert_eq!(position_value_usd(Decimal::MAX, dec!(2)), None);
    }

    #[test]
    fn test_invalid_supply_decimals_prices_at_zero() {
        let m = PoolMetrics::new("0xpool", dec!(1000), dec!(100));
        assert_eq!(lp_token_price(Some(&m), 40), Decimal::ZERO);
    }
}
