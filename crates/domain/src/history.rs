//! Day-over-day historical price table.

use chrono::DateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Direction of a row's change against the previous day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trend {
    Up,
    Down,
}

/// One row of the historical price table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoricalPriceRow {
    /// Unix timestamp in seconds.
    pub timestamp: i64,
    /// UTC date as `DD Mon YYYY`.
    pub date: String,
    pub price: Decimal,
    /// Price minus the previous price.
    pub difference: Decimal,
    /// Difference as a percentage of the previous price.
    pub change: Decimal,
}

impl HistoricalPriceRow {
    pub fn trend(&self) -> Trend {
        if self.change > Decimal::ZERO {
            Trend::Up
        } else {
            Trend::Down
        }
    }

    pub fn format_price(&self) -> String {
        format!("{:.3}", self.price)
    }

    pub fn format_difference(&self) -> String {
        format!("{:.3}", self.difference)
    }

    pub fn format_change(&self) -> String {
        format!("{:.2}%", self.change)
    }
}

/// Builds the table rows from parallel price and timestamp series.
///
/// Points are paired by index; a trailing point without a partner is
/// ignored. The result is newest first and omits the oldest point, which only
/// serves as the reference for its successor.
pub fn historical_rows(prices: &[Decimal], dates: &[i64]) -> Vec<HistoricalPriceRow> {
    let hundred = Decimal::ONE_HUNDRED;
    let mut last_price: Option<Decimal> = None;

    let mut rows: Vec<HistoricalPriceRow> = prices
        .iter()
        .zip(dates)
        .map(|(&price, &timestamp)| {
            let (difference, change) = match last_price {
                Some(prev) if !prev.is_zero() => {
                    let difference = price - prev;
                    let change = (difference * hundred)
                        .checked_div(prev)
                        .unwrap_or(Decimal::ZERO);
                    (difference, change)
                }
                _ => (Decimal::ZERO, Decimal::ZERO),
            };
            last_price = Some(price);

            HistoricalPriceRow {
                timestamp,
                date: format_row_date(timestamp),
                price,
                difference,
                change,
            }
        })
        .collect();

    rows.reverse();
    rows.pop();
    rows
}

fn format_row_date(timestamp: i64) -> String {
    DateTime::from_timestamp(timestamp, 0)
        .map(|dt| dt.format("%d %b %Y").to_string())
        .unwrap_or_default()
}
