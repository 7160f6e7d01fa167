//! Table rendering for the CLI.

use farmview_domain::entities::{Position, PositionView};
use farmview_domain::history::{HistoricalPriceRow, Trend};
use farmview_domain::tabs::{TabItem, TabSwitch};
use farmview_domain::value_objects::Address;
use farmview_domain::DomainError;
use prettytable::{Table, row};
use rust_decimal::Decimal;

pub const TAB_ALL: &str = "all";
pub const TAB_FARMING: &str = "farming";

/// Tabs offered by the positions view.
pub fn position_tabs() -> Result<TabSwitch, DomainError> {
    TabSwitch::new(vec![
        TabItem::new(TAB_ALL, "All positions"),
        TabItem::new(TAB_FARMING, "Farming"),
    ])
}

/// Positions visible under the selected tab.
pub fn visible_positions<'a>(view: &'a PositionView, tabs: &TabSwitch) -> Vec<&'a Position> {
    let farming_only = tabs.is_selected(TAB_FARMING);
    view.positions
        .iter()
        .filter(|p| !farming_only || p.farming)
        .collect()
}

/// `0x1234…abcd`
pub fn short_address(address: &Address) -> String {
    let full = address.to_lowercase_hex();
    format!("{}…{}", &full[..6], &full[full.len() - 4..])
}

pub fn positions_table(positions: &[&Position]) -> Table {
    let mut table = Table::new();
    table.set_titles(row!["Pool", "Token 0", "Token 1", "LP amount", "Value (USD)", "Farming"]);
    for p in positions {
        let farming = if p.farming { "yes" } else { "no" };
        table.add_row(row![
            short_address(&p.pair_address),
            short_address(&p.token0_address),
            short_address(&p.token1_address),
            format!("{:.6}", p.lp_amount),
            format!("{:.2}", p.balance_usd),
            farming
        ]);
    }
    table
}

pub fn total_usd(positions: &[&Position]) -> Decimal {
    positions.iter().map(|p| p.balance_usd).sum()
}

pub fn history_table(rows: &[HistoricalPriceRow]) -> Table {
    let mut table = Table::new();
    table.set_titles(row!["Date", "Price", "Difference", "Change"]);
    for r in rows {
        let arrow = match r.trend() {
            Trend::Up => "▲",
            Trend::Down => "▼",
        };
        table.add_row(row![
            r.date,
            r.format_price(),
            r.format_difference(),
            format!("{arrow} {}", r.format_change())
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use farmview_domain::history::historical_rows;
    use rust_decimal_macros::dec;

    fn position(byte: u8, usd: Decimal, farming: bool) -> Position {
        Position {
            pair_address: Address::new([byte; 20]),
            token0_address: Address::new([byte + 1; 20]),
            token1_address: Address::new([byte + 2; 20]),
            lp_amount: dec!(1),
            balance_usd: usd,
            total_amount0: None,
            total_amount1: None,
            total_supply: dec!(10),
            farming,
        }
    }

    #[test]
    fn test_farming_tab_filters() {
        let view = PositionView::ready(vec![
            position(1, dec!(10), true),
            position(4, dec!(5), false),
        ]);
        let mut tabs = position_tabs().unwrap();
        assert_eq!(visible_positions(&view, &tabs).len(), 2);

        tabs.select(TAB_FARMING).unwrap();
        let visible = visible_positions(&view, &tabs);
        assert_eq!(visible.len(), 1);
        assert_eq!(total_usd(&visible), dec!(10));
    }

    #[test]
    fn test_short_address() {
        let address: Address = "0x02203f2351e7ac6ab5051205172d3f772db7d814".parse().unwrap();
        assert_eq!(short_address(&address), "0x0220…d814");
    }

    #[test]
    fn test_tables_have_one_row_per_item() {
        let p = position(1, dec!(10), true);
        assert_eq!(positions_table(&[&p]).len(), 1);

        let rows = historical_rows(&[dec!(1), dec!(2), dec!(3)], &[0, 86_400, 172_800]);
        assert_eq!(history_table(&rows).len(), 2);
    }
}
