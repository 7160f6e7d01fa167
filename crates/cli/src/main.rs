//! Command Line Interface for farm and pool position views.
mod render;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use farmview_domain::entities::PositionView;
use farmview_domain::farm::resolve_farm_route;
use farmview_domain::history::historical_rows;
use farmview_domain::tabs::TabSwitch;
use farmview_domain::value_objects::Address;
use farmview_execution::prelude::*;
use render::{history_table, position_tabs, positions_table, total_usd, visible_positions};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "farmview")]
#[command(about = "Liquidity position viewer for farm and pool pages", long_about = None)]
struct Cli {
    /// Engine configuration file
    #[arg(short, long, global = true, default_value = "farmview.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the liquidity positions of a wallet once
    Positions {
        /// Wallet address; omit to see the disconnected view
        #[arg(short, long)]
        account: Option<String>,

        /// Chain id
        #[arg(long, default_value_t = 137)]
        chain: u64,

        /// Tab to show (all, farming)
        #[arg(short, long, default_value = "all")]
        tab: String,

        /// Print the view as JSON
        #[arg(long)]
        json: bool,
    },
    /// Keep positions up to date; transaction hashes read from stdin trigger a refresh
    Watch {
        /// Wallet address
        #[arg(short, long)]
        account: Option<String>,

        /// Chain id
        #[arg(long, default_value_t = 137)]
        chain: u64,
    },
    /// Print a day-over-day price table from a JSON file of prices and dates
    History {
        /// File with `{"prices": [...], "dates": [...]}` (dates in unix seconds)
        #[arg(short, long)]
        file: PathBuf,
    },
    /// Resolve where the farm entry page redirects to
    FarmRoute {
        /// Chain id
        #[arg(long, default_value_t = 137)]
        chain: u64,

        /// Current path
        #[arg(short, long, default_value = "/farm")]
        path: String,
    },
}

#[derive(Deserialize)]
struct PriceSeries {
    prices: Vec<Decimal>,
    dates: Vec<i64>,
}

fn parse_account(account: Option<&str>) -> Result<Option<Address>> {
    account
        .map(|a| a.parse::<Address>().with_context(|| format!("invalid account {a}")))
        .transpose()
}

fn print_view(view: &PositionView, tabs: &TabSwitch, connected: bool, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(view)?);
        return Ok(());
    }
    if view.loading {
        println!("⏳ Loading positions...");
        return Ok(());
    }

    let positions = visible_positions(view, tabs);
    if positions.is_empty() {
        println!("No liquidity positions.");
        if !connected {
            println!("Connect a wallet (--account) to see your positions.");
        }
        return Ok(());
    }

    println!("📊 {}", tabs.selected().text);
    positions_table(&positions).printstd();
    println!("Total value: ${:.2}", total_usd(&positions));
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Positions {
            account,
            chain,
            tab,
            json,
        } => {
            let config = EngineConfig::load(&cli.config)?;
            let chain_config = config.require_chain(*chain)?;
            let account = parse_account(account.as_deref())?;
            let mut tabs = position_tabs()?;
            tabs.select(tab)?;

            let aggregator = PositionAggregator::from_config(&config)?;
            let outcome = aggregator.refresh(chain_config, account).await;
            if outcome.view.loading {
                println!("Some reads are still pending: {:?}", outcome.barrier.pending());
            }
            print_view(&outcome.view, &tabs, account.is_some(), *json)?;
        }
        Commands::Watch { account, chain } => {
            let config = EngineConfig::load(&cli.config)?;
            config.require_chain(*chain)?;
            let account = parse_account(account.as_deref())?;
            let tabs = position_tabs()?;

            let aggregator = Arc::new(PositionAggregator::from_config(&config)?);
            let handle = PositionPoller::new(aggregator, &config).spawn(*chain, account);
            let mut views = handle.subscribe();
            let mut stdin = BufReader::new(tokio::io::stdin()).lines();
            let mut stdin_open = true;

            println!(
                "👀 Watching chain {} every {}s. Paste a transaction hash to refresh now, Ctrl-C to stop.",
                chain, config.refresh_interval_secs
            );

            loop {
                tokio::select! {
                    changed = views.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        let view = views.borrow_and_update().clone();
                        print_view(&view, &tabs, account.is_some(), false)?;
                    }
                    line = stdin.next_line(), if stdin_open => match line? {
                        Some(hash) if !hash.trim().is_empty() => {
                            handle.transaction_submitted(hash.trim()).await;
                        }
                        Some(_) => {}
                        None => stdin_open = false,
                    },
                    _ = tokio::signal::ctrl_c() => break,
                }
            }

            handle.shutdown().await;
        }
        Commands::History { file } => {
            let content = std::fs::read_to_string(file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            let series: PriceSeries = serde_json::from_str(&content)?;
            let rows = historical_rows(&series.prices, &series.dates);

            if rows.is_empty() {
                println!("❌ Not enough price points for a table.");
                return Ok(());
            }
            history_table(&rows).printstd();
        }
        Commands::FarmRoute { chain, path } => {
            let config = EngineConfig::load(&cli.config)?;
            let availability = config
                .chain(*chain)
                .map(|c| c.farm)
                .unwrap_or_default();
            println!("{}", resolve_farm_route(&availability, path).target());
        }
    }

    Ok(())
}
