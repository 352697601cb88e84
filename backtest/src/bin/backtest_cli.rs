//! Runs a strategy over synthetic (default) or CSV-loaded minute bars and
//! prints the resulting metrics bundle. Analogous to the teacher's
//! `day_trade/src/bin/intraday_backtest.rs`, rebuilt against the pipeline in
//! this workspace instead of `day_trade`'s direct strategy structs.
//!
//! ```text
//! backtest-cli [--strategy ma-crossover|candlestick|breakout] [--csv PATH] [--days N]
//! ```

use std::fs::File;
use std::io::BufReader;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::info;

use backtest::{load_bars_csv, run_backtest, synthetic_bars, Bar, SimulatorConfig, SyntheticDataConfig};
use strategy::{MaCrossoverConfig, MaCrossoverStrategy, Strategy};
use strategy::{CandlestickPatternConfig, CandlestickPatternStrategy};
use strategy::{MultiTimeframeBreakoutConfig, MultiTimeframeBreakoutStrategy};

struct Args {
    strategy: String,
    csv_path: Option<String>,
    days: usize,
}

fn parse_args() -> Args {
    let mut strategy = "ma-crossover".to_string();
    let mut csv_path = None;
    let mut days = 5usize;

    let mut it = std::env::args().skip(1);
    while let Some(flag) = it.next() {
        match flag.as_str() {
            "--strategy" => strategy = it.next().unwrap_or(strategy),
            "--csv" => csv_path = it.next(),
            "--days" => days = it.next().and_then(|v| v.parse().ok()).unwrap_or(days),
            other => eprintln!("ignoring unrecognised flag: {other}"),
        }
    }

    Args { strategy, csv_path, days }
}

fn load_bars(args: &Args) -> Result<Vec<Bar>> {
    match &args.csv_path {
        Some(path) => {
            let file = File::open(path).with_context(|| format!("opening bar CSV at {path}"))?;
            load_bars_csv(BufReader::new(file)).with_context(|| format!("parsing bar CSV at {path}"))
        }
        None => {
            let config = SyntheticDataConfig { trading_days: args.days, ..SyntheticDataConfig::default() };
            Ok(synthetic_bars(&config))
        }
    }
}

fn build_strategy(name: &str) -> Result<Box<dyn Strategy>> {
    match name {
        "ma-crossover" => Ok(Box::new(MaCrossoverStrategy::new(MaCrossoverConfig::default()))),
        "candlestick" => Ok(Box::new(CandlestickPatternStrategy::new(CandlestickPatternConfig::default()))),
        "breakout" => Ok(Box::new(MultiTimeframeBreakoutStrategy::new(MultiTimeframeBreakoutConfig::default()))),
        other => anyhow::bail!("unknown strategy '{other}' (expected ma-crossover | candlestick | breakout)"),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter(tracing_subscriber::EnvFilter::from_default_env()).init();

    let args = parse_args();
    let strategy = build_strategy(&args.strategy)?;

    let load_start = Instant::now();
    let bars = load_bars(&args)?;
    info!(bars = bars.len(), elapsed_ms = load_start.elapsed().as_millis(), "loaded bar data");

    let sim_config = SimulatorConfig::default();
    let run_start = Instant::now();
    let result = match run_backtest(strategy.as_ref(), &bars, sim_config.initial_capital, &sim_config) {
        Ok(result) => result,
        Err(backtest::BacktestError::Strategy(strategy::StrategyError::InsufficientData { needed, got })) => {
            info!(needed, got, "strategy requires more bars than were supplied; nothing to backtest");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };
    info!(trades = result.trades.len(), elapsed_ms = run_start.elapsed().as_millis(), "backtest complete");

    println!("Strategy: {} v{}", strategy.name(), strategy.version());
    println!("Bars processed: {}", bars.len());
    println!("Trades closed: {}", result.trades.len());
    println!("{}", serde_json::to_string_pretty(&result.metrics)?);

    Ok(())
}
