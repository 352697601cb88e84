use simulator::Trade;

use crate::data::{round2, MetricData};
use crate::error::{MetricsError, Result};
use crate::period::{self, group_by};

const RISK_FREE_RATE: f64 = 0.06;
const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// The six reporting horizons, all derived from the same closed-trade list.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Metrics {
    pub daily: MetricData,
    pub weekly: MetricData,
    pub monthly: MetricData,
    pub quarterly: MetricData,
    pub yearly: MetricData,
    pub overall: MetricData,
}

/// Averages a horizon's per-period `MetricData` into one bundle: arithmetic
/// mean for most fields (integer fields rounded), max across groups for the
/// consecutive-streak fields, and the global (not averaged) `time_in_market`.
fn average_horizon(per_period: &[MetricData], time_in_market: f64) -> MetricData {
    if per_period.is_empty() {
        let mut m = MetricData::zero();
        m.time_in_market = time_in_market;
        return m;
    }

    let n = per_period.len() as f64;
    let sum = |f: fn(&MetricData) -> f64| per_period.iter().map(f).sum::<f64>() / n;

    MetricData {
        return_pct: round2(sum(|m| m.return_pct)),
        sharpe_ratio: round2(sum(|m| m.sharpe_ratio)),
        max_drawdown: round2(sum(|m| m.max_drawdown)),
        win_rate: round2(sum(|m| m.win_rate)),
        loss_rate: round2(sum(|m| m.loss_rate)),
        total_trades: (sum(|m| m.total_trades as f64)).round() as u32,
        profit_factor: round2(sum(|m| m.profit_factor)),
        expectancy: round2(sum(|m| m.expectancy)),
        avg_win: round2(sum(|m| m.avg_win)),
        avg_loss: round2(sum(|m| m.avg_loss)),
        payoff_ratio: round2(sum(|m| m.payoff_ratio)),
        recovery_factor: round2(sum(|m| m.recovery_factor)),
        max_consecutive_wins: per_period.iter().map(|m| m.max_consecutive_wins).max().unwrap_or(0),
        max_consecutive_losses: per_period.iter().map(|m| m.max_consecutive_losses).max().unwrap_or(0),
        risk_reward_ratio: round2(sum(|m| m.risk_reward_ratio)),
        time_in_market,
    }
}

fn horizon<K: Ord>(
    trades: &[Trade],
    initial_capital: f64,
    time_in_market: f64,
    key_fn: impl Fn(&Trade) -> K,
) -> MetricData {
    let groups = group_by(trades, key_fn);
    let per_period: Vec<MetricData> = groups
        .values()
        .map(|group| crate::data::compute_raw(group, initial_capital, time_in_market))
        .collect();
    average_horizon(&per_period, time_in_market)
}

fn annualised_sharpe(trades: &[Trade]) -> f64 {
    if trades.is_empty() {
        return 0.0;
    }
    let returns: Vec<f64> = trades.iter().map(|t| t.pnl_percent / 100.0).collect();
    let mean = returns.iter().sum::<f64>() / returns.len() as f64;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / returns.len() as f64;
    let stddev = variance.sqrt();

    let avg_return_ann = mean * TRADING_DAYS_PER_YEAR.sqrt();
    let stddev_ann = stddev * TRADING_DAYS_PER_YEAR.sqrt();
    if stddev_ann == 0.0 {
        return 0.0;
    }
    (avg_return_ann - RISK_FREE_RATE) / stddev_ann
}

/// Computes the full six-horizon metrics bundle for a completed backtest run.
///
/// `bars_in_position` / `total_market_bars` come from the simulator and feed
/// the shared `time_in_market` figure, identical across all six bundles.
pub fn compute(trades: &[Trade], initial_capital: f64, bars_in_position: u64, total_market_bars: u64) -> Result<Metrics> {
    if initial_capital <= 0.0 {
        return Err(MetricsError::NonPositiveCapital(initial_capital));
    }

    let time_in_market = if total_market_bars == 0 {
        0.0
    } else {
        round2(100.0 * bars_in_position as f64 / total_market_bars as f64)
    };

    let daily = horizon(trades, initial_capital, time_in_market, period::day_key);
    let weekly = horizon(trades, initial_capital, time_in_market, period::week_key);
    let monthly = horizon(trades, initial_capital, time_in_market, period::month_key);
    let quarterly = horizon(trades, initial_capital, time_in_market, period::quarter_key);
    let yearly = horizon(trades, initial_capital, time_in_market, period::year_key);

    let refs: Vec<&Trade> = trades.iter().collect();
    let mut overall = crate::data::compute_raw(&refs, initial_capital, time_in_market);
    overall.sharpe_ratio = round2(annualised_sharpe(trades));

    Ok(Metrics { daily, weekly, monthly, quarterly, yearly, overall })
}

#[cfg(test)]
mod tests {
    use super::*;
    use simulator::{ExitReason, IndicatorSnapshot, TradeCosts};

    fn trade_at(entry_time: i64, net_pnl: f64, pnl_percent: f64) -> Trade {
        Trade {
            id: 1,
            entry_time,
            exit_time: entry_time + 60,
            entry_price: 100.0,
            exit_price: 100.0 + net_pnl,
            quantity: 1.0,
            gross_pnl: net_pnl,
            net_pnl,
            pnl_percent,
            duration: 60,
            costs: TradeCosts { brokerage: 0.0, stt: 0.0, transaction_charges: 0.0, stamp_duty: 0.0, sebi_charges: 0.0, ipft_charges: 0.0, gst: 0.0, total_cost: 0.0 },
            exit_reason: ExitReason::Signal,
            indicators: IndicatorSnapshot::new(),
        }
    }

    #[test]
    fn no_trades_yields_all_zero_metrics() {
        let m = compute(&[], 100.0, 0, 0).unwrap();
        assert_eq!(m.overall.total_trades, 0);
        assert_eq!(m.overall.time_in_market, 0.0);
        assert_eq!(m.daily.total_trades, 0);
    }

    #[test]
    fn rejects_non_positive_capital() {
        assert!(compute(&[], 0.0, 0, 0).is_err());
    }

    #[test]
    fn daily_averages_across_days_while_overall_uses_all_trades() {
        let day = 4 * 3600;
        let trades = vec![
            trade_at(day, 1.0, 1.0),
            trade_at(day + 86_400, -1.0, -1.0),
            trade_at(day + 2 * 86_400, 2.0, 2.0),
        ];
        let m = compute(&trades, 100.0, 0, 1).unwrap();
        // three single-trade days -> daily.return is the mean of the three per-day returns
        assert!((m.daily.return_pct - 0.67).abs() < 0.05);
        assert_eq!(m.overall.return_pct, 2.0);
        assert_eq!(m.daily.max_consecutive_wins, 1);
        assert_eq!(m.overall.max_consecutive_wins, 1); // win, loss, win - no run of 2
    }

    #[test]
    fn time_in_market_is_identical_across_horizons() {
        let trades = vec![trade_at(4 * 3600, 1.0, 1.0)];
        let m = compute(&trades, 100.0, 50, 200).unwrap();
        assert_eq!(m.daily.time_in_market, 25.0);
        assert_eq!(m.overall.time_in_market, 25.0);
    }
}
