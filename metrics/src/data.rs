use serde::{Deserialize, Serialize};
use simulator::Trade;

const PROFIT_FACTOR_CAP: f64 = 99.99;

/// Per-period (or overall) performance snapshot. All fields rounded to two
/// decimals on emit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricData {
    pub return_pct: f64,
    pub sharpe_ratio: f64,
    pub max_drawdown: f64,
    pub win_rate: f64,
    pub loss_rate: f64,
    pub total_trades: u32,
    pub profit_factor: f64,
    pub expectancy: f64,
    pub avg_win: f64,
    pub avg_loss: f64,
    pub payoff_ratio: f64,
    pub recovery_factor: f64,
    pub max_consecutive_wins: u32,
    pub max_consecutive_losses: u32,
    pub risk_reward_ratio: f64,
    pub time_in_market: f64,
}

impl MetricData {
    pub fn zero() -> Self {
        Self {
            return_pct: 0.0,
            sharpe_ratio: 0.0,
            max_drawdown: 0.0,
            win_rate: 0.0,
            loss_rate: 0.0,
            total_trades: 0,
            profit_factor: 0.0,
            expectancy: 0.0,
            avg_win: 0.0,
            avg_loss: 0.0,
            payoff_ratio: 0.0,
            recovery_factor: 0.0,
            max_consecutive_wins: 0,
            max_consecutive_losses: 0,
            risk_reward_ratio: 0.0,
            time_in_market: 0.0,
        }
    }

    pub(crate) fn round(mut self) -> Self {
        self.return_pct = round2(self.return_pct);
        self.sharpe_ratio = round2(self.sharpe_ratio);
        self.max_drawdown = round2(self.max_drawdown);
        self.win_rate = round2(self.win_rate);
        self.loss_rate = round2(self.loss_rate);
        self.profit_factor = round2(self.profit_factor);
        self.expectancy = round2(self.expectancy);
        self.avg_win = round2(self.avg_win);
        self.avg_loss = round2(self.avg_loss);
        self.payoff_ratio = round2(self.payoff_ratio);
        self.recovery_factor = round2(self.recovery_factor);
        self.risk_reward_ratio = round2(self.risk_reward_ratio);
        self.time_in_market = round2(self.time_in_market);
        self
    }
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Longest run of consecutive winners/losers by sign of `net_pnl`, in entry order.
fn consecutive_streaks(trades: &[&Trade]) -> (u32, u32) {
    let mut max_wins = 0u32;
    let mut max_losses = 0u32;
    let mut cur_wins = 0u32;
    let mut cur_losses = 0u32;
    for t in trades {
        if t.net_pnl > 0.0 {
            cur_wins += 1;
            cur_losses = 0;
        } else {
            cur_losses += 1;
            cur_wins = 0;
        }
        max_wins = max_wins.max(cur_wins);
        max_losses = max_losses.max(cur_losses);
    }
    (max_wins, max_losses)
}

fn max_drawdown_pct(trades: &[&Trade], initial_capital: f64) -> f64 {
    let mut equity = initial_capital;
    let mut peak = initial_capital;
    let mut worst = 0.0_f64;
    for t in trades {
        equity += t.net_pnl;
        peak = peak.max(equity);
        if peak > 0.0 {
            let drawdown = 100.0 * (peak - equity) / peak;
            worst = worst.max(drawdown);
        }
    }
    -worst
}

fn population_stddev(values: &[f64], mean: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Computes raw (non-annualised) `MetricData` for one set of trades —
/// shared by per-period grouping and the `overall` bundle (which reuses this
/// and then overrides `sharpe_ratio` with the annualised figure).
pub(crate) fn compute_raw(trades: &[&Trade], initial_capital: f64, time_in_market: f64) -> MetricData {
    if trades.is_empty() {
        let mut m = MetricData::zero();
        m.time_in_market = time_in_market;
        return m.round();
    }

    let total_trades = trades.len();
    let winners: Vec<&&Trade> = trades.iter().filter(|t| t.net_pnl > 0.0).collect();
    let losers: Vec<&&Trade> = trades.iter().filter(|t| t.net_pnl <= 0.0).collect();

    let win_rate = 100.0 * winners.len() as f64 / total_trades as f64;
    let loss_rate = 100.0 - win_rate;

    let gross_profit: f64 = winners.iter().map(|t| t.net_pnl).sum();
    let gross_loss: f64 = losers.iter().map(|t| t.net_pnl).sum::<f64>().abs();

    let avg_win = if winners.is_empty() { 0.0 } else { gross_profit / winners.len() as f64 };
    let avg_loss = if losers.is_empty() { 0.0 } else { gross_loss / losers.len() as f64 };

    let profit_factor = if gross_loss > 0.0 {
        gross_profit / gross_loss
    } else if gross_profit > 0.0 {
        PROFIT_FACTOR_CAP
    } else {
        0.0
    };

    let payoff_ratio = if avg_loss != 0.0 { avg_win / avg_loss } else { 0.0 };
    let expectancy = (win_rate / 100.0) * avg_win - (loss_rate / 100.0) * avg_loss;

    let total_net_pnl: f64 = trades.iter().map(|t| t.net_pnl).sum();
    let return_pct = 100.0 * total_net_pnl / initial_capital;

    let max_drawdown = max_drawdown_pct(trades, initial_capital);
    let recovery_factor = if max_drawdown != 0.0 { (return_pct / max_drawdown).abs() } else { 0.0 };

    let returns: Vec<f64> = trades.iter().map(|t| t.pnl_percent / 100.0).collect();
    let mean_return = returns.iter().sum::<f64>() / returns.len() as f64;
    let stddev_return = population_stddev(&returns, mean_return);
    let sharpe_ratio = if stddev_return == 0.0 { 0.0 } else { mean_return / stddev_return };

    let (max_consecutive_wins, max_consecutive_losses) = consecutive_streaks(trades);

    MetricData {
        return_pct,
        sharpe_ratio,
        max_drawdown,
        win_rate,
        loss_rate,
        total_trades: total_trades as u32,
        profit_factor,
        expectancy,
        avg_win,
        avg_loss,
        payoff_ratio,
        recovery_factor,
        max_consecutive_wins,
        max_consecutive_losses,
        risk_reward_ratio: payoff_ratio,
        time_in_market,
    }
    .round()
}

#[cfg(test)]
mod tests {
    use super::*;
    use simulator::{ExitReason, IndicatorSnapshot, TradeCosts};

    fn trade(net_pnl: f64, pnl_percent: f64) -> Trade {
        Trade {
            id: 1,
            entry_time: 0,
            exit_time: 60,
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
    fn empty_trade_set_is_all_zero() {
        let m = compute_raw(&[], 100.0, 0.0);
        assert_eq!(m.total_trades, 0);
        assert_eq!(m.return_pct, 0.0);
        assert_eq!(m.win_rate, 0.0);
    }

    #[test]
    fn profit_factor_caps_when_no_losses() {
        let trades = vec![trade(5.0, 5.0), trade(3.0, 3.0)];
        let refs: Vec<&Trade> = trades.iter().collect();
        let m = compute_raw(&refs, 100.0, 0.0);
        assert_eq!(m.profit_factor, PROFIT_FACTOR_CAP);
    }

    #[test]
    fn recomposition_identity_holds() {
        let trades = vec![trade(5.0, 5.0), trade(-2.0, -2.0), trade(3.0, 3.0)];
        let refs: Vec<&Trade> = trades.iter().collect();
        let m = compute_raw(&refs, 100.0, 0.0);
        let winners = 2.0;
        let losers = 1.0;
        let recomposed = m.avg_win * winners - m.avg_loss * losers;
        let total_net: f64 = trades.iter().map(|t| t.net_pnl).sum();
        assert!((recomposed - total_net).abs() < 1e-6);
    }

    #[test]
    fn consecutive_streaks_track_longest_run() {
        let trades = vec![trade(1.0, 1.0), trade(1.0, 1.0), trade(-1.0, -1.0), trade(1.0, 1.0)];
        let refs: Vec<&Trade> = trades.iter().collect();
        let m = compute_raw(&refs, 100.0, 0.0);
        assert_eq!(m.max_consecutive_wins, 2);
        assert_eq!(m.max_consecutive_losses, 1);
    }
}
