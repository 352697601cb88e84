use costs::calculate as calculate_costs;
use htf::{is_forced_close, Bar};

use crate::config::SimulatorConfig;
use crate::types::{ExitReason, Position, Side, Signal, Trade, TradeCosts};

/// One `(time, equity)` sample taken at every closed-trade boundary.
pub type EquitySample = (i64, f64);

/// Output of a full simulator run.
#[derive(Debug, Clone)]
pub struct SimResult {
    pub trades: Vec<Trade>,
    pub equity: Vec<EquitySample>,
    pub bars_in_position: u64,
    pub total_market_bars: u64,
}

/// Maintains at most one open long position, replaying bars and signals in
/// lockstep and applying the fixed exit precedence from spec.md §4.4:
/// forced close, then stop-loss, then take-profit, then SELL signal, then
/// the trailing-stop ratchet.
pub struct TradeSimulator<'a> {
    config: &'a SimulatorConfig,
}

impl<'a> TradeSimulator<'a> {
    pub fn new(config: &'a SimulatorConfig) -> Self {
        Self { config }
    }

    /// Runs the simulator over `bars`, consuming `signals` that share the
    /// bars' timestamps. `bars` and `signals` must both be chronologically
    /// ordered; signals not aligned to a bar timestamp are ignored.
    pub fn run(&self, bars: &[Bar], signals: &[Signal]) -> SimResult {
        let mut by_time: std::collections::HashMap<i64, Vec<&Signal>> = std::collections::HashMap::new();
        for s in signals {
            by_time.entry(s.time).or_default().push(s);
        }

        let mut position: Option<Position> = None;
        let mut trades = Vec::new();
        let mut equity = Vec::new();
        let mut capital = self.config.initial_capital;
        let mut next_id = 1u64;
        let mut bars_in_position: u64 = 0;
        let mut total_market_bars: u64 = 0;

        for bar in bars.iter() {
            let in_window = htf::in_window(bar.timestamp, self.config.window_start_minute, self.config.window_end_minute);
            if in_window {
                total_market_bars += 1;
            }

            let bar_signals = by_time.get(&bar.timestamp).map(|v| v.as_slice()).unwrap_or(&[]);

            if let Some(mut pos) = position.take() {
                bars_in_position += 1;

                let exit = self.check_exit(bar, &pos, bar_signals);
                if let Some((exit_price, reason)) = exit {
                    let trade = self.close_trade(next_id, &pos, bar.timestamp, exit_price, reason);
                    next_id += 1;
                    capital += trade.net_pnl;
                    equity.push((bar.timestamp, capital));
                    trades.push(trade);
                } else {
                    if self.config.trailing_stop_enabled && bar.high > pos.highest_price_seen {
                        pos.highest_price_seen = bar.high;
                        let trailed = pos.highest_price_seen * (1.0 - self.config.trailing_pct);
                        if trailed > pos.stop_loss {
                            pos.stop_loss = trailed;
                            pos.trailing_active = true;
                        }
                    }
                    position = Some(pos);
                }
            }

            if position.is_none() {
                if let Some(buy) = bar_signals.iter().find(|s| s.side == Side::Buy) {
                    if in_window {
                        position = Some(self.open_position(buy));
                    }
                }
            }
        }

        if let Some(pos) = position.take() {
            let last = bars.last().expect("position open implies at least one bar");
            let reason = if is_forced_close(last.timestamp) {
                ExitReason::MarketClose
            } else {
                ExitReason::EndOfData
            };
            let trade = self.close_trade(next_id, &pos, last.timestamp, last.close * (1.0 - self.config.slippage), reason);
            capital += trade.net_pnl;
            equity.push((last.timestamp, capital));
            trades.push(trade);
        }

        SimResult {
            trades,
            equity,
            bars_in_position,
            total_market_bars,
        }
    }

    fn open_position(&self, signal: &Signal) -> Position {
        let entry_price = signal.price * (1.0 + self.config.slippage);
        let stop_loss = signal.stop_loss.unwrap_or(entry_price * (1.0 - self.config.default_sl_pct));
        let take_profit = signal.take_profit.unwrap_or(entry_price * (1.0 + self.config.default_tp_pct));
        Position {
            entry_time: signal.time,
            entry_price,
            stop_loss,
            take_profit,
            highest_price_seen: entry_price,
            trailing_active: false,
            indicators: signal.indicators.clone(),
        }
    }

    /// Tests exits in the fixed precedence order; first match wins.
    fn check_exit(&self, bar: &Bar, pos: &Position, bar_signals: &[&Signal]) -> Option<(f64, ExitReason)> {
        if is_forced_close(bar.timestamp) {
            return Some((bar.close * (1.0 - self.config.slippage), ExitReason::MarketClose));
        }
        if bar.low <= pos.stop_loss {
            let reason = if pos.trailing_active { ExitReason::TrailingStop } else { ExitReason::StopLoss };
            return Some((pos.stop_loss * (1.0 - self.config.slippage), reason));
        }
        if bar.high >= pos.take_profit {
            return Some((pos.take_profit * (1.0 - self.config.slippage), ExitReason::TakeProfit));
        }
        if let Some(sell) = bar_signals.iter().find(|s| s.side == Side::Sell) {
            return Some((sell.price * (1.0 - self.config.slippage), ExitReason::Signal));
        }
        None
    }

    fn close_trade(&self, id: u64, pos: &Position, exit_time: i64, exit_price: f64, reason: ExitReason) -> Trade {
        let quantity = self.config.quantity;
        let gross_pnl = (exit_price - pos.entry_price) * quantity;
        let breakdown = calculate_costs(pos.entry_price, exit_price, quantity, self.config.exchange);
        let net_pnl = gross_pnl - breakdown.total_cost;
        let pnl_percent = if pos.entry_price != 0.0 {
            100.0 * (exit_price - pos.entry_price) / pos.entry_price
        } else {
            0.0
        };

        Trade {
            id,
            entry_time: pos.entry_time,
            exit_time,
            entry_price: pos.entry_price,
            exit_price,
            quantity,
            gross_pnl,
            net_pnl,
            pnl_percent,
            duration: exit_time - pos.entry_time,
            costs: TradeCosts::from(breakdown),
            exit_reason: reason,
            indicators: pos.indicators.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(ts: i64, open: f64, high: f64, low: f64, close: f64) -> Bar {
        Bar { timestamp: ts, open, high, low, close, volume: 100.0 }
    }

    fn config() -> SimulatorConfig {
        SimulatorConfig {
            initial_capital: 100.0,
            quantity: 1.0,
            slippage: 1e-4,
            ..SimulatorConfig::default()
        }
    }

    const MARKET_OPEN_TS: i64 = 4 * 3600; // 09:30 IST

    #[test]
    fn duplicate_buy_while_long_is_silently_ignored() {
        let cfg = config();
        let sim = TradeSimulator::new(&cfg);
        let t0 = MARKET_OPEN_TS;
        let t1 = t0 + 60;
        let bars = vec![bar(t0, 100.0, 100.2, 99.8, 100.0), bar(t1, 100.0, 100.2, 99.8, 100.5)];
        let signals = vec![Signal::buy(t0, 100.0), Signal::buy(t1, 100.5)];
        let result = sim.run(&bars, &signals);
        // still exactly one open position carried to EndOfData, not two entries
        assert_eq!(result.trades.len(), 1);
    }

    #[test]
    fn sell_while_flat_is_silently_ignored() {
        let cfg = config();
        let sim = TradeSimulator::new(&cfg);
        let bars = vec![bar(MARKET_OPEN_TS, 100.0, 100.2, 99.8, 100.0)];
        let signals = vec![Signal::sell(MARKET_OPEN_TS, 100.0)];
        let result = sim.run(&bars, &signals);
        assert!(result.trades.is_empty());
    }

    #[test]
    fn stop_loss_takes_precedence_over_take_profit_when_both_breach() {
        let cfg = config();
        let sim = TradeSimulator::new(&cfg);
        let t0 = MARKET_OPEN_TS;
        let t1 = t0 + 60;
        let entry = Signal::buy(t0, 100.0).with_stop_loss(99.0).with_take_profit(101.0);
        let bars = vec![
            bar(t0, 100.0, 100.2, 99.8, 100.0),
            bar(t1, 100.0, 101.5, 98.5, 99.0),
        ];
        let result = sim.run(&bars, &[entry]);
        assert_eq!(result.trades.len(), 1);
        assert_eq!(result.trades[0].exit_reason, ExitReason::StopLoss);
    }

    #[test]
    fn market_bar_counting_only_counts_in_window_bars() {
        let cfg = config();
        let sim = TradeSimulator::new(&cfg);
        // 14:30 IST is outside [09:30, 14:30)
        let out_of_window_ts = 9 * 3600;
        let bars = vec![bar(out_of_window_ts, 100.0, 100.1, 99.9, 100.0)];
        let result = sim.run(&bars, &[]);
        assert_eq!(result.total_market_bars, 0);
    }
}
