use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub use htf::Bar;
use costs::CostBreakdown;

/// Direction of a generated signal. The simulator only opens long positions;
/// `Sell` always means "close the long", never "open a short".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Buy,
    Sell,
}

/// A single primitive value attached to a signal or trade for diagnostics and
/// export. The typed equivalent of a stringly-keyed `number|bool|string` map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SnapshotValue {
    Number(f64),
    Flag(bool),
    Text(String),
}

/// A strategy's diagnostic indicator readings at the moment a signal fired,
/// keyed by the names the strategy declares via `indicator_names()`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot(BTreeMap<String, SnapshotValue>);

impl IndicatorSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: SnapshotValue) -> &mut Self {
        self.0.insert(key.into(), value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&SnapshotValue> {
        self.0.get(key)
    }

    /// Adapter for export formatting — the only place this type's internal
    /// representation is exposed as a plain map.
    pub fn to_map(&self) -> BTreeMap<String, SnapshotValue> {
        self.0.clone()
    }
}

/// One entry/exit decision emitted by a strategy, with attached diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub time: i64,
    pub side: Side,
    pub price: f64,
    pub stop_loss: Option<f64>,
    pub take_profit: Option<f64>,
    pub indicators: IndicatorSnapshot,
}

impl Signal {
    pub fn buy(time: i64, price: f64) -> Self {
        Self {
            time,
            side: Side::Buy,
            price,
            stop_loss: None,
            take_profit: None,
            indicators: IndicatorSnapshot::new(),
        }
    }

    pub fn sell(time: i64, price: f64) -> Self {
        Self {
            time,
            side: Side::Sell,
            price,
            stop_loss: None,
            take_profit: None,
            indicators: IndicatorSnapshot::new(),
        }
    }

    pub fn with_stop_loss(mut self, stop_loss: f64) -> Self {
        self.stop_loss = Some(stop_loss);
        self
    }

    pub fn with_take_profit(mut self, take_profit: f64) -> Self {
        self.take_profit = Some(take_profit);
        self
    }

    pub fn with_indicators(mut self, indicators: IndicatorSnapshot) -> Self {
        self.indicators = indicators;
        self
    }
}

/// Why a position was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExitReason {
    Signal,
    StopLoss,
    TakeProfit,
    TrailingStop,
    MarketClose,
    EndOfData,
}

/// The simulator's transient open-position state. Never exposed once closed;
/// closing a position consumes it into a [`Trade`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub entry_time: i64,
    pub entry_price: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
    pub highest_price_seen: f64,
    pub trailing_active: bool,
    pub indicators: IndicatorSnapshot,
}

/// An immutable closed round-trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub id: u64,
    pub entry_time: i64,
    pub exit_time: i64,
    pub entry_price: f64,
    pub exit_price: f64,
    pub quantity: f64,
    pub gross_pnl: f64,
    pub net_pnl: f64,
    pub pnl_percent: f64,
    pub duration: i64,
    pub costs: TradeCosts,
    pub exit_reason: ExitReason,
    pub indicators: IndicatorSnapshot,
}

/// `costs::CostBreakdown` doesn't derive `Serialize` (it lives in a
/// dependency-free crate); this mirrors its fields onto the trade record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TradeCosts {
    pub brokerage: f64,
    pub stt: f64,
    pub transaction_charges: f64,
    pub stamp_duty: f64,
    pub sebi_charges: f64,
    pub ipft_charges: f64,
    pub gst: f64,
    pub total_cost: f64,
}

impl From<CostBreakdown> for TradeCosts {
    fn from(c: CostBreakdown) -> Self {
        Self {
            brokerage: c.brokerage,
            stt: c.stt,
            transaction_charges: c.transaction_charges,
            stamp_duty: c.stamp_duty,
            sebi_charges: c.sebi_charges,
            ipft_charges: c.ipft_charges,
            gst: c.gst,
            total_cost: c.total_cost,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_round_trips_through_to_map() {
        let mut snap = IndicatorSnapshot::new();
        snap.insert("ema_fast", SnapshotValue::Number(101.5))
            .insert("bullish_zone", SnapshotValue::Flag(true))
            .insert("pattern", SnapshotValue::Text("hammer".into()));
        let map = snap.to_map();
        assert_eq!(map.get("ema_fast"), Some(&SnapshotValue::Number(101.5)));
        assert_eq!(map.get("bullish_zone"), Some(&SnapshotValue::Flag(true)));
    }

    #[test]
    fn signal_builder_sets_optional_fields() {
        let sig = Signal::buy(100, 50.0).with_stop_loss(49.0).with_take_profit(52.0);
        assert_eq!(sig.side, Side::Buy);
        assert_eq!(sig.stop_loss, Some(49.0));
        assert_eq!(sig.take_profit, Some(52.0));
    }

    #[test]
    fn trade_costs_convert_from_cost_breakdown() {
        let breakdown = costs::calculate(100.0, 102.0, 10.0, costs::Exchange::Nse);
        let costs: TradeCosts = breakdown.into();
        assert_eq!(costs.total_cost, breakdown.total_cost);
    }
}
