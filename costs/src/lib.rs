//! Statutory cost calculator for a closed NSE/BSE equity intraday round-trip.
//!
//! Stateless and pure: given the buy/sell prices, quantity and exchange, it
//! returns the full breakdown of brokerage and statutory charges. No crate in
//! the workspace depends on this one's output being cached or mutated.

/// Exchange a trade was routed through; transaction-charge rates differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Exchange {
    Nse,
    Bse,
}

impl Exchange {
    fn transaction_rate(self) -> f64 {
        match self {
            Exchange::Nse => 2.97e-5,
            Exchange::Bse => 3.75e-5,
        }
    }
}

/// Full statutory cost breakdown for one closed round-trip. All fields are
/// non-negative and rounded to four decimal places.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostBreakdown {
    pub brokerage: f64,
    pub stt: f64,
    pub transaction_charges: f64,
    pub stamp_duty: f64,
    pub sebi_charges: f64,
    pub ipft_charges: f64,
    pub gst: f64,
    pub total_cost: f64,
}

const BROKERAGE_CAP: f64 = 20.0;
const BROKERAGE_RATE: f64 = 0.0003;
const STT_RATE: f64 = 2.5e-4;
const SEBI_RATE: f64 = 1e-6;
const STAMP_DUTY_RATE: f64 = 3e-5;
const IPFT_RATE: f64 = 1e-6;
const GST_RATE: f64 = 0.18;

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// Computes the statutory cost breakdown for a round-trip of `quantity`
/// shares bought at `buy_price` and sold at `sell_price` on `exchange`.
pub fn calculate(buy_price: f64, sell_price: f64, quantity: f64, exchange: Exchange) -> CostBreakdown {
    let buy_turnover = buy_price * quantity;
    let sell_turnover = sell_price * quantity;
    let total_turnover = buy_turnover + sell_turnover;

    let brokerage = (BROKERAGE_CAP.min(BROKERAGE_RATE * buy_turnover))
        + (BROKERAGE_CAP.min(BROKERAGE_RATE * sell_turnover));
    let transaction_charges = exchange.transaction_rate() * total_turnover;
    let stt = STT_RATE * sell_turnover;
    let sebi_charges = SEBI_RATE * total_turnover;
    let stamp_duty = STAMP_DUTY_RATE * buy_turnover;
    let ipft_charges = IPFT_RATE * total_turnover;
    let gst = GST_RATE * (brokerage + transaction_charges + sebi_charges + ipft_charges);

    let total_cost = brokerage + stt + transaction_charges + stamp_duty + sebi_charges + ipft_charges + gst;

    CostBreakdown {
        brokerage: round4(brokerage),
        stt: round4(stt),
        transaction_charges: round4(transaction_charges),
        stamp_duty: round4(stamp_duty),
        sebi_charges: round4(sebi_charges),
        ipft_charges: round4(ipft_charges),
        gst: round4(gst),
        total_cost: round4(total_cost),
    }
}
