//! Common entry filters shared across strategies. Every filter is a small
//! pure function (or, where running state is unavoidable, a tiny struct)
//! rather than a trait hierarchy — entries are suppressed, exits never are.

use crate::time::{in_window, ist_date_key};

/// `[start, end)` IST trading window. Exits are never subject to this check.
pub fn within_trading_window(timestamp: i64, start_minute: u32, end_minute: u32) -> bool {
    in_window(timestamp, start_minute, end_minute)
}

/// Entries suppressed inside `[skip_start, skip_end)` IST.
pub fn outside_skip_window(timestamp: i64, skip_start: u32, skip_end: u32) -> bool {
    !in_window(timestamp, skip_start, skip_end)
}

/// `|fast - slow| / slow >= min_gap`.
pub fn ema_gap_satisfied(fast: f64, slow: f64, min_gap: f64) -> bool {
    if slow == 0.0 {
        return false;
    }
    ((fast - slow) / slow).abs() >= min_gap
}

/// Entry suppressed unless `adx >= threshold`; undefined (warm-up) ADX never
/// passes the gate.
pub fn adx_gate_satisfied(adx: Option<f64>, threshold: f64) -> bool {
    adx.map_or(false, |value| value >= threshold)
}

/// At most `max_per_day` entries per IST calendar day; exits never count.
#[derive(Debug, Clone)]
pub struct DailyTradeCap {
    max_per_day: usize,
    current_day: Option<(i32, u32, u32)>,
    count_today: usize,
}

impl DailyTradeCap {
    pub fn new(max_per_day: usize) -> Self {
        Self {
            max_per_day,
            current_day: None,
            count_today: 0,
        }
    }

    fn roll_day(&mut self, timestamp: i64) {
        let day = ist_date_key(timestamp);
        if self.current_day != Some(day) {
            self.current_day = Some(day);
            self.count_today = 0;
        }
    }

    /// Checks the cap without consuming an entry slot.
    pub fn can_enter(&mut self, timestamp: i64) -> bool {
        self.roll_day(timestamp);
        self.count_today < self.max_per_day
    }

    /// Records that an entry was actually taken at `timestamp`.
    pub fn record_entry(&mut self, timestamp: i64) {
        self.roll_day(timestamp);
        self.count_today += 1;
    }
}

/// Blocks re-entry in one direction until a pullback condition fires —
/// "price violates at least one level in the opposite direction" per the
/// breakout strategies, or an analogous condition for other strategies.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReentryGuard {
    blocked: bool,
}

impl ReentryGuard {
    pub fn new() -> Self {
        Self { blocked: false }
    }

    pub fn block(&mut self) {
        self.blocked = true;
    }

    /// Call once per bar after an entry; clears the block once `pullback_condition` is true.
    pub fn unblock_if(&mut self, pullback_condition: bool) {
        if self.blocked && pullback_condition {
            self.blocked = false;
        }
    }

    pub fn can_enter(&self) -> bool {
        !self.blocked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ema_gap_rejects_small_divergence() {
        assert!(!ema_gap_satisfied(100.1, 100.0, 0.01));
        assert!(ema_gap_satisfied(102.0, 100.0, 0.01));
    }

    #[test]
    fn adx_gate_rejects_warm_up_none() {
        assert!(!adx_gate_satisfied(None, 20.0));
        assert!(adx_gate_satisfied(Some(25.0), 20.0));
        assert!(!adx_gate_satisfied(Some(15.0), 20.0));
    }

    #[test]
    fn daily_cap_resets_across_days() {
        let mut cap = DailyTradeCap::new(2);
        let day1_9am = 4 * 3600; // 09:30 IST
        assert!(cap.can_enter(day1_9am));
        cap.record_entry(day1_9am);
        assert!(cap.can_enter(day1_9am));
        cap.record_entry(day1_9am);
        assert!(!cap.can_enter(day1_9am));

        let day2 = day1_9am + 86_400;
        assert!(cap.can_enter(day2));
    }

    #[test]
    fn reentry_guard_blocks_until_pullback() {
        let mut guard = ReentryGuard::new();
        guard.block();
        assert!(!guard.can_enter());
        guard.unblock_if(false);
        assert!(!guard.can_enter());
        guard.unblock_if(true);
        assert!(guard.can_enter());
    }
}
