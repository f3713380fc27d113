//! Time management utilities

/// Format whole seconds as `mm:ss`
///
/// Minutes keep counting past 59 rather than rolling into hours.
pub fn format_clock(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Whole-second ticker driven by frame delta time
///
/// The render loop feeds frame deltas through [`SecondTicker::advance`], which reports
/// how many whole seconds have elapsed since the previous call. A disarmed ticker
/// swallows all time and drops any partially accumulated second, so disarming is a
/// synchronous cancellation: no tick can be produced afterwards until it is re-armed.
#[derive(Debug, Clone, Default)]
pub struct SecondTicker {
    armed: bool,
    accumulated: f64,
}

impl SecondTicker {
    /// Create a new disarmed ticker
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the ticker, starting a fresh second
    pub fn arm(&mut self) {
        self.armed = true;
        self.accumulated = 0.0;
    }

    /// Disarm the ticker, discarding any partial second
    pub fn disarm(&mut self) {
        self.armed = false;
        self.accumulated = 0.0;
    }

    /// Feed elapsed frame time in seconds, returning the number of whole-second ticks due
    ///
    /// Negative and non-finite deltas are ignored. Deltas worth more than `u32::MAX`
    /// seconds saturate.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn advance(&mut self, delta_seconds: f32) -> u32 {
        if !self.armed || !delta_seconds.is_finite() || delta_seconds <= 0.0 {
            return 0;
        }

        self.accumulated += f64::from(delta_seconds);
        let whole = self.accumulated.floor();
        self.accumulated -= whole;
        whole.min(f64::from(u32::MAX)) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(75), "01:15");
        assert_eq!(format_clock(3600), "60:00");
    }

    #[test]
    fn test_disarmed_ticker_never_ticks() {
        let mut ticker = SecondTicker::new();
        assert_eq!(ticker.advance(5.0), 0);
    }

    #[test]
    fn test_accumulates_partial_seconds() {
        let mut ticker = SecondTicker::new();
        ticker.arm();

        assert_eq!(ticker.advance(0.5), 0);
        assert_eq!(ticker.advance(0.5), 1);
        assert_eq!(ticker.advance(2.25), 2);
        assert_eq!(ticker.advance(0.75), 1);
    }

    #[test]
    fn test_disarm_drops_partial_second() {
        let mut ticker = SecondTicker::new();
        ticker.arm();
        ticker.advance(0.9);
        ticker.disarm();
        ticker.arm();

        assert_eq!(ticker.advance(0.2), 0);
    }

    #[test]
    fn test_huge_delta_returns_in_one_step() {
        let mut ticker = SecondTicker::new();
        ticker.arm();

        assert_eq!(ticker.advance(1.0e8), 100_000_000);
        assert_eq!(ticker.advance(0.5), 0);
        assert_eq!(ticker.advance(0.5), 1);
        assert_eq!(ticker.advance(f32::MAX), u32::MAX);
    }

    #[test]
    fn test_ignores_bad_deltas() {
        let mut ticker = SecondTicker::new();
        ticker.arm();

        assert_eq!(ticker.advance(-3.0), 0);
        assert_eq!(ticker.advance(f32::NAN), 0);
        assert_eq!(ticker.advance(f32::INFINITY), 0);
    }
}
