use std::time::{Duration, Instant};

use chrono::{DateTime, Local};
use rand::Rng;

/// A repeating deadline polled from the frame loop. Dropping it cancels it.
#[derive(Debug, Clone)]
pub struct Interval {
    period: Duration,
    next_due: Instant,
}

impl Interval {
    /// First tick is due one `period` after `now`.
    pub fn new(period: Duration, now: Instant) -> Self {
        Self {
            period,
            next_due: now + period,
        }
    }

    /// Returns `true` once per elapsed period. Missed ticks collapse into one.
    pub fn poll(&mut self, now: Instant) -> bool {
        if now < self.next_due {
            return false;
        }
        while self.next_due <= now {
            self.next_due += self.period;
        }
        true
    }

    pub fn remaining(&self, now: Instant) -> Duration {
        self.next_due.saturating_duration_since(now)
    }
}

const CLOCK_PERIOD: Duration = Duration::from_secs(1);
const REFRESH_PERIOD: Duration = Duration::from_secs(2);
const NUDGE_PERIOD: Duration = Duration::from_secs(30);
const NUDGE_LENGTH: Duration = Duration::from_millis(500);

/// A headline insight briefly dimmed to signal a data refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Nudge {
    pub insight: usize,
    pub until: Instant,
}

/// The dashboard's cosmetic timers: wall clock, "last refresh" counter and
/// the periodic data nudge.
#[derive(Debug)]
pub struct DashboardTimers {
    clock: Interval,
    refresh: Interval,
    nudge: Interval,
    pub timestamp: String,
    pub last_refresh_secs: u32,
    pub active_nudge: Option<Nudge>,
    insight_count: usize,
}

pub fn format_timestamp(now: DateTime<Local>) -> String {
    now.format("%A, %B %-d, %Y at %-I:%M %p").to_string()
}

impl DashboardTimers {
    pub fn new(now: Instant, insight_count: usize) -> Self {
        Self {
            clock: Interval::new(CLOCK_PERIOD, now),
            refresh: Interval::new(REFRESH_PERIOD, now),
            nudge: Interval::new(NUDGE_PERIOD, now),
            timestamp: format_timestamp(Local::now()),
            last_refresh_secs: 1,
            active_nudge: None,
            insight_count,
        }
    }

    /// Advance all timers. Returns `true` if anything visible changed.
    pub fn tick(&mut self, now: Instant, rng: &mut impl Rng) -> bool {
        let mut changed = false;

        if self.clock.poll(now) {
            self.timestamp = format_timestamp(Local::now());
            changed = true;
        }

        if self.refresh.poll(now) {
            self.last_refresh_secs = rng.gen_range(1..=10);
            changed = true;
        }

        if self.nudge.poll(now) && self.insight_count > 0 {
            self.active_nudge = Some(Nudge {
                insight: rng.gen_range(0..self.insight_count),
                until: now + NUDGE_LENGTH,
            });
            changed = true;
        }

        if matches!(self.active_nudge, Some(n) if now >= n.until) {
            self.active_nudge = None;
            changed = true;
        }

        changed
    }

    pub fn is_nudged(&self, insight: usize) -> bool {
        self.active_nudge.is_some_and(|n| n.insight == insight)
    }

    /// Time until the next timer needs attention.
    pub fn next_wakeup(&self, now: Instant) -> Duration {
        let mut next = self.clock.remaining(now).min(self.refresh.remaining(now));
        next = next.min(self.nudge.remaining(now));
        if let Some(n) = self.active_nudge {
            next = next.min(n.until.saturating_duration_since(now));
        }
        next
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn interval_fires_once_per_period() {
        let t0 = Instant::now();
        let mut interval = Interval::new(Duration::from_secs(1), t0);
        assert!(!interval.poll(t0 + Duration::from_millis(999)));
        assert!(interval.poll(t0 + Duration::from_secs(1)));
        assert!(!interval.poll(t0 + Duration::from_millis(1500)));
        // Three missed periods collapse into one tick.
        assert!(interval.poll(t0 + Duration::from_millis(4200)));
        assert!(!interval.poll(t0 + Duration::from_millis(4900)));
        assert_eq!(
            interval.remaining(t0 + Duration::from_millis(4900)),
            Duration::from_millis(100)
        );
    }

    #[test]
    fn refresh_counter_stays_in_range() {
        let t0 = Instant::now();
        let mut rng = StdRng::seed_from_u64(7);
        let mut timers = DashboardTimers::new(t0, 3);
        for s in 1..=20 {
            timers.tick(t0 + Duration::from_secs(2 * s), &mut rng);
            assert!((1..=10).contains(&timers.last_refresh_secs));
        }
    }

    #[test]
    fn nudge_dims_one_insight_briefly() {
        let t0 = Instant::now();
        let mut rng = StdRng::seed_from_u64(1);
        let mut timers = DashboardTimers::new(t0, 3);

        assert!(timers.tick(t0 + NUDGE_PERIOD, &mut rng));
        let nudge = timers.active_nudge.expect("nudge after 30s");
        assert!(nudge.insight < 3);
        assert!(timers.is_nudged(nudge.insight));

        timers.tick(t0 + NUDGE_PERIOD + NUDGE_LENGTH, &mut rng);
        assert_eq!(timers.active_nudge, None);
    }

    #[test]
    fn timestamp_uses_long_form() {
        use chrono::TimeZone;
        let at = Local.with_ymd_and_hms(2026, 10, 19, 14, 5, 0).unwrap();
        assert_eq!(format_timestamp(at), "Monday, October 19, 2026 at 2:05 PM");
    }
}
