// Simulation session clock
use chrono::{DateTime, NaiveDateTime};

/// Clock parameters received at setup plus the current simulation time.
///
/// All times are milliseconds since the Unix epoch. The visible chart window
/// is always derived from `current` and never stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionClock {
    pub start: i64,
    pub interval_ms: i64,
    pub backlog: usize,
    current: i64,
}

impl SessionClock {
    pub fn new(start: i64, interval_ms: i64, backlog: usize) -> Self {
        Self {
            start,
            interval_ms,
            backlog,
            current: start,
        }
    }

    pub fn current(&self) -> i64 {
        self.current
    }

    /// Move to `start + sim_seconds`; never moves backwards
    pub fn advance(&mut self, sim_seconds: f64) -> i64 {
        let next = self.start.saturating_add((sim_seconds * 1000.0).round() as i64);
        if next > self.current {
            self.current = next;
        }
        self.current
    }

    pub fn window(&self) -> (i64, i64) {
        (
            self.current
                .saturating_sub((self.backlog as i64).saturating_mul(self.interval_ms)),
            self.current,
        )
    }

    /// Time of the sample at `index` of a sequence whose newest-in-window
    /// sample sits at `backlog`
    pub fn sample_time(&self, index: usize) -> i64 {
        let behind = (self.backlog as i64).saturating_sub(index as i64);
        self.current
            .saturating_sub(behind.saturating_mul(self.interval_ms))
    }
}

/// Parse the backend's start date (RFC 3339 or `YYYY-MM-DD HH:MM:SS`, taken as UTC)
pub fn parse_start_date(text: &str) -> Option<i64> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.timestamp_millis());
    }
    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .map(|naive| naive.and_utc().timestamp_millis())
}

/// Human readable simulation time, e.g. `1 days, 2 Hrs, 5 Minutes`
pub fn format_sim_time(seconds: f64) -> String {
    let mut seconds = seconds.max(0.0).floor() as i64;
    let days = seconds / (3600 * 24);
    seconds -= days * 3600 * 24;
    let hours = seconds / 3600;
    seconds -= hours * 3600;
    let minutes = seconds / 60;
    format!("{} days, {} Hrs, {} Minutes", days, hours, minutes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_tracks_current_time() {
        let mut clock = SessionClock::new(1_000_000, 60_000, 50);
        clock.advance(120.0);
        assert_eq!(clock.current(), 1_120_000);
        assert_eq!(clock.window(), (1_120_000 - 50 * 60_000, 1_120_000));
        assert_eq!(clock.sample_time(50), 1_120_000);
        assert_eq!(clock.sample_time(49), 1_060_000);
    }

    #[test]
    fn test_clock_is_monotonic() {
        let mut clock = SessionClock::new(0, 1000, 10);
        clock.advance(10.0);
        clock.advance(5.0);
        assert_eq!(clock.current(), 10_000);
    }

    #[test]
    fn test_absurd_times_saturate() {
        let mut clock = SessionClock::new(1_000_000, i64::MAX, 100_000);
        assert_eq!(clock.advance(1e300), i64::MAX);
        assert_eq!(clock.window(), (0, i64::MAX));
        assert_eq!(clock.sample_time(0), 0);
        assert_eq!(clock.advance(f64::INFINITY), i64::MAX);
    }

    #[test]
    fn test_parse_start_date() {
        assert_eq!(parse_start_date("1970-01-01 00:01:00"), Some(60_000));
        assert_eq!(parse_start_date("1970-01-01T00:00:01Z"), Some(1000));
        assert_eq!(parse_start_date("yesterday"), None);
    }

    #[test]
    fn test_format_sim_time() {
        assert_eq!(format_sim_time(0.0), "0 days, 0 Hrs, 0 Minutes");
        assert_eq!(format_sim_time(93_900.0), "1 days, 2 Hrs, 5 Minutes");
    }
}
