// Chart scales and axis ticks
use chrono::{DateTime, Datelike, Timelike, Utc, Weekday};

/// Linear map from a numeric domain to a pixel range
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    pub domain: (f64, f64),
    pub range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn apply(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let span = d1 - d0;
        let t = if span == 0.0 { 0.0 } else { (value - d0) / span };
        r0 + t * (r1 - r0)
    }

    /// Round-number ticks covering the domain, about `count` of them
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (lo, hi) = if self.domain.0 <= self.domain.1 {
            self.domain
        } else {
            (self.domain.1, self.domain.0)
        };
        let span = hi - lo;
        if !span.is_finite() || span <= 0.0 || count == 0 {
            return if lo.is_finite() { vec![lo] } else { Vec::new() };
        }

        let mut step = 10f64.powf((span / count as f64).log10().floor());
        let err = count as f64 / span * step;
        if err <= 0.15 {
            step *= 10.0;
        } else if err <= 0.35 {
            step *= 5.0;
        } else if err <= 0.75 {
            step *= 2.0;
        }

        let first = (lo / step).ceil() as i64;
        let last = (hi / step).floor() as i64;
        (first..=last).map(|i| i as f64 * step).collect()
    }
}

const SECOND: i64 = 1000;
const MINUTE: i64 = 60 * SECOND;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;

const TIME_STEPS: [i64; 16] = [
    SECOND,
    5 * SECOND,
    15 * SECOND,
    30 * SECOND,
    MINUTE,
    5 * MINUTE,
    15 * MINUTE,
    30 * MINUTE,
    HOUR,
    3 * HOUR,
    6 * HOUR,
    12 * HOUR,
    DAY,
    2 * DAY,
    7 * DAY,
    30 * DAY,
];

/// Time ticks (epoch milliseconds) aligned to calendar-friendly steps
pub fn time_ticks(window: (i64, i64), max_ticks: usize) -> Vec<i64> {
    let (lo, hi) = window;
    let span = hi - lo;
    if span <= 0 || max_ticks == 0 {
        return vec![hi];
    }
    let step = TIME_STEPS
        .iter()
        .copied()
        .find(|step| span / step <= max_ticks as i64)
        .unwrap_or_else(|| span / max_ticks as i64);

    let first = lo.div_euclid(step) + i64::from(lo.rem_euclid(step) != 0);
    let last = hi.div_euclid(step);
    (first..=last).map(|i| i * step).collect()
}

/// Tick label at the coarsest resolution that still distinguishes the instant
pub fn format_time_tick(millis: i64) -> String {
    let Some(t) = DateTime::<Utc>::from_timestamp_millis(millis) else {
        return String::new();
    };
    let fmt = if t.timestamp_subsec_millis() != 0 {
        ".%3f"
    } else if t.second() != 0 {
        ":%S"
    } else if t.minute() != 0 || t.hour() != 0 {
        "%H:%M"
    } else if t.weekday() != Weekday::Sun && t.day() != 1 {
        "%a %d"
    } else if t.day() != 1 {
        "%b %d"
    } else if t.month() != 1 {
        "%B"
    } else {
        "%Y"
    };
    t.format(fmt).to_string()
}
