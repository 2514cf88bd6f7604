// Aggregated counter summary for the pinned category
use crate::domain::counters::{format_percent, Counters};
use crate::domain::message::Reading;
use std::time::{Duration, Instant};

/// Gauges above this percentage are flagged
const GAUGE_ALERT_PERCENT: f64 = 50.0;

#[derive(Debug, Clone, PartialEq)]
pub struct HouseRow {
    pub label: String,
    pub detected: String,
    pub dropped: i64,
    pub undetected: String,
    pub exchanges: i64,
    pub qubits: i64,
}

impl HouseRow {
    fn new(index: usize, c: &Counters) -> Self {
        Self {
            label: format!("House {}", index),
            detected: format!("{}/{}", c.n2, c.attacks()),
            dropped: c.n5,
            undetected: format!("{}/{}", c.n3, c.attacks()),
            exchanges: c.n1,
            qubits: c.n4,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Gauge {
    pub name: &'static str,
    /// Rounded percentage, `None` when undefined
    pub percent: Option<f64>,
    pub alert: bool,
}

impl Gauge {
    fn new(name: &'static str, ratio: Option<f64>) -> Self {
        let percent = ratio.map(|r| (r * 100.0).round());
        Self {
            name,
            percent,
            alert: percent.is_some_and(|p| p > GAUGE_ALERT_PERCENT),
        }
    }

    pub fn display(&self) -> String {
        format_percent(self.percent.map(|p| p / 100.0))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CounterSummary {
    pub totals: Counters,
    pub since_last_emission: Counters,
    pub houses: Vec<HouseRow>,
    pub gauges: Vec<Gauge>,
}

/// Tracks counter totals every tick and emits a summary at most once per
/// `min_interval` of wall-clock time.
///
/// Emission is trailing: the first new reading opens a window of
/// `min_interval`, and everything recorded inside it is emitted together
/// once the window closes.
#[derive(Debug)]
pub struct CounterPanel {
    min_interval: Duration,
    totals: Counters,
    previous: Counters,
    emitted: Counters,
    houses: Vec<Counters>,
    dirty_since: Option<Instant>,
    dirty: bool,
}

impl CounterPanel {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            totals: Counters::default(),
            previous: Counters::default(),
            emitted: Counters::default(),
            houses: Vec::new(),
            dirty_since: None,
            dirty: false,
        }
    }

    pub fn totals(&self) -> Counters {
        self.totals
    }

    /// Fold one tick's reading in and return the value to plot: the change in
    /// quantum exchanges since the previous tick. Scalars and empty lists plot 0.
    pub fn record(&mut self, reading: &Reading) -> f64 {
        match reading {
            Reading::Counters(houses) if !houses.is_empty() => {
                self.previous = self.totals;
                self.totals = Counters::sum(houses);
                self.houses = houses.clone();
                self.dirty = true;
                (self.totals - self.previous).n1 as f64
            }
            _ => 0.0,
        }
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// When the pending readings are due, `None` if nothing is pending or the
    /// window has not been opened by `maybe_emit` yet
    pub fn next_due(&self) -> Option<Instant> {
        self.dirty_since
            .filter(|_| self.dirty)
            .map(|since| since + self.min_interval)
    }

    pub fn maybe_emit(&mut self, now: Instant) -> Option<CounterSummary> {
        if !self.dirty {
            return None;
        }
        let since = *self.dirty_since.get_or_insert(now);
        if now.saturating_duration_since(since) < self.min_interval {
            return None;
        }

        let totals = self.totals;
        let summary = CounterSummary {
            totals,
            since_last_emission: totals - self.emitted,
            houses: self
                .houses
                .iter()
                .enumerate()
                .map(|(i, c)| HouseRow::new(i, c))
                .collect(),
            gauges: vec![
                Gauge::new("MITM frequency", totals.detected_ratio()),
                Gauge::new("Drop frequency", totals.drop_ratio()),
                Gauge::new("Undetected frequency", totals.undetected_ratio()),
            ],
        };
        self.emitted = totals;
        self.dirty_since = None;
        self.dirty = false;
        Some(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(houses: &[(i64, i64, i64, i64, i64)]) -> Reading {
        Reading::Counters(
            houses
                .iter()
                .map(|&(n1, n2, n3, n4, n5)| Counters { n1, n2, n3, n4, n5 })
                .collect(),
        )
    }

    #[test]
    fn test_plotted_value_is_exchange_delta() {
        let mut panel = CounterPanel::new(Duration::from_secs(1));
        assert_eq!(panel.record(&reading(&[(3, 0, 0, 10, 1), (3, 1, 0, 10, 0)])), 6.0);
        assert_eq!(panel.record(&reading(&[(6, 0, 0, 20, 1), (9, 1, 1, 30, 0)])), 9.0);
        assert_eq!(panel.totals().n4, 50);
        assert_eq!(panel.record(&Reading::Scalar(4.0)), 0.0);
        assert_eq!(panel.record(&Reading::Counters(vec![])), 0.0);
        // Totals survive readings without counters
        assert_eq!(panel.totals().n1, 15);
    }

    #[test]
    fn test_emission_is_rate_limited() {
        let t0 = Instant::now();
        let mut panel = CounterPanel::new(Duration::from_millis(1000));
        assert_eq!(panel.maybe_emit(t0), None);
        assert_eq!(panel.next_due(), None);

        panel.record(&reading(&[(3, 1, 1, 10, 2)]));
        assert_eq!(panel.maybe_emit(t0), None);
        assert_eq!(panel.next_due(), Some(t0 + Duration::from_millis(1000)));

        panel.record(&reading(&[(6, 1, 1, 20, 2)]));
        assert_eq!(panel.maybe_emit(t0 + Duration::from_millis(300)), None);
        assert_eq!(panel.next_due(), Some(t0 + Duration::from_millis(1000)));

        let first = panel.maybe_emit(t0 + Duration::from_millis(1000)).unwrap();
        assert_eq!(first.totals.n1, 6);
        assert_eq!(first.since_last_emission.n1, 6);
        assert_eq!(panel.next_due(), None);

        panel.record(&reading(&[(9, 2, 1, 30, 4)]));
        assert_eq!(panel.maybe_emit(t0 + Duration::from_millis(1500)), None);
        let second = panel.maybe_emit(t0 + Duration::from_millis(2500)).unwrap();
        assert_eq!(second.totals.n1, 9);
        assert_eq!(second.since_last_emission.n1, 3);
        assert_eq!(second.since_last_emission.n4, 10);
        // Nothing new since the last emission
        assert_eq!(panel.maybe_emit(t0 + Duration::from_millis(5000)), None);
    }

    #[test]
    fn test_summary_rows_and_gauges() {
        let mut panel = CounterPanel::new(Duration::ZERO);
        panel.record(&reading(&[(3, 3, 1, 10, 6), (0, 0, 0, 0, 0)]));
        let summary = panel.maybe_emit(Instant::now()).unwrap();

        assert_eq!(summary.houses[0].label, "House 0");
        assert_eq!(summary.houses[0].detected, "3/4");
        assert_eq!(summary.houses[0].undetected, "1/4");
        assert_eq!(summary.houses[1].detected, "0/0");

        let mitm = &summary.gauges[0];
        assert_eq!(mitm.percent, Some(75.0));
        assert!(mitm.alert);
        assert_eq!(summary.gauges[1].percent, Some(60.0));
        assert_eq!(summary.gauges[2].display(), "25%");
        assert!(!summary.gauges[2].alert);
    }

    #[test]
    fn test_zero_denominators_display_not_available() {
        let mut panel = CounterPanel::new(Duration::ZERO);
        panel.record(&reading(&[(1, 0, 0, 0, 0)]));
        let summary = panel.maybe_emit(Instant::now()).unwrap();
        assert!(summary.gauges.iter().all(|g| g.percent.is_none() && !g.alert));
        assert_eq!(summary.gauges[0].display(), "N/A");
    }
}
