// Counter readings reported by the pinned (control center) category
use serde::Deserialize;
use std::ops::{Add, Sub};

/// One key-exchange counter reading.
///
/// - `n1`: quantum exchanges
/// - `n2`: man-in-the-middle attempts detected
/// - `n3`: man-in-the-middle attempts undetected
/// - `n4`: qubits exchanged
/// - `n5`: qubits dropped
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawCounters")]
pub struct Counters {
    pub n1: i64,
    pub n2: i64,
    pub n3: i64,
    pub n4: i64,
    pub n5: i64,
}

#[derive(Deserialize)]
struct CounterFields {
    #[serde(default)]
    n1: i64,
    #[serde(default)]
    n2: i64,
    #[serde(default)]
    n3: i64,
    #[serde(default)]
    n4: i64,
    #[serde(default)]
    n5: i64,
}

// The backend forwards each reading either as an object or as a JSON-encoded string
#[derive(Deserialize)]
#[serde(untagged)]
enum RawCounters {
    Object(CounterFields),
    Encoded(String),
}

impl TryFrom<RawCounters> for Counters {
    type Error = serde_json::Error;

    fn try_from(raw: RawCounters) -> Result<Self, Self::Error> {
        let fields = match raw {
            RawCounters::Object(fields) => fields,
            RawCounters::Encoded(text) => serde_json::from_str::<CounterFields>(&text)?,
        };
        Ok(Self {
            n1: fields.n1,
            n2: fields.n2,
            n3: fields.n3,
            n4: fields.n4,
            n5: fields.n5,
        })
    }
}

impl Add for Counters {
    type Output = Counters;

    fn add(self, rhs: Counters) -> Counters {
        Counters {
            n1: self.n1 + rhs.n1,
            n2: self.n2 + rhs.n2,
            n3: self.n3 + rhs.n3,
            n4: self.n4 + rhs.n4,
            n5: self.n5 + rhs.n5,
        }
    }
}

impl Sub for Counters {
    type Output = Counters;

    fn sub(self, rhs: Counters) -> Counters {
        Counters {
            n1: self.n1 - rhs.n1,
            n2: self.n2 - rhs.n2,
            n3: self.n3 - rhs.n3,
            n4: self.n4 - rhs.n4,
            n5: self.n5 - rhs.n5,
        }
    }
}

impl Counters {
    pub fn sum<'a>(readings: impl IntoIterator<Item = &'a Counters>) -> Counters {
        readings
            .into_iter()
            .fold(Counters::default(), |acc, c| acc + *c)
    }

    /// Attempts seen in total, detected or not
    pub fn attacks(&self) -> i64 {
        self.n2 + self.n3
    }

    pub fn detected_ratio(&self) -> Option<f64> {
        ratio(self.n2, self.attacks())
    }

    pub fn undetected_ratio(&self) -> Option<f64> {
        ratio(self.n3, self.attacks())
    }

    pub fn drop_ratio(&self) -> Option<f64> {
        ratio(self.n5, self.n4)
    }
}

/// `None` when the denominator is zero
pub fn ratio(numerator: i64, denominator: i64) -> Option<f64> {
    if denominator == 0 {
        None
    } else {
        Some(numerator as f64 / denominator as f64)
    }
}

/// Rounded percentage, `N/A` for undefined ratios
pub fn format_percent(ratio: Option<f64>) -> String {
    match ratio {
        Some(r) => format!("{}%", (r * 100.0).round()),
        None => "N/A".to_string(),
    }
}
