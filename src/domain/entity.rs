// Entity domain models
use serde::Deserialize;

/// Name marker of the pinned counter category (the control center).
pub const PINNED_MARKER: &str = "CC";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EntityType {
    #[serde(skip)]
    pub key: String,
    #[serde(rename = "cls", alias = "displayClass", default)]
    pub display_class: String,
    #[serde(default)]
    pub min: f64,
    #[serde(default)]
    pub max: f64,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub default: f64,
}

impl EntityType {
    /// Zero-range type returned for unconfigured entities
    pub fn unconfigured() -> Self {
        Self {
            key: String::new(),
            display_class: String::new(),
            min: 0.0,
            max: 0.0,
            unit: String::new(),
            default: 0.0,
        }
    }

    pub fn is_degenerate(&self) -> bool {
        self.min == 0.0 && self.max == 0.0
    }

    /// Value the chart's x-axis is drawn through
    pub fn axis_center(&self) -> f64 {
        if self.min == 0.0 || self.max == 0.0 {
            0.0
        } else {
            (self.min + self.max) / 2.0
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Entity {
    pub name: String,
    #[serde(rename = "type", default)]
    pub etype: Option<String>,
    #[serde(default)]
    pub value: Option<f64>,
}

impl Entity {
    pub fn new(name: impl Into<String>, etype: Option<&str>) -> Self {
        Self {
            name: name.into(),
            etype: etype.map(str::to_string),
            value: None,
        }
    }

    pub fn glyph(&self) -> Glyph {
        Glyph::for_name(&self.name)
    }

    pub fn is_pinned(&self) -> bool {
        is_pinned_name(&self.name)
    }
}

pub fn is_pinned_name(name: &str) -> bool {
    name.contains(PINNED_MARKER)
}

/// Link endpoint: the backend sends node indices, hand-written setups use names
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum EntityRef {
    Index(usize),
    Name(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Link {
    pub source: EntityRef,
    pub target: EntityRef,
    #[serde(default)]
    pub length: f64,
}

/// Visual shape of a topology node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glyph {
    Diamond,
    House,
    Rect,
    Circle,
}

impl Glyph {
    /// Shape rule keyed on name substrings; order matters.
    pub fn for_name(name: &str) -> Self {
        if name.contains("PV") {
            Glyph::Diamond
        } else if name.contains("House") {
            Glyph::House
        } else if name.contains(PINNED_MARKER) {
            Glyph::Rect
        } else {
            Glyph::Circle
        }
    }

    /// SVG path data centered on the origin
    pub fn path(&self) -> String {
        let (h, w) = (10.0_f64, 10.0_f64);
        let points: Vec<(f64, f64)> = match self {
            Glyph::Circle => {
                let r = 5.0;
                return format!(
                    "M 0,0 m {},0 a {r},{r} 0 1,0 {},0 a {r},{r} 0 1,0 {},0Z",
                    -r,
                    r * 2.0,
                    -r * 2.0
                );
            }
            Glyph::Diamond => vec![
                (0.0, h / 1.5),
                (w / 1.5, 0.0),
                (0.0, -h / 1.5),
                (-w / 1.5, 0.0),
                (0.0, h / 1.5),
                (w / 1.5, 0.0),
            ],
            Glyph::Rect => vec![
                (w / 2.0, h / 2.0),
                (w / 2.0, -h / 2.0),
                (-w / 2.0, -h / 2.0),
                (-w / 2.0, h / 2.0),
                (w / 2.0, h / 2.0),
            ],
            Glyph::House => vec![
                (w / 2.0, h / 2.0),
                (w / 2.0, -h / 2.0),
                (0.0, -h / 1.2),
                (-w / 2.0, -h / 2.0),
                (-w / 2.0, h / 2.0),
                (w / 2.0, h / 2.0),
                (w / 2.0, -h / 2.0),
            ],
        };
        let mut path = String::new();
        for (i, (x, y)) in points.iter().enumerate() {
            path.push(if i == 0 { 'M' } else { 'L' });
            path.push_str(&format!("{},{}", fmt_coord(*x), fmt_coord(*y)));
        }
        path
    }
}

fn fmt_coord(v: f64) -> String {
    let rounded = (v * 1000.0).round() / 1000.0;
    if rounded == 0.0 {
        "0".to_string()
    } else {
        rounded.to_string()
    }
}
