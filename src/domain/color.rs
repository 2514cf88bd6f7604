// Value to heat color mapping
use super::entity::EntityType;
use std::fmt;

/// Hue of red in HSL
pub const HUE_RED: f64 = 0.0;
/// Hue of green in HSL
pub const HUE_GREEN: f64 = 120.0;

/// Linear map from a value domain onto a hue interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HueScale {
    pub domain: (f64, f64),
    pub range: (f64, f64),
}

impl HueScale {
    /// Pick the scale matching the shape of the type's value range
    pub fn for_type(etype: &EntityType) -> Self {
        if etype.min == 0.0 {
            // Positive values in [0, max]
            Self {
                domain: (0.0, etype.max),
                range: (HUE_RED, HUE_GREEN),
            }
        } else if etype.max == 0.0 {
            // Negative values in [min, 0]
            Self {
                domain: (0.0, etype.min),
                range: (HUE_RED, HUE_GREEN),
            }
        } else {
            // Centered on (min + max) / 2: green, red, green
            Self {
                domain: (etype.min, etype.max),
                range: (-HUE_GREEN, HUE_GREEN),
            }
        }
    }

    pub fn scale(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let span = d1 - d0;
        let t = if span == 0.0 { 0.0 } else { (value - d0) / span };
        r0 + t * (r1 - r0)
    }

    /// Scaled hue flipped so that extremes read red and the favored end green
    pub fn mirrored(&self, value: f64) -> f64 {
        let hue = self.scale(value);
        self.range.1 - hue.abs()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub hue: f64,
    pub saturation: f64,
    pub lightness: f64,
}

impl Hsl {
    pub fn from_hue(hue: f64) -> Self {
        Self {
            hue,
            saturation: 100.0,
            lightness: 50.0,
        }
    }
}

impl fmt::Display for Hsl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hsl({}, {}%, {}%)",
            self.hue, self.saturation, self.lightness
        )
    }
}

/// Heat value for a node: the reading clipped to the type's range.
/// Pinned nodes are chart-only and always sit at zero.
pub fn heat_value(etype: &EntityType, value: f64, pinned: bool) -> f64 {
    if pinned {
        0.0
    } else {
        value.max(etype.min).min(etype.max)
    }
}

/// Fill color, `None` for a neutral (unstyled) node
pub fn heat_color(etype: Option<&EntityType>, value: Option<f64>, pinned: bool) -> Option<Hsl> {
    let etype = etype?;
    if etype.is_degenerate() {
        return None;
    }
    let value = heat_value(etype, value.unwrap_or(etype.default), pinned);
    let scale = HueScale::for_type(etype);
    Some(Hsl::from_hue(scale.mirrored(value)))
}
