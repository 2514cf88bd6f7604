// View-models computed by the views and committed to a render surface
use crate::application::counter_panel::CounterSummary;
use crate::domain::color::Hsl;
use crate::domain::entity::Glyph;
use std::time::Duration;

/// Handle of a node's glyph on the surface (the node's index)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GlyphHandle(pub usize);

/// Emitted by the topology when a node is clicked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectEvent {
    pub entity: String,
    pub glyph: GlyphHandle,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NodePlacement {
    pub glyph: GlyphHandle,
    pub name: String,
    pub shape: Glyph,
    pub position: Point,
    pub pinned: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TopologyFrame {
    pub nodes: Vec<NodePlacement>,
    pub links: Vec<(Point, Point)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NodeFill {
    pub glyph: GlyphHandle,
    /// `None` leaves the node in its neutral style
    pub color: Option<Hsl>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub key: String,
    pub label: String,
    pub display_class: String,
    pub shape: Glyph,
}

/// Static part of a chart, built on selection
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSkeleton {
    pub entity: String,
    pub title: String,
    pub unit: String,
    pub x_domain: (i64, i64),
    pub y_domain: (f64, f64),
    pub axis_center: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AxisTick {
    pub position: f64,
    pub label: String,
}

/// One animation step of the chart
#[derive(Debug, Clone, PartialEq)]
pub struct ChartFrame {
    pub x_domain: (i64, i64),
    pub y_domain: (f64, f64),
    pub x_ticks: Vec<AxisTick>,
    pub y_ticks: Vec<AxisTick>,
    /// Vertical pixel position of the x-axis
    pub axis_y: f64,
    /// Line vertices, `None` for gaps
    pub points: Vec<Option<Point>>,
    /// Horizontal translation the line slides to over the transition
    pub shift_x: f64,
    pub transition: Duration,
}

/// Changes produced by the timeline, applied in order
#[derive(Debug, Clone, PartialEq)]
pub enum TimelineEffect {
    CloseChart,
    Highlight(GlyphHandle),
    Unhighlight(GlyphHandle),
    OpenChart(ChartSkeleton),
    Frame(ChartFrame),
    Summary(CounterSummary),
}
