// Console rendering surface - commits view-models as log lines
use crate::application::counter_panel::CounterSummary;
use crate::application::surface::RenderSurface;
use crate::application::view_model::{
    ChartFrame, ChartSkeleton, GlyphHandle, LegendEntry, NodeFill, TopologyFrame,
};
use crate::domain::color::Hsl;

/// Keeps just enough of the committed state to name nodes and report
/// what changed between frames.
#[derive(Debug, Default)]
pub struct ConsoleSurface {
    names: Vec<String>,
    fills: Vec<Option<Hsl>>,
    chart: Option<String>,
}

impl ConsoleSurface {
    fn name(&self, glyph: GlyphHandle) -> &str {
        self.names.get(glyph.0).map(String::as_str).unwrap_or("?")
    }
}

impl RenderSurface for ConsoleSurface {
    fn draw_legend(&mut self, entries: &[LegendEntry]) {
        for entry in entries {
            tracing::info!(
                "Legend: {} ({}) shape={:?}",
                entry.label,
                entry.display_class,
                entry.shape
            );
        }
    }

    fn draw_topology(&mut self, frame: &TopologyFrame) {
        if self.names.len() != frame.nodes.len() {
            tracing::info!(
                "Topology: {} nodes, {} links",
                frame.nodes.len(),
                frame.links.len()
            );
        }
        self.names = frame.nodes.iter().map(|n| n.name.clone()).collect();
        for node in &frame.nodes {
            tracing::trace!(
                "{} at ({:.1}, {:.1})",
                node.name,
                node.position.x,
                node.position.y
            );
        }
    }

    fn fill_nodes(&mut self, fills: &[NodeFill]) {
        self.fills.resize(self.names.len().max(fills.len()), None);
        for fill in fills {
            let Some(slot) = self.fills.get_mut(fill.glyph.0) else {
                continue;
            };
            if *slot != fill.color {
                *slot = fill.color;
                let color = fill
                    .color
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "neutral".to_string());
                let name = self.names.get(fill.glyph.0).map(String::as_str).unwrap_or("?");
                tracing::debug!("{} -> {}", name, color);
            }
        }
    }

    fn set_highlight(&mut self, glyph: GlyphHandle, highlighted: bool) {
        if highlighted {
            tracing::info!("Selected {}", self.name(glyph));
        } else {
            tracing::debug!("Deselected {}", self.name(glyph));
        }
    }

    fn open_chart(&mut self, chart: &ChartSkeleton) {
        tracing::info!(
            "Chart: {} [{}] y={:?}",
            chart.title,
            chart.unit,
            chart.y_domain
        );
        self.chart = Some(chart.entity.clone());
    }

    fn draw_chart(&mut self, frame: &ChartFrame) {
        let samples = frame.points.iter().filter(|p| p.is_some()).count();
        let first_tick = frame.x_ticks.first().map(|t| t.label.as_str()).unwrap_or("");
        let last_tick = frame.x_ticks.last().map(|t| t.label.as_str()).unwrap_or("");
        tracing::debug!(
            "Chart {}: {} samples, y={:.2}..{:.2}, time {}..{}",
            self.chart.as_deref().unwrap_or("?"),
            samples,
            frame.y_domain.0,
            frame.y_domain.1,
            first_tick,
            last_tick
        );
    }

    fn close_chart(&mut self) {
        if let Some(entity) = self.chart.take() {
            tracing::debug!("Closed chart for {}", entity);
        }
    }

    fn show_summary(&mut self, summary: &CounterSummary) {
        for house in &summary.houses {
            tracing::info!(
                "{}: detected {}, dropped {}, undetected {}, exchanges {}, qubits {}",
                house.label,
                house.detected,
                house.dropped,
                house.undetected,
                house.exchanges,
                house.qubits
            );
        }
        for gauge in &summary.gauges {
            if gauge.alert {
                tracing::warn!("{}: {}", gauge.name, gauge.display());
            } else {
                tracing::info!("{}: {}", gauge.name, gauge.display());
            }
        }
    }
}
