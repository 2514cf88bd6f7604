// Rendering surface and progress indicator seams
use crate::application::counter_panel::CounterSummary;
use crate::application::view_model::{
    ChartFrame, ChartSkeleton, GlyphHandle, LegendEntry, NodeFill, TimelineEffect, TopologyFrame,
};

/// Destination of computed view-models
pub trait RenderSurface {
    fn draw_legend(&mut self, entries: &[LegendEntry]);
    fn draw_topology(&mut self, frame: &TopologyFrame);
    fn fill_nodes(&mut self, fills: &[NodeFill]);
    fn set_highlight(&mut self, glyph: GlyphHandle, highlighted: bool);
    fn open_chart(&mut self, chart: &ChartSkeleton);
    fn draw_chart(&mut self, frame: &ChartFrame);
    fn close_chart(&mut self);
    fn show_summary(&mut self, summary: &CounterSummary);

    fn apply(&mut self, effect: &TimelineEffect) {
        match effect {
            TimelineEffect::CloseChart => self.close_chart(),
            TimelineEffect::Highlight(glyph) => self.set_highlight(*glyph, true),
            TimelineEffect::Unhighlight(glyph) => self.set_highlight(*glyph, false),
            TimelineEffect::OpenChart(chart) => self.open_chart(chart),
            TimelineEffect::Frame(frame) => self.draw_chart(frame),
            TimelineEffect::Summary(summary) => self.show_summary(summary),
        }
    }
}

/// Simulation progress display
pub trait ProgressIndicator {
    fn set_progress(&mut self, percent: f64, sim_seconds: f64);
}

#[cfg(test)]
pub mod testing {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    pub enum SurfaceCall {
        Legend(usize),
        Topology(TopologyFrame),
        Fill(Vec<NodeFill>),
        Highlight(GlyphHandle, bool),
        OpenChart(ChartSkeleton),
        Chart(ChartFrame),
        CloseChart,
        Summary(CounterSummary),
    }

    #[derive(Debug, Default)]
    pub struct RecordingSurface {
        pub calls: Vec<SurfaceCall>,
    }

    impl RecordingSurface {
        pub fn highlighted(&self) -> Vec<GlyphHandle> {
            let mut on = Vec::new();
            for call in &self.calls {
                if let SurfaceCall::Highlight(glyph, highlighted) = call {
                    on.retain(|g| g != glyph);
                    if *highlighted {
                        on.push(*glyph);
                    }
                }
            }
            on
        }

        pub fn current_chart(&self) -> Option<&ChartSkeleton> {
            let mut open = None;
            for call in &self.calls {
                match call {
                    SurfaceCall::OpenChart(chart) => open = Some(chart),
                    SurfaceCall::CloseChart => open = None,
                    _ => {}
                }
            }
            open
        }

        pub fn fills(&self) -> Option<&Vec<NodeFill>> {
            self.calls.iter().rev().find_map(|call| match call {
                SurfaceCall::Fill(fills) => Some(fills),
                _ => None,
            })
        }

        pub fn summaries(&self) -> usize {
            self.calls
                .iter()
                .filter(|call| matches!(call, SurfaceCall::Summary(_)))
                .count()
        }
    }

    impl RenderSurface for RecordingSurface {
        fn draw_legend(&mut self, entries: &[LegendEntry]) {
            self.calls.push(SurfaceCall::Legend(entries.len()));
        }

        fn draw_topology(&mut self, frame: &TopologyFrame) {
            self.calls.push(SurfaceCall::Topology(frame.clone()));
        }

        fn fill_nodes(&mut self, fills: &[NodeFill]) {
            self.calls.push(SurfaceCall::Fill(fills.to_vec()));
        }

        fn set_highlight(&mut self, glyph: GlyphHandle, highlighted: bool) {
            self.calls.push(SurfaceCall::Highlight(glyph, highlighted));
        }

        fn open_chart(&mut self, chart: &ChartSkeleton) {
            self.calls.push(SurfaceCall::OpenChart(chart.clone()));
        }

        fn draw_chart(&mut self, frame: &ChartFrame) {
            self.calls.push(SurfaceCall::Chart(frame.clone()));
        }

        fn close_chart(&mut self) {
            self.calls.push(SurfaceCall::CloseChart);
        }

        fn show_summary(&mut self, summary: &CounterSummary) {
            self.calls.push(SurfaceCall::Summary(summary.clone()));
        }
    }

    #[derive(Debug, Default)]
    pub struct RecordingProgress {
        pub updates: Vec<(f64, f64)>,
    }

    impl ProgressIndicator for RecordingProgress {
        fn set_progress(&mut self, percent: f64, sim_seconds: f64) {
            self.updates.push((percent, sim_seconds));
        }
    }
}
