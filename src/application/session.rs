// Session - the per-connection context every handler works on
use crate::application::animation::{Scheduler, TransitionToken};
use crate::application::layout::ForceLayout;
use crate::application::registry::EntityRegistry;
use crate::application::surface::{ProgressIndicator, RenderSurface};
use crate::application::timeline_view::TimelineView;
use crate::application::topology_view::TopologyView;
use crate::application::view_model::Point;
use crate::domain::entity::EntityType;
use crate::domain::message::{InboundMessage, SetupPayload, UpdatePayload};
use crate::infrastructure::config::ClientConfig;
use std::time::Instant;

pub struct Session<S, P> {
    registry: EntityRegistry,
    topology: TopologyView,
    timeline: TimelineView,
    surface: S,
    progress: P,
    ready: bool,
}

impl<S: RenderSurface, P: ProgressIndicator> Session<S, P> {
    pub fn new(config: &ClientConfig, surface: S, progress: P) -> Self {
        Self {
            registry: EntityRegistry::default(),
            topology: TopologyView::new(
                config.topology.clone(),
                config.legend.clone(),
                &config.canvas,
                Box::new(ForceLayout::new(config.topology.gravity)),
            ),
            timeline: TimelineView::new(config.timeline.clone(), &config.summary, &config.canvas),
            surface,
            progress,
            ready: false,
        }
    }

    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    pub fn timeline(&self) -> &TimelineView {
        &self.timeline
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn progress(&self) -> &P {
        &self.progress
    }

    pub fn handle(&mut self, message: InboundMessage, now: Instant) {
        match message {
            InboundMessage::SetupTopology(payload) => self.setup(payload),
            InboundMessage::UpdateData(payload) => self.update(payload, now),
            InboundMessage::Unknown(kind) => {
                tracing::debug!("Ignoring message of unknown kind {}", kind);
            }
        }
    }

    fn setup(&mut self, payload: SetupPayload) {
        self.progress.set_progress(0.0, payload.time);
        for effect in self.timeline.init(&payload) {
            self.surface.apply(&effect);
        }
        self.registry.initialize(
            payload.keyed_etypes(),
            payload.nodes,
            payload.links,
        );
        let legend = self.topology.create(&self.registry, payload.disable_heatmap);
        self.surface.draw_legend(&legend);
        self.surface.draw_topology(&self.topology.project(&self.registry));
        self.ready = true;
    }

    fn update(&mut self, payload: UpdatePayload, now: Instant) {
        if !self.ready {
            tracing::warn!("Update received before topology setup, dropped");
            return;
        }
        self.progress.set_progress(payload.progress, payload.time);
        if let Some(fills) = self.topology.update(&mut self.registry, &payload) {
            self.surface.fill_nodes(&fills);
        }
        for effect in self.timeline.update(&payload, now) {
            self.surface.apply(&effect);
        }
    }

    /// A click on the named node's glyph
    pub fn click(&mut self, name: &str, scheduler: &mut dyn Scheduler) {
        let Some(event) = self.topology.click(&self.registry, name) else {
            return;
        };
        let (etype, configured) = match self.registry.node(name) {
            Some(node) => (
                self.registry.lookup_type(node).clone(),
                self.registry.is_configured(node),
            ),
            None => (EntityType::unconfigured(), false),
        };
        for effect in self.timeline.select(event, &etype, configured, scheduler) {
            self.surface.apply(&effect);
        }
    }

    pub fn drag(&mut self, name: &str, to: Point) {
        if !self.ready {
            return;
        }
        self.topology.drag(&self.registry, name, to);
    }

    pub fn release(&mut self, name: &str) {
        self.topology.release(&self.registry, name);
    }

    /// Deadline of the counter summary held back by the rate limit
    pub fn summary_due(&self) -> Option<Instant> {
        self.timeline.summary_due()
    }

    pub fn flush_summary(&mut self, now: Instant) {
        if let Some(effect) = self.timeline.flush_summary(now) {
            self.surface.apply(&effect);
        }
    }

    pub fn transition_finished(&mut self, token: TransitionToken, scheduler: &mut dyn Scheduler) {
        if let Some(frame) = self.timeline.transition_finished(token, scheduler) {
            self.surface.draw_chart(&frame);
        }
    }

    pub fn layout_running(&self) -> bool {
        self.ready && self.topology.layout_running()
    }

    pub fn layout_tick(&mut self) {
        if let Some(frame) = self.topology.layout_tick(&self.registry) {
            self.surface.draw_topology(&frame);
        }
    }

    pub fn connection_closed(&mut self) {
        tracing::info!("Connection closed");
        self.progress.set_progress(0.0, 0.0);
    }
}
