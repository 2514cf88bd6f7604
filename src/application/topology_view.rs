// Topology view - layout projection, glyphs and heat colors
use crate::application::layout::{LayoutEngine, LayoutLink, LayoutNode};
use crate::application::registry::EntityRegistry;
use crate::application::view_model::{
    GlyphHandle, LegendEntry, NodeFill, NodePlacement, Point, SelectEvent, TopologyFrame,
};
use crate::domain::color::heat_color;
use crate::domain::entity::Glyph;
use crate::domain::message::UpdatePayload;
use crate::infrastructure::config::{CanvasConfig, LegendConfig, TopologyConfig};

pub struct TopologyView {
    config: TopologyConfig,
    legend: LegendConfig,
    size: (f64, f64),
    pinned_position: Point,
    heatmap_enabled: bool,
    layout: Box<dyn LayoutEngine>,
    links: Vec<(usize, usize)>,
}

impl TopologyView {
    pub fn new(
        config: TopologyConfig,
        legend: LegendConfig,
        canvas: &CanvasConfig,
        layout: Box<dyn LayoutEngine>,
    ) -> Self {
        let (px, py) = config
            .pinned_position
            .unwrap_or((canvas.width / 3.0, 50.0));
        Self {
            config,
            legend,
            size: (canvas.width, canvas.topology_height()),
            pinned_position: Point::new(px, py),
            heatmap_enabled: true,
            layout,
            links: Vec::new(),
        }
    }

    /// Build the layout for the registry's graph and return the legend
    pub fn create(&mut self, registry: &EntityRegistry, disable_heatmap: bool) -> Vec<LegendEntry> {
        self.heatmap_enabled = !disable_heatmap;

        let nodes = registry
            .nodes()
            .iter()
            .map(|node| {
                let charge = registry
                    .configured_type(node)
                    .map(|etype| self.config.charge_for(&etype.display_class))
                    .unwrap_or(self.config.default_charge);
                LayoutNode { charge }
            })
            .collect();

        let mut layout_links = Vec::new();
        self.links.clear();
        for link in registry.links() {
            match (registry.resolve(&link.source), registry.resolve(&link.target)) {
                (Some(source), Some(target)) => {
                    self.links.push((source, target));
                    layout_links.push(LayoutLink {
                        source,
                        target,
                        distance: self.config.link_distance(link.length),
                    });
                }
                _ => tracing::warn!(
                    "Skipping link with unknown endpoint: {:?} -> {:?}",
                    link.source,
                    link.target
                ),
            }
        }

        self.layout.start(nodes, layout_links, self.size);
        self.legend(registry)
    }

    pub fn legend(&self, registry: &EntityRegistry) -> Vec<LegendEntry> {
        let mut entries: Vec<LegendEntry> = registry
            .etypes()
            .iter()
            .map(|(key, etype)| LegendEntry {
                key: key.clone(),
                label: self.legend.label_for(key),
                display_class: etype.display_class.clone(),
                shape: Glyph::for_name(key),
            })
            .collect();
        entries.sort_by(|a, b| a.key.cmp(&b.key));
        entries
    }

    pub fn layout_running(&self) -> bool {
        self.layout.is_running()
    }

    /// Advance the layout one tick; `None` once it has settled
    pub fn layout_tick(&mut self, registry: &EntityRegistry) -> Option<TopologyFrame> {
        if !self.layout.step() {
            return None;
        }
        Some(self.project(registry))
    }

    /// Current screen placement of every node and link
    pub fn project(&self, registry: &EntityRegistry) -> TopologyFrame {
        let positions = self.layout.positions();
        let nodes: Vec<NodePlacement> = registry
            .nodes()
            .iter()
            .enumerate()
            .map(|(i, node)| {
                let pinned = node.is_pinned();
                let position = if pinned {
                    self.pinned_position
                } else {
                    positions.get(i).copied().unwrap_or_default()
                };
                NodePlacement {
                    glyph: GlyphHandle(i),
                    name: node.name.clone(),
                    shape: node.glyph(),
                    position,
                    pinned,
                }
            })
            .collect();

        let links = self
            .links
            .iter()
            .filter_map(|&(s, t)| Some((nodes.get(s)?.position, nodes.get(t)?.position)))
            .collect();

        TopologyFrame { nodes, links }
    }

    pub fn click(&self, registry: &EntityRegistry, name: &str) -> Option<SelectEvent> {
        match registry.position(name) {
            Some(i) => Some(SelectEvent {
                entity: name.to_string(),
                glyph: GlyphHandle(i),
            }),
            None => {
                tracing::warn!("Click on unknown entity {}", name);
                None
            }
        }
    }

    pub fn drag(&mut self, registry: &EntityRegistry, name: &str, to: Point) {
        if let Some(i) = registry.position(name) {
            self.layout.drag(i, to);
        }
    }

    pub fn release(&mut self, registry: &EntityRegistry, name: &str) {
        if let Some(i) = registry.position(name) {
            self.layout.release(i);
        }
    }

    /// Write the newest values into the registry and recompute node fills
    pub fn update(&self, registry: &mut EntityRegistry, data: &UpdatePayload) -> Option<Vec<NodeFill>> {
        if !self.heatmap_enabled {
            return None;
        }
        let snapshot = data.latest()?;

        for (name, reading) in snapshot {
            if let Some(value) = reading.value.scalar() {
                registry.set_value(name, Some(value));
            }
        }

        let fills = registry
            .nodes()
            .iter()
            .enumerate()
            .map(|(i, node)| NodeFill {
                glyph: GlyphHandle(i),
                color: heat_color(registry.configured_type(node), node.value, node.is_pinned()),
            })
            .collect();
        Some(fills)
    }
}
