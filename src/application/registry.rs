// Entity registry - entity types and the live entity graph
use crate::domain::entity::{Entity, EntityRef, EntityType, Link};
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct EntityRegistry {
    etypes: HashMap<String, EntityType>,
    nodes: Vec<Entity>,
    links: Vec<Link>,
    index: HashMap<String, usize>,
    default_type: EntityType,
}

impl Default for EntityRegistry {
    fn default() -> Self {
        Self {
            etypes: HashMap::new(),
            nodes: Vec::new(),
            links: Vec::new(),
            index: HashMap::new(),
            default_type: EntityType::unconfigured(),
        }
    }
}

impl EntityRegistry {
    pub fn initialize(
        &mut self,
        etypes: HashMap<String, EntityType>,
        nodes: Vec<Entity>,
        links: Vec<Link>,
    ) {
        self.index = nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (node.name.clone(), i))
            .collect();
        self.etypes = etypes;
        self.nodes = nodes;
        self.links = links;
        tracing::info!(
            "Registry initialized: {} entity types, {} nodes, {} links",
            self.etypes.len(),
            self.nodes.len(),
            self.links.len()
        );
    }

    /// Configured type of the entity, or the zero-range default
    pub fn lookup_type(&self, entity: &Entity) -> &EntityType {
        self.configured_type(entity).unwrap_or(&self.default_type)
    }

    pub fn configured_type(&self, entity: &Entity) -> Option<&EntityType> {
        entity.etype.as_ref().and_then(|t| self.etypes.get(t))
    }

    pub fn is_configured(&self, entity: &Entity) -> bool {
        self.configured_type(entity).is_some()
    }

    pub fn etypes(&self) -> &HashMap<String, EntityType> {
        &self.etypes
    }

    pub fn nodes(&self) -> &[Entity] {
        &self.nodes
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn node(&self, name: &str) -> Option<&Entity> {
        self.position(name).map(|i| &self.nodes[i])
    }

    pub fn set_value(&mut self, name: &str, value: Option<f64>) {
        if let Some(i) = self.position(name) {
            self.nodes[i].value = value;
        }
    }

    /// Resolve a link endpoint to a node index
    pub fn resolve(&self, endpoint: &EntityRef) -> Option<usize> {
        match endpoint {
            EntityRef::Index(i) if *i < self.nodes.len() => Some(*i),
            EntityRef::Index(_) => None,
            EntityRef::Name(name) => self.position(name),
        }
    }
}
