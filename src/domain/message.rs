// Wire protocol payloads
use super::counters::Counters;
use super::entity::{Entity, EntityType, Link};
use serde::Deserialize;
use std::collections::HashMap;

/// Request sent once after the connection opens
pub const GET_TOPOLOGY: &str = "get_topology";

pub const SETUP_TOPOLOGY: &str = "setup_topology";
pub const UPDATE_DATA: &str = "update_data";

/// Decoded inbound frame
#[derive(Debug, Clone, PartialEq)]
pub enum InboundMessage {
    SetupTopology(SetupPayload),
    UpdateData(UpdatePayload),
    Unknown(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SetupPayload {
    #[serde(default)]
    pub etypes: HashMap<String, EntityType>,
    pub nodes: Vec<Entity>,
    #[serde(default)]
    pub links: Vec<Link>,
    #[serde(default)]
    pub time: f64,
    #[serde(default, alias = "disableHeatmap")]
    pub disable_heatmap: bool,
    #[serde(alias = "startDate")]
    pub start_date: String,
    /// Seconds between two simulation updates
    #[serde(alias = "updateInterval", alias = "updateIntervalSeconds")]
    pub update_interval: f64,
    #[serde(alias = "timelineHours", alias = "timelineWindowHours")]
    pub timeline_hours: f64,
}

impl SetupPayload {
    /// Entity types with their `key` filled in from the mapping
    pub fn keyed_etypes(&self) -> HashMap<String, EntityType> {
        self.etypes
            .iter()
            .map(|(key, etype)| {
                let mut etype = etype.clone();
                etype.key = key.clone();
                (key.clone(), etype)
            })
            .collect()
    }
}

/// Per-entity values of one sub-tick
pub type Snapshot = HashMap<String, NodeReading>;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UpdatePayload {
    #[serde(default)]
    pub progress: f64,
    pub time: f64,
    #[serde(default, alias = "nodeData")]
    pub node_data: Vec<Snapshot>,
}

impl UpdatePayload {
    pub fn latest(&self) -> Option<&Snapshot> {
        self.node_data.last()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct NodeReading {
    #[serde(default)]
    pub value: Reading,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(untagged)]
pub enum Reading {
    Scalar(f64),
    Counters(Vec<Counters>),
    Series(Vec<f64>),
    #[default]
    Missing,
}

impl Reading {
    /// Plain numeric value, the newest one for a series
    pub fn scalar(&self) -> Option<f64> {
        match self {
            Reading::Scalar(v) => Some(*v),
            Reading::Series(values) => values.last().copied(),
            Reading::Counters(_) | Reading::Missing => None,
        }
    }
}
