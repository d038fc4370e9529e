use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;

use super::encode::{LinkEncoder, NodeEncoder};
use super::graph::GraphData;
use super::layout::{LayoutNode, RadialLayout, RadialLayoutConfig};
use super::utilities::{LayoutEngine, filter_force_nodes, group_by, list_neighbors_of};

pub const FOCUS_RING: usize = 0;
pub const NEIGHBOR_RING: usize = 1;
pub const OUTER_RING: usize = 2;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneConfig {
    pub layout: RadialLayoutConfig,
    pub min_radius: f64,
    pub max_radius: f64,
    pub stroke_width_min: f64,
    pub stroke_width_max: f64,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            layout: RadialLayoutConfig::default(),
            min_radius: 15.0,
            max_radius: 25.0,
            stroke_width_min: 2.0,
            stroke_width_max: 10.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SceneNode {
    pub public_key: String,
    pub ring: usize,
    pub alpha: f64,
    pub x: f64,
    pub y: f64,
    pub total_traffic: f64,
    pub traffic_fraction: f64,
    pub radius: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SceneLink {
    pub source_pk: String,
    pub target_pk: String,
    pub source: usize,
    pub target: usize,
    pub transmission: f64,
    pub stroke_width: f64,
}

#[derive(Clone, Debug, Serialize)]
pub struct RadialScene {
    pub focus_node: String,
    pub nodes: Vec<SceneNode>,
    pub links: Vec<SceneLink>,
    #[serde(skip)]
    pub data: Arc<GraphData>,
}

impl RadialScene {
    pub fn index_of(&self, public_key: &str) -> Option<usize> {
        self.nodes
            .iter()
            .position(|node| node.public_key == public_key)
    }

    pub fn focus_index(&self) -> Option<usize> {
        self.index_of(&self.focus_node)
    }
}

pub fn assign_rings(data: &GraphData) -> Vec<LayoutNode> {
    let neighbors = list_neighbors_of(&data.links, &data.focus_node);
    let mut seeds = Vec::with_capacity(data.node_count());

    if data.contains(&data.focus_node) {
        seeds.push(LayoutNode::new(data.focus_node.clone(), FOCUS_RING));
    }

    seeds.extend(
        neighbors
            .iter()
            .filter(|neighbor| data.contains(neighbor))
            .map(|neighbor| LayoutNode::new(neighbor.clone(), NEIGHBOR_RING)),
    );

    let outer = data.nodes.iter().filter(|node| {
        node.public_key != data.focus_node && !neighbors.contains(&node.public_key)
    });
    seeds.extend(outer.map(|node| LayoutNode::new(node.public_key.clone(), OUTER_RING)));

    seeds
}

pub fn ring_sizes(nodes: &[LayoutNode]) -> Vec<(usize, usize)> {
    let mut rings = group_by(nodes, |node| Some(node.ring));
    rings.sort_unstable_keys();
    rings
        .into_iter()
        .filter_map(|(ring, members)| ring.map(|ring| (ring, members.len())))
        .collect()
}

/// Lays out and encodes `data`. Nodes rejected by `keep` are left out, along with their links.
pub fn build_scene<P>(data: Arc<GraphData>, config: &SceneConfig, keep: P) -> RadialScene
where
    P: FnMut(&LayoutNode) -> bool,
{
    let mut layout = filter_force_nodes(RadialLayout::new(config.layout), keep);
    layout.initialize(assign_rings(&data));
    let placed = layout.into_engine().into_nodes();

    let node_encoder = NodeEncoder::new(config.min_radius, config.max_radius, Arc::clone(&data));
    let link_encoder = LinkEncoder::new(
        config.stroke_width_min,
        config.stroke_width_max,
        Arc::clone(&data),
    );

    let traffic_by_key = data
        .nodes
        .iter()
        .map(|node| (node.public_key.as_str(), node))
        .collect::<HashMap<_, _>>();

    let nodes = placed
        .into_iter()
        .filter_map(|placed| {
            let node = traffic_by_key.get(placed.public_key.as_str())?;
            Some(SceneNode {
                ring: placed.ring,
                alpha: placed.alpha,
                x: placed.position.x,
                y: placed.position.y,
                total_traffic: node.total_traffic(),
                traffic_fraction: node_encoder.traffic_fraction(node),
                radius: node_encoder.calculate_radius(node),
                public_key: placed.public_key,
            })
        })
        .collect::<Vec<_>>();

    let index_by_key = nodes
        .iter()
        .enumerate()
        .map(|(index, node)| (node.public_key.as_str(), index))
        .collect::<HashMap<_, _>>();

    let links = data
        .links
        .iter()
        .filter(|link| !link.is_self_loop())
        .filter_map(|link| {
            let source = *index_by_key.get(link.source_pk.as_str())?;
            let target = *index_by_key.get(link.target_pk.as_str())?;
            Some(SceneLink {
                source_pk: link.source_pk.clone(),
                target_pk: link.target_pk.clone(),
                source,
                target,
                transmission: link.transmission(),
                stroke_width: link_encoder.calculate_stroke_width(Some(link)),
            })
        })
        .collect::<Vec<_>>();

    RadialScene {
        focus_node: data.focus_node.clone(),
        nodes,
        links,
        data,
    }
}
