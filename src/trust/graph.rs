use std::collections::HashSet;

use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Node {
    pub public_key: String,
    pub total_up: f64,
    pub total_down: f64,
}

impl Node {
    pub fn new(public_key: impl Into<String>, total_up: f64, total_down: f64) -> Self {
        Self {
            public_key: public_key.into(),
            total_up,
            total_down,
        }
    }

    pub fn total_traffic(&self) -> f64 {
        self.total_up + self.total_down
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Link {
    pub source_pk: String,
    pub target_pk: String,
    pub amount_up: f64,
    pub amount_down: f64,
}

impl Link {
    pub fn new(
        source_pk: impl Into<String>,
        target_pk: impl Into<String>,
        amount_up: f64,
        amount_down: f64,
    ) -> Self {
        Self {
            source_pk: source_pk.into(),
            target_pk: target_pk.into(),
            amount_up,
            amount_down,
        }
    }

    pub fn transmission(&self) -> f64 {
        self.amount_up + self.amount_down
    }

    pub fn is_self_loop(&self) -> bool {
        self.source_pk == self.target_pk
    }

    pub fn other_end(&self, public_key: &str) -> Option<&str> {
        if self.source_pk == public_key {
            Some(self.target_pk.as_str())
        } else if self.target_pk == public_key {
            Some(self.source_pk.as_str())
        } else {
            None
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct NeighborhoodSnapshot {
    pub focus_node: String,
    pub nodes: Vec<Node>,
    pub links: Vec<Link>,
}

/// Filtered neighborhood plus the traffic aggregates the encoders normalize against.
///
/// Built once per fetch and never mutated afterwards; share it behind an `Arc`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphData {
    pub focus_node: String,
    pub nodes: Vec<Node>,
    pub links: Vec<Link>,
    pub min_total_traffic: f64,
    pub max_total_traffic: f64,
    pub min_transmission: f64,
    pub max_transmission: f64,
}

impl GraphData {
    pub fn from_snapshot(snapshot: NeighborhoodSnapshot) -> Self {
        let NeighborhoodSnapshot {
            focus_node,
            nodes: raw_nodes,
            links: raw_links,
        } = snapshot;

        let mut seen = HashSet::with_capacity(raw_nodes.len());
        let mut nodes = Vec::with_capacity(raw_nodes.len());
        for node in raw_nodes {
            if node.public_key.is_empty() || !seen.insert(node.public_key.clone()) {
                continue;
            }
            nodes.push(node);
        }

        let raw_link_count = raw_links.len();
        let links = raw_links
            .into_iter()
            .filter(|link| seen.contains(&link.source_pk) && seen.contains(&link.target_pk))
            .collect::<Vec<_>>();

        let dropped = raw_link_count - links.len();
        if dropped > 0 {
            tracing::debug!(dropped, %focus_node, "dropped links with unknown endpoints");
        }

        let (min_total_traffic, max_total_traffic) =
            min_max(nodes.iter().map(Node::total_traffic));
        let (min_transmission, max_transmission) = min_max(links.iter().map(Link::transmission));

        Self {
            focus_node,
            nodes,
            links,
            min_total_traffic,
            max_total_traffic,
            min_transmission,
            max_transmission,
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    pub fn node(&self, public_key: &str) -> Option<&Node> {
        self.nodes.iter().find(|node| node.public_key == public_key)
    }

    pub fn contains(&self, public_key: &str) -> bool {
        self.node(public_key).is_some()
    }

    pub fn peer_links<'a>(&'a self, public_key: &'a str) -> impl Iterator<Item = &'a Link> + 'a {
        self.links
            .iter()
            .filter(move |link| !link.is_self_loop() && link.other_end(public_key).is_some())
    }
}

fn min_max(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for value in values {
        min = min.min(value);
        max = max.max(value);
    }

    if min > max { (0.0, 0.0) } else { (min, max) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> NeighborhoodSnapshot {
        NeighborhoodSnapshot {
            focus_node: "B".to_string(),
            nodes: vec![
                Node::new("A", 1.0, 4.0),
                Node::new("B", 10.0, 10.0),
                Node::new("C", 0.0, 2.0),
            ],
            links: vec![
                Link::new("A", "B", 30.0, 40.0),
                Link::new("B", "C", 20.0, 20.0),
                Link::new("B", "Z", 500.0, 500.0),
            ],
        }
    }

    #[test]
    fn aggregates_cover_nodes_and_kept_links() {
        let data = GraphData::from_snapshot(snapshot());

        assert_eq!(data.min_total_traffic, 2.0);
        assert_eq!(data.max_total_traffic, 20.0);
        assert_eq!(data.min_transmission, 40.0);
        assert_eq!(data.max_transmission, 70.0);
    }

    #[test]
    fn dangling_links_are_dropped() {
        let data = GraphData::from_snapshot(snapshot());

        assert_eq!(data.link_count(), 2);
        for link in &data.links {
            assert!(data.contains(&link.source_pk));
            assert!(data.contains(&link.target_pk));
        }
    }

    #[test]
    fn duplicate_nodes_keep_first_record() {
        let mut raw = snapshot();
        raw.nodes.push(Node::new("A", 999.0, 999.0));
        let data = GraphData::from_snapshot(raw);

        assert_eq!(data.node_count(), 3);
        assert_eq!(data.node("A").map(Node::total_traffic), Some(5.0));
    }

    #[test]
    fn empty_snapshot_has_zero_ranges() {
        let data = GraphData::from_snapshot(NeighborhoodSnapshot::default());

        assert_eq!(data.min_total_traffic, 0.0);
        assert_eq!(data.max_total_traffic, 0.0);
        assert_eq!(data.min_transmission, 0.0);
        assert_eq!(data.max_transmission, 0.0);
    }

    #[test]
    fn peer_links_skip_self_loops() {
        let mut raw = snapshot();
        raw.links.push(Link::new("B", "B", 7.0, 7.0));
        let data = GraphData::from_snapshot(raw);

        assert_eq!(data.link_count(), 3);
        let peers = data
            .peer_links("B")
            .filter_map(|link| link.other_end("B"))
            .collect::<Vec<_>>();
        assert_eq!(peers, vec!["A", "C"]);
        assert_eq!(data.peer_links("C").count(), 1);
    }

    #[test]
    fn other_end_is_symmetric() {
        let link = Link::new("A", "B", 0.0, 0.0);

        assert_eq!(link.other_end("A"), Some("B"));
        assert_eq!(link.other_end("B"), Some("A"));
        assert_eq!(link.other_end("C"), None);
    }
}
