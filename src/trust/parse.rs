use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use serde_json::Value;

use super::graph::{Link, NeighborhoodSnapshot, Node};

#[derive(Clone, Debug, Deserialize)]
struct RawNeighborhood {
    #[serde(default)]
    focus_node: Option<String>,
    #[serde(default)]
    nodes: Vec<RawNode>,
    #[serde(default, alias = "edges")]
    links: Vec<RawLink>,
}

#[derive(Clone, Debug, Deserialize)]
struct RawNode {
    #[serde(alias = "pk", alias = "key")]
    public_key: String,
    #[serde(default)]
    total_up: f64,
    #[serde(default)]
    total_down: f64,
}

#[derive(Clone, Debug, Deserialize)]
struct RawLink {
    #[serde(alias = "from")]
    source_pk: String,
    #[serde(alias = "to")]
    target_pk: String,
    #[serde(default)]
    amount_up: f64,
    #[serde(default)]
    amount_down: f64,
}

/// Parses a `display` response body. Both a bare object and one wrapped in `"graph"` are accepted.
pub fn parse_neighborhood(raw: &str, requested_focus: &str) -> Result<NeighborhoodSnapshot> {
    let parsed: Value = serde_json::from_str(raw).context("invalid JSON from trust service")?;
    let object = parsed
        .as_object()
        .ok_or_else(|| anyhow!("unexpected JSON type from trust service"))?;

    let body = match object.get("graph") {
        Some(graph) if graph.is_object() => graph,
        Some(_) => return Err(anyhow!("invalid graph object in JSON")),
        None => &parsed,
    };

    let raw = RawNeighborhood::deserialize(body).context("invalid neighborhood layout in JSON")?;

    let focus_node = raw
        .focus_node
        .filter(|focus| !focus.is_empty())
        .unwrap_or_else(|| requested_focus.to_owned());

    let nodes = raw
        .nodes
        .into_iter()
        .map(|node| Node {
            total_up: counter(&node.public_key, "total_up", node.total_up),
            total_down: counter(&node.public_key, "total_down", node.total_down),
            public_key: node.public_key,
        })
        .collect();

    let links = raw
        .links
        .into_iter()
        .map(|link| Link {
            amount_up: counter(&link.source_pk, "amount_up", link.amount_up),
            amount_down: counter(&link.source_pk, "amount_down", link.amount_down),
            source_pk: link.source_pk,
            target_pk: link.target_pk,
        })
        .collect();

    Ok(NeighborhoodSnapshot {
        focus_node,
        nodes,
        links,
    })
}

fn counter(owner: &str, field: &'static str, value: f64) -> f64 {
    if value.is_finite() && value >= 0.0 {
        value
    } else {
        tracing::warn!(owner, field, value, "clamping invalid traffic counter to zero");
        0.0
    }
}
