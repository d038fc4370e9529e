use anyhow::{Context, Result};

use super::fetch::DataFetcher;
use super::graph::GraphData;
use super::parse::parse_neighborhood;

pub fn load_neighborhood(fetcher: &DataFetcher, public_key: &str) -> Result<GraphData> {
    let raw = fetcher
        .fetch_neighborhood(public_key)
        .with_context(|| format!("failed to fetch neighborhood of {public_key}"))?;

    graph_from_body(&raw, public_key)
}

pub fn graph_from_body(raw: &str, public_key: &str) -> Result<GraphData> {
    let snapshot = parse_neighborhood(raw, public_key)
        .with_context(|| format!("failed to parse neighborhood of {public_key}"))?;

    let data = GraphData::from_snapshot(snapshot);
    if data.node_count() == 0 {
        tracing::warn!(
            focus_node = %data.focus_node,
            "trust service returned an empty neighborhood"
        );
    } else if !data.contains(&data.focus_node) {
        tracing::warn!(
            focus_node = %data.focus_node,
            nodes = data.node_count(),
            "focus node is missing from its own neighborhood"
        );
    }

    tracing::info!(
        focus_node = %data.focus_node,
        nodes = data.node_count(),
        links = data.link_count(),
        "neighborhood rebuilt"
    );

    Ok(data)
}
