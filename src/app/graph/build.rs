use std::sync::Arc;

use trustgraph_radial::trust::{FOCUS_RING, assign_rings, build_scene, ring_sizes};

use super::super::ViewModel;

impl ViewModel {
    /// Minimum total traffic a non-focus node needs to stay in the scene.
    fn traffic_threshold(&self) -> f64 {
        let lo = self.graph.min_total_traffic;
        let hi = self.graph.max_total_traffic;
        lo + (hi - lo) * (self.min_traffic_percent.clamp(0.0, 100.0) as f64 / 100.0)
    }

    pub(in crate::app) fn rebuild_scene(&mut self) {
        self.scene_revision = self.scene_revision.wrapping_add(1);
        self.search_match_cache = None;

        let mut config = self.scene_config;
        config.layout.ring_spacing = self.ring_spacing.max(1.0) as f64;

        let threshold = self.traffic_threshold();
        let filtering = self.min_traffic_percent > 0.0;
        let graph = Arc::clone(&self.graph);
        let scene = build_scene(Arc::clone(&self.graph), &config, |node| {
            if node.ring == FOCUS_RING || !filtering {
                return true;
            }
            graph
                .node(&node.public_key)
                .is_some_and(|record| record.total_traffic() >= threshold)
        });

        tracing::debug!(
            revision = self.scene_revision,
            rings = ?ring_sizes(&assign_rings(&self.graph)),
            kept = scene.nodes.len(),
            threshold,
            "scene rebuilt"
        );

        if let Some(selected) = &self.selected
            && scene.index_of(selected).is_none()
        {
            self.selected = None;
        }

        self.visible_node_count = scene.nodes.len();
        self.visible_link_count = scene.links.len();
        self.scene = Some(scene);
        self.scene_dirty = false;
    }
}
