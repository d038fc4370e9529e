use std::collections::HashSet;
use std::sync::Arc;

use eframe::egui::{self, Align2, Color32, FontId, Sense, Stroke, Ui, vec2};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;
use trustgraph_radial::trust::{FOCUS_RING, NEIGHBOR_RING};
use trustgraph_radial::util::{format_bytes, short_key};

use super::super::render_utils::{
    blend_color, dim_color, draw_background, scene_point, segment_visible, traffic_color,
    world_to_screen,
};
use super::super::{SearchMatchCache, ViewModel};

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_ascii_lowercase(), &query.to_ascii_lowercase()))
}

impl ViewModel {
    fn cached_search_matches(&mut self) -> Option<Arc<HashSet<usize>>> {
        let query = self.search.trim();
        if query.is_empty() {
            return None;
        }

        if let Some(cached) = &self.search_match_cache
            && cached.scene_revision == self.scene_revision
            && cached.query == query
        {
            return Some(Arc::clone(&cached.matches));
        }

        let scene = self.scene.as_ref()?;
        let matcher = SkimMatcherV2::default();
        let matches = scene
            .nodes
            .iter()
            .enumerate()
            .filter_map(|(index, node)| {
                fuzzy_match_score(&matcher, &node.public_key, query).map(|_| index)
            })
            .collect::<HashSet<_>>();
        let matches = Arc::new(matches);

        self.search_match_cache = Some(SearchMatchCache {
            query: query.to_owned(),
            scene_revision: self.scene_revision,
            matches: Arc::clone(&matches),
        });

        Some(matches)
    }

    /// Draws the scene; returns a peer to refocus on when one was double-clicked.
    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) -> Option<String> {
        if self.scene_dirty {
            self.rebuild_scene();
        }

        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);

        self.handle_graph_zoom(ui, rect, &response);
        self.handle_graph_pan(&response);

        let search_matches = self.cached_search_matches();
        let pan = self.pan;
        let zoom = self.zoom;

        let Some(scene) = self.scene.as_ref() else {
            draw_background(&painter, rect, pan, zoom, self.ring_spacing, 0);
            ui.label("No neighborhood loaded.");
            return None;
        };

        let outermost_ring = scene.nodes.iter().map(|node| node.ring).max().unwrap_or(0);
        draw_background(&painter, rect, pan, zoom, self.ring_spacing, outermost_ring);

        let scratch = &mut self.view_scratch;
        scratch.screen_positions.clear();
        scratch.screen_radii.clear();
        for node in &scene.nodes {
            scratch.screen_positions.push(world_to_screen(
                rect,
                pan,
                zoom,
                scene_point(node.x, node.y),
            ));
            scratch
                .screen_radii
                .push((node.radius as f32 * zoom.powf(0.40)).clamp(2.5, 60.0));
        }
        Self::visible_indices_into(
            rect,
            &scratch.screen_positions,
            &scratch.screen_radii,
            &mut scratch.visible_indices,
        );

        let hovered = Self::hovered_index(
            ui,
            &scratch.visible_indices,
            &scratch.screen_positions,
            &scratch.screen_radii,
        );
        if hovered.is_some() {
            ui.output_mut(|output| {
                output.cursor_icon = egui::CursorIcon::PointingHand;
            });
        }

        let hovered_key = hovered.map(|index| scene.nodes[index].public_key.clone());
        let pending_selection = response
            .clicked_by(egui::PointerButton::Primary)
            .then(|| hovered_key.clone());
        let pending_refocus = if response.double_clicked() {
            hovered_key
                .clone()
                .filter(|key| *key != scene.focus_node)
        } else {
            None
        };

        let selected_index = self
            .selected
            .as_deref()
            .and_then(|key| scene.index_of(key));
        let search_active = search_matches
            .as_ref()
            .is_some_and(|matches| !matches.is_empty());

        let zoom_sqrt = zoom.sqrt();
        let mut visible_link_count = 0usize;
        for link in &scene.links {
            let start = scratch.screen_positions[link.source];
            let end = scratch.screen_positions[link.target];
            if !segment_visible(rect, start, end, link.stroke_width as f32) {
                continue;
            }

            let touches = |index: Option<usize>| {
                index.is_some_and(|index| index == link.source || index == link.target)
            };
            let emphasized = touches(selected_index) || touches(hovered);

            let width = (link.stroke_width as f32 * zoom_sqrt).clamp(0.6, 24.0);
            let color = if emphasized {
                Color32::from_rgb(241, 146, 94)
            } else if selected_index.is_some() || search_active {
                Color32::from_rgba_unmultiplied(80, 90, 104, 120)
            } else {
                Color32::from_rgba_unmultiplied(110, 116, 124, 190)
            };

            painter.line_segment([start, end], Stroke::new(width, color));
            visible_link_count += 1;
        }

        let selected_color = Color32::from_rgb(245, 206, 93);
        for &index in &scratch.visible_indices {
            let node = &scene.nodes[index];
            let position = scratch.screen_positions[index];
            let radius = scratch.screen_radii[index];

            let is_focus = node.ring == FOCUS_RING;
            let is_selected = selected_index == Some(index);
            let is_hovered = hovered == Some(index);
            let is_match = search_matches
                .as_ref()
                .is_some_and(|matches| matches.contains(&index));

            let base_color = traffic_color(node.traffic_fraction);
            let color = if is_selected {
                selected_color
            } else if is_hovered {
                Color32::from_rgb(255, 164, 101)
            } else if is_match {
                blend_color(base_color, Color32::from_rgb(103, 196, 255), 0.68)
            } else if search_active || selected_index.is_some() {
                dim_color(base_color, 0.45)
            } else {
                base_color
            };

            painter.circle_filled(position, radius, color);
            painter.circle_stroke(
                position,
                radius,
                Stroke::new(
                    if is_focus { 2.4 } else { 1.0 },
                    if is_focus {
                        Color32::from_gray(235)
                    } else {
                        Color32::from_rgba_unmultiplied(15, 15, 15, 190)
                    },
                ),
            );

            let should_draw_label = is_focus
                || is_selected
                || is_hovered
                || is_match
                || (node.ring == NEIGHBOR_RING && zoom > 0.6)
                || zoom > 1.4;
            if should_draw_label {
                painter.text(
                    position + vec2(radius + 5.0, 0.0),
                    Align2::LEFT_CENTER,
                    short_key(&node.public_key),
                    FontId::proportional(12.0),
                    Color32::from_gray(238),
                );
            }
        }

        if let Some(index) = hovered {
            let node = &scene.nodes[index];
            let panel_text = format!(
                "{}  |  traffic {}  |  radius {:.1}  |  ring {}",
                short_key(&node.public_key),
                format_bytes(node.total_traffic),
                node.radius,
                node.ring
            );
            painter.text(
                rect.left_top() + vec2(10.0, 10.0),
                Align2::LEFT_TOP,
                panel_text,
                FontId::proportional(13.0),
                Color32::from_gray(240),
            );
        }

        let visible_node_count = scratch.visible_indices.len();
        self.visible_node_count = visible_node_count;
        self.visible_link_count = visible_link_count;

        if let Some(selected) = pending_selection {
            self.set_selected(selected);
        }

        pending_refocus
    }
}
