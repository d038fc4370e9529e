use std::sync::Arc;

use eframe::egui::{self, Align, Context, Layout, Vec2};
use trustgraph_radial::trust::{GraphData, SceneConfig};
use trustgraph_radial::util::short_key;

use super::super::{ViewModel, ViewRequest, ViewScratch};

impl ViewModel {
    pub(in crate::app) fn new(graph: Arc<GraphData>, scene_config: SceneConfig) -> Self {
        Self {
            selected: None,
            ring_spacing: scene_config.layout.ring_spacing as f32,
            graph,
            scene_config,
            min_traffic_percent: 0.0,
            search: String::new(),
            pan: Vec2::ZERO,
            zoom: 1.0,
            scene_dirty: true,
            scene_revision: 0,
            scene: None,
            search_match_cache: None,
            view_scratch: ViewScratch::default(),
            visible_node_count: 0,
            visible_link_count: 0,
        }
    }

    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        endpoint: &str,
        loading_focus: Option<&str>,
    ) -> ViewRequest {
        let mut request = ViewRequest::default();
        if self.scene_dirty {
            self.rebuild_scene();
        }

        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("trustgraph");
                    ui.separator();
                    ui.label(format!("focus: {}", short_key(&self.graph.focus_node)))
                        .on_hover_text(self.graph.focus_node.as_str());
                    ui.label(format!("service: {endpoint}"));
                    ui.label(format!("nodes: {}", self.graph.node_count()));
                    ui.label(format!("links: {}", self.graph.link_count()));
                    let refresh_button =
                        ui.add_enabled(loading_focus.is_none(), egui::Button::new("Refresh"));
                    if refresh_button.clicked() {
                        request.refresh = true;
                    }
                    if ui.button("Re-layout").clicked() {
                        self.scene_dirty = true;
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if let Some(visible_text) = self.visible_scene_text() {
                            ui.label(visible_text);
                        }
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| self.draw_controls(ui));

        egui::SidePanel::right("details")
            .resizable(true)
            .default_width(340.0)
            .show(ctx, |ui| {
                if let Some(key) = self.draw_details(ui) {
                    request.refocus = Some(key);
                }
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(focus) = loading_focus {
                ui.vertical_centered(|ui| {
                    ui.add_space(120.0);
                    ui.heading(format!("Loading neighborhood of {}...", short_key(focus)));
                    ui.add_space(8.0);
                    ui.spinner();
                });
            } else if let Some(key) = self.draw_graph(ui) {
                request.refocus = Some(key);
            }
        });

        request
    }

    pub(in crate::app) fn set_selected(&mut self, selected: Option<String>) {
        if self.selected == selected {
            return;
        }

        self.selected = selected;
    }

    fn visible_scene_text(&self) -> Option<String> {
        self.scene.as_ref().map(|scene| {
            format!(
                "visible: {} nodes / {} links",
                self.visible_node_count.min(scene.nodes.len()),
                self.visible_link_count.min(scene.links.len())
            )
        })
    }
}
