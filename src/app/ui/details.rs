use eframe::egui::{self, RichText, Ui};
use trustgraph_radial::trust::{NodeEncoder, group_by};
use trustgraph_radial::util::{format_bytes, short_key};

use super::super::ViewModel;

impl ViewModel {
    /// Selection panel; returns a peer to refocus on when the user asks for it.
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) -> Option<String> {
        ui.heading("Selection Details");
        ui.add_space(6.0);

        let Some(selected_key) = self.selected.clone() else {
            ui.label("Select a peer in the graph or the traffic ranking.");
            return None;
        };

        let Some(node) = self.graph.node(&selected_key) else {
            ui.label("Selected peer is not part of the current neighborhood.");
            return None;
        };

        let encoder = NodeEncoder::new(
            self.scene_config.min_radius,
            self.scene_config.max_radius,
            self.graph.clone(),
        );
        let ring = self
            .scene
            .as_ref()
            .and_then(|scene| scene.index_of(&selected_key).map(|index| scene.nodes[index].ring));

        ui.label(RichText::new(short_key(&node.public_key)).strong());
        ui.small(node.public_key.as_str());
        ui.add_space(6.0);

        ui.label(format!("Uploaded: {}", format_bytes(node.total_up)));
        ui.label(format!("Downloaded: {}", format_bytes(node.total_down)));
        ui.label(format!("Total traffic: {}", format_bytes(node.total_traffic())));
        ui.label(format!("Rendered radius: {:.1}", encoder.calculate_radius(node)));
        match ring {
            Some(ring) => ui.label(format!("Ring: {ring}")),
            None => ui.label("Ring: filtered out"),
        };

        let mut refocus = None;
        let is_focus = selected_key == self.graph.focus_node;
        if ui
            .add_enabled(!is_focus, egui::Button::new("Focus on this peer"))
            .on_hover_text("Fetch this peer's own neighborhood and center the graph on it.")
            .clicked()
        {
            refocus = Some(selected_key.clone());
        }

        ui.separator();
        ui.label(RichText::new("Links by peer").strong());

        let links_by_peer = group_by(self.graph.peer_links(&selected_key), |link| {
            link.other_end(&selected_key).map(str::to_owned)
        });
        if links_by_peer.is_empty() {
            ui.label("No links touch this peer.");
            return refocus;
        }

        let mut pending_selection = None;
        egui::ScrollArea::vertical()
            .id_salt("links_by_peer_scroll")
            .max_height(360.0)
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for (peer, links) in &links_by_peer {
                    let Some(peer) = peer else {
                        continue;
                    };
                    let up = links.iter().map(|link| link.amount_up).sum::<f64>();
                    let down = links.iter().map(|link| link.amount_down).sum::<f64>();
                    let label = format!(
                        "{}  ({} up / {} down{})",
                        short_key(peer),
                        format_bytes(up),
                        format_bytes(down),
                        if links.len() > 1 {
                            format!(", {} links", links.len())
                        } else {
                            String::new()
                        }
                    );

                    if ui.link(label).on_hover_text(peer.as_str()).clicked() {
                        pending_selection = Some(peer.clone());
                    }
                }
            });

        if let Some(peer) = pending_selection {
            self.set_selected(Some(peer));
        }

        refocus
    }
}
