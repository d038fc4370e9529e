use eframe::egui::{self, Align, Layout, Ui};
use trustgraph_radial::util::{format_bytes, short_key};

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("Graph Controls");
        ui.separator();
        ui.add_space(4.0);

        let mut changed = false;

        ui.label("Search (public key)")
            .on_hover_text("Fuzzy-highlight matching peers without changing the layout.");
        ui.text_edit_singleline(&mut self.search)
            .on_hover_text("Type part of a public key, then click a highlighted peer to select it.");

        ui.separator();

        let traffic_slider = ui
            .add(
                egui::Slider::new(&mut self.min_traffic_percent, 0.0..=100.0)
                    .step_by(1.0)
                    .suffix("%")
                    .text("Min traffic"),
            )
            .on_hover_text(
                "Leave out peers whose total traffic is below this share of the neighborhood's range. The focus peer always stays.",
            );
        changed |= traffic_slider.changed();

        let spacing_slider = ui
            .add(
                egui::Slider::new(&mut self.ring_spacing, 60.0..=600.0)
                    .step_by(10.0)
                    .clamping(egui::SliderClamping::Always)
                    .text("Ring spacing"),
            )
            .on_hover_text("Distance between the focus peer and each successive ring.");
        changed |= spacing_slider.changed();

        if changed {
            self.scene_dirty = true;
        }

        ui.separator();
        ui.label(format!(
            "Node traffic: {} – {}",
            format_bytes(self.graph.min_total_traffic),
            format_bytes(self.graph.max_total_traffic)
        ));
        ui.label(format!(
            "Link transmission: {} – {}",
            format_bytes(self.graph.min_transmission),
            format_bytes(self.graph.max_transmission)
        ));

        ui.separator();
        ui.label("Peers by traffic");
        self.draw_traffic_ranking(ui);
    }

    fn draw_traffic_ranking(&mut self, ui: &mut Ui) {
        let mut ranked = self
            .graph
            .nodes
            .iter()
            .map(|node| (node.public_key.as_str(), node.total_traffic()))
            .collect::<Vec<_>>();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

        let mut selected_key = None;
        egui::ScrollArea::vertical()
            .id_salt("traffic_ranking_scroll")
            .max_height(320.0)
            .auto_shrink([false, false])
            .show_rows(ui, 22.0, ranked.len(), |ui, row_range| {
                for index in row_range {
                    let Some((key, traffic)) = ranked.get(index) else {
                        continue;
                    };

                    let is_selected = self.selected.as_deref() == Some(*key);
                    let clicked = ui
                        .horizontal(|ui| {
                            let clicked = ui
                                .selectable_label(is_selected, short_key(key))
                                .on_hover_text(*key)
                                .clicked();
                            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                                ui.label(format_bytes(*traffic));
                            });
                            clicked
                        })
                        .inner;

                    if clicked {
                        selected_key = Some((*key).to_owned());
                    }
                }
            });

        if let Some(key) = selected_key {
            self.set_selected(Some(key));
        }
    }
}
