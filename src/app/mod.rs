use std::collections::HashSet;
use std::sync::Arc;

use eframe::egui::{self, Context, Pos2, Vec2};
use trustgraph_radial::trust::{
    DataFetcher, FetchError, GraphData, PendingFetch, RadialScene, SceneConfig, graph_from_body,
};

mod graph;
mod render_utils;
mod ui;

pub struct TrustGraphApp {
    fetcher: DataFetcher,
    scene_config: SceneConfig,
    focus_node: String,
    state: AppState,
    refocus: Option<PendingFetch>,
}

enum AppState {
    Loading { pending: PendingFetch },
    Ready(Box<ViewModel>),
    Error { message: String, retryable: bool },
}

struct ViewModel {
    graph: Arc<GraphData>,
    scene_config: SceneConfig,
    min_traffic_percent: f32,
    ring_spacing: f32,
    search: String,
    selected: Option<String>,
    pan: Vec2,
    zoom: f32,
    scene_dirty: bool,
    scene_revision: u64,
    scene: Option<RadialScene>,
    search_match_cache: Option<SearchMatchCache>,
    view_scratch: ViewScratch,
    visible_node_count: usize,
    visible_link_count: usize,
}

struct SearchMatchCache {
    query: String,
    scene_revision: u64,
    matches: Arc<HashSet<usize>>,
}

#[derive(Default)]
struct ViewScratch {
    screen_positions: Vec<Pos2>,
    screen_radii: Vec<f32>,
    visible_indices: Vec<usize>,
}

/// What the user asked for this frame, applied by the app after drawing.
#[derive(Default)]
struct ViewRequest {
    refresh: bool,
    refocus: Option<String>,
}

impl TrustGraphApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        fetcher: DataFetcher,
        scene_config: SceneConfig,
        focus_node: String,
    ) -> Self {
        let state = AppState::Loading {
            pending: fetcher.spawn_fetch(&focus_node),
        };
        Self {
            fetcher,
            scene_config,
            focus_node,
            state,
            refocus: None,
        }
    }

    fn ready_or_error(
        scene_config: SceneConfig,
        focus_node: &str,
        result: Result<String, FetchError>,
    ) -> AppState {
        let retryable = result.as_ref().err().is_none_or(FetchError::is_retryable);
        let graph = result
            .map_err(anyhow::Error::from)
            .and_then(|raw| graph_from_body(&raw, focus_node));

        match graph {
            Ok(graph) => AppState::Ready(Box::new(ViewModel::new(Arc::new(graph), scene_config))),
            Err(error) => {
                let message = format!("{error:#}");
                tracing::warn!(focus_node, error = %message, retryable, "neighborhood load failed");
                AppState::Error { message, retryable }
            }
        }
    }
}

impl eframe::App for TrustGraphApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { pending } => {
                if let Some(result) = pending.try_take() {
                    self.focus_node = pending.focus_node().to_owned();
                    transition = Some(Self::ready_or_error(
                        self.scene_config,
                        pending.focus_node(),
                        result,
                    ));
                } else {
                    ctx.request_repaint();
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading trust neighborhood...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error { message, retryable } => {
                let mut retry = false;
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load trust neighborhood");
                    ui.add_space(6.0);
                    ui.label(message.as_str());
                    ui.add_space(10.0);
                    if *retryable {
                        retry = ui.button("Retry").clicked();
                    } else {
                        ui.label("Check --service-url and restart the viewer.");
                    }
                });
                if retry {
                    transition = Some(AppState::Loading {
                        pending: self.fetcher.spawn_fetch(&self.focus_node),
                    });
                }
            }
            AppState::Ready(model) => {
                let loading_focus = self.refocus.as_ref().map(PendingFetch::focus_node);
                let endpoint = self.fetcher.endpoint(&self.focus_node);
                let request = model.show(ctx, endpoint.as_str(), loading_focus);

                if request.refresh {
                    self.refocus = Some(self.fetcher.spawn_fetch(&self.focus_node));
                }
                if let Some(key) = request.refocus {
                    // A newer request replaces the older one; its result is discarded with the handle.
                    self.refocus = Some(self.fetcher.spawn_fetch(&key));
                }
            }
        }

        if let Some(pending) = self.refocus.take() {
            match pending.try_take() {
                Some(result) => {
                    self.focus_node = pending.focus_node().to_owned();
                    transition = Some(Self::ready_or_error(
                        self.scene_config,
                        pending.focus_node(),
                        result,
                    ));
                }
                None => {
                    self.refocus = Some(pending);
                    ctx.request_repaint();
                }
            }
        }

        if let Some(next_state) = transition {
            self.state = next_state;
        }
    }
}
