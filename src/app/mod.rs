use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Context};
use mindmap_view::config::ViewerSettings;
use mindmap_view::layout::LayoutCache;
use mindmap_view::tree::{TreeNode, load_tree_file};
use mindmap_view::view::ViewState;
use tracing::{error, info};

mod graph;
mod render_utils;
mod ui;

pub struct MindmapApp {
    tree_path: PathBuf,
    settings: ViewerSettings,
    state: AppState,
    reload_rx: Option<Receiver<Result<TreeNode, String>>>,
}

enum AppState {
    Loading {
        rx: Receiver<Result<TreeNode, String>>,
    },
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    tree: TreeNode,
    tree_revision: u64,
    settings: ViewerSettings,
    view: ViewState,
    layout: LayoutCache,
    search_input: String,
    fuzzy_search: bool,
    visible_node_count: usize,
}

impl MindmapApp {
    pub fn new(cc: &eframe::CreationContext<'_>, tree_path: PathBuf, settings: ViewerSettings) -> Self {
        cc.egui_ctx.set_visuals(egui::Visuals::dark());
        let state = Self::start_load(&tree_path);
        Self {
            tree_path,
            settings,
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(tree_path: &Path) -> Receiver<Result<TreeNode, String>> {
        let (tx, rx) = mpsc::channel();
        let tree_path = tree_path.to_path_buf();

        thread::spawn(move || {
            let result = load_tree_file(&tree_path).map_err(|error| {
                error!(path = %tree_path.display(), %error, "failed to load tree");
                format!("{:#}", anyhow::Error::new(error))
            });
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(tree_path: &Path) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(tree_path),
        }
    }
}

impl eframe::App for MindmapApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                match rx.try_recv() {
                    Ok(Ok(tree)) => {
                        transition = Some(AppState::Ready(Box::new(ViewModel::new(
                            tree,
                            self.settings.clone(),
                            ctx.pixels_per_point(),
                        ))));
                    }
                    Ok(Err(error)) => transition = Some(AppState::Error(error)),
                    Err(TryRecvError::Empty) => ctx.request_repaint(),
                    Err(TryRecvError::Disconnected) => {
                        transition = Some(AppState::Error("Background load worker disconnected".to_owned()));
                    }
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading test tree...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load test tree");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        transition = Some(Self::start_load(&self.tree_path));
                    }
                });
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                let is_reloading = self.reload_rx.is_some();
                model.show(ctx, &self.tree_path, &mut reload_requested, is_reloading);

                if reload_requested && self.reload_rx.is_none() {
                    self.reload_rx = Some(Self::spawn_load(&self.tree_path));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(Ok(tree)) => model.replace_tree(tree),
                        Ok(Err(error)) => transition = Some(AppState::Error(error)),
                        Err(TryRecvError::Empty) => {
                            self.reload_rx = Some(rx);
                            ctx.request_repaint();
                        }
                        Err(TryRecvError::Disconnected) => {
                            transition =
                                Some(AppState::Error("Background load worker disconnected".to_owned()));
                        }
                    }
                }
            }
        }

        if let Some(next_state) = transition {
            self.reload_rx = None;
            self.state = next_state;
        }
    }
}

impl ViewModel {
    fn new(tree: TreeNode, settings: ViewerSettings, surface_ratio: f32) -> Self {
        let view = ViewState::new(
            settings.viewport_config(surface_ratio),
            settings.initial_query(),
        );
        info!(nodes = tree.node_count(), "tree ready");

        Self {
            search_input: settings.initial_search.clone(),
            fuzzy_search: settings.search_mode == mindmap_view::view::SearchMode::Fuzzy,
            tree,
            tree_revision: 0,
            settings,
            view,
            layout: LayoutCache::new(),
            visible_node_count: 0,
        }
    }

    /// Swaps in a reloaded tree. Ids follow document order, so collapse
    /// state carries over when the structure is unchanged.
    fn replace_tree(&mut self, tree: TreeNode) {
        info!(nodes = tree.node_count(), "tree reloaded");
        self.tree = tree;
        self.tree_revision = self.tree_revision.wrapping_add(1);
    }
}
