use std::path::Path;

use eframe::egui::{self, Align, Context, Layout};
use mindmap_view::view::SearchMode;

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        tree_path: &Path,
        reload_requested: &mut bool,
        is_loading: bool,
    ) {
        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("mindmap");
                    ui.separator();
                    ui.label(format!("file: {}", tree_path.display()));
                    ui.label(format!("nodes: {}", self.tree.node_count()));
                    ui.separator();
                    self.draw_search(ui);
                    ui.separator();
                    self.draw_tree_buttons(ui, reload_requested, is_loading);
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        ui.label(self.status_text());
                    });
                });
            });

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| self.draw_canvas(ui));
    }

    fn draw_search(&mut self, ui: &mut egui::Ui) {
        ui.label("Search");
        let response = ui
            .add(egui::TextEdit::singleline(&mut self.search_input).desired_width(220.0))
            .on_hover_text("Show only tests and describe blocks leading to a match.");
        if response.changed() {
            self.view.set_search_text(&self.search_input);
        }

        if ui
            .checkbox(&mut self.fuzzy_search, "Fuzzy")
            .on_hover_text("Match scattered letters instead of a plain substring.")
            .changed()
        {
            self.view.set_search_mode(if self.fuzzy_search {
                SearchMode::Fuzzy
            } else {
                SearchMode::Substring
            });
        }
    }

    fn draw_tree_buttons(&mut self, ui: &mut egui::Ui, reload_requested: &mut bool, is_loading: bool) {
        if ui.button("Expand all").clicked() {
            self.view.expand_all();
        }
        if ui.button("Collapse all").clicked() {
            let branches = self.tree.branch_ids();
            // Keep the root open so the first level stays visible.
            self.view
                .collapse_all(branches.into_iter().filter(|id| *id != self.tree.id));
        }
        if ui.button("Reset view").clicked() {
            self.view.reset_viewport();
        }
        let reload_button = ui.add_enabled(!is_loading, egui::Button::new("Reload"));
        if reload_button.clicked() {
            *reload_requested = true;
        }
    }

    fn status_text(&self) -> String {
        let zoom = self.view.viewport().state().zoom;
        format!(
            "visible: {}  |  collapsed: {}  |  zoom {:.0}%",
            self.visible_node_count,
            self.view.collapsed().len(),
            zoom * 100.0
        )
    }
}
