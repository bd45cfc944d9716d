use eframe::egui::{self, Sense, Ui};
use mindmap_view::config::PixelRatio;
use mindmap_view::layout::TextMeasure;
use mindmap_view::render::render_scene;

use super::super::ViewModel;
use super::super::render_utils::EguiSurface;

impl ViewModel {
    pub(in crate::app) fn draw_canvas(&mut self, ui: &mut Ui) {
        let (rect, _response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());

        if self.settings.pixel_ratio == PixelRatio::FromSurface {
            self.view.set_pixel_ratio(ui.ctx().pixels_per_point());
        }

        let mut suppress_scroll = false;
        let mut clicks = Vec::new();
        for event in self.collect_viewport_events(ui, rect) {
            let outcome = self.view.handle_input(event);
            suppress_scroll |= outcome.prevent_default;
            clicks.extend(outcome.click);
        }
        if suppress_scroll {
            Self::suppress_native_scroll(ui.ctx());
        }
        for point in clicks {
            self.handle_canvas_click(ui.ctx(), point);
        }

        let pixel_ratio = self.view.viewport().config().pixel_ratio;
        let mut surface = EguiSurface::new(ui.painter_at(rect), rect, pixel_ratio);
        let measure = surface.attached().then_some(&surface as &dyn TextMeasure);
        let layout = self.layout.ensure(
            measure,
            &self.tree,
            self.tree_revision,
            &self.view,
            self.settings.layout_params(),
        );

        let stats = render_scene(
            &mut surface,
            layout,
            &self.view.viewport().state(),
            self.settings.font_size,
        );
        self.visible_node_count = stats.nodes_drawn;

        if layout.is_none() && !self.view.search().is_empty() {
            ui.painter_at(rect).text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                "No tests match the current search.",
                egui::FontId::proportional(16.0),
                egui::Color32::from_gray(200),
            );
        }

        if self.hovering_node(ui, rect) {
            ui.output_mut(|output| {
                output.cursor_icon = egui::CursorIcon::PointingHand;
            });
        }
    }
}
