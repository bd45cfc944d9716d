use eframe::egui::epaint::CubicBezierShape;
use eframe::egui::{Align2, Color32, FontId, Painter, Pos2, Rect, Stroke, Vec2};
use mindmap_view::layout::TextMeasure;
use mindmap_view::render::{DrawSurface, LineKind, TextKind};

const BACKGROUND: Color32 = Color32::from_rgb(66, 68, 72);
const FOREGROUND: Color32 = Color32::from_rgb(226, 226, 226);
const BADGE: Color32 = Color32::from_rgb(246, 206, 104);
const GRID: Color32 = Color32::from_rgba_premultiplied(60, 62, 66, 90);
const CONNECTOR_WIDTH: f32 = 4.0;
const MIN_FONT_POINTS: f32 = 1.0;

/// [`DrawSurface`] over an egui painter clipped to the canvas rect.
///
/// The surface has `rect.size() * pixel_ratio` pixels. Content points go
/// through the viewport transform into surface pixels, then back to egui
/// points relative to `rect.min`.
pub(super) struct EguiSurface {
    painter: Painter,
    rect: Rect,
    pixel_ratio: f32,
    scale: f32,
    translate: Vec2,
}

impl EguiSurface {
    pub(super) fn new(painter: Painter, rect: Rect, pixel_ratio: f32) -> Self {
        Self {
            painter,
            rect,
            pixel_ratio,
            scale: 1.0,
            translate: Vec2::ZERO,
        }
    }

    /// Whether the canvas has any area to measure and draw on.
    pub(super) fn attached(&self) -> bool {
        self.rect.width() > 0.0 && self.rect.height() > 0.0
    }

    fn to_screen(&self, content: Pos2) -> Pos2 {
        let surface = (content.to_vec2() + self.translate) * self.scale;
        self.rect.min + surface / self.pixel_ratio
    }

    fn stroke(&self, kind: LineKind) -> Stroke {
        match kind {
            LineKind::Grid => Stroke::new(1.0, GRID),
            LineKind::Connector => {
                Stroke::new((CONNECTOR_WIDTH * self.scale / self.pixel_ratio).max(0.5), FOREGROUND)
            }
        }
    }
}

impl TextMeasure for EguiSurface {
    fn text_width(&self, text: &str, font_size: f32) -> f32 {
        self.painter
            .layout_no_wrap(text.to_owned(), FontId::proportional(font_size), FOREGROUND)
            .size()
            .x
    }
}

impl DrawSurface for EguiSurface {
    fn size(&self) -> Vec2 {
        self.rect.size() * self.pixel_ratio
    }

    fn set_transform(&mut self, scale: f32, translate: Vec2) {
        self.scale = scale;
        self.translate = translate;
    }

    fn clear_rect(&mut self, rect: Rect) {
        let screen = Rect::from_min_max(self.to_screen(rect.min), self.to_screen(rect.max));
        self.painter.rect_filled(screen, 0.0, BACKGROUND);
    }

    fn draw_line(&mut self, from: Pos2, to: Pos2, kind: LineKind) {
        let stroke = self.stroke(kind);
        self.painter
            .line_segment([self.to_screen(from), self.to_screen(to)], stroke);
    }

    fn draw_text(&mut self, text: &str, top_left: Pos2, font_size: f32, kind: TextKind) {
        let points = (font_size * self.scale / self.pixel_ratio).max(MIN_FONT_POINTS);
        let color = match kind {
            TextKind::Node => FOREGROUND,
            TextKind::Badge => BADGE,
        };
        self.painter.text(
            self.to_screen(top_left),
            Align2::LEFT_TOP,
            text,
            FontId::proportional(points),
            color,
        );
    }

    fn draw_curve(&mut self, points: [Pos2; 4], kind: LineKind) {
        let screen = points.map(|point| self.to_screen(point));
        let stroke = self.stroke(kind);
        self.painter.add(CubicBezierShape::from_points_stroke(
            screen,
            false,
            Color32::TRANSPARENT,
            stroke,
        ));
    }
}
