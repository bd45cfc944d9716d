//! Draws a positioned tree onto any [`DrawSurface`].

use eframe::egui::{Pos2, Rect, Vec2, pos2, vec2};

use crate::layout::{ANCHOR_X_OFFSET, HORIZONTAL_GAP, LayoutNode, TextMeasure, line_height};
use crate::view::ViewportState;

/// Content-space spacing of the background grid.
pub const GRID_SPACING: f32 = 64.0;
/// Gap between a collapsed block and its "+N" badge.
pub const BADGE_GAP: f32 = 12.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineKind {
    Grid,
    Connector,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextKind {
    Node,
    Badge,
}

/// Drawing capability provided by the host. All coordinates except
/// [`DrawSurface::size`] are content space; the surface applies the
/// transform from the last [`DrawSurface::set_transform`] call.
pub trait DrawSurface: TextMeasure {
    /// Pixel dimensions of the surface.
    fn size(&self) -> Vec2;
    /// Scale, then translate.
    fn set_transform(&mut self, scale: f32, translate: Vec2);
    fn clear_rect(&mut self, rect: Rect);
    fn draw_line(&mut self, from: Pos2, to: Pos2, kind: LineKind);
    fn draw_text(&mut self, text: &str, top_left: Pos2, font_size: f32, kind: TextKind);
    fn draw_curve(&mut self, points: [Pos2; 4], kind: LineKind);
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub nodes_drawn: usize,
    pub connectors_drawn: usize,
}

/// Content-space rectangle currently covered by the surface.
pub fn visible_bounds(surface_size: Vec2, viewport: &ViewportState) -> Rect {
    Rect::from_min_max(
        viewport.surface_to_content(Pos2::ZERO),
        viewport.surface_to_content(surface_size.to_pos2()),
    )
}

pub fn badge_text(hidden_descendants: usize) -> String {
    format!("+{hidden_descendants}")
}

/// Connector from a parent's right anchor to a child's left anchor, with
/// control points pulled half a gap sideways.
pub fn connector_points(parent: &LayoutNode, child: &LayoutNode) -> [Pos2; 4] {
    let start = pos2(parent.x + parent.width + ANCHOR_X_OFFSET, parent.mid_y());
    let end = pos2(child.x - ANCHOR_X_OFFSET, child.mid_y());
    let pull = vec2(HORIZONTAL_GAP / 2.0, 0.0);
    [start, start + pull, end - pull, end]
}

pub fn render_scene(
    surface: &mut dyn DrawSurface,
    layout: Option<&LayoutNode>,
    viewport: &ViewportState,
    font_size: f32,
) -> RenderStats {
    surface.set_transform(viewport.zoom, viewport.pan);

    let bounds = visible_bounds(surface.size(), viewport);
    surface.clear_rect(bounds);
    draw_grid(surface, bounds);

    let mut stats = RenderStats::default();
    if let Some(layout) = layout {
        draw_node(surface, layout, bounds, font_size, &mut stats);
    }
    stats
}

fn draw_grid(surface: &mut dyn DrawSurface, bounds: Rect) {
    let mut x = (bounds.left() / GRID_SPACING).ceil() * GRID_SPACING;
    while x <= bounds.right() {
        surface.draw_line(pos2(x, bounds.top()), pos2(x, bounds.bottom()), LineKind::Grid);
        x += GRID_SPACING;
    }

    let mut y = (bounds.top() / GRID_SPACING).ceil() * GRID_SPACING;
    while y <= bounds.bottom() {
        surface.draw_line(pos2(bounds.left(), y), pos2(bounds.right(), y), LineKind::Grid);
        y += GRID_SPACING;
    }
}

fn draw_node(
    surface: &mut dyn DrawSurface,
    node: &LayoutNode,
    bounds: Rect,
    font_size: f32,
    stats: &mut RenderStats,
) {
    let badge = (node.collapsed && node.hidden_descendants > 0).then(|| {
        let text = badge_text(node.hidden_descendants);
        let rect = Rect::from_min_size(
            pos2(node.x + node.width + BADGE_GAP, node.y),
            vec2(surface.text_width(&text, font_size), line_height(font_size)),
        );
        (text, rect)
    });

    // A badge sits outside the collapsed node's own box.
    let extent = match &badge {
        Some((_, rect)) => node.tree_rect().union(*rect),
        None => node.tree_rect(),
    };
    if !bounds.intersects(extent) {
        return;
    }

    if bounds.intersects(node.rect()) {
        let line_height = line_height(font_size);
        for (index, line) in node.lines.iter().enumerate() {
            let top_left = pos2(node.x, node.y + index as f32 * line_height);
            surface.draw_text(line, top_left, font_size, TextKind::Node);
        }
        stats.nodes_drawn += 1;
    }

    if node.collapsed {
        if let Some((text, rect)) = badge
            && bounds.intersects(rect)
        {
            surface.draw_text(&text, rect.min, font_size, TextKind::Badge);
        }
        return;
    }

    for child in &node.nodes {
        draw_node(surface, child, bounds, font_size, stats);
    }

    for child in &node.nodes {
        let points = connector_points(node, child);
        if bounds.intersects(Rect::from_points(&points)) {
            surface.draw_curve(points, LineKind::Connector);
            stats.connectors_drawn += 1;
        }
    }
}
