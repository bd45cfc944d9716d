use eframe::egui::{self, Context, Event, MouseWheelUnit, PointerButton, Pos2, Rect, Ui, Vec2};
use mindmap_view::view::{ModifierKey, ViewportEvent, hit_test};
use tracing::info;

use super::super::ViewModel;

const LINE_SCROLL_POINTS: f32 = 40.0;

fn local(rect: Rect, pos: Pos2) -> Pos2 {
    (pos - rect.min).to_pos2()
}

impl ViewModel {
    /// Translates this frame's egui input into viewport events, in order.
    /// Modifier changes come first so a wheel in the same frame sees them.
    pub(in crate::app) fn collect_viewport_events(&self, ui: &Ui, rect: Rect) -> Vec<ViewportEvent> {
        let tracked = self.view.viewport().modifiers();
        let (modifiers, events, hovering) = ui.input(|input| {
            let hovering = input
                .pointer
                .hover_pos()
                .is_some_and(|pos| rect.contains(pos));
            (input.modifiers, input.events.clone(), hovering)
        });

        let mut out = Vec::new();
        for (key, held, was_held) in [
            (ModifierKey::Meta, modifiers.mac_cmd, tracked.meta),
            (ModifierKey::Control, modifiers.ctrl, tracked.control),
        ] {
            if held && !was_held {
                out.push(ViewportEvent::KeyDown(key));
            } else if !held && was_held {
                out.push(ViewportEvent::KeyUp(key));
            }
        }

        for event in events {
            match event {
                Event::PointerButton {
                    pos,
                    button: PointerButton::Primary,
                    pressed,
                    ..
                } => {
                    if pressed && rect.contains(pos) {
                        out.push(ViewportEvent::PointerDown(local(rect, pos)));
                    } else if !pressed {
                        out.push(ViewportEvent::PointerUp(local(rect, pos)));
                    }
                }
                Event::PointerMoved(pos) => out.push(ViewportEvent::PointerMove(local(rect, pos))),
                Event::PointerGone => out.push(ViewportEvent::PointerLeave),
                Event::MouseWheel { unit, delta, .. } if hovering => {
                    let points = match unit {
                        MouseWheelUnit::Point => delta,
                        MouseWheelUnit::Line => delta * LINE_SCROLL_POINTS,
                        MouseWheelUnit::Page => delta * rect.height(),
                    };
                    // egui reports wheel-up as positive y.
                    out.push(ViewportEvent::Wheel { delta: -points });
                }
                _ => {}
            }
        }

        out
    }

    /// Drops the scroll egui would otherwise hand to other widgets.
    pub(in crate::app) fn suppress_native_scroll(ctx: &Context) {
        ctx.input_mut(|input| {
            input.smooth_scroll_delta = Vec2::ZERO;
            input.raw_scroll_delta = Vec2::ZERO;
        });
    }

    /// Hit-tests a click against the last positioned tree. With the zoom
    /// modifier held, a node carrying a file URL opens it; otherwise the
    /// node's collapse state flips.
    pub(in crate::app) fn handle_canvas_click(&mut self, ctx: &Context, point: Pos2) {
        let Some(id) = self.layout.current().and_then(|layout| hit_test(layout, point)) else {
            return;
        };

        if self.view.viewport().zoom_modifier_held() {
            let file_url = self
                .tree
                .find(id)
                .and_then(|node| node.meta.as_ref())
                .and_then(|meta| meta.file_url.clone());
            if let Some(url) = file_url {
                info!(node = %id, %url, "opening test file");
                ctx.open_url(egui::OpenUrl::new_tab(url));
            }
            return;
        }

        self.view.toggle_collapsed(id);
    }

    pub(in crate::app) fn hovering_node(&self, ui: &Ui, rect: Rect) -> bool {
        let Some(pointer) = ui.input(|input| input.pointer.hover_pos()) else {
            return false;
        };
        if !rect.contains(pointer) {
            return false;
        }

        let content = self.view.viewport().screen_to_content(local(rect, pointer));
        self.layout
            .current()
            .is_some_and(|layout| hit_test(layout, content).is_some())
    }
}
