use eframe::egui::{Pos2, Vec2};
use serde::{Deserialize, Serialize};

/// Pan offset and zoom scale.
///
/// Drawing applies `scale(zoom)` and then `translate(pan)`, so a content
/// point `p` lands on the surface at `(p + pan) * zoom`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ViewportState {
    #[serde(with = "super::vec2_serde")]
    pub pan: Vec2,
    pub zoom: f32,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self {
            pan: Vec2::ZERO,
            zoom: 1.0,
        }
    }
}

impl ViewportState {
    pub fn content_to_surface(&self, content: Pos2) -> Pos2 {
        ((content.to_vec2() + self.pan) * self.zoom).to_pos2()
    }

    /// Undoes the scale, then the translate.
    pub fn surface_to_content(&self, surface: Pos2) -> Pos2 {
        (surface.to_vec2() / self.zoom - self.pan).to_pos2()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportConfig {
    /// Surface pixels per screen unit.
    pub pixel_ratio: f32,
    /// Max per-axis pointer travel, in screen units, for a press to count as a click.
    pub click_threshold: f32,
    pub wheel_pan_factor: f32,
    pub wheel_zoom_factor: f32,
    pub min_zoom: f32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            pixel_ratio: 1.0,
            click_threshold: 5.0,
            wheel_pan_factor: 1.5,
            wheel_zoom_factor: 0.001,
            min_zoom: 0.1,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum PointerPhase {
    #[default]
    Idle,
    Panning {
        down: Pos2,
        last: Pos2,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModifierKey {
    Meta,
    Control,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifierKeys {
    pub meta: bool,
    pub control: bool,
}

impl ModifierKeys {
    pub fn any(self) -> bool {
        self.meta || self.control
    }

    fn set(&mut self, key: ModifierKey, pressed: bool) {
        match key {
            ModifierKey::Meta => self.meta = pressed,
            ModifierKey::Control => self.control = pressed,
        }
    }
}

/// Input in screen coordinates. Wheel deltas follow the browser convention:
/// positive `y` scrolls down.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ViewportEvent {
    PointerDown(Pos2),
    PointerMove(Pos2),
    PointerUp(Pos2),
    PointerLeave,
    Wheel { delta: Vec2 },
    KeyDown(ModifierKey),
    KeyUp(ModifierKey),
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ViewportResponse {
    pub redraw: bool,
    /// Content-space point of a completed click.
    pub click: Option<Pos2>,
    /// The host should swallow its native handling of the event.
    pub prevent_default: bool,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ViewportController {
    state: ViewportState,
    modifiers: ModifierKeys,
    #[serde(skip)]
    phase: PointerPhase,
    #[serde(skip)]
    config: ViewportConfig,
}

impl ViewportController {
    pub fn new(config: ViewportConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn state(&self) -> ViewportState {
        self.state
    }

    pub fn phase(&self) -> PointerPhase {
        self.phase
    }

    pub fn modifiers(&self) -> ModifierKeys {
        self.modifiers
    }

    pub fn config(&self) -> ViewportConfig {
        self.config
    }

    pub fn zoom_modifier_held(&self) -> bool {
        self.modifiers.any()
    }

    pub fn set_pixel_ratio(&mut self, pixel_ratio: f32) {
        if pixel_ratio > 0.0 {
            self.config.pixel_ratio = pixel_ratio;
        }
    }

    pub fn reset(&mut self) {
        self.state = ViewportState::default();
        self.phase = PointerPhase::Idle;
    }

    /// Maps a screen point to content space through the current transform.
    pub fn screen_to_content(&self, screen: Pos2) -> Pos2 {
        self.state
            .surface_to_content((screen.to_vec2() * self.config.pixel_ratio).to_pos2())
    }

    pub fn handle(&mut self, event: ViewportEvent) -> ViewportResponse {
        match event {
            ViewportEvent::PointerDown(point) => {
                self.phase = PointerPhase::Panning {
                    down: point,
                    last: point,
                };
                ViewportResponse::default()
            }
            ViewportEvent::PointerMove(point) => {
                let PointerPhase::Panning { down, last } = self.phase else {
                    return ViewportResponse::default();
                };
                let delta = (point - last) * self.config.pixel_ratio / self.state.zoom;
                self.state.pan += delta;
                self.phase = PointerPhase::Panning { down, last: point };
                ViewportResponse {
                    redraw: delta != Vec2::ZERO,
                    ..ViewportResponse::default()
                }
            }
            ViewportEvent::PointerUp(point) => {
                let PointerPhase::Panning { down, .. } = self.phase else {
                    return ViewportResponse::default();
                };
                self.phase = PointerPhase::Idle;

                let travel = point - down;
                let threshold = self.config.click_threshold;
                let click = (travel.x.abs() < threshold && travel.y.abs() < threshold)
                    .then(|| self.screen_to_content(point));
                ViewportResponse {
                    click,
                    ..ViewportResponse::default()
                }
            }
            ViewportEvent::PointerLeave => {
                self.phase = PointerPhase::Idle;
                ViewportResponse::default()
            }
            ViewportEvent::Wheel { delta } => {
                if self.zoom_modifier_held() {
                    let zoom = self.state.zoom + delta.y * self.config.wheel_zoom_factor;
                    self.state.zoom = zoom.max(self.config.min_zoom);
                } else {
                    self.state.pan += delta * -self.config.wheel_pan_factor / self.state.zoom;
                }
                ViewportResponse {
                    redraw: true,
                    click: None,
                    prevent_default: true,
                }
            }
            ViewportEvent::KeyDown(key) => {
                self.modifiers.set(key, true);
                ViewportResponse::default()
            }
            ViewportEvent::KeyUp(key) => {
                self.modifiers.set(key, false);
                ViewportResponse::default()
            }
        }
    }
}
